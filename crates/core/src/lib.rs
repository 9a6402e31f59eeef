pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;

pub use catalog::{Catalog, CatalogProvider, StaticCatalogProvider};
pub use domain::preferences::{ExperienceLevel, Preferences, PriceRange};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, CatalogError};
pub use recommend::{
    filter, rank, recommend, score, summarize, Candidate, Mode, ModeKind, Recommendation,
    RecommendationService, ScoreBreakdown, ScoreCalculator, ScoredProduct, ScoringWeights, Stats,
};
