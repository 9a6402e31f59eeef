//! Product recommendation pipeline
//!
//! Catalog + preferences flow through four pure stages: filter, score, rank
//! and (optionally) aggregate. No stage performs I/O or keeps state between
//! calls, so identical inputs always produce identical output.

pub mod filter;
pub mod ranking;
pub mod scoring;
pub mod stats;
mod types;

pub use filter::filter;
pub use ranking::{rank, rank_with};
pub use scoring::{score, ScoreCalculator, ScoringWeights};
pub use stats::summarize;
pub use types::*;

use rust_decimal::Decimal;

use crate::catalog::Catalog;
use crate::domain::preferences::Preferences;
use crate::domain::product::Product;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    category: 10,
    per_tag: 5,
    price_in_range: 8,
    price_within_tolerance: 4,
    experience_level: 6,
    within_budget: 3,
    price_tolerance: Decimal::from_parts(12, 0, 0, false, 1),
};

/// Result count for [`Mode::Multiple`] when the caller does not pick one
pub const DEFAULT_LIMIT: usize = 5;

/// Run the whole pipeline against a catalog snapshot with default weights.
pub fn recommend(catalog: &Catalog, preferences: &Preferences, mode: Mode) -> Recommendation {
    recommend_with(&ScoreCalculator::new(), catalog, preferences, mode)
}

pub fn recommend_with(
    calculator: &ScoreCalculator,
    catalog: &Catalog,
    preferences: &Preferences,
    mode: Mode,
) -> Recommendation {
    let candidates = filter(catalog, preferences);
    rank_with(calculator, &candidates, preferences, mode)
}

/// Read-only recommendation facade over one catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct RecommendationService {
    catalog: Catalog,
    calculator: ScoreCalculator,
}

impl RecommendationService {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog, calculator: ScoreCalculator::new() }
    }

    pub fn with_calculator(mut self, calculator: ScoreCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recommend(&self, preferences: &Preferences, mode: Mode) -> Recommendation {
        recommend_with(&self.calculator, &self.catalog, preferences, mode)
    }

    /// Per-dimension scores for an item, for explanation output.
    pub fn explain(&self, product: &Product, preferences: &Preferences) -> ScoreBreakdown {
        self.calculator.breakdown(product, preferences)
    }

    pub fn summarize<P: AsRef<Product>>(&self, results: &[P]) -> Stats {
        summarize(results)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal::Decimal;

    use crate::catalog::Catalog;
    use crate::domain::product::{Product, ProductId};

    pub fn product(id: &str, category: &str, price: i64, tags: &[&str]) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            category: category.to_owned(),
            price: Decimal::from(price),
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
            description: String::new(),
        }
    }

    /// Three courses, one per experience level.
    pub fn course_catalog() -> Catalog {
        Catalog::new(vec![
            product("1", "marketing", 99, &["iniciante", "marketing", "digital"]),
            product("2", "vendas", 199, &["vendas", "automação", "intermediário"]),
            product("3", "analytics", 299, &["analytics", "avançado", "dados"]),
        ])
    }
}
