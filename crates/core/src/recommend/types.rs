//! Types flowing through the recommendation pipeline

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::preferences::PriceRange;
use crate::domain::product::Product;

/// A product that survived filtering, with its position in the catalog.
///
/// The position is what ranking uses to break score ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub position: usize,
    pub product: &'a Product,
}

/// A product together with its relevance score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub score: u32,
}

impl AsRef<Product> for ScoredProduct {
    fn as_ref(&self) -> &Product {
        &self.product
    }
}

/// Per-dimension score contributions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub category: u32,
    pub tags: u32,
    pub price_range: u32,
    pub experience_level: u32,
    pub budget: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        [self.tags, self.price_range, self.experience_level, self.budget]
            .into_iter()
            .fold(self.category, u32::saturating_add)
    }
}

/// Which shape of result the caller wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Only the best match.
    #[default]
    Single,
    /// Up to `limit` matches, best first.
    Multiple { limit: usize },
}

impl Mode {
    pub fn multiple() -> Self {
        Self::Multiple { limit: super::DEFAULT_LIMIT }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Single => ModeKind::Single,
            Self::Multiple { .. } => ModeKind::Multiple,
        }
    }
}

/// Mode name without its limit, as it appears in config files and CLI flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Single,
    Multiple,
}

impl ModeKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "multiple" => Some(Self::Multiple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
        }
    }

    /// `limit` is ignored for [`ModeKind::Single`].
    pub fn with_limit(self, limit: usize) -> Mode {
        match self {
            Self::Single => Mode::Single,
            Self::Multiple => Mode::Multiple { limit },
        }
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a recommendation request.
///
/// Serializes the way the presentation layer expects: the product object for
/// a single match, `null` when nothing matched, an array for ranked lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Recommendation {
    Best(ScoredProduct),
    NoMatch,
    Ranked(Vec<ScoredProduct>),
}

impl Recommendation {
    pub fn items(&self) -> &[ScoredProduct] {
        match self {
            Self::Best(item) => std::slice::from_ref(item),
            Self::NoMatch => &[],
            Self::Ranked(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<ScoredProduct> {
        match self {
            Self::Best(item) => vec![item],
            Self::NoMatch => Vec::new(),
            Self::Ranked(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn stats(&self) -> Stats {
        super::stats::summarize(self.items())
    }
}

/// Summary of a result set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub count: usize,
    pub average_price: Decimal,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

impl Stats {
    pub fn empty() -> Self {
        Self { count: 0, average_price: Decimal::ZERO, categories: Vec::new(), price_range: None }
    }
}
