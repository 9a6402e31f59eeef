use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const BEGINNER_TAG: &str = "iniciante";
pub const INTERMEDIATE_TAG: &str = "intermediário";
pub const ADVANCED_TAG: &str = "avançado";

/// Inclusive price window used by scoring. Never used to eliminate products.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Experience level requested by the user.
///
/// Levels are cumulative: a higher level also admits products tagged for the
/// levels below it. Strings outside the known vocabulary are kept as
/// [`ExperienceLevel::Unrecognized`] and admit nothing, which the pipeline
/// treats as "no constraint".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Unrecognized(String),
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Beginner => BEGINNER_TAG,
            Self::Intermediate => INTERMEDIATE_TAG,
            Self::Advanced => ADVANCED_TAG,
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn allowed_tags(&self) -> &'static [&'static str] {
        match self {
            Self::Beginner => &[BEGINNER_TAG],
            Self::Intermediate => &[BEGINNER_TAG, INTERMEDIATE_TAG],
            Self::Advanced => &[BEGINNER_TAG, INTERMEDIATE_TAG, ADVANCED_TAG],
            Self::Unrecognized(_) => &[],
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for ExperienceLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            BEGINNER_TAG => Self::Beginner,
            INTERMEDIATE_TAG => Self::Intermediate,
            ADVANCED_TAG => Self::Advanced,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<ExperienceLevel> for String {
    fn from(value: ExperienceLevel) -> Self {
        match value {
            ExperienceLevel::Unrecognized(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
}

impl Preferences {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_price_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.price_range = Some(PriceRange::new(min, max));
        self
    }

    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    /// Category constraint, with blank form input treated as unset.
    pub fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|category| !category.trim().is_empty())
    }

    /// Allowed experience tags, or `None` when the level imposes no constraint.
    pub fn allowed_experience_tags(&self) -> Option<&'static [&'static str]> {
        self.experience_level
            .as_ref()
            .map(ExperienceLevel::allowed_tags)
            .filter(|allowed| !allowed.is_empty())
    }
}
