//! Additive relevance scoring

use rust_decimal::Decimal;

use super::types::ScoreBreakdown;
use crate::domain::preferences::Preferences;
use crate::domain::product::Product;

/// Points awarded per matching preference dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Product category equals the requested category (default: 10)
    pub category: u32,
    /// Each requested tag the product carries (default: 5)
    pub per_tag: u32,
    /// Price inside the requested range (default: 8)
    pub price_in_range: u32,
    /// Price outside the range but within `max * price_tolerance` (default: 4)
    pub price_within_tolerance: u32,
    /// Product carries a tag admitted by the experience level (default: 6)
    pub experience_level: u32,
    /// Price at or under the budget (default: 3)
    pub within_budget: u32,
    /// Multiplier on `priceRange.max` for the soft band (default: 1.2)
    pub price_tolerance: Decimal,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Score calculator for recommendation candidates
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
}

impl ScoreCalculator {
    /// Create a new score calculator with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom weights
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Total score for a product
    pub fn score(&self, product: &Product, preferences: &Preferences) -> u32 {
        self.breakdown(product, preferences).total()
    }

    /// Contribution of every preference dimension. Unset dimensions contribute zero.
    pub fn breakdown(&self, product: &Product, preferences: &Preferences) -> ScoreBreakdown {
        ScoreBreakdown {
            category: self.category_score(product, preferences),
            tags: self.tag_score(product, preferences),
            price_range: self.price_range_score(product, preferences),
            experience_level: self.experience_score(product, preferences),
            budget: self.budget_score(product, preferences),
        }
    }

    fn category_score(&self, product: &Product, preferences: &Preferences) -> u32 {
        match preferences.active_category() {
            Some(category) if product.category == category => self.weights.category,
            _ => 0,
        }
    }

    fn tag_score(&self, product: &Product, preferences: &Preferences) -> u32 {
        let Some(tags) = &preferences.tags else {
            return 0;
        };

        let matching = tags.iter().filter(|tag| product.has_tag(tag)).count();
        u32::try_from(matching).unwrap_or(u32::MAX).saturating_mul(self.weights.per_tag)
    }

    fn price_range_score(&self, product: &Product, preferences: &Preferences) -> u32 {
        let Some(range) = preferences.price_range else {
            return 0;
        };

        if range.contains(product.price) {
            self.weights.price_in_range
        } else if self.within_tolerance(product, range.max) {
            // Upper bound only: cheaper-than-min products land here too.
            self.weights.price_within_tolerance
        } else {
            0
        }
    }

    fn within_tolerance(&self, product: &Product, max: Decimal) -> bool {
        match max.checked_mul(self.weights.price_tolerance) {
            Some(ceiling) => product.price <= ceiling,
            // Overflow means the ceiling lies past every representable price, above or below.
            None => max.is_sign_positive() == self.weights.price_tolerance.is_sign_positive(),
        }
    }

    fn experience_score(&self, product: &Product, preferences: &Preferences) -> u32 {
        match preferences.allowed_experience_tags() {
            Some(allowed) if product.has_any_tag(allowed) => self.weights.experience_level,
            _ => 0,
        }
    }

    fn budget_score(&self, product: &Product, preferences: &Preferences) -> u32 {
        match preferences.budget {
            Some(budget) if product.price <= budget => self.weights.within_budget,
            _ => 0,
        }
    }
}

/// Score a product with the default weights.
pub fn score(product: &Product, preferences: &Preferences) -> u32 {
    ScoreCalculator::new().score(product, preferences)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::preferences::ExperienceLevel;
    use crate::domain::product::ProductId;

    fn marketing_course() -> Product {
        Product {
            id: ProductId::from("1"),
            name: "Marketing Digital Básico".to_owned(),
            category: "marketing".to_owned(),
            price: Decimal::from(99),
            tags: vec!["iniciante".to_owned(), "marketing".to_owned(), "digital".to_owned()],
            description: "Curso introdutório de marketing digital".to_owned(),
        }
    }

    fn priced(price: i64) -> Product {
        Product { price: Decimal::from(price), ..marketing_course() }
    }

    #[test]
    fn category_match_scores_ten() {
        let preferences = Preferences::default().with_category("marketing");
        assert_eq!(score(&marketing_course(), &preferences), 10);
    }

    #[test]
    fn each_matching_tag_scores_five() {
        let preferences = Preferences::default().with_tags(["marketing", "digital"]);
        assert_eq!(score(&marketing_course(), &preferences), 10);

        let partial = Preferences::default().with_tags(["marketing", "vendas"]);
        assert_eq!(score(&marketing_course(), &partial), 5);
    }

    #[test]
    fn combined_dimensions_add_up() {
        let preferences = Preferences::default()
            .with_category("marketing")
            .with_tags(["digital"])
            .with_budget(Decimal::from(200));

        assert_eq!(score(&marketing_course(), &preferences), 18);
    }

    #[test]
    fn price_range_has_exact_and_tolerance_bands() {
        let preferences =
            Preferences::default().with_price_range(Decimal::from(50), Decimal::from(150));

        assert_eq!(score(&priced(99), &preferences), 8);
        assert_eq!(score(&priced(150), &preferences), 8);
        assert_eq!(score(&priced(170), &preferences), 4);
        assert_eq!(score(&priced(180), &preferences), 4);
        assert_eq!(score(&priced(181), &preferences), 0);
        assert_eq!(score(&priced(500), &preferences), 0);
    }

    #[test]
    fn price_below_range_minimum_falls_into_tolerance_band() {
        let preferences =
            Preferences::default().with_price_range(Decimal::from(50), Decimal::from(150));
        assert_eq!(score(&priced(20), &preferences), 4);
    }

    #[test]
    fn tolerance_ceiling_past_decimal_max_is_unbounded() {
        let preferences = Preferences::default().with_price_range(Decimal::from(5), Decimal::MAX);

        assert_eq!(score(&priced(1), &preferences), 4);
        assert_eq!(score(&priced(7), &preferences), 8);
    }

    #[test]
    fn experience_level_uses_cumulative_tags() {
        let course = marketing_course();

        for level in [ExperienceLevel::Beginner, ExperienceLevel::Intermediate, ExperienceLevel::Advanced]
        {
            let preferences = Preferences::default().with_experience_level(level);
            assert_eq!(score(&course, &preferences), 6);
        }

        let advanced_only = Product { tags: vec!["avançado".to_owned()], ..marketing_course() };
        let beginner = Preferences::default().with_experience_level(ExperienceLevel::Beginner);
        assert_eq!(score(&advanced_only, &beginner), 0);
    }

    #[test]
    fn unrecognized_experience_level_contributes_nothing() {
        let preferences = Preferences::default()
            .with_experience_level(ExperienceLevel::Unrecognized("expert".to_owned()));
        assert_eq!(score(&marketing_course(), &preferences), 0);
    }

    #[test]
    fn budget_is_inclusive() {
        let at_budget = Preferences::default().with_budget(Decimal::from(99));
        let under_budget = Preferences::default().with_budget(Decimal::from(98));

        assert_eq!(score(&marketing_course(), &at_budget), 3);
        assert_eq!(score(&marketing_course(), &under_budget), 0);
    }

    #[test]
    fn no_preferences_scores_zero() {
        assert_eq!(score(&marketing_course(), &Preferences::default()), 0);
    }

    #[test]
    fn adding_matching_dimensions_never_lowers_the_score() {
        let course = marketing_course();
        let steps = [
            Preferences::default(),
            Preferences::default().with_category("marketing"),
            Preferences::default().with_category("marketing").with_tags(["digital"]),
            Preferences::default()
                .with_category("marketing")
                .with_tags(["digital"])
                .with_price_range(Decimal::from(50), Decimal::from(150)),
            Preferences::default()
                .with_category("marketing")
                .with_tags(["digital"])
                .with_price_range(Decimal::from(50), Decimal::from(150))
                .with_experience_level(ExperienceLevel::Beginner)
                .with_budget(Decimal::from(100)),
        ];

        let scores: Vec<u32> = steps.iter().map(|preferences| score(&course, preferences)).collect();
        assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]), "scores: {scores:?}");
        assert_eq!(scores.last().copied(), Some(10 + 5 + 8 + 6 + 3));
    }

    #[test]
    fn breakdown_total_matches_score() {
        let calculator = ScoreCalculator::new();
        let preferences = Preferences::default()
            .with_category("marketing")
            .with_tags(["marketing", "digital"])
            .with_budget(Decimal::from(200));

        let breakdown = calculator.breakdown(&marketing_course(), &preferences);
        assert_eq!(breakdown.category, 10);
        assert_eq!(breakdown.tags, 10);
        assert_eq!(breakdown.price_range, 0);
        assert_eq!(breakdown.budget, 3);
        assert_eq!(breakdown.total(), calculator.score(&marketing_course(), &preferences));
    }

    #[test]
    fn custom_weights_are_applied() {
        let calculator = ScoreCalculator::with_weights(ScoringWeights {
            category: 1,
            per_tag: 2,
            ..ScoringWeights::default()
        });
        let preferences =
            Preferences::default().with_category("marketing").with_tags(["marketing", "digital"]);

        assert_eq!(calculator.score(&marketing_course(), &preferences), 5);
    }
}
