//! Summary statistics over a result set

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::types::Stats;
use crate::domain::preferences::PriceRange;
use crate::domain::product::Product;

/// Summarize recommended products.
///
/// An empty slice yields zero count, zero average, no categories and no price
/// range. The average is the plain `Decimal` quotient with no rounding step,
/// unless the total overflows `Decimal`.
pub fn summarize<P: AsRef<Product>>(results: &[P]) -> Stats {
    let products: Vec<&Product> = results.iter().map(AsRef::as_ref).collect();
    let (Some(min), Some(max)) = (
        products.iter().map(|product| product.price).min(),
        products.iter().map(|product| product.price).max(),
    ) else {
        return Stats::empty();
    };

    let count = products.len();
    let prices: Vec<Decimal> = products.iter().map(|product| product.price).collect();

    let mut seen = HashSet::new();
    let categories = products
        .iter()
        .copied()
        .filter(|product| seen.insert(product.category.as_str()))
        .map(|product| product.category.clone())
        .collect();

    Stats {
        count,
        average_price: mean(&prices),
        categories,
        price_range: Some(PriceRange::new(min, max)),
    }
}

/// Exact quotient of the sum, or a running mean when the sum leaves the
/// `Decimal` range.
fn mean(prices: &[Decimal]) -> Decimal {
    prices
        .iter()
        .try_fold(Decimal::ZERO, |total, price| total.checked_add(*price))
        .and_then(|total| total.checked_div(Decimal::from(prices.len())))
        .unwrap_or_else(|| running_mean(prices))
}

fn running_mean(prices: &[Decimal]) -> Decimal {
    prices.iter().zip(1u64..).fold(Decimal::ZERO, |average, (price, n)| {
        let n = Decimal::from(n);
        (*price / n)
            .checked_sub(average / n)
            .and_then(|delta| average.checked_add(delta))
            .unwrap_or(average)
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::summarize;
    use crate::domain::product::Product;
    use crate::recommend::test_support::product;
    use crate::recommend::types::{ScoredProduct, Stats};

    #[test]
    fn empty_results_yield_zeroed_stats_without_price_range() {
        let stats = summarize::<Product>(&[]);

        assert_eq!(stats, Stats::empty());
        assert_eq!(
            serde_json::to_value(&stats).expect("encode"),
            serde_json::json!({"count": 0, "averagePrice": "0", "categories": []})
        );
    }

    #[test]
    fn aggregates_count_average_categories_and_range() {
        let results = vec![
            product("a", "marketing", 100, &[]),
            product("b", "vendas", 200, &[]),
            product("c", "analytics", 300, &[]),
        ];

        let stats = summarize(&results);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average_price, Decimal::from(200));
        assert_eq!(stats.categories, vec!["marketing", "vendas", "analytics"]);
        let range = stats.price_range.expect("price range for non-empty results");
        assert_eq!(range.min, Decimal::from(100));
        assert_eq!(range.max, Decimal::from(300));
    }

    #[test]
    fn categories_are_distinct_in_first_occurrence_order() {
        let results = vec![
            product("a", "vendas", 10, &[]),
            product("b", "marketing", 10, &[]),
            product("c", "vendas", 10, &[]),
            product("d", "analytics", 10, &[]),
            product("e", "marketing", 10, &[]),
        ];

        assert_eq!(summarize(&results).categories, vec!["vendas", "marketing", "analytics"]);
    }

    #[test]
    fn average_is_an_unrounded_quotient() {
        let results = vec![product("a", "x", 10, &[]), product("b", "x", 11, &[])];
        assert_eq!(summarize(&results).average_price, Decimal::new(105, 1));

        let thirds =
            vec![product("a", "x", 1, &[]), product("b", "x", 0, &[]), product("c", "x", 0, &[])];
        assert_eq!(summarize(&thirds).average_price, Decimal::ONE / Decimal::from(3));
    }

    #[test]
    fn average_survives_totals_past_decimal_max() {
        let mut first = product("a", "x", 0, &[]);
        first.price = Decimal::MAX;
        let mut second = product("b", "x", 0, &[]);
        second.price = Decimal::MAX;

        let stats = summarize(&[first, second]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_price, Decimal::MAX);
        let range = stats.price_range.expect("price range for non-empty results");
        assert_eq!(range.max, Decimal::MAX);
    }

    #[test]
    fn scored_products_summarize_like_products() {
        let scored = vec![
            ScoredProduct { product: product("a", "x", 40, &[]), score: 3 },
            ScoredProduct { product: product("b", "y", 60, &[]), score: 9 },
        ];

        let stats = summarize(&scored);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_price, Decimal::from(50));
        assert_eq!(stats.categories, vec!["x", "y"]);
    }
}
