//! Hard-constraint filtering
//!
//! Only `category`, `budget` and `experienceLevel` eliminate products.
//! `priceRange` is a scoring concern and is ignored here.

use super::types::Candidate;
use crate::catalog::Catalog;
use crate::domain::preferences::Preferences;
use crate::domain::product::Product;

/// Products that satisfy every set constraint, in catalog order.
pub fn filter<'a>(catalog: &'a Catalog, preferences: &Preferences) -> Vec<Candidate<'a>> {
    catalog
        .products()
        .iter()
        .enumerate()
        .filter(|(_, product)| admits(product, preferences))
        .map(|(position, product)| Candidate { position, product })
        .collect()
}

/// Whether a single product passes the hard constraints.
pub fn admits(product: &Product, preferences: &Preferences) -> bool {
    if let Some(category) = preferences.active_category() {
        if product.category != category {
            return false;
        }
    }

    if let Some(budget) = preferences.budget {
        if product.price > budget {
            return false;
        }
    }

    if let Some(allowed) = preferences.allowed_experience_tags() {
        if !product.has_any_tag(allowed) {
            return false;
        }
    }

    true
}
