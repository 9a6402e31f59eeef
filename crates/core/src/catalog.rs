use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};
use crate::errors::CatalogError;

/// Immutable, ordered catalog snapshot. Catalog order is the ranking tie-break.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Build a catalog, rejecting duplicate ids and negative prices.
    pub fn try_new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.price < Decimal::ZERO {
                return Err(CatalogError::InvalidProduct {
                    id: product.id.to_string(),
                    reason: format!("negative price {}", product.price),
                });
            }
            if !seen.insert(&product.id) {
                return Err(CatalogError::InvalidProduct {
                    id: product.id.to_string(),
                    reason: "duplicate product id".to_owned(),
                });
            }
        }

        Ok(Self { products })
    }

    /// Decode the catalog feed format: a JSON array of products.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> =
            serde_json::from_str(raw).map_err(|error| CatalogError::Decode(error.to_string()))?;
        Self::try_new(products)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Source of catalog snapshots. Implementations own all I/O.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError>;

    /// Human-readable source, e.g. a URL or file path.
    fn describe(&self) -> String;
}

/// Provider that hands out a fixed in-memory snapshot.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalogProvider {
    catalog: Catalog,
}

impl StaticCatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalogProvider {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        Ok(self.catalog.clone())
    }

    fn describe(&self) -> String {
        format!("static catalog ({} products)", self.catalog.len())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Catalog, CatalogProvider, StaticCatalogProvider};
    use crate::domain::product::ProductId;
    use crate::errors::CatalogError;
    use crate::recommend::test_support::{course_catalog, product};

    #[test]
    fn from_json_keeps_feed_order() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": 2, "name": "B", "category": "vendas", "price": 199, "tags": ["vendas"]},
                {"id": 1, "name": "A", "category": "marketing", "price": 99.5, "tags": []}
            ]"#,
        )
        .expect("catalog should decode");

        let ids: Vec<&str> = catalog.products().iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(catalog.products()[1].price, Decimal::new(995, 1));
    }

    #[test]
    fn from_json_rejects_non_array_payloads() {
        let error = Catalog::from_json(r#"{"products": []}"#).expect_err("object is not a feed");
        assert!(matches!(error, CatalogError::Decode(_)));
    }

    #[test]
    fn try_new_rejects_duplicates_and_negative_prices() {
        let duplicate = Catalog::try_new(vec![product("a", "x", 1, &[]), product("a", "y", 2, &[])]);
        assert!(matches!(
            duplicate,
            Err(CatalogError::InvalidProduct { ref id, .. }) if id == "a"
        ));

        let negative = Catalog::try_new(vec![product("n", "x", -1, &[])]);
        assert!(matches!(negative, Err(CatalogError::InvalidProduct { .. })));
    }

    #[test]
    fn find_locates_products_by_id() {
        let catalog = course_catalog();
        assert_eq!(catalog.find(&ProductId::from("2")).map(|p| p.category.as_str()), Some("vendas"));
        assert!(catalog.find(&ProductId::from("99")).is_none());
    }

    #[tokio::test]
    async fn static_provider_returns_its_snapshot() {
        let provider = StaticCatalogProvider::new(course_catalog());
        let catalog = provider.fetch_catalog().await.expect("static provider never fails");

        assert_eq!(catalog, course_catalog());
        assert_eq!(provider.describe(), "static catalog (3 products)");
    }
}
