use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawProductId")]
pub struct ProductId(pub String);

/// Catalog feeds carry ids either as JSON numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Integer(i64),
    Text(String),
}

impl From<RawProductId> for ProductId {
    fn from(raw: RawProductId) -> Self {
        match raw {
            RawProductId::Integer(value) => Self(value.to_string()),
            RawProductId::Text(value) => Self(value),
        }
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    /// Topical markers and experience-level markers share this list.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Product {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }
}

impl AsRef<Product> for Product {
    fn as_ref(&self) -> &Product {
        self
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Product, ProductId};

    #[test]
    fn product_id_accepts_numeric_and_string_json() {
        let numeric: ProductId = serde_json::from_str("7").expect("numeric id");
        let text: ProductId = serde_json::from_str("\"course-7\"").expect("string id");

        assert_eq!(numeric, ProductId("7".to_owned()));
        assert_eq!(text, ProductId("course-7".to_owned()));
    }

    #[test]
    fn product_decodes_from_catalog_feed_shape() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Marketing Digital Básico",
                "category": "marketing",
                "price": 99.00,
                "tags": ["iniciante", "marketing", "digital"],
                "description": "Curso introdutório de marketing digital"
            }"#,
        )
        .expect("product should decode");

        assert_eq!(product.id, ProductId::from("1"));
        assert_eq!(product.price, Decimal::from(99));
        assert!(product.has_tag("digital"));
        assert!(!product.has_tag("vendas"));
        assert!(product.has_any_tag(&["avançado", "iniciante"]));
    }

    #[test]
    fn missing_tags_and_description_default_to_empty() {
        let product: Product =
            serde_json::from_str(r#"{"id":"x","name":"X","category":"c","price":"10.50"}"#)
                .expect("product should decode");

        assert!(product.tags.is_empty());
        assert!(product.description.is_empty());
        assert_eq!(product.price, Decimal::new(1050, 2));
    }
}
