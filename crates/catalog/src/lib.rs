//! Catalog providers for the recommender.
//!
//! The core pipeline never performs I/O. This crate supplies the catalog
//! snapshot it works on, either from the catalog HTTP service or from a JSON
//! file, and degrades to an empty catalog when the source is unavailable.

pub mod file;
pub mod http;

pub use file::FileCatalogProvider;
pub use http::HttpCatalogProvider;

use prodrec_core::config::{CatalogConfig, CatalogSource};
use prodrec_core::{Catalog, CatalogError, CatalogProvider};
use tracing::{info, warn};

/// Build the provider selected by configuration.
pub fn provider_from_config(
    config: &CatalogConfig,
) -> Result<Box<dyn CatalogProvider>, CatalogError> {
    match config.source {
        CatalogSource::Http => Ok(Box::new(HttpCatalogProvider::from_config(config)?)),
        CatalogSource::File => {
            let path = config.path.clone().ok_or_else(|| CatalogError::Io {
                path: Default::default(),
                message: "catalog.path is not configured".to_string(),
            })?;
            Ok(Box::new(FileCatalogProvider::new(path)))
        }
    }
}

/// Fetch a snapshot, or an empty catalog if the provider fails.
///
/// An empty catalog makes every recommendation a "no match" instead of an error.
pub async fn load_catalog_or_empty(provider: &dyn CatalogProvider) -> Catalog {
    match provider.fetch_catalog().await {
        Ok(catalog) => {
            info!(
                event_name = "catalog.load.succeeded",
                source = %provider.describe(),
                product_count = catalog.len(),
                "catalog snapshot loaded"
            );
            catalog
        }
        Err(error) => {
            warn!(
                event_name = "catalog.load.failed",
                source = %provider.describe(),
                error = %error,
                "catalog unavailable, continuing with an empty catalog"
            );
            Catalog::default()
        }
    }
}
