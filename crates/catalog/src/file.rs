use std::path::{Path, PathBuf};

use async_trait::async_trait;
use prodrec_core::{Catalog, CatalogError, CatalogProvider};

/// Reads the catalog feed from a JSON file on disk.
#[derive(Clone, Debug)]
pub struct FileCatalogProvider {
    path: PathBuf,
}

impl FileCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogProvider for FileCatalogProvider {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
            CatalogError::Io { path: self.path.clone(), message: error.to_string() }
        })?;

        Catalog::from_json(&raw)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
