use std::time::Duration;

use async_trait::async_trait;
use prodrec_core::config::CatalogConfig;
use prodrec_core::{Catalog, CatalogError, CatalogProvider};
use reqwest::header::ACCEPT;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Fetches the catalog feed (a JSON array of products) over HTTP.
#[derive(Clone, Debug)]
pub struct HttpCatalogProvider {
    client: Client,
    url: String,
    auth_token: Option<SecretString>,
}

impl HttpCatalogProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: Client::new(), url: url.into(), auth_token: None }
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| CatalogError::Transport {
                url: config.url.clone(),
                message: format!("failed to build http client: {error}"),
            })?;

        Ok(Self { client, url: config.url.clone(), auth_token: config.auth_token.clone() })
    }

    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let mut request = self.client.get(&self.url).header(ACCEPT, "application/json");
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|error| CatalogError::Transport {
            url: self.url.clone(),
            message: error.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { url: self.url.clone(), status: status.as_u16() });
        }

        let body = response.text().await.map_err(|error| CatalogError::Transport {
            url: self.url.clone(),
            message: error.to_string(),
        })?;
        debug!(
            event_name = "catalog.http.response_received",
            url = %self.url,
            body_bytes = body.len(),
            "catalog response received"
        );

        Catalog::from_json(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
