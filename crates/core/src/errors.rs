use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog request to `{url}` failed: {message}")]
    Transport { url: String, message: String },
    #[error("catalog endpoint `{url}` returned status {status}")]
    Status { url: String, status: u16 },
    #[error("could not read catalog file `{path}`: {message}")]
    Io { path: PathBuf, message: String },
    #[error("could not decode catalog: {0}")]
    Decode(String),
    #[error("invalid catalog product `{id}`: {reason}")]
    InvalidProduct { id: String, reason: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApplicationError {
    /// Stable machine-readable class for command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Catalog(_) => "catalog",
            Self::Configuration(_) => "config_validation",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput(_) => 1,
            Self::Configuration(_) => 2,
            Self::Catalog(_) => 3,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Catalog(_) => "The product catalog could not be loaded. Please retry shortly.",
            Self::Configuration(_) => "The recommender is misconfigured. Check the config file.",
            Self::InvalidInput(_) => "The request could not be processed. Check inputs and try again.",
        }
    }
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::errors::{ApplicationError, CatalogError};

    #[test]
    fn catalog_error_maps_to_catalog_class() {
        let error = ApplicationError::from(CatalogError::Status {
            url: "http://localhost:3001/products".to_owned(),
            status: 503,
        });

        assert_eq!(error.error_class(), "catalog");
        assert_eq!(error.exit_code(), 3);
        assert!(error.to_string().contains("503"));
    }

    #[test]
    fn config_error_maps_to_config_validation() {
        let error = ApplicationError::from(ConfigError::Validation(
            "catalog.timeout_secs must be in range 1..=300".to_owned(),
        ));

        assert_eq!(error.error_class(), "config_validation");
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("catalog.timeout_secs"));
    }

    #[test]
    fn invalid_input_has_user_safe_message() {
        let error = ApplicationError::InvalidInput("preferences must be a JSON object".to_owned());

        assert_eq!(error.error_class(), "invalid_input");
        assert_eq!(
            error.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }
}
