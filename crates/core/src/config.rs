use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommend::{Mode, ModeKind, DEFAULT_LIMIT};

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:3001/products";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub recommendation: RecommendationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    pub url: String,
    pub path: Option<PathBuf>,
    pub timeout_secs: u64,
    pub auth_token: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct RecommendationConfig {
    pub default_mode: ModeKind,
    pub default_limit: usize,
}

impl RecommendationConfig {
    pub fn default_mode(&self) -> Mode {
        self.default_mode.with_limit(self.default_limit)
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    Http,
    File,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_source: Option<CatalogSource>,
    pub catalog_url: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub default_mode: Option<ModeKind>,
    pub default_limit: Option<usize>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                source: CatalogSource::Http,
                url: DEFAULT_CATALOG_URL.to_string(),
                path: None,
                timeout_secs: 10,
                auth_token: None,
            },
            recommendation: RecommendationConfig {
                default_mode: ModeKind::Single,
                default_limit: DEFAULT_LIMIT,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for CatalogSource {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "file" => Ok(Self::File),
            other => Err(ConfigError::Validation(format!(
                "unsupported catalog source `{other}` (expected http|file)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("prodrec.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(source) = catalog.source {
                self.catalog.source = source;
            }
            if let Some(url) = catalog.url {
                self.catalog.url = url;
            }
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
            if let Some(timeout_secs) = catalog.timeout_secs {
                self.catalog.timeout_secs = timeout_secs;
            }
            if let Some(auth_token) = catalog.auth_token {
                self.catalog.auth_token = Some(SecretString::from(auth_token));
            }
        }

        if let Some(recommendation) = patch.recommendation {
            if let Some(default_mode) = recommendation.default_mode {
                self.recommendation.default_mode = default_mode;
            }
            if let Some(default_limit) = recommendation.default_limit {
                self.recommendation.default_limit = default_limit;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PRODREC_CATALOG_SOURCE") {
            self.catalog.source = value.parse()?;
        }
        if let Some(value) = read_env("PRODREC_CATALOG_URL") {
            self.catalog.url = value;
        }
        if let Some(value) = read_env("PRODREC_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("PRODREC_CATALOG_TIMEOUT_SECS") {
            self.catalog.timeout_secs = parse_u64("PRODREC_CATALOG_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("PRODREC_CATALOG_AUTH_TOKEN") {
            self.catalog.auth_token = Some(SecretString::from(value));
        }

        if let Some(value) = read_env("PRODREC_RECOMMENDATION_DEFAULT_MODE") {
            self.recommendation.default_mode = ModeKind::parse(&value).ok_or_else(|| {
                ConfigError::InvalidEnvOverride {
                    key: "PRODREC_RECOMMENDATION_DEFAULT_MODE".to_string(),
                    value: value.clone(),
                }
            })?;
        }
        if let Some(value) = read_env("PRODREC_RECOMMENDATION_DEFAULT_LIMIT") {
            self.recommendation.default_limit =
                parse_usize("PRODREC_RECOMMENDATION_DEFAULT_LIMIT", &value)?;
        }

        let log_level = read_env("PRODREC_LOGGING_LEVEL").or_else(|| read_env("PRODREC_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PRODREC_LOGGING_FORMAT").or_else(|| read_env("PRODREC_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(source) = overrides.catalog_source {
            self.catalog.source = source;
        }
        if let Some(url) = overrides.catalog_url {
            self.catalog.url = url;
        }
        if let Some(path) = overrides.catalog_path {
            self.catalog.path = Some(path);
        }
        if let Some(default_mode) = overrides.default_mode {
            self.recommendation.default_mode = default_mode;
        }
        if let Some(default_limit) = overrides.default_limit {
            self.recommendation.default_limit = default_limit;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_recommendation(&self.recommendation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }

    /// Effective settings as displayable key/value pairs, secrets redacted.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let source = match self.catalog.source {
            CatalogSource::Http => "http",
            CatalogSource::File => "file",
        };
        let format = match self.logging.format {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        };
        let auth_token = match &self.catalog.auth_token {
            Some(token) if !token.expose_secret().is_empty() => "<redacted>".to_string(),
            _ => "<unset>".to_string(),
        };

        vec![
            ("catalog.source", source.to_string()),
            ("catalog.url", self.catalog.url.clone()),
            (
                "catalog.path",
                self.catalog
                    .path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "<unset>".to_string()),
            ),
            ("catalog.timeout_secs", self.catalog.timeout_secs.to_string()),
            ("catalog.auth_token", auth_token),
            ("recommendation.default_mode", self.recommendation.default_mode.to_string()),
            ("recommendation.default_limit", self.recommendation.default_limit.to_string()),
            ("logging.level", self.logging.level.clone()),
            ("logging.format", format.to_string()),
        ]
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("prodrec.toml"), PathBuf::from("config/prodrec.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.timeout_secs == 0 || catalog.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "catalog.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    match catalog.source {
        CatalogSource::Http => {
            let url = catalog.url.trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(
                    "catalog.url must start with http:// or https://".to_string(),
                ));
            }
        }
        CatalogSource::File => {
            let missing = catalog
                .path
                .as_ref()
                .map(|path| path.as_os_str().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "catalog.path is required when catalog.source is `file`".to_string(),
                ));
            }
        }
    }

    Ok(())
}

fn validate_recommendation(recommendation: &RecommendationConfig) -> Result<(), ConfigError> {
    if recommendation.default_limit == 0 {
        return Err(ConfigError::Validation(
            "recommendation.default_limit must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    recommendation: Option<RecommendationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    source: Option<CatalogSource>,
    url: Option<String>,
    path: Option<PathBuf>,
    timeout_secs: Option<u64>,
    auth_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    default_mode: Option<ModeKind>,
    default_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
