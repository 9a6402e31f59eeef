use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use prodrec_core::config::{AppConfig, ConfigError, LoadOptions};
use toml::Value;

/// Env var that can override each described key.
const ENV_KEYS: &[(&str, &[&str])] = &[
    ("catalog.source", &["PRODREC_CATALOG_SOURCE"]),
    ("catalog.url", &["PRODREC_CATALOG_URL"]),
    ("catalog.path", &["PRODREC_CATALOG_PATH"]),
    ("catalog.timeout_secs", &["PRODREC_CATALOG_TIMEOUT_SECS"]),
    ("catalog.auth_token", &["PRODREC_CATALOG_AUTH_TOKEN"]),
    ("recommendation.default_mode", &["PRODREC_RECOMMENDATION_DEFAULT_MODE"]),
    ("recommendation.default_limit", &["PRODREC_RECOMMENDATION_DEFAULT_LIMIT"]),
    ("logging.level", &["PRODREC_LOGGING_LEVEL", "PRODREC_LOG_LEVEL"]),
    ("logging.format", &["PRODREC_LOGGING_FORMAT", "PRODREC_LOG_FORMAT"]),
];

pub fn run(options: LoadOptions) -> String {
    let loaded = AppConfig::load(options.clone());
    run_with_config(&options, loaded)
}

pub fn run_with_config(options: &LoadOptions, loaded: Result<AppConfig, ConfigError>) -> String {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config = match loaded {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value) in config.describe() {
        let source = field_source(key, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("prodrec.toml"), PathBuf::from("config/prodrec.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_keys = ENV_KEYS
        .iter()
        .find(|(key, _)| *key == key_path)
        .map(|(_, env_keys)| *env_keys)
        .unwrap_or_default();
    if let Some(env_key) = env_keys.iter().find(|env_key| env::var_os(env_key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
