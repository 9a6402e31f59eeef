use prodrec_catalog::{load_catalog_or_empty, provider_from_config};
use prodrec_core::config::{AppConfig, ConfigError, LoadOptions};
use prodrec_core::{
    ApplicationError, Mode, ModeKind, Preferences, ProductId, Recommendation,
    RecommendationService, ScoreBreakdown, Stats,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{build_runtime, read_json_argument, CommandResult};

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
    pub load_options: LoadOptions,
    /// Inline JSON or `@path`; `None` means no preferences.
    pub preferences: Option<String>,
    pub mode: Option<String>,
    pub limit: Option<usize>,
    pub explain: bool,
}

#[derive(Debug, Serialize)]
struct RecommendOutput<'a> {
    command: &'static str,
    status: &'static str,
    mode: ModeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    catalog_size: usize,
    recommendation: &'a Recommendation,
    stats: Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanations: Option<Vec<Explanation>>,
}

#[derive(Debug, Serialize)]
struct Explanation {
    id: ProductId,
    score: u32,
    breakdown: ScoreBreakdown,
}

pub fn run(request: RecommendRequest) -> CommandResult {
    run_with_config(AppConfig::load(request.load_options.clone()), request)
}

/// Same as [`run`] with a config the caller already loaded from `load_options`.
pub fn run_with_config(
    loaded: Result<AppConfig, ConfigError>,
    request: RecommendRequest,
) -> CommandResult {
    let config = match loaded {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    };

    let preferences = match parse_preferences(request.preferences.as_deref()) {
        Ok(preferences) => preferences,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let mode = match resolve_mode(&config, request.mode.as_deref(), request.limit) {
        Ok(mode) => mode,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let provider = match provider_from_config(&config.catalog) {
        Ok(provider) => provider,
        Err(error) => return CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure(COMMAND, "runtime", message, 4),
    };

    let correlation_id = Uuid::new_v4().to_string();
    info!(
        event_name = "recommend.request.received",
        correlation_id = %correlation_id,
        mode = %mode.kind(),
        catalog_source = %provider.describe(),
        "recommendation requested"
    );

    let catalog = runtime.block_on(load_catalog_or_empty(provider.as_ref()));
    let service = RecommendationService::new(catalog);
    let recommendation = service.recommend(&preferences, mode);

    info!(
        event_name = "recommend.request.completed",
        correlation_id = %correlation_id,
        catalog_size = service.catalog().len(),
        result_count = recommendation.items().len(),
        "recommendation completed"
    );

    let explanations: Option<Vec<Explanation>> = request.explain.then(|| {
        recommendation
            .items()
            .iter()
            .map(|item| Explanation {
                id: item.product.id.clone(),
                score: item.score,
                breakdown: service.explain(&item.product, &preferences),
            })
            .collect()
    });

    let output = RecommendOutput {
        command: COMMAND,
        status: "ok",
        mode: mode.kind(),
        limit: match mode {
            Mode::Single => None,
            Mode::Multiple { limit } => Some(limit),
        },
        catalog_size: service.catalog().len(),
        recommendation: &recommendation,
        stats: recommendation.stats(),
        explanations,
    };

    CommandResult::json(COMMAND, &output)
}

pub(crate) fn parse_preferences(raw: Option<&str>) -> Result<Preferences, ApplicationError> {
    let Some(raw) = raw else {
        return Ok(Preferences::default());
    };

    let json = read_json_argument(raw)?;
    serde_json::from_str(&json)
        .map_err(|error| ApplicationError::InvalidInput(format!("invalid preferences: {error}")))
}

pub(crate) fn resolve_mode(
    config: &AppConfig,
    mode: Option<&str>,
    limit: Option<usize>,
) -> Result<Mode, ApplicationError> {
    let kind = match mode {
        Some(raw) => ModeKind::parse(raw).ok_or_else(|| {
            ApplicationError::InvalidInput(format!(
                "unsupported mode `{raw}` (expected single|multiple)"
            ))
        })?,
        None => config.recommendation.default_mode,
    };

    Ok(kind.with_limit(limit.unwrap_or(config.recommendation.default_limit)))
}

#[cfg(test)]
mod tests {
    use prodrec_core::config::AppConfig;
    use prodrec_core::{ExperienceLevel, Mode, ModeKind, Preferences};

    use super::{parse_preferences, resolve_mode};

    #[test]
    fn missing_preferences_mean_no_constraints() {
        let preferences = parse_preferences(None).expect("defaults");
        assert_eq!(preferences, Preferences::default());
    }

    #[test]
    fn inline_preferences_are_decoded() {
        let preferences =
            parse_preferences(Some(r#"{"category":"vendas","experienceLevel":"avançado"}"#))
                .expect("decode");

        assert_eq!(preferences.active_category(), Some("vendas"));
        assert_eq!(preferences.experience_level, Some(ExperienceLevel::Advanced));
    }

    #[test]
    fn malformed_preferences_are_invalid_input() {
        let error = parse_preferences(Some("{not json")).expect_err("should fail");
        assert_eq!(error.error_class(), "invalid_input");
    }

    #[test]
    fn mode_falls_back_to_config_defaults() {
        let mut config = AppConfig::default();
        assert_eq!(resolve_mode(&config, None, None).expect("mode"), Mode::Single);

        config.recommendation.default_mode = ModeKind::Multiple;
        config.recommendation.default_limit = 4;
        assert_eq!(resolve_mode(&config, None, None).expect("mode"), Mode::Multiple { limit: 4 });
        assert_eq!(
            resolve_mode(&config, Some("multiple"), Some(2)).expect("mode"),
            Mode::Multiple { limit: 2 }
        );
        assert_eq!(resolve_mode(&config, Some("single"), Some(2)).expect("mode"), Mode::Single);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let error = resolve_mode(&AppConfig::default(), Some("all"), None).expect_err("bad mode");
        assert_eq!(error.error_class(), "invalid_input");
    }
}
