use prodrec_core::{summarize, ApplicationError, Product, Stats};
use serde::Serialize;
use serde_json::Value;

use super::{read_json_argument, CommandResult};

const COMMAND: &str = "stats";

#[derive(Debug, Serialize)]
struct StatsOutput {
    command: &'static str,
    status: &'static str,
    stats: Stats,
}

/// Summarize a result set given as inline JSON or `@path`.
pub fn run(input: &str) -> CommandResult {
    let results = match read_json_argument(input).and_then(|raw| parse_results(&raw)) {
        Ok(results) => results,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    CommandResult::json(
        COMMAND,
        &StatsOutput { command: COMMAND, status: "ok", stats: summarize(&results) },
    )
}

/// Accepts an array of products, a single product, or `null` for no results.
pub(crate) fn parse_results(raw: &str) -> Result<Vec<Product>, ApplicationError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|error| ApplicationError::InvalidInput(format!("invalid results: {error}")))?;

    let decoded = match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(value),
        Value::Object(_) => serde_json::from_value(value).map(|product: Product| vec![product]),
        _ => {
            return Err(ApplicationError::InvalidInput(
                "results must be a product, an array of products, or null".to_string(),
            ))
        }
    };

    decoded.map_err(|error| ApplicationError::InvalidInput(format!("invalid results: {error}")))
}

#[cfg(test)]
mod tests {
    use super::parse_results;

    #[test]
    fn null_means_no_results() {
        assert!(parse_results("null").expect("null").is_empty());
    }

    #[test]
    fn scored_results_are_accepted() {
        let results = parse_results(
            r#"[{"id":1,"name":"A","category":"marketing","price":"100","tags":[],"description":"","score":13}]"#,
        )
        .expect("array");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, "marketing");
    }

    #[test]
    fn single_object_is_one_result() {
        let results =
            parse_results(r#"{"id":"x","name":"X","category":"vendas","price":10}"#).expect("object");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn scalars_are_rejected() {
        let error = parse_results("42").expect_err("scalar");
        assert_eq!(error.error_class(), "invalid_input");
    }
}
