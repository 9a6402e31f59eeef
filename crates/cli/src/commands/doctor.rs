use std::time::Instant;

use prodrec_catalog::provider_from_config;
use prodrec_core::config::{AppConfig, ConfigError, LoadOptions};
use serde::Serialize;

use super::build_runtime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    elapsed_ms: u64,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> String {
    let started = Instant::now();
    let loaded = AppConfig::load(options);
    render(build_report(loaded, elapsed_ms(started)), json_output)
}

pub fn run_with_config(loaded: Result<AppConfig, ConfigError>, json_output: bool) -> String {
    render(build_report(loaded, 0), json_output)
}

fn render(report: DoctorReport, json_output: bool) -> String {
    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(loaded: Result<AppConfig, ConfigError>, load_ms: u64) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                elapsed_ms: load_ms,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_catalog(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                elapsed_ms: load_ms,
                details: error.to_string(),
            });
            checks.push(skipped("catalog_reachability"));
            checks.push(skipped("catalog_contents"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Fetches the catalog directly, without the empty-catalog fallback, so that
/// an unreachable source shows up as a failure here.
fn check_catalog(config: &AppConfig) -> Vec<DoctorCheck> {
    let started = Instant::now();
    let provider = match provider_from_config(&config.catalog) {
        Ok(provider) => provider,
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "catalog_reachability",
                    status: CheckStatus::Fail,
                    elapsed_ms: elapsed_ms(started),
                    details: error.to_string(),
                },
                skipped("catalog_contents"),
            ];
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(message) => {
            return vec![
                DoctorCheck {
                    name: "catalog_reachability",
                    status: CheckStatus::Fail,
                    elapsed_ms: elapsed_ms(started),
                    details: message,
                },
                skipped("catalog_contents"),
            ];
        }
    };

    match runtime.block_on(provider.fetch_catalog()) {
        Ok(catalog) => {
            let reachability = DoctorCheck {
                name: "catalog_reachability",
                status: CheckStatus::Pass,
                elapsed_ms: elapsed_ms(started),
                details: format!("loaded catalog from `{}`", provider.describe()),
            };
            let contents = if catalog.is_empty() {
                DoctorCheck {
                    name: "catalog_contents",
                    status: CheckStatus::Fail,
                    elapsed_ms: 0,
                    details: "catalog is empty; every recommendation will be a no-match".to_string(),
                }
            } else {
                DoctorCheck {
                    name: "catalog_contents",
                    status: CheckStatus::Pass,
                    elapsed_ms: 0,
                    details: format!("{} products available", catalog.len()),
                }
            };
            vec![reachability, contents]
        }
        Err(error) => vec![
            DoctorCheck {
                name: "catalog_reachability",
                status: CheckStatus::Fail,
                elapsed_ms: elapsed_ms(started),
                details: error.to_string(),
            },
            skipped("catalog_contents"),
        ],
    }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        elapsed_ms: 0,
        details: "skipped due to previous failure".to_string(),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
