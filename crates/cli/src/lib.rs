pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use prodrec_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(
    name = "prodrec",
    about = "Product recommendation CLI",
    long_about = "Recommend catalog products from user preferences, summarize result sets, and inspect runtime configuration.",
    after_help = "Examples:\n  prodrec recommend --preferences '{\"category\":\"marketing\"}'\n  prodrec recommend --preferences @prefs.json --mode multiple --limit 3 --explain\n  prodrec stats --input @results.json\n  prodrec doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Path to a prodrec.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Filter, score and rank the catalog against a set of preferences")]
    Recommend {
        #[arg(long, value_name = "JSON|@PATH", help = "Preferences as inline JSON or @file")]
        preferences: Option<String>,
        #[arg(long, help = "Recommendation mode: single or multiple")]
        mode: Option<String>,
        #[arg(long, help = "Maximum number of results in multiple mode")]
        limit: Option<usize>,
        #[arg(long, help = "Include a per-dimension score breakdown for each result")]
        explain: bool,
    },
    #[command(about = "Summarize a recommendation result set")]
    Stats {
        #[arg(long, value_name = "JSON|@PATH", help = "Results as inline JSON or @file")]
        input: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and check that the catalog source is reachable")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let load_options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    let loaded = AppConfig::load(load_options.clone());
    init_logging(loaded.as_ref().ok());

    let result = match cli.command {
        Command::Recommend { preferences, mode, limit, explain } => {
            commands::recommend::run_with_config(
                loaded,
                commands::recommend::RecommendRequest {
                    load_options,
                    preferences,
                    mode,
                    limit,
                    explain,
                },
            )
        }
        Command::Stats { input } => commands::stats::run(&input),
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run_with_config(&load_options, loaded),
        },
        Command::Doctor { json } => commands::CommandResult {
            exit_code: 0,
            output: commands::doctor::run_with_config(loaded, json),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a clean JSON document. A config that
/// fails to load still gets default logging; the command reports the error.
fn init_logging(config: Option<&AppConfig>) {
    let fallback = AppConfig::default();
    let config = config.unwrap_or(&fallback);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level(&config.logging))
        .with_writer(std::io::stderr);

    let initialized = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(error) = initialized {
        eprintln!("prodrec: logging disabled: {error}");
    }
}

fn log_level(logging: &LoggingConfig) -> Level {
    logging.level.trim().parse::<Level>().unwrap_or(Level::INFO)
}
