//! flatmap: export a 1-D Hermite mesh snapshot as a flatmap.
//!
//! Loads a [`MemoryModel`](flatmap_pipeline::MemoryModel) JSON snapshot,
//! converts its curve mesh to Bezier paths and its marker data points to
//! labelled circles, and writes `<prefix>.svg` plus `properties.json`
//! into the output directory.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin flatmap -- [OPTIONS] <MODEL_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flatmap_io::ExportOptions;
use flatmap_pipeline::{FlatmapConfig, IdentifierStrategyKind, MemoryModel};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Export a 1-D cubic Hermite mesh snapshot to flatmap SVG and properties.
#[derive(Parser)]
#[command(name = "flatmap", version)]
struct Cli {
    /// Path to the model snapshot (JSON).
    model_path: PathBuf,

    /// Directory receiving the SVG and properties.json.
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,

    /// SVG file stem.
    #[arg(long, default_value = ExportOptions::DEFAULT_PREFIX)]
    prefix: String,

    /// Coordinate field interpolated over the curve mesh.
    #[arg(long, default_value = FlatmapConfig::DEFAULT_COORDINATE_FIELD)]
    coordinate_field: String,

    /// Seed for synthesized marker identifiers (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Full flatmap config as a JSON string.
    ///
    /// When provided, `--coordinate-field` and `--seed` are ignored.
    /// The JSON must be a valid `FlatmapConfig` serialization; missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Build a [`FlatmapConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual config flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<FlatmapConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(FlatmapConfig {
        coordinate_field: cli.coordinate_field.clone(),
        identifier_strategy: cli
            .seed
            .map_or(IdentifierStrategyKind::Random, |seed| {
                IdentifierStrategyKind::Seeded { seed }
            }),
        ..FlatmapConfig::default()
    })
}

fn log_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error installing logger: {e}");
        return ExitCode::FAILURE;
    }

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            error!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let snapshot = match std::fs::read_to_string(&cli.model_path) {
        Ok(text) => text,
        Err(e) => {
            error!("Error reading {}: {e}", cli.model_path.display());
            return ExitCode::FAILURE;
        }
    };
    let model = match MemoryModel::from_json(&snapshot) {
        Ok(model) => model,
        Err(e) => {
            error!("Error loading {}: {e}", cli.model_path.display());
            return ExitCode::FAILURE;
        }
    };
    info!(model = %cli.model_path.display(), "loaded model snapshot");

    let options = ExportOptions {
        output_dir: cli.output_dir,
        prefix: cli.prefix,
    };
    match flatmap_io::export(&model, &config, &options) {
        Ok(paths) => {
            println!("{}", paths.svg.display());
            println!("{}", paths.properties.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Export failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("flatmap").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_from_flags() {
        let cli = parse(&["model.json"]);
        assert_eq!(cli.prefix, "flatmap");
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(config_from_cli(&cli), Ok(FlatmapConfig::default()));
    }

    #[test]
    fn seed_selects_seeded_strategy() {
        let cli = parse(&["model.json", "--seed", "5", "--coordinate-field", "flat"]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(
            config.identifier_strategy,
            IdentifierStrategyKind::Seeded { seed: 5 }
        );
        assert_eq!(config.coordinate_field, "flat");
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "model.json",
            "--seed",
            "5",
            "--config-json",
            r#"{"reserved_group_name": "landmarks"}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.reserved_group_name, "landmarks");
        assert_eq!(config.identifier_strategy, IdentifierStrategyKind::Random);
    }

    #[test]
    fn invalid_config_json_is_reported() {
        let cli = parse(&["model.json", "--config-json", "{not json"]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.starts_with("Error parsing --config-json"), "{err}");
    }

    #[test]
    fn log_level_names() {
        assert_eq!(log_level("DEBUG"), Level::DEBUG);
        assert_eq!(log_level("warn"), Level::WARN);
        assert_eq!(log_level("bogus"), Level::INFO);
    }
}
