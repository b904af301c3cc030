//! lutmos command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use lutmos_core::Quantity;
use lutmos_engine::{EstimateMethod, EstimateMode, LengthAnswer, LutEngine};
use lutmos_loader::Manifest;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lutmos")]
#[command(about = "gm/Id lookup tables for analog transistor sizing", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON manifest listing the sweep CSVs of every bias plane
    #[arg(short, long, value_name = "FILE")]
    manifest: PathBuf,

    /// Verbose logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the tabulated channel lengths
    Lengths,

    /// Predict device figures at an operating point
    #[command(allow_negative_numbers = true)]
    Predict {
        /// gm/Id (1/V)
        #[arg(long)]
        gm_id: f64,
        /// Drain-source bias (V)
        #[arg(long)]
        bias: f64,
        /// Channel length (nm)
        #[arg(long)]
        length: f64,
        /// Only this quantity: id_w, gmro or ft
        #[arg(long)]
        quantity: Option<String>,
    },

    /// Estimate the channel length that produced a measured gmro
    #[command(allow_negative_numbers = true)]
    EstimateLength {
        /// gm/Id (1/V)
        #[arg(long)]
        gm_id: f64,
        /// Measured intrinsic gain
        #[arg(long)]
        gmro: f64,
        /// Drain-source bias (V)
        #[arg(long)]
        bias: f64,
        /// Also report the interpolated length
        #[arg(long)]
        continuous: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let manifest = Manifest::from_path(&cli.manifest)
        .with_context(|| format!("Failed to read manifest: {}", cli.manifest.display()))?;
    let engine = manifest
        .into_engine()
        .context("Failed to build lookup table")?;
    log::info!(
        "loaded {} ({} bias planes, {} lengths)",
        cli.manifest.display(),
        plane_total(&engine),
        engine.lengths().map_or(0, <[i64]>::len)
    );

    match &cli.command {
        Command::Lengths => lengths(&engine, cli.json),
        Command::Predict {
            gm_id,
            bias,
            length,
            quantity,
        } => predict(&engine, *gm_id, *bias, *length, quantity.as_deref(), cli.json),
        Command::EstimateLength {
            gm_id,
            gmro,
            bias,
            continuous,
        } => {
            let mode = if *continuous {
                EstimateMode::Continuous
            } else {
                EstimateMode::Discrete
            };
            estimate_length(&engine, *gm_id, *gmro, *bias, mode, cli.json)
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

/// Non-empty planes summed over every quantity.
fn plane_total(engine: &LutEngine) -> usize {
    Quantity::ALL.iter().map(|&q| engine.plane_count(q)).sum()
}

/// Print `value` as JSON, or `text` otherwise.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn lengths(engine: &LutEngine, json: bool) -> Result<()> {
    let lengths = engine.lengths().unwrap_or(&[]);
    emit(json, &lengths, || {
        let joined: Vec<String> = lengths.iter().map(i64::to_string).collect();
        format!("Available channel lengths (nm): {}", joined.join(", "))
    })
}

fn predict(
    engine: &LutEngine,
    gm_id: f64,
    bias: f64,
    length: f64,
    quantity: Option<&str>,
    json: bool,
) -> Result<()> {
    match quantity {
        Some(name) => {
            let quantity: Quantity = name.parse()?;
            let prediction = engine
                .predict_detailed(quantity, gm_id, bias, length)
                .with_context(|| format!("Failed to predict {}", quantity))?;
            emit(json, &prediction, || {
                format!("{} = {}", quantity, prediction.value)
            })
        }
        None => {
            let figures = engine
                .predict_all(gm_id, bias, length)
                .context("Failed to predict device figures")?;
            emit(json, &figures, || {
                figures
                    .iter()
                    .map(|(q, v)| format!("{:<4} = {}", q.name(), v))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}

fn estimate_length(
    engine: &LutEngine,
    gm_id: f64,
    gmro: f64,
    bias: f64,
    mode: EstimateMode,
    json: bool,
) -> Result<()> {
    let estimate = engine
        .estimate_length_detailed(gm_id, gmro, bias)
        .context("Failed to estimate length")?;

    emit(json, &estimate, || {
        let mut lines = vec![format!("Snapped to bias plane {} V", estimate.plane_bias)];
        if estimate.method == EstimateMethod::Nearest {
            lines.push("gmro not bracketed; using the nearest tabulated length".to_string());
        }
        match estimate.answer(mode) {
            LengthAnswer::Discrete(length) => {
                lines.push(format!("Chosen discrete length (nm) = {}", length));
            }
            LengthAnswer::Continuous {
                continuous_nm,
                discrete_nm,
            } => {
                lines.push(format!("Estimated continuous L* (nm) = {}", continuous_nm));
                lines.push(format!("Chosen discrete length (nm)  = {}", discrete_nm));
            }
        }
        lines.join("\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate_length() {
        let cli = Cli::try_parse_from([
            "lutmos",
            "--manifest",
            "nmos.json",
            "-vv",
            "estimate-length",
            "--gm-id",
            "10",
            "--gmro",
            "35",
            "--bias",
            "0.4",
            "--continuous",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::EstimateLength {
                continuous: true,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_negative_bias() {
        let cli = Cli::try_parse_from([
            "lutmos", "-m", "pmos.json", "predict", "--gm-id", "12", "--bias", "-0.4",
            "--length", "360", "--quantity", "ft",
        ])
        .unwrap();
        match cli.command {
            Command::Predict { bias, quantity, .. } => {
                assert_eq!(bias, -0.4);
                assert_eq!(quantity.as_deref(), Some("ft"));
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_logger_installs_once() {
        assert!(init_logging(0).is_ok());
        let err = init_logging(1).unwrap_err();
        assert!(err.to_string().starts_with("Failed to install logger"));
    }

    #[test]
    fn test_plane_total() {
        let mut engine = LutEngine::new();
        assert_eq!(plane_total(&engine), 0);
        let rows = [
            lutmos_core::SampleRow::new(5.0, 100.0, 1.0),
            lutmos_core::SampleRow::new(10.0, 200.0, 2.0),
        ];
        for bias in [0.2, 0.4] {
            engine.record(Quantity::Gmro, bias, rows).unwrap();
        }
        engine.record(Quantity::Ft, 0.2, rows).unwrap();
        assert_eq!(plane_total(&engine), 3);
    }
}
