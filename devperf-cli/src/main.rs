//! devperf - physically informed scoring for device performance predictions
//! Command-line interface for scoring predictions and evaluating exported model outputs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use devperf_ml::prelude::*;
use devperf_ml::report;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devperf")]
#[command(author = "DevPerf Contributors")]
#[command(version = "2026.1.16")]
#[command(about = "Physically informed loss and evaluation for device performance models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score predictions against references with the thresholded loss
    Score {
        /// Lower plausible bound
        #[arg(long, allow_negative_numbers = true)]
        lower: f64,

        /// Upper plausible bound
        #[arg(long, allow_negative_numbers = true)]
        upper: f64,

        /// Comma-separated predictions
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        predictions: Vec<f64>,

        /// Comma-separated references, same length as predictions
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        references: Vec<f64>,

        /// Power applied to the squared error outside [lower, upper]
        #[arg(long, default_value_t = 1)]
        out_of_range_power: u32,
    },

    /// Run one evaluation epoch over exported predictions
    Eval {
        /// Dataset JSON: {"samples": [{"inputs": [...], "labels": [...]}]},
        /// where inputs hold one prediction per target
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Evaluation config (eval.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Built-in target set (opv|ofet), overrides the config
        #[arg(long)]
        preset: Option<String>,

        /// Samples per batch, overrides the config
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Device (auto|cpu|cuda|cuda:N), overrides the config
        #[arg(long, env = "DEVPERF_DEVICE")]
        device: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List built-in target sets
    Presets,
}

/// Used when `RUST_LOG` is unset; the `devperf` prefix also covers `devperf_ml`.
const DEFAULT_LOG_FILTER: &str = "devperf=info";

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            lower,
            upper,
            predictions,
            references,
            out_of_range_power,
        } => score_command(lower, upper, &predictions, &references, out_of_range_power),

        Commands::Eval {
            data,
            config,
            preset,
            batch_size,
            device,
            json,
        } => {
            let overrides = EvalOverrides {
                preset,
                batch_size,
                device,
            };
            eval_command(&data, config.as_deref(), &overrides, json)
        }

        Commands::Presets => {
            print_presets();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

// ============================================================================
// Scoring
// ============================================================================

fn score_command(
    lower: f64,
    upper: f64,
    predictions: &[f64],
    references: &[f64],
    out_of_range_power: u32,
) -> Result<()> {
    let loss = ThresholdedMseLoss::new(lower, upper)?.with_out_of_range_power(out_of_range_power)?;
    let out = loss
        .score(predictions, references)
        .context("failed to score predictions")?;

    println!(
        "{} {} element(s) against [{}, {}]",
        "Scored".green().bold(),
        out.total,
        lower,
        upper
    );
    println!("  mean penalty  = {}", report::format_f64_6(out.mean_penalty).cyan());
    println!(
        "  accuracy      = {} ({}/{})",
        report::format_f64_6(out.accuracy).cyan(),
        out.correct,
        out.total
    );
    println!("  out of range  = {}", out.out_of_range);

    Ok(())
}

// ============================================================================
// Evaluation
// ============================================================================

#[derive(Debug, Default)]
struct EvalOverrides {
    preset: Option<String>,
    batch_size: Option<usize>,
    device: Option<String>,
}

/// Load the config (or defaults) and apply command-line overrides.
fn resolve_config(config: Option<&Path>, overrides: &EvalOverrides) -> Result<EvalConfig> {
    let mut cfg = match config {
        Some(path) => EvalConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EvalConfig::default(),
    };

    if let Some(preset) = &overrides.preset {
        cfg.preset = Some(preset.clone());
        cfg.targets.clear();
    }
    if let Some(batch_size) = overrides.batch_size {
        cfg.batch_size = batch_size;
    }
    if let Some(device) = &overrides.device {
        cfg.device = device.parse()?;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn eval_command(
    data: &Path,
    config: Option<&Path>,
    overrides: &EvalOverrides,
    json: bool,
) -> Result<()> {
    let cfg = resolve_config(config, overrides)?;
    let targets = cfg.target_set()?;

    let dataset = Dataset::from_json_file(data)
        .with_context(|| format!("failed to load dataset {}", data.display()))?;
    dataset.validate(targets.len())?;

    let ctx = ExecutionContext::new(cfg.device.resolve());
    tracing::info!(
        samples = dataset.len(),
        batch_size = cfg.batch_size,
        device = %ctx.device(),
        "starting evaluation"
    );

    if !json {
        println!(
            "{} {} sample(s) from {} on {}",
            "Evaluating".green().bold(),
            dataset.len(),
            data.display().to_string().cyan(),
            ctx.device()
        );
    }

    let mut model = PrecomputedModel::new(targets.len());
    let summary = evaluate(&mut model, dataset.batches(cfg.batch_size)?, &targets, &ctx)
        .context("evaluation pass failed")?;

    if json {
        println!("{}", report::to_json(&summary)?);
    } else {
        print!("{}", report::render_text(&summary));
        println!("{}", "    Finished".green().bold());
    }

    Ok(())
}

// ============================================================================
// Presets
// ============================================================================

fn print_presets() {
    println!("{}", "Built-in target sets:".bold());
    for preset in Preset::all() {
        let set = preset.target_set();
        let bounds = set
            .iter()
            .next()
            .map(|t| format!("[{}, {}]", t.loss.lower(), t.loss.upper()))
            .unwrap_or_default();
        println!(
            "  {:<6} {} {} ({})",
            preset.name().cyan(),
            set.names().join(", "),
            bounds,
            preset.description()
        );
    }
}
