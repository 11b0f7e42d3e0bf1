//! SignalBT CLI: run signal backtests and manage config files.
//!
//! Commands:
//! - `run`: backtest model signals from CSV files (or synthetic data) and write ledgers
//! - `init-config`: write the default TOML config

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use signalbt_core::BacktestConfig;
use signalbt_runner::{
    load_prices, load_signals, run_models, save_artifacts, summary_line, synthetic_prices,
    synthetic_signals, RunOptions,
};

/// Models used for `run --synthetic`, named after the usual research line-up.
const SYNTHETIC_MODELS: [&str; 4] = ["random_forest", "xgboost", "lightgbm", "stacking"];

#[derive(Parser)]
#[command(
    name = "signalbt",
    about = "SignalBT CLI: profit-target / stop-loss backtests of binary model signals"
)]
struct Cli {
    /// Log trade narration (debug level). RUST_LOG overrides.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest model signals against a price series.
    Run {
        /// Price CSV (timestamp/date + close columns).
        #[arg(long, required_unless_present = "synthetic")]
        prices: Option<PathBuf>,

        /// Signal CSV, one column per model.
        #[arg(long, required_unless_present = "synthetic")]
        signals: Option<PathBuf>,

        /// Generate N synthetic signal points per model instead of reading CSVs.
        #[arg(long, conflicts_with_all = ["prices", "signals"])]
        synthetic: Option<usize>,

        /// Seed for synthetic data.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// TOML config file with a [backtest] table.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override: sample every N-th index.
        #[arg(long)]
        stride: Option<usize>,

        /// Override: profit target as a fraction (0.01 = 1%).
        #[arg(long)]
        profit_target: Option<f64>,

        /// Override: stop loss as a fraction (0.01 = 1%).
        #[arg(long)]
        stop_loss: Option<f64>,

        /// Run models and entry scans on all cores.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Output directory for ledgers and report.json.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Write the default config as TOML.
    InitConfig {
        /// Destination file.
        #[arg(long, default_value = "signalbt.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            prices,
            signals,
            synthetic,
            seed,
            config,
            stride,
            profit_target,
            stop_loss,
            parallel,
            output_dir,
        } => {
            let backtest_config =
                resolve_config(config.as_deref(), stride, profit_target, stop_loss)?;
            let inputs = match synthetic {
                Some(n) => Inputs::Synthetic { n, seed },
                None => match (prices, signals) {
                    (Some(prices), Some(signals)) => Inputs::Files { prices, signals },
                    _ => bail!("--prices and --signals are required unless --synthetic is set"),
                },
            };
            let opts = RunOptions {
                parallel_models: parallel,
                parallel_scans: parallel,
                narrate: cli.verbose,
            };
            run_backtest_cmd(inputs, &backtest_config, opts, &output_dir)
        }
        Commands::InitConfig { path, force } => run_init_config(&path, force),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

enum Inputs {
    Files { prices: PathBuf, signals: PathBuf },
    Synthetic { n: usize, seed: u64 },
}

/// Config file (or defaults) with command-line overrides applied, validated.
fn resolve_config(
    path: Option<&Path>,
    stride: Option<usize>,
    profit_target: Option<f64>,
    stop_loss: Option<f64>,
) -> Result<BacktestConfig> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            BacktestConfig::from_toml_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => BacktestConfig::default(),
    };

    if let Some(stride) = stride {
        config.stride = stride;
    }
    if let Some(pt) = profit_target {
        config.profit_target = pt;
    }
    if let Some(sl) = stop_loss {
        config.stop_loss = sl;
    }
    config.validate()?;
    Ok(config)
}

fn run_backtest_cmd(
    inputs: Inputs,
    config: &BacktestConfig,
    opts: RunOptions,
    output_dir: &Path,
) -> Result<()> {
    let (prices, models) = match inputs {
        Inputs::Files { prices, signals } => (load_prices(&prices)?, load_signals(&signals)?),
        Inputs::Synthetic { n, seed } => {
            tracing::warn!("using synthetic data (seed {seed}); results are not meaningful");
            // Give the synthetic walk a training period before the test slice.
            let prices = synthetic_prices(n.saturating_mul(5), seed)?;
            (prices, synthetic_signals(&SYNTHETIC_MODELS, n, seed))
        }
    };

    tracing::info!(
        prices = prices.len(),
        models = models.len(),
        stride = config.stride,
        profit_target = config.profit_target,
        stop_loss = config.stop_loss,
        "starting backtest"
    );

    let reports = run_models(&prices, &models, config, opts)?;

    println!();
    for report in &reports {
        println!("{}", summary_line(report));
    }

    let written = save_artifacts(output_dir, &reports)?;
    println!();
    println!(
        "Artifacts saved to: {} ({} files)",
        output_dir.display(),
        written.len()
    );

    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    let toml = BacktestConfig::default().to_toml_string()?;
    std::fs::write(path, toml)
        .with_context(|| format!("Failed to write config {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
