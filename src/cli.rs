//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report::ConsoleReport;
use crate::adapters::csv_adapter::{write_attributed_returns, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::error::RsirevError;
use crate::domain::metrics::{MetricReport, TRADING_DAYS_PER_YEAR};
use crate::domain::position::SignalThresholds;
use crate::domain::price::PriceSeries;
use crate::domain::sensitivity::{run_sensitivity, SensitivityReport};
use crate::domain::strategy::{
    run_benchmark, run_strategy, StrategyConfig, StrategyRun, DEFAULT_RSI_PERIOD,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "rsirev", about = "RSI mean-reversion backtester")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the strategy, the buy-and-hold benchmark and the sensitivity sweep
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV, overrides [data] path
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// RSI period, overrides [strategy] period
        #[arg(short, long)]
        period: Option<usize>,
        /// Write attributed strategy returns to this CSV
        #[arg(short, long)]
        export: Option<PathBuf>,
        #[arg(long)]
        no_sweep: bool,
    },
    /// Run only the RSI period sensitivity sweep
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        period: Option<usize>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of the price data
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

/// Options for one backtest run that do not change the strategy itself.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub export: Option<PathBuf>,
    pub sensitivity: bool,
}

#[derive(Debug, Clone)]
pub struct BacktestOutcome {
    pub strategy: StrategyRun,
    pub benchmark: MetricReport,
    pub sensitivity: Option<SensitivityReport>,
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            data,
            period,
            export,
            no_sweep,
        } => run_backtest(&config, data.as_deref(), period, export, no_sweep),
        Command::Sweep {
            config,
            data,
            period,
        } => run_sweep(&config, data.as_deref(), period),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, data } => run_info(&config, data.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(&e)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RsirevError> {
    tracing::info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, RsirevError> {
    let period = config.get_int_strict("strategy", "period", DEFAULT_RSI_PERIOD as i64)?;
    let periods_per_year = config.get_int_strict(
        "backtest",
        "periods_per_year",
        i64::from(TRADING_DAYS_PER_YEAR),
    )?;
    let defaults = SignalThresholds::default();

    let strategy = StrategyConfig {
        period: usize::try_from(period).map_err(|_| {
            RsirevError::invalid("strategy", "period", "period must be at least 1")
        })?,
        thresholds: SignalThresholds {
            oversold: config.get_double_strict("strategy", "oversold", defaults.oversold)?,
            overbought: config.get_double_strict("strategy", "overbought", defaults.overbought)?,
            max_long: config.get_double_strict("strategy", "max_long", defaults.max_long)?,
            max_short: config.get_double_strict("strategy", "max_short", defaults.max_short)?,
        },
        periods_per_year: u32::try_from(periods_per_year).map_err(|_| {
            RsirevError::invalid(
                "backtest",
                "periods_per_year",
                "periods_per_year must be at least 1",
            )
        })?,
    };
    strategy.validate()?;
    Ok(strategy)
}

pub fn build_pipeline_options(config: &dyn ConfigPort) -> Result<PipelineOptions, RsirevError> {
    Ok(PipelineOptions {
        start_date: config.get_date("data", "start_date")?,
        end_date: config.get_date("data", "end_date")?,
        export: config
            .get_string("backtest", "export")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        sensitivity: config.get_bool("backtest", "sensitivity", true),
    })
}

pub fn resolve_data_path(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, RsirevError> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    config
        .get_string("data", "path")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| RsirevError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

fn apply_period_override(
    strategy: StrategyConfig,
    period: Option<usize>,
) -> Result<StrategyConfig, RsirevError> {
    match period {
        Some(p) => {
            let overridden = strategy.with_period(p);
            overridden.validate()?;
            Ok(overridden)
        }
        None => Ok(strategy),
    }
}

fn run_backtest(
    config_path: &Path,
    data_override: Option<&Path>,
    period: Option<usize>,
    export_override: Option<PathBuf>,
    no_sweep: bool,
) -> Result<(), RsirevError> {
    let adapter = load_config(config_path)?;
    let strategy = apply_period_override(build_strategy_config(&adapter)?, period)?;

    let mut options = build_pipeline_options(&adapter)?;
    if export_override.is_some() {
        options.export = export_override;
    }
    if no_sweep {
        options.sensitivity = false;
    }

    let data_port = CsvAdapter::new(resolve_data_path(data_override, &adapter)?);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_backtest_pipeline(&data_port, &strategy, &options, &ConsoleReport, &mut out)?;
    Ok(())
}

fn fetch_prices(
    data_port: &dyn DataPort,
    options: &PipelineOptions,
) -> Result<PriceSeries, RsirevError> {
    let prices = data_port.fetch_prices(options.start_date, options.end_date)?;
    match (prices.first_date(), prices.last_date()) {
        (Some(first), Some(last)) => {
            tracing::info!("Loaded {} bars, {} to {}", prices.len(), first, last)
        }
        _ => tracing::warn!("No price data in the requested window"),
    }
    Ok(prices)
}

/// Strategy, benchmark and optional sweep over one price series, rendered
/// through `report` into `out`.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    strategy: &StrategyConfig,
    options: &PipelineOptions,
    report: &dyn ReportPort,
    out: &mut dyn Write,
) -> Result<BacktestOutcome, RsirevError> {
    let prices = fetch_prices(data_port, options)?;

    tracing::info!(
        "Running RSI({}) strategy, OS={} OB={}, leverage {} to {}",
        strategy.period,
        strategy.thresholds.oversold,
        strategy.thresholds.overbought,
        strategy.thresholds.max_long,
        strategy.thresholds.max_short,
    );
    let run = run_strategy(&prices, strategy)?;
    let benchmark = run_benchmark(&prices, strategy.periods_per_year)?;

    report.write_metrics(
        out,
        &format!(
            "RSI Mean Reversion  (period={}, OS={}, OB={})",
            strategy.period, strategy.thresholds.oversold, strategy.thresholds.overbought
        ),
        &run.report,
    )?;
    report.write_metrics(out, "Buy & Hold (benchmark)", &benchmark)?;

    let sensitivity = if options.sensitivity {
        let sweep = run_sensitivity(&prices, strategy)?;
        report.write_sensitivity(out, &sweep)?;
        Some(sweep)
    } else {
        None
    };

    if let Some(path) = &options.export {
        write_attributed_returns(path, &run.attributed)?;
        tracing::info!("Attributed returns written to {}", path.display());
    }

    Ok(BacktestOutcome {
        strategy: run,
        benchmark,
        sensitivity,
    })
}

fn run_sweep(
    config_path: &Path,
    data_override: Option<&Path>,
    period: Option<usize>,
) -> Result<(), RsirevError> {
    let adapter = load_config(config_path)?;
    let strategy = apply_period_override(build_strategy_config(&adapter)?, period)?;
    let options = build_pipeline_options(&adapter)?;
    let data_port = CsvAdapter::new(resolve_data_path(data_override, &adapter)?);

    let prices = fetch_prices(&data_port, &options)?;
    let sweep = run_sensitivity(&prices, &strategy)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    ConsoleReport.write_sensitivity(&mut out, &sweep)
}

fn run_validate(config_path: &Path) -> Result<(), RsirevError> {
    let adapter = load_config(config_path)?;
    let strategy = build_strategy_config(&adapter)?;
    let options = build_pipeline_options(&adapter)?;

    tracing::info!("RSI period:        {}", strategy.period);
    tracing::info!(
        "Thresholds:        oversold {} / overbought {}",
        strategy.thresholds.oversold,
        strategy.thresholds.overbought
    );
    tracing::info!(
        "Leverage:          long {} / short {}",
        strategy.thresholds.max_long,
        strategy.thresholds.max_short
    );
    tracing::info!("Periods per year:  {}", strategy.periods_per_year);
    tracing::info!("Sensitivity sweep: {}", options.sensitivity);
    match adapter.get_string("data", "path") {
        Some(path) => tracing::info!("Data:              {}", path),
        None => tracing::warn!("No [data] path configured; pass --data when running"),
    }
    tracing::info!("Configuration is valid");
    Ok(())
}

fn run_info(config_path: &Path, data_override: Option<&Path>) -> Result<(), RsirevError> {
    let adapter = load_config(config_path)?;
    let data_port = CsvAdapter::new(resolve_data_path(data_override, &adapter)?);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match data_port.get_data_range()? {
        Some((first, last, count)) => writeln!(
            out,
            "{}: {} bars, {} to {}",
            data_port.path().display(),
            count,
            first,
            last
        )?,
        None => writeln!(out, "{}: no data found", data_port.path().display())?,
    }
    Ok(())
}
