//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    validate_backtest_config, validate_indicator_config, validate_strategy_config,
};
use crate::domain::error::AlgocraftError;
use crate::domain::indicator::{compute_indicators, IndicatorParams};
use crate::domain::metrics::MetricsReport;
use crate::domain::signal::{generate_signals, StrategyMode};
use crate::domain::simulation::{simulate, SimulationConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "algocraft", about = "Single-asset trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Directory for the CSV report (default: ./report)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate and print the resolved settings without touching data
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show available symbols, or the data range for one symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest(&config, symbol.as_deref(), output.as_ref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AlgocraftError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn validate_all(adapter: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    validate_backtest_config(adapter)?;
    validate_indicator_config(adapter)?;
    validate_strategy_config(adapter)?;
    Ok(())
}

pub fn build_indicator_params(adapter: &dyn ConfigPort) -> Result<IndicatorParams, AlgocraftError> {
    let params = IndicatorParams {
        short_window: adapter.get_int("indicators", "short_window", 20) as usize,
        long_window: adapter.get_int("indicators", "long_window", 50) as usize,
        rsi_period: adapter.get_int("indicators", "rsi_period", 14) as usize,
        bb_window: adapter.get_int("indicators", "bb_window", 20) as usize,
        bb_mult: adapter.get_double("indicators", "bb_mult", 2.0),
    };
    params.validate()?;
    Ok(params)
}

pub fn build_strategy_mode(adapter: &dyn ConfigPort) -> Result<StrategyMode, AlgocraftError> {
    let name = adapter
        .get_string("strategy", "mode")
        .ok_or_else(|| AlgocraftError::ConfigMissing {
            section: "strategy".into(),
            key: "mode".into(),
        })?;
    let oversold = adapter.get_double("strategy", "oversold", 30.0);
    let overbought = adapter.get_double("strategy", "overbought", 70.0);

    let mode = StrategyMode::parse(&name, oversold, overbought).ok_or_else(|| {
        AlgocraftError::ConfigInvalid {
            section: "strategy".into(),
            key: "mode".into(),
            reason: format!("unknown mode '{name}'"),
        }
    })?;
    mode.validate()?;
    Ok(mode)
}

pub fn build_simulation_config(adapter: &dyn ConfigPort) -> Result<SimulationConfig, AlgocraftError> {
    let config = SimulationConfig {
        initial_cash: adapter.get_double("backtest", "initial_cash", 10_000.0),
        fee_rate: adapter.get_double("backtest", "fee_rate", 0.001),
        stop_loss_pct: adapter.get_double("backtest", "stop_loss_pct", 0.0),
        take_profit_pct: adapter.get_double("backtest", "take_profit_pct", 0.0),
    };
    config.validate()?;
    Ok(config)
}

fn resolve_data_settings(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> (PathBuf, String, String) {
    let path = adapter
        .get_string("data", "path")
        .unwrap_or_else(|| ".".to_string());
    let symbol = symbol_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("data", "symbol"))
        .unwrap_or_default();
    let timeframe = adapter
        .get_string("data", "timeframe")
        .unwrap_or_else(|| "1h".to_string());
    (PathBuf::from(path), symbol, timeframe)
}

pub fn run_backtest(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build engine settings
    let params = match build_indicator_params(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let mode = match build_strategy_mode(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let sim_config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let periods_per_year = adapter.get_double("backtest", "periods_per_year", 252.0);

    // Stage 3: Fetch price history
    let (base_path, symbol, timeframe) = resolve_data_settings(&adapter, symbol_override);
    eprintln!("Loading {symbol} ({timeframe}) from {}", base_path.display());

    let data_port = CsvDataAdapter::new(base_path);
    let prices = match data_port.fetch_prices(&symbol, &timeframe) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if prices.is_empty() {
        let err = AlgocraftError::InsufficientData {
            reason: format!("no bars found for {symbol} ({timeframe})"),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }
    if prices.len() < params.min_bars() {
        eprintln!(
            "warning: {} bars is fewer than the {} needed for full indicator warmup",
            prices.len(),
            params.min_bars(),
        );
    }

    // Stage 4: Indicators, signals, simulation
    eprintln!("Running {} over {} bars", mode, prices.len());
    let series = compute_indicators(&prices, &params);
    let signals = generate_signals(&series, &prices, &mode);
    let result = match simulate(&prices, &signals, &sim_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Metrics and console summary
    let metrics = MetricsReport::compute(&result.portfolio_values, &result.trade_log, periods_per_year);

    let final_value = result
        .portfolio_values
        .last()
        .map(|p| p.value)
        .unwrap_or(sim_config.initial_cash);
    let profit = final_value - sim_config.initial_cash;

    eprintln!("\n=== Backtest Results ===");
    eprintln!("Initial Value:    ${:.2}", sim_config.initial_cash);
    eprintln!("Final Value:      ${:.2}", final_value);
    eprintln!(
        "Profit:           {}${:.2} ({:+.2}%)",
        if profit >= 0.0 { "+" } else { "-" },
        profit.abs(),
        profit / sim_config.initial_cash * 100.0,
    );
    eprintln!("Total Trades:     {}", metrics.total_trades);
    eprintln!("Win Rate:         {:.1}%", metrics.win_rate * 100.0);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!("Annualized:       {:.2}%", metrics.annualized_return * 100.0);
    eprintln!(
        "Volatility:       {:.2}%",
        metrics.annualized_volatility * 100.0
    );
    eprintln!("Sharpe Ratio:     {:.2}", metrics.sharpe_ratio);

    // Stage 6: Write report
    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("report"));
    let report_port = CsvReportAdapter::new();
    match report_port.write(&result, &metrics, &output.display().to_string()) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let params = match build_indicator_params(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let mode = match build_strategy_mode(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let (base_path, symbol, timeframe) = resolve_data_settings(&adapter, None);

    eprintln!("\nResolved settings:");
    eprintln!("  data:       {} ({}, {})", base_path.display(), symbol, timeframe);
    eprintln!("  strategy:   {mode}");
    eprintln!(
        "  indicators: SMA({}/{}), RSI({}), BB({}, {})",
        params.short_window, params.long_window, params.rsi_period, params.bb_window, params.bb_mult,
    );
    eprintln!("  warmup:     {} bars", params.min_bars());

    ExitCode::SUCCESS
}

pub fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");
    ExitCode::SUCCESS
}

pub fn run_info(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let (base_path, resolved_symbol, timeframe) = resolve_data_settings(&adapter, symbol);
    let data_port = CsvDataAdapter::new(base_path);

    // A symbol on the command line asks for its range; otherwise list
    // everything under the data path.
    match symbol {
        Some(_) => match data_port.data_range(&resolved_symbol, &timeframe) {
            Ok(Some((first, last, count))) => {
                eprintln!("{resolved_symbol} ({timeframe}): {count} bars");
                eprintln!("  from {first}");
                eprintln!("  to   {last}");
                ExitCode::SUCCESS
            }
            Ok(None) => {
                eprintln!("no data for {resolved_symbol} ({timeframe})");
                ExitCode::from(5)
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        },
        None => match data_port.list_symbols() {
            Ok(symbols) if symbols.is_empty() => {
                eprintln!("no symbols found");
                ExitCode::from(5)
            }
            Ok(symbols) => {
                for s in symbols {
                    eprintln!("{s}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        },
    }
}
