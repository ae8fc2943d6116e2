//! CLI integration tests for the backtest command orchestration.
//!
//! Tests cover:
//! - Config builders (build_indicator_params, build_strategy_mode,
//!   build_simulation_config)
//! - Validate and dry-run modes with real INI files on disk
//! - Full backtest runs against CSV fixtures in a temp directory

mod common;

use algocraft::adapters::file_config_adapter::FileConfigAdapter;
use algocraft::cli;
use algocraft::domain::error::AlgocraftError;
use algocraft::domain::signal::StrategyMode;
use common::*;
use std::io::Write;
use std::path::PathBuf;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Config with tiny windows so short fixtures still warm up.
fn valid_ini(data_path: &str) -> String {
    format!(
        r#"
[data]
path = {data_path}
symbol = BTC-USDT
timeframe = 1h

[indicators]
short_window = 2
long_window = 3
rsi_period = 2
bb_window = 3
bb_mult = 2.0

[strategy]
mode = sma-crossover
oversold = 30
overbought = 70

[backtest]
initial_cash = 10000
fee_rate = 0.001
stop_loss_pct = 0.1
take_profit_pct = 0.0
periods_per_year = 8760
"#
    )
}

/// Write a `<symbol>_<timeframe>.csv` fixture under `dir`.
fn write_price_csv(dir: &std::path::Path, symbol: &str, timeframe: &str, closes: &[f64]) {
    let path = dir.join(format!("{symbol}_{timeframe}.csv"));
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    for (i, close) in closes.iter().enumerate() {
        writeln!(
            file,
            "{},{close},{close},{close},{close},100",
            hour(i as i64).format("%Y-%m-%d %H:%M:%S"),
        )
        .unwrap();
    }
}

fn exit_code_is_success(code: std::process::ExitCode) -> bool {
    // ExitCode doesn't implement PartialEq, so check via debug format
    format!("{code:?}").contains("0")
}

mod builders {
    use super::*;

    #[test]
    fn indicator_params_from_full_config() {
        let adapter = FileConfigAdapter::from_string(&valid_ini(".")).unwrap();
        let params = cli::build_indicator_params(&adapter).unwrap();
        assert_eq!(params.short_window, 2);
        assert_eq!(params.long_window, 3);
        assert_eq!(params.rsi_period, 2);
        assert_eq!(params.bb_window, 3);
        assert!((params.bb_mult - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn indicator_params_use_defaults() {
        let adapter = FileConfigAdapter::from_string("[indicators]\n").unwrap();
        let params = cli::build_indicator_params(&adapter).unwrap();
        assert_eq!(params.short_window, 20);
        assert_eq!(params.long_window, 50);
        assert_eq!(params.rsi_period, 14);
    }

    #[test]
    fn indicator_params_reject_inverted_windows() {
        let ini = "[indicators]\nshort_window = 50\nlong_window = 20\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        assert!(cli::build_indicator_params(&adapter).is_err());
    }

    #[test]
    fn strategy_mode_from_config() {
        let adapter = FileConfigAdapter::from_string(&valid_ini(".")).unwrap();
        let mode = cli::build_strategy_mode(&adapter).unwrap();
        assert_eq!(mode, StrategyMode::SmaCrossover);
    }

    #[test]
    fn strategy_mode_carries_rsi_thresholds() {
        let ini = "[strategy]\nmode = rsi-threshold\noversold = 25\noverbought = 75\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let mode = cli::build_strategy_mode(&adapter).unwrap();
        assert_eq!(
            mode,
            StrategyMode::RsiThreshold {
                oversold: 25.0,
                overbought: 75.0
            }
        );
    }

    #[test]
    fn strategy_mode_missing_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[strategy]\n").unwrap();
        let err = cli::build_strategy_mode(&adapter).unwrap_err();
        assert!(matches!(err, AlgocraftError::ConfigMissing { key, .. } if key == "mode"));
    }

    #[test]
    fn strategy_mode_unknown_is_config_error() {
        let ini = "[strategy]\nmode = momentum\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy_mode(&adapter).unwrap_err();
        assert!(matches!(err, AlgocraftError::ConfigInvalid { .. }));
    }

    #[test]
    fn simulation_config_from_full_config() {
        let adapter = FileConfigAdapter::from_string(&valid_ini(".")).unwrap();
        let config = cli::build_simulation_config(&adapter).unwrap();
        assert!((config.initial_cash - 10_000.0).abs() < f64::EPSILON);
        assert!((config.fee_rate - 0.001).abs() < f64::EPSILON);
        assert!((config.stop_loss_pct - 0.1).abs() < f64::EPSILON);
        assert!((config.take_profit_pct - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn simulation_config_rejects_bad_fee() {
        let ini = "[backtest]\ninitial_cash = 10000\nfee_rate = 1.5\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        assert!(cli::build_simulation_config(&adapter).is_err());
    }
}

mod validate {
    use super::*;

    #[test]
    fn valid_config_succeeds() {
        let file = write_temp_ini(&valid_ini("."));
        let code = cli::run_validate(&PathBuf::from(file.path()));
        assert!(exit_code_is_success(code));
    }

    #[test]
    fn missing_file_fails() {
        let code = cli::run_validate(&PathBuf::from("/nonexistent/config.ini"));
        assert!(!exit_code_is_success(code));
    }

    #[test]
    fn bad_strategy_mode_fails() {
        let ini = valid_ini(".").replace("mode = sma-crossover", "mode = momentum");
        let file = write_temp_ini(&ini);
        let code = cli::run_validate(&PathBuf::from(file.path()));
        assert!(!exit_code_is_success(code));
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn dry_run_valid_config_succeeds() {
        let file = write_temp_ini(&valid_ini("."));
        let code = cli::run_dry_run(&PathBuf::from(file.path()));
        assert!(exit_code_is_success(code));
    }

    #[test]
    fn dry_run_never_touches_data() {
        // Points at a data directory that does not exist; dry-run must
        // still succeed because it stops before the data port.
        let file = write_temp_ini(&valid_ini("/nonexistent/data"));
        let code = cli::run_dry_run(&PathBuf::from(file.path()));
        assert!(exit_code_is_success(code));
    }

    #[test]
    fn dry_run_rejects_negative_cash() {
        let ini = valid_ini(".").replace("initial_cash = 10000", "initial_cash = -5");
        let file = write_temp_ini(&ini);
        let code = cli::run_dry_run(&PathBuf::from(file.path()));
        assert!(!exit_code_is_success(code));
    }
}

mod backtest_end_to_end {
    use super::*;

    #[test]
    fn full_run_writes_report_files() {
        let dir = tempfile::TempDir::new().unwrap();
        write_price_csv(dir.path(), "BTC-USDT", "1h", &v_shaped_closes(20));

        let ini = valid_ini(dir.path().to_str().unwrap());
        let config = write_temp_ini(&ini);
        let output = dir.path().join("report");

        let code = cli::run_backtest(&PathBuf::from(config.path()), None, Some(&output));
        assert!(exit_code_is_success(code));

        for name in ["trades.csv", "equity.csv", "metrics.csv"] {
            assert!(output.join(name).exists(), "missing {name}");
        }
    }

    #[test]
    fn symbol_override_selects_other_fixture() {
        let dir = tempfile::TempDir::new().unwrap();
        write_price_csv(dir.path(), "ETH-USDT", "1h", &v_shaped_closes(20));

        let ini = valid_ini(dir.path().to_str().unwrap());
        let config = write_temp_ini(&ini);
        let output = dir.path().join("report");

        // Configured symbol BTC-USDT has no fixture; the override does.
        let code = cli::run_backtest(
            &PathBuf::from(config.path()),
            Some("ETH-USDT"),
            Some(&output),
        );
        assert!(exit_code_is_success(code));
    }

    #[test]
    fn missing_data_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let ini = valid_ini(dir.path().to_str().unwrap());
        let config = write_temp_ini(&ini);

        let code = cli::run_backtest(&PathBuf::from(config.path()), None, None);
        assert!(!exit_code_is_success(code));
    }

    #[test]
    fn short_history_warns_but_completes() {
        let dir = tempfile::TempDir::new().unwrap();
        write_price_csv(dir.path(), "BTC-USDT", "1h", &[100.0, 101.0]);

        let ini = valid_ini(dir.path().to_str().unwrap());
        let config = write_temp_ini(&ini);
        let output = dir.path().join("report");

        let code = cli::run_backtest(&PathBuf::from(config.path()), None, Some(&output));
        assert!(exit_code_is_success(code));

        // No trades: header only.
        let trades = std::fs::read_to_string(output.join("trades.csv")).unwrap();
        assert_eq!(trades.lines().count(), 1);
    }
}

mod info {
    use super::*;

    #[test]
    fn info_lists_symbols() {
        let dir = tempfile::TempDir::new().unwrap();
        write_price_csv(dir.path(), "BTC-USDT", "1h", &[100.0, 101.0]);
        write_price_csv(dir.path(), "ETH-USDT", "1h", &[50.0, 51.0]);

        let ini = valid_ini(dir.path().to_str().unwrap());
        let config = write_temp_ini(&ini);

        let code = cli::run_info(&PathBuf::from(config.path()), None);
        assert!(exit_code_is_success(code));
    }

    #[test]
    fn info_reports_symbol_range() {
        let dir = tempfile::TempDir::new().unwrap();
        write_price_csv(dir.path(), "BTC-USDT", "1h", &[100.0, 101.0, 102.0]);

        let ini = valid_ini(dir.path().to_str().unwrap());
        let config = write_temp_ini(&ini);

        let code = cli::run_info(&PathBuf::from(config.path()), Some("BTC-USDT"));
        assert!(exit_code_is_success(code));
    }

    #[test]
    fn info_unknown_symbol_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let ini = valid_ini(dir.path().to_str().unwrap());
        let config = write_temp_ini(&ini);

        let code = cli::run_info(&PathBuf::from(config.path()), Some("XRP-USDT"));
        assert!(!exit_code_is_success(code));
    }
}
