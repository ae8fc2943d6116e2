//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. Invalid values fail
//! fast and are never auto-corrected.

use crate::domain::error::AlgocraftError;
use crate::domain::signal::StrategyMode;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    validate_initial_cash(config)?;
    validate_fee_rate(config)?;
    validate_exit_pcts(config)?;
    validate_periods_per_year(config)?;
    validate_data_section(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    let short = config.get_int("indicators", "short_window", 20);
    let long = config.get_int("indicators", "long_window", 50);

    if short < 1 || long < 1 {
        return Err(AlgocraftError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "short_window".to_string(),
            reason: "SMA windows must be at least 1".to_string(),
        });
    }
    if long <= short {
        return Err(AlgocraftError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "long_window".to_string(),
            reason: "long_window must be greater than short_window".to_string(),
        });
    }

    if config.get_int("indicators", "rsi_period", 14) < 1 {
        return Err(AlgocraftError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "rsi_period".to_string(),
            reason: "rsi_period must be at least 1".to_string(),
        });
    }
    if config.get_int("indicators", "bb_window", 20) < 1 {
        return Err(AlgocraftError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "bb_window".to_string(),
            reason: "bb_window must be at least 1".to_string(),
        });
    }
    if config.get_double("indicators", "bb_mult", 2.0) <= 0.0 {
        return Err(AlgocraftError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "bb_mult".to_string(),
            reason: "bb_mult must be positive".to_string(),
        });
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    let mode_name = match config.get_string("strategy", "mode") {
        Some(m) if !m.trim().is_empty() => m,
        _ => {
            return Err(AlgocraftError::ConfigMissing {
                section: "strategy".to_string(),
                key: "mode".to_string(),
            });
        }
    };

    let oversold = config.get_double("strategy", "oversold", 30.0);
    let overbought = config.get_double("strategy", "overbought", 70.0);

    let mode = StrategyMode::parse(&mode_name, oversold, overbought).ok_or_else(|| {
        AlgocraftError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "mode".to_string(),
            reason: format!(
                "unknown mode '{mode_name}' (expected sma-crossover, rsi-threshold or bollinger-breakout)"
            ),
        }
    })?;

    mode.validate().map_err(|e| AlgocraftError::ConfigInvalid {
        section: "strategy".to_string(),
        key: "overbought".to_string(),
        reason: e.to_string(),
    })
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    let value = config.get_double("backtest", "initial_cash", 0.0);
    if value <= 0.0 {
        return Err(AlgocraftError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_fee_rate(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    let value = config.get_double("backtest", "fee_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(AlgocraftError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "fee_rate".to_string(),
            reason: "fee_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_exit_pcts(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    for key in ["stop_loss_pct", "take_profit_pct"] {
        let value = config.get_double("backtest", key, 0.0);
        if value < 0.0 {
            return Err(AlgocraftError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be non-negative"),
            });
        }
    }
    Ok(())
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    let value = config.get_double("backtest", "periods_per_year", 252.0);
    if value <= 0.0 {
        return Err(AlgocraftError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "periods_per_year".to_string(),
            reason: "periods_per_year must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_data_section(config: &dyn ConfigPort) -> Result<(), AlgocraftError> {
    for key in ["path", "symbol", "timeframe"] {
        match config.get_string("data", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(AlgocraftError::ConfigMissing {
                    section: "data".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}
