//! Trade simulation.
//!
//! Replays (price, signal) pairs chronologically over a single-asset,
//! long-only portfolio with two states: FLAT (holdings = 0) and LONG
//! (holdings > 0, entry price remembered). The model is fully-invested-
//! or-flat: a Buy spends all cash, an exit liquidates all holdings.
//!
//! Forced exits (stop-loss, take-profit) are evaluated before any
//! signal-driven exit. Fees apply multiplicatively by (1 - fee_rate) on
//! both entry and exit. The first bar only establishes the opening
//! valuation; trading begins on the next bar.

use chrono::NaiveDateTime;

use super::error::AlgocraftError;
use super::price::PricePoint;
use super::signal::Signal;

/// Backtest execution parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_cash: f64,
    pub fee_rate: f64,
    /// Loss fraction that forces an exit; 0.0 disables the trigger.
    pub stop_loss_pct: f64,
    /// Gain fraction that forces an exit; 0.0 disables the trigger.
    pub take_profit_pct: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_cash: 10_000.0,
            fee_rate: 0.001,
            stop_loss_pct: 0.0,
            take_profit_pct: 0.0,
        }
    }
}

impl SimulationConfig {
    /// Fail-fast parameter check; runs before any simulation step.
    pub fn validate(&self) -> Result<(), AlgocraftError> {
        if self.initial_cash <= 0.0 {
            return Err(AlgocraftError::Configuration {
                reason: "initial_cash must be positive".to_string(),
            });
        }
        if self.fee_rate < 0.0 || self.fee_rate >= 1.0 {
            return Err(AlgocraftError::Configuration {
                reason: "fee_rate must be in [0, 1)".to_string(),
            });
        }
        if self.stop_loss_pct < 0.0 {
            return Err(AlgocraftError::Configuration {
                reason: "stop_loss_pct must be non-negative".to_string(),
            });
        }
        if self.take_profit_pct < 0.0 {
            return Err(AlgocraftError::Configuration {
                reason: "take_profit_pct must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

/// What a trade log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
    StopLoss,
    TakeProfit,
}

impl TradeKind {
    /// Closing events liquidate the position; the opening Buy does not.
    pub fn is_close(&self) -> bool {
        matches!(self, TradeKind::Sell | TradeKind::StopLoss | TradeKind::TakeProfit)
    }
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeKind::Buy => write!(f, "buy"),
            TradeKind::Sell => write!(f, "sell"),
            TradeKind::StopLoss => write!(f, "stop-loss"),
            TradeKind::TakeProfit => write!(f, "take-profit"),
        }
    }
}

/// One append-only trade log entry, snapshotting the state after the fill.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub timestamp: NaiveDateTime,
    pub kind: TradeKind,
    pub price: f64,
    pub holdings: f64,
    pub cash: f64,
    pub portfolio_value: f64,
}

/// Portfolio valuation at one bar: cash + holdings x price.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationResult {
    pub portfolio_values: Vec<PortfolioPoint>,
    pub trade_log: Vec<TradeRecord>,
}

/// Replay signals against the price series.
///
/// Deterministic and side-effect-free: identical inputs always reproduce
/// identical outputs. An empty price series yields empty outputs.
pub fn simulate(
    prices: &[PricePoint],
    signals: &[Signal],
    config: &SimulationConfig,
) -> Result<SimulationResult, AlgocraftError> {
    config.validate()?;

    if prices.len() != signals.len() {
        return Err(AlgocraftError::Configuration {
            reason: format!(
                "signal series length ({}) does not match price series length ({})",
                signals.len(),
                prices.len()
            ),
        });
    }

    let mut cash = config.initial_cash;
    let mut holdings = 0.0_f64;
    let mut entry_price = 0.0_f64;

    let mut portfolio_values = Vec::with_capacity(prices.len());
    let mut trade_log: Vec<TradeRecord> = Vec::new();

    for (i, (bar, signal)) in prices.iter().zip(signals.iter()).enumerate() {
        let price = bar.close;

        if i > 0 {
            if holdings > 0.0 {
                let pct = (price - entry_price) / entry_price;

                let exit_kind = if config.stop_loss_pct > 0.0 && pct <= -config.stop_loss_pct {
                    Some(TradeKind::StopLoss)
                } else if config.take_profit_pct > 0.0 && pct >= config.take_profit_pct {
                    Some(TradeKind::TakeProfit)
                } else if *signal == Signal::Sell {
                    Some(TradeKind::Sell)
                } else {
                    // Buy while LONG is a no-op: no pyramiding.
                    None
                };

                if let Some(kind) = exit_kind {
                    cash = holdings * price * (1.0 - config.fee_rate);
                    holdings = 0.0;
                    trade_log.push(TradeRecord {
                        timestamp: bar.timestamp,
                        kind,
                        price,
                        holdings,
                        cash,
                        portfolio_value: cash,
                    });
                }
            } else if *signal == Signal::Buy {
                holdings = cash * (1.0 - config.fee_rate) / price;
                cash = 0.0;
                entry_price = price;
                trade_log.push(TradeRecord {
                    timestamp: bar.timestamp,
                    kind: TradeKind::Buy,
                    price,
                    holdings,
                    cash,
                    portfolio_value: holdings * price,
                });
            }
        }

        portfolio_values.push(PortfolioPoint {
            timestamp: bar.timestamp,
            value: cash + holdings * price,
        });
    }

    Ok(SimulationResult {
        portfolio_values,
        trade_log,
    })
}
