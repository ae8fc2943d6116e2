//! Signal generation from indicator state.
//!
//! A signal is a pure function of indicators and raw price at each bar,
//! independent of any simulator state. Any bar with an unavailable
//! indicator input yields `Hold`.

use crate::domain::error::AlgocraftError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::price::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// Strategy selection with per-mode thresholds.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyMode {
    /// Edge-triggered: signals only on the bar where the short SMA crosses
    /// the long SMA, judged against the prior bar's relation.
    SmaCrossover,
    /// Level-triggered: repeats every bar the RSI condition holds.
    RsiThreshold { oversold: f64, overbought: f64 },
    /// Price breaking out of the Bollinger envelope.
    BollingerBreakout,
}

impl StrategyMode {
    /// Parse the config-file spelling of a mode name.
    pub fn parse(name: &str, oversold: f64, overbought: f64) -> Option<StrategyMode> {
        match name.trim().to_lowercase().as_str() {
            "sma-crossover" => Some(StrategyMode::SmaCrossover),
            "rsi-threshold" => Some(StrategyMode::RsiThreshold {
                oversold,
                overbought,
            }),
            "bollinger-breakout" => Some(StrategyMode::BollingerBreakout),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), AlgocraftError> {
        if let StrategyMode::RsiThreshold {
            oversold,
            overbought,
        } = self
        {
            if overbought <= oversold {
                return Err(AlgocraftError::Configuration {
                    reason: format!(
                        "overbought ({overbought}) must be greater than oversold ({oversold})"
                    ),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyMode::SmaCrossover => write!(f, "sma-crossover"),
            StrategyMode::RsiThreshold {
                oversold,
                overbought,
            } => write!(f, "rsi-threshold({oversold},{overbought})"),
            StrategyMode::BollingerBreakout => write!(f, "bollinger-breakout"),
        }
    }
}

/// Derive one signal per bar. Produces a fresh series; never mutates inputs.
///
/// `prices` must be the series the indicators were computed from (same
/// length and order).
pub fn generate_signals(
    series: &IndicatorSeries,
    prices: &[PricePoint],
    mode: &StrategyMode,
) -> Vec<Signal> {
    let n = series.points.len().min(prices.len());

    (0..n)
        .map(|i| match mode {
            StrategyMode::SmaCrossover => sma_crossover_signal(series, i),
            StrategyMode::RsiThreshold {
                oversold,
                overbought,
            } => rsi_threshold_signal(series, i, *oversold, *overbought),
            StrategyMode::BollingerBreakout => bollinger_breakout_signal(series, i, prices[i].close),
        })
        .collect()
}

fn sma_crossover_signal(series: &IndicatorSeries, i: usize) -> Signal {
    if i == 0 {
        return Signal::Hold;
    }

    let (prev, curr) = (&series.points[i - 1], &series.points[i]);
    let (Some(prev_short), Some(prev_long), Some(short), Some(long)) =
        (prev.short_sma, prev.long_sma, curr.short_sma, curr.long_sma)
    else {
        return Signal::Hold;
    };

    // Fire only on the crossing bar; a persisting relation re-signals nothing.
    if prev_short <= prev_long && short > long {
        Signal::Buy
    } else if prev_short >= prev_long && short < long {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

fn rsi_threshold_signal(series: &IndicatorSeries, i: usize, oversold: f64, overbought: f64) -> Signal {
    let Some(rsi) = series.points[i].rsi else {
        return Signal::Hold;
    };

    if rsi < oversold {
        Signal::Buy
    } else if rsi > overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

fn bollinger_breakout_signal(series: &IndicatorSeries, i: usize, close: f64) -> Signal {
    let point = &series.points[i];
    let (Some(upper), Some(lower)) = (point.bb_upper, point.bb_lower) else {
        return Signal::Hold;
    };

    if close < lower {
        Signal::Buy
    } else if close > upper {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
