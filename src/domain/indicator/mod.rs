//! Technical indicator engine.
//!
//! Each calculation is a pure function over the close column, returning one
//! `Option<f64>` per input bar: `None` marks a warm-up index with an
//! insufficient trailing window, never a numeric placeholder.

pub mod sma;
pub mod rsi;
pub mod bollinger;

use crate::domain::error::AlgocraftError;
use crate::domain::price::{self, PricePoint};
use chrono::NaiveDateTime;

/// Window parameters for the full indicator set.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub short_window: usize,
    pub long_window: usize,
    pub rsi_period: usize,
    pub bb_window: usize,
    pub bb_mult: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            short_window: 20,
            long_window: 50,
            rsi_period: 14,
            bb_window: 20,
            bb_mult: 2.0,
        }
    }
}

impl IndicatorParams {
    /// Fail-fast parameter check. Runs before any computation; invalid
    /// parameters are never auto-corrected.
    pub fn validate(&self) -> Result<(), AlgocraftError> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(AlgocraftError::Configuration {
                reason: "SMA windows must be at least 1".to_string(),
            });
        }
        if self.long_window <= self.short_window {
            return Err(AlgocraftError::Configuration {
                reason: format!(
                    "long_window ({}) must be greater than short_window ({})",
                    self.long_window, self.short_window
                ),
            });
        }
        if self.rsi_period == 0 {
            return Err(AlgocraftError::Configuration {
                reason: "rsi_period must be at least 1".to_string(),
            });
        }
        if self.bb_window == 0 {
            return Err(AlgocraftError::Configuration {
                reason: "bb_window must be at least 1".to_string(),
            });
        }
        if self.bb_mult <= 0.0 {
            return Err(AlgocraftError::Configuration {
                reason: "bb_mult must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Bars needed before every column has a value.
    pub fn min_bars(&self) -> usize {
        self.long_window.max(self.rsi_period + 1).max(self.bb_window)
    }
}

/// All indicator columns for one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub short_sma: Option<f64>,
    pub long_sma: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub params: IndicatorParams,
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Compute every indicator column over the price series.
///
/// Pure and deterministic. Parameters are assumed validated via
/// [`IndicatorParams::validate`].
pub fn compute_indicators(prices: &[PricePoint], params: &IndicatorParams) -> IndicatorSeries {
    let closes = price::closes(prices);

    let short_sma = sma::calculate_sma(&closes, params.short_window);
    let long_sma = sma::calculate_sma(&closes, params.long_window);
    let rsi = rsi::calculate_rsi(&closes, params.rsi_period);
    let bands = bollinger::calculate_bollinger(&closes, params.bb_window, params.bb_mult);

    let points = prices
        .iter()
        .enumerate()
        .map(|(i, p)| IndicatorPoint {
            timestamp: p.timestamp,
            short_sma: short_sma[i],
            long_sma: long_sma[i],
            rsi: rsi[i],
            bb_middle: bands[i].map(|b| b.middle),
            bb_upper: bands[i].map(|b| b.upper),
            bb_lower: bands[i].map(|b| b.lower),
        })
        .collect();

    IndicatorSeries {
        params: params.clone(),
        points,
    }
}
