#![allow(dead_code)]

use algocraft::domain::error::AlgocraftError;
pub use algocraft::domain::price::PricePoint;
use algocraft::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        _timeframe: &str,
    ) -> Result<Vec<PricePoint>, AlgocraftError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AlgocraftError::InsufficientData {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, AlgocraftError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
        _timeframe: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, AlgocraftError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AlgocraftError::InsufficientData {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(prices) if !prices.is_empty() => {
                let min = prices.iter().map(|p| p.timestamp).min().unwrap();
                let max = prices.iter().map(|p| p.timestamp).max().unwrap();
                Ok(Some((min, max, prices.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn hour(i: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::hours(i)
}

pub fn make_prices(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            timestamp: hour(i as i64),
            close,
        })
        .collect()
}

/// A price path with a down-leg into a sustained up-leg, long enough for
/// small SMA windows to produce one upward crossover.
pub fn v_shaped_closes(len: usize) -> Vec<f64> {
    let half = len / 2;
    let mut closes = Vec::with_capacity(len);
    for i in 0..half {
        closes.push(120.0 - 2.0 * i as f64);
    }
    for i in half..len {
        closes.push(120.0 - 2.0 * half as f64 + 3.0 * (i - half) as f64);
    }
    closes
}
