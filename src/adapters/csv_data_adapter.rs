//! CSV file data adapter.
//!
//! Reads `<symbol>_<timeframe>.csv` files with a
//! `timestamp,open,high,low,close,volume` header. Only the timestamp and
//! close columns feed the engine; the others are validated but ignored.

use crate::domain::error::AlgocraftError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, timeframe))
    }
}

impl DataPort for CsvDataAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> Result<Vec<PricePoint>, AlgocraftError> {
        let path = self.csv_path(symbol, timeframe);
        let content = fs::read_to_string(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut prices = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| AlgocraftError::InsufficientData {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            let timestamp_str =
                record
                    .get(0)
                    .ok_or_else(|| AlgocraftError::InsufficientData {
                        reason: format!("{}: row {}: missing timestamp column", path.display(), row + 1),
                    })?;
            let timestamp = NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT)
                .map_err(|e| AlgocraftError::InsufficientData {
                    reason: format!(
                        "{}: row {}: invalid timestamp '{}': {}",
                        path.display(),
                        row + 1,
                        timestamp_str,
                        e
                    ),
                })?;

            let close: f64 = record
                .get(4)
                .ok_or_else(|| AlgocraftError::InsufficientData {
                    reason: format!("{}: row {}: missing close column", path.display(), row + 1),
                })?
                .parse()
                .map_err(|e| AlgocraftError::InsufficientData {
                    reason: format!("{}: row {}: invalid close value: {}", path.display(), row + 1, e),
                })?;

            if !close.is_finite() || close <= 0.0 {
                return Err(AlgocraftError::InsufficientData {
                    reason: format!(
                        "{}: row {}: close must be a positive number, got {}",
                        path.display(),
                        row + 1,
                        close
                    ),
                });
            }

            prices.push(PricePoint { timestamp, close });
        }

        prices.sort_by_key(|p| p.timestamp);

        for pair in prices.windows(2) {
            if pair[0].timestamp == pair[1].timestamp {
                return Err(AlgocraftError::InsufficientData {
                    reason: format!(
                        "{}: duplicate timestamp {}",
                        path.display(),
                        pair[0].timestamp.format(TIMESTAMP_FORMAT)
                    ),
                });
            }
        }

        Ok(prices)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AlgocraftError> {
        let mut symbols = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name.strip_suffix(".csv") else {
                continue;
            };
            // Timeframe is everything after the last underscore.
            if let Some((symbol, _timeframe)) = stem.rsplit_once('_') {
                if !symbols.contains(&symbol.to_string()) {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, AlgocraftError> {
        if !self.csv_path(symbol, timeframe).exists() {
            return Ok(None);
        }
        let prices = self.fetch_prices(symbol, timeframe)?;
        match (prices.first(), prices.last()) {
            (Some(first), Some(last)) => {
                Ok(Some((first.timestamp, last.timestamp, prices.len())))
            }
            _ => Ok(None),
        }
    }
}
