//! Data access port trait.

use crate::domain::error::AlgocraftError;
use crate::domain::price::PricePoint;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Load the full close-price history for one symbol at one timeframe,
    /// sorted ascending by timestamp.
    fn fetch_prices(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> Result<Vec<PricePoint>, AlgocraftError>;

    fn list_symbols(&self) -> Result<Vec<String>, AlgocraftError>;

    /// First timestamp, last timestamp and bar count for a symbol, or
    /// `None` when no data exists.
    fn data_range(
        &self,
        symbol: &str,
        timeframe: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, AlgocraftError>;
}
