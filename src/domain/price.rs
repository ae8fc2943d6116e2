//! Price bar representation.

use chrono::NaiveDateTime;

/// One close price at one timestamp. The engine works on the close only;
/// adapters may parse richer OHLCV rows and keep the close.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

/// Extract the close column for windowed calculations.
pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}
