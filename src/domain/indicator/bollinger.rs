//! Bollinger Bands.
//!
//! - Middle: SMA over `window` closes
//! - Upper: Middle + (multiplier x StdDev)
//! - Lower: Middle - (multiplier x StdDev)
//!
//! StdDev is population standard deviation (divides by N, not N-1).
//! Warmup: first (window - 1) indices are unavailable.

/// One bar's band values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Trailing-window bands per index. `window == 0` yields all-`None`.
pub fn calculate_bollinger(closes: &[f64], window: usize, mult: f64) -> Vec<Option<BollingerPoint>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut values = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        if i + 1 < window {
            values.push(None);
            continue;
        }

        let trailing = &closes[i + 1 - window..=i];
        let middle: f64 = trailing.iter().sum::<f64>() / window as f64;
        let variance: f64 = trailing
            .iter()
            .map(|c| {
                let diff = c - middle;
                diff * diff
            })
            .sum::<f64>()
            / window as f64;
        let band = mult * variance.sqrt();

        values.push(Some(BollingerPoint {
            middle,
            upper: middle + band,
            lower: middle - band,
        }));
    }

    values
}
