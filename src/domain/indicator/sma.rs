//! Simple Moving Average.
//!
//! SMA(w) at index i is the mean of the trailing w closes ending at i.
//! Warmup: first w-1 indices are unavailable.

/// Trailing-window mean per index. `window == 0` yields all-`None`.
pub fn calculate_sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut rolling_sum = 0.0;

    for i in 0..closes.len() {
        rolling_sum += closes[i];
        if i >= window {
            rolling_sum -= closes[i - window];
        }
        if i + 1 >= window {
            values.push(Some(rolling_sum / window as f64));
        } else {
            values.push(None);
        }
    }

    values
}
