//! Performance metrics over a finished simulation.

use super::simulation::{PortfolioPoint, TradeKind, TradeRecord};

/// Derived per run; carries no state between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub total_trades: usize,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
}

impl MetricsReport {
    /// Compute all metrics from the simulator's outputs.
    ///
    /// `periods_per_year` scales bar-level returns to annual figures and is
    /// an explicit parameter: 252 for daily bars, 8760 for hourly.
    pub fn compute(
        portfolio_values: &[PortfolioPoint],
        trade_log: &[TradeRecord],
        periods_per_year: f64,
    ) -> Self {
        let (total_trades, winning_trades) = count_closing_trades(trade_log);

        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64
        } else {
            0.0
        };

        let max_drawdown = compute_drawdown(portfolio_values);
        let (annualized_return, annualized_volatility) =
            compute_annualized(portfolio_values, periods_per_year);

        let sharpe_ratio = if annualized_volatility > 0.0 {
            annualized_return / annualized_volatility
        } else {
            0.0
        };

        MetricsReport {
            total_trades,
            win_rate,
            max_drawdown,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
        }
    }
}

/// Count closing events (Sell, StopLoss, TakeProfit) and how many of them
/// exited above the entry price of the Buy they close.
///
/// Counting closes directly stays correct when forced exits break the
/// alternating Buy/Sell pattern, which pair-and-halve counting does not.
fn count_closing_trades(trade_log: &[TradeRecord]) -> (usize, usize) {
    let mut total = 0usize;
    let mut winners = 0usize;
    let mut open_entry_price: Option<f64> = None;

    for record in trade_log {
        match record.kind {
            TradeKind::Buy => open_entry_price = Some(record.price),
            kind if kind.is_close() => {
                total += 1;
                if let Some(entry) = open_entry_price.take() {
                    if record.price > entry {
                        winners += 1;
                    }
                }
            }
            _ => {}
        }
    }

    (total, winners)
}

/// Largest peak-to-trough decline as a fraction of the running peak. The
/// peak is cumulative up to the current bar, never a future high.
fn compute_drawdown(portfolio_values: &[PortfolioPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for point in portfolio_values {
        if point.value > peak {
            peak = point.value;
        } else if peak > 0.0 {
            let dd = (peak - point.value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Mean and population stddev of bar-over-bar percentage returns, scaled
/// to annual terms. The first bar has no return and is excluded.
fn compute_annualized(portfolio_values: &[PortfolioPoint], periods_per_year: f64) -> (f64, f64) {
    if portfolio_values.len() < 2 {
        return (0.0, 0.0);
    }

    let returns: Vec<f64> = portfolio_values
        .windows(2)
        .map(|w| {
            let prev = w[0].value;
            if prev > 0.0 {
                (w[1].value - prev) / prev
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    let annualized_return = mean * periods_per_year;
    let annualized_volatility = variance.sqrt() * periods_per_year.sqrt();

    (annualized_return, annualized_volatility)
}
