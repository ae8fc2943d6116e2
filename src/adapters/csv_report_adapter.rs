//! CSV report adapter.
//!
//! Writes three files into the output directory: `trades.csv` (the trade
//! log), `equity.csv` (per-bar portfolio value) and `metrics.csv` (one row
//! per metric).

use crate::domain::error::AlgocraftError;
use crate::domain::metrics::MetricsReport;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct TradeRow {
    timestamp: String,
    kind: String,
    price: f64,
    holdings: f64,
    cash: f64,
    portfolio_value: f64,
}

#[derive(Serialize)]
struct EquityRow {
    timestamp: String,
    value: f64,
}

#[derive(Serialize)]
struct MetricRow {
    metric: &'static str,
    value: f64,
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn write_trades(result: &SimulationResult, dir: &Path) -> Result<(), AlgocraftError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(dir.join("trades.csv"))?;
        // Explicit header so an empty trade log still produces a valid file.
        writer.write_record(["timestamp", "kind", "price", "holdings", "cash", "portfolio_value"])?;
        for record in &result.trade_log {
            writer.serialize(TradeRow {
                timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                kind: record.kind.to_string(),
                price: record.price,
                holdings: record.holdings,
                cash: record.cash,
                portfolio_value: record.portfolio_value,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_equity(result: &SimulationResult, dir: &Path) -> Result<(), AlgocraftError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(dir.join("equity.csv"))?;
        writer.write_record(["timestamp", "value"])?;
        for point in &result.portfolio_values {
            writer.serialize(EquityRow {
                timestamp: point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                value: point.value,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_metrics(metrics: &MetricsReport, dir: &Path) -> Result<(), AlgocraftError> {
        let mut writer = csv::Writer::from_path(dir.join("metrics.csv"))?;
        let rows = [
            MetricRow {
                metric: "total_trades",
                value: metrics.total_trades as f64,
            },
            MetricRow {
                metric: "win_rate",
                value: metrics.win_rate,
            },
            MetricRow {
                metric: "max_drawdown",
                value: metrics.max_drawdown,
            },
            MetricRow {
                metric: "annualized_return",
                value: metrics.annualized_return,
            },
            MetricRow {
                metric: "annualized_volatility",
                value: metrics.annualized_volatility,
            },
            MetricRow {
                metric: "sharpe_ratio",
                value: metrics.sharpe_ratio,
            },
        ];
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &SimulationResult,
        metrics: &MetricsReport,
        output_dir: &str,
    ) -> Result<(), AlgocraftError> {
        let dir = Path::new(output_dir);
        fs::create_dir_all(dir)?;

        Self::write_trades(result, dir)?;
        Self::write_equity(result, dir)?;
        Self::write_metrics(metrics, dir)?;
        Ok(())
    }
}
