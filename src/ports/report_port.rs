//! Report generation port trait.

use crate::domain::error::AlgocraftError;
use crate::domain::metrics::MetricsReport;
use crate::domain::simulation::SimulationResult;

/// Port for persisting a finished backtest.
pub trait ReportPort {
    fn write(
        &self,
        result: &SimulationResult,
        metrics: &MetricsReport,
        output_dir: &str,
    ) -> Result<(), AlgocraftError>;
}
