//! Report generation port trait.

use crate::domain::error::RsirevError;
use crate::domain::metrics::MetricReport;
use crate::domain::sensitivity::SensitivityReport;
use std::io::Write;

/// Port for rendering run results.
pub trait ReportPort {
    fn write_metrics(
        &self,
        out: &mut dyn Write,
        label: &str,
        report: &MetricReport,
    ) -> Result<(), RsirevError>;

    fn write_sensitivity(
        &self,
        out: &mut dyn Write,
        report: &SensitivityReport,
    ) -> Result<(), RsirevError>;
}
