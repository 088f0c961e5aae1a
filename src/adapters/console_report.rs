//! Plain-text report adapter for terminal output.

use crate::domain::error::RsirevError;
use crate::domain::metrics::MetricReport;
use crate::domain::sensitivity::SensitivityReport;
use crate::ports::report_port::ReportPort;
use std::io::Write;

const RULE_WIDTH: usize = 50;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReport;

fn pct(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

impl ReportPort for ConsoleReport {
    fn write_metrics(
        &self,
        out: &mut dyn Write,
        label: &str,
        report: &MetricReport,
    ) -> Result<(), RsirevError> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out)?;
        writeln!(out, "{rule}")?;
        writeln!(out, "  {label}")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "  Sharpe Ratio (ann.)  : {:+.4}", report.sharpe_ratio)?;
        writeln!(out, "  Total Return         : {}", pct(report.total_return))?;
        writeln!(out, "  Ann. Return          : {}", pct(report.annualized_return))?;
        writeln!(out, "  Max Drawdown         : {}", pct(report.max_drawdown))?;
        writeln!(out, "  Num periods          : {}", report.sample_count)?;
        Ok(())
    }

    fn write_sensitivity(
        &self,
        out: &mut dyn Write,
        report: &SensitivityReport,
    ) -> Result<(), RsirevError> {
        writeln!(out)?;
        writeln!(
            out,
            "--- Robustness sweep (RSI period {} +/-10%) ---",
            report.base_period
        )?;
        for run in &report.runs {
            writeln!(
                out,
                "  RSI period={:3} => Sharpe={:+.4}  (delta {:+.4})",
                run.period, run.report.sharpe_ratio, run.sharpe_delta
            )?;
        }
        Ok(())
    }
}
