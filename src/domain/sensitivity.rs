//! Lookback sensitivity check: the full pipeline re-run at 90%, 100% and 110%
//! of the base RSI period.

use crate::domain::error::RsirevError;
use crate::domain::metrics::MetricReport;
use crate::domain::price::PriceSeries;
use crate::domain::strategy::{run_strategy, StrategyConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityRun {
    pub period: usize,
    pub report: MetricReport,
    /// Sharpe of this run minus Sharpe of the base-period run.
    pub sharpe_delta: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityReport {
    pub base_period: usize,
    pub runs: Vec<SensitivityRun>,
}

impl SensitivityReport {
    pub fn base(&self) -> Option<&SensitivityRun> {
        self.runs.iter().find(|r| r.period == self.base_period)
    }
}

/// Perturbed periods in run order: round(0.9 * base), base, round(1.1 * base).
///
/// Halves round to even, so a base of 5 yields 4 (4.5) and 6 (5.5).
pub fn sensitivity_periods(base: usize) -> Result<[usize; 3], RsirevError> {
    if base == 0 {
        return Err(RsirevError::invalid(
            "strategy",
            "period",
            "period must be at least 1",
        ));
    }
    let scaled = |factor: f64| ((base as f64 * factor).round_ties_even() as usize).max(1);
    Ok([scaled(0.9), base, scaled(1.1)])
}

pub fn run_sensitivity(
    prices: &PriceSeries,
    base: &StrategyConfig,
) -> Result<SensitivityReport, RsirevError> {
    let periods = sensitivity_periods(base.period)?;

    let mut reports = Vec::with_capacity(periods.len());
    for period in periods {
        let run = run_strategy(prices, &base.with_period(period))?;
        tracing::info!(period, sharpe = run.report.sharpe_ratio, "sensitivity run");
        reports.push((period, run.report));
    }

    let base_sharpe = reports[1].1.sharpe_ratio;
    let runs = reports
        .into_iter()
        .map(|(period, report)| SensitivityRun {
            period,
            sharpe_delta: report.sharpe_ratio - base_sharpe,
            report,
        })
        .collect();

    Ok(SensitivityReport {
        base_period: base.period,
        runs,
    })
}
