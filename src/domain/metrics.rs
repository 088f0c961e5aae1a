//! Performance metrics over a periodic return series.
//!
//! - Sharpe: mean / sample stddev (N-1) * sqrt(periods_per_year), 0 when the
//!   stddev is 0 or undefined (single sample)
//! - Total return: product of (1 + r) minus 1
//! - Annualized return: (1 + mean)^periods_per_year - 1. This annualizes the
//!   arithmetic mean and is an approximation; it does not match annualizing the
//!   compounded total return.
//! - Max drawdown: min of (curve / running peak - 1) over the compounded curve,
//!   reported as a non-positive fraction

use crate::domain::error::RsirevError;

pub const TRADING_DAYS_PER_YEAR: u32 = 252;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricReport {
    pub sharpe_ratio: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub sample_count: usize,
}

impl MetricReport {
    pub fn compute(returns: &[f64], periods_per_year: u32) -> Result<Self, RsirevError> {
        if returns.is_empty() {
            return Err(RsirevError::EmptyReturns);
        }
        if periods_per_year == 0 {
            return Err(RsirevError::invalid(
                "backtest",
                "periods_per_year",
                "periods_per_year must be at least 1",
            ));
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let stddev = sample_stddev(returns, mean);

        let sharpe_ratio = match stddev {
            Some(sd) if sd != 0.0 => (mean / sd) * f64::from(periods_per_year).sqrt(),
            _ => 0.0,
        };

        let total_return = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
        let annualized_return = (1.0 + mean).powf(f64::from(periods_per_year)) - 1.0;

        Ok(MetricReport {
            sharpe_ratio,
            total_return,
            annualized_return,
            max_drawdown: compute_drawdown(returns),
            sample_count: returns.len(),
        })
    }
}

fn sample_stddev(returns: &[f64], mean: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    // identical samples: the mean may carry rounding error, the spread does not
    if returns.iter().all(|r| *r == returns[0]) {
        return Some(0.0);
    }
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    Some(variance.sqrt())
}

fn compute_drawdown(returns: &[f64]) -> f64 {
    let mut equity = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for r in returns {
        equity *= 1.0 + r;
        if equity > peak {
            peak = equity;
        }
        let dd = equity / peak - 1.0;
        if dd < max_dd {
            max_dd = dd;
        }
    }

    max_dd
}
