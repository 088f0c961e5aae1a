//! Strategy configuration and the single-run pipeline:
//! prices -> RSI -> leverage -> attributed returns -> metrics.

use crate::domain::backtest::{
    attribute_returns, benchmark_returns, strategy_returns, AttributedReturn,
};
use crate::domain::error::RsirevError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::metrics::{MetricReport, TRADING_DAYS_PER_YEAR};
use crate::domain::position::{map_positions, PositionPoint, SignalThresholds};
use crate::domain::price::PriceSeries;

pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyConfig {
    pub period: usize,
    pub thresholds: SignalThresholds,
    pub periods_per_year: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_RSI_PERIOD,
            thresholds: SignalThresholds::default(),
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), RsirevError> {
        if self.period == 0 {
            return Err(RsirevError::invalid(
                "strategy",
                "period",
                "period must be at least 1",
            ));
        }
        if self.periods_per_year == 0 {
            return Err(RsirevError::invalid(
                "backtest",
                "periods_per_year",
                "periods_per_year must be at least 1",
            ));
        }
        self.thresholds.validate()
    }

    pub fn with_period(self, period: usize) -> Self {
        Self { period, ..self }
    }
}

/// Every intermediate series of one pipeline run, plus its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub config: StrategyConfig,
    pub oscillator: IndicatorSeries,
    pub positions: Vec<PositionPoint>,
    pub attributed: Vec<AttributedReturn>,
    pub report: MetricReport,
}

pub fn run_strategy(
    prices: &PriceSeries,
    config: &StrategyConfig,
) -> Result<StrategyRun, RsirevError> {
    config.validate()?;

    let oscillator = calculate_rsi(prices.bars(), config.period)?;
    let positions = map_positions(&oscillator, &config.thresholds)?;
    let attributed = attribute_returns(prices.bars(), &positions)?;

    if attributed.is_empty() {
        return Err(RsirevError::InsufficientData {
            bars: prices.len(),
            period: config.period,
        });
    }

    let report = MetricReport::compute(&strategy_returns(&attributed), config.periods_per_year)?;
    tracing::debug!(
        period = config.period,
        samples = report.sample_count,
        sharpe = report.sharpe_ratio,
        "strategy run complete"
    );

    Ok(StrategyRun {
        config: *config,
        oscillator,
        positions,
        attributed,
        report,
    })
}

/// Buy-and-hold over the same next-period window the strategy trades in.
pub fn run_benchmark(
    prices: &PriceSeries,
    periods_per_year: u32,
) -> Result<MetricReport, RsirevError> {
    let returns = strategy_returns(&benchmark_returns(prices.bars()));
    MetricReport::compute(&returns, periods_per_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceBar;
    use chrono::NaiveDate;

    fn prices(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                close,
                change: if i == 0 { 0.0 } else { close / closes[i - 1] - 1.0 },
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn default_config() {
        let c = StrategyConfig::default();
        assert_eq!(c.period, 14);
        assert_eq!(c.periods_per_year, 252);
        assert_eq!(c.thresholds, SignalThresholds::default());
    }

    #[test]
    fn with_period_keeps_other_fields() {
        let c = StrategyConfig {
            periods_per_year: 52,
            ..Default::default()
        }
        .with_period(20);
        assert_eq!(c.period, 20);
        assert_eq!(c.periods_per_year, 52);
    }

    #[test]
    fn run_strategy_sample_count() {
        let series = prices(&zigzag(40));
        let run = run_strategy(&series, &StrategyConfig::default()).unwrap();

        assert_eq!(run.oscillator.values.len(), 40);
        assert_eq!(run.positions.len(), 40);
        assert_eq!(run.report.sample_count, 40 - 15);
        assert_eq!(run.attributed.len(), run.report.sample_count);
    }

    #[test]
    fn invalid_config_fails_before_computation() {
        let series = prices(&zigzag(40));
        let config = StrategyConfig::default().with_period(0);
        let err = run_strategy(&series, &config).unwrap_err();
        assert!(matches!(err, RsirevError::ConfigInvalid { key, .. } if key == "period"));
    }

    #[test]
    fn too_short_series_is_insufficient_data() {
        let series = prices(&zigzag(15));
        let err = run_strategy(&series, &StrategyConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RsirevError::InsufficientData { bars: 15, period: 14 }
        ));
    }

    #[test]
    fn benchmark_uses_all_but_first_return() {
        let series = prices(&zigzag(40));
        let report = run_benchmark(&series, 252).unwrap();
        assert_eq!(report.sample_count, 39);
    }
}
