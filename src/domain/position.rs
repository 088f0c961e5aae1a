//! Oscillator-to-leverage mapping.
//!
//! RSI <= oversold   => max_long
//! RSI >= overbought => max_short
//! otherwise         => straight line from max_long (at oversold) to max_short
//!                      (at overbought)

use crate::domain::error::RsirevError;
use crate::domain::indicator::IndicatorSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub oversold: f64,
    pub overbought: f64,
    pub max_long: f64,
    pub max_short: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
            max_long: 1.5,
            max_short: -1.0,
        }
    }
}

impl SignalThresholds {
    pub fn validate(&self) -> Result<(), RsirevError> {
        let fields = [
            ("oversold", self.oversold),
            ("overbought", self.overbought),
            ("max_long", self.max_long),
            ("max_short", self.max_short),
        ];
        for (key, value) in fields {
            if !value.is_finite() {
                return Err(RsirevError::invalid("strategy", key, "must be a finite number"));
            }
        }
        if self.oversold >= self.overbought {
            return Err(RsirevError::invalid(
                "strategy",
                "oversold",
                "oversold must be below overbought",
            ));
        }
        Ok(())
    }

    /// Target leverage for a single defined oscillator value.
    ///
    /// Assumes validated thresholds; the result always lies between
    /// `max_short` and `max_long` inclusive.
    pub fn leverage_for(&self, rsi: f64) -> f64 {
        if rsi <= self.oversold {
            self.max_long
        } else if rsi >= self.overbought {
            self.max_short
        } else {
            let t = (rsi - self.oversold) / (self.overbought - self.oversold);
            self.max_long + t * (self.max_short - self.max_long)
        }
    }

    /// Lower and upper leverage bounds, whichever way round the limits are set.
    pub fn bounds(&self) -> (f64, f64) {
        (
            self.max_long.min(self.max_short),
            self.max_long.max(self.max_short),
        )
    }
}

/// Leverage decided at the close of `date`. `None` means no exposure.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionPoint {
    pub date: NaiveDate,
    pub leverage: Option<f64>,
}

pub fn map_positions(
    oscillator: &IndicatorSeries,
    thresholds: &SignalThresholds,
) -> Result<Vec<PositionPoint>, RsirevError> {
    thresholds.validate()?;
    Ok(oscillator
        .values
        .iter()
        .map(|point| PositionPoint {
            date: point.date,
            leverage: point.value.map(|rsi| thresholds.leverage_for(rsi)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{IndicatorPoint, IndicatorType};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn series(values: &[Option<f64>]) -> IndicatorSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        IndicatorSeries {
            indicator_type: IndicatorType::Rsi(14),
            values: values
                .iter()
                .enumerate()
                .map(|(i, &value)| IndicatorPoint {
                    date: start + chrono::Duration::days(i as i64),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn default_thresholds() {
        let t = SignalThresholds::default();
        assert_eq!(t.oversold, 30.0);
        assert_eq!(t.overbought, 70.0);
        assert_eq!(t.max_long, 1.5);
        assert_eq!(t.max_short, -1.0);
    }

    #[test]
    fn oversold_maps_to_max_long() {
        let t = SignalThresholds::default();
        assert_eq!(t.leverage_for(0.0), 1.5);
        assert_eq!(t.leverage_for(30.0), 1.5);
    }

    #[test]
    fn overbought_maps_to_max_short() {
        let t = SignalThresholds::default();
        assert_eq!(t.leverage_for(70.0), -1.0);
        assert_eq!(t.leverage_for(100.0), -1.0);
    }

    #[test]
    fn midpoint_interpolates() {
        let t = SignalThresholds::default();
        // halfway between 1.5 and -1.0
        assert_abs_diff_eq!(t.leverage_for(50.0), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(t.leverage_for(40.0), 0.875, epsilon = 1e-12);
    }

    #[test]
    fn undefined_oscillator_gives_undefined_position() {
        let positions =
            map_positions(&series(&[None, Some(20.0), None, Some(80.0)]), &Default::default())
                .unwrap();
        let leverage: Vec<_> = positions.iter().map(|p| p.leverage).collect();
        assert_eq!(leverage, vec![None, Some(1.5), None, Some(-1.0)]);
    }

    #[test]
    fn equal_thresholds_fail_fast() {
        let t = SignalThresholds {
            oversold: 50.0,
            overbought: 50.0,
            ..Default::default()
        };
        let err = map_positions(&series(&[Some(50.0)]), &t).unwrap_err();
        assert!(matches!(err, RsirevError::ConfigInvalid { key, .. } if key == "oversold"));
    }

    #[test]
    fn inverted_thresholds_fail_fast() {
        let t = SignalThresholds {
            oversold: 70.0,
            overbought: 30.0,
            ..Default::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let t = SignalThresholds {
            max_long: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            t.validate().unwrap_err(),
            RsirevError::ConfigInvalid { key, .. } if key == "max_long"
        ));
    }

    #[test]
    fn swapped_limits_still_bounded() {
        let t = SignalThresholds {
            max_long: -0.5,
            max_short: 2.0,
            ..Default::default()
        };
        assert_eq!(t.bounds(), (-0.5, 2.0));
        let mid = t.leverage_for(50.0);
        assert!(mid > -0.5 && mid < 2.0);
    }

    proptest! {
        #[test]
        fn leverage_within_bounds(rsi in 0.0..=100.0_f64) {
            let t = SignalThresholds::default();
            let (lo, hi) = t.bounds();
            let lev = t.leverage_for(rsi);
            prop_assert!(lev >= lo && lev <= hi);
        }

        #[test]
        fn leverage_non_increasing(a in 0.0..=100.0_f64, b in 0.0..=100.0_f64) {
            let t = SignalThresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.leverage_for(lo) >= t.leverage_for(hi));
        }
    }
}
