//! RSI (Relative Strength Index) oscillator.
//!
//! Gains and losses of consecutive closes are each smoothed with Wilder's
//! exponential average, alpha = 1/n, seeded with the first observed change:
//! - avg[1] = x[1]
//! - avg[i] = (1 - alpha) * avg[i-1] + alpha * x[i]
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 the ratio is undefined and so is the RSI at that bar.
//!
//! Warmup: first n bars are undefined (need n price changes before emitting).

use crate::domain::error::RsirevError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceBar;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> Result<IndicatorSeries, RsirevError> {
    if period == 0 {
        return Err(RsirevError::invalid(
            "strategy",
            "period",
            "period must be at least 1",
        ));
    }

    let alpha = 1.0 / period as f64;
    let mut values = Vec::with_capacity(bars.len());
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            values.push(IndicatorPoint {
                date: bar.date,
                value: None,
            });
            continue;
        }

        let change = bar.close - bars[i - 1].close;
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if i == 1 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
            avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;
        }

        // i changes observed so far
        let value = if i < period {
            None
        } else {
            rsi_from_averages(avg_gain, avg_loss)
        };
        values.push(IndicatorPoint {
            date: bar.date,
            value,
        });
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    })
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return None;
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
