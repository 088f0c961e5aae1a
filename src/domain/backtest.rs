//! Return attribution.
//!
//! A position decided at the close of bar i earns the market return realized
//! during bar i+1. The final bar has no following return and is dropped, as is
//! every bar whose position is undefined.

use crate::domain::error::RsirevError;
use crate::domain::position::PositionPoint;
use crate::domain::price::PriceBar;
use chrono::NaiveDate;

/// One realized strategy period, keyed by the decision date.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedReturn {
    pub date: NaiveDate,
    pub leverage: f64,
    pub market_return: f64,
    pub strategy_return: f64,
}

pub fn attribute_returns(
    bars: &[PriceBar],
    positions: &[PositionPoint],
) -> Result<Vec<AttributedReturn>, RsirevError> {
    if bars.len() != positions.len() {
        return Err(RsirevError::invalid(
            "backtest",
            "positions",
            format!(
                "{} positions do not align with {} price bars",
                positions.len(),
                bars.len()
            ),
        ));
    }

    let attributed = positions
        .iter()
        .zip(bars.iter().skip(1))
        .filter_map(|(position, next_bar)| {
            let leverage = position.leverage?;
            Some(AttributedReturn {
                date: position.date,
                leverage,
                market_return: next_bar.change,
                strategy_return: leverage * next_bar.change,
            })
        })
        .collect();

    Ok(attributed)
}

/// Buy-and-hold benchmark on the same next-period alignment: full exposure
/// from the first close onwards.
pub fn benchmark_returns(bars: &[PriceBar]) -> Vec<AttributedReturn> {
    bars.windows(2)
        .map(|w| AttributedReturn {
            date: w[0].date,
            leverage: 1.0,
            market_return: w[1].change,
            strategy_return: w[1].change,
        })
        .collect()
}

pub fn strategy_returns(attributed: &[AttributedReturn]) -> Vec<f64> {
    attributed.iter().map(|a| a.strategy_return).collect()
}
