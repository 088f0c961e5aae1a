//! Daily price bars and the ordered series the pipeline runs on.

use crate::domain::error::RsirevError;
use chrono::NaiveDate;

/// One period of market data.
///
/// `change` is the fractional return realized during the period that closes on
/// `date` (0.0123 for +1.23%). It is only known once `date` has closed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub change: f64,
}

/// Date-ordered price bars with no duplicate dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, RsirevError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(RsirevError::UnorderedPrices {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        if let Some(bad) = bars
            .iter()
            .find(|b| !b.close.is_finite() || !b.change.is_finite())
        {
            return Err(RsirevError::DataParse {
                reason: format!("non-finite close or change on {}", bad.date),
            });
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
