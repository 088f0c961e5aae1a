//! Data access port trait.

use crate::domain::error::RsirevError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Prices with their periodic returns, optionally restricted to an
    /// inclusive date window.
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, RsirevError>;

    /// First date, last date and row count, or `None` when there is no data.
    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsirevError> {
        let prices = self.fetch_prices(None, None)?;
        Ok(match (prices.first_date(), prices.last_date()) {
            (Some(first), Some(last)) => Some((first, last, prices.len())),
            _ => None,
        })
    }
}
