#![allow(dead_code)]

use chrono::NaiveDate;
use rsirev::domain::error::RsirevError;
pub use rsirev::domain::price::{PriceBar, PriceSeries};
use rsirev::ports::data_port::DataPort;

/// Serves a fixed series, honouring the date window like the CSV adapter.
pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, RsirevError> {
        if let Some(reason) = &self.error {
            return Err(RsirevError::DataParse {
                reason: reason.clone(),
            });
        }
        let bars = self
            .bars
            .iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .cloned()
            .collect();
        PriceSeries::new(bars)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bars from closes; each change is close-over-close, the first is 0.
pub fn bars_from_closes(start: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            close,
            change: if i == 0 {
                0.0
            } else {
                close / closes[i - 1] - 1.0
            },
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(bars_from_closes("2024-01-01", closes)).unwrap()
}

/// The documented scenario prefix, extended deterministically to `count` points.
pub fn scenario_closes(count: usize) -> Vec<f64> {
    let mut closes = vec![
        100.0, 102.0, 101.0, 105.0, 107.0, 103.0, 99.0, 98.0, 100.0, 104.0,
    ];
    let steps = [1.5, -2.0, 0.5, -1.0, 3.0, -2.5, 1.0, -0.5, 2.0, -3.0, 1.0];
    let mut i = 0;
    while closes.len() < count {
        let last = *closes.last().unwrap();
        closes.push(last + steps[i % steps.len()]);
        i += 1;
    }
    closes.truncate(count);
    closes
}

/// Renders closes in the QQQ export layout (m/d/y dates, percent change).
pub fn qqq_csv(closes: &[f64]) -> String {
    let bars = bars_from_closes("2020-01-01", closes);
    let mut out = String::from("Time,Open,High,Low,Last,Change,%Change,Volume\n");
    for (i, bar) in bars.iter().enumerate() {
        let points = if i == 0 { 0.0 } else { bar.close - closes[i - 1] };
        out.push_str(&format!(
            "{},{},{},{},{},{:.2},{}%,1000\n",
            bar.date.format("%m/%d/%y"),
            bar.close,
            bar.close + 1.0,
            bar.close - 1.0,
            bar.close,
            points,
            bar.change * 100.0,
        ));
    }
    out
}
