//! CSV price file adapter.
//!
//! Columns are located by header name, case-insensitively:
//! - date:   `Time` or `Date` (`%m/%d/%y`, `%m/%d/%Y` or `%Y-%m-%d`)
//! - close:  `Last` or `Close`
//! - change: `%Change` or `Change`; a trailing `%` means percent units,
//!   otherwise the value is already fractional. Optional: without it returns
//!   are derived from consecutive closes and the first row is dropped.
//!
//! Rows whose change cell is blank have no return and are skipped.

use crate::domain::backtest::AttributedReturn;
use crate::domain::error::RsirevError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const DATE_COLUMNS: &[&str] = &["time", "date"];
const CLOSE_COLUMNS: &[&str] = &["last", "close"];
const CHANGE_COLUMNS: &[&str] = &["%change", "change"];
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<(NaiveDate, f64, Option<f64>)>, RsirevError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| RsirevError::DataParse {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        let headers = rdr
            .headers()
            .map_err(|e| RsirevError::DataParse {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        // names are in priority order
        let find = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
        };
        let date_col = find(DATE_COLUMNS).ok_or_else(|| RsirevError::DataParse {
            reason: "missing date column (Time or Date)".into(),
        })?;
        let close_col = find(CLOSE_COLUMNS).ok_or_else(|| RsirevError::DataParse {
            reason: "missing close column (Last or Close)".into(),
        })?;
        let change_col = find(CHANGE_COLUMNS);

        let mut rows = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| RsirevError::DataParse {
                reason: format!("CSV parse error: {}", e),
            })?;
            // header is line 1
            let row = line + 2;

            let date = parse_date(record.get(date_col).unwrap_or_default(), row)?;
            let close = parse_number(record.get(close_col).unwrap_or_default(), "close", row)?;
            let change = match change_col {
                Some(col) => {
                    let cell = record.get(col).unwrap_or_default();
                    if cell.is_empty() {
                        tracing::warn!(row, %date, "blank change cell, skipping row");
                        continue;
                    }
                    Some(parse_change(cell, row)?)
                }
                None => None,
            };
            rows.push((date, close, change));
        }

        rows.sort_by_key(|r| r.0);
        Ok(rows)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, RsirevError> {
        let rows: Vec<_> = self
            .read_rows()?
            .into_iter()
            .filter(|(date, _, _)| start_date.is_none_or(|s| *date >= s))
            .filter(|(date, _, _)| end_date.is_none_or(|e| *date <= e))
            .collect();

        let has_change = rows.iter().all(|r| r.2.is_some());
        let bars = if has_change {
            rows.into_iter()
                .map(|(date, close, change)| PriceBar {
                    date,
                    close,
                    change: change.unwrap_or_default(),
                })
                .collect()
        } else {
            tracing::debug!(path = %self.path.display(), "no change column, deriving returns from closes");
            derive_from_closes(&rows)?
        };

        tracing::debug!(path = %self.path.display(), bars = bars.len(), "loaded prices");
        PriceSeries::new(bars)
    }
}

fn derive_from_closes(rows: &[(NaiveDate, f64, Option<f64>)]) -> Result<Vec<PriceBar>, RsirevError> {
    rows.windows(2)
        .map(|w| {
            let (prev_date, prev_close, _) = w[0];
            let (date, close, _) = w[1];
            if prev_close == 0.0 {
                return Err(RsirevError::DataParse {
                    reason: format!("zero close on {} cannot produce a return", prev_date),
                });
            }
            Ok(PriceBar {
                date,
                close,
                change: close / prev_close - 1.0,
            })
        })
        .collect()
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate, RsirevError> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| RsirevError::DataParse {
            reason: format!("row {}: invalid date '{}'", row, value),
        })
}

fn parse_number(value: &str, field: &str, row: usize) -> Result<f64, RsirevError> {
    value
        .replace(',', "")
        .parse::<f64>()
        .map_err(|e| RsirevError::DataParse {
            reason: format!("row {}: invalid {} value '{}': {}", row, field, value, e),
        })
}

fn parse_change(value: &str, row: usize) -> Result<f64, RsirevError> {
    match value.strip_suffix('%') {
        Some(pct) => Ok(parse_number(pct.trim(), "change", row)? / 100.0),
        None => parse_number(value, "change", row),
    }
}

/// Export attributed returns as `date,leverage,market_return,strategy_return`.
pub fn write_attributed_returns<P: AsRef<Path>>(
    path: P,
    rows: &[AttributedReturn],
) -> Result<(), RsirevError> {
    let to_err = |e: csv::Error| RsirevError::DataParse {
        reason: format!("CSV write error: {}", e),
    };
    let mut wtr = csv::Writer::from_path(path.as_ref()).map_err(to_err)?;
    wtr.write_record(["date", "leverage", "market_return", "strategy_return"])
        .map_err(to_err)?;
    for row in rows {
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.leverage.to_string(),
            row.market_return.to_string(),
            row.strategy_return.to_string(),
        ])
        .map_err(to_err)?;
    }
    wtr.flush()?;
    Ok(())
}
