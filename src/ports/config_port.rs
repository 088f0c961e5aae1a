//! Configuration access port trait.

use crate::domain::error::RsirevError;
use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Like `get_int`, but a value that is present and not an integer is an
    /// error instead of falling back to `default`.
    fn get_int_strict(&self, section: &str, key: &str, default: i64) -> Result<i64, RsirevError> {
        parse_present(self.get_string(section, key), section, key, "an integer", default)
    }

    /// Like `get_double`, but a value that is present and not a number is an
    /// error instead of falling back to `default`.
    fn get_double_strict(
        &self,
        section: &str,
        key: &str,
        default: f64,
    ) -> Result<f64, RsirevError> {
        parse_present(self.get_string(section, key), section, key, "a number", default)
    }

    /// Optional `YYYY-MM-DD` date. Missing or blank is `Ok(None)`.
    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, RsirevError> {
        match self.get_string(section, key) {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Some)
                .map_err(|_| RsirevError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
                }),
        }
    }
}

fn parse_present<T: std::str::FromStr>(
    raw: Option<String>,
    section: &str,
    key: &str,
    expected: &str,
    default: T,
) -> Result<T, RsirevError> {
    match raw {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| RsirevError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not {}", s.trim(), expected),
        }),
    }
}
