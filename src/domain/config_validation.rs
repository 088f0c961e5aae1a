//! Configuration validation.
//!
//! Validates all config fields before any data is loaded.

use crate::domain::error::RsirevError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), RsirevError> {
    validate_data_config(config)?;
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), RsirevError> {
    let start_date = config.get_date("data", "start_date")?;
    let end_date = config.get_date("data", "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(RsirevError::invalid(
                "data",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), RsirevError> {
    validate_period(config)?;
    validate_thresholds(config)?;
    validate_leverage(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), RsirevError> {
    let value = config.get_int_strict("backtest", "periods_per_year", 252)?;
    if !(1..=i64::from(u32::MAX)).contains(&value) {
        return Err(RsirevError::invalid(
            "backtest",
            "periods_per_year",
            "periods_per_year must be at least 1",
        ));
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), RsirevError> {
    let value = config.get_int_strict("strategy", "period", 14)?;
    if value < 1 {
        return Err(RsirevError::invalid(
            "strategy",
            "period",
            "period must be at least 1",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), RsirevError> {
    let oversold = config.get_double_strict("strategy", "oversold", 30.0)?;
    let overbought = config.get_double_strict("strategy", "overbought", 70.0)?;

    for (key, value) in [("oversold", oversold), ("overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(RsirevError::invalid(
                "strategy",
                key,
                format!("{} must be between 0 and 100", key),
            ));
        }
    }
    if oversold >= overbought {
        return Err(RsirevError::invalid(
            "strategy",
            "oversold",
            "oversold must be below overbought",
        ));
    }
    Ok(())
}

fn validate_leverage(config: &dyn ConfigPort) -> Result<(), RsirevError> {
    let max_long = config.get_double_strict("strategy", "max_long", 1.5)?;
    let max_short = config.get_double_strict("strategy", "max_short", -1.0)?;

    for (key, value) in [("max_long", max_long), ("max_short", max_short)] {
        if !value.is_finite() {
            return Err(RsirevError::invalid(
                "strategy",
                key,
                format!("{} must be a finite number", key),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockConfig {
        values: HashMap<(String, String), String>,
    }

    impl MockConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            let values = entries
                .iter()
                .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                .collect();
            Self { values }
        }
    }

    impl ConfigPort for MockConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn assert_invalid(result: Result<(), RsirevError>, expected_key: &str) {
        match result {
            Err(RsirevError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        let config = MockConfig::new(&[]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn full_valid_config() {
        let config = MockConfig::new(&[
            ("data", "path", "qqq.csv"),
            ("data", "start_date", "2013-01-01"),
            ("data", "end_date", "2023-12-31"),
            ("strategy", "period", "10"),
            ("strategy", "oversold", "25"),
            ("strategy", "overbought", "75"),
            ("strategy", "max_long", "2.0"),
            ("strategy", "max_short", "-0.5"),
            ("backtest", "periods_per_year", "52"),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_period() {
        let config = MockConfig::new(&[("strategy", "period", "0")]);
        assert_invalid(validate_strategy_config(&config), "period");
    }

    #[test]
    fn negative_period() {
        let config = MockConfig::new(&[("strategy", "period", "-3")]);
        assert_invalid(validate_strategy_config(&config), "period");
    }

    #[test]
    fn equal_thresholds() {
        let config = MockConfig::new(&[
            ("strategy", "oversold", "50"),
            ("strategy", "overbought", "50"),
        ]);
        assert_invalid(validate_strategy_config(&config), "oversold");
    }

    #[test]
    fn threshold_out_of_range() {
        let config = MockConfig::new(&[("strategy", "overbought", "120")]);
        assert_invalid(validate_strategy_config(&config), "overbought");
    }

    #[test]
    fn non_finite_leverage() {
        let config = MockConfig::new(&[("strategy", "max_long", "inf")]);
        assert_invalid(validate_strategy_config(&config), "max_long");
    }

    #[test]
    fn zero_periods_per_year() {
        let config = MockConfig::new(&[("backtest", "periods_per_year", "0")]);
        assert_invalid(validate_backtest_config(&config), "periods_per_year");
    }

    #[test]
    fn non_numeric_period() {
        let config = MockConfig::new(&[("strategy", "period", "fourteen")]);
        assert_invalid(validate_strategy_config(&config), "period");
    }

    #[test]
    fn non_numeric_thresholds_and_leverage() {
        let config = MockConfig::new(&[("strategy", "oversold", "3O")]);
        assert_invalid(validate_strategy_config(&config), "oversold");

        let config = MockConfig::new(&[("strategy", "max_short", "-1,0")]);
        assert_invalid(validate_strategy_config(&config), "max_short");
    }

    #[test]
    fn non_numeric_periods_per_year() {
        let config = MockConfig::new(&[("backtest", "periods_per_year", "daily")]);
        assert_invalid(validate_backtest_config(&config), "periods_per_year");
    }

    #[test]
    fn blank_numeric_value_uses_default() {
        let config = MockConfig::new(&[("strategy", "period", "")]);
        assert!(validate_strategy_config(&config).is_ok());
    }

    #[test]
    fn bad_date_format() {
        let config = MockConfig::new(&[("data", "start_date", "01/02/2013")]);
        assert_invalid(validate_data_config(&config), "start_date");
    }

    #[test]
    fn start_after_end() {
        let config = MockConfig::new(&[
            ("data", "start_date", "2024-01-01"),
            ("data", "end_date", "2023-01-01"),
        ]);
        assert_invalid(validate_data_config(&config), "start_date");
    }

    #[test]
    fn blank_dates_are_ignored() {
        let config = MockConfig::new(&[("data", "start_date", "  ")]);
        assert!(validate_data_config(&config).is_ok());
    }
}
