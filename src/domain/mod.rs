//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod position;
pub mod backtest;
pub mod metrics;
pub mod strategy;
pub mod sensitivity;
pub mod config_validation;
pub mod error;
