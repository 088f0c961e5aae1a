//! Port traits the CLI drives the domain through.

pub mod config_port;
pub mod data_port;
pub mod report_port;
