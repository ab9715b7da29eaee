//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod frame;
pub mod dashboard;
pub mod settings;
pub mod config_validation;
pub mod error;
