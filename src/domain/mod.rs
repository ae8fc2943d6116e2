//! Core domain types and logic.

pub mod price;
pub mod indicator;
pub mod signal;
pub mod simulation;
pub mod metrics;
pub mod config_validation;
pub mod error;
