//! Core domain types and logic.

pub mod analytics;
pub mod calendar;
pub mod config_validation;
pub mod error;
pub(crate) mod lenient;
pub mod performance;
pub mod trade;
pub mod validation;
