//! Port traits the domain talks through.

pub mod config_port;
pub mod report_port;
pub mod trade_port;
