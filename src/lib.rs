//! DivScan Library
//!
//! Scans historical price bars for the confluence of two independent
//! technical patterns: pivot-confirmed RSI divergence and institutional
//! order-block zones.

pub mod analytics;
pub mod config;
pub mod data;
pub mod scanner;
pub mod types;
