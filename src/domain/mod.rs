//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod compliance;
pub mod signal;
pub mod scanner;
pub mod analysis;
pub mod narrative;
pub mod config;
pub mod universe;
pub mod error;
