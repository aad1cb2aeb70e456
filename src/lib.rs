//! Saltwatch - Telemetry API for remote water-quality sensor stations
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod error;
pub mod refresh;
pub mod routes;
pub mod series;
pub mod status;
pub mod store;
