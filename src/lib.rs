//! Flightboard: European air-traffic statistics per country, compared
//! against the 2019 baseline.
//!
//! The library holds everything below the window: CSV ingestion, date and
//! season handling, filtering, aggregation, background year loading and the
//! UI state that ties them together. The `flightboard` binary draws it.

pub mod color;
pub mod config;
pub mod data;
pub mod state;
