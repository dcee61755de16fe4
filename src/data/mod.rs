/// Data layer: flight records, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  data/csv{year}.csv
///        │
///        ▼
///   ┌─────────────┐
///   │ year_loader  │  one background load per year selection, stale results dropped
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  CSV text → FlightDataset (bad rows logged and skipped)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ FlightDataset  │  Vec<FlightRecord>, entity index
///   └───────────────┘
///        │
///        ├──► filter     entity × (season | date range) → date-sorted records
///        └──► aggregate  per-entity totals, weekly ratio vs 2019
/// ```

pub mod aggregate;
pub mod date;
pub mod filter;
pub mod loader;
pub mod model;
pub mod season;
pub mod year_loader;
