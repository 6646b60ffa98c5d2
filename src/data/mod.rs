/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///   historical.csv / forecast.csv / data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ObservationTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ ObservationTable │  Vec<Observation>, features present, statuses
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  table / predictions → delimited bytes
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
