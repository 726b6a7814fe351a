/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  assets/*.json (compiled in)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate records → Dataset (+ warnings)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<FaultSystem>, Vec<HistoricalEarthquake>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterCriteria → borrowed views
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;

use thiserror::Error;

/// Fatal dataset problems. Anything recoverable (a single bad record) is
/// reported as a warning on the [`model::Dataset`] instead.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The embedded source could not be parsed as JSON at all.
    #[error("{table} data is not valid JSON: {source}")]
    Json {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The embedded source is valid JSON but not a list of records.
    #[error("{table} data is not a list of records")]
    NotAList { table: &'static str },

    /// No usable record carries one or more columns every consumer needs.
    #[error("{table} data is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<&'static str>,
    },
}
