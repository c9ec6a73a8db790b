use thiserror::Error;

/// Errors raised while building or querying the dashboard dataset.
///
/// Everything except [`DashboardError::EmptySelection`] happens during the
/// one-time initialization and should abort the process.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("cannot open {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("source table is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("state {name:?} has no matching region in the geography file")]
    UnknownRegion { name: String },

    #[error("region name {name:?} appears with two codes ({first} and {second})")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("invalid geography file: {message}")]
    GeoFormat { message: String },

    #[error("no data available based on the current filter settings")]
    EmptySelection,

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// `true` for conditions the caller should report and move past.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptySelection)
    }
}
