use thiserror::Error;

/// Errors produced by the aggregation engine.
///
/// Aggregation itself never fails: missing sources, malformed rows and unknown
/// roots all degrade to empty or zero results. Errors surface only at the
/// configuration and document-ingestion boundaries.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine configuration is inconsistent (negative rate, retention of
    /// 100 % or more, zero depth, ...).
    #[error("Invalid engine configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A snapshot document could not be parsed as JSON at all.
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A snapshot document parsed, but its top level is not an array of rows.
    #[error("Snapshot must be a JSON array of rows, found {found}")]
    NotAnArray { found: &'static str },

    /// A single row of a snapshot is unusable. Ingestion counts and skips
    /// these; they never abort a whole document.
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

impl EngineError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
