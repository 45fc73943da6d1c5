//! Error types for snapshot sourcing.

use {pr_network_engine::EngineError, std::path::PathBuf, thiserror::Error};

/// Errors that can occur while configuring or fetching snapshots.
///
/// The loader never surfaces fetch errors to the aggregation layer; it logs
/// them and substitutes an unavailable snapshot. They are returned directly
/// only by the low-level fetch methods and by configuration loading.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading a local snapshot or config file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request itself failed (DNS, connect, timeout, body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The configuration file is not valid TOML for [`crate::SourceConfig`].
    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A snapshot could not be ingested.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The source configuration is inconsistent.
    #[error("invalid source configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Convenience result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
