//! Where snapshots come from, and the engine settings that travel with them.
//!
//! A config file is TOML; every key is optional:
//!
//! ```toml
//! users = "https://example.org/dproject-users.json"
//! pr_bonus_log = "./fixtures/send-pol-report.json"
//! request_timeout_secs = 10
//!
//! [engine]
//! max_depth = 10
//! display_offset_hours = 7
//! ```

use {
    crate::error::{Result, SourceError},
    pr_network_engine::{EngineConfig, PayoutLogKind},
    serde::{Deserialize, Serialize},
    std::{
        fmt,
        path::{Path, PathBuf},
    },
};

pub const DEFAULT_USERS_URL: &str =
    "https://raw.githubusercontent.com/eastern-cyber/dproject-admin-1.0.2/main/public/dproject-users.json";

pub const DEFAULT_PR_BONUS_LOG_URL: &str =
    "https://raw.githubusercontent.com/eastern-cyber/dproject-admin-1.0.2/main/public/send-pol-report.json";

pub const DEFAULT_CARING_BONUS_LOG_URL: &str = "https://raw.githubusercontent.com/eastern-cyber/dproject-admin-1.0.2/main/public/CaringBonus-Payout-Success_Polygonscan.json";

pub const DEFAULT_RETURN_BONUS_LOG_URL: &str = "https://raw.githubusercontent.com/eastern-cyber/dproject-admin-1.0.2/main/public/ReturnBonus-Payout-Success_Polygonscan.json";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// A snapshot location: an `http(s)://` URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

impl From<&str> for Source {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::Path(PathBuf::from(trimmed))
        }
    }
}

impl From<String> for Source {
    fn from(raw: String) -> Self {
        Source::from(raw.as_str())
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One of the four snapshots a statement needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    Users,
    PayoutLog(PayoutLogKind),
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::Users => f.write_str("users"),
            SnapshotKind::PayoutLog(kind) => write!(f, "{kind} log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub users: Source,
    pub pr_bonus_log: Source,
    pub caring_bonus_log: Source,
    pub return_bonus_log: Source,
    /// Per-request timeout for remote sources.
    pub request_timeout_secs: u64,
    pub engine: EngineConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            users: Source::from(DEFAULT_USERS_URL),
            pr_bonus_log: Source::from(DEFAULT_PR_BONUS_LOG_URL),
            caring_bonus_log: Source::from(DEFAULT_CARING_BONUS_LOG_URL),
            return_bonus_log: Source::from(DEFAULT_RETURN_BONUS_LOG_URL),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            engine: EngineConfig::default(),
        }
    }
}

impl SourceConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SourceConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn source(&self, kind: SnapshotKind) -> &Source {
        match kind {
            SnapshotKind::Users => &self.users,
            SnapshotKind::PayoutLog(PayoutLogKind::PrBonus) => &self.pr_bonus_log,
            SnapshotKind::PayoutLog(PayoutLogKind::CaringBonus) => &self.caring_bonus_log,
            SnapshotKind::PayoutLog(PayoutLogKind::ReturnBonus) => &self.return_bonus_log,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(SourceError::InvalidConfig {
                reason: "request_timeout_secs must be at least 1".to_string(),
            });
        }
        self.engine.validate()?;
        Ok(())
    }
}
