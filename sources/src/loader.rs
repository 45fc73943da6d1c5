//! Concurrent, failure-tolerant snapshot loading.
//!
//! The four snapshots are independent, so [`SnapshotLoader::load_all`] fetches
//! them concurrently and waits for all of them. A snapshot that cannot be
//! fetched or parsed is replaced by an empty one marked
//! [`SourceStatus::Unavailable`]; aggregation then treats it as "nothing
//! recorded" rather than failing the whole statement.

use {
    crate::{
        config::{SnapshotKind, Source, SourceConfig},
        error::{Result, SourceError},
    },
    log::*,
    pr_network_engine::{PayoutLogKind, PayoutLogs, SourceStatus, TransactionLog, UserSnapshot},
    std::time::Duration,
};

/// Everything one statement is computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshots {
    pub users: UserSnapshot,
    pub logs: PayoutLogs,
}

impl Snapshots {
    /// Sources that degraded to empty.
    pub fn unavailable(&self) -> Vec<SnapshotKind> {
        let mut missing = Vec::new();
        if self.users.status() == SourceStatus::Unavailable {
            missing.push(SnapshotKind::Users);
        }
        for kind in [
            PayoutLogKind::PrBonus,
            PayoutLogKind::CaringBonus,
            PayoutLogKind::ReturnBonus,
        ] {
            if self.logs.get(kind).status() == SourceStatus::Unavailable {
                missing.push(SnapshotKind::PayoutLog(kind));
            }
        }
        missing
    }
}

#[derive(Debug)]
pub struct SnapshotLoader {
    client: reqwest::Client,
    config: SourceConfig,
}

impl SnapshotLoader {
    pub fn new(config: SourceConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Raw body of `source`.
    pub async fn fetch_text(&self, source: &Source) -> Result<String> {
        match source {
            Source::Url(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.text().await?)
            }
            Source::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    /// Fetch and parse the user snapshot.
    pub async fn try_load_users(&self) -> Result<UserSnapshot> {
        let text = self.fetch_text(&self.config.users).await?;
        Ok(UserSnapshot::parse(&text)?)
    }

    /// Fetch and parse one payout log. Send-report dates are read at the
    /// engine's display offset.
    pub async fn try_load_log(&self, kind: PayoutLogKind) -> Result<TransactionLog> {
        let source = self.config.source(SnapshotKind::PayoutLog(kind));
        let text = self.fetch_text(source).await?;
        Ok(TransactionLog::parse_with_offset(
            &text,
            self.config.engine.display_offset(),
        )?)
    }

    pub async fn load_users(&self) -> UserSnapshot {
        match self.try_load_users().await {
            Ok(users) => {
                debug!("loaded {} users from {}", users.len(), self.config.users);
                users
            }
            Err(err) => {
                self.report_unavailable(SnapshotKind::Users, &err);
                UserSnapshot::unavailable()
            }
        }
    }

    pub async fn load_log(&self, kind: PayoutLogKind) -> TransactionLog {
        match self.try_load_log(kind).await {
            Ok(log) => {
                debug!("loaded {} {kind} payouts", log.len());
                log
            }
            Err(err) => {
                self.report_unavailable(SnapshotKind::PayoutLog(kind), &err);
                TransactionLog::unavailable()
            }
        }
    }

    /// Fetch all four snapshots concurrently.
    pub async fn load_all(&self) -> Snapshots {
        let (users, pr_bonus, caring_bonus, return_bonus) = tokio::join!(
            self.load_users(),
            self.load_log(PayoutLogKind::PrBonus),
            self.load_log(PayoutLogKind::CaringBonus),
            self.load_log(PayoutLogKind::ReturnBonus),
        );
        let snapshots = Snapshots {
            users,
            logs: PayoutLogs {
                pr_bonus,
                caring_bonus,
                return_bonus,
            },
        };
        info!(
            "snapshots loaded: {} users, {} PR / {} Caring / {} Return payouts",
            snapshots.users.len(),
            snapshots.logs.pr_bonus.len(),
            snapshots.logs.caring_bonus.len(),
            snapshots.logs.return_bonus.len(),
        );
        snapshots
    }

    fn report_unavailable(&self, kind: SnapshotKind, err: &SourceError) {
        warn!(
            "{kind} snapshot unavailable from {}: {err}; continuing with an empty set",
            self.config.source(kind)
        );
    }
}
