//! PR Network Test Harness
//!
//! Builds a referral network and its payout logs in memory, writes them as
//! JSON snapshot files to a temporary directory, and hands back a
//! [`SourceConfig`] pointing at those files. Tests then go through the real
//! [`SnapshotLoader`] rather than constructing engine types directly.

#![allow(clippy::arithmetic_side_effects)]

use {
    pr_network_engine::{EngineConfig, PayoutLogKind},
    pr_network_sources::{SnapshotLoader, Snapshots, Source, SourceConfig},
    serde_json::{json, Value},
    std::{fs, path::PathBuf},
    tempfile::TempDir,
};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Root wallet used by most scenarios.
pub const ROOT: &str = "0xROOT";

/// Wallet that sends every payout in generated Polygonscan rows.
pub const PAYOUT_WALLET: &str = "0x3Bd2fd1D6E5e2E3F2fF0000000000000000000aa";

pub const USERS_FILE: &str = "users.json";
pub const PR_BONUS_FILE: &str = "pr_bonus.json";
pub const CARING_BONUS_FILE: &str = "caring_bonus.json";
pub const RETURN_BONUS_FILE: &str = "return_bonus.json";

// ─── Logging ─────────────────────────────────────────────────────────────────

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

// ─── Wallets ─────────────────────────────────────────────────────────────────

/// Deterministic wallet address for member `index`.
pub fn wallet(index: usize) -> String {
    format!("0x{index:040x}")
}

// ─── Network fixture ─────────────────────────────────────────────────────────

/// A referral network plus the three payout logs, as raw JSON rows.
#[derive(Debug, Clone, Default)]
pub struct NetworkFixture {
    users: Vec<Value>,
    pr_bonus: Vec<Value>,
    caring_bonus: Vec<Value>,
    return_bonus: Vec<Value>,
}

impl NetworkFixture {
    /// A network containing only `root`, which refers itself.
    pub fn with_root(root: &str) -> Self {
        Self::default().member(root, root)
    }

    /// Add a member referred by `referrer_id`.
    pub fn member(mut self, user_id: &str, referrer_id: &str) -> Self {
        let token_id = self.users.len().to_string();
        self.users.push(json!({
            "userId": user_id,
            "referrerId": referrer_id,
            "email": format!("{}@example.org", user_id.to_lowercase()),
            "name": format!("Member {user_id}"),
            "tokenId": token_id,
            "userCreated": "01/04/2025, 10:00:00",
            "planA": {"dateTime": "01/04/2025, 10:00:00", "POL": "120", "rateTHBPOL": "9.5"},
        }));
        self
    }

    /// Add `count` members directly under `referrer_id`, named `{prefix}{i}`.
    pub fn members(mut self, referrer_id: &str, prefix: &str, count: usize) -> Self {
        for i in 0..count {
            self = self.member(&format!("{prefix}{i}"), referrer_id);
        }
        self
    }

    /// Add a referral chain `links` long hanging off `root`:
    /// `root <- {prefix}1 <- {prefix}2 <- ...`.
    pub fn chain(mut self, root: &str, prefix: &str, links: usize) -> Self {
        let mut referrer = root.to_string();
        for i in 1..=links {
            let user_id = format!("{prefix}{i}");
            self = self.member(&user_id, &referrer);
            referrer = user_id;
        }
        self
    }

    /// Add an arbitrary user row, valid or not.
    pub fn raw_user(mut self, row: Value) -> Self {
        self.users.push(row);
        self
    }

    /// Add a Polygonscan export row to `log`. `amount` is written verbatim.
    pub fn polygonscan_payout(
        mut self,
        log: PayoutLogKind,
        to: &str,
        amount: Value,
        date_time_utc: &str,
    ) -> Self {
        let rows = self.log_mut(log);
        let row = json!({
            "Transaction Hash": format!("0x{:064x}", rows.len() + 1),
            "Blockno": "70000000",
            "UnixTimestamp": "0",
            "DateTime (UTC)": date_time_utc,
            "From": PAYOUT_WALLET,
            "To": to,
            "Value_IN(POL)": "0",
            "Value_OUT(POL)": amount,
            "Method": "Transfer",
        });
        rows.push(row);
        self
    }

    /// Add a send-report row to `log`; `sent_date` is local wall-clock time.
    pub fn send_report_payout(
        mut self,
        log: PayoutLogKind,
        wallet_address: &str,
        sent_amount: Value,
        sent_date: &str,
    ) -> Self {
        self.log_mut(log).push(json!({
            "walletAddress": wallet_address,
            "sentAmount": sent_amount,
            "sentDate": sent_date,
        }));
        self
    }

    /// Add an arbitrary payout row to `log`.
    pub fn raw_payout(mut self, log: PayoutLogKind, row: Value) -> Self {
        self.log_mut(log).push(row);
        self
    }

    fn log_mut(&mut self, log: PayoutLogKind) -> &mut Vec<Value> {
        match log {
            PayoutLogKind::PrBonus => &mut self.pr_bonus,
            PayoutLogKind::CaringBonus => &mut self.caring_bonus,
            PayoutLogKind::ReturnBonus => &mut self.return_bonus,
        }
    }

    /// Write every snapshot to a fresh temporary directory.
    pub fn write(&self) -> FixtureDir {
        let dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create fixture dir: {err}"),
        };
        let fixture = FixtureDir { dir };
        fixture.write_rows(USERS_FILE, &self.users);
        fixture.write_rows(PR_BONUS_FILE, &self.pr_bonus);
        fixture.write_rows(CARING_BONUS_FILE, &self.caring_bonus);
        fixture.write_rows(RETURN_BONUS_FILE, &self.return_bonus);
        fixture
    }
}

// ─── Fixture directory ───────────────────────────────────────────────────────

/// Snapshot files on disk. Removed when dropped.
#[derive(Debug)]
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }

    /// Overwrite `file` with `contents`.
    pub fn write_raw(&self, file: &str, contents: &str) {
        if let Err(err) = fs::write(self.path(file), contents) {
            panic!("failed to write {file}: {err}");
        }
    }

    /// Delete `file` so its source fails to load.
    pub fn remove(&self, file: &str) {
        if let Err(err) = fs::remove_file(self.path(file)) {
            panic!("failed to remove {file}: {err}");
        }
    }

    fn write_rows(&self, file: &str, rows: &[Value]) {
        self.write_raw(file, &Value::Array(rows.to_vec()).to_string());
    }

    /// Sources pointing at this directory with the default engine rules.
    pub fn source_config(&self) -> SourceConfig {
        self.source_config_with(EngineConfig::default())
    }

    pub fn source_config_with(&self, engine: EngineConfig) -> SourceConfig {
        SourceConfig {
            users: Source::Path(self.path(USERS_FILE)),
            pr_bonus_log: Source::Path(self.path(PR_BONUS_FILE)),
            caring_bonus_log: Source::Path(self.path(CARING_BONUS_FILE)),
            return_bonus_log: Source::Path(self.path(RETURN_BONUS_FILE)),
            engine,
            ..SourceConfig::default()
        }
    }

    /// Load every snapshot through [`SnapshotLoader`].
    pub async fn load(&self) -> Snapshots {
        load(self.source_config()).await
    }
}

pub async fn load(config: SourceConfig) -> Snapshots {
    match SnapshotLoader::new(config) {
        Ok(loader) => loader.load_all().await,
        Err(err) => panic!("fixture config rejected: {err}"),
    }
}

// ─── Assertions ──────────────────────────────────────────────────────────────

pub fn assert_pol(actual: f64, expected: f64, label: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{label}: expected {expected}, got {actual}"
    );
}
