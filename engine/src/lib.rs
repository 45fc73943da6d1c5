//! # PR Network Engine
//!
//! Referral-tree aggregation and bonus reconciliation for a membership
//! network in which every member records the wallet that referred them.
//!
//! From a flat user snapshot the engine builds a **depth-capped downline
//! forest** under any wallet, counts members per generation, and reconciles
//! what the wallet is owed under each bonus scheme against what the payout
//! logs say it has already received.
//!
//! ## Quick start
//!
//! ```rust
//! use pr_network_engine::{
//!     EngineConfig, PayoutLogs, ReconciliationEngine, SchemeKind, TransactionLog, UserSnapshot,
//! };
//!
//! let users = UserSnapshot::parse(
//!     r#"[
//!         {"userId": "0xROOT", "referrerId": "0xROOT"},
//!         {"userId": "0xA", "referrerId": "0xROOT"},
//!         {"userId": "0xB", "referrerId": "0xROOT"}
//!     ]"#,
//! )?;
//!
//! // One PR Bonus payout of 12 POL, addressed in lower case.
//! let logs = PayoutLogs {
//!     pr_bonus: TransactionLog::parse(
//!         r#"[{"To": "0xroot", "Value_OUT(POL)": "12", "DateTime (UTC)": "2025-04-12 08:31:55"}]"#,
//!     )?,
//!     ..Default::default()
//! };
//!
//! let engine = ReconciliationEngine::new(EngineConfig::default())?;
//! let report = engine.reconcile(SchemeKind::PrBonus, "0xROOT", users.users(), &logs);
//!
//! assert_eq!(report.expected_total, 24.0); // 2 direct referrals x 12 POL
//! assert_eq!(report.outstanding, 12.0);
//! assert_eq!(report.last_payout_display, "12/04/2025 15:31:55"); // UTC+7
//! # Ok::<(), pr_network_engine::EngineError>(())
//! ```
//!
//! See [`tree`] for how downlines are built and [`reconcile`] for the
//! per-scheme arithmetic.

pub mod config;
pub mod datetime;
pub mod error;
pub mod reconcile;
pub mod report;
pub mod snapshot;
pub mod transaction;
pub mod tree;
pub mod user;


// Re-exports for convenience.
pub use {
    config::{BonusSchemeConfig, EngineConfig, PayoutLogKind, PopulationScope, SchemeKind},
    datetime::LastPayout,
    error::EngineError,
    reconcile::{PayoutLogs, ReconciliationEngine, SchemeReport, Statement},
    report::{format_pol, member_summaries, MemberSummary},
    snapshot::SourceStatus,
    transaction::{PayoutTransaction, TransactionLog},
    tree::{build_tree, count_total_users, summarize_by_generation, BuildStats, TreeBuilder, TreeNode},
    user::{UserRecord, UserSnapshot},
};
