//! Expected-versus-received reconciliation for the three bonus schemes.
//!
//! Each scheme is described by a [`BonusSchemeConfig`]; its
//! [`PopulationScope`] decides how the expected amount is derived:
//!
//! | scope               | basis                                   | retained                    | payable              |
//! |---------------------|-----------------------------------------|-----------------------------|----------------------|
//! | `DirectReferrals`   | `directs * rate`                        | `basis * pct / 100`         | `basis - retained`   |
//! | `Downline`          | `sum(count_g * rate)` per generation     | `sum(unilevel_g * pct/100)` | `basis - retained`   |
//! | `DownlineReceipts`  | what each direct referral received      | `basis / (100 - pct) * pct` | `basis + retained`   |
//!
//! In every case `outstanding = payable - received`, where `received` sums
//! the scheme's receipts log over rows addressed to the root wallet.

#![allow(clippy::arithmetic_side_effects)]

use {
    crate::{
        config::{BonusSchemeConfig, EngineConfig, PayoutLogKind, PopulationScope, SchemeKind},
        datetime::LastPayout,
        error::EngineError,
        snapshot::SourceStatus,
        transaction::TransactionLog,
        tree::{self, BuildStats, TreeBuilder, TreeNode},
        user::UserRecord,
    },
    log::*,
    serde::Serialize,
    std::collections::BTreeMap,
};

/// The three payout logs a statement is reconciled against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayoutLogs {
    pub pr_bonus: TransactionLog,
    pub caring_bonus: TransactionLog,
    pub return_bonus: TransactionLog,
}

impl PayoutLogs {
    pub fn get(&self, kind: PayoutLogKind) -> &TransactionLog {
        match kind {
            PayoutLogKind::PrBonus => &self.pr_bonus,
            PayoutLogKind::CaringBonus => &self.caring_bonus,
            PayoutLogKind::ReturnBonus => &self.return_bonus,
        }
    }
}

/// Unilevel arithmetic for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationBreakdown {
    pub generation: u32,
    pub members: usize,
    pub unilevel: f64,
    pub saved: f64,
    pub net: f64,
}

/// What one direct referral has itself received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberContribution {
    pub user_id: String,
    pub received: f64,
}

/// Reconciliation of one scheme for one root wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeReport {
    pub scheme: SchemeKind,
    pub root_id: String,
    /// Size of the counted population.
    pub members: usize,
    /// Per-generation arithmetic; only for `Downline` scope.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generations: Vec<GenerationBreakdown>,
    /// Per-referral receipts; only for `DownlineReceipts` scope.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contributions: Vec<MemberContribution>,
    /// Sum of `contributions`; only for `DownlineReceipts` scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downline_received: Option<f64>,
    /// Gross entitlement before retention is applied.
    pub expected_total: f64,
    pub retained: f64,
    pub payable: f64,
    pub received: f64,
    /// `payable - received`; negative when overpaid.
    pub outstanding: f64,
    pub matched_payouts: usize,
    pub last_payout: LastPayout,
    /// `last_payout` at the configured display offset, or `"N/A"`.
    pub last_payout_display: String,
    pub log_status: SourceStatus,
}

/// All three schemes for one root, built over a single tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub root_id: String,
    pub tree: BuildStats,
    pub generations: BTreeMap<u32, usize>,
    pub total_members: usize,
    pub pr_bonus: SchemeReport,
    pub caring_bonus: SchemeReport,
    pub return_bonus: SchemeReport,
}

impl Statement {
    pub fn scheme(&self, kind: SchemeKind) -> &SchemeReport {
        match kind {
            SchemeKind::PrBonus => &self.pr_bonus,
            SchemeKind::CaringBonus => &self.caring_bonus,
            SchemeKind::ReturnBonus => &self.return_bonus,
        }
    }
}

/// Population-dependent half of a report, before receipts are matched.
struct Entitlement {
    members: usize,
    generations: Vec<GenerationBreakdown>,
    contributions: Vec<MemberContribution>,
    downline_received: Option<f64>,
    expected_total: f64,
    retained: f64,
    payable: f64,
}

/// Unilevel breakdown of a generation summary under `scheme`'s rate.
pub fn generation_breakdown(
    summary: &BTreeMap<u32, usize>,
    scheme: &BonusSchemeConfig,
) -> Vec<GenerationBreakdown> {
    let fraction = scheme.retention_fraction();
    summary
        .iter()
        .map(|(generation, members)| {
            let unilevel = *members as f64 * scheme.per_member_rate;
            let saved = unilevel * fraction;
            GenerationBreakdown {
                generation: *generation,
                members: *members,
                unilevel,
                saved,
                net: unilevel - saved,
            }
        })
        .collect()
}

/// Pre-retention gross reconstructed from an after-retention basis.
///
/// With 25 % retention, a basis of 75 was what remained of 100, so the
/// withheld part is `75 / 75 * 25 = 25`.
pub fn reconstruct_retained(basis: f64, retention_percent: f64) -> f64 {
    let kept_percent = 100.0 - retention_percent;
    if kept_percent <= 0.0 {
        return 0.0;
    }
    basis / kept_percent * retention_percent
}

/// Runs reconciliations under one validated [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    config: EngineConfig,
}

impl ReconciliationEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tree_builder<'a>(&self, users: &'a [UserRecord]) -> TreeBuilder<'a> {
        TreeBuilder::from_config(users, &self.config)
    }

    /// Reconcile a single scheme for `root_id`.
    pub fn reconcile(
        &self,
        kind: SchemeKind,
        root_id: &str,
        users: &[UserRecord],
        logs: &PayoutLogs,
    ) -> SchemeReport {
        let builder = self.tree_builder(users);
        let scheme = self.config.scheme(kind);
        let forest = match scheme.scope {
            PopulationScope::Downline => builder.build(root_id),
            PopulationScope::DirectReferrals | PopulationScope::DownlineReceipts { .. } => {
                Vec::new()
            }
        };
        self.reconcile_scheme(scheme, root_id, &builder, &forest, logs)
    }

    /// Reconcile every scheme for `root_id` over one tree build.
    pub fn reconcile_all(&self, root_id: &str, users: &[UserRecord], logs: &PayoutLogs) -> Statement {
        let builder = self.tree_builder(users);
        let (forest, stats) = builder.build_with_stats(root_id);
        let generations = tree::summarize_by_generation(&forest);
        let total_members = generations.values().sum();

        let report =
            |kind| self.reconcile_scheme(self.config.scheme(kind), root_id, &builder, &forest, logs);
        let statement = Statement {
            root_id: root_id.to_string(),
            tree: stats,
            generations,
            total_members,
            pr_bonus: report(SchemeKind::PrBonus),
            caring_bonus: report(SchemeKind::CaringBonus),
            return_bonus: report(SchemeKind::ReturnBonus),
        };
        info!(
            "statement for {root_id}: {} members, outstanding PR {:.2} / Caring {:.2} / Return {:.2}",
            statement.total_members,
            statement.pr_bonus.outstanding,
            statement.caring_bonus.outstanding,
            statement.return_bonus.outstanding,
        );
        statement
    }

    fn reconcile_scheme(
        &self,
        scheme: &BonusSchemeConfig,
        root_id: &str,
        builder: &TreeBuilder<'_>,
        forest: &[TreeNode<'_>],
        logs: &PayoutLogs,
    ) -> SchemeReport {
        let entitlement = match scheme.scope {
            PopulationScope::DirectReferrals => {
                let members = builder.direct_referrals(root_id).len();
                let expected_total = members as f64 * scheme.per_member_rate;
                let retained = expected_total * scheme.retention_fraction();
                Entitlement {
                    members,
                    generations: Vec::new(),
                    contributions: Vec::new(),
                    downline_received: None,
                    expected_total,
                    retained,
                    payable: expected_total - retained,
                }
            }
            PopulationScope::Downline => {
                let generations =
                    generation_breakdown(&tree::summarize_by_generation(forest), scheme);
                let members = generations.iter().map(|g| g.members).sum();
                let expected_total = generations.iter().map(|g| g.unilevel).sum();
                let retained = generations.iter().map(|g| g.saved).sum();
                let payable = generations.iter().map(|g| g.net).sum();
                Entitlement {
                    members,
                    generations,
                    contributions: Vec::new(),
                    downline_received: None,
                    expected_total,
                    retained,
                    payable,
                }
            }
            PopulationScope::DownlineReceipts { log } => {
                let totals = logs.get(log).totals_by_recipient();
                let contributions: Vec<MemberContribution> = builder
                    .direct_referrals(root_id)
                    .into_iter()
                    .map(|user| MemberContribution {
                        user_id: user.user_id.clone(),
                        received: totals
                            .get(&user.user_id.to_lowercase())
                            .copied()
                            .unwrap_or(0.0),
                    })
                    .collect();
                let basis: f64 = contributions.iter().map(|c| c.received).sum();
                let retained = reconstruct_retained(basis, scheme.retention_percent);
                Entitlement {
                    members: contributions.len(),
                    generations: Vec::new(),
                    contributions,
                    downline_received: Some(basis),
                    expected_total: basis + retained,
                    retained,
                    payable: basis + retained,
                }
            }
        };

        let receipts_log = logs.get(scheme.receipts_log);
        let receipts = receipts_log.receipts_for(root_id);
        if receipts_log.status() == SourceStatus::Unavailable {
            debug!(
                "{}: {} log unavailable, treating {root_id} as unpaid",
                scheme.kind, scheme.receipts_log
            );
        }

        SchemeReport {
            scheme: scheme.kind,
            root_id: root_id.to_string(),
            members: entitlement.members,
            generations: entitlement.generations,
            contributions: entitlement.contributions,
            downline_received: entitlement.downline_received,
            expected_total: entitlement.expected_total,
            retained: entitlement.retained,
            payable: entitlement.payable,
            received: receipts.total,
            outstanding: entitlement.payable - receipts.total,
            matched_payouts: receipts.matched,
            last_payout: receipts.last_payout,
            last_payout_display: receipts.last_payout.display(self.config.display_offset()),
            log_status: receipts_log.status(),
        }
    }
}
