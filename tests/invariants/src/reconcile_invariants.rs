//! Property-based tests for bonus reconciliation invariants.
//!
//! Properties tested:
//! 1. For every scheme, `outstanding == payable - received`; head-count
//!    schemes split `expected` into `payable + retained`, and the
//!    receipts-based scheme pays the basis plus the reconstructed retention.
//! 2. Reconstructed retention restores the pre-retention gross exactly.
//! 3. PR Bonus expected is the direct-referral count times the rate.
//! 4. Caring Bonus members equal the tree's total member count.

#[cfg(test)]
mod tests {
    use {
        pr_network_engine::{
            config::{CARING_BONUS_RATE_POL, PR_BONUS_RATE_POL},
            count_total_users, reconcile::reconstruct_retained, EngineConfig, PayoutLogs,
            PayoutTransaction, ReconciliationEngine, SchemeKind, TransactionLog, TreeBuilder,
            UserRecord,
        },
        proptest::{prelude::*, sample::Index},
    };

    const EPSILON: f64 = 1e-6;

    fn wallet(index: usize) -> String {
        format!("0x{index:040x}")
    }

    fn acyclic_network() -> impl Strategy<Value = Vec<UserRecord>> {
        prop::collection::vec(any::<Index>(), 0..100).prop_map(|picks| {
            std::iter::once(UserRecord::new(wallet(0), wallet(0)))
                .chain(
                    picks
                        .iter()
                        .enumerate()
                        .map(|(i, pick)| UserRecord::new(wallet(i + 1), wallet(pick.index(i + 1)))),
                )
                .collect()
        })
    }

    /// Payouts to random members of a network of at most `members` wallets.
    fn payout_log(members: usize) -> impl Strategy<Value = TransactionLog> {
        prop::collection::vec((any::<Index>(), 0.0f64..500.0, any::<bool>()), 0..60).prop_map(
            move |rows| {
                TransactionLog::new(
                    rows.into_iter()
                        .map(|(to, amount, upper)| {
                            let to = wallet(to.index(members));
                            let to = if upper { to.to_uppercase() } else { to };
                            PayoutTransaction::new(to, amount, None)
                        })
                        .collect(),
                )
            },
        )
    }

    fn payout_logs() -> impl Strategy<Value = PayoutLogs> {
        (payout_log(100), payout_log(100), payout_log(100)).prop_map(
            |(pr_bonus, caring_bonus, return_bonus)| PayoutLogs {
                pr_bonus,
                caring_bonus,
                return_bonus,
            },
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Report arithmetic holds for every scheme
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn report_arithmetic_is_consistent(
            users in acyclic_network(),
            logs in payout_logs(),
            retention in 0.0f64..99.0,
        ) {
            let mut config = EngineConfig::default();
            config.caring_bonus.retention_percent = retention;
            config.return_bonus.retention_percent = retention;
            let engine = ReconciliationEngine::new(config).unwrap();
            let statement = engine.reconcile_all(&wallet(0), &users, &logs);

            for kind in SchemeKind::ALL {
                let report = statement.scheme(*kind);
                prop_assert!(report.received.is_finite() && report.received >= 0.0);
                prop_assert!(report.retained >= 0.0);
                match report.downline_received {
                    Some(basis) => {
                        prop_assert!(close(report.expected_total, basis + report.retained));
                        prop_assert!(close(report.payable, report.expected_total));
                    }
                    None => {
                        prop_assert!(close(report.payable + report.retained, report.expected_total));
                    }
                }
                prop_assert!(close(report.outstanding, report.payable - report.received));
                let log = logs.get(engine.config().scheme(*kind).receipts_log);
                prop_assert_eq!(report.received, log.receipts_for(&wallet(0)).total);
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Retention reconstruction
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn reconstructed_gross_keeps_basis(basis in 0.0f64..1e9, retention in 0.0f64..99.9) {
            let retained = reconstruct_retained(basis, retention);
            let gross = basis + retained;
            prop_assert!(retained >= 0.0);
            prop_assert!(close(gross * (100.0 - retention) / 100.0, basis));
            prop_assert!(close(gross * retention / 100.0, retained));
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3-4. Populations
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn populations_match_the_tree(users in acyclic_network(), root in any::<Index>()) {
            let root = wallet(root.index(users.len()));
            let engine = ReconciliationEngine::new(EngineConfig::default()).unwrap();
            let logs = PayoutLogs::default();
            let builder = TreeBuilder::new(&users);

            let pr = engine.reconcile(SchemeKind::PrBonus, &root, &users, &logs);
            let directs = builder.direct_referrals(&root).len();
            prop_assert_eq!(pr.members, directs);
            prop_assert!(close(pr.expected_total, directs as f64 * PR_BONUS_RATE_POL));

            let caring = engine.reconcile(SchemeKind::CaringBonus, &root, &users, &logs);
            prop_assert_eq!(caring.members, count_total_users(&builder.build(&root)));
            prop_assert!(close(caring.expected_total, caring.members as f64 * CARING_BONUS_RATE_POL));
        }
    }
}
