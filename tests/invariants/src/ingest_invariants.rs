//! Property-based tests for payout-log ingestion.
//!
//! Properties tested:
//! 1. Any amount value parses to a finite, non-negative number.
//! 2. Well-formed numeric strings parse to their value, with or without
//!    thousands separators.
//! 3. Wallet matching ignores letter case on either side.
//! 4. Malformed rows are counted, never fatal.

#[cfg(test)]
mod tests {
    use {
        pr_network_engine::{transaction::parse_amount, PayoutTransaction, TransactionLog},
        proptest::prelude::*,
        serde_json::{json, Value},
    };

    fn amount_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<f64>().prop_map(|n| json!(n)),
            any::<i64>().prop_map(|n| json!(n)),
            ".*".prop_map(Value::String),
            "[0-9,]{0,12}(\\.[0-9]{0,4})?".prop_map(Value::String),
            Just(Value::Null),
            Just(json!(["12"])),
            Just(json!({"value": 12})),
        ]
    }

    fn with_thousands(whole: u64) -> String {
        let digits = whole.to_string();
        let mut grouped = String::new();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        grouped
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1-2. Amounts
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn amount_is_finite_and_non_negative(value in amount_value()) {
            let amount = parse_amount(Some(&value));
            prop_assert!(amount.is_finite());
            prop_assert!(amount >= 0.0);
        }

        #[test]
        fn grouped_amount_parses(whole in 0u64..10_000_000_000, cents in 0u64..100) {
            let raw = format!("{}.{cents:02}", with_thousands(whole));
            let plain = format!("{whole}.{cents:02}");
            let expected: f64 = plain.parse().unwrap();
            prop_assert_eq!(parse_amount(Some(&json!(raw))), expected);
            prop_assert_eq!(parse_amount(Some(&json!(plain))), expected);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Case-insensitive wallet matching
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn matching_ignores_case(
            hex in "[0-9a-f]{40}",
            mask in prop::collection::vec(any::<bool>(), 40),
            amount in 0.0f64..1e6,
        ) {
            let canonical = format!("0x{hex}");
            let mixed: String = std::iter::once('0')
                .chain(std::iter::once('x'))
                .chain(hex.chars().zip(&mask).map(|(ch, upper)| {
                    if *upper { ch.to_ascii_uppercase() } else { ch }
                }))
                .collect();
            let log = TransactionLog::new(vec![PayoutTransaction::new(mixed.clone(), amount, None)]);

            for query in [canonical.clone(), canonical.to_uppercase(), mixed] {
                let receipts = log.receipts_for(&query);
                prop_assert_eq!(receipts.matched, 1);
                prop_assert_eq!(receipts.total, amount);
            }
            prop_assert_eq!(log.totals_by_recipient().get(&canonical).copied(), Some(amount));
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Malformed rows
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn malformed_rows_are_counted(good in 0usize..20, bad in 0usize..20) {
            let mut rows = Vec::new();
            for i in 0..good {
                rows.push(json!({"To": format!("0x{i:040x}"), "Value_OUT(POL)": "1"}));
            }
            for i in 0..bad {
                rows.push(json!({"memo": i}));
            }
            let log = TransactionLog::parse(&Value::Array(rows).to_string()).unwrap();
            prop_assert_eq!(log.len(), good);
            prop_assert_eq!(log.malformed(), bad);
        }
    }
}
