//! Shared helpers for PR network benchmarks.

use {
    pr_network_engine::{PayoutTransaction, TransactionLog, UserRecord},
    rand::{rngs::StdRng, Rng, SeedableRng},
    serde_json::{json, Value},
};

/// Wallet address for synthetic member `index`.
pub fn wallet(index: usize) -> String {
    format!("0x{index:040x}")
}

/// A network of `n` members where member 0 is a self-referencing root and
/// every later member was referred by a random earlier one.
pub fn make_random_network(n: usize, seed: u64) -> Vec<UserRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let referrer = if i == 0 { 0 } else { rng.random_range(0..i) };
            UserRecord::new(wallet(i), wallet(referrer))
        })
        .collect()
}

/// A complete tree where each member refers exactly `fanout` others.
pub fn make_wide_network(n: usize, fanout: usize) -> Vec<UserRecord> {
    let fanout = fanout.max(1);
    (0..n)
        .map(|i| {
            let referrer = i.saturating_sub(1) / fanout;
            UserRecord::new(wallet(i), wallet(referrer))
        })
        .collect()
}

/// A single referral chain of length `n`: member `i` refers member `i + 1`.
pub fn make_chain(n: usize) -> Vec<UserRecord> {
    (0..n)
        .map(|i| UserRecord::new(wallet(i), wallet(i.saturating_sub(1))))
        .collect()
}

/// `per_member` payouts to every member of `users`, with recipients
/// upper-cased on odd rows so matching has to fold case.
pub fn make_payout_log(users: &[UserRecord], per_member: usize, seed: u64) -> TransactionLog {
    let mut rng = StdRng::seed_from_u64(seed);
    let transactions = users
        .iter()
        .enumerate()
        .flat_map(|(i, user)| {
            let to = if i % 2 == 1 {
                user.user_id.to_uppercase()
            } else {
                user.user_id.clone()
            };
            (0..per_member)
                .map(|_| (to.clone(), rng.random_range(1.0..50.0)))
                .collect::<Vec<_>>()
        })
        .map(|(to, amount)| PayoutTransaction::new(to, amount, None))
        .collect();
    TransactionLog::new(transactions)
}

/// `n` rows in the Polygonscan export shape, serialized as a JSON array.
pub fn polygonscan_json(n: usize, recipients: usize) -> String {
    let rows: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "Transaction Hash": format!("0x{i:064x}"),
                "DateTime (UTC)": format!("2025-04-{:02} {:02}:{:02}:00", i % 28 + 1, i % 24, i % 60),
                "From": wallet(usize::MAX >> 1),
                "To": wallet(i % recipients.max(1)),
                "Value_OUT(POL)": format!("{}.5", i % 2_000),
            })
        })
        .collect();
    Value::Array(rows).to_string()
}

/// `n` rows in the send-report shape, serialized as a JSON array.
pub fn send_report_json(n: usize, recipients: usize) -> String {
    let rows: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "walletAddress": wallet(i % recipients.max(1)),
                "sentAmount": format!("1,{:03}", i % 1_000),
                "sentDate": format!("{:02}/04/2025, {:02}:30:00", i % 28 + 1, i % 24),
            })
        })
        .collect();
    Value::Array(rows).to_string()
}

/// The user snapshot for `users`, serialized as a JSON array.
pub fn users_json(users: &[UserRecord]) -> String {
    serde_json::to_string(users).unwrap_or_else(|_| "[]".to_string())
}
