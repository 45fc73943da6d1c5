#![allow(clippy::arithmetic_side_effects)]

use {
    crate::{
        config::BonusSchemeConfig,
        tree::{self, TreeNode},
    },
    serde::Serialize,
    std::collections::HashSet,
};

/// Per-member unilevel export row.
///
/// Figures are computed from the member's own `total_referrals` and rounded
/// to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    pub total_members: usize,
    pub total_unilevel: f64,
    pub total_saved: f64,
    pub total_net: f64,
}

/// One summary per distinct member of `forest`, in pre-order.
pub fn member_summaries(forest: &[TreeNode<'_>], scheme: &BonusSchemeConfig) -> Vec<MemberSummary> {
    let fraction = scheme.retention_fraction();
    let mut seen = HashSet::new();
    tree::pre_order(forest)
        .filter(|node| seen.insert(node.user_id()))
        .map(|node| {
            let unilevel = node.total_referrals as f64 * scheme.per_member_rate;
            let saved = unilevel * fraction;
            MemberSummary {
                user_id: node.user.user_id.clone(),
                token_id: node.user.token_id.clone(),
                total_members: node.total_referrals,
                total_unilevel: round2(unilevel),
                total_saved: round2(saved),
                total_net: round2(unilevel - saved),
            }
        })
        .collect()
}

/// Round half away from zero to two decimals.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `1234.5` -> `"1,234.50"`.
pub fn format_pol(amount: f64) -> String {
    if !amount.is_finite() {
        return "0.00".to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" reads as a debt that does not exist.
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
