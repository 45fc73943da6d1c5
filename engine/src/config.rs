use {
    crate::{datetime, error::EngineError},
    chrono::FixedOffset,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Generations of downline that pay out. Deeper levels are silently excluded.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Hard ceiling accepted for `max_depth`. Tree building recurses once per
/// generation, so this also bounds stack usage.
pub const MAX_SUPPORTED_DEPTH: u32 = 64;

/// Payout dates are displayed at UTC+7 (Bangkok).
pub const DEFAULT_DISPLAY_OFFSET_HOURS: i32 = 7;

/// PR Bonus: flat POL per direct referral.
pub const PR_BONUS_RATE_POL: f64 = 12.0;

/// Caring Bonus: POL per downline member, per generation.
pub const CARING_BONUS_RATE_POL: f64 = 0.8;

/// Percentage withheld from Caring Bonus and reconstructed by Return Bonus.
pub const DEFAULT_RETENTION_PERCENT: f64 = 25.0;

/// The three bonus schemes reconciled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeKind {
    /// Flat rate per direct referral.
    PrBonus,
    /// Unilevel rate across the depth-capped downline.
    CaringBonus,
    /// Direct referrals' own Caring Bonus receipts, scaled back to gross.
    ReturnBonus,
}

impl SchemeKind {
    /// All schemes in statement order.
    pub const ALL: &'static [SchemeKind] = &[
        SchemeKind::PrBonus,
        SchemeKind::CaringBonus,
        SchemeKind::ReturnBonus,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SchemeKind::PrBonus => "PR Bonus",
            SchemeKind::CaringBonus => "Caring Bonus",
            SchemeKind::ReturnBonus => "Return Bonus",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Identifies one of the independently sourced payout logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayoutLogKind {
    PrBonus,
    CaringBonus,
    ReturnBonus,
}

impl fmt::Display for PayoutLogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayoutLogKind::PrBonus => "pr-bonus",
            PayoutLogKind::CaringBonus => "caring-bonus",
            PayoutLogKind::ReturnBonus => "return-bonus",
        };
        f.write_str(name)
    }
}

/// Which population a scheme counts toward its expected amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PopulationScope {
    /// Users whose `referrerId` is the query root.
    DirectReferrals,
    /// Every node of the depth-capped forest rooted at the query id, counted
    /// per generation.
    Downline,
    /// Sum of what each direct referral has itself received in `log`.
    DownlineReceipts { log: PayoutLogKind },
}

/// Formula constants and population rule for one bonus scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusSchemeConfig {
    pub kind: SchemeKind,

    /// POL attributed per counted member. Ignored by `DownlineReceipts`,
    /// whose basis is an amount rather than a head count.
    pub per_member_rate: f64,

    /// Percentage (0 to <100) withheld rather than paid out.
    ///
    /// For head-count scopes the withheld part is `expected * pct / 100`.
    /// For `DownlineReceipts` the basis already excludes retention, so the
    /// withheld part is reconstructed as `basis / (100 - pct) * pct`.
    pub retention_percent: f64,

    pub scope: PopulationScope,

    /// Log in which payouts to the query root itself are looked up.
    pub receipts_log: PayoutLogKind,
}

impl BonusSchemeConfig {
    pub fn pr_bonus() -> Self {
        Self {
            kind: SchemeKind::PrBonus,
            per_member_rate: PR_BONUS_RATE_POL,
            retention_percent: 0.0,
            scope: PopulationScope::DirectReferrals,
            receipts_log: PayoutLogKind::PrBonus,
        }
    }

    pub fn caring_bonus() -> Self {
        Self {
            kind: SchemeKind::CaringBonus,
            per_member_rate: CARING_BONUS_RATE_POL,
            retention_percent: DEFAULT_RETENTION_PERCENT,
            scope: PopulationScope::Downline,
            receipts_log: PayoutLogKind::CaringBonus,
        }
    }

    pub fn return_bonus() -> Self {
        Self {
            kind: SchemeKind::ReturnBonus,
            per_member_rate: 0.0,
            retention_percent: DEFAULT_RETENTION_PERCENT,
            scope: PopulationScope::DownlineReceipts {
                log: PayoutLogKind::CaringBonus,
            },
            receipts_log: PayoutLogKind::ReturnBonus,
        }
    }

    /// Default configuration for `kind`.
    pub fn for_kind(kind: SchemeKind) -> Self {
        match kind {
            SchemeKind::PrBonus => Self::pr_bonus(),
            SchemeKind::CaringBonus => Self::caring_bonus(),
            SchemeKind::ReturnBonus => Self::return_bonus(),
        }
    }

    /// `retention_percent` as a fraction (25 % -> 0.25).
    #[inline]
    pub fn retention_fraction(&self) -> f64 {
        self.retention_percent / 100.0
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.per_member_rate.is_finite() || self.per_member_rate < 0.0 {
            return Err(EngineError::invalid_config(format!(
                "{}: per_member_rate must be a finite non-negative amount, got {}",
                self.kind, self.per_member_rate
            )));
        }
        if !self.retention_percent.is_finite()
            || !(0.0..100.0).contains(&self.retention_percent)
        {
            return Err(EngineError::invalid_config(format!(
                "{}: retention_percent must be in [0, 100), got {}",
                self.kind, self.retention_percent
            )));
        }
        Ok(())
    }
}

/// Top-level engine configuration.
///
/// Every field has a default equal to the production business rules, so a
/// TOML `[engine]` table only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest generation included in trees and counts.
    pub max_depth: u32,

    /// Hours east of UTC used to display payout dates and to interpret
    /// send-report timestamps.
    pub display_offset_hours: i32,

    /// Refuse to re-enter a wallet that is already an ancestor on the current
    /// path. The depth cap alone also terminates cyclic graphs, but repeats
    /// members until the cap is hit.
    pub cycle_guard: bool,

    pub pr_bonus: BonusSchemeConfig,
    pub caring_bonus: BonusSchemeConfig,
    pub return_bonus: BonusSchemeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            display_offset_hours: DEFAULT_DISPLAY_OFFSET_HOURS,
            cycle_guard: true,
            pr_bonus: BonusSchemeConfig::pr_bonus(),
            caring_bonus: BonusSchemeConfig::caring_bonus(),
            return_bonus: BonusSchemeConfig::return_bonus(),
        }
    }
}

impl EngineConfig {
    pub fn scheme(&self, kind: SchemeKind) -> &BonusSchemeConfig {
        match kind {
            SchemeKind::PrBonus => &self.pr_bonus,
            SchemeKind::CaringBonus => &self.caring_bonus,
            SchemeKind::ReturnBonus => &self.return_bonus,
        }
    }

    /// Offset used for display. Falls back to UTC if out of range; call
    /// [`EngineConfig::validate`] first to reject such configs instead.
    pub fn display_offset(&self) -> FixedOffset {
        datetime::display_offset(self.display_offset_hours).unwrap_or_else(datetime::utc_offset)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_depth == 0 || self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(EngineError::invalid_config(format!(
                "max_depth must be in 1..={MAX_SUPPORTED_DEPTH}, got {}",
                self.max_depth
            )));
        }
        if datetime::display_offset(self.display_offset_hours).is_none() {
            return Err(EngineError::invalid_config(format!(
                "display_offset_hours must be in -23..=23, got {}",
                self.display_offset_hours
            )));
        }
        for kind in SchemeKind::ALL {
            let scheme = self.scheme(*kind);
            if scheme.kind != *kind {
                return Err(EngineError::invalid_config(format!(
                    "{kind} slot holds a {} scheme",
                    scheme.kind
                )));
            }
            scheme.validate()?;
        }
        Ok(())
    }
}
