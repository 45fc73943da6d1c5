use {
    pr_network_engine::{
        format_pol, tree, BuildStats, MemberSummary, SchemeReport, SourceStatus, Statement,
        TreeNode,
    },
    serde::Serialize,
    std::fmt,
};

// ── Output Structs ──────────────────────────────────────────────────

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliTreeRow {
    pub generation: u32,
    pub user_id: String,
    pub direct_referrals: usize,
    pub total_referrals: usize,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliTree {
    pub root_id: String,
    pub total_members: usize,
    pub stats: BuildStats,
    pub rows: Vec<CliTreeRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

impl CliTree {
    /// Fully expanded view of `forest`.
    pub fn new(root_id: &str, forest: &[TreeNode<'_>], stats: BuildStats) -> Self {
        let rows = tree::flatten_visible(forest, |_| true)
            .into_iter()
            .map(|row| CliTreeRow {
                generation: row.generation,
                user_id: row.user_id.to_string(),
                direct_referrals: row.direct_referrals,
                total_referrals: row.total_referrals,
            })
            .collect();
        Self {
            root_id: root_id.to_string(),
            total_members: tree::count_total_users(forest),
            stats,
            rows,
            unavailable_sources: Vec::new(),
        }
    }
}

impl fmt::Display for CliTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Downline of {}", self.root_id)?;
        write_unavailable(f, &self.unavailable_sources)?;
        if self.rows.is_empty() {
            writeln!(f, "  (no referrals)")?;
            return Ok(());
        }
        for row in &self.rows {
            let indent = "  ".repeat(row.generation as usize);
            writeln!(
                f,
                "{indent}└─ [G{}] {}  direct {}, total {}",
                row.generation, row.user_id, row.direct_referrals, row.total_referrals
            )?;
        }
        writeln!(f)?;
        writeln!(f, "  Total Members:      {}", self.total_members)?;
        if self.stats.truncated_at_cap > 0 {
            writeln!(
                f,
                "  Beyond Depth Cap:   {} (not counted)",
                self.stats.truncated_at_cap
            )?;
        }
        if self.stats.cycles_skipped > 0 {
            writeln!(f, "  Cycles Skipped:     {}", self.stats.cycles_skipped)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliGenerationRow {
    pub generation: u32,
    pub members: usize,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliGenerations {
    pub root_id: String,
    pub generations: Vec<CliGenerationRow>,
    pub total_members: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

impl fmt::Display for CliGenerations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generations under {}", self.root_id)?;
        write_unavailable(f, &self.unavailable_sources)?;
        writeln!(f, "  {:<12} {:>10}", "Generation", "Members")?;
        writeln!(f, "  {}", "-".repeat(23))?;
        for row in &self.generations {
            writeln!(f, "  {:<12} {:>10}", row.generation, row.members)?;
        }
        writeln!(f, "  {}", "-".repeat(23))?;
        writeln!(f, "  {:<12} {:>10}", "Total", self.total_members)?;
        Ok(())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliStatement {
    #[serde(flatten)]
    pub statement: Statement,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

fn write_scheme(f: &mut fmt::Formatter<'_>, report: &SchemeReport) -> fmt::Result {
    writeln!(f, "{}", report.scheme)?;
    if report.log_status == SourceStatus::Unavailable {
        writeln!(f, "  (payout log unavailable; received shown as 0)")?;
    }
    for row in &report.generations {
        writeln!(
            f,
            "  G{:<3} {:>6} members  unilevel {:>12}  saved {:>12}  net {:>12}",
            row.generation,
            row.members,
            format_pol(row.unilevel),
            format_pol(row.saved),
            format_pol(row.net),
        )?;
    }
    for contribution in &report.contributions {
        writeln!(
            f,
            "  {:<44} {:>12} POL",
            contribution.user_id,
            format_pol(contribution.received)
        )?;
    }
    if let Some(basis) = report.downline_received {
        writeln!(f, "  Downline Received:  {} POL", format_pol(basis))?;
    }
    writeln!(f, "  Members Counted:    {}", report.members)?;
    writeln!(f, "  Expected:           {} POL", format_pol(report.expected_total))?;
    writeln!(f, "  Retained:           {} POL", format_pol(report.retained))?;
    writeln!(f, "  Payable:            {} POL", format_pol(report.payable))?;
    writeln!(f, "  Received:           {} POL", format_pol(report.received))?;
    writeln!(f, "  Outstanding:        {} POL", format_pol(report.outstanding))?;
    writeln!(
        f,
        "  Last Payout:        {} ({} payouts)",
        report.last_payout_display, report.matched_payouts
    )?;
    Ok(())
}

impl fmt::Display for CliStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let statement = &self.statement;
        writeln!(f, "Bonus Statement for {}", statement.root_id)?;
        write_unavailable(f, &self.unavailable_sources)?;
        writeln!(f, "  Total Members:      {}", statement.total_members)?;
        writeln!(f, "  Deepest Generation: {}", statement.tree.deepest_generation)?;
        writeln!(f)?;
        write_scheme(f, &statement.pr_bonus)?;
        writeln!(f)?;
        write_scheme(f, &statement.caring_bonus)?;
        writeln!(f)?;
        write_scheme(f, &statement.return_bonus)?;
        Ok(())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliMemberSummaries {
    pub root_id: String,
    pub members: Vec<MemberSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_sources: Vec<String>,
}

impl fmt::Display for CliMemberSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Member Summary for {}", self.root_id)?;
        write_unavailable(f, &self.unavailable_sources)?;
        writeln!(
            f,
            "  {:<44} {:>8} {:>8} {:>12} {:>12} {:>12}",
            "Wallet", "Token", "Members", "Unilevel", "Saved", "Net"
        )?;
        writeln!(f, "  {}", "-".repeat(101))?;
        for member in &self.members {
            writeln!(
                f,
                "  {:<44} {:>8} {:>8} {:>12} {:>12} {:>12}",
                member.user_id,
                member.token_id.as_deref().unwrap_or("-"),
                member.total_members,
                format_pol(member.total_unilevel),
                format_pol(member.total_saved),
                format_pol(member.total_net),
            )?;
        }
        Ok(())
    }
}

fn write_unavailable(f: &mut fmt::Formatter<'_>, sources: &[String]) -> fmt::Result {
    for source in sources {
        writeln!(f, "  warning: {source} snapshot unavailable, treated as empty")?;
    }
    Ok(())
}
