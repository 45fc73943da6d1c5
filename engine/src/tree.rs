//! Depth-capped downline trees built from the flat referrer list.
//!
//! A user is a child of whichever wallet its `referrerId` names. Starting from
//! a query root, the builder walks children generation by generation until
//! `max_depth` is reached. The root itself is never a node: the result is the
//! forest of its direct referrals.
//!
//! ```text
//!   root
//!    ├── A (gen 1, totalReferrals 2)
//!    │    ├── C (gen 2)
//!    │    └── D (gen 2)
//!    └── B (gen 1, totalReferrals 0)
//! ```
//!
//! Children keep the order in which they appear in the user snapshot, so the
//! output is deterministic for a given snapshot.

use {
    crate::{
        config::{EngineConfig, DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH},
        user::UserRecord,
    },
    log::*,
    serde::Serialize,
    std::collections::{BTreeMap, HashMap},
};

/// One member of a downline, with its own capped subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode<'a> {
    pub user: &'a UserRecord,
    /// Distance from the query root; direct referrals are generation 1.
    pub generation: u32,
    pub children: Vec<TreeNode<'a>>,
    /// Strict descendants within the depth cap.
    pub total_referrals: usize,
}

impl<'a> TreeNode<'a> {
    pub fn user_id(&self) -> &'a str {
        &self.user.user_id
    }

    pub fn direct_referrals(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Counters collected while building one forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    pub nodes: usize,
    pub deepest_generation: u32,
    /// Users one generation past the cap that were cut off with their
    /// subtrees.
    pub truncated_at_cap: usize,
    /// Edges not followed because the child was already an ancestor.
    pub cycles_skipped: usize,
}

/// Builds downline forests over one user snapshot.
///
/// The referrer index is computed once in [`TreeBuilder::new`], so the builder
/// can answer many roots over the same snapshot.
#[derive(Debug, Clone)]
pub struct TreeBuilder<'a> {
    users: &'a [UserRecord],
    children_of: HashMap<&'a str, Vec<usize>>,
    max_depth: u32,
    cycle_guard: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(users: &'a [UserRecord]) -> Self {
        let mut children_of: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (index, user) in users.iter().enumerate() {
            if !user.has_wallet() {
                continue;
            }
            // A self-referencing record marks a root, not a referral.
            if user.referrer_id == user.user_id {
                continue;
            }
            children_of
                .entry(user.referrer_id.as_str())
                .or_default()
                .push(index);
        }
        Self {
            users,
            children_of,
            max_depth: DEFAULT_MAX_DEPTH,
            cycle_guard: true,
        }
    }

    pub fn from_config(users: &'a [UserRecord], config: &EngineConfig) -> Self {
        Self::new(users)
            .with_max_depth(config.max_depth)
            .with_cycle_guard(config.cycle_guard)
    }

    /// Deepest generation to include, clamped to [`MAX_SUPPORTED_DEPTH`].
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.min(MAX_SUPPORTED_DEPTH);
        self
    }

    pub fn with_cycle_guard(mut self, enabled: bool) -> Self {
        self.cycle_guard = enabled;
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Users whose `referrerId` is exactly `root_id`, in snapshot order.
    pub fn direct_referrals(&self, root_id: &str) -> Vec<&'a UserRecord> {
        self.children(root_id)
    }

    pub fn build(&self, root_id: &str) -> Vec<TreeNode<'a>> {
        self.build_with_stats(root_id).0
    }

    pub fn build_with_stats(&self, root_id: &str) -> (Vec<TreeNode<'a>>, BuildStats) {
        let mut stats = BuildStats::default();
        let mut path = vec![root_id];
        let forest = self.build_level(root_id, 1, &mut path, &mut stats);
        debug!(
            "built downline of {root_id}: {} nodes over {} generations",
            stats.nodes, stats.deepest_generation
        );
        (forest, stats)
    }

    /// Snapshot positions of the users referred by `parent_id`.
    fn child_indices(&self, parent_id: &str) -> &[usize] {
        self.children_of
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn children(&self, parent_id: &str) -> Vec<&'a UserRecord> {
        let users = self.users;
        self.child_indices(parent_id)
            .iter()
            .filter_map(|index| users.get(*index))
            .collect()
    }

    fn build_level<'r>(
        &self,
        parent_id: &str,
        generation: u32,
        path: &mut Vec<&'r str>,
        stats: &mut BuildStats,
    ) -> Vec<TreeNode<'a>>
    where
        'a: 'r,
    {
        if generation > self.max_depth {
            for user in self.children(parent_id) {
                if self.cycle_guard && path.contains(&user.user_id.as_str()) {
                    warn!(
                        "referral cycle: {} is already an ancestor of {parent_id}, skipping",
                        user.user_id
                    );
                    stats.cycles_skipped = stats.cycles_skipped.saturating_add(1);
                } else {
                    stats.truncated_at_cap = stats.truncated_at_cap.saturating_add(1);
                }
            }
            return Vec::new();
        }

        let mut level = Vec::new();
        for user in self.children(parent_id) {
            let user_id = user.user_id.as_str();
            if self.cycle_guard && path.contains(&user_id) {
                warn!("referral cycle: {user_id} is already an ancestor of {parent_id}, skipping");
                stats.cycles_skipped = stats.cycles_skipped.saturating_add(1);
                continue;
            }

            path.push(user_id);
            let children = self.build_level(user_id, generation.saturating_add(1), path, stats);
            path.pop();

            let total_referrals = children
                .iter()
                .fold(0usize, |acc, child| acc.saturating_add(child.total_referrals.saturating_add(1)));
            stats.nodes = stats.nodes.saturating_add(1);
            stats.deepest_generation = stats.deepest_generation.max(generation);
            level.push(TreeNode {
                user,
                generation,
                children,
                total_referrals,
            });
        }
        level
    }
}

/// Build the forest under `root_id` with the cycle guard enabled.
pub fn build_tree<'a>(root_id: &str, users: &'a [UserRecord], max_depth: u32) -> Vec<TreeNode<'a>> {
    TreeBuilder::new(users).with_max_depth(max_depth).build(root_id)
}

/// Node count per generation. Generations with no members are absent.
pub fn summarize_by_generation(forest: &[TreeNode<'_>]) -> BTreeMap<u32, usize> {
    let mut summary = BTreeMap::new();
    for node in pre_order(forest) {
        let count = summary.entry(node.generation).or_insert(0usize);
        *count = count.saturating_add(1);
    }
    summary
}

pub fn count_total_users(forest: &[TreeNode<'_>]) -> usize {
    pre_order(forest).count()
}

/// Depth-first, parent-before-children traversal of a forest.
pub fn pre_order<'t, 'a>(forest: &'t [TreeNode<'a>]) -> PreOrder<'t, 'a> {
    PreOrder {
        stack: forest.iter().rev().collect(),
    }
}

pub struct PreOrder<'t, 'a> {
    stack: Vec<&'t TreeNode<'a>>,
}

impl<'t, 'a> Iterator for PreOrder<'t, 'a> {
    type Item = &'t TreeNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A visible line of an interactively expanded tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow<'a> {
    pub generation: u32,
    pub user_id: &'a str,
    pub direct_referrals: usize,
    pub total_referrals: usize,
    pub expanded: bool,
}

/// Rows a caller would display given its own expansion state. Top-level
/// nodes are always visible; children only under expanded parents.
pub fn flatten_visible<'a, F>(forest: &[TreeNode<'a>], is_expanded: F) -> Vec<TreeRow<'a>>
where
    F: Fn(&TreeNode<'a>) -> bool,
{
    let mut rows = Vec::new();
    let mut stack: Vec<&TreeNode<'a>> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        let expanded = !node.is_leaf() && is_expanded(node);
        rows.push(TreeRow {
            generation: node.generation,
            user_id: node.user_id(),
            direct_referrals: node.direct_referrals(),
            total_referrals: node.total_referrals,
            expanded,
        });
        if expanded {
            stack.extend(node.children.iter().rev());
        }
    }
    rows
}
