//! Accessibility selection
//!
//! Partitions a tenant's full record set into accessible and locked records.
//! The oldest `n` records stay accessible so an existing customer base keeps
//! working when a tenant under-provisions; only newer growth is locked.

use crate::entitlements::{Entitlement, Limit};
use crate::model::ResourceRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of applying a limit to a record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessibilityDecision {
    /// Records in the set
    pub total_count: usize,
    /// Cap applied; `None` when unlimited
    pub limit_count: Option<u64>,
    /// Accessible ids, oldest first
    pub accessible_ids: Vec<String>,
    /// Locked ids, oldest first
    pub locked_ids: Vec<String>,
    /// Records beyond the cap
    pub excess_count: usize,
    /// id -> position in creation order
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl AccessibilityDecision {
    /// Whether `id` falls in the locked subset
    pub fn is_locked(&self, id: &str) -> bool {
        self.position(id).is_some_and(|i| i >= self.accessible_count())
    }

    /// Whether `id` falls in the accessible subset
    pub fn is_accessible(&self, id: &str) -> bool {
        self.position(id).is_some_and(|i| i < self.accessible_count())
    }

    /// Index of `id` in the creation-ordered set
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Whether the set contains `id` at all
    pub fn contains(&self, id: &str) -> bool {
        self.is_accessible(id) || self.is_locked(id)
    }

    /// True when some records are locked
    pub fn has_excess(&self) -> bool {
        self.excess_count > 0
    }

    /// Number of accessible records
    pub fn accessible_count(&self) -> usize {
        self.accessible_ids.len()
    }
}

/// Apply an entitlement to the full record set.
pub fn select_accessible(records: &[ResourceRecord], entitlement: &Entitlement) -> AccessibilityDecision {
    select_with_limit(records, entitlement.limit)
}

/// Apply a bare limit to the full record set.
///
/// Pure and total: input is ordered by (`created_at`, `id`) before the cut, so
/// the partition depends only on the set and the limit.
pub fn select_with_limit(records: &[ResourceRecord], limit: Limit) -> AccessibilityDecision {
    let mut ordered: Vec<&ResourceRecord> = records.iter().collect();
    ordered.sort_by(|a, b| ResourceRecord::creation_order(a, b));

    let total = ordered.len();
    let cutoff = match limit {
        Limit::Unlimited => total,
        Limit::Finite(n) => usize::try_from(n).unwrap_or(usize::MAX).min(total),
    };

    let positions = ordered
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.clone(), i))
        .collect();
    let (accessible, locked) = ordered.split_at(cutoff);

    AccessibilityDecision {
        total_count: total,
        limit_count: limit.cap(),
        accessible_ids: accessible.iter().map(|r| r.id.clone()).collect(),
        locked_ids: locked.iter().map(|r| r.id.clone()).collect(),
        excess_count: locked.len(),
        positions,
    }
}
