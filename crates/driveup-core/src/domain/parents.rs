//! Parent-set reconciliation
//!
//! A resource may live under several parent folders. When the caller asks
//! for a new parent set, only the difference against the parents the remote
//! currently reports is sent, as a remove-set and an add-set.

use std::collections::BTreeSet;

/// The minimal parent mutation between two parent sets
///
/// `to_remove` holds parents present in the current set but absent from the
/// desired one; `to_add` holds parents desired but not currently present.
/// The two sets are always disjoint. Both inputs are treated as sets, so
/// ordering and duplicate entries never change the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentDelta {
    to_remove: BTreeSet<String>,
    to_add: BTreeSet<String>,
}

impl ParentDelta {
    /// Computes the delta that turns `current` into `desired`
    pub fn reconcile<C, D>(current: C, desired: D) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let current: BTreeSet<String> = current
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        let desired: BTreeSet<String> = desired
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();

        Self {
            to_remove: current.difference(&desired).cloned().collect(),
            to_add: desired.difference(&current).cloned().collect(),
        }
    }

    /// Parents to detach from the resource
    pub fn to_remove(&self) -> &BTreeSet<String> {
        &self.to_remove
    }

    /// Parents to attach to the resource
    pub fn to_add(&self) -> &BTreeSet<String> {
        &self.to_add
    }

    /// Returns true when neither removals nor additions are needed
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    /// Comma-separated remove list, as expected by `removeParents`
    pub fn remove_list(&self) -> String {
        join(&self.to_remove)
    }

    /// Comma-separated add list, as expected by `addParents`
    pub fn add_list(&self) -> String {
        join(&self.to_add)
    }
}

fn join(ids: &BTreeSet<String>) -> String {
    ids.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
