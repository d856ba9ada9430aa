//! Cross-snapshot interaction state.
//!
//! Two session-scoped sets: which item keys are expanded and which group
//! names are collapsed. Snapshot application never touches them; only
//! explicit toggles do. Keys for items that vanish from later snapshots are
//! kept — an accepted bounded leak for a single-session dashboard, and the
//! reason an item that disappears and comes back reopens itself.

use crate::key::ItemKey;
use std::collections::HashSet;

/// Holds expand/collapse state across full rebuilds.
///
/// Passed into the renderer explicitly rather than living as a global, so
/// tests can construct a state and assert on render output directly.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    expanded: HashSet<ItemKey>,
    collapsed_groups: HashSet<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles an item's expanded state. Returns the new state.
    pub fn toggle_item(&mut self, key: &ItemKey) -> bool {
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.clone());
            true
        }
    }

    /// Toggles a group's collapsed state. Returns the new state.
    pub fn toggle_group(&mut self, name: &str) -> bool {
        if self.collapsed_groups.remove(name) {
            false
        } else {
            self.collapsed_groups.insert(name.to_string());
            true
        }
    }

    pub fn is_expanded(&self, key: &ItemKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn is_group_collapsed(&self, name: &str) -> bool {
        self.collapsed_groups.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_item_flips_and_reports() {
        let mut state = Reconciler::new();
        let key = ItemKey::derive("t", "c");
        assert!(!state.is_expanded(&key));
        assert!(state.toggle_item(&key));
        assert!(state.is_expanded(&key));
        assert!(!state.toggle_item(&key));
        assert!(!state.is_expanded(&key));
    }

    #[test]
    fn toggle_group_is_symmetric() {
        let mut state = Reconciler::new();
        assert!(state.toggle_group("error"));
        assert!(state.is_group_collapsed("error"));
        assert!(!state.toggle_group("error"));
        assert!(!state.is_group_collapsed("error"));
    }

    #[test]
    fn toggles_are_independent() {
        let mut state = Reconciler::new();
        let a = ItemKey::derive("a", "1");
        let b = ItemKey::derive("b", "2");
        state.toggle_item(&a);
        state.toggle_group("warning");
        assert!(state.is_expanded(&a));
        assert!(!state.is_expanded(&b));
        assert!(state.is_group_collapsed("warning"));
        assert!(!state.is_group_collapsed("info"));
    }
}
