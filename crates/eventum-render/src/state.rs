//! Variable state carried between render cycles.
//!
//! Two kinds of state survive across renders: local state scoped to one
//! template identity, and shared state visible to every template in the
//! render set. [`VariableStateStore`] owns both for a session;
//! [`VariableState`] is the flat key-value map either kind is made of.

use std::collections::BTreeMap;

/// Flat, ordered key-value variable state.
///
/// Values use `serde_json::Value` as the canonical representation so state
/// can round-trip between the template engine and session accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableState {
    entries: BTreeMap<String, serde_json::Value>,
}

impl VariableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.entries.iter()
    }

    pub fn into_map(self) -> BTreeMap<String, serde_json::Value> {
        self.entries
    }
}

/// Session-owned store for local and shared variable state.
///
/// Local state is retained for at most one template identity at a time: the
/// studio edits a single template, so when the identity changes the previous
/// slot is dropped rather than cached. Shared state has no identity and
/// persists until cleared.
#[derive(Debug, Default)]
pub struct VariableStateStore {
    local: Option<(String, VariableState)>,
    shared: Option<VariableState>,
}

impl VariableStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the local state for `identity`, or `None` on first access or
    /// when the retained slot belongs to a different identity.
    pub fn get_local(&self, identity: &str) -> Option<&VariableState> {
        match &self.local {
            Some((retained, state)) if retained == identity => Some(state),
            _ => None,
        }
    }

    /// Stores local state for `identity`, dropping any previously retained
    /// identity's state.
    pub fn set_local(&mut self, identity: impl Into<String>, state: VariableState) {
        self.local = Some((identity.into(), state));
    }

    pub fn get_shared(&self) -> Option<&VariableState> {
        self.shared.as_ref()
    }

    pub fn set_shared(&mut self, state: VariableState) {
        self.shared = Some(state);
    }

    /// Resets both local and shared state to empty.
    pub fn clear(&mut self) {
        self.local = None;
        self.shared = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_access_is_empty() {
        let store = VariableStateStore::new();
        assert!(store.get_local("template.jinja").is_none());
        assert!(store.get_shared().is_none());
    }

    #[test]
    fn test_local_state_round_trip() {
        let mut store = VariableStateStore::new();
        let mut state = VariableState::new();
        state.set("counter", json!(1));
        store.set_local("template.jinja", state);

        let fetched = store.get_local("template.jinja").unwrap();
        assert_eq!(fetched.get("counter"), Some(&json!(1)));
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched.clone().into_map()["counter"], json!(1));
    }

    #[test]
    fn test_single_slot_drops_other_identity() {
        let mut store = VariableStateStore::new();
        let mut state = VariableState::new();
        state.set("counter", json!(1));
        store.set_local("a.jinja", state);

        assert!(store.get_local("b.jinja").is_none());

        store.set_local("b.jinja", VariableState::new());
        assert!(store.get_local("a.jinja").is_none());
        assert!(store.get_local("b.jinja").is_some());
    }

    #[test]
    fn test_clear_resets_both_kinds() {
        let mut store = VariableStateStore::new();
        let mut state = VariableState::new();
        state.set("k", json!("v"));
        store.set_local("t", state.clone());
        store.set_shared(state);

        store.clear();
        assert!(store.get_local("t").is_none());
        assert!(store.get_shared().is_none());
    }
}
