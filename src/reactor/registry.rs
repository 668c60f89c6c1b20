//! Thread-safe component name → [`Reactor`] map.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;

// Layer 3: Internal module imports
use super::error::ReactorError;
use super::reactor::Reactor;

/// Maps a component's name to the [`Reactor`] the runtime assigned it.
///
/// Cheap to clone: wraps a single `Arc<DashMap<..>>`, so every clone shares
/// the same underlying table (mirroring the registry pattern the event
/// bus's pool/subscriber bookkeeping uses internally).
#[derive(Clone, Default)]
pub struct ReactorRegistry {
    reactors: Arc<DashMap<String, Reactor>>,
}

impl ReactorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reactor under `name`. Rejects a duplicate name: redeploy
    /// under the same name requires going through `undeploy` first.
    pub fn add(&self, name: impl Into<String>, reactor: Reactor) -> Result<(), ReactorError> {
        let name = name.into();
        if self.reactors.contains_key(&name) {
            return Err(ReactorError::InvalidConfig(format!(
                "a reactor named '{name}' is already registered"
            )));
        }
        self.reactors.insert(name, reactor);
        Ok(())
    }

    /// Look up a reactor by name.
    pub fn get(&self, name: &str) -> Option<Reactor> {
        self.reactors.get(name).map(|entry| entry.value().clone())
    }

    /// Remove and return a reactor by name.
    pub fn remove(&self, name: &str) -> Option<Reactor> {
        self.reactors.remove(name).map(|(_, reactor)| reactor)
    }

    /// Snapshot of all registered component names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.reactors.iter().map(|entry| entry.key().clone()).collect()
    }

    /// All registered reactors, for shutdown iteration.
    pub fn reactors(&self) -> Vec<Reactor> {
        self.reactors.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of registered reactors.
    pub fn len(&self) -> usize {
        self.reactors.len()
    }

    /// Whether the registry currently holds no reactors.
    pub fn is_empty(&self) -> bool {
        self.reactors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::config::ReactorConfig;

    fn reactor(name: &str) -> Reactor {
        Reactor::new(name, ReactorConfig::default())
    }

    #[test]
    fn add_then_get_round_trips() {
        let registry = ReactorRegistry::new();
        registry.add("a", reactor("a")).unwrap();
        assert!(registry.get("a").is_some());
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let registry = ReactorRegistry::new();
        registry.add("a", reactor("a")).unwrap();
        assert!(registry.add("a", reactor("a")).is_err());
    }

    #[test]
    fn remove_takes_the_entry_out() {
        let registry = ReactorRegistry::new();
        registry.add("a", reactor("a")).unwrap();
        assert!(registry.remove("a").is_some());
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn clone_shares_the_same_table() {
        let registry = ReactorRegistry::new();
        let clone = registry.clone();
        registry.add("a", reactor("a")).unwrap();
        assert!(clone.get("a").is_some());
    }

    #[test]
    fn names_reflects_current_membership() {
        let registry = ReactorRegistry::new();
        registry.add("a", reactor("a")).unwrap();
        registry.add("b", reactor("b")).unwrap();
        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
