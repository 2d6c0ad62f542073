//! In-memory style profile store.

use crate::error::{Result, SpeilError};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
struct Entries {
    profiles: HashMap<String, String>,
    order: Vec<String>,
}

/// Process-lifetime mapping from style identifier to style profile.
///
/// No eviction, no size bound, no persistence. Each write is one assignment
/// under the lock, so readers never see a partial profile. Concurrent writers
/// to the same identifier race; the last one wins.
#[derive(Default)]
pub struct StyleStore {
    entries: RwLock<Entries>,
}

impl StyleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a profile.
    pub fn put(&self, id: &str, profile: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries
            .profiles
            .insert(id.to_string(), profile.to_string())
            .is_none()
        {
            entries.order.push(id.to_string());
        }
    }

    /// Look up a profile.
    pub fn get(&self, id: &str) -> Result<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| SpeilError::StyleNotFound(id.to_string()))
    }

    /// All identifiers in insertion order.
    pub fn list(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.order.clone()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_style() {
        let store = StyleStore::new();
        assert!(matches!(store.get("nope"), Err(SpeilError::StyleNotFound(id)) if id == "nope"));
        assert!(store.list().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let store = StyleStore::new();
        store.put("formal", "Uses passive voice.");
        assert_eq!(store.get("formal").unwrap(), "Uses passive voice.");
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let store = StyleStore::new();
        store.put("a", "first");
        store.put("b", "second");
        store.put("a", "replaced");

        assert_eq!(store.get("a").unwrap(), "replaced");
        assert_eq!(store.list(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_in_insertion_order() {
        let store = StyleStore::new();
        for id in ["zeta", "alpha", "dQw4w9WgXcQ", "mid"] {
            store.put(id, "profile");
        }
        assert_eq!(store.list(), vec!["zeta", "alpha", "dQw4w9WgXcQ", "mid"]);
    }
}
