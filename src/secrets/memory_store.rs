//! secrets::memory_store
//!
//! Process-local [`SecretStore`] for tests and embedders that manage
//! persistence themselves.

use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::{SecretError, SecretStore};

/// In-memory secret store. Contents vanish with the value.
#[derive(Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    fn entries(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, SecretError> {
        self.entries
            .lock()
            .map_err(|_| SecretError::ReadError("memory store poisoned".into()))
    }
}

// Custom Debug to avoid exposing values
impl std::fmt::Debug for MemorySecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self
            .entries
            .lock()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("MemorySecretStore")
            .field("keys", &keys)
            .finish()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_and_delete() {
        let store = MemorySecretStore::with_entry("atomgit.token", "abc");
        assert_eq!(store.get("atomgit.token").unwrap().as_deref(), Some("abc"));

        store.delete("atomgit.token").unwrap();
        store.delete("atomgit.token").unwrap();
        assert!(store.get("atomgit.token").unwrap().is_none());
    }

    #[test]
    fn debug_hides_values() {
        let store = MemorySecretStore::with_entry("atomgit.token", "hunter2");
        let debug = format!("{:?}", store);
        assert!(debug.contains("atomgit.token"));
        assert!(!debug.contains("hunter2"));
    }
}
