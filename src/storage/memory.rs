//! In-memory key-value store for tests and embedding hosts.

use std::collections::HashMap;
use std::sync::RwLock;

use super::KeyValueStore;
use crate::errors::{Result, VaultError};

/// A `RwLock<HashMap>` store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Result<Vec<String>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        let mut keys: Vec<String> = values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

fn poisoned() -> VaultError {
    VaultError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| poisoned())?;
        values.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let values = self.values.read().map_err(|_| poisoned())?;
        Ok(values.contains_key(key))
    }
}
