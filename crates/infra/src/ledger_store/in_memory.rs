use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use pairledger_core::{ExpectedVersion, Versioned};

use super::r#trait::{LedgerKey, LedgerStore, StoreError};

/// In-memory ledger store (dev, tests, and the API when no data dir is configured).
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    collections: RwLock<HashMap<LedgerKey, Versioned<JsonValue>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load_raw(&self, key: LedgerKey) -> Result<Versioned<Option<JsonValue>>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(match collections.get(&key) {
            Some(stored) => Versioned::new(stored.version, Some(stored.data.clone())),
            None => Versioned::new(0, None),
        })
    }

    fn save_raw(
        &self,
        key: LedgerKey,
        data: JsonValue,
        expected_version: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;

        let current = collections.get(&key).map(|c| c.version).unwrap_or(0);
        if !expected_version.matches(current) {
            return Err(StoreError::Concurrency {
                key,
                expected: expected_version,
                actual: current,
            });
        }

        let next = current + 1;
        collections.insert(key, Versioned::new(next, data));
        Ok(next)
    }
}
