//! File-backed ledger store: one JSON document per collection.
//!
//! Layout: `<dir>/<collection>.json` holding `{ "version": n, "data": [...] }`.
//! Writes go to a temporary sibling and are renamed into place, so a crashed
//! write never leaves a half-written collection behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value as JsonValue;
use tracing::debug;

use pairledger_core::{ExpectedVersion, Versioned};

use super::r#trait::{LedgerKey, LedgerStore, StoreError};

/// JSON-file ledger store.
///
/// A process-local mutex serializes read-check-write cycles. Separate processes
/// sharing the directory are only protected by the version check, which is not
/// atomic across processes.
#[derive(Debug)]
pub struct JsonFileLedgerStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileLedgerStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            key: LedgerKey::StockUnits,
            message: format!("create {}: {e}", dir.display()),
        })?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: LedgerKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    fn read(&self, key: LedgerKey) -> Result<Option<Versioned<JsonValue>>, StoreError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    key,
                    message: format!("read {}: {e}", path.display()),
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Serialization {
                key,
                message: e.to_string(),
            })
    }
}

impl LedgerStore for JsonFileLedgerStore {
    fn load_raw(&self, key: LedgerKey) -> Result<Versioned<Option<JsonValue>>, StoreError> {
        Ok(match self.read(key)? {
            Some(stored) => stored.map(Some),
            None => Versioned::new(0, None),
        })
    }

    fn save_raw(
        &self,
        key: LedgerKey,
        data: JsonValue,
        expected_version: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let current = self.read(key)?.map(|s| s.version).unwrap_or(0);
        if !expected_version.matches(current) {
            return Err(StoreError::Concurrency {
                key,
                expected: expected_version,
                actual: current,
            });
        }

        let next = current + 1;
        let bytes = serde_json::to_vec_pretty(&Versioned::new(next, data)).map_err(|e| {
            StoreError::Serialization {
                key,
                message: e.to_string(),
            }
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let io_err = |e: std::io::Error| StoreError::Io {
            key,
            message: format!("write {}: {e}", path.display()),
        };
        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;

        debug!(collection = %key, version = next, "collection saved");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger_store::LedgerStoreExt;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = JsonFileLedgerStore::open(dir.path()).unwrap();
            store
                .save(LedgerKey::Recipients, &["Harbour".to_string()], ExpectedVersion::Exact(0))
                .unwrap();
        }

        let reopened = JsonFileLedgerStore::open(dir.path()).unwrap();
        let loaded = reopened.load::<String>(LedgerKey::Recipients).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.data, vec!["Harbour".to_string()]);
        assert!(dir.path().join("recipients.json").exists());
    }

    #[test]
    fn stale_write_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileLedgerStore::open(dir.path()).unwrap();

        store.save(LedgerKey::BoxStock, &[1u32], ExpectedVersion::Exact(0)).unwrap();
        let err = store.save(LedgerKey::BoxStock, &[2u32], ExpectedVersion::Exact(0)).unwrap_err();
        assert!(matches!(err, StoreError::Concurrency { .. }));

        assert_eq!(store.load::<u32>(LedgerKey::BoxStock).unwrap().data, vec![1]);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stock-units.json"), b"not json").unwrap();

        let store = JsonFileLedgerStore::open(dir.path()).unwrap();
        let err = store.load::<u32>(LedgerKey::StockUnits).unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
    }
}
