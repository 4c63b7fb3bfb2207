use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use thiserror::Error;

use pairledger_core::{ExpectedVersion, Versioned};
use std::sync::Arc;

/// Named collections persisted by the store. Each is one serialized list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LedgerKey {
    StockUnits,
    OutgoingDocuments,
    BoxStock,
    Recipients,
}

impl LedgerKey {
    pub fn as_str(self) -> &'static str {
        match self {
            LedgerKey::StockUnits => "stock-units",
            LedgerKey::OutgoingDocuments => "outgoing-documents",
            LedgerKey::BoxStock => "box-stock",
            LedgerKey::Recipients => "recipients",
        }
    }
}

impl core::fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, stock sufficiency).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed for {key}: expected {expected:?}, found {actual}")]
    Concurrency {
        key: LedgerKey,
        expected: ExpectedVersion,
        actual: u64,
    },

    #[error("storage io failed for {key}: {message}")]
    Io { key: LedgerKey, message: String },

    #[error("serialization failed for {key}: {message}")]
    Serialization { key: LedgerKey, message: String },

    #[error("store lock poisoned")]
    Poisoned,
}

/// Whole-collection persistence with a version per collection.
///
/// Every save replaces the entire collection. The version makes concurrent
/// read-modify-write cycles detectable: a writer passes back the version it
/// read, and the save fails with [`StoreError::Concurrency`] if another writer
/// got there first. A failed save leaves the stored collection untouched.
pub trait LedgerStore: Send + Sync {
    /// Load a collection. `data` is `None` (and `version` 0) if it was never written.
    fn load_raw(&self, key: LedgerKey) -> Result<Versioned<Option<JsonValue>>, StoreError>;

    /// Replace a collection, returning its new version.
    fn save_raw(
        &self,
        key: LedgerKey,
        data: JsonValue,
        expected_version: ExpectedVersion,
    ) -> Result<u64, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load_raw(&self, key: LedgerKey) -> Result<Versioned<Option<JsonValue>>, StoreError> {
        (**self).load_raw(key)
    }

    fn save_raw(
        &self,
        key: LedgerKey,
        data: JsonValue,
        expected_version: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        (**self).save_raw(key, data, expected_version)
    }
}

/// Typed access on top of [`LedgerStore`].
pub trait LedgerStoreExt: LedgerStore {
    /// Load a collection of records, falling back to `fallback` when it was never written.
    fn load_or<T>(&self, key: LedgerKey, fallback: Vec<T>) -> Result<Versioned<Vec<T>>, StoreError>
    where
        T: DeserializeOwned,
    {
        let raw = self.load_raw(key)?;
        let data = match raw.data {
            Some(value) => serde_json::from_value(value).map_err(|e| StoreError::Serialization {
                key,
                message: e.to_string(),
            })?,
            None => fallback,
        };
        Ok(Versioned::new(raw.version, data))
    }

    fn load<T>(&self, key: LedgerKey) -> Result<Versioned<Vec<T>>, StoreError>
    where
        T: DeserializeOwned,
    {
        self.load_or(key, Vec::new())
    }

    fn save<T>(&self, key: LedgerKey, data: &[T], expected_version: ExpectedVersion) -> Result<u64, StoreError>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(data).map_err(|e| StoreError::Serialization {
            key,
            message: e.to_string(),
        })?;
        self.save_raw(key, value, expected_version)
    }
}

impl<S: LedgerStore + ?Sized> LedgerStoreExt for S {}
