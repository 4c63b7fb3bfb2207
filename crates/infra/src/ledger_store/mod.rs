//! Ledger store boundary.
//!
//! Each ledger is persisted as one serialized collection under a fixed key.
//! This module defines the load/save contract and its implementations without
//! the ledgers knowing where the bytes end up.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use json_file::JsonFileLedgerStore;
pub use r#trait::{LedgerKey, LedgerStore, LedgerStoreExt, StoreError};
