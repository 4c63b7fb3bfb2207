//! Warehouse wiring: picks the ledger store from configuration.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use pairledger_infra::{InMemoryLedgerStore, JsonFileLedgerStore, SharedCatalog, SharedStore, Warehouse};

use crate::config::ApiConfig;

pub fn build_store(config: &ApiConfig) -> anyhow::Result<SharedStore> {
    match &config.data_dir {
        Some(dir) => {
            let store = JsonFileLedgerStore::open(dir)
                .with_context(|| format!("failed to open ledger directory {}", dir.display()))?;
            info!(data_dir = %dir.display(), "using JSON file ledger store");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryLedgerStore::new())),
    }
}

pub fn build_warehouse(config: &ApiConfig) -> anyhow::Result<Warehouse> {
    let store = build_store(config)?;
    Ok(Warehouse::new(store, SharedCatalog::new()).with_document_prefix(config.document_prefix.clone()))
}
