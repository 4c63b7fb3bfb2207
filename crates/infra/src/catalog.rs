//! Shared, mutable product catalogue.

use std::sync::{Arc, RwLock};

use pairledger_inventory::{InMemoryCatalog, ProductCatalog, ProductInfo};

/// Thread-safe catalogue handle; cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<RwLock<InMemoryCatalog>>,
}

impl SharedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, product: ProductInfo) {
        if let Ok(mut catalog) = self.inner.write() {
            catalog.insert(product);
        }
    }

    pub fn remove(&self, sku: &str) -> Option<ProductInfo> {
        self.inner.write().ok()?.remove(sku)
    }

    pub fn list(&self) -> Vec<ProductInfo> {
        match self.inner.read() {
            Ok(catalog) => catalog.list(),
            Err(_) => vec![],
        }
    }
}

impl ProductCatalog for SharedCatalog {
    fn product_for_sku(&self, sku: &str) -> Option<ProductInfo> {
        self.inner.read().ok()?.product_for_sku(sku)
    }
}
