//! Product catalogue boundary (display enrichment only).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name substituted when no product matches a SKU.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Category substituted when no product matches a SKU.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub sku: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Looks products up by SKU.
///
/// Consulted for names and categories only; availability never depends on it.
pub trait ProductCatalog: Send + Sync {
    fn product_for_sku(&self, sku: &str) -> Option<ProductInfo>;
}

impl<C> ProductCatalog for std::sync::Arc<C>
where
    C: ProductCatalog + ?Sized,
{
    fn product_for_sku(&self, sku: &str) -> Option<ProductInfo> {
        (**self).product_for_sku(sku)
    }
}

/// Catalogue that knows no products.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCatalog;

impl ProductCatalog for EmptyCatalog {
    fn product_for_sku(&self, _sku: &str) -> Option<ProductInfo> {
        None
    }
}

/// Catalogue held in memory, keyed by lower-cased SKU.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    products: HashMap<String, ProductInfo>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product: ProductInfo) {
        self.products.insert(product.sku.trim().to_lowercase(), product);
    }

    pub fn remove(&mut self, sku: &str) -> Option<ProductInfo> {
        self.products.remove(&sku.trim().to_lowercase())
    }

    pub fn list(&self) -> Vec<ProductInfo> {
        let mut out: Vec<_> = self.products.values().cloned().collect();
        out.sort_by(|a, b| a.sku.cmp(&b.sku));
        out
    }
}

impl FromIterator<ProductInfo> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = ProductInfo>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for product in iter {
            catalog.insert(product);
        }
        catalog
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn product_for_sku(&self, sku: &str) -> Option<ProductInfo> {
        self.products.get(&sku.trim().to_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sku: &str, name: &str) -> ProductInfo {
        ProductInfo {
            sku: sku.to_string(),
            name: name.to_string(),
            category: "sneakers".to_string(),
            sizes: vec!["40".to_string()],
            colors: vec![],
        }
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let catalog: InMemoryCatalog = [product("A-1-BLK", "Trail Runner")].into_iter().collect();
        assert_eq!(catalog.product_for_sku(" a-1-blk ").map(|p| p.name), Some("Trail Runner".to_string()));
        assert_eq!(catalog.product_for_sku("A-1"), None);
    }

    #[test]
    fn insert_replaces_and_list_is_sorted() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(product("B-2-WHT", "Court"));
        catalog.insert(product("A-1-BLK", "Trail Runner"));
        catalog.insert(product("a-1-blk", "Trail Runner II"));

        let names: Vec<_> = catalog.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Trail Runner II", "Court"]);
        assert!(catalog.remove("A-1-BLK").is_some());
        assert_eq!(catalog.list().len(), 1);
    }
}
