//! Aggregation engine: current availability per `(sku, color, size)`.
//!
//! Availability is never stored. It is rebuilt from scratch on every read by
//! replaying the full additive ledger (stock units) and then every subtraction
//! (outgoing document lines), so running it twice over the same snapshots gives
//! the same answer.
//!
//! Shipment lines whose exact key is missing from the additive pass fall back to
//! a looser match (base SKU + size + color). When several variants qualify, the
//! first one created by the additive pass wins; that tie-break depends on unit
//! entry order and is a known limitation rather than a rule.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use pairledger_core::{DomainError, DomainResult};

use crate::catalog::{ProductCatalog, UNCATEGORIZED, UNKNOWN_PRODUCT};
use crate::shipment::{OutgoingDocument, ShipmentLine};
use crate::sku::VariantKey;
use crate::unit::StockUnitEntry;

/// Derived availability of one variant. `total_pairs` never goes below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStockItem {
    /// `sku-normalizedColor-size`.
    pub id: String,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub size: String,
    pub color: String,
    pub total_pairs: u32,
}

/// A subtraction that could not be applied to any variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AggregationAnomaly {
    UnresolvedSubtraction {
        document_number: String,
        key: String,
        quantity: u32,
    },
}

/// Output of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    pub items: Vec<AggregatedStockItem>,
    pub anomalies: Vec<AggregationAnomaly>,
    /// Subtractions applied through the loose-match fallback.
    pub fuzzy_matches: usize,
}

/// Insertion-ordered map of composite key string → aggregated item.
///
/// The exact key is the concatenated `sku-color-size` string, so variants whose
/// parts only differ in where the hyphens fall share one item. Keeping insertion
/// order makes the fallback's "first match" deterministic for a given ledger
/// snapshot.
#[derive(Debug, Default)]
struct VariantTable {
    keys: Vec<VariantKey>,
    items: Vec<AggregatedStockItem>,
    index: HashMap<String, usize>,
}

impl VariantTable {
    fn slot_for(&mut self, key: VariantKey, entry: &StockUnitEntry, catalog: &dyn ProductCatalog) -> usize {
        let id = key.to_string();
        if let Some(&slot) = self.index.get(&id) {
            return slot;
        }

        let (name, category) = match catalog.product_for_sku(&key.base_sku()) {
            Some(product) => (product.name, product.category),
            None => (UNKNOWN_PRODUCT.to_string(), UNCATEGORIZED.to_string()),
        };

        let slot = self.items.len();
        self.items.push(AggregatedStockItem {
            id: id.clone(),
            sku: entry.sku.clone(),
            name,
            category,
            size: entry.size.clone(),
            color: key.color().to_string(),
            total_pairs: 0,
        });
        self.index.insert(id, slot);
        self.keys.push(key);
        slot
    }

    /// Exact key first, then the first loosely matching key.
    fn resolve(&self, key: &VariantKey) -> Option<Resolved> {
        if let Some(&slot) = self.index.get(&key.to_string()) {
            return Some(Resolved { slot, fuzzy: false });
        }
        self.keys
            .iter()
            .position(|stored| key.loosely_matches(stored))
            .map(|slot| Resolved { slot, fuzzy: true })
    }
}

#[derive(Debug, Clone, Copy)]
struct Resolved {
    slot: usize,
    fuzzy: bool,
}

/// Rebuild the availability view from both ledgers.
///
/// Never fails: unresolvable subtractions are reported in
/// [`AggregationReport::anomalies`] and otherwise dropped.
pub fn aggregate(
    units: &[StockUnitEntry],
    documents: &[OutgoingDocument],
    catalog: &dyn ProductCatalog,
) -> AggregationReport {
    let mut table = VariantTable::default();

    for entry in units {
        let slot = table.slot_for(entry.key(), entry, catalog);
        let item = &mut table.items[slot];
        item.total_pairs = item.total_pairs.saturating_add(entry.quantity);
    }

    let mut anomalies = Vec::new();
    let mut fuzzy_matches = 0;

    for document in documents {
        for line in &document.items {
            let key = line.key();
            match table.resolve(&key) {
                Some(resolved) => {
                    if resolved.fuzzy {
                        fuzzy_matches += 1;
                        debug!(
                            document_number = %document.document_number,
                            key = %key,
                            matched = %table.keys[resolved.slot],
                            "shipment line resolved by base sku"
                        );
                    }
                    let item = &mut table.items[resolved.slot];
                    item.total_pairs = item.total_pairs.saturating_sub(line.quantity);
                }
                None => anomalies.push(AggregationAnomaly::UnresolvedSubtraction {
                    document_number: document.document_number.clone(),
                    key: key.to_string(),
                    quantity: line.quantity,
                }),
            }
        }
    }

    AggregationReport {
        items: table.items,
        anomalies,
        fuzzy_matches,
    }
}

/// Read-only availability lookups over an aggregation result.
#[derive(Debug, Clone, Default)]
pub struct AvailableStock {
    table_keys: Vec<VariantKey>,
    index: HashMap<String, usize>,
    items: Vec<AggregatedStockItem>,
}

impl AvailableStock {
    pub fn new(items: Vec<AggregatedStockItem>) -> Self {
        let table_keys: Vec<VariantKey> = items
            .iter()
            .map(|i| VariantKey::new(&i.sku, &i.color, &i.size))
            .collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(slot, item)| (item.id.clone(), slot))
            .collect();
        Self {
            table_keys,
            index,
            items,
        }
    }

    pub fn items(&self) -> &[AggregatedStockItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<AggregatedStockItem> {
        self.items
    }

    /// The variant a line would be subtracted from, using the same exact-then-loose
    /// rule as [`aggregate`].
    pub fn resolve(&self, key: &VariantKey) -> Option<&AggregatedStockItem> {
        let slot = match self.index.get(&key.to_string()) {
            Some(&slot) => slot,
            None => self.table_keys.iter().position(|stored| key.loosely_matches(stored))?,
        };
        self.items.get(slot)
    }

    pub fn available(&self, key: &VariantKey) -> u32 {
        self.resolve(key).map(|i| i.total_pairs).unwrap_or(0)
    }

    /// All-or-nothing sufficiency check for a set of lines.
    ///
    /// Lines resolving to the same variant are summed before comparing.
    pub fn ensure_sufficient(&self, lines: &[ShipmentLine]) -> DomainResult<()> {
        let mut requested: Vec<(String, u32, u32)> = Vec::new();

        for line in lines {
            let key = line.key();
            let (id, available) = match self.resolve(&key) {
                Some(item) => (item.id.clone(), item.total_pairs),
                None => (key.to_string(), 0),
            };
            match requested.iter_mut().find(|(k, _, _)| *k == id) {
                Some((_, total, _)) => *total = total.saturating_add(line.quantity),
                None => requested.push((id, line.quantity, available)),
            }
        }

        for (key, total, available) in requested {
            if total > available {
                return Err(DomainError::insufficient_stock(key, total, available));
            }
        }
        Ok(())
    }
}

impl From<AggregationReport> for AvailableStock {
    fn from(report: AggregationReport) -> Self {
        Self::new(report.items)
    }
}
