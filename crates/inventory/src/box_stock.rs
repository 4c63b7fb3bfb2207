//! Box-stock records and the pairs → boxes deduction rule.

use serde::{Deserialize, Serialize};

use pairledger_core::{BoxItemId, DomainError, DomainResult, Entity};

use crate::sku::same_sku;

/// Coarse stock level derived from the box count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Medium,
    High,
}

impl StockLevel {
    /// `> 30` boxes is high, `> 15` medium, anything else low.
    pub fn from_box_count(box_count: u32) -> Self {
        if box_count > 30 {
            StockLevel::High
        } else if box_count > 15 {
            StockLevel::Medium
        } else {
            StockLevel::Low
        }
    }
}

/// Boxes consumed by allocating `pairs_allocated` pairs: `ceil(pairs / pairs_per_box)`.
///
/// A zero `pairs_per_box` consumes no boxes.
pub fn boxes_to_reduce(pairs_allocated: u32, pairs_per_box: u32) -> u32 {
    if pairs_per_box == 0 {
        return 0;
    }
    pairs_allocated.div_ceil(pairs_per_box)
}

/// Box-level stock of one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStockItem {
    pub id: BoxItemId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub box_count: u32,
    pub pairs_per_box: u32,
    pub total_pairs: u32,
    pub stock_level: StockLevel,
}

impl Entity for BoxStockItem {
    type Id = BoxItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl BoxStockItem {
    pub fn new(id: BoxItemId, record: BoxStockRecord) -> DomainResult<Self> {
        record.validate()?;
        let mut item = Self {
            id,
            sku: record.sku.trim().to_string(),
            name: record.name,
            category: record.category,
            box_count: record.box_count,
            pairs_per_box: record.pairs_per_box,
            total_pairs: 0,
            stock_level: StockLevel::Low,
        };
        item.recompute();
        Ok(item)
    }

    /// Refresh the derived `total_pairs` and `stock_level`.
    pub fn recompute(&mut self) {
        self.total_pairs = self.box_count.saturating_mul(self.pairs_per_box);
        self.stock_level = StockLevel::from_box_count(self.box_count);
    }

    /// Deduct the boxes needed for `pairs_allocated` pairs, flooring at zero.
    ///
    /// Returns the number of boxes actually removed.
    pub fn deduct_pairs(&mut self, pairs_allocated: u32) -> u32 {
        let wanted = boxes_to_reduce(pairs_allocated, self.pairs_per_box);
        let before = self.box_count;
        self.box_count = before.saturating_sub(wanted);
        self.recompute();
        before - self.box_count
    }
}

/// Box-stock input row (`{ sku, name, category, boxCount, pairsPerBox }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStockRecord {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub box_count: u32,
    pub pairs_per_box: u32,
}

impl BoxStockRecord {
    pub fn validate(&self) -> DomainResult<()> {
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if self.pairs_per_box == 0 {
            return Err(DomainError::validation("pairsPerBox must be positive"));
        }
        Ok(())
    }
}

/// Case-insensitive SKU lookup.
pub fn find_by_sku_mut<'a>(items: &'a mut [BoxStockItem], sku: &str) -> Option<&'a mut BoxStockItem> {
    items.iter_mut().find(|item| same_sku(&item.sku, sku))
}

/// Merge imported records into the box-stock list.
///
/// An existing SKU gets the imported boxes added and its name, category and
/// pairs-per-box refreshed; an unknown SKU becomes a new item. Returns the ids
/// touched, in record order.
pub fn merge_records(
    items: &mut Vec<BoxStockItem>,
    records: Vec<BoxStockRecord>,
    mut next_id: impl FnMut() -> BoxItemId,
) -> DomainResult<Vec<BoxItemId>> {
    for record in &records {
        record.validate()?;
    }

    let mut touched = Vec::with_capacity(records.len());
    for record in records {
        match find_by_sku_mut(items, &record.sku) {
            Some(existing) => {
                existing.box_count = existing.box_count.saturating_add(record.box_count);
                existing.pairs_per_box = record.pairs_per_box;
                if !record.name.trim().is_empty() {
                    existing.name = record.name;
                }
                if !record.category.trim().is_empty() {
                    existing.category = record.category;
                }
                existing.recompute();
                touched.push(existing.id);
            }
            None => {
                let item = BoxStockItem::new(next_id(), record)?;
                touched.push(item.id);
                items.push(item);
            }
        }
    }
    Ok(touched)
}
