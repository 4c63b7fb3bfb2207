//! Stock picker: search the availability view and build shipment lines from it.
//!
//! The picker holds selections only. Availability is passed in on every call so
//! a long-lived picker never works from a stale view.

use serde::{Deserialize, Serialize};

use crate::aggregation::{AggregatedStockItem, AvailableStock};
use crate::shipment::ShipmentLine;

/// Items whose SKU or name contains `search` (case-insensitive). A blank search matches all.
pub fn filter_stock<'a>(items: &'a [AggregatedStockItem], search: &str) -> Vec<&'a AggregatedStockItem> {
    let needle = search.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.sku.to_lowercase().contains(&needle)
                || item.name.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickedLine {
    /// Aggregated item id (`sku-color-size`).
    pub item_id: String,
    pub sku: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default)]
pub struct StockPicker {
    lines: Vec<PickedLine>,
}

impl StockPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[PickedLine] {
        &self.lines
    }

    /// Select an item (or change its quantity), clamped to `[1, available]`.
    ///
    /// Returns `false` when the item is unknown or has nothing available.
    pub fn pick(&mut self, available: &AvailableStock, item_id: &str, quantity: u32) -> bool {
        let Some(item) = available.items().iter().find(|i| i.id == item_id) else {
            return false;
        };
        if item.total_pairs == 0 {
            return false;
        }
        let quantity = quantity.clamp(1, item.total_pairs);

        match self.lines.iter_mut().find(|l| l.item_id == item_id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(PickedLine {
                item_id: item.id.clone(),
                sku: item.sku.clone(),
                name: item.name.clone(),
                size: item.size.clone(),
                color: item.color.clone(),
                quantity,
            }),
        }
        true
    }

    pub fn remove(&mut self, item_id: &str) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    /// Re-clamp every selection against a fresh view, dropping sold-out items.
    pub fn refresh(&mut self, available: &AvailableStock) {
        self.lines.retain_mut(|line| {
            match available.items().iter().find(|i| i.id == line.item_id) {
                Some(item) if item.total_pairs > 0 => {
                    line.quantity = line.quantity.clamp(1, item.total_pairs);
                    true
                }
                _ => false,
            }
        });
    }

    pub fn to_shipment_lines(&self) -> Vec<ShipmentLine> {
        self.lines
            .iter()
            .map(|l| ShipmentLine {
                sku: l.sku.clone(),
                name: l.name.clone(),
                size: l.size.clone(),
                color: l.color.clone(),
                quantity: l.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, name: &str, total: u32) -> AggregatedStockItem {
        AggregatedStockItem {
            id: format!("{sku}-black-40"),
            sku: sku.to_string(),
            name: name.to_string(),
            category: "sneakers".to_string(),
            size: "40".to_string(),
            color: "black".to_string(),
            total_pairs: total,
        }
    }

    #[test]
    fn search_matches_sku_or_name() {
        let items = vec![item("A-1-BLK", "Trail Runner", 3), item("B-2-WHT", "Court Classic", 3)];
        assert_eq!(filter_stock(&items, "trail").len(), 1);
        assert_eq!(filter_stock(&items, "b-2").len(), 1);
        assert_eq!(filter_stock(&items, "  ").len(), 2);
        assert!(filter_stock(&items, "boot").is_empty());
    }

    #[test]
    fn pick_clamps_to_available() {
        let available = AvailableStock::new(vec![item("A-1-BLK", "Runner", 5), item("B-2-WHT", "Court", 0)]);
        let mut picker = StockPicker::new();

        assert!(picker.pick(&available, "A-1-BLK-black-40", 9));
        assert_eq!(picker.lines()[0].quantity, 5);

        assert!(picker.pick(&available, "A-1-BLK-black-40", 0));
        assert_eq!(picker.lines()[0].quantity, 1);
        assert_eq!(picker.lines().len(), 1);

        assert!(!picker.pick(&available, "B-2-WHT-black-40", 1));
        assert!(!picker.pick(&available, "nope", 1));
    }

    #[test]
    fn refresh_uses_the_new_view() {
        let mut picker = StockPicker::new();
        picker.pick(&AvailableStock::new(vec![item("A-1-BLK", "Runner", 5), item("C-3-RED", "Mule", 2)]), "A-1-BLK-black-40", 5);
        picker.pick(&AvailableStock::new(vec![item("C-3-RED", "Mule", 2)]), "C-3-RED-black-40", 2);

        picker.refresh(&AvailableStock::new(vec![item("A-1-BLK", "Runner", 3)]));

        assert_eq!(picker.lines().len(), 1);
        assert_eq!(picker.lines()[0].quantity, 3);
        assert_eq!(picker.to_shipment_lines()[0].sku, "A-1-BLK");
    }
}
