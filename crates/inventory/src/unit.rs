//! Stock-unit ledger records: additive, unit-level stock events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use pairledger_core::{BoxItemId, DomainError, DomainResult, Entity, UnitId};

use crate::sku::{VariantKey, same_sku};

/// Actor recorded when a caller does not say who added a unit.
pub const DEFAULT_ACTOR: &str = "system";

/// One addition of `quantity` pairs of a `(sku, size, color)` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUnitEntry {
    pub id: UnitId,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_id: Option<BoxItemId>,
    pub date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<NaiveDate>,
}

impl Entity for StockUnitEntry {
    type Id = UnitId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl StockUnitEntry {
    pub fn key(&self) -> VariantKey {
        VariantKey::new(&self.sku, &self.color, &self.size)
    }

    /// Materialize a new entry, filling `dateAdded` / `addedBy` defaults.
    pub fn from_new(id: UnitId, new: NewStockUnit, now: DateTime<Utc>) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id,
            sku: new.sku.trim().to_string(),
            size: new.size,
            color: new.color,
            quantity: new.quantity,
            box_id: new.box_id,
            date_added: new.date_added.unwrap_or(now),
            added_by: Some(new.added_by.unwrap_or_else(|| DEFAULT_ACTOR.to_string())),
            last_modified: None,
            modified_by: None,
            manufacture_date: new.manufacture_date,
        })
    }

    /// Apply an edit, returning the signed quantity difference (`new - old`).
    ///
    /// `dateAdded` is first-creation history and is never taken from the update.
    pub fn apply_update(
        &mut self,
        update: UnitUpdate,
        actor: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<i64> {
        if update.id != self.id {
            return Err(DomainError::invariant("unit id mismatch"));
        }
        if update.size.trim().is_empty() {
            return Err(DomainError::validation("size cannot be empty"));
        }
        if update.color.trim().is_empty() {
            return Err(DomainError::validation("color cannot be empty"));
        }

        let difference = i64::from(update.quantity) - i64::from(self.quantity);

        if let Some(sku) = update.sku {
            if sku.trim().is_empty() {
                return Err(DomainError::validation("sku cannot be empty"));
            }
            self.sku = sku.trim().to_string();
        }
        self.size = update.size;
        self.color = update.color;
        self.quantity = update.quantity;
        if update.box_id.is_some() {
            self.box_id = update.box_id;
        }
        if update.manufacture_date.is_some() {
            self.manufacture_date = update.manufacture_date;
        }
        self.last_modified = Some(now);
        self.modified_by = Some(actor.to_string());

        Ok(difference)
    }
}

/// Caller-supplied data for a unit addition (id and defaults are assigned by the ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockUnit {
    pub sku: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    #[serde(default)]
    pub box_id: Option<BoxItemId>,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default)]
    pub added_by: Option<String>,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
}

impl NewStockUnit {
    pub fn new(sku: impl Into<String>, size: impl Into<String>, color: impl Into<String>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            size: size.into(),
            color: color.into(),
            quantity,
            box_id: None,
            date_added: None,
            added_by: None,
            manufacture_date: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if self.size.trim().is_empty() {
            return Err(DomainError::validation("size cannot be empty"));
        }
        if self.color.trim().is_empty() {
            return Err(DomainError::validation("color cannot be empty"));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(())
    }
}

/// Edit of an existing unit entry. `sku: None` keeps the stored SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitUpdate {
    pub id: UnitId,
    #[serde(default)]
    pub sku: Option<String>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    #[serde(default)]
    pub box_id: Option<BoxItemId>,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
}

/// Sum of quantities per distinct SKU, in first-seen order.
///
/// SKUs are grouped case-insensitively; the first spelling seen is kept. A
/// multi-variant batch therefore yields one allocation per SKU, not one per entry.
pub fn allocations_by_sku(entries: &[StockUnitEntry]) -> Vec<(String, u32)> {
    let mut out: Vec<(String, u32)> = Vec::new();
    for entry in entries {
        match out.iter_mut().find(|(sku, _)| same_sku(sku, &entry.sku)) {
            Some((_, total)) => *total = total.saturating_add(entry.quantity),
            None => out.push((entry.sku.clone(), entry.quantity)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap()
    }

    fn entry(sku: &str, qty: u32) -> StockUnitEntry {
        StockUnitEntry::from_new(UnitId::new(), NewStockUnit::new(sku, "40", "Black", qty), t(1)).unwrap()
    }

    #[test]
    fn from_new_fills_defaults() {
        let e = entry(" SKU-1-BLK ", 10);
        assert_eq!(e.sku, "SKU-1-BLK");
        assert_eq!(e.date_added, t(1));
        assert_eq!(e.added_by.as_deref(), Some(DEFAULT_ACTOR));
        assert!(e.last_modified.is_none());
    }

    #[test]
    fn from_new_keeps_supplied_date_and_actor() {
        let mut new = NewStockUnit::new("SKU-1", "40", "Black", 1);
        new.date_added = Some(t(2));
        new.added_by = Some("dana".to_string());

        let e = StockUnitEntry::from_new(UnitId::new(), new, t(5)).unwrap();
        assert_eq!(e.date_added, t(2));
        assert_eq!(e.added_by.as_deref(), Some("dana"));
    }

    #[test]
    fn from_new_rejects_blank_fields() {
        let err = StockUnitEntry::from_new(UnitId::new(), NewStockUnit::new("SKU", " ", "Red", 1), t(1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = StockUnitEntry::from_new(UnitId::new(), NewStockUnit::new("SKU", "40", "Red", 0), t(1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_preserves_date_added_and_reports_difference() {
        let mut e = entry("SKU-1", 10);
        let update = UnitUpdate {
            id: e.id,
            sku: None,
            size: "41".to_string(),
            color: "Red".to_string(),
            quantity: 4,
            box_id: None,
            manufacture_date: None,
        };

        let diff = e.apply_update(update, "lee", t(9)).unwrap();
        assert_eq!(diff, -6);
        assert_eq!(e.date_added, t(1));
        assert_eq!(e.last_modified, Some(t(9)));
        assert_eq!(e.modified_by.as_deref(), Some("lee"));
        assert_eq!(e.size, "41");
    }

    #[test]
    fn update_with_foreign_id_is_rejected() {
        let mut e = entry("SKU-1", 10);
        let update = UnitUpdate {
            id: UnitId::new(),
            sku: None,
            size: "40".to_string(),
            color: "Black".to_string(),
            quantity: 1,
            box_id: None,
            manufacture_date: None,
        };
        assert!(e.apply_update(update, "lee", t(2)).is_err());
        assert_eq!(e.quantity, 10);
    }

    #[test]
    fn allocations_sum_per_sku_not_per_entry() {
        let entries = vec![entry("SKU-1", 4), entry("SKU-2", 1), entry("sku-1", 6)];
        assert_eq!(
            allocations_by_sku(&entries),
            vec![("SKU-1".to_string(), 10), ("SKU-2".to_string(), 1)]
        );
    }
}
