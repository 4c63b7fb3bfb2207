//! Stock-unit ledger: additive unit-level stock, persisted as one collection.

use chrono::{DateTime, Utc};
use tracing::info;

use pairledger_core::{DomainError, UnitId};
use pairledger_inventory::{
    InventoryEvent, NewStockUnit, StockUnitEntry, UnitUpdate, UnitsAllocated, UnitsRemoved,
    allocations_by_sku,
};

use crate::error::LedgerResult;
use crate::ledger_store::{LedgerKey, LedgerStore, LedgerStoreExt};

/// Result of [`StockUnitLedger::add_units`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitsAdded {
    pub entries: Vec<StockUnitEntry>,
    /// One `UnitsAllocated` per distinct SKU in the batch.
    pub events: Vec<InventoryEvent>,
}

/// Result of [`StockUnitLedger::update_unit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitUpdated {
    pub entry: StockUnitEntry,
    /// `new.quantity - old.quantity`.
    pub quantity_difference: i64,
    pub events: Vec<InventoryEvent>,
}

/// Result of [`StockUnitLedger::delete_unit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDeleted {
    pub entry: StockUnitEntry,
    pub events: Vec<InventoryEvent>,
}

/// Owns the `stock-units` collection.
///
/// Mutations return the events they imply instead of touching other ledgers;
/// the caller decides who consumes them.
#[derive(Debug, Clone)]
pub struct StockUnitLedger<S> {
    store: S,
}

impl<S> StockUnitLedger<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> LedgerResult<Vec<StockUnitEntry>> {
        Ok(self.store.load(LedgerKey::StockUnits)?.data)
    }

    pub fn get(&self, id: UnitId) -> LedgerResult<StockUnitEntry> {
        self.list()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| DomainError::not_found(format!("stock unit {id}")).into())
    }

    /// Append a batch of unit entries.
    ///
    /// Every entry is validated before anything is written; one bad entry rejects
    /// the batch. `actor` becomes `addedBy` for entries that do not name one.
    pub fn add_units(
        &self,
        batch: Vec<NewStockUnit>,
        actor: Option<&str>,
        now: DateTime<Utc>,
    ) -> LedgerResult<UnitsAdded> {
        if batch.is_empty() {
            return Err(DomainError::validation("no stock units to add").into());
        }

        let entries = batch
            .into_iter()
            .map(|mut new| {
                if new.added_by.is_none() {
                    new.added_by = actor.map(str::to_string);
                }
                StockUnitEntry::from_new(UnitId::new(), new, now)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut stored = self.store.load::<StockUnitEntry>(LedgerKey::StockUnits)?;
        let expected = stored.expected();
        stored.data.extend(entries.iter().cloned());
        self.store.save(LedgerKey::StockUnits, &stored.data, expected)?;

        let events = allocations_by_sku(&entries)
            .into_iter()
            .filter(|(_, quantity)| *quantity > 0)
            .map(|(sku, net_quantity)| {
                InventoryEvent::UnitsAllocated(UnitsAllocated {
                    sku,
                    net_quantity,
                    occurred_at: now,
                })
            })
            .collect();

        info!(added = entries.len(), "stock units added");
        Ok(UnitsAdded { entries, events })
    }

    /// Edit one entry in place.
    ///
    /// Any non-zero quantity change, up or down, is reported as an allocation of
    /// `abs(difference)` pairs; the box-stock synchronizer therefore deducts boxes
    /// for corrections in both directions.
    pub fn update_unit(
        &self,
        update: UnitUpdate,
        actor: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<UnitUpdated> {
        let mut stored = self.store.load::<StockUnitEntry>(LedgerKey::StockUnits)?;
        let expected = stored.expected();

        let id = update.id;
        let entry = stored
            .data
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DomainError::not_found(format!("stock unit {id}")))?;

        let mut edited = entry.clone();
        let quantity_difference = edited.apply_update(update, actor, now)?;
        *entry = edited.clone();

        self.store.save(LedgerKey::StockUnits, &stored.data, expected)?;

        let mut events = Vec::new();
        if quantity_difference != 0 {
            events.push(InventoryEvent::UnitsAllocated(UnitsAllocated {
                sku: edited.sku.clone(),
                net_quantity: u32::try_from(quantity_difference.unsigned_abs()).unwrap_or(u32::MAX),
                occurred_at: now,
            }));
        }

        info!(unit_id = %id, sku = %edited.sku, quantity_difference, "stock unit updated");
        Ok(UnitUpdated {
            entry: edited,
            quantity_difference,
            events,
        })
    }

    pub fn delete_unit(&self, id: UnitId, now: DateTime<Utc>) -> LedgerResult<UnitDeleted> {
        let mut stored = self.store.load::<StockUnitEntry>(LedgerKey::StockUnits)?;
        let expected = stored.expected();

        let position = stored
            .data
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| DomainError::not_found(format!("stock unit {id}")))?;
        let entry = stored.data.remove(position);

        self.store.save(LedgerKey::StockUnits, &stored.data, expected)?;

        info!(unit_id = %id, sku = %entry.sku, quantity = entry.quantity, "stock unit deleted");
        let events = vec![InventoryEvent::UnitsRemoved(UnitsRemoved {
            unit_id: id,
            sku: entry.sku.clone(),
            quantity: entry.quantity,
            occurred_at: now,
        })];
        Ok(UnitDeleted { entry, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::ledger_store::InMemoryLedgerStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn ledger() -> StockUnitLedger<Arc<InMemoryLedgerStore>> {
        StockUnitLedger::new(Arc::new(InMemoryLedgerStore::new()))
    }

    fn allocated(events: &[InventoryEvent]) -> Vec<(String, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                InventoryEvent::UnitsAllocated(a) => Some((a.sku.clone(), a.net_quantity)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn add_units_emits_one_allocation_per_sku() {
        let ledger = ledger();
        let added = ledger
            .add_units(
                vec![
                    NewStockUnit::new("SKU-1", "40", "Black", 4),
                    NewStockUnit::new("SKU-1", "41", "Black", 6),
                    NewStockUnit::new("SKU-2", "40", "Red", 2),
                ],
                Some("dana"),
                t(9),
            )
            .unwrap();

        assert_eq!(added.entries.len(), 3);
        assert!(added.entries.iter().all(|e| e.added_by.as_deref() == Some("dana")));
        assert_eq!(
            allocated(&added.events),
            vec![("SKU-1".to_string(), 10), ("SKU-2".to_string(), 2)]
        );
        assert_eq!(ledger.list().unwrap().len(), 3);
    }

    #[test]
    fn add_units_rejects_batch_with_invalid_entry() {
        let ledger = ledger();
        let err = ledger
            .add_units(
                vec![NewStockUnit::new("SKU-1", "40", "Black", 4), NewStockUnit::new("", "40", "Black", 1)],
                None,
                t(9),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::Validation(_))));
        assert!(ledger.list().unwrap().is_empty());
    }

    #[test]
    fn update_reports_abs_difference_in_both_directions() {
        let ledger = ledger();
        let added = ledger.add_units(vec![NewStockUnit::new("SKU-1", "40", "Black", 10)], None, t(9)).unwrap();
        let id = added.entries[0].id;

        let edit = |quantity| UnitUpdate {
            id,
            sku: None,
            size: "40".to_string(),
            color: "Black".to_string(),
            quantity,
            box_id: None,
            manufacture_date: None,
        };

        let down = ledger.update_unit(edit(7), "lee", t(10)).unwrap();
        assert_eq!(down.quantity_difference, -3);
        assert_eq!(allocated(&down.events), vec![("SKU-1".to_string(), 3)]);
        assert_eq!(down.entry.date_added, t(9));
        assert_eq!(down.entry.modified_by.as_deref(), Some("lee"));

        let up = ledger.update_unit(edit(12), "lee", t(11)).unwrap();
        assert_eq!(up.quantity_difference, 5);
        assert_eq!(allocated(&up.events), vec![("SKU-1".to_string(), 5)]);

        let same = ledger.update_unit(edit(12), "lee", t(12)).unwrap();
        assert!(same.events.is_empty());

        assert_eq!(ledger.get(id).unwrap().quantity, 12);
    }

    #[test]
    fn update_of_unknown_id_is_not_found_and_writes_nothing() {
        let ledger = ledger();
        ledger.add_units(vec![NewStockUnit::new("SKU-1", "40", "Black", 10)], None, t(9)).unwrap();
        let before = ledger.list().unwrap();

        let err = ledger
            .update_unit(
                UnitUpdate {
                    id: UnitId::new(),
                    sku: None,
                    size: "40".to_string(),
                    color: "Black".to_string(),
                    quantity: 1,
                    box_id: None,
                    manufacture_date: None,
                },
                "lee",
                t(10),
            )
            .unwrap_err();

        assert!(matches!(err, LedgerError::Domain(DomainError::NotFound(_))));
        assert_eq!(ledger.list().unwrap(), before);
    }

    #[test]
    fn delete_removes_entry_and_reports_removal() {
        let ledger = ledger();
        let added = ledger.add_units(vec![NewStockUnit::new("SKU-1", "40", "Black", 10)], None, t(9)).unwrap();
        let id = added.entries[0].id;

        let deleted = ledger.delete_unit(id, t(10)).unwrap();
        assert_eq!(deleted.entry.id, id);
        assert!(matches!(deleted.events[0], InventoryEvent::UnitsRemoved(_)));
        assert!(ledger.list().unwrap().is_empty());

        assert!(ledger.delete_unit(id, t(11)).is_err());
    }
}
