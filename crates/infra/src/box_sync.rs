//! Box-stock synchronizer.
//!
//! Converts pairs allocated to unit stock into box deductions on the
//! `box-stock` collection. The sync is one-way and lossy: boxes only ever go
//! down on this path, and nothing re-adds boxes when unit stock is later
//! corrected or deleted.

use tracing::{debug, info};

use pairledger_core::BoxItemId;
use pairledger_events::{EventEnvelope, EventHandler};
use pairledger_inventory::box_stock::{find_by_sku_mut, merge_records};
use pairledger_inventory::{BoxStockItem, BoxStockRecord, InventoryEvent};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger_store::{LedgerKey, LedgerStore, LedgerStoreExt, StoreError};

/// Attempts a box deduction gets against concurrent box-stock writes.
pub const SYNC_ATTEMPTS: u32 = 3;

/// What a sync did to one box-stock item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxDeduction {
    pub item_id: BoxItemId,
    pub sku: String,
    pub boxes_removed: u32,
    pub box_count: u32,
}

/// Owns writes to the `box-stock` collection.
#[derive(Debug, Clone)]
pub struct BoxStockSynchronizer<S> {
    store: S,
}

impl<S> BoxStockSynchronizer<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> LedgerResult<Vec<BoxStockItem>> {
        Ok(self.store.load(LedgerKey::BoxStock)?.data)
    }

    /// Deduct `ceil(pairs_allocated / pairs_per_box)` boxes from the item matching
    /// `sku` (case-insensitive).
    ///
    /// A SKU without a box record is not an error: `Ok(None)`, nothing written.
    /// A deduction commutes with other box writes, so a stale-version save is
    /// reloaded and reapplied up to [`SYNC_ATTEMPTS`] times.
    pub fn apply_sync(&self, sku: &str, pairs_allocated: u32) -> LedgerResult<Option<BoxDeduction>> {
        let mut attempt = 1;
        loop {
            match self.try_apply_sync(sku, pairs_allocated) {
                Err(StoreError::Concurrency { actual, .. }) if attempt < SYNC_ATTEMPTS => {
                    debug!(sku, attempt, actual, "box stock changed underneath sync; retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
                Ok(None) => {
                    debug!(sku, "no box-stock record for sku; box sync skipped");
                    return Ok(None);
                }
                Ok(Some(deduction)) => {
                    info!(
                        sku = %deduction.sku,
                        pairs_allocated,
                        boxes_removed = deduction.boxes_removed,
                        box_count = deduction.box_count,
                        attempt,
                        "box stock synchronized"
                    );
                    return Ok(Some(deduction));
                }
            }
        }
    }

    fn try_apply_sync(&self, sku: &str, pairs_allocated: u32) -> Result<Option<BoxDeduction>, StoreError> {
        let mut stored = self.store.load::<BoxStockItem>(LedgerKey::BoxStock)?;
        let expected = stored.expected();

        let Some(item) = find_by_sku_mut(&mut stored.data, sku) else {
            return Ok(None);
        };

        let boxes_removed = item.deduct_pairs(pairs_allocated);
        let deduction = BoxDeduction {
            item_id: item.id,
            sku: item.sku.clone(),
            boxes_removed,
            box_count: item.box_count,
        };

        self.store.save(LedgerKey::BoxStock, &stored.data, expected)?;
        Ok(Some(deduction))
    }

    /// Merge imported box-stock records (see [`merge_records`]).
    pub fn import_records(&self, records: Vec<BoxStockRecord>) -> LedgerResult<Vec<BoxStockItem>> {
        let mut stored = self.store.load::<BoxStockItem>(LedgerKey::BoxStock)?;
        let expected = stored.expected();

        let touched = merge_records(&mut stored.data, records, BoxItemId::new)?;
        self.store.save(LedgerKey::BoxStock, &stored.data, expected)?;

        info!(merged = touched.len(), "box stock imported");
        Ok(stored
            .data
            .into_iter()
            .filter(|item| touched.contains(&item.id))
            .collect())
    }
}

impl<S> EventHandler<InventoryEvent> for BoxStockSynchronizer<S>
where
    S: LedgerStore,
{
    type Error = LedgerError;

    /// `UnitsAllocated` deducts boxes. `UnitsRemoved` is deliberately ignored:
    /// deleting a unit entry does not give back the boxes its creation took.
    fn handle(&self, envelope: &EventEnvelope<InventoryEvent>) -> Result<(), Self::Error> {
        match envelope.payload() {
            InventoryEvent::UnitsAllocated(e) => {
                self.apply_sync(&e.sku, e.net_quantity)?;
            }
            InventoryEvent::UnitsRemoved(e) => {
                debug!(sku = %e.sku, quantity = e.quantity, "unit removal does not restore boxes");
            }
        }
        Ok(())
    }
}
