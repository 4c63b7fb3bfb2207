//! Warehouse facade: the operations exposed to callers, composed from the ledgers.
//!
//! Unit mutations are persisted first, then their events are handed to the
//! box-stock synchronizer in the same call and published on the bus for any
//! other subscriber. The box-stock write is a separate step: if it fails the
//! unit write stands and the failure is logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use pairledger_core::{DocumentId, DomainError, RecipientId, UnitId};
use pairledger_events::{Event, EventBus, EventEnvelope, EventHandler, InMemoryEventBus, Subscription};
use pairledger_inventory::import::{
    group_by_recipient, partition, validate_box_rows, validate_outgoing_rows, validate_unit_rows,
};
use pairledger_inventory::{
    AggregatedStockItem, BoxStockItem, BoxStockRow, DocumentDraft, InventoryEvent, NewStockUnit, OutgoingDocument,
    OutgoingRow, ProductInfo, Recipient, RecipientDraft, StockLevel, StockUnitEntry, UnitStockRow, UnitUpdate,
    filter_stock,
};

use crate::availability::AvailabilityService;
use crate::box_sync::BoxStockSynchronizer;
use crate::catalog::SharedCatalog;
use crate::error::LedgerResult;
use crate::import::ImportOutcome;
use crate::ledger_store::LedgerStore;
use crate::ledgers::{OutgoingLedger, RecipientDirectory, StockUnitLedger, UnitUpdated};

/// Store handle shared by every ledger of one warehouse.
pub type SharedStore = Arc<dyn LedgerStore>;

/// Stream name carried by unit-ledger event envelopes.
pub const STOCK_UNIT_STREAM: &str = "stock-units";

/// Totals over the availability view and the box-stock collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub variants: usize,
    pub total_pairs: u64,
    pub box_items: usize,
    pub low_stock: usize,
    pub medium_stock: usize,
    pub high_stock: usize,
}

pub struct Warehouse {
    units: StockUnitLedger<SharedStore>,
    boxes: BoxStockSynchronizer<SharedStore>,
    outgoing: OutgoingLedger<SharedStore, SharedCatalog>,
    recipients: RecipientDirectory<SharedStore>,
    availability: AvailabilityService<SharedStore, SharedCatalog>,
    catalog: SharedCatalog,
    bus: InMemoryEventBus<EventEnvelope<InventoryEvent>>,
    sequence: AtomicU64,
}

impl Warehouse {
    pub fn new(store: SharedStore, catalog: SharedCatalog) -> Self {
        Self {
            units: StockUnitLedger::new(store.clone()),
            boxes: BoxStockSynchronizer::new(store.clone()),
            outgoing: OutgoingLedger::new(store.clone(), catalog.clone()),
            recipients: RecipientDirectory::new(store.clone()),
            availability: AvailabilityService::new(store, catalog.clone()),
            catalog,
            bus: InMemoryEventBus::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn with_document_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.outgoing = self.outgoing.with_prefix(prefix);
        self
    }

    /// Receive every unit-ledger event published from now on.
    pub fn subscribe(&self) -> Subscription<EventEnvelope<InventoryEvent>> {
        self.bus.subscribe()
    }

    // -- stock units ---------------------------------------------------------

    pub fn units(&self) -> LedgerResult<Vec<StockUnitEntry>> {
        self.units.list()
    }

    pub fn unit(&self, id: UnitId) -> LedgerResult<StockUnitEntry> {
        self.units.get(id)
    }

    pub fn add_units(
        &self,
        batch: Vec<NewStockUnit>,
        actor: Option<&str>,
        now: DateTime<Utc>,
    ) -> LedgerResult<Vec<StockUnitEntry>> {
        let added = self.units.add_units(batch, actor, now)?;
        self.dispatch(added.events);
        Ok(added.entries)
    }

    pub fn update_unit(&self, update: UnitUpdate, actor: &str, now: DateTime<Utc>) -> LedgerResult<UnitUpdated> {
        let updated = self.units.update_unit(update, actor, now)?;
        self.dispatch(updated.events.clone());
        Ok(updated)
    }

    pub fn delete_unit(&self, id: UnitId, now: DateTime<Utc>) -> LedgerResult<StockUnitEntry> {
        let deleted = self.units.delete_unit(id, now)?;
        self.dispatch(deleted.events);
        Ok(deleted.entry)
    }

    pub fn import_units(
        &self,
        rows: Vec<UnitStockRow>,
        actor: Option<&str>,
        now: DateTime<Utc>,
    ) -> LedgerResult<ImportOutcome<StockUnitEntry, UnitStockRow>> {
        let (valid, rejected) = partition(validate_unit_rows(rows));
        if valid.is_empty() {
            info!(rejected = rejected.len(), "unit import had no valid rows");
            return Ok(ImportOutcome::rejected_only(rejected));
        }
        let created = self.add_units(valid, actor, now)?;
        Ok(ImportOutcome { created, rejected })
    }

    fn dispatch(&self, events: Vec<InventoryEvent>) {
        for event in events {
            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            let event_type = event.event_type();
            let envelope = EventEnvelope::new(Uuid::now_v7(), STOCK_UNIT_STREAM, sequence, event);

            if let Err(e) = self.boxes.handle(&envelope) {
                warn!(sequence, event_type, error = %e, "box stock synchronization failed; unit change kept");
            }
            if let Err(e) = self.bus.publish(envelope) {
                warn!(sequence, error = %e, "failed to publish inventory event");
            }
        }
    }

    // -- box stock -----------------------------------------------------------

    pub fn box_stock(&self) -> LedgerResult<Vec<BoxStockItem>> {
        self.boxes.list()
    }

    pub fn import_box_stock(&self, rows: Vec<BoxStockRow>) -> LedgerResult<ImportOutcome<BoxStockItem, BoxStockRow>> {
        let (valid, rejected) = partition(validate_box_rows(rows));
        if valid.is_empty() {
            return Ok(ImportOutcome::rejected_only(rejected));
        }
        let created = self.boxes.import_records(valid)?;
        Ok(ImportOutcome { created, rejected })
    }

    // -- availability --------------------------------------------------------

    /// Aggregated availability, optionally filtered by SKU or product name.
    pub fn stock(&self, search: Option<&str>) -> LedgerResult<Vec<AggregatedStockItem>> {
        let items = self.availability.report()?.items;
        Ok(match search {
            Some(search) => filter_stock(&items, search).into_iter().cloned().collect(),
            None => items,
        })
    }

    pub fn summary(&self) -> LedgerResult<StockSummary> {
        let items = self.availability.report()?.items;
        let boxes = self.boxes.list()?;

        let level_count = |level: StockLevel| boxes.iter().filter(|b| b.stock_level == level).count();
        Ok(StockSummary {
            variants: items.len(),
            total_pairs: items.iter().map(|i| u64::from(i.total_pairs)).sum(),
            box_items: boxes.len(),
            low_stock: level_count(StockLevel::Low),
            medium_stock: level_count(StockLevel::Medium),
            high_stock: level_count(StockLevel::High),
        })
    }

    // -- outgoing documents --------------------------------------------------

    pub fn documents(&self) -> LedgerResult<Vec<OutgoingDocument>> {
        self.outgoing.list()
    }

    pub fn document(&self, id: DocumentId) -> LedgerResult<OutgoingDocument> {
        self.outgoing.get(id)
    }

    pub fn document_by_number(&self, number: &str) -> LedgerResult<OutgoingDocument> {
        self.outgoing.find_by_number(number)
    }

    /// Create one document. A draft naming only a `recipient_id` takes the
    /// directory's current name; the name is frozen into the document.
    pub fn create_document(&self, mut draft: DocumentDraft, now: DateTime<Utc>) -> LedgerResult<OutgoingDocument> {
        if let Some(id) = draft.recipient_id {
            let recipient = self.recipients.get(id)?;
            if draft.recipient.trim().is_empty() {
                draft.recipient = recipient.name;
            }
        }
        self.outgoing.create_document(draft, now)
    }

    /// Validate outgoing rows against availability and create one document per
    /// recipient from the valid ones.
    pub fn import_outgoing(
        &self,
        rows: Vec<OutgoingRow>,
        now: DateTime<Utc>,
    ) -> LedgerResult<ImportOutcome<OutgoingDocument, OutgoingRow>> {
        let available = self.availability.available()?;
        let directory = self.recipients.list()?;

        let (valid, rejected) = partition(validate_outgoing_rows(rows, &available, &directory));
        if valid.is_empty() {
            info!(rejected = rejected.len(), "outgoing import had no valid rows");
            return Ok(ImportOutcome::rejected_only(rejected));
        }

        let mut groups = group_by_recipient(valid);
        for group in &mut groups {
            if let Some(recipient) = group
                .recipient_id
                .and_then(|id| directory.iter().find(|r| r.id == id))
            {
                group.recipient = recipient.name.clone();
            }
        }

        let created = self.outgoing.create_documents_from_batch(groups, now)?;
        Ok(ImportOutcome { created, rejected })
    }

    // -- recipients ----------------------------------------------------------

    pub fn recipients(&self) -> LedgerResult<Vec<Recipient>> {
        self.recipients.list()
    }

    pub fn recipient(&self, id: RecipientId) -> LedgerResult<Recipient> {
        self.recipients.get(id)
    }

    pub fn create_recipient(&self, draft: RecipientDraft) -> LedgerResult<Recipient> {
        self.recipients.create(draft)
    }

    pub fn update_recipient(&self, id: RecipientId, draft: RecipientDraft) -> LedgerResult<Recipient> {
        self.recipients.update(id, draft)
    }

    pub fn delete_recipient(&self, id: RecipientId) -> LedgerResult<Recipient> {
        self.recipients.delete(id)
    }

    // -- product catalogue ---------------------------------------------------

    pub fn products(&self) -> Vec<ProductInfo> {
        self.catalog.list()
    }

    pub fn upsert_product(&self, product: ProductInfo) -> LedgerResult<ProductInfo> {
        if product.sku.trim().is_empty() {
            return Err(DomainError::validation("product sku cannot be empty").into());
        }
        if product.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty").into());
        }
        self.catalog.upsert(product.clone());
        info!(sku = %product.sku, "product upserted");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::ledger_store::{InMemoryLedgerStore, LedgerKey, LedgerStoreExt};
    use pairledger_core::ExpectedVersion;
    use pairledger_inventory::{BoxStockRecord, ShipmentLine};

    fn warehouse() -> (Arc<InMemoryLedgerStore>, Warehouse) {
        let store = Arc::new(InMemoryLedgerStore::new());
        let warehouse = Warehouse::new(store.clone(), SharedCatalog::new());
        (store, warehouse)
    }

    fn draft(recipient: &str, lines: Vec<ShipmentLine>) -> DocumentDraft {
        DocumentDraft {
            recipient_id: None,
            recipient: recipient.to_string(),
            notes: String::new(),
            lines,
        }
    }

    fn pairs(warehouse: &Warehouse) -> Vec<u32> {
        warehouse.stock(None).unwrap().iter().map(|i| i.total_pairs).collect()
    }

    fn seed_boxes(store: &InMemoryLedgerStore, sku: &str, box_count: u32, pairs_per_box: u32) {
        let item = BoxStockItem::new(
            pairledger_core::BoxItemId::new(),
            BoxStockRecord {
                sku: sku.to_string(),
                name: "Runner".to_string(),
                category: "sneakers".to_string(),
                box_count,
                pairs_per_box,
            },
        )
        .unwrap();
        store.save(LedgerKey::BoxStock, &[item], ExpectedVersion::Any).unwrap();
    }

    #[test]
    fn ship_and_reject_scenario() {
        let (_store, warehouse) = warehouse();
        assert!(warehouse.stock(None).unwrap().is_empty());

        warehouse
            .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 20)], None, Utc::now())
            .unwrap();
        assert_eq!(pairs(&warehouse), vec![20]);

        warehouse
            .create_document(
                draft("Harbour Footwear", vec![ShipmentLine::new("A-1-BLK", "40", "red", 5)]),
                Utc::now(),
            )
            .unwrap();
        assert_eq!(pairs(&warehouse), vec![15]);

        let err = warehouse
            .create_document(
                draft("Harbour Footwear", vec![ShipmentLine::new("A-1-BLK", "40", "red", 16)]),
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(DomainError::InsufficientStock {
                requested: 16,
                available: 15,
                ..
            })
        ));
        assert_eq!(warehouse.documents().unwrap().len(), 1);
        assert_eq!(pairs(&warehouse), vec![15]);
    }

    #[test]
    fn fuzzy_shipment_reduces_matched_variant() {
        let (_store, warehouse) = warehouse();
        warehouse
            .add_units(vec![NewStockUnit::new("SKU-1-BLK", "40", "Black", 10)], None, Utc::now())
            .unwrap();

        warehouse
            .create_document(
                draft("Harbour Footwear", vec![ShipmentLine::new("SKU-1-BLK-EXTRA", "40", "black", 4)]),
                Utc::now(),
            )
            .unwrap();

        let stock = warehouse.stock(None).unwrap();
        assert_eq!(stock.len(), 1);
        assert_eq!(stock[0].total_pairs, 6);
    }

    #[test]
    fn adding_units_deducts_boxes() {
        let (store, warehouse) = warehouse();
        seed_boxes(&store, "A-1-BLK", 10, 6);

        warehouse
            .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 10)], Some("clerk"), Utc::now())
            .unwrap();

        let boxes = warehouse.box_stock().unwrap();
        assert_eq!(boxes[0].box_count, 8);
        assert_eq!(boxes[0].total_pairs, 48);
        assert_eq!(boxes[0].stock_level, StockLevel::Low);
    }

    #[test]
    fn unit_corrections_in_both_directions_deduct_boxes() {
        let (store, warehouse) = warehouse();
        seed_boxes(&store, "A-1-BLK", 10, 6);
        let entry = warehouse
            .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 6)], None, Utc::now())
            .unwrap()
            .remove(0);
        assert_eq!(warehouse.box_stock().unwrap()[0].box_count, 9);

        let down = UnitUpdate {
            id: entry.id,
            sku: None,
            size: entry.size.clone(),
            color: entry.color.clone(),
            quantity: 1,
            box_id: None,
            manufacture_date: None,
        };
        let updated = warehouse.update_unit(down, "clerk", Utc::now()).unwrap();
        assert_eq!(updated.quantity_difference, -5);
        assert_eq!(warehouse.box_stock().unwrap()[0].box_count, 8);
    }

    #[test]
    fn deleting_units_leaves_boxes_alone() {
        let (store, warehouse) = warehouse();
        seed_boxes(&store, "A-1-BLK", 10, 6);
        let entry = warehouse
            .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 6)], None, Utc::now())
            .unwrap()
            .remove(0);

        warehouse.delete_unit(entry.id, Utc::now()).unwrap();

        assert!(warehouse.units().unwrap().is_empty());
        assert_eq!(warehouse.box_stock().unwrap()[0].box_count, 9);
    }

    #[test]
    fn events_are_published_after_the_write() {
        let (_store, warehouse) = warehouse();
        let events = warehouse.subscribe();

        warehouse
            .add_units(
                vec![
                    NewStockUnit::new("A-1-BLK", "40", "Red", 3),
                    NewStockUnit::new("A-1-BLK", "41", "Red", 4),
                    NewStockUnit::new("B-2-WHT", "40", "White", 1),
                ],
                None,
                Utc::now(),
            )
            .unwrap();

        let first = events.try_recv().unwrap();
        assert_eq!(first.stream(), STOCK_UNIT_STREAM);
        assert_eq!(first.sequence_number(), 1);
        match first.payload() {
            InventoryEvent::UnitsAllocated(e) => {
                assert_eq!(e.sku, "A-1-BLK");
                assert_eq!(e.net_quantity, 7);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(events.try_recv().unwrap().sequence_number(), 2);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn document_keeps_recipient_name_after_directory_edit() {
        let (_store, warehouse) = warehouse();
        warehouse
            .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 20)], None, Utc::now())
            .unwrap();
        let recipient = warehouse
            .create_recipient(RecipientDraft {
                name: "Harbour Footwear".to_string(),
                phone: None,
                address: None,
                notes: None,
            })
            .unwrap();

        let document = warehouse
            .create_document(
                DocumentDraft {
                    recipient_id: Some(recipient.id),
                    recipient: String::new(),
                    notes: String::new(),
                    lines: vec![ShipmentLine::new("A-1-BLK", "40", "red", 5)],
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(document.recipient, "Harbour Footwear");

        warehouse
            .update_recipient(
                recipient.id,
                RecipientDraft {
                    name: "Harbour Shoes Ltd".to_string(),
                    phone: None,
                    address: None,
                    notes: None,
                },
            )
            .unwrap();
        warehouse.delete_recipient(recipient.id).unwrap();

        let stored = warehouse.document(document.id).unwrap();
        assert_eq!(stored, document);
        assert_eq!(pairs(&warehouse), vec![15]);
    }

    #[test]
    fn unknown_recipient_id_is_rejected() {
        let (_store, warehouse) = warehouse();
        warehouse
            .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 20)], None, Utc::now())
            .unwrap();

        let err = warehouse
            .create_document(
                DocumentDraft {
                    recipient_id: Some(RecipientId::new()),
                    recipient: String::new(),
                    notes: String::new(),
                    lines: vec![ShipmentLine::new("A-1-BLK", "40", "red", 5)],
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::NotFound(_))));
    }

    #[test]
    fn unit_import_writes_only_valid_rows() {
        let (_store, warehouse) = warehouse();
        let row = |sku: Option<&str>, quantity: i64| UnitStockRow {
            sku: sku.map(str::to_string),
            size: Some("40".to_string()),
            color: Some("Red".to_string()),
            quantity: Some(quantity),
        };

        let outcome = warehouse
            .import_units(vec![row(Some("A-1-BLK"), 4), row(None, 4), row(Some("A-1-BLK"), 0)], None, Utc::now())
            .unwrap();
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(pairs(&warehouse), vec![4]);

        let outcome = warehouse.import_units(vec![row(None, 1)], None, Utc::now()).unwrap();
        assert!(outcome.created.is_empty());
        assert_eq!(warehouse.units().unwrap().len(), 1);
    }

    #[test]
    fn outgoing_import_groups_by_recipient_and_reserves_across_rows() {
        let (_store, warehouse) = warehouse();
        warehouse
            .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 10)], None, Utc::now())
            .unwrap();
        warehouse
            .create_recipient(RecipientDraft {
                name: "Harbour Footwear".to_string(),
                phone: None,
                address: None,
                notes: None,
            })
            .unwrap();

        let row = |recipient: &str, quantity: i64| OutgoingRow {
            sku: Some("A-1-BLK".to_string()),
            size: Some("40".to_string()),
            color: Some("red".to_string()),
            quantity: Some(quantity),
            recipient: Some(recipient.to_string()),
            notes: None,
        };

        let outcome = warehouse
            .import_outgoing(
                vec![row("harbour", 4), row("Market Stall", 3), row("Harbour Footwear", 2), row("harbour", 5)],
                Utc::now(),
            )
            .unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].index, 3);
        assert_eq!(outcome.created.len(), 2);

        let harbour = outcome
            .created
            .iter()
            .find(|d| d.recipient == "Harbour Footwear")
            .unwrap();
        assert!(harbour.recipient_id.is_some());
        assert_eq!(harbour.total_items, 6);
        let market = outcome.created.iter().find(|d| d.recipient == "Market Stall").unwrap();
        assert_eq!(market.recipient_id, None);

        assert_eq!(pairs(&warehouse), vec![1]);
    }

    #[test]
    fn box_import_merges_by_sku() {
        let (_store, warehouse) = warehouse();
        let row = |sku: &str, boxes: i64| BoxStockRow {
            sku: Some(sku.to_string()),
            name: Some("Runner".to_string()),
            category: Some("sneakers".to_string()),
            box_count: Some(boxes),
            pairs_per_box: Some(12),
        };

        warehouse.import_box_stock(vec![row("A-1-BLK", 10)]).unwrap();
        let outcome = warehouse.import_box_stock(vec![row("a-1-blk", 25), row("B-2-WHT", -1)]).unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        let boxes = warehouse.box_stock().unwrap();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].box_count, 35);
        assert_eq!(boxes[0].stock_level, StockLevel::High);
    }

    #[test]
    fn ledgers_survive_reopening_a_json_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Arc::new(crate::ledger_store::JsonFileLedgerStore::open(dir.path()).unwrap());
            let warehouse = Warehouse::new(store, SharedCatalog::new());
            warehouse
                .add_units(vec![NewStockUnit::new("A-1-BLK", "40", "Red", 20)], None, Utc::now())
                .unwrap();
            warehouse
                .create_document(
                    draft("Harbour Footwear", vec![ShipmentLine::new("A-1-BLK", "40", "red", 5)]),
                    Utc::now(),
                )
                .unwrap();
        }

        let store = Arc::new(crate::ledger_store::JsonFileLedgerStore::open(dir.path()).unwrap());
        let reopened = Warehouse::new(store, SharedCatalog::new()).with_document_prefix("SHIP");
        assert_eq!(pairs(&reopened), vec![15]);
        assert_eq!(reopened.documents().unwrap().len(), 1);

        let next = reopened
            .create_document(
                draft("Harbour Footwear", vec![ShipmentLine::new("A-1-BLK", "40", "red", 1)]),
                Utc::now(),
            )
            .unwrap();
        assert!(next.document_number.starts_with("SHIP-"));
    }

    #[test]
    fn summary_and_search() {
        let (store, warehouse) = warehouse();
        seed_boxes(&store, "Z-9-RED", 40, 6);
        warehouse
            .upsert_product(ProductInfo {
                sku: "A-1-BLK".to_string(),
                name: "Trail Runner".to_string(),
                category: "sneakers".to_string(),
                sizes: vec![],
                colors: vec![],
            })
            .unwrap();
        warehouse
            .add_units(
                vec![
                    NewStockUnit::new("A-1-BLK", "40", "Red", 3),
                    NewStockUnit::new("B-2-WHT", "41", "White", 4),
                ],
                None,
                Utc::now(),
            )
            .unwrap();

        let found = warehouse.stock(Some("trail")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sku, "A-1-BLK");

        let summary = warehouse.summary().unwrap();
        assert_eq!(summary.variants, 2);
        assert_eq!(summary.total_pairs, 7);
        assert_eq!(summary.box_items, 1);
        assert_eq!(summary.high_stock, 1);
    }
}
