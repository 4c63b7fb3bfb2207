//! Inventory domain module.
//!
//! Business rules for unit-level stock, box stock, outgoing shipments and the
//! reconciliation of those ledgers into a current-availability view. Everything
//! here is deterministic domain logic (no IO, no HTTP, no storage).

pub mod aggregation;
pub mod box_stock;
pub mod catalog;
pub mod events;
pub mod import;
pub mod picker;
pub mod recipient;
pub mod shipment;
pub mod sku;
pub mod unit;

pub use aggregation::{
    AggregatedStockItem, AggregationAnomaly, AggregationReport, AvailableStock, aggregate,
};
pub use box_stock::{BoxStockItem, BoxStockRecord, StockLevel, boxes_to_reduce};
pub use catalog::{EmptyCatalog, InMemoryCatalog, ProductCatalog, ProductInfo};
pub use events::{InventoryEvent, UnitsAllocated, UnitsRemoved};
pub use import::{
    BoxStockRow, OutgoingRow, RecipientGroup, RejectedRow, RowRejection, UnitStockRow, ValidOutgoingRow, ValidatedRow,
};
pub use picker::{PickedLine, StockPicker, filter_stock};
pub use recipient::{Recipient, RecipientDraft, resolve_recipient};
pub use shipment::{DocumentDraft, OutgoingDocument, OutgoingLineItem, ShipmentLine, document_number};
pub use sku::{VariantKey, base_sku, normalize_color};
pub use unit::{NewStockUnit, StockUnitEntry, UnitUpdate, allocations_by_sku};
