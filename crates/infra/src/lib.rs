//! Infrastructure layer: ledger persistence, ledger services, and the warehouse facade.

pub mod availability;
pub mod box_sync;
pub mod catalog;
pub mod error;
pub mod import;
pub mod ledger_store;
pub mod ledgers;
pub mod warehouse;

pub use availability::{AvailabilityService, AvailabilitySnapshot};
pub use box_sync::{BoxDeduction, BoxStockSynchronizer, SYNC_ATTEMPTS};
pub use catalog::SharedCatalog;
pub use error::{LedgerError, LedgerResult};
pub use import::ImportOutcome;
pub use ledger_store::{InMemoryLedgerStore, JsonFileLedgerStore, LedgerKey, LedgerStore, LedgerStoreExt, StoreError};
pub use ledgers::{OutgoingLedger, RecipientDirectory, StockUnitLedger};
pub use warehouse::{SharedStore, StockSummary, Warehouse};
