//! Ledger services: one per persisted collection.

pub mod outgoing;
pub mod recipients;
pub mod stock_units;

pub use outgoing::{DEFAULT_DOCUMENT_PREFIX, OutgoingLedger};
pub use recipients::RecipientDirectory;
pub use stock_units::{StockUnitLedger, UnitDeleted, UnitUpdated, UnitsAdded};
