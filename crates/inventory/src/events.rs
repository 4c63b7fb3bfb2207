//! Domain events emitted by the stock-unit ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pairledger_core::UnitId;
use pairledger_events::Event;

/// Pairs of `sku` were allocated to unit stock (added, or edited by `net_quantity`).
///
/// Consumed by the box-stock synchronizer, which turns it into a box deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsAllocated {
    pub sku: String,
    pub net_quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// A unit entry was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsRemoved {
    pub unit_id: UnitId,
    pub sku: String,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    UnitsAllocated(UnitsAllocated),
    UnitsRemoved(UnitsRemoved),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::UnitsAllocated(_) => "inventory.units.allocated",
            InventoryEvent::UnitsRemoved(_) => "inventory.units.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::UnitsAllocated(e) => e.occurred_at,
            InventoryEvent::UnitsRemoved(e) => e.occurred_at,
        }
    }
}
