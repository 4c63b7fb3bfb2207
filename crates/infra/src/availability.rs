//! Availability service: runs the aggregation engine over the current ledgers.

use tracing::{debug, warn};

use pairledger_core::Versioned;
use pairledger_inventory::{
    AggregationAnomaly, AggregationReport, AvailableStock, OutgoingDocument, ProductCatalog, StockUnitEntry,
    aggregate,
};

use crate::error::LedgerResult;
use crate::ledger_store::{LedgerKey, LedgerStore, LedgerStoreExt};

/// One aggregation run plus the document snapshot it was computed from.
#[derive(Debug, Clone)]
pub struct AvailabilitySnapshot {
    pub report: AggregationReport,
    /// Documents (and their collection version) the report subtracted.
    pub documents: Versioned<Vec<OutgoingDocument>>,
}

impl AvailabilitySnapshot {
    pub fn available(&self) -> AvailableStock {
        AvailableStock::new(self.report.items.clone())
    }
}

/// Recomputes availability from scratch on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct AvailabilityService<S, C> {
    store: S,
    catalog: C,
}

impl<S, C> AvailabilityService<S, C>
where
    S: LedgerStore,
    C: ProductCatalog,
{
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn snapshot(&self) -> LedgerResult<AvailabilitySnapshot> {
        let units = self.store.load::<StockUnitEntry>(LedgerKey::StockUnits)?;
        let documents = self.store.load::<OutgoingDocument>(LedgerKey::OutgoingDocuments)?;

        let report = aggregate(&units.data, &documents.data, &self.catalog);

        for anomaly in &report.anomalies {
            match anomaly {
                AggregationAnomaly::UnresolvedSubtraction {
                    document_number,
                    key,
                    quantity,
                } => warn!(
                    document_number = %document_number,
                    key = %key,
                    quantity,
                    "shipment line matches no stock variant; subtraction dropped"
                ),
            }
        }
        debug!(
            variants = report.items.len(),
            fuzzy_matches = report.fuzzy_matches,
            anomalies = report.anomalies.len(),
            "availability recomputed"
        );

        Ok(AvailabilitySnapshot { report, documents })
    }

    pub fn report(&self) -> LedgerResult<AggregationReport> {
        Ok(self.snapshot()?.report)
    }

    pub fn available(&self) -> LedgerResult<AvailableStock> {
        Ok(self.snapshot()?.available())
    }
}
