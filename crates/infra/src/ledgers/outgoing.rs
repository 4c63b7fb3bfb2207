//! Outgoing-shipment ledger over the `outgoing-documents` collection.
//!
//! Documents are append-only: created, listed, looked up, never edited.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use tracing::info;

use pairledger_core::{DocumentId, DomainError};
use pairledger_inventory::import::RecipientGroup;
use pairledger_inventory::{DocumentDraft, OutgoingDocument, ProductCatalog, document_number};

use crate::availability::AvailabilityService;
use crate::error::LedgerResult;
use crate::ledger_store::{LedgerKey, LedgerStore, LedgerStoreExt};

/// Default prefix of generated document numbers.
pub const DEFAULT_DOCUMENT_PREFIX: &str = "OUT";

/// Redraws allowed when a generated number is already taken.
const NUMBER_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct OutgoingLedger<S, C> {
    store: S,
    availability: AvailabilityService<S, C>,
    prefix: String,
}

impl<S, C> OutgoingLedger<S, C>
where
    S: LedgerStore + Clone,
    C: ProductCatalog,
{
    pub fn new(store: S, catalog: C) -> Self {
        Self {
            availability: AvailabilityService::new(store.clone(), catalog),
            store,
            prefix: DEFAULT_DOCUMENT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// All documents, newest first.
    pub fn list(&self) -> LedgerResult<Vec<OutgoingDocument>> {
        Ok(self.store.load(LedgerKey::OutgoingDocuments)?.data)
    }

    pub fn get(&self, id: DocumentId) -> LedgerResult<OutgoingDocument> {
        self.list()?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| DomainError::not_found(format!("document {id}")).into())
    }

    pub fn find_by_number(&self, number: &str) -> LedgerResult<OutgoingDocument> {
        self.list()?
            .into_iter()
            .find(|d| d.document_number.eq_ignore_ascii_case(number.trim()))
            .ok_or_else(|| DomainError::not_found(format!("document {number}")).into())
    }

    /// Create one document after checking every line against current availability.
    ///
    /// All-or-nothing: if any line asks for more than is available, nothing is
    /// written. The availability check and the append use the same document
    /// snapshot, so a concurrent shipment surfaces as a conflict instead of an
    /// oversold variant.
    pub fn create_document(&self, mut draft: DocumentDraft, now: DateTime<Utc>) -> LedgerResult<OutgoingDocument> {
        draft.validate()?;

        let snapshot = self.availability.snapshot()?;
        let available = snapshot.available();
        available.ensure_sufficient(&draft.lines)?;

        for line in &mut draft.lines {
            if line.name.trim().is_empty() {
                if let Some(item) = available.resolve(&line.key()) {
                    line.name = item.name.clone();
                }
            }
        }

        let mut documents = snapshot.documents;
        let expected = documents.expected();
        let number = self.next_number(now.date_naive(), &documents.data);
        let document = OutgoingDocument::create(DocumentId::new(), number, draft, now)?;

        documents.data.insert(0, document.clone());
        self.store.save(LedgerKey::OutgoingDocuments, &documents.data, expected)?;

        info!(
            document_number = %document.document_number,
            recipient = %document.recipient,
            total_items = document.total_items,
            "outgoing document created"
        );
        Ok(document)
    }

    /// Create one document per recipient group from pre-validated import rows.
    ///
    /// Stock sufficiency is not re-checked here; the rows were validated against
    /// availability upstream. All documents are written in one save.
    pub fn create_documents_from_batch(
        &self,
        groups: Vec<RecipientGroup>,
        now: DateTime<Utc>,
    ) -> LedgerResult<Vec<OutgoingDocument>> {
        if groups.is_empty() {
            return Err(DomainError::validation("no rows to ship").into());
        }

        let mut stored = self.store.load::<OutgoingDocument>(LedgerKey::OutgoingDocuments)?;
        let expected = stored.expected();

        let mut created = Vec::with_capacity(groups.len());
        for group in groups {
            let draft = DocumentDraft {
                recipient_id: group.recipient_id,
                recipient: group.recipient,
                notes: group.notes,
                lines: group.lines,
            };
            let number = self.next_number(now.date_naive(), &stored.data);
            let document = OutgoingDocument::create(DocumentId::new(), number, draft, now)?;
            stored.data.insert(0, document.clone());
            created.push(document);
        }

        self.store.save(LedgerKey::OutgoingDocuments, &stored.data, expected)?;

        info!(documents = created.len(), "outgoing documents created from batch");
        Ok(created)
    }

    fn next_number(&self, date: NaiveDate, existing: &[OutgoingDocument]) -> String {
        let mut rng = rand::thread_rng();
        let mut number = document_number(&self.prefix, date, rng.gen_range(1000..10_000));
        for _ in 1..NUMBER_ATTEMPTS {
            if !existing.iter().any(|d| d.document_number == number) {
                break;
            }
            number = document_number(&self.prefix, date, rng.gen_range(1000..10_000));
        }
        number
    }
}
