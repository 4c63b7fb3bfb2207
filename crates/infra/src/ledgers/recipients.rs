//! Recipient directory over the `recipients` collection.

use tracing::info;

use pairledger_core::{DomainError, RecipientId};
use pairledger_inventory::{Recipient, RecipientDraft, resolve_recipient};

use crate::error::LedgerResult;
use crate::ledger_store::{LedgerKey, LedgerStore, LedgerStoreExt};

#[derive(Debug, Clone)]
pub struct RecipientDirectory<S> {
    store: S,
}

impl<S> RecipientDirectory<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> LedgerResult<Vec<Recipient>> {
        Ok(self.store.load(LedgerKey::Recipients)?.data)
    }

    pub fn get(&self, id: RecipientId) -> LedgerResult<Recipient> {
        self.list()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found(format!("recipient {id}")).into())
    }

    pub fn resolve(&self, name: &str) -> LedgerResult<Option<Recipient>> {
        Ok(resolve_recipient(&self.list()?, name).cloned())
    }

    pub fn create(&self, draft: RecipientDraft) -> LedgerResult<Recipient> {
        let recipient = Recipient::new(RecipientId::new(), draft)?;

        let mut stored = self.store.load::<Recipient>(LedgerKey::Recipients)?;
        let expected = stored.expected();
        if stored.data.iter().any(|r| r.name.eq_ignore_ascii_case(&recipient.name)) {
            return Err(DomainError::conflict(format!("recipient '{}' already exists", recipient.name)).into());
        }
        stored.data.push(recipient.clone());
        self.store.save(LedgerKey::Recipients, &stored.data, expected)?;

        info!(recipient_id = %recipient.id, name = %recipient.name, "recipient created");
        Ok(recipient)
    }

    /// Edit a recipient. Documents already issued keep their name snapshot.
    pub fn update(&self, id: RecipientId, draft: RecipientDraft) -> LedgerResult<Recipient> {
        let mut stored = self.store.load::<Recipient>(LedgerKey::Recipients)?;
        let expected = stored.expected();

        let position = stored
            .data
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found(format!("recipient {id}")))?;
        let mut updated = stored.data[position].clone();
        updated.apply(draft)?;
        if stored
            .data
            .iter()
            .any(|r| r.id != id && r.name.eq_ignore_ascii_case(&updated.name))
        {
            return Err(DomainError::conflict(format!("recipient '{}' already exists", updated.name)).into());
        }
        stored.data[position] = updated.clone();

        self.store.save(LedgerKey::Recipients, &stored.data, expected)?;
        Ok(updated)
    }

    pub fn delete(&self, id: RecipientId) -> LedgerResult<Recipient> {
        let mut stored = self.store.load::<Recipient>(LedgerKey::Recipients)?;
        let expected = stored.expected();

        let position = stored
            .data
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found(format!("recipient {id}")))?;
        let removed = stored.data.remove(position);

        self.store.save(LedgerKey::Recipients, &stored.data, expected)?;
        Ok(removed)
    }
}
