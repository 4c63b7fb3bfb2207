use thiserror::Error;

use pairledger_core::DomainError;

use crate::ledger_store::StoreError;

/// Failure of a ledger operation: either the domain said no, or the store did.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            LedgerError::Store(StoreError::Concurrency { .. }) | LedgerError::Domain(DomainError::Conflict(_))
        )
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
