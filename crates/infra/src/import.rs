//! Result shape shared by the batch import operations.

use serde::Serialize;

use pairledger_inventory::RejectedRow;

/// What a batch import wrote, and which rows it refused.
///
/// Rejected rows never touch a ledger. When every row is rejected nothing is
/// written at all and `created` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome<T, R> {
    pub created: Vec<T>,
    pub rejected: Vec<RejectedRow<R>>,
}

impl<T, R> ImportOutcome<T, R> {
    pub fn rejected_only(rejected: Vec<RejectedRow<R>>) -> Self {
        Self {
            created: Vec::new(),
            rejected,
        }
    }
}
