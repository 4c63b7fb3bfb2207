//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Ledger records (stock units, outgoing documents, box-stock items, recipients)
/// are entities: two records with the same id are the same record, whatever
/// their field values.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
