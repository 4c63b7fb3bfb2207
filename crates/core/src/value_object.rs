//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// In this workspace the composite variant key (`sku-color-size`) is the main value
/// object: two keys built at different times from the same normalized parts are the
/// same key, regardless of where they came from.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Pairs(u32);
///
/// impl ValueObject for Pairs {}
///
/// assert_eq!(Pairs(6), Pairs(6));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
