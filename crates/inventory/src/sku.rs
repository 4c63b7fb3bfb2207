//! SKU and variant-key normalization.
//!
//! Unit entries and shipment lines are keyed independently, at different times,
//! from user-typed or imported strings. The rules here are the single place both
//! ledgers agree on what "the same variant" means.

use serde::{Deserialize, Serialize};

use pairledger_core::ValueObject;

/// Number of hyphen-separated segments forming the base SKU.
const BASE_SKU_SEGMENTS: usize = 3;

/// Lower-cases a color for cross-ledger comparison.
pub fn normalize_color(color: &str) -> String {
    color.to_lowercase()
}

/// The first three hyphen-separated segments of `sku`, lower-cased.
///
/// SKUs with fewer segments are returned whole. `"SKU-1-BLK-EXTRA"` and
/// `"sku-1-blk"` share the base `"sku-1-blk"`.
pub fn base_sku(sku: &str) -> String {
    sku.trim()
        .split('-')
        .take(BASE_SKU_SEGMENTS)
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Case-insensitive SKU equality (used for box-stock lookups).
pub fn same_sku(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Composite `(sku, color, size)` key of one stock variant.
///
/// Color is stored normalized; SKU and size are kept exactly as given, so two
/// keys only compare equal when SKU and size match byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    sku: String,
    color: String,
    size: String,
}

impl ValueObject for VariantKey {}

impl VariantKey {
    pub fn new(sku: &str, color: &str, size: &str) -> Self {
        Self {
            sku: sku.to_string(),
            color: normalize_color(color),
            size: size.to_string(),
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn base_sku(&self) -> String {
        base_sku(&self.sku)
    }

    /// Looser match used when the exact key is missing: same base SKU
    /// (case-insensitive), same size (exact), same color (case-insensitive).
    pub fn loosely_matches(&self, other: &VariantKey) -> bool {
        self.size == other.size
            && self.color == other.color
            && self.base_sku() == other.base_sku()
    }
}

impl core::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}-{}", self.sku, self.color, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_sku_keeps_three_segments() {
        assert_eq!(base_sku("SKU-1-BLK-EXTRA"), "sku-1-blk");
        assert_eq!(base_sku("SKU-1-BLK"), "sku-1-blk");
        assert_eq!(base_sku("A-1"), "a-1");
        assert_eq!(base_sku(""), "");
    }

    #[test]
    fn key_lowercases_color_only() {
        let key = VariantKey::new("A-1-BLK", "Red", "40");
        assert_eq!(key.to_string(), "A-1-BLK-red-40");
        assert_eq!(key, VariantKey::new("A-1-BLK", "RED", "40"));
        assert_ne!(key, VariantKey::new("a-1-blk", "red", "40"));
    }

    #[test]
    fn size_must_match_exactly_for_loose_match() {
        let stored = VariantKey::new("SKU-1-BLK", "Black", "40");
        assert!(VariantKey::new("SKU-1-BLK-EXTRA", "black", "40").loosely_matches(&stored));
        assert!(!VariantKey::new("SKU-1-BLK-EXTRA", "black", "40 ").loosely_matches(&stored));
        assert!(!VariantKey::new("SKU-2-BLK", "black", "40").loosely_matches(&stored));
    }

    #[test]
    fn same_sku_ignores_case_and_padding() {
        assert!(same_sku(" sku-1 ", "SKU-1"));
        assert!(!same_sku("SKU-1", "SKU-10"));
    }
}
