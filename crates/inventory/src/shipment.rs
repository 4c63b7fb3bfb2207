//! Outgoing shipment documents: subtractive stock events, one per delivery.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pairledger_core::{DocumentId, DomainError, DomainResult, Entity, RecipientId};

use crate::sku::{VariantKey, normalize_color};

/// Human-readable document number: `PREFIX-YYYYMMDD-NNNN`.
///
/// Uniqueness is expected, not enforced; two documents created on the same day
/// can draw the same suffix.
pub fn document_number(prefix: &str, date: NaiveDate, suffix: u16) -> String {
    format!("{prefix}-{}-{:04}", date.format("%Y%m%d"), suffix % 10_000)
}

/// One requested line of a shipment, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentLine {
    pub sku: String,
    #[serde(default)]
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl ShipmentLine {
    pub fn new(sku: impl Into<String>, size: impl Into<String>, color: impl Into<String>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            name: String::new(),
            size: size.into(),
            color: color.into(),
            quantity,
        }
    }

    pub fn key(&self) -> VariantKey {
        VariantKey::new(self.sku.trim(), &self.color, &self.size)
    }

    fn validate(&self, index: usize) -> DomainResult<()> {
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation(format!("line {}: sku cannot be empty", index + 1)));
        }
        if self.size.trim().is_empty() {
            return Err(DomainError::validation(format!("line {}: size cannot be empty", index + 1)));
        }
        if self.color.trim().is_empty() {
            return Err(DomainError::validation(format!("line {}: color cannot be empty", index + 1)));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation(format!("line {}: quantity must be positive", index + 1)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingLineItem {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

impl OutgoingLineItem {
    /// Normalized copy of a requested line: SKU trimmed, color lower-cased.
    pub fn from_line(line: ShipmentLine) -> Self {
        Self {
            id: Uuid::now_v7(),
            sku: line.sku.trim().to_string(),
            name: line.name,
            size: line.size,
            color: normalize_color(&line.color),
            quantity: line.quantity,
        }
    }

    pub fn key(&self) -> VariantKey {
        VariantKey::new(&self.sku, &self.color, &self.size)
    }
}

/// An immutable record of one delivery to one recipient.
///
/// `recipient` is a snapshot of the name at creation time; later edits to the
/// recipient directory never reach existing documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingDocument {
    pub id: DocumentId,
    pub document_number: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<RecipientId>,
    pub recipient: String,
    #[serde(default)]
    pub notes: String,
    pub items: Vec<OutgoingLineItem>,
    pub total_items: u32,
}

impl Entity for OutgoingDocument {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Everything needed to build a document except generated identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    #[serde(default)]
    pub recipient_id: Option<RecipientId>,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub notes: String,
    pub lines: Vec<ShipmentLine>,
}

impl DocumentDraft {
    /// Checks that do not depend on stock: lines present and well-formed, recipient named.
    pub fn validate(&self) -> DomainResult<()> {
        if self.lines.is_empty() {
            return Err(DomainError::validation("a document needs at least one line item"));
        }
        if self.recipient.trim().is_empty() {
            return Err(DomainError::validation("recipient cannot be empty"));
        }
        for (index, line) in self.lines.iter().enumerate() {
            line.validate(index)?;
        }
        Ok(())
    }
}

impl OutgoingDocument {
    pub fn create(
        id: DocumentId,
        document_number: String,
        draft: DocumentDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        draft.validate()?;

        let items: Vec<OutgoingLineItem> = draft.lines.into_iter().map(OutgoingLineItem::from_line).collect();
        let total_items = items.iter().map(|i| i.quantity).fold(0u32, u32::saturating_add);
        let time = now.time();

        Ok(Self {
            id,
            document_number,
            date: now.date_naive(),
            time: time.with_nanosecond(0).unwrap_or(time),
            recipient_id: draft.recipient_id,
            recipient: draft.recipient.trim().to_string(),
            notes: draft.notes,
            items,
            total_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(lines: Vec<ShipmentLine>) -> DocumentDraft {
        DocumentDraft {
            recipient_id: None,
            recipient: " Harbour Footwear ".to_string(),
            notes: String::new(),
            lines,
        }
    }

    #[test]
    fn document_number_is_prefix_date_suffix() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(document_number("OUT", date, 42), "OUT-20240307-0042");
        assert_eq!(document_number("OUT", date, 9876), "OUT-20240307-9876");
    }

    #[test]
    fn create_normalizes_lines_and_totals() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
        let doc = OutgoingDocument::create(
            DocumentId::new(),
            "OUT-20240307-0001".to_string(),
            draft(vec![
                ShipmentLine::new(" A-1-BLK ", "40", "Red", 5),
                ShipmentLine::new("A-1-BLK", "41", "RED", 2),
            ]),
            now,
        )
        .unwrap();

        assert_eq!(doc.items[0].sku, "A-1-BLK");
        assert_eq!(doc.items[0].color, "red");
        assert_eq!(doc.items[1].color, "red");
        assert_eq!(doc.total_items, 7);
        assert_eq!(doc.recipient, "Harbour Footwear");
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(doc.time, NaiveTime::from_hms_opt(14, 5, 9).unwrap());
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = OutgoingDocument::create(DocumentId::new(), "N".to_string(), draft(vec![]), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn missing_recipient_is_rejected() {
        let mut d = draft(vec![ShipmentLine::new("A", "40", "red", 1)]);
        d.recipient = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let d = draft(vec![ShipmentLine::new("A", "40", "red", 0)]);
        let err = d.validate().unwrap_err();
        assert_eq!(err, DomainError::validation("line 1: quantity must be positive"));
    }
}
