//! Import boundary: per-row validation of parsed spreadsheet rows.
//!
//! Parsers hand over loosely-typed rows (every field optional, quantities as
//! signed integers). Validation classifies each row as [`ValidatedRow::Valid`]
//! with a strict record, or [`ValidatedRow::Invalid`] with the original row and
//! a reason. Nothing here mutates a ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pairledger_core::RecipientId;

use crate::aggregation::AvailableStock;
use crate::box_stock::BoxStockRecord;
use crate::recipient::{Recipient, resolve_recipient};
use crate::shipment::ShipmentLine;
use crate::unit::NewStockUnit;

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum RowRejection {
    #[error("missing {field}")]
    MissingField { field: String },

    #[error("quantity must be positive (got {quantity})")]
    NonPositiveQuantity { quantity: i64 },

    #[error("no stock found for {key}")]
    UnknownStock { key: String },

    #[error("insufficient stock for {key}: requested {requested}, available {available}")]
    InsufficientStock { key: String, requested: u32, available: u32 },
}

/// Outcome of validating one row. `index` is the zero-based row position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ValidatedRow<T, R> {
    Valid { index: usize, record: T },
    Invalid { index: usize, row: R, reason: RowRejection },
}

impl<T, R> ValidatedRow<T, R> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidatedRow::Valid { .. })
    }

    pub fn valid(&self) -> Option<&T> {
        match self {
            ValidatedRow::Valid { record, .. } => Some(record),
            ValidatedRow::Invalid { .. } => None,
        }
    }

    pub fn into_valid(self) -> Option<T> {
        match self {
            ValidatedRow::Valid { record, .. } => Some(record),
            ValidatedRow::Invalid { .. } => None,
        }
    }
}

/// A row that failed validation, echoed back with its position and reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow<R> {
    pub index: usize,
    pub row: R,
    pub reason: RowRejection,
}

/// Split validated rows into valid records and rejected rows, keeping row order.
pub fn partition<T, R>(rows: Vec<ValidatedRow<T, R>>) -> (Vec<T>, Vec<RejectedRow<R>>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    for row in rows {
        match row {
            ValidatedRow::Valid { record, .. } => valid.push(record),
            ValidatedRow::Invalid { index, row, reason } => rejected.push(RejectedRow { index, row, reason }),
        }
    }
    (valid, rejected)
}

/// Unit-stock import row: `{ sku, size, color, quantity }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStockRow {
    pub sku: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<i64>,
}

/// Box-stock import row: `{ sku, name, category, boxCount, pairsPerBox }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStockRow {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub box_count: Option<i64>,
    pub pairs_per_box: Option<i64>,
}

/// Outgoing import row: `{ sku, size, color, quantity, recipient?, notes? }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingRow {
    pub sku: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<i64>,
    pub recipient: Option<String>,
    pub notes: Option<String>,
}

/// A shipment line that passed validation, with its recipient binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidOutgoingRow {
    pub line: ShipmentLine,
    /// Raw recipient name from the row.
    pub recipient: String,
    /// Directory match for `recipient`, if any.
    pub recipient_id: Option<RecipientId>,
    pub notes: Option<String>,
}

fn required(value: &Option<String>, field: &str) -> Result<String, RowRejection> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(RowRejection::MissingField {
            field: field.to_string(),
        }),
    }
}

fn positive(value: Option<i64>, field: &str) -> Result<u32, RowRejection> {
    let quantity = value.ok_or_else(|| RowRejection::MissingField {
        field: field.to_string(),
    })?;
    if quantity <= 0 {
        return Err(RowRejection::NonPositiveQuantity { quantity });
    }
    Ok(u32::try_from(quantity).unwrap_or(u32::MAX))
}

fn classify<T, R>(index: usize, row: R, outcome: Result<T, RowRejection>) -> ValidatedRow<T, R> {
    match outcome {
        Ok(record) => ValidatedRow::Valid { index, record },
        Err(reason) => ValidatedRow::Invalid { index, row, reason },
    }
}

pub fn validate_unit_rows(rows: Vec<UnitStockRow>) -> Vec<ValidatedRow<NewStockUnit, UnitStockRow>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let outcome = (|| -> Result<NewStockUnit, RowRejection> {
                let sku = required(&row.sku, "sku")?;
                let size = required(&row.size, "size")?;
                let color = required(&row.color, "color")?;
                let quantity = positive(row.quantity, "quantity")?;
                Ok(NewStockUnit::new(sku, size, color, quantity))
            })();
            classify(index, row, outcome)
        })
        .collect()
}

pub fn validate_box_rows(rows: Vec<BoxStockRow>) -> Vec<ValidatedRow<BoxStockRecord, BoxStockRow>> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let outcome = (|| -> Result<BoxStockRecord, RowRejection> {
                let sku = required(&row.sku, "sku")?;
                let box_count = match row.box_count {
                    Some(n) if n < 0 => return Err(RowRejection::NonPositiveQuantity { quantity: n }),
                    Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
                    None => {
                        return Err(RowRejection::MissingField {
                            field: "boxCount".to_string(),
                        });
                    }
                };
                let pairs_per_box = positive(row.pairs_per_box, "pairsPerBox")?;
                Ok(BoxStockRecord {
                    sku,
                    name: row.name.clone().unwrap_or_default().trim().to_string(),
                    category: row.category.clone().unwrap_or_default().trim().to_string(),
                    box_count,
                    pairs_per_box,
                })
            })();
            classify(index, row, outcome)
        })
        .collect()
}

/// Validate outgoing rows against current availability.
///
/// Rows are checked in order and each valid row reserves its quantity, so a later
/// row on the same variant only sees what earlier rows left. A row naming a
/// recipient the directory does not know stays valid with `recipient_id: None`.
pub fn validate_outgoing_rows(
    rows: Vec<OutgoingRow>,
    available: &AvailableStock,
    recipients: &[Recipient],
) -> Vec<ValidatedRow<ValidOutgoingRow, OutgoingRow>> {
    let mut reserved: Vec<(String, u32)> = Vec::new();

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let outcome = (|| -> Result<ValidOutgoingRow, RowRejection> {
                let sku = required(&row.sku, "sku")?;
                let size = required(&row.size, "size")?;
                let color = required(&row.color, "color")?;
                let quantity = positive(row.quantity, "quantity")?;
                let recipient = required(&row.recipient, "recipient")?;

                let mut line = ShipmentLine::new(sku, size, color, quantity);
                let key = line.key();
                let item = available.resolve(&key).ok_or_else(|| RowRejection::UnknownStock {
                    key: key.to_string(),
                })?;

                let already = reserved
                    .iter()
                    .find(|(id, _)| *id == item.id)
                    .map(|(_, q)| *q)
                    .unwrap_or(0);
                let remaining = item.total_pairs.saturating_sub(already);
                if quantity > remaining {
                    return Err(RowRejection::InsufficientStock {
                        key: item.id.clone(),
                        requested: quantity,
                        available: remaining,
                    });
                }
                match reserved.iter_mut().find(|(id, _)| *id == item.id) {
                    Some((_, q)) => *q += quantity,
                    None => reserved.push((item.id.clone(), quantity)),
                }

                line.name = item.name.clone();
                Ok(ValidOutgoingRow {
                    line,
                    recipient_id: resolve_recipient(recipients, &recipient).map(|r| r.id),
                    recipient,
                    notes: row.notes.clone().filter(|n| !n.trim().is_empty()),
                })
            })();
            classify(index, row, outcome)
        })
        .collect()
}

/// Rows headed for one recipient, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientGroup {
    pub recipient: String,
    pub recipient_id: Option<RecipientId>,
    pub notes: String,
    pub lines: Vec<ShipmentLine>,
}

/// Group valid rows into one bucket per recipient.
///
/// Rows resolved to the same directory entry share a group; unresolved rows are
/// grouped by case-insensitive raw name. Notes of the group's rows are joined.
pub fn group_by_recipient(rows: Vec<ValidOutgoingRow>) -> Vec<RecipientGroup> {
    let mut groups: Vec<RecipientGroup> = Vec::new();
    for row in rows {
        let slot = groups.iter().position(|g| match (g.recipient_id, row.recipient_id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => g.recipient.eq_ignore_ascii_case(&row.recipient),
            _ => false,
        });
        let group = match slot {
            Some(i) => &mut groups[i],
            None => {
                groups.push(RecipientGroup {
                    recipient: row.recipient.clone(),
                    recipient_id: row.recipient_id,
                    notes: String::new(),
                    lines: Vec::new(),
                });
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };
        if let Some(notes) = row.notes {
            if !group.notes.split("; ").any(|n| n == notes) {
                if !group.notes.is_empty() {
                    group.notes.push_str("; ");
                }
                group.notes.push_str(&notes);
            }
        }
        group.lines.push(row.line);
    }
    groups
}
