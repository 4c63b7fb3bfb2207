//! Shipment recipients.

use serde::{Deserialize, Serialize};

use pairledger_core::{DomainError, DomainResult, Entity, RecipientId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: RecipientId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Recipient {
    type Id = RecipientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Editable recipient fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDraft {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Recipient {
    pub fn new(id: RecipientId, draft: RecipientDraft) -> DomainResult<Self> {
        let mut recipient = Self {
            id,
            name: String::new(),
            phone: None,
            address: None,
            notes: None,
        };
        recipient.apply(draft)?;
        Ok(recipient)
    }

    pub fn apply(&mut self, draft: RecipientDraft) -> DomainResult<()> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("recipient name cannot be empty"));
        }
        self.name = name.to_string();
        self.phone = draft.phone;
        self.address = draft.address;
        self.notes = draft.notes;
        Ok(())
    }
}

/// Best-effort name lookup: exact (case-insensitive, trimmed) first, then substring.
pub fn resolve_recipient<'a>(recipients: &'a [Recipient], name: &str) -> Option<&'a Recipient> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    recipients
        .iter()
        .find(|r| r.name.trim().to_lowercase() == needle)
        .or_else(|| {
            recipients
                .iter()
                .find(|r| r.name.to_lowercase().contains(&needle))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(name: &str) -> Recipient {
        Recipient::new(
            RecipientId::new(),
            RecipientDraft {
                name: name.to_string(),
                phone: None,
                address: None,
                notes: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn exact_match_wins_over_substring() {
        let all = vec![recipient("Northside Shoes Ltd"), recipient("Northside Shoes")];
        let found = resolve_recipient(&all, "  northside shoes ").unwrap();
        assert_eq!(found.name, "Northside Shoes");
    }

    #[test]
    fn falls_back_to_substring() {
        let all = vec![recipient("Harbour Footwear Co")];
        assert!(resolve_recipient(&all, "harbour").is_some());
        assert!(resolve_recipient(&all, "market").is_none());
        assert!(resolve_recipient(&all, "   ").is_none());
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Recipient::new(
            RecipientId::new(),
            RecipientDraft {
                name: " ".to_string(),
                phone: None,
                address: None,
                notes: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
