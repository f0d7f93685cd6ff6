//! Contact records, raw field rows, and exportable SIM contacts.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::types::{FieldKind, RawContactId};

/// One raw per-field row read from the contacts data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRow {
    /// Grouping key shared by all rows of one raw contact.
    pub raw_contact_id: RawContactId,
    /// Row kind.
    pub kind: FieldKind,
    /// Field payload; `None` or empty rows are skipped.
    pub data: Option<String>,
}

impl FieldRow {
    /// Phone row shorthand.
    pub fn phone(raw_contact_id: RawContactId, number: impl Into<String>) -> Self {
        Self {
            raw_contact_id,
            kind: FieldKind::Phone,
            data: Some(number.into()),
        }
    }

    /// Email row shorthand.
    pub fn email(raw_contact_id: RawContactId, address: impl Into<String>) -> Self {
        Self {
            raw_contact_id,
            kind: FieldKind::Email,
            data: Some(address.into()),
        }
    }

    /// Name row shorthand.
    pub fn name(raw_contact_id: RawContactId, name: impl Into<String>) -> Self {
        Self {
            raw_contact_id,
            kind: FieldKind::Name,
            data: Some(name.into()),
        }
    }
}

/// Logical contact: a display name plus its unique numbers and emails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Resolved display name, if any.
    pub display_name: Option<String>,
    /// Unique phone numbers in insertion order.
    pub phone_numbers: Vec<String>,
    /// Unique email addresses in insertion order.
    pub email_addresses: Vec<String>,
}

impl ContactRecord {
    /// Builds a record, dropping exact duplicate numbers and emails.
    pub fn new(
        display_name: Option<String>,
        phone_numbers: impl IntoIterator<Item = String>,
        email_addresses: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            display_name,
            phone_numbers: dedupe_ordered(phone_numbers),
            email_addresses: dedupe_ordered(email_addresses),
        }
    }
}

/// Keeps the first occurrence of each exact string, preserving order.
pub fn dedupe_ordered(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

/// Exportable unit: one SIM entry per (contact, number) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimContact {
    /// Trimmed display name.
    pub name: String,
    /// Set only when the name exceeds the SIM tag budget.
    pub truncated_name: Option<String>,
    /// Trimmed phone number.
    pub primary_number: String,
    /// Second number slot, unused by ADN records.
    pub secondary_number: Option<String>,
}

impl SimContact {
    /// Name and number, no truncation.
    pub fn new(name: impl Into<String>, primary_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            truncated_name: None,
            primary_number: primary_number.into(),
            secondary_number: None,
        }
    }

    /// Name, the truncator result for it, and number.
    pub fn with_truncated(
        name: impl Into<String>,
        truncated_name: Option<String>,
        primary_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            truncated_name,
            primary_number: primary_number.into(),
            secondary_number: None,
        }
    }

    /// Two-number shape used by USIM phonebooks.
    pub fn with_secondary(
        name: impl Into<String>,
        primary_number: impl Into<String>,
        secondary_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            truncated_name: None,
            primary_number: primary_number.into(),
            secondary_number: Some(secondary_number.into()),
        }
    }

    /// Tag written to the SIM: truncated name, else name, else empty.
    pub fn tag(&self) -> &str {
        match self.truncated_name.as_deref() {
            Some(truncated) if !truncated.is_empty() => truncated,
            _ => &self.name,
        }
    }
}

/// Why an accepted contact did not reach the SIM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotExportedReason {
    /// The SIM reported no free entries before the write.
    SimFull,
    /// The backend returned no identifier or failed the insert.
    WriteFailed,
}

/// Accepted contact that failed during export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotExported {
    /// The contact that was not written.
    pub contact: SimContact,
    /// Failure cause.
    pub reason: NotExportedReason,
}
