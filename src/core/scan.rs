//! Contact scan: groups raw rows into contacts and buckets SIM contacts.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    contact::{ContactRecord, FieldRow, SimContact},
    error::{ExportError, ExportResult},
    source::ContactSource,
    types::{ContactId, FieldKind, RawContactId},
};

use super::{cancel::CancelToken, capacity::SimSpace, truncate::truncate_name};

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanTarget {
    /// Every local contact.
    AllContacts,
    /// One resolved contact.
    Contact(ContactId),
}

/// Name and number limits the scan classifies against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Alphatag budget; `0` disables truncation.
    pub max_name_len: usize,
    /// Numbers longer than this are ignored.
    pub max_number_len: usize,
}

impl From<&SimSpace> for ScanLimits {
    fn from(space: &SimSpace) -> Self {
        Self {
            max_name_len: space.max_name_len,
            max_number_len: space.max_number_len,
        }
    }
}

/// Buckets produced by one scan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Contacts to export, in scan order.
    pub accepted: Vec<SimContact>,
    /// Contacts whose number is too long for the card.
    pub ignored: Vec<SimContact>,
    /// Original names that will be truncated.
    pub truncated_names: Vec<String>,
    /// True when the source produced no result set.
    pub source_unavailable: bool,
}

impl ScanOutcome {
    /// True when nothing was accepted or ignored.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.ignored.is_empty()
    }

    /// True when the user should confirm truncations or ignored numbers.
    pub fn needs_confirmation(&self) -> bool {
        !self.truncated_names.is_empty() || !self.ignored.is_empty()
    }
}

/// Classifies contacts into scan buckets.
#[derive(Debug)]
pub struct Scanner {
    limits: ScanLimits,
    outcome: ScanOutcome,
}

impl Scanner {
    /// Empty scanner for `limits`.
    pub fn new(limits: ScanLimits) -> Self {
        Self {
            limits,
            outcome: ScanOutcome::default(),
        }
    }

    /// Adds one SIM contact per number of `record`.
    pub fn add_record(&mut self, record: &ContactRecord) {
        let name = record.display_name.as_deref().unwrap_or("").trim().to_string();
        let truncated = truncate_name(&name, self.limits.max_name_len);
        if truncated.as_deref().is_some_and(|t| !t.is_empty()) {
            self.outcome.truncated_names.push(name.clone());
        }

        debug!(
            contact_name = %name,
            numbers = record.phone_numbers.len(),
            emails = record.email_addresses.len(),
            "adding sim contacts"
        );
        for number in &record.phone_numbers {
            let number = number.trim();
            let contact = SimContact::with_truncated(name.clone(), truncated.clone(), number);
            if number.chars().count() > self.limits.max_number_len {
                self.outcome.ignored.push(contact);
            } else {
                self.outcome.accepted.push(contact);
            }
        }
    }

    /// Consumes the scanner.
    pub fn finish(self) -> ScanOutcome {
        self.outcome
    }
}

#[derive(Debug)]
struct Group {
    key: RawContactId,
    name: Option<String>,
    numbers: Vec<String>,
    emails: Vec<String>,
}

impl Group {
    fn new(key: RawContactId) -> Self {
        Self {
            key,
            name: None,
            numbers: Vec::new(),
            emails: Vec::new(),
        }
    }

    fn into_record(self) -> ContactRecord {
        ContactRecord::new(self.name, self.numbers, self.emails)
    }
}

/// Bulk scan over rows ordered by raw contact id.
///
/// `None` rows mean the source was unreadable; the scan then yields an
/// empty outcome flagged `source_unavailable`.
pub fn scan_rows(
    rows: Option<Vec<FieldRow>>,
    limits: ScanLimits,
    cancel: &CancelToken,
) -> ExportResult<ScanOutcome> {
    let Some(rows) = rows else {
        warn!("contacts query returned no result set, database is broken?");
        return Ok(ScanOutcome {
            source_unavailable: true,
            ..ScanOutcome::default()
        });
    };
    debug!(rows = rows.len(), "scanning contact rows");

    let mut scanner = Scanner::new(limits);
    let mut group: Option<Group> = None;

    for row in rows {
        if group.as_ref().is_some_and(|g| g.key != row.raw_contact_id) {
            if let Some(done) = group.take() {
                scanner.add_record(&done.into_record());
            }
        }
        if group.is_none() && cancel.is_canceled() {
            return Err(ExportError::Canceled);
        }
        let current = group.get_or_insert_with(|| Group::new(row.raw_contact_id));

        let Some(data) = row.data.filter(|d| !d.is_empty()) else {
            continue;
        };
        match row.kind {
            FieldKind::Phone => current.numbers.push(data),
            FieldKind::Email => current.emails.push(data),
            FieldKind::Name => current.name = Some(data),
            FieldKind::Other(mime) => warn!(mimetype = %mime, "unexpected mimetype"),
        }
    }

    if let Some(done) = group.take() {
        scanner.add_record(&done.into_record());
    }
    Ok(scanner.finish())
}

/// Single-contact scan.
pub fn scan_contact(record: &ContactRecord, limits: ScanLimits) -> ScanOutcome {
    let mut scanner = Scanner::new(limits);
    scanner.add_record(record);
    scanner.finish()
}

/// Loads `target` from `source` and scans it.
pub fn scan_source<S: ContactSource + ?Sized>(
    source: &mut S,
    target: ScanTarget,
    limits: ScanLimits,
    cancel: &CancelToken,
) -> ExportResult<ScanOutcome> {
    match target {
        ScanTarget::AllContacts => scan_rows(source.field_rows()?, limits, cancel),
        ScanTarget::Contact(id) => {
            let record = source
                .load_contact(id)?
                .ok_or(ExportError::ContactUnavailable(id))?;
            if cancel.is_canceled() {
                return Err(ExportError::Canceled);
            }
            Ok(scan_contact(&record, limits))
        }
    }
}
