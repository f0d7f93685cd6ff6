//! In-memory contacts source.

use hashbrown::HashMap;

use crate::{
    contact::{ContactRecord, FieldRow},
    types::ContactId,
};

use super::{ContactSource, SourceResult};

/// Contacts source over rows and records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactSource {
    rows: Option<Vec<FieldRow>>,
    contacts: HashMap<ContactId, ContactRecord>,
}

impl MemoryContactSource {
    /// Source returning `rows` for bulk scans.
    pub fn from_rows(rows: Vec<FieldRow>) -> Self {
        Self {
            rows: Some(rows),
            contacts: HashMap::new(),
        }
    }

    /// Source whose bulk query yields no result set.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Registers a resolved contact for single-contact loads.
    pub fn with_contact(mut self, id: ContactId, record: ContactRecord) -> Self {
        self.contacts.insert(id, record);
        self
    }
}

impl ContactSource for MemoryContactSource {
    fn field_rows(&mut self) -> SourceResult<Option<Vec<FieldRow>>> {
        Ok(self.rows.clone().map(|mut rows| {
            rows.sort_by_key(|row| row.raw_contact_id);
            rows
        }))
    }

    fn load_contact(&mut self, id: ContactId) -> SourceResult<Option<ContactRecord>> {
        Ok(self.contacts.get(&id).cloned())
    }
}
