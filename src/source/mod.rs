//! Contacts data sources.

pub mod memory;
pub mod sqlite;

use thiserror::Error;

use crate::{
    contact::{ContactRecord, FieldRow},
    types::ContactId,
};

/// Contacts source failure.
#[derive(Debug, Error)]
pub enum SourceError {
    /// SQLite error from the database-backed source.
    #[error("contacts sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Any other source failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for contacts source calls.
pub type SourceResult<T> = Result<T, SourceError>;

/// Read-only access to the local address book.
pub trait ContactSource: Send {
    /// All phone, email, and name rows ordered by raw contact id.
    ///
    /// `Ok(None)` means the source produced no result set at all.
    fn field_rows(&mut self) -> SourceResult<Option<Vec<FieldRow>>>;

    /// Resolves one contact with its display name, numbers, and emails.
    fn load_contact(&mut self, id: ContactId) -> SourceResult<Option<ContactRecord>>;
}

impl<S: ContactSource + ?Sized> ContactSource for Box<S> {
    fn field_rows(&mut self) -> SourceResult<Option<Vec<FieldRow>>> {
        (**self).field_rows()
    }

    fn load_contact(&mut self, id: ContactId) -> SourceResult<Option<ContactRecord>> {
        (**self).load_contact(id)
    }
}
