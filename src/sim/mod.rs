//! SIM storage backends.
//!
//! The export pipeline talks to SIM storage only through [`SimStorage`].
//! Two backends exist: [`sqlite::SqliteSimStorage`] mirrors the generic
//! ICC provider (capacity properties, query, insert, delete by tag and
//! number) and [`records::AdnRecordStorage`] mirrors the record-oriented
//! interface (record counts and alphatag budget, no deletion path).

pub mod records;
pub mod sqlite;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SimEntryId;

/// SIM backend failure.
#[derive(Debug, Error)]
pub enum SimError {
    /// SQLite error from the generic backend.
    #[error("sim sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The backend does not support the requested operation.
    #[error("unsupported sim operation: {0}")]
    Unsupported(&'static str),
    /// Any other backend failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for SIM backend calls.
pub type SimResult<T> = Result<T, SimError>;

/// How a backend reports capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityModel {
    /// Capacity and free count; entries can be deleted to make room.
    Generic,
    /// Total and used record counts; no deletion path.
    RecordBased,
}

/// Raw SIM properties; `None` where the card did not report a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimProperties {
    /// Total entry slots.
    pub capacity: Option<usize>,
    /// Unused entry slots.
    pub free_entries: Option<usize>,
    /// Alphatag budget in storage units.
    pub max_name_len: Option<usize>,
    /// Max dial-string length.
    pub max_number_len: Option<usize>,
    /// Max email length, USIM only.
    pub max_email_len: Option<usize>,
}

/// One stored SIM entry as read back from the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimEntry {
    /// Stored alphatag.
    pub tag: String,
    /// Stored dial string.
    pub number: String,
}

/// Capability interface over SIM phonebook storage.
pub trait SimStorage: Send {
    /// Capacity reporting style of this backend.
    fn capacity_model(&self) -> CapacityModel;

    /// Reads the current SIM properties.
    fn properties(&mut self) -> SimResult<SimProperties>;

    /// Asks the backend to resynchronize its view of the card.
    fn sync(&mut self) -> SimResult<()> {
        Ok(())
    }

    /// Live free-entry count, or `None` when the backend skips live checks.
    fn live_free_entries(&mut self) -> SimResult<Option<usize>>;

    /// Lists stored entries in storage order.
    fn entries(&mut self) -> SimResult<Vec<SimEntry>>;

    /// Writes one entry; `Ok(None)` means the card refused it.
    fn insert(&mut self, tag: &str, number: &str) -> SimResult<Option<SimEntryId>>;

    /// Deletes one entry matching `tag` and `number`; returns rows affected.
    fn delete(&mut self, _tag: &str, _number: &str) -> SimResult<usize> {
        Err(SimError::Unsupported("delete"))
    }
}

impl<S: SimStorage + ?Sized> SimStorage for Box<S> {
    fn capacity_model(&self) -> CapacityModel {
        (**self).capacity_model()
    }

    fn properties(&mut self) -> SimResult<SimProperties> {
        (**self).properties()
    }

    fn sync(&mut self) -> SimResult<()> {
        (**self).sync()
    }

    fn live_free_entries(&mut self) -> SimResult<Option<usize>> {
        (**self).live_free_entries()
    }

    fn entries(&mut self) -> SimResult<Vec<SimEntry>> {
        (**self).entries()
    }

    fn insert(&mut self, tag: &str, number: &str) -> SimResult<Option<SimEntryId>> {
        (**self).insert(tag, number)
    }

    fn delete(&mut self, tag: &str, number: &str) -> SimResult<usize> {
        (**self).delete(tag, number)
    }
}
