//! Error taxonomy shared by the scan and export pipeline.

use thiserror::Error;

use crate::{sim::SimError, source::SourceError};

/// Conditions that end a scan or export operation early.
///
/// Per-contact problems (numbers too long, failed writes) are not errors;
/// they are collected into the `ignored` and `not_exported` lists. An
/// unreadable contacts source is not an error either: the scan reports an
/// empty outcome with `source_unavailable` set.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The single contact to export could not be loaded.
    #[error("unable to read contact {0}")]
    ContactUnavailable(crate::types::ContactId),
    /// SIM capacity could not be read after all attempts.
    #[error("SIM capacity unknown after {attempts} attempts")]
    CapacityUnknown {
        /// Number of reads performed.
        attempts: u32,
    },
    /// The cancellation token was observed.
    #[error("operation canceled")]
    Canceled,
    /// Contacts source failure.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// SIM backend failure outside the per-contact loop.
    #[error(transparent)]
    Sim(#[from] SimError),
}

impl ExportError {
    /// True for user or lifecycle cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Result alias for pipeline operations.
pub type ExportResult<T> = Result<T, ExportError>;
