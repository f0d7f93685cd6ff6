//! Runtime event stream payloads.

use crate::core::export::ExportState;

/// Events emitted while the scan and export workers run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    /// Reading SIM capacity.
    CheckingSim,
    /// SIM is ready; scanning contacts.
    SearchingContacts,
    /// Scan finished.
    ScanFinished {
        /// Contacts accepted for export.
        accepted: usize,
        /// Contacts with a number too long for the card.
        ignored: usize,
        /// Names that will be truncated.
        truncated: usize,
    },
    /// Scan stopped by the cancellation token.
    ScanCanceled,
    /// Export worker started.
    ExportStarted {
        /// Contacts to write.
        total: usize,
    },
    /// One contact processed.
    Progress {
        /// Contacts processed so far.
        done: usize,
        /// Contacts in the run.
        total: usize,
    },
    /// Export worker finished.
    ExportFinished {
        /// Terminal state.
        state: ExportState,
        /// Entries written.
        exported: usize,
    },
}
