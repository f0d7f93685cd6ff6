//! Export executor: optional deletion pass, then one write per contact.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    contact::{NotExported, NotExportedReason, SimContact},
    sim::SimStorage,
};

use super::{cancel::CancelToken, number::normalize_number};

/// Terminal state of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportState {
    /// Every accepted contact was written.
    Completed,
    /// At least one contact was not written.
    PartiallyCompleted,
    /// The cancellation token stopped the loop.
    Canceled,
}

/// Per-contact progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    /// Contacts processed so far.
    pub done: usize,
    /// Contacts in the run.
    pub total: usize,
}

/// Aggregate result of an export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Terminal state.
    pub state: ExportState,
    /// Entries written.
    pub exported: usize,
    /// Existing entries deleted beforehand.
    pub deleted: usize,
    /// Accepted contacts that were not written.
    pub not_exported: Vec<NotExported>,
}

/// Deletes up to `quota` existing entries, matching by stored tag and number.
///
/// Deletes that affect no row are logged and do not count. Returns the
/// number of entries actually deleted.
pub fn delete_entries<S: SimStorage + ?Sized>(storage: &mut S, quota: usize) -> usize {
    debug!(quota, "deleting sim entries");
    let entries = match storage.entries() {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "listing sim entries failed");
            return 0;
        }
    };

    let mut deleted = 0;
    for entry in entries {
        if deleted >= quota {
            break;
        }
        match storage.delete(&entry.tag, &entry.number) {
            Ok(1) => {
                debug!(tag = %entry.tag, number = %entry.number, "deleted sim entry");
                deleted += 1;
            }
            Ok(rows) => {
                warn!(tag = %entry.tag, number = %entry.number, rows, "failed to delete sim entry");
            }
            Err(err) => {
                warn!(error = %err, "deleting sim entries failed");
                break;
            }
        }
    }
    deleted
}

/// Writes `accepted` to the card in order.
///
/// When `to_delete` is non-zero a deletion pass runs first. Before each
/// write the token is checked and the live free count re-read; a full
/// card routes the contact to `not_exported` without a write.
pub fn export_contacts<S, F>(
    storage: &mut S,
    accepted: Vec<SimContact>,
    to_delete: usize,
    cancel: &CancelToken,
    mut on_progress: F,
) -> ExportReport
where
    S: SimStorage + ?Sized,
    F: FnMut(ExportProgress),
{
    let total = accepted.len();
    info!(total, "sim contacts to be exported");

    let deleted = if to_delete > 0 {
        delete_entries(storage, to_delete)
    } else {
        0
    };

    let mut exported = 0;
    let mut not_exported = Vec::new();
    let mut canceled = false;
    let mut full_logged = false;

    for (idx, contact) in accepted.into_iter().enumerate() {
        if cancel.is_canceled() {
            debug!(exported, "export canceled");
            canceled = true;
            break;
        }

        match storage.live_free_entries() {
            Ok(Some(0)) => {
                if !full_logged {
                    info!(exported, "sim card is full");
                    full_logged = true;
                }
                not_exported.push(NotExported {
                    contact,
                    reason: NotExportedReason::SimFull,
                });
                on_progress(ExportProgress { done: idx + 1, total });
                continue;
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "reading free sim entries failed"),
        }

        let number = normalize_number(&contact.primary_number);
        let written = storage.insert(contact.tag(), &number);
        match written {
            Ok(Some(_)) => exported += 1,
            Ok(None) => {
                error!(
                    contact_name = %contact.name,
                    number = %contact.primary_number,
                    "unable to export contact to sim"
                );
                not_exported.push(NotExported {
                    contact,
                    reason: NotExportedReason::WriteFailed,
                });
            }
            Err(err) => {
                error!(contact_name = %contact.name, error = %err, "sim insert failed");
                not_exported.push(NotExported {
                    contact,
                    reason: NotExportedReason::WriteFailed,
                });
            }
        }
        on_progress(ExportProgress { done: idx + 1, total });
    }

    let state = if canceled {
        ExportState::Canceled
    } else if not_exported.is_empty() {
        ExportState::Completed
    } else {
        ExportState::PartiallyCompleted
    };
    if state == ExportState::Completed {
        info!(exported, "exporting sim contacts done");
    }

    ExportReport {
        state,
        exported,
        deleted,
        not_exported,
    }
}
