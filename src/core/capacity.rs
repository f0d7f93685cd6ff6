//! SIM space snapshot and the capacity negotiation rule.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{ExportError, ExportResult},
    sim::{CapacityModel, SimProperties, SimStorage, records::AdnRecordInfo},
};

use super::cancel::CancelToken;

/// Point-in-time view of SIM capacity, read once per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSpace {
    /// Total entry slots.
    pub capacity: usize,
    /// Unused entry slots.
    pub free_entries: usize,
    /// Alphatag budget in storage units.
    pub max_name_len: usize,
    /// Max dial-string length.
    pub max_number_len: usize,
    /// Max email length, when the card has an email file.
    pub max_email_len: Option<usize>,
    /// How the backend reports capacity.
    pub model: CapacityModel,
}

impl SimSpace {
    /// Builds a snapshot, or `None` while the card has not reported enough.
    ///
    /// A missing capacity is taken to equal the free count, which leaves
    /// no deletable entries; a missing free count is taken as zero.
    pub fn from_properties(props: SimProperties, model: CapacityModel) -> Option<Self> {
        if props.capacity.is_none() && props.free_entries.is_none() {
            return None;
        }
        let max_name_len = props.max_name_len?;
        let max_number_len = props.max_number_len?;
        let free_entries = props.free_entries.unwrap_or(0);
        Some(Self {
            capacity: props.capacity.unwrap_or(free_entries),
            free_entries,
            max_name_len,
            max_number_len,
            max_email_len: props.max_email_len,
            model,
        })
    }

    /// Snapshot for the record-oriented model.
    pub fn from_adn(info: AdnRecordInfo, max_number_len: usize) -> Self {
        Self {
            capacity: info.max_adn_records,
            free_entries: info.available_records(),
            max_name_len: info.max_alpha_tag_len,
            max_number_len,
            max_email_len: None,
            model: CapacityModel::RecordBased,
        }
    }
}

/// Reads the SIM snapshot, resyncing between failed reads.
///
/// Performs at most `attempts` reads and checks `cancel` before each.
pub fn read_sim_space<S: SimStorage + ?Sized>(
    storage: &mut S,
    attempts: u32,
    cancel: &CancelToken,
) -> ExportResult<SimSpace> {
    let attempts = attempts.max(1);
    let model = storage.capacity_model();

    for attempt in 1..=attempts {
        if cancel.is_canceled() {
            return Err(ExportError::Canceled);
        }

        match storage.properties() {
            Ok(props) => {
                if let Some(space) = SimSpace::from_properties(props, model) {
                    debug!(
                        capacity = space.capacity,
                        free = space.free_entries,
                        max_name_len = space.max_name_len,
                        max_number_len = space.max_number_len,
                        "sim space read"
                    );
                    return Ok(space);
                }
                debug!(attempt, "sim properties incomplete");
            }
            Err(err) => warn!(attempt, error = %err, "reading sim properties failed"),
        }

        if attempt < attempts {
            if let Err(err) = storage.sync() {
                warn!(error = %err, "sim sync failed");
            }
        }
    }

    Err(ExportError::CapacityUnknown { attempts })
}

/// Outcome when the accepted set does not fit the free entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overflow {
    /// Delete this many existing entries, then export everything.
    DeleteThenExport {
        /// Entries to delete first.
        to_delete: usize,
    },
    /// Export until the card is full; the rest is reported as not exported.
    ExportUntilFull,
}

/// Result of the capacity negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// True when no confirmation is needed.
    pub fits_directly: bool,
    /// Existing entries to delete before exporting.
    pub to_delete: usize,
    /// Set whenever `fits_directly` is false.
    pub overflow: Option<Overflow>,
}

impl Decision {
    fn fits() -> Self {
        Self {
            fits_directly: true,
            to_delete: 0,
            overflow: None,
        }
    }
}

/// Decides how `accepted` contacts can be placed on the card.
pub fn negotiate(accepted: usize, space: &SimSpace) -> Decision {
    if accepted <= space.free_entries {
        return Decision::fits();
    }

    let deletable = space.model == CapacityModel::Generic && space.capacity > space.free_entries;
    if deletable {
        let to_delete = space
            .capacity
            .min(accepted)
            .saturating_sub(space.free_entries);
        Decision {
            fits_directly: false,
            to_delete,
            overflow: Some(Overflow::DeleteThenExport { to_delete }),
        }
    } else {
        Decision {
            fits_directly: false,
            to_delete: 0,
            overflow: Some(Overflow::ExportUntilFull),
        }
    }
}
