//! Shared primitive IDs, SIM slot selection, and field kinds.

use serde::{Deserialize, Serialize};

/// Raw contact identifier used as the bulk-scan grouping key.
pub type RawContactId = i64;
/// Aggregated contact identifier used for single-contact export.
pub type ContactId = i64;
/// Identifier returned by a SIM backend for a written entry.
pub type SimEntryId = u64;

/// SIM card targeted by an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimSlot {
    /// Single-SIM device; no slot distinction.
    #[default]
    Single,
    /// First slot of a dual-SIM device.
    Slot1,
    /// Second slot of a dual-SIM device.
    Slot2,
}

impl SimSlot {
    /// Picks the slot from the "export to SIM B" request flag.
    pub fn select(export_to_sim_b: bool, dual_sim_supported: bool) -> Self {
        match (dual_sim_supported, export_to_sim_b) {
            (false, _) => Self::Single,
            (true, false) => Self::Slot1,
            (true, true) => Self::Slot2,
        }
    }

    /// Human label used in prompts, `None` on single-SIM devices.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Single => None,
            Self::Slot1 => Some("SIM1"),
            Self::Slot2 => Some("SIM2"),
        }
    }
}

/// Kind of a raw contact field row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Phone number row.
    Phone,
    /// Email address row.
    Email,
    /// Structured (display) name row.
    Name,
    /// Any other MIME type; skipped by the scanner.
    Other(String),
}

impl FieldKind {
    /// MIME type string used by the SQLite contacts source.
    pub fn mimetype(&self) -> &str {
        match self {
            Self::Phone => "vnd.android.cursor.item/phone_v2",
            Self::Email => "vnd.android.cursor.item/email_v2",
            Self::Name => "vnd.android.cursor.item/name",
            Self::Other(mime) => mime,
        }
    }

    /// Parses a MIME type string; unknown types map to [`FieldKind::Other`].
    pub fn from_mimetype(mime: &str) -> Self {
        match mime {
            "vnd.android.cursor.item/phone_v2" => Self::Phone,
            "vnd.android.cursor.item/email_v2" => Self::Email,
            "vnd.android.cursor.item/name" => Self::Name,
            other => Self::Other(other.to_string()),
        }
    }
}
