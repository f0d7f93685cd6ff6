//! Record-oriented ADN phonebook.

use serde::{Deserialize, Serialize};

use crate::{core::alphabet::tag_units, types::SimEntryId};

use super::{CapacityModel, SimEntry, SimProperties, SimResult, SimStorage};

/// Max dial-string digits in a plain ADN record.
pub const ADN_MAX_NUMBER_LEN: usize = 20;

/// Record counts and alphatag budget reported by the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdnRecordInfo {
    /// Alphatag budget in bytes.
    pub max_alpha_tag_len: usize,
    /// Total record slots.
    pub max_adn_records: usize,
    /// Records currently in use.
    pub used_records: usize,
}

impl AdnRecordInfo {
    /// Unused record slots.
    pub fn available_records(&self) -> usize {
        self.max_adn_records.saturating_sub(self.used_records)
    }
}

/// In-memory fixed-slot ADN record file.
#[derive(Debug, Clone)]
pub struct AdnRecordStorage {
    max_alpha_tag_len: usize,
    max_number_len: usize,
    records: Vec<Option<SimEntry>>,
}

impl AdnRecordStorage {
    /// Empty record file with `max_adn_records` slots.
    pub fn new(max_adn_records: usize, max_alpha_tag_len: usize) -> Self {
        Self {
            max_alpha_tag_len,
            max_number_len: ADN_MAX_NUMBER_LEN,
            records: vec![None; max_adn_records],
        }
    }

    /// Overrides the dial-string limit.
    pub fn with_max_number_len(mut self, max_number_len: usize) -> Self {
        self.max_number_len = max_number_len;
        self
    }

    /// Current record counts.
    pub fn record_info(&self) -> AdnRecordInfo {
        AdnRecordInfo {
            max_alpha_tag_len: self.max_alpha_tag_len,
            max_adn_records: self.records.len(),
            used_records: self.records.iter().filter(|r| r.is_some()).count(),
        }
    }

    /// Stored record at 1-based `index`.
    pub fn record(&self, index: SimEntryId) -> Option<&SimEntry> {
        let slot = usize::try_from(index).ok()?.checked_sub(1)?;
        self.records.get(slot)?.as_ref()
    }
}

impl SimStorage for AdnRecordStorage {
    fn capacity_model(&self) -> CapacityModel {
        CapacityModel::RecordBased
    }

    fn properties(&mut self) -> SimResult<SimProperties> {
        let info = self.record_info();
        Ok(SimProperties {
            capacity: Some(info.max_adn_records),
            free_entries: Some(info.available_records()),
            max_name_len: Some(info.max_alpha_tag_len),
            max_number_len: Some(self.max_number_len),
            max_email_len: None,
        })
    }

    fn live_free_entries(&mut self) -> SimResult<Option<usize>> {
        Ok(None)
    }

    fn entries(&mut self) -> SimResult<Vec<SimEntry>> {
        Ok(self.records.iter().flatten().cloned().collect())
    }

    fn insert(&mut self, tag: &str, number: &str) -> SimResult<Option<SimEntryId>> {
        if tag_units(tag) > self.max_alpha_tag_len
            || number.chars().count() > self.max_number_len
        {
            return Ok(None);
        }
        let Some(slot) = self.records.iter().position(Option::is_none) else {
            return Ok(None);
        };
        self.records[slot] = Some(SimEntry {
            tag: tag.to_string(),
            number: number.to_string(),
        });
        Ok(Some(slot as SimEntryId + 1))
    }
}
