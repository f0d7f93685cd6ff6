//! Lists shown to the user before and after an export.

use serde::{Deserialize, Serialize};

use crate::contact::{NotExported, SimContact};

use super::scan::ScanOutcome;

/// Which list a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    /// Names that will be shortened.
    ToBeTruncated,
    /// Contacts skipped because the number is too long.
    ToBeIgnored,
    /// Contacts that failed during export.
    NotExported,
}

impl SectionKind {
    /// Section header text.
    pub fn header(self) -> &'static str {
        match self {
            Self::ToBeTruncated => "Contacts to be truncated",
            Self::ToBeIgnored => "Contacts to be ignored",
            Self::NotExported => "Contacts not exported",
        }
    }
}

/// One list row; truncation rows carry no number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Contact name as scanned.
    pub name: String,
    /// Number, when the section shows one.
    pub number: Option<String>,
}

/// Headed list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section kind.
    pub kind: SectionKind,
    /// Rows in scan order.
    pub rows: Vec<ReportRow>,
}

fn contact_rows<'a>(contacts: impl IntoIterator<Item = &'a SimContact>) -> Vec<ReportRow> {
    contacts
        .into_iter()
        .map(|c| ReportRow {
            name: c.name.clone(),
            number: Some(c.primary_number.clone()),
        })
        .collect()
}

/// Sections for the pre-export confirmation; empty sections are omitted.
pub fn confirmation_sections(outcome: &ScanOutcome) -> Vec<ReportSection> {
    let mut sections = Vec::new();
    if !outcome.truncated_names.is_empty() {
        sections.push(ReportSection {
            kind: SectionKind::ToBeTruncated,
            rows: outcome
                .truncated_names
                .iter()
                .map(|name| ReportRow {
                    name: name.clone(),
                    number: None,
                })
                .collect(),
        });
    }
    if !outcome.ignored.is_empty() {
        sections.push(ReportSection {
            kind: SectionKind::ToBeIgnored,
            rows: contact_rows(&outcome.ignored),
        });
    }
    sections
}

/// Section for the "export not complete" report.
///
/// Ignored contacts take precedence over not-exported ones.
pub fn error_section(ignored: &[SimContact], not_exported: &[NotExported]) -> ReportSection {
    if !ignored.is_empty() {
        ReportSection {
            kind: SectionKind::ToBeIgnored,
            rows: contact_rows(ignored),
        }
    } else {
        ReportSection {
            kind: SectionKind::NotExported,
            rows: contact_rows(not_exported.iter().map(|n| &n.contact)),
        }
    }
}
