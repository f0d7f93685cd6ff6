//! Confirmation -> scan -> space check -> export -> result flow.
//!
//! [`ExportSession`] drives the runtime and hands the presentation layer
//! one [`Prompt`] at a time; the layer answers with a [`Choice`].

use tracing::debug;

use crate::{
    core::{
        capacity::{Overflow, negotiate},
        export::{ExportReport, ExportState},
        report::{ReportSection, confirmation_sections, error_section},
        scan::ScanTarget,
    },
    error::ExportError,
    types::SimSlot,
};

use super::handle::{ExportHandle, RuntimeError, ScanReport};

/// Reason shown in the generic failure dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Single contact could not be loaded.
    UnableToReadContact,
    /// SIM capacity could not be read.
    SimNotReady,
    /// Single contact has a number longer than the card allows.
    ContainsLongNumber,
    /// Any other failure, with its message.
    Other(String),
}

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Initial confirmation.
    ConfirmExport {
        /// Display name in single-contact mode.
        contact_name: Option<String>,
        /// Target card.
        slot: SimSlot,
    },
    /// Some names get truncated or some numbers are ignored.
    ConfirmTruncatedAndIgnored {
        /// Lists to show; empty in single-contact mode where a message suffices.
        sections: Vec<ReportSection>,
        /// True in single-contact mode.
        single_contact: bool,
    },
    /// The accepted set does not fit the free entries.
    NotEnoughSpace {
        /// Proposed way forward.
        overflow: Overflow,
    },
    /// Bulk scan found nothing.
    ContactsNotFound,
    /// The export did not write everything.
    NotComplete {
        /// List of skipped contacts.
        section: ReportSection,
        /// Export result, absent when nothing was attempted.
        report: Option<ExportReport>,
    },
    /// Generic failure dialog.
    Failed(FailureKind),
    /// The flow is over; close.
    Finished(Option<ExportReport>),
}

/// Answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// OK.
    Proceed,
    /// Cancel or back.
    Cancel,
}

enum Stage {
    Idle,
    AwaitingConfirm,
    AwaitingTruncationAck(ScanReport),
    AwaitingSpaceAck { scan: ScanReport, to_delete: usize },
    Done,
}

/// One user-initiated export.
pub struct ExportSession {
    handle: ExportHandle,
    target: ScanTarget,
    slot: SimSlot,
    stage: Stage,
}

impl ExportSession {
    /// Session exporting `target` to `slot`.
    pub fn new(handle: ExportHandle, target: ScanTarget, slot: SimSlot) -> Self {
        Self {
            handle,
            target,
            slot,
            stage: Stage::Idle,
        }
    }

    fn single_contact(&self) -> bool {
        matches!(self.target, ScanTarget::Contact(_))
    }

    fn finish(&mut self, prompt: Prompt) -> Prompt {
        self.stage = Stage::Done;
        prompt
    }

    /// Produces the first prompt; single-contact mode loads the contact first.
    pub async fn begin(&mut self) -> Result<Prompt, RuntimeError> {
        let contact_name = match self.target {
            ScanTarget::AllContacts => None,
            ScanTarget::Contact(id) => match self.handle.load_contact(id).await? {
                Some(record) => record.display_name,
                None => return Ok(self.finish(Prompt::Failed(FailureKind::UnableToReadContact))),
            },
        };
        self.stage = Stage::AwaitingConfirm;
        Ok(Prompt::ConfirmExport {
            contact_name,
            slot: self.slot,
        })
    }

    /// Applies the user's answer to the current prompt.
    pub async fn respond(&mut self, choice: Choice) -> Result<Prompt, RuntimeError> {
        let stage = std::mem::replace(&mut self.stage, Stage::Done);
        if choice == Choice::Cancel {
            debug!("export flow canceled at prompt");
            return Ok(Prompt::Finished(None));
        }

        match stage {
            Stage::AwaitingConfirm => self.run_scan().await,
            Stage::AwaitingTruncationAck(scan) => self.check_space(scan).await,
            Stage::AwaitingSpaceAck { scan, to_delete } => self.run_export(scan, to_delete).await,
            Stage::Idle | Stage::Done => Ok(Prompt::Finished(None)),
        }
    }

    async fn run_scan(&mut self) -> Result<Prompt, RuntimeError> {
        let scan = match self.handle.scan(self.target).await {
            Ok(scan) => scan,
            Err(RuntimeError::Export(err)) => return Ok(self.finish(failure_prompt(err))),
            Err(other) => return Err(other),
        };
        self.after_scan(scan).await
    }

    async fn after_scan(&mut self, scan: ScanReport) -> Result<Prompt, RuntimeError> {
        let outcome = &scan.outcome;
        if outcome.is_empty() {
            return Ok(self.finish(if self.single_contact() {
                Prompt::Finished(None)
            } else {
                Prompt::ContactsNotFound
            }));
        }

        if self.single_contact() {
            if !outcome.ignored.is_empty() {
                return Ok(self.finish(Prompt::Failed(FailureKind::ContainsLongNumber)));
            }
            if !outcome.truncated_names.is_empty() {
                self.stage = Stage::AwaitingTruncationAck(scan);
                return Ok(Prompt::ConfirmTruncatedAndIgnored {
                    sections: Vec::new(),
                    single_contact: true,
                });
            }
            return self.check_space(scan).await;
        }

        if outcome.accepted.is_empty() {
            let section = error_section(&outcome.ignored, &[]);
            return Ok(self.finish(Prompt::NotComplete {
                section,
                report: None,
            }));
        }
        if outcome.needs_confirmation() {
            let sections = confirmation_sections(outcome);
            self.stage = Stage::AwaitingTruncationAck(scan);
            return Ok(Prompt::ConfirmTruncatedAndIgnored {
                sections,
                single_contact: false,
            });
        }
        self.check_space(scan).await
    }

    async fn check_space(&mut self, scan: ScanReport) -> Result<Prompt, RuntimeError> {
        let decision = negotiate(scan.outcome.accepted.len(), &scan.space);
        match decision.overflow {
            None => self.run_export(scan, 0).await,
            Some(overflow) => {
                self.stage = Stage::AwaitingSpaceAck {
                    scan,
                    to_delete: decision.to_delete,
                };
                Ok(Prompt::NotEnoughSpace { overflow })
            }
        }
    }

    async fn run_export(
        &mut self,
        scan: ScanReport,
        to_delete: usize,
    ) -> Result<Prompt, RuntimeError> {
        let ScanReport { outcome, .. } = scan;
        let report = self.handle.export(outcome.accepted, to_delete).await?;
        let prompt = match report.state {
            ExportState::Completed | ExportState::Canceled => Prompt::Finished(Some(report)),
            ExportState::PartiallyCompleted => Prompt::NotComplete {
                section: error_section(&outcome.ignored, &report.not_exported),
                report: Some(report),
            },
        };
        Ok(self.finish(prompt))
    }
}

fn failure_prompt(err: ExportError) -> Prompt {
    match err {
        ExportError::Canceled => Prompt::Finished(None),
        ExportError::CapacityUnknown { .. } => Prompt::Failed(FailureKind::SimNotReady),
        ExportError::ContactUnavailable(_) => Prompt::Failed(FailureKind::UnableToReadContact),
        other => Prompt::Failed(FailureKind::Other(other.to_string())),
    }
}
