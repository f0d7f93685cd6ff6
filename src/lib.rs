//! Export of address-book contacts to SIM phonebook storage.
//!
//! The pipeline reads SIM capacity, scans contacts into SIM-sized entries
//! (truncating names to the alphatag budget and skipping numbers that are
//! too long), negotiates space, and writes entries one at a time.
//!
//! # Examples
//!
//! Synchronous pipeline over in-memory collaborators:
//! ```
//! use simexport::{
//!     contact::FieldRow,
//!     core::{
//!         cancel::CancelToken,
//!         capacity::{negotiate, read_sim_space},
//!         export::{export_contacts, ExportState},
//!         scan::{scan_source, ScanLimits, ScanTarget},
//!     },
//!     sim::sqlite::{SimGeometry, SqliteSimStorage},
//!     source::memory::MemoryContactSource,
//! };
//!
//! let mut source = MemoryContactSource::from_rows(vec![
//!     FieldRow::name(1, "Alice"),
//!     FieldRow::phone(1, "555-1111"),
//! ]);
//! let mut sim = SqliteSimStorage::open_in_memory(SimGeometry::classic()).expect("sim");
//! let cancel = CancelToken::new();
//!
//! let space = read_sim_space(&mut sim, 3, &cancel).expect("space");
//! let limits = ScanLimits::from(&space);
//! let outcome = scan_source(&mut source, ScanTarget::AllContacts, limits, &cancel).expect("scan");
//! let decision = negotiate(outcome.accepted.len(), &space);
//! assert!(decision.fits_directly);
//!
//! let report = export_contacts(&mut sim, outcome.accepted, decision.to_delete, &cancel, |_| {});
//! assert_eq!(report.state, ExportState::Completed);
//! assert_eq!(report.exported, 1);
//! ```
//!
//! Prompt-driven session on the async runtime:
//! ```no_run
//! use std::sync::Arc;
//!
//! use simexport::{
//!     config::ExportConfig,
//!     core::scan::ScanTarget,
//!     runtime::{
//!         handle::spawn_exporter,
//!         session::{Choice, ExportSession, Prompt},
//!         wake::NoopWakeLock,
//!     },
//!     sim::sqlite::{SimGeometry, SqliteSimStorage},
//!     source::sqlite::SqliteContactSource,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = SqliteContactSource::open("contacts.db").expect("contacts");
//! let sim = SqliteSimStorage::open("sim.db", SimGeometry::classic()).expect("sim");
//! let config = ExportConfig::default();
//! let handle = spawn_exporter(
//!     Box::new(source),
//!     Box::new(sim),
//!     Arc::new(NoopWakeLock),
//!     config.clone(),
//! );
//!
//! let mut session = ExportSession::new(handle.clone(), ScanTarget::AllContacts, config.slot);
//! let mut prompt = session.begin().await.expect("begin");
//! while !matches!(prompt, Prompt::Finished(_)) {
//!     prompt = session.respond(Choice::Proceed).await.expect("respond");
//! }
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Runtime configuration.
pub mod config;
/// Contact records and SIM contacts.
pub mod contact;
/// Scan, negotiation, and export pipeline.
pub mod core;
/// Pipeline error taxonomy.
pub mod error;
/// Async workers and the session flow.
pub mod runtime;
/// SIM storage backends.
pub mod sim;
/// Contacts data sources.
pub mod source;
/// Shared primitive types.
pub mod types;
