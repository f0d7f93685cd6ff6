//! Scan, negotiation, and export pipeline.

/// GSM 7-bit alphabet tables and tag encoding.
pub mod alphabet;
/// Cooperative cancellation token.
pub mod cancel;
/// SIM space snapshot and capacity negotiation.
pub mod capacity;
/// Export executor.
pub mod export;
/// Dial-string normalization.
pub mod number;
/// Confirmation and error report lists.
pub mod report;
/// Contact scan pipeline.
pub mod scan;
/// Alphatag name truncation.
pub mod truncate;
