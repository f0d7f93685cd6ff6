//! Background workers, event stream, and the export session flow.

/// Event stream types emitted by the workers.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
/// Prompt-driven export session.
pub mod session;
/// Wake-lock abstraction and guard.
pub mod wake;
