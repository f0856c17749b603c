//! Live prize draw engine.
//!
//! Participants are drawn one at a time for each prize in a catalog, with an
//! operator able to designate winners in advance. The crate is split:
//!
//! - **[`core`]**: Pure, deterministic logic (selection, draw state machine,
//!   ledger invariants). Randomness and time are injected.
//! - **[`io`]**: Side-effecting operations (config, spreadsheet import/export,
//!   presentation cues).
//!
//! Orchestration modules ([`setup`], [`console`], [`autodraw`]) wire core logic
//! to I/O for the CLI commands.

pub mod autodraw;
pub mod console;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod seed;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
