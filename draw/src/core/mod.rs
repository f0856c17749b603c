//! Deterministic, pure logic for the draw engine.
//!
//! Core modules must be free of I/O side effects. Randomness and time are
//! passed in by the caller so every behavior is reproducible in tests.

pub mod catalog;
pub mod draw;
pub mod error;
pub mod export;
pub mod invariants;
pub mod ledger;
pub mod rigging;
pub mod roster;
pub mod selector;
pub mod session;
pub mod spin;
pub mod types;
