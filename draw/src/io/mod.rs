//! Side-effecting helpers: config files, spreadsheets, and presentation cues.

pub mod config;
pub mod cues;
pub mod export;
pub mod import;
