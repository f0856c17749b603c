//! Stable exit codes for draw CLI commands.

/// Command succeeded; for `draw run`, every prize got all its winners.
pub const OK: i32 = 0;
/// Command failed due to invalid config, unreadable input, or other errors.
pub const INVALID: i32 = 1;
/// `draw run` ran out of participants before every slot was filled.
pub const EXHAUSTED: i32 = 2;
/// `draw run` finished without any winner, so no export file was written.
pub const NOTHING_TO_EXPORT: i32 = 3;
