//! Typed failures raised by core draw logic.

use std::fmt;

/// Reasons a draw or operator action was refused.
///
/// Every variant is recoverable: the session is left exactly as it was before
/// the rejected call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// Every participant in the roster has already won something.
    NoEligibleParticipants,
    /// The catalog is empty, so there is no prize to draw for.
    NoActivePrize,
    /// The referenced prize id is not in the catalog.
    UnknownPrize(String),
    /// The prize has no remaining winner slots.
    PrizeFull { prize_id: String, count: u32 },
    /// `start` was requested while a draw is already spinning.
    AlreadySpinning,
    /// `stop` was requested while no draw is spinning.
    NotSpinning,
    /// The operation would change draw inputs mid-spin.
    DrawInProgress,
    /// The referenced participant id is not in the roster.
    UnknownParticipant(String),
    /// A prize definition failed validation.
    InvalidPrize(String),
    /// A replacement roster failed validation.
    InvalidRoster(String),
    /// A participant was recorded twice, or over a prize's slot count.
    LedgerViolation(String),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligibleParticipants => write!(f, "no eligible participants left to draw"),
            Self::NoActivePrize => write!(f, "no active prize (catalog is empty)"),
            Self::UnknownPrize(id) => write!(f, "unknown prize '{id}'"),
            Self::PrizeFull { prize_id, count } => {
                write!(f, "prize '{prize_id}' already has all {count} winners")
            }
            Self::AlreadySpinning => write!(f, "a draw is already spinning"),
            Self::NotSpinning => write!(f, "no draw is spinning"),
            Self::DrawInProgress => write!(f, "cannot change draw inputs while spinning"),
            Self::UnknownParticipant(id) => write!(f, "unknown participant '{id}'"),
            Self::InvalidPrize(msg) => write!(f, "invalid prize: {msg}"),
            Self::InvalidRoster(msg) => write!(f, "invalid roster: {msg}"),
            Self::LedgerViolation(msg) => write!(f, "ledger violation: {msg}"),
        }
    }
}

impl std::error::Error for DrawError {}
