//! Cosmetic spin sampling shown while a draw is in progress.
//!
//! Frames are sampled from the full, unfiltered roster and have no bearing on
//! the committed winner, which only [`crate::core::selector::select_winner`]
//! decides.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::core::types::Participant;

/// Default frame interval (~20 frames per second).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Throttled random sampler driven by the host's refresh callback.
///
/// A ticker lives only inside the spinning phase of a session; leaving that
/// phase drops it, so no frame can be produced after `stop`.
#[derive(Debug, Clone)]
pub struct SpinTicker {
    interval: Duration,
    last_frame: Option<Instant>,
    current: Option<Participant>,
}

impl SpinTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
            current: None,
        }
    }

    /// Advance the ticker to `now`.
    ///
    /// Returns the new frame when one is due, `None` when throttled or when the
    /// roster is empty.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: Instant,
        roster: &[Participant],
        rng: &mut R,
    ) -> Option<&Participant> {
        if roster.is_empty() {
            return None;
        }
        let due = match self.last_frame {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if !due {
            return None;
        }
        self.last_frame = Some(now);
        let index = rng.gen_range(0..roster.len());
        self.current = Some(roster[index].clone());
        self.current.as_ref()
    }

    /// Most recent frame, if any.
    pub fn current(&self) -> Option<&Participant> {
        self.current.as_ref()
    }
}
