//! Draw state machine: `Idle -> Spinning -> Revealed`.
//!
//! [`start`] and [`stop`] are the only transitions that run a draw, and
//! [`stop`] is the only path that writes a winner to the ledger. [`tick`]
//! drives the cosmetic spin frames and cannot influence the result.

use std::time::Instant;

use rand::Rng;
use tracing::{info, instrument, warn};

use crate::core::error::DrawError;
use crate::core::selector::select_winner;
use crate::core::session::{Session, Stage};
use crate::core::spin::SpinTicker;
use crate::core::types::{Participant, Prize};

/// Presentation hooks fired by draw transitions.
///
/// Audio cues and celebratory effects attach here. Hooks are fire-and-forget.
pub trait DrawObserver {
    fn on_spin_start(&mut self, _prize: &Prize) {}
    fn on_winner_revealed(&mut self, _prize: &Prize, _winner: &Participant) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl DrawObserver for NoopObserver {}

/// `Idle | Revealed --start--> Spinning`.
///
/// Requires an active prize with at least one remaining slot. Clears the
/// previous winner.
#[instrument(skip_all, fields(prize_id = session.active_prize_id()))]
pub fn start<O: DrawObserver + ?Sized>(
    session: &mut Session,
    observer: &mut O,
) -> Result<(), DrawError> {
    if session.draw.is_spinning() {
        return Err(DrawError::AlreadySpinning);
    }
    let prize = session.active_prize().ok_or(DrawError::NoActivePrize)?;
    let remaining = session.remaining_slots(&prize.id);
    if remaining == 0 {
        return Err(DrawError::PrizeFull {
            prize_id: prize.id.clone(),
            count: prize.count,
        });
    }
    let prize = prize.clone();

    session.draw.last_winner = None;
    session.draw.stage = Stage::Spinning(SpinTicker::new(session.tick_interval));
    info!(remaining, "spin started");
    observer.on_spin_start(&prize);
    Ok(())
}

/// `Spinning --stop--> Revealed`.
///
/// Runs selection exactly once and appends the winner to the ledger under the
/// active prize. On [`DrawError::NoEligibleParticipants`] the session returns
/// to idle with the ledger untouched.
#[instrument(skip_all, fields(prize_id = session.active_prize_id()))]
pub fn stop<R: Rng + ?Sized, O: DrawObserver + ?Sized>(
    session: &mut Session,
    rng: &mut R,
    observer: &mut O,
) -> Result<Participant, DrawError> {
    if !session.draw.is_spinning() {
        return Err(DrawError::NotSpinning);
    }
    // Leaving Spinning drops the ticker before anything else happens.
    session.draw.stage = Stage::Idle;

    let prize = session
        .active_prize()
        .cloned()
        .ok_or(DrawError::NoActivePrize)?;
    if session.remaining_slots(&prize.id) == 0 {
        return Err(DrawError::PrizeFull {
            prize_id: prize.id,
            count: prize.count,
        });
    }

    let winner = match select_winner(
        session.roster.participants(),
        &session.ledger,
        &prize.id,
        &session.rigging,
        rng,
    ) {
        Ok(winner) => winner,
        Err(err) => {
            warn!(error = %err, "draw stopped without a winner");
            return Err(err);
        }
    };

    session
        .ledger
        .record(&prize.id, prize.count, winner.clone())?;
    session.draw.last_winner = Some(winner.clone());
    session.draw.stage = Stage::Revealed;
    info!(participant_id = %winner.id, won = session.ledger.won_count(&prize.id), count = prize.count, "winner revealed");
    observer.on_winner_revealed(&prize, &winner);
    Ok(winner)
}

/// Advance the cosmetic spin by one host refresh.
///
/// Returns a new frame sampled from the full roster, or `None` when throttled
/// or when the session is not spinning.
pub fn tick<'s, R: Rng + ?Sized>(
    session: &'s mut Session,
    now: Instant,
    rng: &mut R,
) -> Option<&'s Participant> {
    let Session { roster, draw, .. } = session;
    match &mut draw.stage {
        Stage::Spinning(ticker) => ticker.tick(now, roster.participants(), rng),
        Stage::Idle | Stage::Revealed => None,
    }
}
