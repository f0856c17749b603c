//! Authoritative winner selection.
//!
//! This is the only place a committed winner is chosen. The cosmetic spin
//! sampling in [`crate::core::spin`] never calls into this module.

use rand::Rng;
use tracing::debug;

use crate::core::error::DrawError;
use crate::core::ledger::WinnerLedger;
use crate::core::rigging::RiggingTable;
use crate::core::types::Participant;

/// Pick the next winner for `prize_id`.
///
/// 1. Anyone who already won any prize is excluded.
/// 2. The first rigged id for this prize that has not won is returned if it
///    is still in the roster.
/// 3. Otherwise a uniform pick among remaining candidates.
///
/// Returns [`DrawError::NoEligibleParticipants`] when nobody is left.
pub fn select_winner<R: Rng + ?Sized>(
    roster: &[Participant],
    ledger: &WinnerLedger,
    prize_id: &str,
    rigging: &RiggingTable,
    rng: &mut R,
) -> Result<Participant, DrawError> {
    let won = ledger.won_ids();
    let candidates: Vec<&Participant> = roster
        .iter()
        .filter(|p| !won.contains(p.id.as_str()))
        .collect();
    if candidates.is_empty() {
        return Err(DrawError::NoEligibleParticipants);
    }

    let next_rigged = rigging
        .for_prize(prize_id)
        .iter()
        .find(|id| !won.contains(id.as_str()));
    if let Some(rigged_id) = next_rigged {
        if let Some(winner) = candidates.iter().find(|p| &p.id == rigged_id) {
            debug!(prize_id, participant_id = %winner.id, "designated winner selected");
            return Ok((*winner).clone());
        }
        debug!(prize_id, participant_id = %rigged_id, "designated winner not in roster");
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index].clone())
}
