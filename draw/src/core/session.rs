//! The owned session object and its operator surface.
//!
//! A [`Session`] holds every piece of draw state for one run of the program.
//! Draw transitions live in [`crate::core::draw`]; this module covers reads and
//! the operator edits (roster, catalog, rigging, reset, prize switch). Edits
//! that would change draw inputs are refused while a draw is spinning.

use std::time::Duration;

use tracing::{debug, info};

use crate::core::catalog::PrizeCatalog;
use crate::core::error::DrawError;
use crate::core::ledger::WinnerLedger;
use crate::core::rigging::RiggingTable;
use crate::core::roster::Roster;
use crate::core::spin::{DEFAULT_TICK_INTERVAL, SpinTicker};
use crate::core::types::{Participant, Phase, Prize, PrizeProgress};

/// Internal phase; the spinning variant owns the cosmetic ticker.
#[derive(Debug, Clone)]
pub(crate) enum Stage {
    Idle,
    Spinning(SpinTicker),
    Revealed,
}

#[derive(Debug, Clone)]
pub(crate) struct DrawState {
    pub(crate) active_prize_id: Option<String>,
    pub(crate) stage: Stage,
    pub(crate) last_winner: Option<Participant>,
}

impl DrawState {
    fn idle(active_prize_id: Option<String>) -> Self {
        Self {
            active_prize_id,
            stage: Stage::Idle,
            last_winner: None,
        }
    }

    pub(crate) fn is_spinning(&self) -> bool {
        matches!(self.stage, Stage::Spinning(_))
    }
}

/// All in-memory state of one draw session.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) roster: Roster,
    pub(crate) catalog: PrizeCatalog,
    pub(crate) rigging: RiggingTable,
    pub(crate) ledger: WinnerLedger,
    pub(crate) draw: DrawState,
    pub(crate) tick_interval: Duration,
}

impl Session {
    /// Create an idle session whose active prize is the first catalog entry.
    pub fn new(roster: Roster, catalog: PrizeCatalog, rigging: RiggingTable) -> Self {
        let active = catalog.first().map(|p| p.id.clone());
        Self {
            roster,
            catalog,
            rigging,
            ledger: WinnerLedger::default(),
            draw: DrawState::idle(active),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn catalog(&self) -> &PrizeCatalog {
        &self.catalog
    }

    pub fn rigging(&self) -> &RiggingTable {
        &self.rigging
    }

    pub fn ledger(&self) -> &WinnerLedger {
        &self.ledger
    }

    pub fn phase(&self) -> Phase {
        match self.draw.stage {
            Stage::Idle => Phase::Idle,
            Stage::Spinning(_) => Phase::Spinning,
            Stage::Revealed => Phase::Revealed,
        }
    }

    pub fn active_prize_id(&self) -> Option<&str> {
        self.draw.active_prize_id.as_deref()
    }

    pub fn active_prize(&self) -> Option<&Prize> {
        self.active_prize_id().and_then(|id| self.catalog.get(id))
    }

    pub fn last_winner(&self) -> Option<&Participant> {
        self.draw.last_winner.as_ref()
    }

    /// What the stage should show: the spinning frame, the revealed winner, or nothing.
    pub fn display(&self) -> Option<&Participant> {
        match &self.draw.stage {
            Stage::Idle => None,
            Stage::Spinning(ticker) => ticker.current(),
            Stage::Revealed => self.draw.last_winner.as_ref(),
        }
    }

    pub fn progress(&self, prize_id: &str) -> Option<PrizeProgress> {
        let prize = self.catalog.get(prize_id)?;
        Some(PrizeProgress {
            prize_id: prize.id.clone(),
            won: self.ledger.won_count(&prize.id),
            count: prize.count,
        })
    }

    /// Progress for every prize, in catalog order.
    pub fn all_progress(&self) -> Vec<PrizeProgress> {
        self.catalog
            .prizes()
            .iter()
            .filter_map(|p| self.progress(&p.id))
            .collect()
    }

    pub fn remaining_slots(&self, prize_id: &str) -> u32 {
        self.progress(prize_id)
            .map(|progress| progress.remaining())
            .unwrap_or(0)
    }

    /// Make `prize_id` the active prize. Always resets to idle and clears the
    /// last winner.
    pub fn switch_prize(&mut self, prize_id: &str) -> Result<(), DrawError> {
        self.ensure_not_spinning()?;
        if self.catalog.get(prize_id).is_none() {
            return Err(DrawError::UnknownPrize(prize_id.to_string()));
        }
        debug!(prize_id, "active prize switched");
        self.draw = DrawState::idle(Some(prize_id.to_string()));
        Ok(())
    }

    /// Replace the whole roster. Returns the new participant count.
    pub fn replace_roster(&mut self, participants: Vec<Participant>) -> Result<usize, DrawError> {
        self.ensure_not_spinning()?;
        self.roster
            .replace(participants)
            .map_err(DrawError::InvalidRoster)?;
        info!(participants = self.roster.len(), "roster replaced");
        Ok(self.roster.len())
    }

    /// Append a prize. An id that still has winners in the ledger (from a
    /// removed prize) must leave room for all of them.
    pub fn add_prize(&mut self, prize: Prize) -> Result<(), DrawError> {
        self.ensure_not_spinning()?;
        self.ensure_count_covers_winners(&prize)?;
        self.catalog.add(prize)?;
        if self.draw.active_prize_id.is_none() {
            self.draw = DrawState::idle(self.catalog.first().map(|p| p.id.clone()));
        }
        Ok(())
    }

    /// Edit a prize in place. The slot count may not drop below the number of
    /// winners already recorded for it.
    pub fn update_prize(&mut self, prize: Prize) -> Result<(), DrawError> {
        self.ensure_not_spinning()?;
        self.ensure_count_covers_winners(&prize)?;
        self.catalog.update(prize)
    }

    /// Remove a prize and its rigging list.
    ///
    /// Winners already recorded under it stay in the ledger and still count as
    /// having won. If it was the active prize, the first remaining prize
    /// becomes active.
    pub fn remove_prize(&mut self, prize_id: &str) -> Result<Prize, DrawError> {
        self.ensure_not_spinning()?;
        let removed = self.catalog.remove(prize_id)?;
        self.rigging.clear_prize(prize_id);
        if self.draw.active_prize_id.as_deref() == Some(prize_id) {
            self.draw = DrawState::idle(self.catalog.first().map(|p| p.id.clone()));
        }
        Ok(removed)
    }

    /// Designate `participant_id` for `prize_id`. Returns false if already listed.
    pub fn rig(&mut self, prize_id: &str, participant_id: &str) -> Result<bool, DrawError> {
        self.ensure_not_spinning()?;
        if self.catalog.get(prize_id).is_none() {
            return Err(DrawError::UnknownPrize(prize_id.to_string()));
        }
        if self.roster.get(participant_id).is_none() {
            return Err(DrawError::UnknownParticipant(participant_id.to_string()));
        }
        Ok(self.rigging.add(prize_id, participant_id))
    }

    pub fn unrig(&mut self, prize_id: &str, participant_id: &str) -> Result<bool, DrawError> {
        self.ensure_not_spinning()?;
        Ok(self.rigging.remove(prize_id, participant_id))
    }

    /// Clear the entire ledger. Callers confirm with the operator first.
    pub fn reset_winners(&mut self) -> Result<(), DrawError> {
        self.ensure_not_spinning()?;
        info!(cleared = self.ledger.total(), "winner ledger reset");
        self.ledger.clear();
        self.draw = DrawState::idle(self.draw.active_prize_id.take());
        Ok(())
    }

    fn ensure_count_covers_winners(&self, prize: &Prize) -> Result<(), DrawError> {
        let won = self.ledger.won_count(&prize.id);
        if prize.count < won {
            return Err(DrawError::InvalidPrize(format!(
                "prize '{}' count {} is below its {} recorded winners",
                prize.id, prize.count, won
            )));
        }
        Ok(())
    }

    pub(crate) fn ensure_not_spinning(&self) -> Result<(), DrawError> {
        if self.draw.is_spinning() {
            return Err(DrawError::DrawInProgress);
        }
        Ok(())
    }
}
