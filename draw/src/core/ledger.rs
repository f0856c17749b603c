//! Append-only record of committed winners.

use std::collections::{BTreeMap, HashSet};

use crate::core::error::DrawError;
use crate::core::types::Participant;

/// Prize id to winners in win order.
///
/// Invariants upheld by [`WinnerLedger::record`]:
/// - a participant id appears at most once across all prizes
/// - a prize never holds more winners than its slot count
///
/// Writes are crate-private; the only write paths are the `stop` transition
/// and the explicit reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinnerLedger {
    winners: BTreeMap<String, Vec<Participant>>,
}

impl WinnerLedger {
    /// Winners of one prize, in win order.
    pub fn winners(&self, prize_id: &str) -> &[Participant] {
        self.winners.get(prize_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn won_count(&self, prize_id: &str) -> u32 {
        u32::try_from(self.winners(prize_id).len()).unwrap_or(u32::MAX)
    }

    /// Every participant id that has won any prize.
    pub fn won_ids(&self) -> HashSet<&str> {
        self.winners
            .values()
            .flatten()
            .map(|p| p.id.as_str())
            .collect()
    }

    pub fn has_won(&self, participant_id: &str) -> bool {
        self.winners
            .values()
            .flatten()
            .any(|p| p.id == participant_id)
    }

    pub fn total(&self) -> usize {
        self.winners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Participant])> {
        self.winners
            .iter()
            .map(|(prize, winners)| (prize.as_str(), winners.as_slice()))
    }

    /// Append a winner under `prize_id`, enforcing both ledger invariants.
    pub(crate) fn record(
        &mut self,
        prize_id: &str,
        slots: u32,
        winner: Participant,
    ) -> Result<(), DrawError> {
        if self.has_won(&winner.id) {
            return Err(DrawError::LedgerViolation(format!(
                "participant '{}' has already won",
                winner.id
            )));
        }
        if self.won_count(prize_id) >= slots {
            return Err(DrawError::PrizeFull {
                prize_id: prize_id.to_string(),
                count: slots,
            });
        }
        self.winners
            .entry(prize_id.to_string())
            .or_default()
            .push(winner);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.winners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::participant;

    #[test]
    fn record_rejects_second_win_for_same_participant() {
        let mut ledger = WinnerLedger::default();
        ledger.record("p1", 3, participant("a")).expect("first win");

        let err = ledger
            .record("p2", 3, participant("a"))
            .expect_err("double win");

        assert!(matches!(err, DrawError::LedgerViolation(_)));
        assert!(ledger.winners("p2").is_empty());
    }

    #[test]
    fn record_rejects_over_slot_count() {
        let mut ledger = WinnerLedger::default();
        ledger.record("p1", 1, participant("a")).expect("first win");

        let err = ledger
            .record("p1", 1, participant("b"))
            .expect_err("prize full");

        assert_eq!(
            err,
            DrawError::PrizeFull {
                prize_id: "p1".to_string(),
                count: 1
            }
        );
        assert_eq!(ledger.won_count("p1"), 1);
    }

    #[test]
    fn won_ids_flattens_every_prize() {
        let mut ledger = WinnerLedger::default();
        ledger.record("p2", 2, participant("x")).expect("win");
        ledger.record("p1", 2, participant("y")).expect("win");
        ledger.record("p1", 2, participant("z")).expect("win");

        let ids = ledger.won_ids();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("x") && ids.contains("y") && ids.contains("z"));
        assert_eq!(ledger.total(), 3);
    }
}
