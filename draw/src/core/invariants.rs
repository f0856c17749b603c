//! Whole-session consistency checks.

use std::collections::HashSet;

use crate::core::session::Session;
use crate::core::types::Phase;

/// Check session invariants:
/// - No participant id appears twice across the ledger
/// - No catalog prize holds more winners than its count
/// - A revealed session has a last winner; other phases do not
/// - A non-empty catalog has an active prize that exists in it
pub fn validate_invariants(session: &Session) -> Vec<String> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (prize_id, winners) in session.ledger().iter() {
        for winner in winners {
            if !seen.insert(winner.id.as_str()) {
                errors.push(format!(
                    "participant '{}' won more than once (again under '{}')",
                    winner.id, prize_id
                ));
            }
        }
    }

    for prize in session.catalog().prizes() {
        let won = session.ledger().won_count(&prize.id);
        if won > prize.count {
            errors.push(format!(
                "{}: {} winners exceeds count {}",
                prize.id, won, prize.count
            ));
        }
    }

    match (session.phase(), session.last_winner()) {
        (Phase::Revealed, None) => errors.push("revealed without a last winner".to_string()),
        (Phase::Idle | Phase::Spinning, Some(winner)) => errors.push(format!(
            "{:?} phase still holds last winner '{}'",
            session.phase(),
            winner.id
        )),
        _ => {}
    }

    if !session.catalog().is_empty() && session.active_prize().is_none() {
        errors.push("active prize is missing from the catalog".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::draw::{NoopObserver, start, stop};
    use crate::test_support::{participant, prize, seeded_rng, session_with};

    #[test]
    fn fresh_and_drawn_sessions_are_consistent() {
        let mut session = session_with(&["a", "b", "c"], vec![prize("p1", 2), prize("p2", 1)]);
        assert!(validate_invariants(&session).is_empty());

        let mut rng = seeded_rng(11);
        start(&mut session, &mut NoopObserver).expect("start");
        stop(&mut session, &mut rng, &mut NoopObserver).expect("stop");
        assert!(validate_invariants(&session).is_empty());
    }

    #[test]
    fn reports_prize_over_count() {
        let mut session = session_with(&["a", "b"], vec![prize("p1", 1), prize("p2", 1)]);
        // Bypass the session's edit checks to plant an inconsistent ledger.
        let mut forged = crate::core::ledger::WinnerLedger::default();
        forged.record("p1", 5, participant("a")).expect("record");
        forged.record("p1", 5, participant("b")).expect("record");
        session.ledger = forged;
        session.catalog.update(prize("p1", 1)).expect("update");

        let errors = validate_invariants(&session);

        assert!(errors.iter().any(|err| err.contains("exceeds count")));
    }
}
