//! Lifecycle tests for the draw state machine through the public API.
//!
//! Drives sessions with seeded RNGs and checks the ledger invariants after
//! every transition.

use std::time::{Duration, Instant};

use draw::core::draw::{NoopObserver, start, stop, tick};
use draw::core::error::DrawError;
use draw::core::export::winner_rows;
use draw::core::invariants::validate_invariants;
use draw::core::types::Phase;
use draw::io::import::import_roster;
use draw::test_support::{RecordingObserver, participants, prize, seeded_rng, session_with};
use rand::Rng;

fn assert_consistent(session: &draw::core::session::Session) {
    let violations = validate_invariants(session);
    assert!(violations.is_empty(), "invariants violated: {violations:?}");
}

const PEOPLE: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];
const PRIZES: [&str; 4] = ["p1", "p2", "p3", "p4"];

#[test]
fn random_operation_sequences_keep_invariants() {
    for seed in 0..20 {
        let mut session = session_with(
            &["a", "b", "c", "d", "e", "f"],
            vec![prize("p1", 1), prize("p2", 2), prize("p3", 4)],
        );
        let mut ops = seeded_rng(seed);
        let mut draw_rng = seeded_rng(seed + 1000);
        let mut frame_rng = seeded_rng(seed + 2000);
        let mut now = Instant::now();

        for _ in 0..200 {
            let prize_id = PRIZES[ops.gen_range(0..PRIZES.len())];
            let person = PEOPLE[ops.gen_range(0..PEOPLE.len())];
            match ops.gen_range(0..12) {
                0 | 1 => {
                    let _ = start(&mut session, &mut NoopObserver);
                }
                2 => {
                    let _ = stop(&mut session, &mut draw_rng, &mut NoopObserver);
                }
                3 => {
                    now += Duration::from_millis(16);
                    let _ = tick(&mut session, now, &mut frame_rng);
                }
                4 => {
                    let _ = session.switch_prize(prize_id);
                }
                5 => {
                    let _ = session.add_prize(prize(prize_id, ops.gen_range(1..5)));
                }
                6 => {
                    let _ = session.update_prize(prize(prize_id, ops.gen_range(1..5)));
                }
                7 => {
                    let _ = session.remove_prize(prize_id);
                }
                8 => {
                    let keep = ops.gen_range(1..=PEOPLE.len());
                    let _ = session.replace_roster(participants(&PEOPLE[..keep]));
                }
                9 => {
                    let _ = session.rig(prize_id, person);
                }
                10 => {
                    let _ = session.unrig(prize_id, person);
                }
                _ => {
                    if ops.gen_range(0..10) == 0 {
                        let _ = session.reset_winners();
                    }
                }
            }
            assert_consistent(&session);
        }
    }
}

#[test]
fn designated_winners_are_drawn_in_order() {
    let mut session = session_with(&["A", "B", "C", "D", "E"], vec![prize("p1", 3)]);
    for id in ["C", "A", "B"] {
        assert!(session.rig("p1", id).expect("rig"));
    }
    let mut rng = seeded_rng(11);
    let mut observer = RecordingObserver::default();

    let mut winners = Vec::new();
    for _ in 0..3 {
        start(&mut session, &mut observer).expect("start");
        winners.push(stop(&mut session, &mut rng, &mut observer).expect("stop").id);
    }

    assert_eq!(winners, vec!["C", "A", "B"]);
    assert_eq!(
        start(&mut session, &mut observer),
        Err(DrawError::PrizeFull {
            prize_id: "p1".to_string(),
            count: 3
        })
    );
    assert_eq!(observer.events.len(), 6);
    assert_consistent(&session);
}

#[test]
fn re_adding_a_removed_prize_keeps_its_winners_within_count() {
    let mut session = session_with(&["a", "b", "c", "d"], vec![prize("p1", 3)]);
    let mut rng = seeded_rng(21);
    for _ in 0..3 {
        start(&mut session, &mut NoopObserver).expect("start");
        stop(&mut session, &mut rng, &mut NoopObserver).expect("stop");
    }
    session.remove_prize("p1").expect("remove");

    let err = session.add_prize(prize("p1", 1)).expect_err("count below winners");
    assert!(matches!(err, DrawError::InvalidPrize(_)));
    assert!(session.catalog().get("p1").is_none());
    assert_consistent(&session);

    session.add_prize(prize("p1", 3)).expect("re-add");
    assert_eq!(winner_rows(session.ledger(), session.catalog()).expect("rows").len(), 3);
    assert_eq!(
        start(&mut session, &mut NoopObserver),
        Err(DrawError::PrizeFull {
            prize_id: "p1".to_string(),
            count: 3
        })
    );
    assert_consistent(&session);
}

#[test]
fn roster_exhaustion_leaves_session_idle() {
    let mut session = session_with(&["a", "b", "c"], vec![prize("p1", 10)]);
    let mut rng = seeded_rng(4);

    for _ in 0..3 {
        start(&mut session, &mut NoopObserver).expect("start");
        stop(&mut session, &mut rng, &mut NoopObserver).expect("stop");
    }
    start(&mut session, &mut NoopObserver).expect("start");
    let err = stop(&mut session, &mut rng, &mut NoopObserver).expect_err("exhausted");

    assert_eq!(err, DrawError::NoEligibleParticipants);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.ledger().total(), 3);
    assert_eq!(session.remaining_slots("p1"), 7);
    assert_consistent(&session);
}

#[test]
fn imported_roster_replaces_pool_but_keeps_winners() {
    let mut session = session_with(&["a", "b"], vec![prize("p1", 1), prize("p2", 5)]);
    let mut rng = seeded_rng(8);
    start(&mut session, &mut NoopObserver).expect("start");
    let first = stop(&mut session, &mut rng, &mut NoopObserver).expect("stop");

    let imported = import_roster("工号,姓名\nx1,Xi\nx2,Yu\n".as_bytes()).expect("import");
    assert_eq!(session.replace_roster(imported).expect("replace"), 2);
    session.switch_prize("p2").expect("switch");

    let mut drawn = Vec::new();
    for _ in 0..2 {
        start(&mut session, &mut NoopObserver).expect("start");
        drawn.push(stop(&mut session, &mut rng, &mut NoopObserver).expect("stop").id);
    }
    drawn.sort();

    assert_eq!(drawn, vec!["x1", "x2"]);
    assert!(session.ledger().has_won(&first.id));
    assert_eq!(session.ledger().total(), 3);
    assert_consistent(&session);
}

#[test]
fn edits_are_refused_while_spinning() {
    let mut session = session_with(&["a", "b"], vec![prize("p1", 1), prize("p2", 1)]);
    start(&mut session, &mut NoopObserver).expect("start");

    assert_eq!(session.switch_prize("p2"), Err(DrawError::DrawInProgress));
    assert_eq!(session.reset_winners(), Err(DrawError::DrawInProgress));
    assert_eq!(session.rig("p1", "a"), Err(DrawError::DrawInProgress));
    assert_eq!(
        start(&mut session, &mut NoopObserver),
        Err(DrawError::AlreadySpinning)
    );
    assert_eq!(session.phase(), Phase::Spinning);
}
