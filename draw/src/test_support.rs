//! Test-only helpers for constructing rosters, prizes, and sessions.

use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use crate::core::catalog::PrizeCatalog;
use crate::core::draw::DrawObserver;
use crate::core::rigging::RiggingTable;
use crate::core::roster::Roster;
use crate::core::session::Session;
use crate::core::types::{Participant, Prize};

/// Create a participant whose name is derived from its id.
pub fn participant(id: &str) -> Participant {
    Participant::new(id, format!("{} name", id))
}

/// Create participants in the given order.
pub fn participants(ids: &[&str]) -> Vec<Participant> {
    ids.iter().map(|id| participant(id)).collect()
}

/// Create a prize with deterministic name and level.
pub fn prize(id: &str, count: u32) -> Prize {
    Prize {
        id: id.to_string(),
        name: format!("{} prize", id),
        count,
        level: 1,
        image: None,
    }
}

/// Deterministic RNG for reproducible draws.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Idle session over the given participant ids and prizes, with no rigging.
pub fn session_with(ids: &[&str], prizes: Vec<Prize>) -> Session {
    let roster = Roster::new(participants(ids)).expect("test roster");
    let catalog = PrizeCatalog::new(prizes).expect("test catalog");
    Session::new(roster, catalog, RiggingTable::default())
}

/// Observer that records events as `spin:<prize>` and `win:<prize>:<participant>`.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<String>,
}

impl DrawObserver for RecordingObserver {
    fn on_spin_start(&mut self, prize: &Prize) {
        self.events.push(format!("spin:{}", prize.id));
    }

    fn on_winner_revealed(&mut self, prize: &Prize, winner: &Participant) {
        self.events.push(format!("win:{}:{}", prize.id, winner.id));
    }
}

/// Write `contents` to `name` inside a fresh temp dir.
///
/// The returned [`TempDir`] must be kept alive while the file is used.
pub fn temp_file(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    (dir, path)
}
