//! Build a ready-to-draw session from configuration.

use anyhow::{Context, Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::core::catalog::PrizeCatalog;
use crate::core::rigging::RiggingTable;
use crate::core::roster::Roster;
use crate::core::session::Session;
use crate::io::config::DrawConfig;
use crate::io::import::read_roster_file;
use crate::seed::mock_participants;

/// RNG for authoritative draws: seeded when the config pins a seed.
pub fn draw_rng(cfg: &DrawConfig) -> StdRng {
    match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Assemble roster, catalog, and rigging from `cfg`.
///
/// The roster comes from `roster_path` when set, otherwise a mock roster of
/// `mock_participants` people is generated with `rng`. Rigging entries naming
/// unknown participants are kept but logged; they are skipped at draw time.
pub fn build_session<R: Rng + ?Sized>(cfg: &DrawConfig, rng: &mut R) -> Result<Session> {
    let participants = match &cfg.roster_path {
        Some(path) => read_roster_file(path)?,
        None => mock_participants(cfg.mock_participants, rng),
    };
    let roster = Roster::new(participants).map_err(|err| anyhow!("roster: {err}"))?;
    let catalog = PrizeCatalog::new(cfg.prizes.clone()).context("prize catalog")?;
    let rigging = RiggingTable::new(cfg.rigging.clone());
    for (prize_id, ids) in rigging.iter() {
        for id in ids.iter().filter(|id| roster.get(id).is_none()) {
            warn!(prize_id, participant_id = %id, "rigged participant not in roster");
        }
    }
    info!(
        participants = roster.len(),
        prizes = catalog.prizes().len(),
        "session ready"
    );
    Ok(Session::new(roster, catalog, rigging).with_tick_interval(cfg.tick_interval()))
}
