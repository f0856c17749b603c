//! Headless draw loop for `draw run`.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use rand::Rng;
use tracing::{debug, info};

use crate::core::draw::{DrawObserver, start, stop, tick};
use crate::core::error::DrawError;
use crate::core::session::Session;
use crate::core::types::Participant;

/// Reason why `run_all` stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStop {
    /// Every prize in the catalog has all its winners.
    Complete,
    /// The roster ran out while `prize_id` still had open slots.
    Exhausted { prize_id: String, remaining: u32 },
}

/// Summary of a headless run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub draws: u32,
    pub stop: RunStop,
}

/// Spin pacing for each draw.
#[derive(Debug, Clone, Copy)]
pub struct SpinPlan {
    /// How long each spin runs before `stop`. Zero skips the animation.
    pub duration: Duration,
    /// Host refresh period between ticks.
    pub refresh: Duration,
}

impl SpinPlan {
    pub fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            refresh: Duration::ZERO,
        }
    }
}

/// Fill every open slot, prize by prize in catalog order.
///
/// Each draw goes through the normal `start -> tick* -> stop` transitions.
/// `draw_rng` decides winners; `frame_rng` only feeds the spin frames passed
/// to `on_frame`.
pub fn run_all<D, F, O, C>(
    session: &mut Session,
    draw_rng: &mut D,
    frame_rng: &mut F,
    observer: &mut O,
    plan: SpinPlan,
    mut on_frame: C,
) -> Result<RunOutcome>
where
    D: Rng + ?Sized,
    F: Rng + ?Sized,
    O: DrawObserver + ?Sized,
    C: FnMut(&Participant),
{
    let prize_ids: Vec<String> = session
        .catalog()
        .prizes()
        .iter()
        .map(|p| p.id.clone())
        .collect();

    let mut draws = 0u32;
    for prize_id in prize_ids {
        session.switch_prize(&prize_id)?;
        while session.remaining_slots(&prize_id) > 0 {
            start(session, observer)?;
            spin(session, frame_rng, plan, &mut on_frame);
            match stop(session, draw_rng, observer) {
                Ok(winner) => {
                    draws += 1;
                    debug!(prize_id, participant_id = %winner.id, "auto draw committed");
                }
                Err(DrawError::NoEligibleParticipants) => {
                    let remaining = session.remaining_slots(&prize_id);
                    info!(prize_id, remaining, draws, "roster exhausted");
                    return Ok(RunOutcome {
                        draws,
                        stop: RunStop::Exhausted {
                            prize_id,
                            remaining,
                        },
                    });
                }
                Err(err) => return Err(anyhow!(err).context(format!("draw for {prize_id}"))),
            }
        }
    }

    info!(draws, "all prizes drawn");
    Ok(RunOutcome {
        draws,
        stop: RunStop::Complete,
    })
}

fn spin<F, C>(session: &mut Session, frame_rng: &mut F, plan: SpinPlan, on_frame: &mut C)
where
    F: Rng + ?Sized,
    C: FnMut(&Participant),
{
    let began = Instant::now();
    loop {
        if let Some(frame) = tick(session, Instant::now(), frame_rng) {
            on_frame(frame);
        }
        if began.elapsed() >= plan.duration {
            break;
        }
        thread::sleep(plan.refresh);
    }
}
