//! Interactive operator console for `draw session`.
//!
//! Reads one command per line and applies it to the in-memory [`Session`].
//! Refused commands print a notice and leave the session unchanged; only I/O
//! failures on the console streams end the loop.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{debug, warn};

use crate::core::draw::{start, stop, tick};
use crate::core::error::DrawError;
use crate::core::export::EmptyExportWarning;
use crate::core::session::Session;
use crate::core::types::{Phase, Prize};
use crate::io::cues::TerminalCues;
use crate::io::export::export_winners;
use crate::io::import::{ImportParseError, MissingSpreadsheetDependency, read_roster_file};

const HELP: &str = "\
commands:
  status                         phase, active prize, and prize progress
  use <prize>                    switch the active prize
  start | stop | draw            spin, reveal, or both
                                 (each command shows a new frame while spinning)
  winners [prize]                list recorded winners
  roster                         roster size and first entries
  import <path>                  replace the roster from .xlsx/.xls/.csv
  export [path]                  write the winner list
  prize add <id> <count> <name>  append a prize
  prize edit <id> <count> <name> change a prize's slots and name
  prize remove <id>              delete a prize
  rig <prize> <participant>      designate a winner
  unrig <prize> <participant>    remove a designation
  rigging                        list designations
  reset                          clear all winners (asks to confirm)
  mute                           toggle audio cues
  help | quit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Status,
    Use(String),
    Start,
    Stop,
    Draw,
    Winners(Option<String>),
    Roster,
    Import(PathBuf),
    Export(Option<PathBuf>),
    PrizeAdd { id: String, count: u32, name: String },
    PrizeEdit { id: String, count: u32, name: String },
    PrizeRemove(String),
    Rig { prize: String, participant: String },
    Unrig { prize: String, participant: String },
    Rigging,
    Reset,
    Mute,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let command = match (head, rest.as_slice()) {
        ("help" | "?", []) => ConsoleCommand::Help,
        ("status", []) => ConsoleCommand::Status,
        ("use", [prize]) => ConsoleCommand::Use(prize.to_string()),
        ("start", []) => ConsoleCommand::Start,
        ("stop", []) => ConsoleCommand::Stop,
        ("draw", []) => ConsoleCommand::Draw,
        ("winners", []) => ConsoleCommand::Winners(None),
        ("winners", [prize]) => ConsoleCommand::Winners(Some(prize.to_string())),
        ("roster", []) => ConsoleCommand::Roster,
        ("import", [_, ..]) => ConsoleCommand::Import(PathBuf::from(rest.join(" "))),
        ("export", []) => ConsoleCommand::Export(None),
        ("export", [_, ..]) => ConsoleCommand::Export(Some(PathBuf::from(rest.join(" ")))),
        ("prize", ["add", id, count, name @ ..]) if !name.is_empty() => ConsoleCommand::PrizeAdd {
            id: id.to_string(),
            count: parse_count(count)?,
            name: name.join(" "),
        },
        ("prize", ["edit", id, count, name @ ..]) if !name.is_empty() => {
            ConsoleCommand::PrizeEdit {
                id: id.to_string(),
                count: parse_count(count)?,
                name: name.join(" "),
            }
        }
        ("prize", ["remove", id]) => ConsoleCommand::PrizeRemove(id.to_string()),
        ("rig", [prize, participant]) => ConsoleCommand::Rig {
            prize: prize.to_string(),
            participant: participant.to_string(),
        },
        ("unrig", [prize, participant]) => ConsoleCommand::Unrig {
            prize: prize.to_string(),
            participant: participant.to_string(),
        },
        ("rigging", []) => ConsoleCommand::Rigging,
        ("reset", []) => ConsoleCommand::Reset,
        ("mute", []) => ConsoleCommand::Mute,
        ("quit" | "exit", []) => ConsoleCommand::Quit,
        _ => return Err(format!("unrecognized command: {}", line.trim())),
    };
    Ok(Some(command))
}

fn parse_count(raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| format!("count must be a whole number, got '{raw}'"))
}

/// Console state: the session plus everything needed to drive it.
pub struct Console<'a, D: Rng, F: Rng, E: Write> {
    pub session: &'a mut Session,
    pub draw_rng: D,
    pub frame_rng: F,
    pub cues: TerminalCues<E>,
    pub export_path: PathBuf,
}

impl<D: Rng, F: Rng, E: Write> Console<'_, D, F, E> {
    /// Process commands from `input` until EOF or `quit`.
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W) -> Result<()> {
        let mut lines = input.lines();
        write!(out, "> ").context("write prompt")?;
        out.flush().context("flush prompt")?;
        while let Some(line) = lines.next() {
            let line = line.context("read console input")?;
            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(ConsoleCommand::Quit)) => break,
                Ok(Some(ConsoleCommand::Reset)) => {
                    writeln!(out, "type 'yes' to clear every recorded winner")?;
                    let confirmed = match lines.next() {
                        Some(answer) => answer.context("read confirmation")?.trim() == "yes",
                        None => false,
                    };
                    self.reset(confirmed, out)?;
                }
                Ok(Some(command)) => self.apply(command, out)?,
                Err(msg) => writeln!(out, "! {msg} (try 'help')")?,
            }
            write!(out, "> ")?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Apply a single command. Refusals are reported to `out`, not returned.
    pub fn apply<W: Write>(&mut self, command: ConsoleCommand, out: &mut W) -> Result<()> {
        debug!(?command, "console command");
        self.refresh_spin(out)?;
        match command {
            ConsoleCommand::Help => writeln!(out, "{HELP}")?,
            ConsoleCommand::Status => self.print_status(out)?,
            ConsoleCommand::Use(prize_id) => match self.session.switch_prize(&prize_id) {
                Ok(()) => writeln!(out, "active prize: {prize_id}")?,
                Err(err) => notice(out, &err)?,
            },
            ConsoleCommand::Start => {
                self.start(out)?;
            }
            ConsoleCommand::Stop => self.stop(out)?,
            ConsoleCommand::Draw => {
                if self.start(out)? {
                    self.stop(out)?;
                }
            }
            ConsoleCommand::Winners(prize_id) => self.print_winners(prize_id.as_deref(), out)?,
            ConsoleCommand::Roster => self.print_roster(out)?,
            ConsoleCommand::Import(path) => self.import(path, out)?,
            ConsoleCommand::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                self.export(path, out)?;
            }
            ConsoleCommand::PrizeAdd { id, count, name } => {
                let level = u32::try_from(self.session.catalog().prizes().len() + 1)
                    .unwrap_or(u32::MAX);
                let prize = Prize {
                    id: id.clone(),
                    name,
                    count,
                    level,
                    image: Some("🎁".to_string()),
                };
                match self.session.add_prize(prize) {
                    Ok(()) => writeln!(out, "added prize {id}")?,
                    Err(err) => notice(out, &err)?,
                }
            }
            ConsoleCommand::PrizeEdit { id, count, name } => {
                let Some(existing) = self.session.catalog().get(&id).cloned() else {
                    return notice(out, &DrawError::UnknownPrize(id));
                };
                let edited = Prize {
                    count,
                    name,
                    ..existing
                };
                match self.session.update_prize(edited) {
                    Ok(()) => writeln!(out, "updated prize {id}")?,
                    Err(err) => notice(out, &err)?,
                }
            }
            ConsoleCommand::PrizeRemove(id) => match self.session.remove_prize(&id) {
                Ok(removed) => writeln!(out, "removed prize {} ({})", removed.id, removed.name)?,
                Err(err) => notice(out, &err)?,
            },
            ConsoleCommand::Rig { prize, participant } => {
                match self.session.rig(&prize, &participant) {
                    Ok(true) => writeln!(out, "rigged {participant} for {prize}")?,
                    Ok(false) => writeln!(out, "{participant} already rigged for {prize}")?,
                    Err(err) => notice(out, &err)?,
                }
            }
            ConsoleCommand::Unrig { prize, participant } => {
                match self.session.unrig(&prize, &participant) {
                    Ok(true) => writeln!(out, "unrigged {participant} for {prize}")?,
                    Ok(false) => writeln!(out, "{participant} was not rigged for {prize}")?,
                    Err(err) => notice(out, &err)?,
                }
            }
            ConsoleCommand::Rigging => {
                for (prize_id, ids) in self.session.rigging().iter() {
                    writeln!(out, "{prize_id}: {}", ids.join(", "))?;
                }
            }
            ConsoleCommand::Reset => {
                writeln!(out, "! reset needs confirmation: enter 'reset' at the prompt, then 'yes'")?;
            }
            ConsoleCommand::Mute => {
                let muted = self.cues.audio_mut().toggle_mute();
                writeln!(out, "audio {}", if muted { "muted" } else { "on" })?;
            }
            ConsoleCommand::Quit => {}
        }
        Ok(())
    }

    /// Returns whether the session is now spinning.
    fn start<W: Write>(&mut self, out: &mut W) -> Result<bool> {
        if let Err(err) = start(self.session, &mut self.cues) {
            notice(out, &err)?;
            return Ok(false);
        }
        let prize = self
            .session
            .active_prize()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        writeln!(out, "spinning for {prize} ...")?;
        self.refresh_spin(out)?;
        Ok(true)
    }

    /// Show the next spin frame if one is due. No-op unless spinning.
    fn refresh_spin<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if let Some(frame) = tick(self.session, Instant::now(), &mut self.frame_rng) {
            writeln!(out, "  ~ {}", frame.name)?;
        }
        Ok(())
    }

    fn stop<W: Write>(&mut self, out: &mut W) -> Result<()> {
        match stop(self.session, &mut self.draw_rng, &mut self.cues) {
            Ok(winner) => {
                let department = winner.department.as_deref().unwrap_or("-");
                writeln!(out, "winner: {} [{}] ({})", winner.name, winner.id, department)?;
            }
            Err(DrawError::NoEligibleParticipants) => {
                writeln!(out, "! no more participants to draw")?;
            }
            Err(err) => notice(out, &err)?,
        }
        Ok(())
    }

    fn reset<W: Write>(&mut self, confirmed: bool, out: &mut W) -> Result<()> {
        if !confirmed {
            writeln!(out, "reset cancelled")?;
            return Ok(());
        }
        match self.session.reset_winners() {
            Ok(()) => writeln!(out, "all winners cleared")?,
            Err(err) => notice(out, &err)?,
        }
        Ok(())
    }

    fn import<W: Write>(&mut self, path: PathBuf, out: &mut W) -> Result<()> {
        if self.session.phase() == Phase::Spinning {
            return notice(out, &DrawError::DrawInProgress);
        }
        let participants = match read_roster_file(&path) {
            Ok(participants) => participants,
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "import failed");
                if err.downcast_ref::<MissingSpreadsheetDependency>().is_some()
                    || err.downcast_ref::<ImportParseError>().is_some()
                {
                    writeln!(out, "! {err:#}; roster unchanged")?;
                } else {
                    writeln!(out, "! cannot read {}: {err:#}", path.display())?;
                }
                return Ok(());
            }
        };
        match self.session.replace_roster(participants) {
            Ok(count) => writeln!(out, "imported {count} participants")?,
            Err(err) => notice(out, &err)?,
        }
        Ok(())
    }

    fn export<W: Write>(&mut self, path: PathBuf, out: &mut W) -> Result<()> {
        match export_winners(self.session, &path) {
            Ok(rows) => writeln!(out, "exported {rows} winners to {}", path.display())?,
            Err(err) if err.downcast_ref::<EmptyExportWarning>().is_some() => {
                writeln!(out, "! {err}")?;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "export failed");
                writeln!(out, "! export failed: {err:#}")?;
            }
        }
        Ok(())
    }

    fn print_status<W: Write>(&self, out: &mut W) -> Result<()> {
        let phase = match self.session.phase() {
            Phase::Idle => "idle",
            Phase::Spinning => "spinning",
            Phase::Revealed => "revealed",
        };
        let active = self.session.active_prize_id().unwrap_or("-");
        writeln!(
            out,
            "phase: {phase}  active: {active}  participants: {}  winners: {}",
            self.session.roster().len(),
            self.session.ledger().total()
        )?;
        for progress in self.session.all_progress() {
            let marker = if Some(progress.prize_id.as_str()) == self.session.active_prize_id() {
                "*"
            } else {
                " "
            };
            let done = if progress.is_complete() { " done" } else { "" };
            writeln!(
                out,
                "{marker} {} {}/{}{done}",
                progress.prize_id, progress.won, progress.count
            )?;
        }
        if let Some(shown) = self.session.display() {
            writeln!(out, "on stage: {}", shown.name)?;
        }
        Ok(())
    }

    fn print_winners<W: Write>(&self, prize_id: Option<&str>, out: &mut W) -> Result<()> {
        let prizes: Vec<&Prize> = match prize_id {
            Some(id) => match self.session.catalog().get(id) {
                Some(prize) => vec![prize],
                None => return notice(out, &DrawError::UnknownPrize(id.to_string())),
            },
            None => self.session.catalog().prizes().iter().collect(),
        };
        for prize in prizes {
            let winners = self.session.ledger().winners(&prize.id);
            let names: Vec<&str> = winners.iter().map(|w| w.name.as_str()).collect();
            writeln!(
                out,
                "{} ({}/{}): {}",
                prize.name,
                winners.len(),
                prize.count,
                names.join(", ")
            )?;
        }
        Ok(())
    }

    fn print_roster<W: Write>(&self, out: &mut W) -> Result<()> {
        const PREVIEW: usize = 10;
        let participants = self.session.roster().participants();
        writeln!(out, "{} participants", participants.len())?;
        for p in participants.iter().take(PREVIEW) {
            writeln!(
                out,
                "  {} {} {}",
                p.id,
                p.name,
                p.department.as_deref().unwrap_or("")
            )?;
        }
        if participants.len() > PREVIEW {
            writeln!(out, "  ... and {} more", participants.len() - PREVIEW)?;
        }
        Ok(())
    }
}

fn notice<W: Write>(out: &mut W, err: &DrawError) -> Result<()> {
    writeln!(out, "! {err}")?;
    Ok(())
}
