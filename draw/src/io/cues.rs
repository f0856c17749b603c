//! Audio cue and celebration hooks for terminal sessions.
//!
//! Cues are fire-and-forget: a failed write is logged and the draw carries on.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::draw::DrawObserver;
use crate::core::types::{Participant, Prize};
use crate::io::config::AudioConfig;

const BELL: &str = "\x07";

/// A configured audio asset is not available; that cue stays silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAudioDependency {
    pub cue: Cue,
    pub path: PathBuf,
}

impl fmt::Display for MissingAudioDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cue asset {} not found; continuing without it",
            self.cue,
            self.path.display()
        )
    }
}

impl std::error::Error for MissingAudioDependency {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Spin,
    Win,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spin => write!(f, "spin"),
            Self::Win => write!(f, "win"),
        }
    }
}

/// Available cue assets plus the mute switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioCues {
    spin: Option<PathBuf>,
    win: Option<PathBuf>,
    muted: bool,
}

impl AudioCues {
    /// Keep only assets that exist on disk, reporting the rest.
    pub fn load(cfg: &AudioConfig) -> (Self, Vec<MissingAudioDependency>) {
        let mut missing = Vec::new();
        let mut check = |cue: Cue, path: &Option<PathBuf>| -> Option<PathBuf> {
            let path = path.as_ref()?;
            if path.exists() {
                return Some(path.clone());
            }
            missing.push(MissingAudioDependency {
                cue,
                path: path.clone(),
            });
            None
        };
        let cues = Self {
            spin: check(Cue::Spin, &cfg.spin),
            win: check(Cue::Win, &cfg.win),
            muted: cfg.muted,
        };
        (cues, missing)
    }

    pub fn asset(&self, cue: Cue) -> Option<&Path> {
        match cue {
            Cue::Spin => self.spin.as_deref(),
            Cue::Win => self.win.as_deref(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute; returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn audible(&self, cue: Cue) -> Option<&Path> {
        if self.muted {
            return None;
        }
        self.asset(cue)
    }
}

/// Observer that rings the terminal bell for cues and prints a celebration
/// line when a winner is revealed.
pub struct TerminalCues<W: Write> {
    audio: AudioCues,
    out: W,
}

impl<W: Write> TerminalCues<W> {
    pub fn new(audio: AudioCues, out: W) -> Self {
        Self { audio, out }
    }

    pub fn audio_mut(&mut self) -> &mut AudioCues {
        &mut self.audio
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn play(&mut self, cue: Cue) {
        let Some(asset) = self.audio.audible(cue) else {
            return;
        };
        debug!(%cue, asset = %asset.display(), "cue");
        self.emit(BELL);
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            warn!(error = %err, "cue output failed");
        }
    }
}

impl<W: Write> DrawObserver for TerminalCues<W> {
    fn on_spin_start(&mut self, _prize: &Prize) {
        self.play(Cue::Spin);
    }

    fn on_winner_revealed(&mut self, prize: &Prize, winner: &Participant) {
        self.play(Cue::Win);
        let icon = prize.image.as_deref().unwrap_or("🎉");
        self.emit(&format!("🎉 {icon} {} → {}\n", prize.name, winner.name));
    }
}
