//! Shared deterministic types for the draw engine.
//!
//! These types define stable contracts between core components. They carry no
//! I/O and serialize to the same shapes the config and export layers use.

use serde::{Deserialize, Serialize};

/// A person eligible to win. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// A prize with a fixed number of winner slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub id: String,
    pub name: String,
    /// Number of winner slots (always >= 1).
    pub count: u32,
    /// Display rank; 1 is the grand prize.
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Observable phase of the draw state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No draw running; the slot check gates `start`.
    Idle,
    /// A draw is visually in progress; selection has not run yet.
    Spinning,
    /// A winner was committed for this round.
    Revealed,
}

/// Winner progress for one prize, as shown in a prize selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeProgress {
    pub prize_id: String,
    pub won: u32,
    pub count: u32,
}

impl PrizeProgress {
    pub fn remaining(&self) -> u32 {
        self.count.saturating_sub(self.won)
    }

    pub fn is_complete(&self) -> bool {
        self.won >= self.count
    }
}

/// One exported row: a single winner of a single prize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerRow {
    #[serde(rename = "奖项")]
    pub prize: String,
    #[serde(rename = "姓名")]
    pub name: String,
    #[serde(rename = "部门")]
    pub department: String,
    #[serde(rename = "工号")]
    pub id: String,
}
