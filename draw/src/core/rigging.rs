//! Per-prize designated winners.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prize id to an ordered list of participant ids that must win first.
///
/// Lists for different prizes may overlap; an entry whose participant has
/// already won anything is skipped at selection time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiggingTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl RiggingTable {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Designated ids for a prize, in priority order.
    pub fn for_prize(&self, prize_id: &str) -> &[String] {
        self.entries.get(prize_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append `participant_id` to the prize's list. Returns false if already present.
    pub fn add(&mut self, prize_id: &str, participant_id: &str) -> bool {
        let list = self.entries.entry(prize_id.to_string()).or_default();
        if list.iter().any(|id| id == participant_id) {
            return false;
        }
        list.push(participant_id.to_string());
        true
    }

    /// Remove `participant_id` from the prize's list. Returns false if it was absent.
    pub fn remove(&mut self, prize_id: &str, participant_id: &str) -> bool {
        let Some(list) = self.entries.get_mut(prize_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|id| id != participant_id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(prize_id);
        }
        removed
    }

    pub fn clear_prize(&mut self, prize_id: &str) {
        self.entries.remove(prize_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(prize, ids)| (prize.as_str(), ids.as_slice()))
    }
}
