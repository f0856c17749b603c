//! Participant roster with replace-all semantics.

use std::collections::HashSet;

use crate::core::types::Participant;

/// The current list of participants, in import order.
///
/// There is no per-participant mutation: the whole list is swapped at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Build a roster, rejecting duplicate participant ids.
    pub fn new(participants: Vec<Participant>) -> Result<Self, String> {
        check_unique_ids(&participants)?;
        Ok(Self { participants })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Swap in a new participant list. On error the roster is untouched.
    pub fn replace(&mut self, participants: Vec<Participant>) -> Result<(), String> {
        check_unique_ids(&participants)?;
        self.participants = participants;
        Ok(())
    }
}

fn check_unique_ids(participants: &[Participant]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for participant in participants {
        if !seen.insert(participant.id.as_str()) {
            return Err(format!("duplicate participant id '{}'", participant.id));
        }
    }
    Ok(())
}
