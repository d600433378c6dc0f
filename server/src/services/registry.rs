//! Participant registry — connected participants, display colors, cursors.
//!
//! DESIGN
//! ======
//! A pure lookup table keyed by connection id; no cross-component logic.
//! Display colors come from a fixed 12-entry palette chosen uniformly at
//! random. Collisions between active participants are allowed — the palette
//! is a hint, not a uniqueness constraint.

use std::collections::HashMap;

use frames::participant::Participant;
use frames::stroke::Point;
use rand::Rng;
use uuid::Uuid;

/// Fixed display palette assigned to joining participants.
pub const PALETTE: [&str; 12] = [
    "#FF5733", "#33FF57", "#3357FF", "#F333FF",
    "#33FFF3", "#F3FF33", "#FF3385", "#33FFB5",
    "#FF8C33", "#8C33FF", "#33FF8C", "#FF3333",
];

/// Connected participants keyed by connection id.
pub struct Registry {
    participants: HashMap<Uuid, Participant>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self { participants: HashMap::new() }
    }

    /// Register a participant under its connection id with a random palette
    /// color and the cursor at origin. Returns the created participant.
    pub fn add(&mut self, id: Uuid) -> Participant {
        let color = PALETTE[rand::rng().random_range(0..PALETTE.len())];
        let participant = Participant { id, color: color.to_string(), cursor: Point::default() };
        self.participants.insert(id, participant.clone());
        participant
    }

    /// Remove a participant. No-op if absent.
    pub fn remove(&mut self, id: &Uuid) {
        self.participants.remove(id);
    }

    /// Overwrite the last known cursor position. No-op for unknown ids — a
    /// cursor update can race a disconnect.
    pub fn update_cursor(&mut self, id: &Uuid, x: f64, y: f64) {
        if let Some(participant) = self.participants.get_mut(id) {
            participant.cursor = Point::new(x, y);
        }
    }

    /// Snapshot of connected participants. Order is not significant.
    #[must_use]
    pub fn list(&self) -> Vec<Participant> {
        self.participants.values().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<&Participant> {
        self.participants.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
