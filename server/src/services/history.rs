//! History engine — the single source of truth for committed strokes.
//!
//! DESIGN
//! ======
//! One fully sequential writer: every call happens under the room's write
//! lock, so the history and the redo buffer can never interleave. Undo and
//! redo operate on one shared timeline regardless of which participant
//! authored the most recent stroke — a deliberate product choice, not
//! per-user stacks.
//!
//! A stroke id lives in at most one of history / redo buffer at any time,
//! and the sequence counter never rewinds, so ids stay unique even across
//! undo → commit → redo interleavings.

use std::time::{SystemTime, UNIX_EPOCH};

use frames::frame::ErrorCode;
use frames::stroke::{CommittedStroke, DraftStroke};
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("stroke has no points")]
    InvalidStroke,
}

impl ErrorCode for HistoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStroke => "E_INVALID_STROKE",
        }
    }
}

/// Committed stroke history plus the redo buffer.
pub struct HistoryEngine {
    history: Vec<CommittedStroke>,
    redo: Vec<CommittedStroke>,
    next_seq: u64,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl HistoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self { history: Vec::new(), redo: Vec::new(), next_seq: 0 }
    }

    /// Make a draft stroke permanent: assign the next sequence id and a
    /// wall-clock timestamp, append to history, and clear the redo buffer
    /// unconditionally. Returns the materialized stroke for fan-out.
    ///
    /// This is the only path by which a stroke becomes permanent.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::InvalidStroke` if the draft has no points.
    pub fn commit(&mut self, draft: DraftStroke, author_id: Uuid) -> Result<CommittedStroke, HistoryError> {
        if draft.points.is_empty() {
            return Err(HistoryError::InvalidStroke);
        }

        let stroke = CommittedStroke {
            id: self.next_seq,
            tool: draft.tool,
            color: draft.color,
            width: draft.width,
            points: draft.points,
            ts: now_ms(),
            author_id,
        };
        self.next_seq += 1;
        self.history.push(stroke.clone());
        self.redo.clear();
        Ok(stroke)
    }

    /// Move the most recent stroke onto the redo buffer. Returns false (and
    /// changes nothing) when the history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(stroke) = self.history.pop() else {
            return false;
        };
        self.redo.push(stroke);
        true
    }

    /// Restore the most recently undone stroke. Returns false (and changes
    /// nothing) when the redo buffer is empty.
    pub fn redo(&mut self) -> bool {
        let Some(stroke) = self.redo.pop() else {
            return false;
        };
        self.history.push(stroke);
        true
    }

    /// Read-only view of the committed history, in commit order. Used for
    /// the initial sync of a new participant and the full rebroadcast after
    /// undo/redo.
    #[must_use]
    pub fn snapshot(&self) -> &[CommittedStroke] {
        &self.history
    }

    /// Number of strokes currently available to redo.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

impl Default for HistoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
