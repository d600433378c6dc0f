//! Local replica of the shared drawing state.
//!
//! DESIGN
//! ======
//! The replica merges two sources that tick independently: the committed
//! history mirrored from server broadcasts, and the transient overlay of
//! strokes still being drawn — the local draft plus at most one open
//! [`LiveStroke`] per remote author (a map keyed by participant id, never a
//! multiset). The dirty flag marks the cached rendering of committed history
//! stale; network handlers set it, and the next render tick consumes it
//! exactly once.

#[cfg(test)]
#[path = "replica_test.rs"]
mod replica_test;

use std::collections::HashMap;

use frames::stroke::{CommittedStroke, DraftStroke, Point, Tool};
use uuid::Uuid;

/// A not-yet-committed remote stroke, tracked so it can render before
/// completion. Mutable while open; discarded when the author's commit
/// notification arrives or the author disconnects.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStroke {
    pub author_id: Uuid,
    pub tool: Tool,
    pub color: String,
    pub width: f64,
    pub points: Vec<Point>,
}

/// Replica state for one rendering participant.
pub struct Replica {
    history: Vec<CommittedStroke>,
    live: HashMap<Uuid, LiveStroke>,
    local: Option<DraftStroke>,
    dirty: bool,
}

impl Replica {
    /// Create an empty replica. Starts dirty so the first tick paints the
    /// (empty) history cache.
    #[must_use]
    pub fn new() -> Self {
        Self { history: Vec::new(), live: HashMap::new(), local: None, dirty: true }
    }

    // --- Committed history ---

    /// Replace the whole history: initial sync and post-undo/redo rewrites.
    pub fn set_history(&mut self, strokes: Vec<CommittedStroke>) {
        self.history = strokes;
        self.dirty = true;
    }

    /// Append a committed stroke and retire the author's open live stroke in
    /// the same step, so the stroke is never drawn from both layers.
    pub fn push_committed(&mut self, stroke: CommittedStroke) {
        self.live.remove(&stroke.author_id);
        self.history.push(stroke);
        self.dirty = true;
    }

    /// The committed history, in commit order.
    #[must_use]
    pub fn history(&self) -> &[CommittedStroke] {
        &self.history
    }

    // --- Remote live strokes ---

    /// Open a live stroke for an author, replacing any prior open stroke for
    /// that author (a missed draw:end must not leak a stale overlay).
    pub fn open_live(&mut self, stroke: LiveStroke) {
        self.live.insert(stroke.author_id, stroke);
    }

    /// Append to an author's open stroke. Silently dropped when none is open
    /// (out-of-order or post-disconnect arrival).
    pub fn extend_live(&mut self, author_id: &Uuid, point: Point) {
        if let Some(stroke) = self.live.get_mut(author_id) {
            stroke.points.push(point);
        }
    }

    /// Discard an author's open stroke. No-op if none is open.
    pub fn drop_live(&mut self, author_id: &Uuid) {
        self.live.remove(author_id);
    }

    /// The open live stroke for an author, if any.
    #[must_use]
    pub fn live_stroke(&self, author_id: &Uuid) -> Option<&LiveStroke> {
        self.live.get(author_id)
    }

    /// All open remote strokes, in no particular order.
    pub fn live_strokes(&self) -> impl Iterator<Item = &LiveStroke> {
        self.live.values()
    }

    /// Number of open remote strokes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    // --- Local draft ---

    /// Begin the local in-progress stroke, replacing any leftover draft.
    pub fn begin_local(&mut self, draft: DraftStroke) {
        self.local = Some(draft);
    }

    /// Extend the local draft. No-op when no stroke is in progress.
    pub fn extend_local(&mut self, point: Point) {
        if let Some(draft) = &mut self.local {
            draft.points.push(point);
        }
    }

    /// Take the finished local draft for submission.
    pub fn finish_local(&mut self) -> Option<DraftStroke> {
        self.local.take()
    }

    /// The local in-progress stroke, if any.
    #[must_use]
    pub fn local(&self) -> Option<&DraftStroke> {
        self.local.as_ref()
    }

    // --- Dirty flag ---

    /// Consume the dirty flag. True means the history cache must be replayed
    /// before compositing this tick.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Force a history repaint on the next tick (viewport resize wipes the
    /// backing buffers without changing content).
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Default for Replica {
    fn default() -> Self {
        Self::new()
    }
}
