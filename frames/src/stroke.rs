//! Stroke model: the shared unit of drawn data.
//!
//! A stroke is one continuous drawn path with a fixed tool, color, and
//! width. Clients submit [`DraftStroke`]s over the wire; the server's
//! history engine is the only place a draft becomes a [`CommittedStroke`]
//! with an assigned id and timestamp.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Drawing tool carried on a stroke.
///
/// The eraser is a tool variant, not a separate entity: it shares identity,
/// ordering, and undo/redo treatment with brush strokes and differs only in
/// blend semantics at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints with the stroke color using source-over blending.
    #[default]
    Brush,
    /// Clears pixels in the history buffer regardless of the carried color.
    Eraser,
}

/// A point in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A stroke as submitted by a client, before the history engine assigns
/// identity. `points` is append-only while the stroke is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftStroke {
    pub tool: Tool,
    pub color: String,
    pub width: f64,
    pub points: Vec<Point>,
}

impl DraftStroke {
    /// Start a draft at its first point.
    #[must_use]
    pub fn new(tool: Tool, color: impl Into<String>, width: f64, first: Point) -> Self {
        Self { tool, color: color.into(), width, points: vec![first] }
    }
}

/// A stroke the history engine has made permanent.
///
/// `id` is the commit sequence number and `ts` the wall-clock commit time in
/// milliseconds since the Unix epoch. Both are assigned at commit, never by
/// the originating client. Committed strokes are immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedStroke {
    /// Monotonically increasing commit sequence number.
    pub id: u64,
    pub tool: Tool,
    /// CSS color string. Cosmetic only for eraser strokes.
    pub color: String,
    /// Line width in canvas-local units.
    pub width: f64,
    /// Ordered path; always at least one point.
    pub points: Vec<Point>,
    /// Commit time, milliseconds since Unix epoch.
    pub ts: i64,
    /// Connection id of the participant that drew the stroke.
    pub author_id: Uuid,
}
