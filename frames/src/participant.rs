//! Participant wire shape.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stroke::Point;

/// One connected drawing session as seen on the wire.
///
/// Owned by the server-side registry; the history engine only references
/// participants by their opaque id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Transport connection id, also used as the stroke `author_id`.
    pub id: Uuid,
    /// Display color assigned once at connection from a fixed palette.
    pub color: String,
    /// Last known pointer position in canvas-local coordinates.
    pub cursor: Point,
}
