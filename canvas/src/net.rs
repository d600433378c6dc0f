//! Inbound frame application.
//!
//! DESIGN
//! ======
//! Maps server frames onto engine state changes. Parsing is tolerant: a
//! frame with missing or malformed fields is silently skipped rather than
//! surfaced — the view degrades by ignoring the event. Handlers only mutate
//! in-memory state; drawing happens exclusively on the render tick.

#[cfg(test)]
#[path = "net_test.rs"]
mod net_test;

use frames::frame::Frame;
use frames::participant::Participant;
use frames::stroke::{CommittedStroke, Point, Tool};
use uuid::Uuid;

use crate::engine::EngineCore;
use crate::replica::LiveStroke;

/// Apply one inbound server frame to the engine.
pub fn apply_frame(core: &mut EngineCore, frame: &Frame) {
    match frame.syscall.as_str() {
        "session:init" => apply_init(core, frame),
        "presence:join" => apply_join(core, frame),
        "presence:part" => apply_part(core, frame),
        "cursor:moved" => apply_cursor(core, frame),
        "draw:start" => apply_draw_start(core, frame),
        "draw:continue" => apply_draw_continue(core, frame),
        "stroke:added" => apply_stroke_added(core, frame),
        "history:updated" => apply_history_updated(core, frame),
        // Acks and unknown notifications carry no replica changes.
        _ => {}
    }
}

// =============================================================================
// FIELD EXTRACTION
// =============================================================================

fn author_id(frame: &Frame) -> Option<Uuid> {
    frame
        .data
        .get("author_id")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
}

fn xy(frame: &Frame) -> Option<Point> {
    let x = frame.data.get("x").and_then(serde_json::Value::as_f64)?;
    let y = frame.data.get("y").and_then(serde_json::Value::as_f64)?;
    Some(Point::new(x, y))
}

fn field<T: serde::de::DeserializeOwned>(frame: &Frame, key: &str) -> Option<T> {
    frame
        .data
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
}

// =============================================================================
// HANDLERS
// =============================================================================

fn apply_init(core: &mut EngineCore, frame: &Frame) {
    let Some(this) = field::<Participant>(frame, "self") else {
        return;
    };
    let participants = field::<Vec<Participant>>(frame, "participants").unwrap_or_default();
    let history = field::<Vec<CommittedStroke>>(frame, "history").unwrap_or_default();
    core.apply_init(this, participants, history);
}

fn apply_join(core: &mut EngineCore, frame: &Frame) {
    if let Some(participant) = field::<Participant>(frame, "participant") {
        core.apply_participant_joined(participant);
    }
}

fn apply_part(core: &mut EngineCore, frame: &Frame) {
    if let Some(id) = author_id(frame) {
        core.apply_participant_left(&id);
    }
}

fn apply_cursor(core: &mut EngineCore, frame: &Frame) {
    let Some(id) = author_id(frame) else {
        return;
    };
    let Some(point) = xy(frame) else {
        return;
    };
    core.apply_cursor_update(&id, point.x, point.y);
}

fn apply_draw_start(core: &mut EngineCore, frame: &Frame) {
    let Some(id) = author_id(frame) else {
        return;
    };
    let Some(tool) = field::<Tool>(frame, "tool") else {
        return;
    };
    let Some(point) = field::<Point>(frame, "point") else {
        return;
    };
    let color = frame
        .data
        .get("color")
        .and_then(|v| v.as_str())
        .unwrap_or("#ffffff")
        .to_owned();
    let width = frame
        .data
        .get("width")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(5.0);

    core.apply_remote_draw_start(LiveStroke { author_id: id, tool, color, width, points: vec![point] });
}

fn apply_draw_continue(core: &mut EngineCore, frame: &Frame) {
    let Some(id) = author_id(frame) else {
        return;
    };
    let Some(point) = xy(frame) else {
        return;
    };
    core.apply_remote_draw_continue(&id, point);
}

fn apply_stroke_added(core: &mut EngineCore, frame: &Frame) {
    if let Some(stroke) = field::<CommittedStroke>(frame, "stroke") {
        core.apply_stroke_added(stroke);
    }
}

fn apply_history_updated(core: &mut EngineCore, frame: &Frame) {
    if let Some(strokes) = field::<Vec<CommittedStroke>>(frame, "strokes") {
        core.apply_history_update(strokes);
    }
}
