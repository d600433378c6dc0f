//! Top-level engine: network intake, pointer input, and the render tick.
//!
//! DESIGN
//! ======
//! Two independent clocks drive a participant's view: asynchronous network
//! events and a fixed-rate render tick. Network handlers (`apply_*`) only
//! mutate in-memory state — they never draw — and the render tick never
//! blocks on the network. The two meet only through the replica and its
//! dirty flag.
//!
//! `EngineCore` holds all logic that doesn't depend on the canvas element,
//! separated from `Engine` so it can be tested without WASM/browser
//! dependencies.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;

use frames::participant::Participant;
use frames::stroke::{CommittedStroke, DraftStroke, Point, Tool};
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::render;
use crate::replica::{LiveStroke, Replica};

/// Events returned from input handlers for the host to transmit.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Broadcast the pointer position. Sent on every move, drawing or not.
    EmitCursorMove { x: f64, y: f64 },
    /// Announce a newly opened stroke to peers.
    EmitDrawStart { tool: Tool, color: String, width: f64, point: Point },
    /// Extend the open stroke.
    EmitDrawContinue { x: f64, y: f64 },
    /// Submit the completed draft for commit.
    EmitDrawEnd(DraftStroke),
}

// =============================================================================
// CORE
// =============================================================================

/// Core engine state — all logic that doesn't depend on the canvas element.
pub struct EngineCore {
    pub replica: Replica,
    /// Connected participants keyed by id, mirrored from presence events.
    participants: HashMap<Uuid, Participant>,
    /// This session's own participant id, known after `session:init`.
    self_id: Option<Uuid>,
    tool: Tool,
    color: String,
    width: f64,
    drawing: bool,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            replica: Replica::new(),
            participants: HashMap::new(),
            self_id: None,
            tool: Tool::Brush,
            color: "#ffffff".into(),
            width: 5.0,
            drawing: false,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Network inputs (mutate state only; drawing happens on the tick) ---

    /// Hydrate from the `session:init` payload.
    pub fn apply_init(
        &mut self,
        this: Participant,
        participants: Vec<Participant>,
        history: Vec<CommittedStroke>,
    ) {
        self.self_id = Some(this.id);
        self.participants = participants.into_iter().map(|p| (p.id, p)).collect();
        self.replica.set_history(history);
    }

    /// Apply a commit broadcast: retire the author's overlay stroke and
    /// extend the history replica.
    pub fn apply_stroke_added(&mut self, stroke: CommittedStroke) {
        self.replica.push_committed(stroke);
    }

    /// Apply a post-undo/redo full history rewrite.
    pub fn apply_history_update(&mut self, strokes: Vec<CommittedStroke>) {
        self.replica.set_history(strokes);
    }

    /// A remote author opened a stroke.
    pub fn apply_remote_draw_start(&mut self, stroke: LiveStroke) {
        self.replica.open_live(stroke);
    }

    /// A remote author extended its open stroke.
    pub fn apply_remote_draw_continue(&mut self, author_id: &Uuid, point: Point) {
        self.replica.extend_live(author_id, point);
    }

    /// Track a remote pointer. Unknown authors are ignored.
    pub fn apply_cursor_update(&mut self, author_id: &Uuid, x: f64, y: f64) {
        if let Some(participant) = self.participants.get_mut(author_id) {
            participant.cursor = Point::new(x, y);
        }
    }

    pub fn apply_participant_joined(&mut self, participant: Participant) {
        self.participants.insert(participant.id, participant);
    }

    /// Presence loss also discards the author's open live stroke — nothing
    /// else will ever close it.
    pub fn apply_participant_left(&mut self, id: &Uuid) {
        self.participants.remove(id);
        self.replica.drop_live(id);
    }

    // --- Tool state ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    // --- Pointer input, in canvas-local coordinates ---

    /// Begin the local stroke.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Vec<Action> {
        let point = Point::new(x, y);
        // The eraser's color field is cosmetic; pin it so every replica
        // carries the same bytes for the stroke.
        let color = match self.tool {
            Tool::Eraser => "#000000".to_string(),
            Tool::Brush => self.color.clone(),
        };
        self.replica
            .begin_local(DraftStroke::new(self.tool, color.clone(), self.width, point));
        self.drawing = true;
        vec![Action::EmitDrawStart { tool: self.tool, color, width: self.width, point }]
    }

    /// Track pointer movement; extends the open stroke while drawing.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<Action> {
        let mut actions = vec![Action::EmitCursorMove { x, y }];
        if self.drawing {
            self.replica.extend_local(Point::new(x, y));
            actions.push(Action::EmitDrawContinue { x, y });
        }
        actions
    }

    /// Finish the local stroke and hand the draft off for commit. The stroke
    /// reappears from history once the server's `stroke:added` lands.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        if !self.drawing {
            return Vec::new();
        }
        self.drawing = false;
        match self.replica.finish_local() {
            Some(draft) => vec![Action::EmitDrawEnd(draft)],
            None => Vec::new(),
        }
    }

    // --- Viewport ---

    /// Record the CSS viewport size and device pixel ratio. Forces a history
    /// repaint: resizing wipes the backing buffers.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.dpr = dpr;
        self.replica.mark_dirty();
    }

    // --- Queries ---

    /// This session's participant id, once initialized.
    #[must_use]
    pub fn self_id(&self) -> Option<Uuid> {
        self.self_id
    }

    /// Whether a local stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Look up a participant by id.
    #[must_use]
    pub fn participant(&self, id: &Uuid) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// All known participants, in no particular order. Consumed by the host
    /// to render avatars and remote cursors.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// The full reconciliation engine. Wraps [`EngineCore`] and owns the visible
/// canvas plus the offscreen history cache.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    history_canvas: HtmlCanvasElement,
    history_ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to the given visible canvas element and
    /// allocate the offscreen history buffer.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a 2D context or the offscreen element cannot be
    /// created.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let history_canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas element"))?;
        let history_ctx = context_2d(&history_canvas)?;
        Ok(Self { canvas, ctx, history_canvas, history_ctx, core: EngineCore::new() })
    }

    /// Resize both buffers for the given CSS size and device pixel ratio.
    /// Forces a history repaint on the next tick.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        let device_w = (width * dpr) as u32;
        let device_h = (height * dpr) as u32;
        self.canvas.set_width(device_w);
        self.canvas.set_height(device_h);
        self.history_canvas.set_width(device_w);
        self.history_canvas.set_height(device_h);
        self.core.set_viewport(width, height, dpr);
    }

    /// Composite one frame. Runs once per host animation tick; network
    /// handlers never call this.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any Canvas2D call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        render::draw_frame(&self.ctx, &self.history_ctx, &self.history_canvas, &mut self.core)
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("not a 2d context"))
}
