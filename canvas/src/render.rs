//! Rendering: composites the cached history with the live stroke overlay.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It reads engine state and produces
//! pixels; the only state it mutates is the dirty flag it consumes.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the
//! result.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use frames::stroke::{Point, Tool};

use crate::engine::EngineCore;

/// Composite one frame:
///
/// 1. clear the visible buffer;
/// 2. if the replica is dirty, replay the full history into the offscreen
///    cache in commit order (the performance-critical path — full replay
///    happens only on change, not every tick);
/// 3. composite the cache onto the visible buffer;
/// 4. draw the local in-progress stroke on top;
/// 5. draw every open remote stroke on top. Relative order among concurrent
///    authors is not significant.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    history_ctx: &CanvasRenderingContext2d,
    history_canvas: &HtmlCanvasElement,
    core: &mut EngineCore,
) -> Result<(), JsValue> {
    let w = core.viewport_width;
    let h = core.viewport_height;
    let dpr = core.dpr;

    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, w, h);

    if core.replica.take_dirty() {
        history_ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        history_ctx.clear_rect(0.0, 0.0, w, h);
        for stroke in core.replica.history() {
            stroke_path(history_ctx, stroke.tool, &stroke.color, stroke.width, &stroke.points)?;
        }
    }

    ctx.draw_image_with_html_canvas_element_and_dw_and_dh(history_canvas, 0.0, 0.0, w, h)?;

    if let Some(local) = core.replica.local() {
        stroke_path(ctx, local.tool, &local.color, local.width, &local.points)?;
    }

    for live in core.replica.live_strokes() {
        stroke_path(ctx, live.tool, &live.color, live.width, &live.points)?;
    }

    Ok(())
}

/// Stroke one connected polyline with round caps and joins, so width and
/// join style produce a continuous line with no gaps at interior points.
/// Strokes with fewer than two points draw nothing under line rendering but
/// still occupy their place in history.
fn stroke_path(
    ctx: &CanvasRenderingContext2d,
    tool: Tool,
    color: &str,
    width: f64,
    points: &[Point],
) -> Result<(), JsValue> {
    if points.len() < 2 {
        return Ok(());
    }

    ctx.begin_path();
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_line_width(width);

    match tool {
        Tool::Eraser => {
            // destination-out clears pixels; the carried color is cosmetic.
            ctx.set_global_composite_operation("destination-out")?;
            ctx.set_stroke_style_str("rgba(0,0,0,1)");
        }
        Tool::Brush => {
            ctx.set_global_composite_operation("source-over")?;
            ctx.set_stroke_style_str(color);
        }
    }

    ctx.move_to(points[0].x, points[0].y);
    for point in &points[1..] {
        ctx.line_to(point.x, point.y);
    }
    ctx.stroke();

    // Restore the default blend mode for whoever draws next.
    ctx.set_global_composite_operation("source-over")?;
    Ok(())
}
