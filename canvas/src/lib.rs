//! Reconciliation and render-cache engine for the shared drawing canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It merges
//! the authoritative committed history (mirrored from server broadcasts)
//! with the transient overlay of in-progress strokes — the local draft plus
//! open remote strokes — into one composited frame per animation tick. The
//! host layer is responsible only for wiring DOM events to the engine,
//! transmitting the resulting [`engine::Action`]s, and feeding inbound
//! frames to [`net::apply_frame`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`replica`] | History replica, live-stroke overlay, dirty flag |
//! | [`net`] | Inbound frame → engine state application |
//! | [`render`] | Frame compositing (the only module touching Canvas2D) |

pub mod engine;
pub mod net;
pub mod render;
pub mod replica;
