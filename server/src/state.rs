//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the single shared room: the participant registry, the authoritative
//! stroke history, and the per-client senders used for broadcast fan-out.
//! All mutation goes through the room's write lock — that lock is the
//! single-writer queue that keeps history/undo state strictly serialized
//! across connections.

use std::collections::HashMap;
use std::sync::Arc;

use frames::frame::Frame;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::services::history::HistoryEngine;
use crate::services::registry::Registry;

// =============================================================================
// ROOM STATE
// =============================================================================

/// Live state of the shared canvas. Memory-only; the canvas starts empty on
/// every process start.
pub struct RoomState {
    /// Connected participants with their display colors and cursors.
    pub registry: Registry,
    /// Committed stroke history and the shared undo/redo timeline.
    pub history: HistoryEngine,
    /// Connected clients: `client_id` -> sender for outgoing frames.
    pub clients: HashMap<Uuid, mpsc::Sender<Frame>>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self { registry: Registry::new(), history: HistoryEngine::new(), clients: HashMap::new() }
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — the room is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub room: Arc<RwLock<RoomState>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { room: Arc::new(RwLock::new(RoomState::new())) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
