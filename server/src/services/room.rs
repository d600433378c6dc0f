//! Room service — join/part and broadcast fan-out.
//!
//! DESIGN
//! ======
//! There is exactly one room: the shared canvas. Joining registers the
//! participant and snapshots everything the new client needs for its initial
//! sync in the same write-lock critical section, so the snapshot can never
//! straddle a concurrent commit. Parting removes the participant and its
//! sender.
//!
//! Fan-out is best-effort per client: a slow client's full channel drops
//! frames rather than stalling the writer.

use frames::frame::Frame;
use frames::participant::Participant;
use frames::stroke::CommittedStroke;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

/// Everything a newly connected participant needs for its initial sync.
pub struct JoinSnapshot {
    /// The participant created for this connection.
    pub participant: Participant,
    /// All connected participants, the new one included.
    pub participants: Vec<Participant>,
    /// The committed history, in commit order.
    pub history: Vec<CommittedStroke>,
}

// =============================================================================
// JOIN / PART
// =============================================================================

/// Register a new connection: create its participant, store its sender, and
/// snapshot the room state for the `session:init` frame.
pub async fn join(state: &AppState, client_id: Uuid, tx: mpsc::Sender<Frame>) -> JoinSnapshot {
    let mut room = state.room.write().await;
    let participant = room.registry.add(client_id);
    room.clients.insert(client_id, tx);

    let participants = room.registry.list();
    let history = room.history.snapshot().to_vec();
    info!(%client_id, participants = participants.len(), "participant joined");

    JoinSnapshot { participant, participants, history }
}

/// Deregister a connection. Idempotent.
pub async fn part(state: &AppState, client_id: Uuid) {
    let mut room = state.room.write().await;
    room.clients.remove(&client_id);
    room.registry.remove(&client_id);
    info!(%client_id, remaining = room.clients.len(), "participant left");
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Broadcast a frame to all connected clients, optionally excluding one.
pub async fn broadcast(state: &AppState, frame: &Frame, exclude: Option<Uuid>) {
    let room = state.room.read().await;
    for (client_id, tx) in &room.clients {
        if exclude == Some(*client_id) {
            continue;
        }
        // Best-effort: if a client's channel is full, skip it.
        let _ = tx.try_send(frame.clone());
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
