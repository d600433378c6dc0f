//! WebSocket handler — bidirectional frame relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a connection ID and enters a `select!` loop:
//! - Incoming client frames → parse + dispatch by syscall prefix
//! - Broadcast frames from peers → forward to client
//!
//! Handler functions are pure business logic — they validate, mutate state,
//! and return an `Outcome`. The dispatch layer owns all outbound concerns:
//! reply to sender and broadcast to peers.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register participant → send `session:init` with the full
//!    participant list and stroke history
//! 2. Broadcast `presence:join` to peers
//! 3. Client sends frames → dispatch → handler returns Outcome
//! 4. Dispatch applies Outcome (ack / relay / notify)
//! 5. Close → deregister → broadcast `presence:part`

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use frames::frame::{Data, Frame};
use frames::stroke::DraftStroke;

use crate::services;
use crate::state::AppState;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result returned by handler functions. The dispatch layer uses this to
/// decide who receives what — handlers never send frames directly.
enum Outcome {
    /// Ack the sender with done, then notify ALL participants including the
    /// sender with a fresh request frame. Used for committed strokes and
    /// history rewrites, which every replica must apply identically.
    Notify { syscall: &'static str, data: Data },
    /// Send data to all peers EXCLUDING the sender under the given syscall.
    /// No ack. Used for ephemeral traffic: cursor moves and live stroke
    /// fragments the sender already renders locally.
    Relay { syscall: &'static str, data: Data },
    /// Send empty done to sender only. Also covers silent no-ops.
    Done,
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection channel for receiving broadcast frames from peers.
    let (client_tx, mut client_rx) = mpsc::channel::<Frame>(256);

    let snapshot = services::room::join(&state, client_id, client_tx).await;

    let mut init = Data::new();
    init.insert("self".into(), serde_json::to_value(&snapshot.participant).unwrap_or_default());
    init.insert(
        "participants".into(),
        serde_json::to_value(&snapshot.participants).unwrap_or_default(),
    );
    init.insert("history".into(), serde_json::to_value(&snapshot.history).unwrap_or_default());
    let welcome = Frame::request("session:init", init);
    if send_frame(&mut socket, &welcome).await.is_err() {
        services::room::part(&state, client_id).await;
        return;
    }

    info!(%client_id, "ws: participant connected");

    let mut join_data = Data::new();
    join_data.insert(
        "participant".into(),
        serde_json::to_value(&snapshot.participant).unwrap_or_default(),
    );
    let joined = Frame::request("presence:join", join_data);
    services::room::broadcast(&state, &joined, Some(client_id)).await;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        dispatch_frame(&state, &mut socket, client_id, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    // Deregister BEFORE notifying peers so a racing cursor update for the
    // departed id lands on the registry as a no-op.
    services::room::part(&state, client_id).await;

    let parted =
        Frame::request("presence:part", Data::new()).with_data("author_id", client_id.to_string());
    services::room::broadcast(&state, &parted, None).await;
    info!(%client_id, "ws: participant disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse an incoming JSON frame, dispatch to handler, apply outcome.
async fn dispatch_frame(state: &AppState, socket: &mut WebSocket, client_id: Uuid, text: &str) {
    let sender_frames = process_inbound_text(state, client_id, text).await;
    for frame in sender_frames {
        let _ = send_frame(socket, &frame).await;
    }
}

/// Parse and process one inbound text frame and return frames for the sender.
///
/// This keeps the websocket transport concerns separate from frame handling,
/// so tests can exercise dispatch and broadcast behavior end-to-end.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Vec<Frame> {
    let mut req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new())
                .with_data("message", format!("invalid json: {e}"));
            return vec![err];
        }
    };

    // Stamp the sending connection as `from`.
    req.from = Some(client_id.to_string());

    let prefix = req.prefix();
    let is_cursor = prefix == "cursor";
    if !is_cursor {
        info!(%client_id, id = %req.id, syscall = %req.syscall, "ws: recv frame");
    }

    // Dispatch to handler — returns Outcome or error Frame.
    let result = match prefix {
        "draw" => handle_draw(state, client_id, &req).await,
        "history" => handle_history(state, &req).await,
        "cursor" => handle_cursor(state, client_id, &req).await,
        _ => Err(req.error(format!("unknown prefix: {prefix}"))),
    };

    // Apply outcome — the dispatch layer owns all outbound logic.
    match result {
        Ok(Outcome::Notify { syscall, data }) => {
            let notif = Frame::request(syscall, data);
            services::room::broadcast(state, &notif, None).await;
            vec![req.done()]
        }
        Ok(Outcome::Relay { syscall, data }) => {
            let frame = Frame::request(syscall, data);
            services::room::broadcast(state, &frame, Some(client_id)).await;
            vec![]
        }
        Ok(Outcome::Done) => vec![req.done()],
        Err(err_frame) => vec![err_frame],
    }
}

// =============================================================================
// DRAW HANDLERS
// =============================================================================

async fn handle_draw(state: &AppState, client_id: Uuid, req: &Frame) -> Result<Outcome, Frame> {
    let op = req.syscall.split_once(':').map_or("", |(_, op)| op);

    match op {
        // Live fragments are relayed verbatim with the author stamped;
        // recipients key their open stroke by author_id. Nothing touches the
        // history engine until the stroke completes.
        "start" => {
            let mut data = req.data.clone();
            data.insert("author_id".into(), serde_json::json!(client_id));
            Ok(Outcome::Relay { syscall: "draw:start", data })
        }
        "continue" => {
            let mut data = req.data.clone();
            data.insert("author_id".into(), serde_json::json!(client_id));
            Ok(Outcome::Relay { syscall: "draw:continue", data })
        }
        "end" => {
            let draft: DraftStroke =
                match serde_json::to_value(&req.data).and_then(serde_json::from_value) {
                    Ok(d) => d,
                    Err(e) => return Err(req.error(format!("malformed stroke: {e}"))),
                };

            let committed = {
                let mut room = state.room.write().await;
                room.history.commit(draft, client_id)
            };

            match committed {
                Ok(stroke) => {
                    let mut data = Data::new();
                    data.insert("stroke".into(), serde_json::to_value(&stroke).unwrap_or_default());
                    Ok(Outcome::Notify { syscall: "stroke:added", data })
                }
                Err(e) => Err(req.error_from(&e)),
            }
        }
        _ => Err(req.error(format!("unknown draw op: {op}"))),
    }
}

// =============================================================================
// HISTORY HANDLERS
// =============================================================================

async fn handle_history(state: &AppState, req: &Frame) -> Result<Outcome, Frame> {
    let op = req.syscall.split_once(':').map_or("", |(_, op)| op);

    let mut room = state.room.write().await;
    let changed = match op {
        "undo" => room.history.undo(),
        "redo" => room.history.redo(),
        _ => return Err(req.error(format!("unknown history op: {op}"))),
    };

    if !changed {
        // Undo on empty history / redo on empty buffer: silent no-op.
        return Ok(Outcome::Done);
    }

    // Snapshot inside the same critical section so the rebroadcast can never
    // straddle a concurrent commit.
    let mut data = Data::new();
    data.insert(
        "strokes".into(),
        serde_json::to_value(room.history.snapshot()).unwrap_or_default(),
    );
    Ok(Outcome::Notify { syscall: "history:updated", data })
}

// =============================================================================
// CURSOR HANDLER
// =============================================================================

async fn handle_cursor(state: &AppState, client_id: Uuid, req: &Frame) -> Result<Outcome, Frame> {
    let op = req.syscall.split_once(':').map_or("", |(_, op)| op);
    if op != "move" {
        return Err(req.error(format!("unknown cursor op: {op}")));
    }

    let x = req.data.get("x").and_then(serde_json::Value::as_f64).unwrap_or(0.0);
    let y = req.data.get("y").and_then(serde_json::Value::as_f64).unwrap_or(0.0);

    {
        let mut room = state.room.write().await;
        room.registry.update_cursor(&client_id, x, y);
    }

    let mut data = Data::new();
    data.insert("author_id".into(), serde_json::json!(client_id));
    data.insert("x".into(), serde_json::json!(x));
    data.insert("y".into(), serde_json::json!(y));
    Ok(Outcome::Relay { syscall: "cursor:moved", data })
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    // Cursor traffic is too chatty to log.
    if !frame.syscall.starts_with("cursor:") {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
