//! Shared wire protocol and stroke model for inkboard.
//!
//! This crate owns everything both sides of the WebSocket agree on: the
//! universal [`frame::Frame`] message envelope, the [`stroke`] data model,
//! and the [`participant::Participant`] wire shape. The `server` crate
//! dispatches on frames and owns the authoritative drawing state; the
//! `canvas` crate replays broadcast frames into its local replica.

pub mod frame;
pub mod participant;
pub mod stroke;
