//! Business logic services, dispatched from WS frames.

pub mod history;
pub mod registry;
pub mod room;
