//! Application state

mod state;

pub use state::{AppState, ConnectedPeer};
