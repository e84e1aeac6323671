//! Game simulation modules

pub mod arena;
pub mod authority;
pub mod combat;
pub mod entity;
pub mod physics;
pub mod registry;
pub mod respawn;
pub mod snapshot;
pub mod spectator;

pub use arena::{ArenaHandle, GameArena};
pub use registry::EntityRegistry;

use crate::ws::protocol::{ClientMsg, Vec3};

use authority::PeerId;

/// Command received from a peer's WebSocket session
#[derive(Debug, Clone)]
pub struct PeerCommand {
    pub peer_id: PeerId,
    pub msg: ClientMsg,
    pub received_at: u64,
}

/// Input state for a single tick (processed from ClientMsg::InputTick)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub seq: u32,
    pub move_dir: Vec3,
    pub shoot: bool,
    pub jump: bool,
}
