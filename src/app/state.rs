//! Application state shared across routes

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::game::arena::{ArenaConfig, GameArena};
use crate::game::ArenaHandle;

/// A peer currently holding a WebSocket session
#[derive(Debug, Clone)]
pub struct ConnectedPeer {
    pub connected_at: u64,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub arena: ArenaHandle,
    /// Live WebSocket sessions, keyed by peer id
    pub peers: Arc<DashMap<Uuid, ConnectedPeer>>,
}

impl AppState {
    /// Build the state and spawn the arena task
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let arena_config = ArenaConfig {
            max_players: config.max_players,
            ..ArenaConfig::default()
        };
        let seed = config.arena_seed.unwrap_or_else(rand::random);
        let (arena, handle) = GameArena::new(arena_config, seed);
        tokio::spawn(arena.run());

        Self {
            config,
            arena: handle,
            peers: Arc::new(DashMap::new()),
        }
    }
}
