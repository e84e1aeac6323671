//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A 3D vector on the wire and in the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit-length copy; zero-length vectors stay zero
    pub fn normalized(&self) -> Vec3 {
        let len = self.length();
        if len > f32::EPSILON {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        } else {
            Vec3::ZERO
        }
    }

    pub fn scaled(&self, factor: f32) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn added(&self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Horizontal (XZ-plane) magnitude, used for move thresholds
    pub fn horizontal_length(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }
}

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Request to spawn a character into the arena
    Join {
        /// Persisted local display-name preference; server substitutes a
        /// default when absent
        display_name: Option<String>,
    },

    /// Player input for current tick
    InputTick {
        /// Sequence number for client-side prediction reconciliation
        seq: u32,
        /// Desired move direction (normalized server-side)
        move_dir: Vec3,
        /// Fire weapon this tick
        shoot: bool,
        /// Jump pressed this tick (edge, not level)
        jump: bool,
    },

    /// Cycle the spectate target while dead (+1 = next, -1 = previous)
    Spectate { direction: i32 },

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },

    /// Leave the arena
    Leave,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome { peer_id: Uuid, server_time: u64 },

    /// Confirmation of arena join
    Joined {
        entity_id: Uuid,
        /// All players in the arena at join time
        players: Vec<PlayerInfo>,
    },

    /// A player spawned into the arena
    PlayerJoined { player: PlayerInfo },

    /// A player despawned from the arena
    PlayerLeft { peer_id: Uuid, reason: String },

    /// Game state snapshot (sent at regular intervals)
    Snapshot {
        /// Server tick number
        tick: u64,
        /// All player states
        players: Vec<PlayerSnapshot>,
        /// Events that occurred since last snapshot
        events: Vec<GameEvent>,
    },

    /// Active spectate target for a dead observer
    SpectateTarget {
        observer: Uuid,
        /// `None` when no live candidates exist
        target: Option<Uuid>,
        /// Label text for the observer's UI
        display_name: Option<String>,
    },

    /// Error message
    Error { code: String, message: String },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

/// Player info for join notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub peer_id: Uuid,
    pub entity_id: Uuid,
    pub display_name: String,
}

/// Player state in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub entity_id: Uuid,
    pub peer_id: Uuid,
    pub position: Vec3,
    /// Facing direction (unit, XZ plane)
    pub facing: Vec3,
    /// Vertical velocity for remote gravity prediction
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Health (0..=max)
    pub health: f32,
    pub is_dead: bool,
    pub jump_count: u8,
    pub score: u32,
    /// Last processed input sequence
    pub last_input_seq: u32,
    /// Ticks until the weapon can fire again (0 = ready)
    pub shoot_cooldown_ticks: u64,
}

/// Game events (shots, hits, deaths, respawns)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Hit-scan shot fired
    Shot {
        shooter: Uuid,
        origin: Vec3,
        direction: Vec3,
    },

    /// Cosmetic hit effect at the impact point, broadcast to all peers
    HitEffect { position: Vec3, normal: Vec3 },

    /// A player died
    Death {
        victim: Uuid,
        killer: Option<Uuid>,
    },

    /// A player respawned
    Respawn { entity_id: Uuid, position: Vec3 },

    /// Cosmetic landing impact, gated by the collision-sound cooldown
    LandingImpact { entity_id: Uuid, position: Vec3 },

    /// Score transition (kill credit)
    ScoreChanged { peer_id: Uuid, score: u32 },
}
