//! Replicated player entity state and change notification
//!
//! Every replicated field is written through an authority-gated setter: the
//! acting peer must hold state authority for the entity or the write is a
//! silent no-op. Writes that change a value push exactly one `StateChange`
//! per distinct transition, drained and dispatched by the arena each tick.

use tracing::warn;
use uuid::Uuid;

use crate::util::time::TickTimer;
use crate::ws::protocol::Vec3;

use super::authority::{Authority, PeerId};
use super::TickInput;

/// Stable identifier of a player entity, unique per connected participant
pub type EntityId = Uuid;

/// Collision layer the entity currently occupies. Dead bodies move to
/// `IgnoreRaycast` so they stop being hit-scan-eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitLayer {
    Collidable,
    IgnoreRaycast,
}

/// A distinct value transition on a replicated field
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    Health { from: f32, to: f32 },
    Dead { is_dead: bool },
    Score { score: u32 },
    DisplayName { name: String },
}

/// Local observer of replicated-state transitions (health bars, camera and
/// spectator logic, animation flags). Registered explicitly with the arena.
pub trait StateObserver: Send {
    fn on_change(&mut self, entity: &PlayerEntity, change: &StateChange);
}

/// The canonical state of one player entity (authoritative copy)
#[derive(Debug, Clone)]
pub struct PlayerEntity {
    pub id: EntityId,
    pub authority: Authority,

    // Transform and local simulation state
    pub position: Vec3,
    pub facing: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub hit_layer: HitLayer,

    // Timed gating
    pub shoot_cooldown: TickTimer,
    pub collision_sound_cooldown: TickTimer,
    pub respawn_timer: TickTimer,

    // Input tracking. `current_input.jump` is an edge consumed by the tick
    // that processes it; the rest is level state held between input messages.
    pub last_input_seq: u32,
    pub current_input: TickInput,

    pub max_health: f32,

    // Replicated fields (authority-gated)
    health: f32,
    is_dead: bool,
    jump_count: u8,
    score: u32,
    display_name: String,

    pending_changes: Vec<StateChange>,
}

impl PlayerEntity {
    /// Create an entity with its initial replicated values, as done by its
    /// state authority at spawn time.
    pub fn spawn(
        authority: Authority,
        display_name: String,
        spawn_position: Vec3,
        max_health: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            authority,
            position: spawn_position,
            facing: Vec3::new(0.0, 0.0, 1.0),
            vertical_velocity: 0.0,
            grounded: false,
            hit_layer: HitLayer::Collidable,
            shoot_cooldown: TickTimer::NONE,
            collision_sound_cooldown: TickTimer::NONE,
            respawn_timer: TickTimer::NONE,
            last_input_seq: 0,
            current_input: TickInput::default(),
            max_health,
            health: max_health,
            is_dead: false,
            jump_count: 0,
            score: 0,
            display_name,
            pending_changes: Vec::new(),
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn jump_count(&self) -> u8 {
        self.jump_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Write `health`, clamped to `[0, max_health]`. No-op without state
    /// authority; notifies only on a value transition.
    pub fn set_health(&mut self, acting: PeerId, value: f32) -> bool {
        if !self.check_state_authority(acting, "health") {
            return false;
        }
        let clamped = value.clamp(0.0, self.max_health);
        if (clamped - self.health).abs() > f32::EPSILON {
            let from = self.health;
            self.health = clamped;
            self.pending_changes.push(StateChange::Health {
                from,
                to: clamped,
            });
        }
        true
    }

    /// Write the death flag. No-op without state authority; notifies only on
    /// a value transition.
    pub fn set_dead(&mut self, acting: PeerId, value: bool) -> bool {
        if !self.check_state_authority(acting, "is_dead") {
            return false;
        }
        if self.is_dead != value {
            self.is_dead = value;
            self.pending_changes.push(StateChange::Dead { is_dead: value });
        }
        true
    }

    /// Write the jump count. No-op without state authority.
    pub fn set_jump_count(&mut self, acting: PeerId, value: u8) -> bool {
        if !self.check_state_authority(acting, "jump_count") {
            return false;
        }
        self.jump_count = value;
        true
    }

    /// Award score points. Score only ever increases in normal play.
    pub fn add_score(&mut self, acting: PeerId, points: u32) -> bool {
        if !self.check_state_authority(acting, "score") {
            return false;
        }
        if points > 0 {
            self.score += points;
            self.pending_changes.push(StateChange::Score { score: self.score });
        }
        true
    }

    /// Set the display name (once, at spawn; cosmetic renames use the same
    /// one-shot-on-change contract).
    pub fn set_display_name(&mut self, acting: PeerId, name: String) -> bool {
        if !self.check_state_authority(acting, "display_name") {
            return false;
        }
        if self.display_name != name {
            self.display_name = name.clone();
            self.pending_changes.push(StateChange::DisplayName { name });
        }
        true
    }

    /// Take the value transitions accumulated since the last drain
    pub fn drain_changes(&mut self) -> Vec<StateChange> {
        std::mem::take(&mut self.pending_changes)
    }

    fn check_state_authority(&self, acting: PeerId, field: &str) -> bool {
        if self.authority.has_state_authority(acting) {
            true
        } else {
            warn!(
                entity_id = %self.id,
                acting_peer = %acting,
                field,
                "Rejected replicated-field write without state authority"
            );
            false
        }
    }
}
