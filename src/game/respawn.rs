//! Tick-driven revival of dead entities
//!
//! Authority side only: each simulation tick, a dead entity whose respawn
//! deadline has elapsed is relocated to a random registered spawn point and
//! restored to full health.

use rand::Rng;
use tracing::warn;

use crate::ws::protocol::Vec3;

use super::authority::PeerId;
use super::entity::{HitLayer, PlayerEntity};

/// Registered spawn locations (world objects tagged as spawn points)
#[derive(Debug, Clone, Default)]
pub struct SpawnPoints {
    points: Vec<Vec3>,
}

impl SpawnPoints {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Default arena layout: a ring of eight points around the origin
    pub fn ring(radius: f32) -> Self {
        let points = (0..8)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 8.0;
                Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
            })
            .collect();
        Self { points }
    }

    /// Uniformly random spawn point; origin fallback when none registered
    pub fn pick(&self, rng: &mut impl Rng) -> Vec3 {
        if self.points.is_empty() {
            warn!("No spawn points registered, falling back to origin");
            return Vec3::ZERO;
        }
        self.points[rng.gen_range(0..self.points.len())]
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.points.iter().any(|p| *p == position)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub struct RespawnScheduler;

impl RespawnScheduler {
    /// Revive `entity` if it is dead and its respawn deadline has elapsed.
    /// Returns the spawn position when a respawn happened this tick.
    pub fn tick(
        entity: &mut PlayerEntity,
        acting: PeerId,
        spawn_points: &SpawnPoints,
        rng: &mut impl Rng,
        now: u64,
    ) -> Option<Vec3> {
        if !entity.authority.has_state_authority(acting) {
            return None;
        }
        if !entity.is_dead() || !entity.respawn_timer.expired(now) {
            return None;
        }

        let position = spawn_points.pick(rng);
        entity.position = position;
        entity.vertical_velocity = 0.0;
        entity.set_health(acting, entity.max_health);
        entity.set_dead(acting, false);
        entity.hit_layer = HitLayer::Collidable;
        entity.respawn_timer.clear();

        Some(position)
    }
}
