//! Character movement, gravity and jump gating
//!
//! Ground detection and hit-scan geometry live behind `CollisionQuery`; the
//! simulation only consumes the boolean/hit results. `FlatWorld` is the
//! built-in arena geometry (flat ground plane, sphere hit volumes).

use crate::util::time::{tick_delta, TickTimer};
use crate::ws::protocol::Vec3;

use super::authority::PeerId;
use super::entity::{EntityId, HitLayer, PlayerEntity};
use super::registry::EntityRegistry;
use super::TickInput;

/// Character movement and hit-volume constants
#[derive(Debug, Clone, Copy)]
pub struct CharacterStats {
    /// Horizontal move speed (units/second)
    pub move_speed: f32,
    /// Gravity acceleration (negative, units/second^2)
    pub gravity: f32,
    /// Upward velocity applied by a jump
    pub jump_speed: f32,
    /// Maximum jumps before touching ground again (2 = double jump)
    pub max_jumps: u8,
    pub max_health: f32,
    /// Radius of the spherical hit volume
    pub hit_radius: f32,
    /// Height of the hit-volume center above the entity's feet
    pub hit_center_height: f32,
    /// Downward snap velocity applied while grounded
    pub ground_snap_velocity: f32,
    /// Seconds between landing-impact sounds
    pub collision_sound_cooldown: f32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            gravity: -19.62,
            jump_speed: 8.0,
            max_jumps: 2,
            max_health: 100.0,
            hit_radius: 0.5,
            hit_center_height: 1.0,
            ground_snap_velocity: -2.0,
            collision_sound_cooldown: 0.3,
        }
    }
}

/// Result of a hit-scan query
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Player entity that was hit, `None` for world geometry
    pub entity: Option<EntityId>,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

/// External geometry-query collaborator. The core never does its own
/// collision math beyond what these answers provide.
pub trait CollisionQuery: Send {
    /// Is a character standing at `position` on the ground this tick?
    fn is_grounded(&self, position: Vec3) -> bool;

    /// Cast a ray against world and entity geometry, skipping the shooter
    /// and anything on the `IgnoreRaycast` layer. Returns the nearest hit.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        registry: &EntityRegistry,
        ignore: EntityId,
        stats: &CharacterStats,
    ) -> Option<RayHit>;
}

/// Flat arena: ground plane at y = 0, players as spheres
pub struct FlatWorld;

const GROUND_EPSILON: f32 = 0.05;

impl CollisionQuery for FlatWorld {
    fn is_grounded(&self, position: Vec3) -> bool {
        position.y <= GROUND_EPSILON
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        registry: &EntityRegistry,
        ignore: EntityId,
        stats: &CharacterStats,
    ) -> Option<RayHit> {
        let dir = direction.normalized();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut nearest: Option<RayHit> = None;

        for target in registry.iter() {
            if target.id == ignore || target.hit_layer == HitLayer::IgnoreRaycast {
                continue;
            }
            let center = target
                .position
                .added(Vec3::new(0.0, stats.hit_center_height, 0.0));
            if let Some(distance) = ray_sphere(origin, dir, center, stats.hit_radius) {
                if distance <= max_distance
                    && nearest.map_or(true, |hit| distance < hit.distance)
                {
                    let point = origin.added(dir.scaled(distance));
                    let normal = Vec3::new(
                        point.x - center.x,
                        point.y - center.y,
                        point.z - center.z,
                    )
                    .normalized();
                    nearest = Some(RayHit {
                        entity: Some(target.id),
                        point,
                        normal,
                        distance,
                    });
                }
            }
        }

        // Ground plane, only if closer than any entity hit
        if dir.y < 0.0 {
            let distance = -origin.y / dir.y;
            if distance >= 0.0
                && distance <= max_distance
                && nearest.map_or(true, |hit| distance < hit.distance)
            {
                nearest = Some(RayHit {
                    entity: None,
                    point: origin.added(dir.scaled(distance)),
                    normal: Vec3::new(0.0, 1.0, 0.0),
                    distance,
                });
            }
        }

        nearest
    }
}

/// Nearest intersection distance of a ray with a sphere, if any
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = Vec3::new(origin.x - center.x, origin.y - center.y, origin.z - center.z);
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

/// Per-tick outcome of the motor, consumed for cosmetic events
#[derive(Debug, Default, Clone, Copy)]
pub struct MotionEvents {
    /// Entity transitioned airborne -> grounded this tick
    pub landed: bool,
}

/// Advances one entity's movement state for one tick. Runs only in the
/// entity's state-authority context (`acting`); the input-authority peer may
/// predict the same math locally for responsiveness.
pub struct CharacterMotor;

impl CharacterMotor {
    pub fn step(
        entity: &mut PlayerEntity,
        input: &TickInput,
        stats: &CharacterStats,
        world: &dyn CollisionQuery,
        acting: PeerId,
        now: u64,
    ) -> MotionEvents {
        let mut events = MotionEvents::default();
        let dt = tick_delta();
        let was_grounded = entity.grounded;

        entity.grounded = world.is_grounded(entity.position);

        // Jump count resets the instant the entity is grounded with
        // non-ascending vertical velocity while alive.
        if entity.grounded && entity.vertical_velocity <= 0.0 && !entity.is_dead() {
            entity.set_jump_count(acting, 0);
        }

        if !entity.is_dead() {
            // Horizontal movement; facing follows the move direction
            let move_dir = Vec3::new(input.move_dir.x, 0.0, input.move_dir.z).normalized();
            if move_dir.horizontal_length() > 0.1 {
                entity.position = entity.position.added(move_dir.scaled(stats.move_speed * dt));
                entity.facing = move_dir;
            }

            // Jump gating: first jump from the ground, later jumps airborne,
            // never past max_jumps.
            if input.jump && entity.jump_count() < stats.max_jumps {
                let first_jump = entity.jump_count() == 0;
                if !first_jump || entity.grounded {
                    entity.vertical_velocity = stats.jump_speed;
                    entity.set_jump_count(acting, entity.jump_count() + 1);
                    entity.grounded = false;
                }
            }
        }

        // Gravity and vertical integration
        if entity.grounded && entity.vertical_velocity < 0.0 {
            entity.vertical_velocity = stats.ground_snap_velocity;
        } else if !entity.grounded {
            entity.vertical_velocity += stats.gravity * dt;
        }
        entity.position.y += entity.vertical_velocity * dt;
        if entity.position.y < 0.0 {
            entity.position.y = 0.0;
            entity.grounded = true;
        }

        // Landing-impact sound, gated by its own cooldown
        if !was_grounded
            && entity.grounded
            && entity.collision_sound_cooldown.expired_or_not_running(now)
        {
            events.landed = true;
            entity.collision_sound_cooldown =
                TickTimer::from_secs(now, stats.collision_sound_cooldown);
        }

        events
    }
}
