//! Combat resolution: hit-scan shooting and the remote damage protocol
//!
//! A shot resolves locally into a `DamageRequest` addressed to the target's
//! state authority; only that authority context applies it, after validating
//! against the target's state at execution time (last-applied-wins).

use tracing::{debug, info};
use uuid::Uuid;

use crate::util::time::TickTimer;
use crate::ws::protocol::{GameEvent, Vec3};

use super::authority::PeerId;
use super::entity::{EntityId, HitLayer, PlayerEntity};
use super::physics::{CharacterStats, CollisionQuery};
use super::registry::EntityRegistry;

/// Weapon constants
#[derive(Debug, Clone, Copy)]
pub struct WeaponConfig {
    /// Damage per hit
    pub damage: f32,
    /// Hit-scan range
    pub shoot_distance: f32,
    /// Cooldown between shots (seconds)
    pub cooldown: f32,
    /// Muzzle height above the entity's feet
    pub muzzle_height: f32,
    /// Score awarded for a kill
    pub kill_score: u32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            damage: 10.0,
            shoot_distance: 100.0,
            cooldown: 0.2,
            muzzle_height: 1.5,
            kill_score: 1,
        }
    }
}

/// Remote damage call, addressed to the target's state authority. Any peer
/// may initiate one; it executes only where the target's authority lives.
#[derive(Debug, Clone)]
pub struct DamageRequest {
    pub target: EntityId,
    pub damage: f32,
    pub attacker: PeerId,
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
}

/// What a shot produced at the shooter's side
#[derive(Debug)]
pub struct ShotResolution {
    pub event: GameEvent,
    /// Present when the ray hit another player's hit volume
    pub damage_request: Option<DamageRequest>,
}

/// Outcome of applying a damage request at the target's authority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target dead, attacker invalid, or self-damage
    Rejected,
    Applied,
    /// Damage applied and the death transition fired
    Killed,
}

pub struct CombatResolver;

impl CombatResolver {
    /// Resolve a shoot intent for `shooter_id`. Returns `None` when the
    /// shooter is dead or still cooling down; otherwise starts the cooldown
    /// and reports the shot plus any damage request to route.
    pub fn resolve_shot(
        registry: &mut EntityRegistry,
        shooter_id: EntityId,
        world: &dyn CollisionQuery,
        stats: &CharacterStats,
        weapon: &WeaponConfig,
        now: u64,
    ) -> Option<ShotResolution> {
        let (origin, direction, attacker) = {
            let shooter = registry.get(shooter_id)?;
            if shooter.is_dead() || !shooter.shoot_cooldown.expired_or_not_running(now) {
                return None;
            }
            (
                shooter
                    .position
                    .added(Vec3::new(0.0, weapon.muzzle_height, 0.0)),
                shooter.facing,
                shooter.authority.input_owner,
            )
        };

        let hit = world.raycast(
            origin,
            direction,
            weapon.shoot_distance,
            registry,
            shooter_id,
            stats,
        );

        let damage_request = hit.and_then(|hit| {
            hit.entity.map(|target| DamageRequest {
                target,
                damage: weapon.damage,
                attacker,
                hit_point: hit.point,
                hit_normal: hit.normal,
            })
        });

        // Cooldown is observed locally and reconstructed from the tick
        // timer, not replicated as a separate message.
        if let Some(shooter) = registry.get_mut(shooter_id) {
            shooter.shoot_cooldown = TickTimer::from_secs(now, weapon.cooldown);
        }

        Some(ShotResolution {
            event: GameEvent::Shot {
                shooter: shooter_id,
                origin,
                direction,
            },
            damage_request,
        })
    }

    /// Apply a damage request at the target's state authority. `acting` is
    /// the peer the routing layer resolved for the target; `attacker_valid`
    /// says whether the attacker is a real connected participant.
    ///
    /// Validates against the target's current state: a target that died and
    /// respawned since the request was issued takes the damage normally.
    pub fn apply_damage(
        target: &mut PlayerEntity,
        request: &DamageRequest,
        acting: PeerId,
        attacker_valid: bool,
        respawn_delay_secs: f32,
        now: u64,
    ) -> DamageOutcome {
        if !target.authority.has_state_authority(acting) {
            debug!(
                target = %target.id,
                acting_peer = %acting,
                "Damage request delivered to non-authority, ignoring"
            );
            return DamageOutcome::Rejected;
        }
        if target.is_dead() {
            return DamageOutcome::Rejected;
        }
        // No damage from phantom attackers, none from yourself
        if !attacker_valid || request.attacker == target.authority.input_owner {
            return DamageOutcome::Rejected;
        }

        let remaining = target.health() - request.damage;
        target.set_health(acting, remaining);

        info!(
            target = %target.id,
            attacker = %request.attacker,
            damage = request.damage,
            remaining = target.health(),
            "Damage applied"
        );

        if target.health() <= 0.0 {
            if Self::die(target, acting, respawn_delay_secs, now) {
                return DamageOutcome::Killed;
            }
        }
        DamageOutcome::Applied
    }

    /// Death transition, authority side. Idempotent: calling it on an
    /// already-dead entity neither restarts the respawn timer nor re-fires
    /// notifications. Returns true when the transition actually fired.
    pub fn die(
        target: &mut PlayerEntity,
        acting: PeerId,
        respawn_delay_secs: f32,
        now: u64,
    ) -> bool {
        if !target.authority.has_state_authority(acting) || target.is_dead() {
            return false;
        }

        target.set_dead(acting, true);
        target.vertical_velocity = 0.0;
        // Off the hit-scan layer so the body stops soaking shots
        target.hit_layer = HitLayer::IgnoreRaycast;
        target.respawn_timer = TickTimer::from_secs(now, respawn_delay_secs);
        true
    }
}

/// Validate that an attacker reference names a real connected participant
pub fn is_real_peer(attacker: PeerId, connected: &[PeerId]) -> bool {
    attacker != Uuid::nil() && connected.contains(&attacker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::authority::Authority;
    use crate::game::physics::FlatWorld;

    const RESPAWN_DELAY: f32 = 10.0;

    fn target_entity() -> (PlayerEntity, PeerId) {
        let peer = Uuid::new_v4();
        let entity = PlayerEntity::spawn(
            Authority::player_owned(peer),
            "Target".to_string(),
            Vec3::ZERO,
            100.0,
        );
        (entity, peer)
    }

    fn request_against(target: &PlayerEntity, attacker: PeerId, damage: f32) -> DamageRequest {
        DamageRequest {
            target: target.id,
            damage,
            attacker,
            hit_point: Vec3::ZERO,
            hit_normal: Vec3::new(0.0, 1.0, 0.0),
        }
    }

    #[test]
    fn self_damage_is_rejected() {
        let (mut target, owner) = target_entity();
        let request = request_against(&target, owner, 40.0);
        let outcome =
            CombatResolver::apply_damage(&mut target, &request, owner, true, RESPAWN_DELAY, 0);
        assert_eq!(outcome, DamageOutcome::Rejected);
        assert_eq!(target.health(), 100.0);
    }

    #[test]
    fn phantom_attacker_is_rejected() {
        let (mut target, owner) = target_entity();
        let request = request_against(&target, Uuid::new_v4(), 40.0);
        let outcome =
            CombatResolver::apply_damage(&mut target, &request, owner, false, RESPAWN_DELAY, 0);
        assert_eq!(outcome, DamageOutcome::Rejected);
        assert_eq!(target.health(), 100.0);
    }

    #[test]
    fn damage_to_dead_target_is_a_noop() {
        let (mut target, owner) = target_entity();
        CombatResolver::die(&mut target, owner, RESPAWN_DELAY, 5);
        let deadline = target.respawn_timer;
        target.drain_changes();

        let request = request_against(&target, Uuid::new_v4(), 40.0);
        let outcome =
            CombatResolver::apply_damage(&mut target, &request, owner, true, RESPAWN_DELAY, 8);
        assert_eq!(outcome, DamageOutcome::Rejected);
        assert_eq!(target.health(), 100.0);
        assert_eq!(target.respawn_timer, deadline);
        assert!(target.drain_changes().is_empty());
    }

    #[test]
    fn lethal_damage_clamps_and_kills_once() {
        let (mut target, owner) = target_entity();
        target.set_health(owner, 30.0);
        target.drain_changes();

        let attacker = Uuid::new_v4();
        let request = request_against(&target, attacker, 40.0);
        let outcome =
            CombatResolver::apply_damage(&mut target, &request, owner, true, RESPAWN_DELAY, 100);
        assert_eq!(outcome, DamageOutcome::Killed);
        assert_eq!(target.health(), 0.0);
        assert!(target.is_dead());
        assert!(target.respawn_timer.is_running());
        assert_eq!(target.hit_layer, HitLayer::IgnoreRaycast);

        // Health 30 -> 0 plus one death transition, nothing doubled
        use crate::game::entity::StateChange;
        let changes = target.drain_changes();
        assert_eq!(
            changes,
            vec![
                StateChange::Health { from: 30.0, to: 0.0 },
                StateChange::Dead { is_dead: true }
            ]
        );
    }

    #[test]
    fn second_death_does_not_restart_respawn_timer() {
        let (mut target, owner) = target_entity();
        assert!(CombatResolver::die(&mut target, owner, RESPAWN_DELAY, 10));
        let deadline = target.respawn_timer;
        assert!(!CombatResolver::die(&mut target, owner, RESPAWN_DELAY, 50));
        assert_eq!(target.respawn_timer, deadline);
    }

    #[test]
    fn health_never_leaves_domain_under_any_damage_sequence() {
        let (mut target, owner) = target_entity();
        let attacker = Uuid::new_v4();
        for damage in [15.0, 200.0, -5.0, 60.0, 0.5] {
            let request = request_against(&target, attacker, damage);
            CombatResolver::apply_damage(&mut target, &request, owner, true, RESPAWN_DELAY, 0);
            assert!(target.health() >= 0.0 && target.health() <= target.max_health);
        }
    }

    #[test]
    fn shot_respects_cooldown() {
        let stats = CharacterStats::default();
        let weapon = WeaponConfig::default();
        let mut registry = EntityRegistry::new();
        let shooter = registry.insert(PlayerEntity::spawn(
            Authority::player_owned(Uuid::new_v4()),
            "Shooter".to_string(),
            Vec3::ZERO,
            100.0,
        ));

        assert!(CombatResolver::resolve_shot(
            &mut registry,
            shooter,
            &FlatWorld,
            &stats,
            &weapon,
            0
        )
        .is_some());
        // Cooling down on the very next tick
        assert!(CombatResolver::resolve_shot(
            &mut registry,
            shooter,
            &FlatWorld,
            &stats,
            &weapon,
            1
        )
        .is_none());
        // Ready again once the deadline passes
        let after = crate::util::time::secs_to_ticks(weapon.cooldown);
        assert!(CombatResolver::resolve_shot(
            &mut registry,
            shooter,
            &FlatWorld,
            &stats,
            &weapon,
            after
        )
        .is_some());
    }

    #[test]
    fn shot_at_player_produces_damage_request() {
        let stats = CharacterStats::default();
        let weapon = WeaponConfig::default();
        let mut registry = EntityRegistry::new();
        let shooter_peer = Uuid::new_v4();
        let shooter = registry.insert(PlayerEntity::spawn(
            Authority::player_owned(shooter_peer),
            "Shooter".to_string(),
            Vec3::ZERO,
            100.0,
        ));
        let target = registry.insert(PlayerEntity::spawn(
            Authority::player_owned(Uuid::new_v4()),
            "Target".to_string(),
            Vec3::new(0.0, 0.5, 10.0),
            100.0,
        ));
        registry.get_mut(shooter).unwrap().facing = Vec3::new(0.0, 0.0, 1.0);

        let resolution = CombatResolver::resolve_shot(
            &mut registry,
            shooter,
            &FlatWorld,
            &stats,
            &weapon,
            0,
        )
        .expect("shooter is alive and ready");
        let request = resolution.damage_request.expect("ray should hit target");
        assert_eq!(request.target, target);
        assert_eq!(request.attacker, shooter_peer);
        assert_eq!(request.damage, weapon.damage);
    }
}
