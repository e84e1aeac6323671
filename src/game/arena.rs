//! Arena session state and authoritative tick loop
//!
//! A single task owns every entity in the session and executes each peer's
//! authority simulation on its behalf. All mutation happens synchronously
//! inside a tick; cross-peer calls (damage requests, hit effects) are
//! fire-and-forget messages routed to the addressed entity's authority and
//! processed in arrival order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{info, warn};

use crate::util::time::{SIMULATION_TPS, SNAPSHOT_TPS, TICK_DURATION_MICROS};
use crate::ws::protocol::{ClientMsg, GameEvent, PlayerInfo, ServerMsg, Vec3};

use super::authority::{Authority, PeerId};
use super::combat::{is_real_peer, CombatResolver, DamageOutcome, DamageRequest, WeaponConfig};
use super::entity::{EntityId, PlayerEntity, StateChange, StateObserver};
use super::physics::{CharacterStats, CollisionQuery, FlatWorld};
use super::registry::EntityRegistry;
use super::respawn::{RespawnScheduler, SpawnPoints};
use super::snapshot::SnapshotBuilder;
use super::spectator::{SpectateOutcome, SpectatorSelector};
use super::{PeerCommand, TickInput};

/// Session tunables
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub max_players: usize,
    /// Seconds between death and revival
    pub respawn_delay_secs: f32,
    pub character: CharacterStats,
    pub weapon: WeaponConfig,
    pub spawn_points: SpawnPoints,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            max_players: 16,
            respawn_delay_secs: 10.0,
            character: CharacterStats::default(),
            weapon: WeaponConfig::default(),
            spawn_points: SpawnPoints::ring(15.0),
        }
    }
}

/// Arena state (owned by the arena task)
struct ArenaState {
    /// Monotonic simulation tick counter
    tick: u64,
    entities: EntityRegistry,
    /// Connected participants (spawned characters)
    peers: HashMap<PeerId, String>,
    /// Spectate cursors for peers whose entity is dead
    spectators: HashMap<PeerId, SpectatorSelector>,
    rng: ChaCha8Rng,
}

/// Handle to a running arena
#[derive(Clone)]
pub struct ArenaHandle {
    pub command_tx: mpsc::Sender<PeerCommand>,
    pub broadcast_tx: broadcast::Sender<ServerMsg>,
    player_count: Arc<AtomicUsize>,
    current_tick: Arc<AtomicU64>,
}

impl ArenaHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Relaxed)
    }
}

/// The authoritative arena session
pub struct GameArena {
    config: ArenaConfig,
    state: ArenaState,
    world: Box<dyn CollisionQuery>,
    command_rx: mpsc::Receiver<PeerCommand>,
    broadcast_tx: broadcast::Sender<ServerMsg>,
    snapshot_builder: SnapshotBuilder,
    observers: Vec<Box<dyn StateObserver>>,
    /// Events accumulated since the last snapshot
    pending_events: Vec<GameEvent>,
    player_count: Arc<AtomicUsize>,
    current_tick: Arc<AtomicU64>,
}

impl GameArena {
    pub fn new(config: ArenaConfig, seed: u64) -> (Self, ArenaHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (broadcast_tx, _) = broadcast::channel(64);
        let player_count = Arc::new(AtomicUsize::new(0));
        let current_tick = Arc::new(AtomicU64::new(0));

        let handle = ArenaHandle {
            command_tx,
            broadcast_tx: broadcast_tx.clone(),
            player_count: player_count.clone(),
            current_tick: current_tick.clone(),
        };

        let snapshot_interval = SIMULATION_TPS / SNAPSHOT_TPS;
        let arena = Self {
            config,
            state: ArenaState {
                tick: 0,
                entities: EntityRegistry::new(),
                peers: HashMap::new(),
                spectators: HashMap::new(),
                rng: ChaCha8Rng::seed_from_u64(seed),
            },
            world: Box::new(FlatWorld),
            command_rx,
            broadcast_tx,
            snapshot_builder: SnapshotBuilder::new(snapshot_interval),
            observers: Vec::new(),
            pending_events: Vec::new(),
            player_count,
            current_tick,
        };

        (arena, handle)
    }

    /// Register a local observer of replicated-state transitions
    pub fn register_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    /// Run the authoritative tick loop
    pub async fn run(mut self) {
        info!("Arena started");

        let tick_duration = Duration::from_micros(TICK_DURATION_MICROS);
        let mut tick_interval = interval(tick_duration);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            // Drain command queue
            self.process_commands();

            // Run simulation tick
            self.run_tick();
            self.current_tick.store(self.state.tick, Ordering::Relaxed);

            // Build and broadcast snapshot if needed
            if self.snapshot_builder.should_send() {
                let events = std::mem::take(&mut self.pending_events);
                let snapshot = self
                    .snapshot_builder
                    .build(self.state.tick, &self.state.entities, events);
                let _ = self.broadcast_tx.send(snapshot);
            }
        }
    }

    /// Process all pending commands from peers
    fn process_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command.msg {
                ClientMsg::Join { display_name } => {
                    self.handle_join(command.peer_id, display_name);
                }
                ClientMsg::InputTick {
                    seq,
                    move_dir,
                    shoot,
                    jump,
                } => {
                    self.handle_input(command.peer_id, seq, move_dir, shoot, jump);
                }
                ClientMsg::Spectate { direction } => {
                    self.handle_spectate(command.peer_id, direction);
                }
                ClientMsg::Ping { t } => {
                    let _ = self.broadcast_tx.send(ServerMsg::Pong { t });
                }
                ClientMsg::Leave => {
                    self.handle_leave(command.peer_id);
                }
            }
        }
    }

    /// Spawn a character for a joining peer
    fn handle_join(&mut self, peer_id: PeerId, display_name: Option<String>) {
        if self.state.peers.contains_key(&peer_id) {
            warn!(peer_id = %peer_id, "Peer already in arena");
            return;
        }

        if self.state.entities.len() >= self.config.max_players {
            let _ = self.broadcast_tx.send(ServerMsg::Error {
                code: "arena_full".to_string(),
                message: "Arena is full".to_string(),
            });
            return;
        }

        // Persisted local preference, default-substituted when absent
        let display_name = display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Player_{}", &peer_id.to_string()[..8]));

        let spawn_position = self.config.spawn_points.pick(&mut self.state.rng);
        let entity = PlayerEntity::spawn(
            Authority::player_owned(peer_id),
            display_name.clone(),
            spawn_position,
            self.config.character.max_health,
        );
        let entity_id = self.state.entities.insert(entity);

        self.state.peers.insert(peer_id, display_name.clone());
        self.player_count
            .store(self.state.entities.len(), Ordering::Relaxed);

        let _ = self.broadcast_tx.send(ServerMsg::PlayerJoined {
            player: PlayerInfo {
                peer_id,
                entity_id,
                display_name,
            },
        });

        let players: Vec<PlayerInfo> = self
            .state
            .entities
            .iter()
            .map(|e| PlayerInfo {
                peer_id: e.authority.input_owner,
                entity_id: e.id,
                display_name: e.display_name().to_string(),
            })
            .collect();
        let _ = self.broadcast_tx.send(ServerMsg::Joined { entity_id, players });

        info!(
            peer_id = %peer_id,
            entity_id = %entity_id,
            player_count = self.state.entities.len(),
            "Player joined arena"
        );
    }

    /// Store a peer's intent for the next tick. Only the input authority's
    /// intents drive an entity; a stale sequence number is dropped.
    fn handle_input(
        &mut self,
        peer_id: PeerId,
        seq: u32,
        move_dir: Vec3,
        shoot: bool,
        jump: bool,
    ) {
        let Some(entity_id) = self.state.entities.id_by_input_owner(peer_id) else {
            return;
        };
        if let Some(entity) = self.state.entities.get_mut(entity_id) {
            if seq > entity.last_input_seq {
                entity.last_input_seq = seq;
                entity.current_input = TickInput {
                    seq,
                    move_dir: move_dir.normalized(),
                    shoot,
                    // Jump is an edge: consumed by the next tick, not held
                    jump: entity.current_input.jump || jump,
                };
            }
        }
    }

    /// Explicit next/previous spectate intent from a dead observer
    fn handle_spectate(&mut self, peer_id: PeerId, direction: i32) {
        // Client-supplied; only the two cycle directions are meaningful
        if direction != 1 && direction != -1 {
            warn!(peer_id = %peer_id, direction, "Ignoring invalid spectate direction");
            return;
        }
        let observing_allowed = self
            .state
            .entities
            .by_input_owner(peer_id)
            .map_or(false, |e| e.is_dead());
        if !observing_allowed {
            return;
        }

        let selector = self
            .state
            .spectators
            .entry(peer_id)
            .or_insert_with(SpectatorSelector::new);
        let outcome = selector.advance(direction, peer_id, &self.state.entities);
        let _ = self.broadcast_tx.send(spectate_msg(peer_id, outcome));
    }

    /// Despawn a leaving peer's entity
    fn handle_leave(&mut self, peer_id: PeerId) {
        if self.state.peers.remove(&peer_id).is_none() {
            return;
        }
        self.state.spectators.remove(&peer_id);

        if let Some(entity_id) = self.state.entities.id_by_input_owner(peer_id) {
            self.state.entities.remove(entity_id);
        }
        self.player_count
            .store(self.state.entities.len(), Ordering::Relaxed);

        let _ = self.broadcast_tx.send(ServerMsg::PlayerLeft {
            peer_id,
            reason: "disconnected".to_string(),
        });

        info!(peer_id = %peer_id, "Player left arena");
    }

    /// Run a single simulation tick
    fn run_tick(&mut self) {
        self.state.tick += 1;
        let now = self.state.tick;

        let mut damage_requests: Vec<DamageRequest> = Vec::new();

        // Movement + shooting, per entity, in its authority context
        for entity_id in self.state.entities.ids() {
            let Some(entity) = self.state.entities.get_mut(entity_id) else {
                continue;
            };
            let acting = entity.authority.state_owner;
            let input = entity.current_input.clone();
            entity.current_input.jump = false;

            let motion = super::physics::CharacterMotor::step(
                entity,
                &input,
                &self.config.character,
                self.world.as_ref(),
                acting,
                now,
            );
            if motion.landed {
                self.pending_events.push(GameEvent::LandingImpact {
                    entity_id,
                    position: entity.position,
                });
            }

            if input.shoot {
                if let Some(resolution) = CombatResolver::resolve_shot(
                    &mut self.state.entities,
                    entity_id,
                    self.world.as_ref(),
                    &self.config.character,
                    &self.config.weapon,
                    now,
                ) {
                    self.pending_events.push(resolution.event);
                    if let Some(request) = resolution.damage_request {
                        damage_requests.push(request);
                    }
                }
            }
        }

        // Route damage requests to each target's authority, in order
        for request in damage_requests {
            self.route_damage(request, now);
        }

        // Respawn pass
        for entity_id in self.state.entities.ids() {
            let Some(entity) = self.state.entities.get_mut(entity_id) else {
                continue;
            };
            let acting = entity.authority.state_owner;
            if let Some(position) = RespawnScheduler::tick(
                entity,
                acting,
                &self.config.spawn_points,
                &mut self.state.rng,
                now,
            ) {
                let observer = entity.authority.input_owner;
                self.state.spectators.remove(&observer);
                self.pending_events
                    .push(GameEvent::Respawn { entity_id, position });
                self.snapshot_builder.force_next();
                info!(entity_id = %entity_id, "Player respawned");
            }
        }

        // Dispatch replicated-state transitions to registered observers
        self.dispatch_changes();

        // Auto re-selection for dead observers without a valid target
        self.refresh_spectators();
    }

    /// Deliver a damage request to the target entity's state authority
    fn route_damage(&mut self, request: DamageRequest, now: u64) {
        let connected: Vec<PeerId> = self.state.peers.keys().copied().collect();
        let Some(target) = self.state.entities.get_mut(request.target) else {
            return; // Target despawned since the shot resolved
        };

        let acting = target.authority.state_owner;
        let attacker_valid = is_real_peer(request.attacker, &connected);
        let outcome = CombatResolver::apply_damage(
            target,
            &request,
            acting,
            attacker_valid,
            self.config.respawn_delay_secs,
            now,
        );

        if outcome == DamageOutcome::Rejected {
            return;
        }

        // Cosmetic hit effect goes to every peer
        self.pending_events.push(GameEvent::HitEffect {
            position: request.hit_point,
            normal: request.hit_normal,
        });

        if outcome == DamageOutcome::Killed {
            let victim: EntityId = request.target;
            let victim_peer = self
                .state
                .entities
                .get(victim)
                .map(|e| e.authority.input_owner);

            // Kill credit for the attacker
            let killer = self.state.entities.id_by_input_owner(request.attacker);
            if let Some(killer_id) = killer {
                if let Some(attacker) = self.state.entities.get_mut(killer_id) {
                    let attacker_acting = attacker.authority.state_owner;
                    attacker.add_score(attacker_acting, self.config.weapon.kill_score);
                }
            }

            self.pending_events.push(GameEvent::Death { victim, killer });
            self.snapshot_builder.force_next();

            // The dead participant's camera enters spectator mode
            if let Some(observer) = victim_peer {
                self.state
                    .spectators
                    .entry(observer)
                    .or_insert_with(SpectatorSelector::new);
            }
        }
    }

    /// Drain per-entity change queues and notify registered observers
    fn dispatch_changes(&mut self) {
        for entity_id in self.state.entities.ids() {
            let changes = match self.state.entities.get_mut(entity_id) {
                Some(entity) => entity.drain_changes(),
                None => continue,
            };
            if changes.is_empty() {
                continue;
            }
            let Some(entity) = self.state.entities.get(entity_id) else {
                continue;
            };
            for change in &changes {
                for observer in self.observers.iter_mut() {
                    observer.on_change(entity, change);
                }
                if let StateChange::Score { score } = change {
                    self.pending_events.push(GameEvent::ScoreChanged {
                        peer_id: entity.authority.input_owner,
                        score: *score,
                    });
                }
            }
        }
    }

    /// Once per tick, re-select for any dead observer with no valid target
    /// (covers the watched player dying or disconnecting).
    fn refresh_spectators(&mut self) {
        let mut updates: Vec<ServerMsg> = Vec::new();
        for (&observer, selector) in self.state.spectators.iter_mut() {
            if selector.has_valid_target(observer, &self.state.entities) {
                continue;
            }
            let outcome = selector.advance(1, observer, &self.state.entities);
            updates.push(spectate_msg(observer, outcome));
        }
        for msg in updates {
            let _ = self.broadcast_tx.send(msg);
        }
    }
}

fn spectate_msg(observer: PeerId, outcome: SpectateOutcome) -> ServerMsg {
    match outcome {
        SpectateOutcome::Target {
            entity,
            display_name,
            ..
        } => ServerMsg::SpectateTarget {
            observer,
            target: Some(entity),
            display_name: Some(display_name),
        },
        SpectateOutcome::NoTargets => ServerMsg::SpectateTarget {
            observer,
            target: None,
            display_name: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::time::secs_to_ticks;
    use uuid::Uuid;

    fn test_arena() -> GameArena {
        let config = ArenaConfig {
            spawn_points: SpawnPoints::ring(10.0),
            ..ArenaConfig::default()
        };
        GameArena::new(config, 42).0
    }

    /// Join a peer and drop its entity onto a known position/facing
    fn join_at(arena: &mut GameArena, name: &str, position: Vec3, facing: Vec3) -> (PeerId, EntityId) {
        let peer = Uuid::new_v4();
        arena.handle_join(peer, Some(name.to_string()));
        let entity_id = arena.state.entities.id_by_input_owner(peer).unwrap();
        let entity = arena.state.entities.get_mut(entity_id).unwrap();
        entity.position = position;
        entity.facing = facing;
        entity.grounded = true;
        (peer, entity_id)
    }

    fn shoot_input() -> (u32, Vec3, bool, bool) {
        (0, Vec3::ZERO, true, false)
    }

    fn send_shoot(arena: &mut GameArena, peer: PeerId, seq: u32) {
        let (_, move_dir, shoot, jump) = shoot_input();
        arena.handle_input(peer, seq, move_dir, shoot, jump);
    }

    #[test]
    fn shot_damages_facing_target() {
        let mut arena = test_arena();
        let (shooter, _) = join_at(
            &mut arena,
            "Shooter",
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
        );
        let (_, target_id) = join_at(
            &mut arena,
            "Target",
            Vec3::new(0.0, 0.5, 8.0),
            Vec3::new(0.0, 0.0, -1.0),
        );

        send_shoot(&mut arena, shooter, 1);
        arena.run_tick();

        let target = arena.state.entities.get(target_id).unwrap();
        assert_eq!(target.health(), 90.0);
        assert!(arena
            .pending_events
            .iter()
            .any(|e| matches!(e, GameEvent::HitEffect { .. })));
    }

    #[test]
    fn kill_awards_score_and_enters_spectator_mode() {
        let mut arena = test_arena();
        let (shooter, shooter_id) = join_at(
            &mut arena,
            "Shooter",
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
        );
        let (victim_peer, victim_id) = join_at(
            &mut arena,
            "Victim",
            Vec3::new(0.0, 0.5, 8.0),
            Vec3::new(0.0, 0.0, -1.0),
        );

        // 10 damage per shot, 100 health: ten shots, spaced past the cooldown
        let cooldown = secs_to_ticks(arena.config.weapon.cooldown) + 1;
        let mut seq = 0;
        while !arena.state.entities.get(victim_id).unwrap().is_dead() {
            seq += 1;
            send_shoot(&mut arena, shooter, seq);
            for _ in 0..cooldown {
                arena.run_tick();
            }
            // Keep the victim pinned for a deterministic ray
            let victim = arena.state.entities.get_mut(victim_id).unwrap();
            victim.position = Vec3::new(0.0, 0.5, 8.0);
            assert!(seq <= 20, "victim should die within ten shots");
        }

        let victim = arena.state.entities.get(victim_id).unwrap();
        assert_eq!(victim.health(), 0.0);
        assert!(victim.respawn_timer.is_running());

        let shooter_entity = arena.state.entities.get(shooter_id).unwrap();
        assert_eq!(shooter_entity.score(), 1);

        assert!(arena
            .pending_events
            .iter()
            .any(|e| matches!(e, GameEvent::Death { victim, .. } if *victim == victim_id)));

        // Auto re-selection gave the dead observer a target without input
        let selector = arena.state.spectators.get(&victim_peer).unwrap();
        assert!(selector.has_valid_target(victim_peer, &arena.state.entities));
    }

    #[test]
    fn dead_player_respawns_after_delay() {
        let mut arena = test_arena();
        let (_, entity_id) = join_at(&mut arena, "P1", Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

        {
            let entity = arena.state.entities.get_mut(entity_id).unwrap();
            let acting = entity.authority.state_owner;
            entity.set_health(acting, 0.0);
            CombatResolver::die(entity, acting, arena.config.respawn_delay_secs, arena.state.tick);
        }

        for _ in 0..=secs_to_ticks(arena.config.respawn_delay_secs) {
            arena.run_tick();
        }

        let entity = arena.state.entities.get(entity_id).unwrap();
        assert!(!entity.is_dead());
        assert_eq!(entity.health(), entity.max_health);
        assert!(arena.config.spawn_points.contains(Vec3::new(
            entity.position.x,
            0.0,
            entity.position.z
        )));
        assert!(arena
            .pending_events
            .iter()
            .any(|e| matches!(e, GameEvent::Respawn { entity_id: id, .. } if *id == entity_id)));
    }

    #[test]
    fn spectate_intent_requires_being_dead() {
        let mut arena = test_arena();
        let (peer, _) = join_at(&mut arena, "P1", Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        join_at(&mut arena, "P2", Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));

        arena.handle_spectate(peer, 1);
        assert!(arena.state.spectators.is_empty());
    }

    #[test]
    fn spectate_intent_rejects_invalid_directions() {
        let mut arena = test_arena();
        let (peer, entity_id) = join_at(&mut arena, "P1", Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        join_at(&mut arena, "P2", Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));

        {
            let entity = arena.state.entities.get_mut(entity_id).unwrap();
            let acting = entity.authority.state_owner;
            entity.set_health(acting, 0.0);
            CombatResolver::die(entity, acting, 10.0, 0);
        }

        arena.handle_spectate(peer, 0);
        arena.handle_spectate(peer, 5);
        assert!(arena.state.spectators.is_empty());

        arena.handle_spectate(peer, 1);
        let selector = arena.state.spectators.get(&peer).unwrap();
        assert!(selector.has_valid_target(peer, &arena.state.entities));
    }

    #[test]
    fn duplicate_join_is_ignored() {
        let mut arena = test_arena();
        let peer = Uuid::new_v4();
        arena.handle_join(peer, Some("P1".to_string()));
        arena.handle_join(peer, Some("P1 again".to_string()));
        assert_eq!(arena.state.entities.len(), 1);
    }

    #[test]
    fn leave_despawns_entity() {
        let mut arena = test_arena();
        let (peer, _) = join_at(&mut arena, "P1", Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        arena.handle_leave(peer);
        assert!(arena.state.entities.is_empty());
        assert!(arena.state.peers.is_empty());
    }

    #[tokio::test]
    async fn arena_task_answers_join_over_the_handle() {
        let (arena, handle) = GameArena::new(ArenaConfig::default(), 7);
        tokio::spawn(arena.run());

        let mut rx = handle.broadcast_tx.subscribe();
        handle
            .command_tx
            .send(PeerCommand {
                peer_id: Uuid::new_v4(),
                msg: ClientMsg::Join {
                    display_name: Some("Async".to_string()),
                },
                received_at: 0,
            })
            .await
            .expect("arena task should be receiving");

        let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("arena should broadcast within the timeout")
            .expect("broadcast channel open");
        assert!(matches!(msg, ServerMsg::PlayerJoined { .. }));
        assert_eq!(handle.player_count(), 1);
    }

    #[test]
    fn observers_hear_each_transition_exactly_once() {
        use std::sync::atomic::AtomicUsize;

        struct Counter(Arc<AtomicUsize>);
        impl StateObserver for Counter {
            fn on_change(&mut self, _entity: &PlayerEntity, change: &StateChange) {
                if matches!(change, StateChange::Dead { is_dead: true }) {
                    self.0.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        let mut arena = test_arena();
        let deaths = Arc::new(AtomicUsize::new(0));
        arena.register_observer(Box::new(Counter(deaths.clone())));

        let (_, entity_id) = join_at(&mut arena, "P1", Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        {
            let entity = arena.state.entities.get_mut(entity_id).unwrap();
            let acting = entity.authority.state_owner;
            entity.set_health(acting, 0.0);
            // Two death attempts in the same tick must notify once
            CombatResolver::die(entity, acting, 10.0, 1);
            CombatResolver::die(entity, acting, 10.0, 1);
        }

        arena.run_tick();
        arena.run_tick();
        assert_eq!(deaths.load(Ordering::Relaxed), 1);
    }
}
