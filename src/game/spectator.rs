//! Spectate-target cycling for dead observers
//!
//! The cursor is keyed by the observed entity's state-authority peer rather
//! than a list index, so it survives the candidate list reshuffling between
//! calls (players dying, joining, leaving).

use tracing::debug;

use super::authority::PeerId;
use super::entity::EntityId;
use super::registry::EntityRegistry;

/// Result of a spectate-target advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpectateOutcome {
    Target {
        entity: EntityId,
        /// Cursor key: state authority of the observed entity
        owner: PeerId,
        display_name: String,
    },
    /// No living candidates to observe
    NoTargets,
}

/// Per-observer spectate cursor
#[derive(Debug, Default, Clone)]
pub struct SpectatorSelector {
    /// State-authority peer of the currently observed entity
    current: Option<PeerId>,
}

impl SpectatorSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<PeerId> {
        self.current
    }

    /// Does the cursor still point at a live, spectate-eligible entity?
    pub fn has_valid_target(&self, observer: PeerId, registry: &EntityRegistry) -> bool {
        match self.current {
            Some(owner) => registry.iter().any(|e| {
                e.authority.state_owner == owner
                    && e.authority.state_owner != observer
                    && !e.is_dead()
            }),
            None => false,
        }
    }

    /// Move the cursor by `direction` (+1 next, -1 previous) over the
    /// current candidate list: live entities whose state authority is not
    /// the observer. Wraps in both directions.
    pub fn advance(
        &mut self,
        direction: i32,
        observer: PeerId,
        registry: &EntityRegistry,
    ) -> SpectateOutcome {
        let candidates: Vec<_> = registry
            .iter()
            .filter(|e| e.authority.state_owner != observer && !e.is_dead())
            .collect();

        if candidates.is_empty() {
            debug!(observer = %observer, "No living players to spectate");
            self.current = None;
            return SpectateOutcome::NoTargets;
        }

        let len = candidates.len() as i32;
        let mut index = match self.current {
            Some(owner) => candidates
                .iter()
                .position(|e| e.authority.state_owner == owner)
                .map(|i| i as i32)
                .unwrap_or(-1),
            None => -1,
        };
        // Cursor gone from the list (target just died or left): seed so the
        // step below lands on the natural start for this direction.
        if index == -1 {
            index = if direction > 0 { -1 } else { 0 };
        }

        index += direction.signum();
        if index >= len {
            index = 0;
        } else if index < 0 {
            index = len - 1;
        }

        let target = candidates[index as usize];
        self.current = Some(target.authority.state_owner);
        debug!(
            observer = %observer,
            target = %target.id,
            name = target.display_name(),
            "Spectating player"
        );

        SpectateOutcome::Target {
            entity: target.id,
            owner: target.authority.state_owner,
            display_name: target.display_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::authority::Authority;
    use crate::game::entity::PlayerEntity;
    use crate::ws::protocol::Vec3;
    use uuid::Uuid;

    fn arena_with(names: &[&str]) -> (EntityRegistry, Vec<EntityId>, PeerId) {
        let mut registry = EntityRegistry::new();
        let ids = names
            .iter()
            .map(|name| {
                registry.insert(PlayerEntity::spawn(
                    Authority::player_owned(Uuid::new_v4()),
                    name.to_string(),
                    Vec3::ZERO,
                    100.0,
                ))
            })
            .collect();
        let observer = Uuid::new_v4();
        (registry, ids, observer)
    }

    fn target_of(outcome: SpectateOutcome) -> EntityId {
        match outcome {
            SpectateOutcome::Target { entity, .. } => entity,
            SpectateOutcome::NoTargets => panic!("expected a target"),
        }
    }

    #[test]
    fn unset_cursor_advances_through_registry_order() {
        let (registry, ids, observer) = arena_with(&["P1", "P2", "P3"]);
        let mut selector = SpectatorSelector::new();

        assert_eq!(target_of(selector.advance(1, observer, &registry)), ids[0]);
        assert_eq!(target_of(selector.advance(1, observer, &registry)), ids[1]);
    }

    #[test]
    fn backward_from_first_wraps_to_last() {
        let (registry, ids, observer) = arena_with(&["P1", "P2", "P3"]);
        let mut selector = SpectatorSelector::new();

        selector.advance(1, observer, &registry); // P1
        assert_eq!(target_of(selector.advance(-1, observer, &registry)), ids[2]);
    }

    #[test]
    fn next_then_previous_returns_to_origin() {
        let (registry, ids, observer) = arena_with(&["P1", "P2", "P3"]);
        let mut selector = SpectatorSelector::new();

        selector.advance(1, observer, &registry); // P1
        selector.advance(1, observer, &registry); // P2
        assert_eq!(target_of(selector.advance(-1, observer, &registry)), ids[0]);
    }

    #[test]
    fn forward_past_last_wraps_to_first() {
        let (registry, ids, observer) = arena_with(&["P1", "P2"]);
        let mut selector = SpectatorSelector::new();

        selector.advance(1, observer, &registry); // P1
        selector.advance(1, observer, &registry); // P2
        assert_eq!(target_of(selector.advance(1, observer, &registry)), ids[0]);
    }

    #[test]
    fn dead_candidates_are_excluded() {
        let (mut registry, ids, observer) = arena_with(&["P1", "P2", "P3"]);
        let owner = registry.get(ids[1]).unwrap().authority.state_owner;
        registry.get_mut(ids[1]).unwrap().set_dead(owner, true);

        let mut selector = SpectatorSelector::new();
        assert_eq!(target_of(selector.advance(1, observer, &registry)), ids[0]);
        assert_eq!(target_of(selector.advance(1, observer, &registry)), ids[2]);
    }

    #[test]
    fn observers_own_entity_is_excluded() {
        let mut registry = EntityRegistry::new();
        let observer = Uuid::new_v4();
        registry.insert(PlayerEntity::spawn(
            Authority::player_owned(observer),
            "Me".to_string(),
            Vec3::ZERO,
            100.0,
        ));
        let other = registry.insert(PlayerEntity::spawn(
            Authority::player_owned(Uuid::new_v4()),
            "Other".to_string(),
            Vec3::ZERO,
            100.0,
        ));

        let mut selector = SpectatorSelector::new();
        assert_eq!(target_of(selector.advance(1, observer, &registry)), other);
    }

    #[test]
    fn empty_candidate_set_clears_cursor() {
        let (mut registry, ids, observer) = arena_with(&["P1"]);
        let mut selector = SpectatorSelector::new();
        selector.advance(1, observer, &registry);
        assert!(selector.current().is_some());

        registry.remove(ids[0]);
        assert_eq!(
            selector.advance(1, observer, &registry),
            SpectateOutcome::NoTargets
        );
        assert!(selector.current().is_none());
        assert!(!selector.has_valid_target(observer, &registry));
    }

    #[test]
    fn cursor_on_dead_target_reseeds_to_natural_start() {
        let (mut registry, ids, observer) = arena_with(&["P1", "P2", "P3"]);
        let mut selector = SpectatorSelector::new();
        selector.advance(1, observer, &registry); // P1
        selector.advance(1, observer, &registry); // P2

        // P2 dies; its key is gone from the next candidate list
        let owner = registry.get(ids[1]).unwrap().authority.state_owner;
        registry.get_mut(ids[1]).unwrap().set_dead(owner, true);
        assert!(!selector.has_valid_target(observer, &registry));

        // Forward re-selection lands on the start of the remaining list
        assert_eq!(target_of(selector.advance(1, observer, &registry)), ids[0]);
    }
}
