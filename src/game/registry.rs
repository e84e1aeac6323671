//! Live set of player entities, owned by the arena
//!
//! Mutated only at spawn (insert) and despawn (remove); everything else
//! reads it. Enumeration follows insertion (join) order, which is the order
//! combat target scans and the spectator candidate list observe.

use std::collections::HashMap;

use super::authority::PeerId;
use super::entity::{EntityId, PlayerEntity};

#[derive(Default)]
pub struct EntityRegistry {
    entities: HashMap<EntityId, PlayerEntity>,
    /// Insertion order of live entities
    order: Vec<EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at spawn. Returns the entity id.
    pub fn insert(&mut self, entity: PlayerEntity) -> EntityId {
        let id = entity.id;
        self.order.push(id);
        self.entities.insert(id, entity);
        id
    }

    /// Remove at despawn
    pub fn remove(&mut self, id: EntityId) -> Option<PlayerEntity> {
        self.order.retain(|&e| e != id);
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&PlayerEntity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut PlayerEntity> {
        self.entities.get_mut(&id)
    }

    /// Entity driven by `peer`'s intents, if any
    pub fn by_input_owner(&self, peer: PeerId) -> Option<&PlayerEntity> {
        self.iter().find(|e| e.authority.has_input_authority(peer))
    }

    pub fn id_by_input_owner(&self, peer: PeerId) -> Option<EntityId> {
        self.by_input_owner(peer).map(|e| e.id)
    }

    /// Iterate live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &PlayerEntity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Ids in insertion order (for passes that also need `get_mut`)
    pub fn ids(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
