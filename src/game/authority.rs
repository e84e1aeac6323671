//! Per-entity authority roles and capability checks

use uuid::Uuid;

/// A connected participant (or the session host acting on its behalf)
pub type PeerId = Uuid;

/// Role a peer holds for a given entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Exclusive write permission over the entity's replicated fields
    StateAuthority,
    /// May submit move/shoot/jump intents for the entity
    InputAuthority,
    /// Read-only observer
    Proxy,
}

/// Authority assignment for one entity. Fixed at spawn; there is no
/// ownership migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority {
    /// The single peer permitted to write replicated fields
    pub state_owner: PeerId,
    /// The peer whose intents drive the entity
    pub input_owner: PeerId,
}

impl Authority {
    /// Player-controlled entities get both roles assigned to the connecting
    /// participant at spawn.
    pub fn player_owned(peer: PeerId) -> Self {
        Self {
            state_owner: peer,
            input_owner: peer,
        }
    }

    /// Resolve the role `peer` holds for this entity. State authority wins
    /// when both roles point at the same peer.
    pub fn role_of(&self, peer: PeerId) -> Role {
        if peer == self.state_owner {
            Role::StateAuthority
        } else if peer == self.input_owner {
            Role::InputAuthority
        } else {
            Role::Proxy
        }
    }

    pub fn has_state_authority(&self, peer: PeerId) -> bool {
        peer == self.state_owner
    }

    pub fn has_input_authority(&self, peer: PeerId) -> bool {
        peer == self.input_owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_owned_holds_both_roles() {
        let peer = Uuid::new_v4();
        let authority = Authority::player_owned(peer);
        assert_eq!(authority.role_of(peer), Role::StateAuthority);
        assert!(authority.has_state_authority(peer));
        assert!(authority.has_input_authority(peer));
    }

    #[test]
    fn other_peers_are_proxies() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let authority = Authority::player_owned(owner);
        assert_eq!(authority.role_of(stranger), Role::Proxy);
        assert!(!authority.has_state_authority(stranger));
        assert!(!authority.has_input_authority(stranger));
    }

    #[test]
    fn split_roles_resolve_separately() {
        let host = Uuid::new_v4();
        let driver = Uuid::new_v4();
        let authority = Authority {
            state_owner: host,
            input_owner: driver,
        };
        assert_eq!(authority.role_of(host), Role::StateAuthority);
        assert_eq!(authority.role_of(driver), Role::InputAuthority);
    }
}
