//! Snapshot building for network transmission

use crate::ws::protocol::{GameEvent, PlayerSnapshot, ServerMsg};

use super::registry::EntityRegistry;

/// Builds snapshots at a reduced rate relative to the simulation
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (used for important events)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    /// Build a snapshot message from the registry's current state
    pub fn build(&self, tick: u64, registry: &EntityRegistry, events: Vec<GameEvent>) -> ServerMsg {
        let players: Vec<PlayerSnapshot> = registry
            .iter()
            .map(|e| PlayerSnapshot {
                entity_id: e.id,
                peer_id: e.authority.input_owner,
                position: e.position,
                facing: e.facing,
                vertical_velocity: e.vertical_velocity,
                grounded: e.grounded,
                health: e.health(),
                is_dead: e.is_dead(),
                jump_count: e.jump_count(),
                score: e.score(),
                last_input_seq: e.last_input_seq,
                shoot_cooldown_ticks: e.shoot_cooldown.remaining_ticks(tick).unwrap_or(0),
            })
            .collect();

        ServerMsg::Snapshot {
            tick,
            players,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sends_every_interval_ticks() {
        let mut builder = SnapshotBuilder::new(3);
        assert!(!builder.should_send());
        assert!(!builder.should_send());
        assert!(builder.should_send());
        assert!(!builder.should_send());
    }

    #[test]
    fn force_next_overrides_interval() {
        let mut builder = SnapshotBuilder::new(10);
        builder.force_next();
        assert!(builder.should_send());
        assert!(!builder.should_send());
    }
}
