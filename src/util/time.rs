//! Simulation clock: fixed tick rate, wall-clock helpers, tick-deadline timers

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 30; // 30 simulation ticks per second
pub const SNAPSHOT_TPS: u32 = 20; // 20 snapshots per second
pub const TICK_DURATION_MICROS: u64 = 1_000_000 / SIMULATION_TPS as u64;

/// Calculate delta time for physics (in seconds)
pub fn tick_delta() -> f32 {
    1.0 / SIMULATION_TPS as f32
}

/// Convert a duration in seconds to a whole number of simulation ticks
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * SIMULATION_TPS as f32).round() as u64
}

/// A countdown deadline stamped in simulation ticks.
///
/// `TickTimer::NONE` means "not running". All timed gating in the simulation
/// (shoot cooldown, collision-sound cooldown, respawn delay) is expressed as
/// one of these checked against the arena's tick counter; nothing ever
/// suspends waiting for a deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickTimer {
    deadline: Option<u64>,
}

impl TickTimer {
    /// A timer that is not running
    pub const NONE: TickTimer = TickTimer { deadline: None };

    /// Start a timer expiring `ticks` simulation ticks after `now`
    pub fn from_ticks(now: u64, ticks: u64) -> Self {
        Self {
            deadline: Some(now + ticks),
        }
    }

    /// Start a timer expiring `secs` seconds after `now`, at the fixed tick rate
    pub fn from_secs(now: u64, secs: f32) -> Self {
        Self::from_ticks(now, secs_to_ticks(secs))
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// True only for a running timer whose deadline has passed
    pub fn expired(&self, now: u64) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// True when the timer never started or has run out (action-permitted check)
    pub fn expired_or_not_running(&self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    /// Ticks left until expiry; `None` when not running
    pub fn remaining_ticks(&self, now: u64) -> Option<u64> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }

    /// Stop the timer
    pub fn clear(&mut self) {
        self.deadline = None;
    }
}
