#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that decides when enemies enter the path.

use std::time::Duration;

use path_defence_core::SpawnConfig;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Option<Duration>,
    spawn_on_start: bool,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence.
    #[must_use]
    pub const fn new(spawn_interval: Duration, spawn_on_start: bool) -> Self {
        Self {
            spawn_interval: Some(spawn_interval),
            spawn_on_start,
        }
    }

    /// Creates a configuration without a spawn timer.
    #[must_use]
    pub const fn untimed(spawn_on_start: bool) -> Self {
        Self {
            spawn_interval: None,
            spawn_on_start,
        }
    }
}

impl From<SpawnConfig> for Config {
    fn from(config: SpawnConfig) -> Self {
        if config.timed {
            Self::new(config.interval(), config.spawn_on_start)
        } else {
            Self::untimed(config.spawn_on_start)
        }
    }
}

/// Pure system that accumulates elapsed time and reports due spawns.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Option<Duration>,
    accumulator: Duration,
    opening_spawn_pending: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            opening_spawn_pending: config.spawn_on_start,
        }
    }

    /// Advances the spawn timer by `dt` and returns how many enemies to spawn.
    ///
    /// At most one timed spawn happens per call. The timer restarts from zero
    /// after it fires, so any excess time in a long tick is discarded. A zero
    /// interval therefore spawns on every call.
    pub fn handle(&mut self, dt: Duration) -> usize {
        let mut spawns = 0;

        if self.opening_spawn_pending {
            self.opening_spawn_pending = false;
            spawns += 1;
        }

        let Some(interval) = self.spawn_interval else {
            return spawns;
        };

        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator >= interval {
            self.accumulator = Duration::ZERO;
            spawns += 1;
        }

        spawns
    }
}
