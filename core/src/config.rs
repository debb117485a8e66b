//! Static configuration consumed when a world is created.
//!
//! Every section deserialises with `serde` and falls back to the values of the
//! reference encounter: a 20x15 map of 32 pixel tiles with an eight-waypoint
//! path, one basic enemy type and one basic tower type.

use std::time::Duration;

use serde::Deserialize;

use crate::{Health, TileCoord, TileGrid};

/// Complete description of an encounter.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Map geometry and the waypoint path.
    pub map: MapConfig,
    /// Base stats applied to every spawned enemy.
    pub enemy: EnemyConfig,
    /// Base stats applied to every placed tower.
    pub tower: TowerConfig,
    /// Base stats applied to every fired projectile.
    pub projectile: ProjectileConfig,
    /// Enemy spawn cadence.
    pub spawn: SpawnConfig,
}

impl SimulationConfig {
    /// Checks the configuration for deployments that cannot be simulated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map.validate()?;

        if self.enemy.health <= 0 {
            return Err(ConfigError::NonPositiveHealth(self.enemy.health));
        }
        if !positive_finite(self.enemy.speed) {
            return Err(ConfigError::NonPositiveSpeed {
                entity: "enemy",
                speed: self.enemy.speed,
            });
        }
        if !positive_finite(self.projectile.speed) {
            return Err(ConfigError::NonPositiveSpeed {
                entity: "projectile",
                speed: self.projectile.speed,
            });
        }
        if self.tower.range.is_nan() || self.tower.range < 0.0 {
            return Err(ConfigError::NegativeRange(self.tower.range));
        }

        Ok(())
    }
}

fn positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Map geometry and the fixed enemy route.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Side length of a square tile in pixels.
    pub tile_size: f32,
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Ordered tile checkpoints enemies walk through.
    pub waypoints: Vec<TileCoord>,
}

impl MapConfig {
    /// Tile grid described by this configuration.
    #[must_use]
    pub fn tile_grid(&self) -> TileGrid {
        TileGrid::new(self.columns, self.rows, self.tile_size)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !positive_finite(self.tile_size) {
            return Err(ConfigError::NonPositiveTileSize(self.tile_size));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.waypoints.len() < 2 {
            return Err(ConfigError::TooFewWaypoints(self.waypoints.len()));
        }

        let grid = self.tile_grid();
        if let Some((index, waypoint)) = self
            .waypoints
            .iter()
            .enumerate()
            .find(|(_, waypoint)| !grid.contains(**waypoint))
        {
            return Err(ConfigError::WaypointOutOfBounds {
                index,
                waypoint: *waypoint,
            });
        }

        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            columns: 20,
            rows: 15,
            waypoints: vec![
                TileCoord::new(0, 7),
                TileCoord::new(3, 7),
                TileCoord::new(3, 3),
                TileCoord::new(8, 3),
                TileCoord::new(8, 11),
                TileCoord::new(14, 11),
                TileCoord::new(14, 5),
                TileCoord::new(19, 5),
            ],
        }
    }
}

/// Base stats for spawned enemies.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyConfig {
    /// Hit points each enemy spawns with.
    pub health: i32,
    /// Movement speed in pixels per second.
    pub speed: f32,
}

impl EnemyConfig {
    /// Spawn health expressed as a [`Health`] value.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        Health::new(self.health)
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            health: 100,
            speed: 80.0,
        }
    }
}

/// Base stats for placed towers.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TowerConfig {
    /// Targeting radius in pixels; enemies exactly on the boundary are eligible.
    pub range: f32,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Minimum time between two shots, in milliseconds.
    pub fire_cooldown_ms: u64,
}

impl TowerConfig {
    /// Minimum time between two shots.
    #[must_use]
    pub const fn fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.fire_cooldown_ms)
    }
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            range: 100.0,
            damage: 25,
            fire_cooldown_ms: 1_000,
        }
    }
}

/// Base stats for fired projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileConfig {
    /// Flight speed in pixels per second.
    pub speed: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self { speed: 300.0 }
    }
}

/// Enemy spawn cadence.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnConfig {
    /// Time between two timed spawns, in milliseconds. Zero spawns on every tick.
    pub interval_ms: u64,
    /// Spawns one enemy on the very first tick, before the timer is consulted.
    pub spawn_on_start: bool,
    /// Runs the spawn timer. When off, only the opening spawn happens.
    pub timed: bool,
}

impl SpawnConfig {
    /// Time between two timed spawns.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            spawn_on_start: true,
            timed: true,
        }
    }
}

/// Reasons a configuration is rejected at world creation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The path needs at least a start and an end waypoint.
    #[error("path needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),
    /// Tiles must have a positive, finite size.
    #[error("tile size must be positive, got {0}")]
    NonPositiveTileSize(f32),
    /// The map has no tiles.
    #[error("map must have at least one tile, got {columns}x{rows}")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// A waypoint lies outside the map.
    #[error("waypoint {index} at {waypoint:?} lies outside the map")]
    WaypointOutOfBounds {
        /// Position of the waypoint within the path.
        index: usize,
        /// Offending waypoint.
        waypoint: TileCoord,
    },
    /// A moving entity would never move, or would move an unbounded distance.
    #[error("{entity} speed must be positive and finite, got {speed}")]
    NonPositiveSpeed {
        /// Kind of entity the speed belongs to.
        entity: &'static str,
        /// Configured speed.
        speed: f32,
    },
    /// Towers cannot have a negative range.
    #[error("tower range must not be negative, got {0}")]
    NegativeRange(f32),
    /// Enemies must spawn with some health.
    #[error("enemy health must be positive, got {0}")]
    NonPositiveHealth(i32),
}
