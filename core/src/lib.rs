#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then appends [`Event`] values to a caller-owned
//! queue so the host can drive visuals. Read-only views expose entity state
//! between ticks without granting mutable access.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{
    ConfigError, EnemyConfig, MapConfig, ProjectileConfig, SimulationConfig, SpawnConfig,
    TowerConfig,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Path Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Simulation time at the end of this tick, measured from the start of the encounter.
        now: Duration,
    },
    /// Requests placement of a tower centred on the provided tile.
    PlaceTower {
        /// Tile that should host the tower.
        tile: TileCoord,
    },
}

/// Events appended by the world while processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the path at its first waypoint.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Pixel position the enemy occupies after spawning.
        position: Vec2,
    },
    /// Reports that an enemy's health dropped to zero or below.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
    },
    /// Reports that an enemy walked past the final waypoint.
    EnemyReachedEnd {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
    },
    /// Confirms that a tower fired a projectile.
    ProjectileSpawned {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired the projectile.
        tower: TowerId,
        /// Pixel position the projectile was launched from.
        from: Vec2,
        /// Enemy the projectile is homing on.
        target: EnemyId,
    },
    /// Reports that a projectile struck its target.
    ProjectileHit {
        /// Identifier of the projectile that hit.
        projectile: ProjectileId,
        /// Enemy that received the damage.
        target: EnemyId,
        /// Amount of damage applied.
        damage: u32,
    },
    /// Reports that a projectile lost its target and vanished without damage.
    ProjectileLost {
        /// Identifier of the projectile that expired.
        projectile: ProjectileId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Tile occupied by the tower.
        tile: TileCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Tile provided in the placement request.
        tile: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map tile expressed as column and row coordinates.
///
/// Coordinates are signed so that pointer positions left of or above the map
/// resolve to tiles that are simply out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }
}

/// Hit points carried by an enemy.
///
/// Health may drop to zero or below at the moment an enemy dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the raw hit point count.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the health remaining after subtracting `damage`.
    #[must_use]
    pub fn saturating_sub(self, damage: u32) -> Self {
        let damage = i32::try_from(damage).unwrap_or(i32::MAX);
        Self(self.0.saturating_sub(damage))
    }

    /// Reports whether the value represents a depleted enemy.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }
}

/// Describes the discrete tile layout of the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_size: f32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_size: f32) -> Self {
        Self {
            columns,
            rows,
            tile_size,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Total width of the grid measured in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Total height of the grid measured in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Reports whether the tile lies within `[0, columns) x [0, rows)`.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        let inside = |value: i32, bound: u32| u32::try_from(value).map_or(false, |v| v < bound);
        inside(tile.column(), self.columns) && inside(tile.row(), self.rows)
    }

    /// Pixel position of the tile centre.
    #[must_use]
    pub fn tile_to_pixel(&self, tile: TileCoord) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new(
            tile.column() as f32 * self.tile_size + half,
            tile.row() as f32 * self.tile_size + half,
        )
    }

    /// Tile containing the provided pixel position.
    #[must_use]
    pub fn pixel_to_tile(&self, pixel: Vec2) -> TileCoord {
        TileCoord::new(
            (pixel.x / self.tile_size).floor() as i32,
            (pixel.y / self.tile_size).floor() as i32,
        )
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// The requested tile lies outside the map.
    #[error("tile lies outside the map")]
    OutOfBounds,
    /// The requested tile is part of the enemy path.
    #[error("tile is part of the enemy path")]
    OnPath,
    /// A tower already occupies the requested tile.
    #[error("tile already holds a tower")]
    Occupied,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Pixel position of the enemy.
    pub position: Vec2,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points the enemy spawned with.
    pub max_health: Health,
    /// Index of the waypoint the enemy is currently walking toward.
    pub waypoint_index: usize,
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for a specific enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Tile occupied by the tower.
    pub tile: TileCoord,
    /// Pixel position of the tower centre.
    pub position: Vec2,
    /// Targeting radius in pixels.
    pub range: f32,
    /// Simulation time of the most recent shot.
    pub last_fired: Duration,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Pixel position of the projectile.
    pub position: Vec2,
    /// Enemy the projectile is homing on.
    pub target: EnemyId,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Running tally of the encounter since the world was created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EncounterStats {
    /// Enemies that entered the path.
    pub enemies_spawned: u32,
    /// Enemies destroyed by projectiles.
    pub enemies_killed: u32,
    /// Enemies that reached the end of the path.
    pub enemies_leaked: u32,
    /// Projectiles fired by towers.
    pub projectiles_fired: u32,
    /// Projectiles that damaged their target.
    pub projectiles_hit: u32,
    /// Projectiles that vanished after losing their target.
    pub projectiles_lost: u32,
}
