#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The [`World`] exclusively owns every enemy, tower and projectile. Hosts
//! drive it through [`apply`] (or the [`tick`] and [`place_tower`] shorthands)
//! and read it back through the [`query`] module. Entities reference each
//! other only by identifier, so a projectile whose enemy has been removed
//! simply fails its lookup on the next tick.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use path_defence_core::{
    Command, ConfigError, EncounterStats, EnemyConfig, EnemyId, Event, PlacementError,
    ProjectileConfig, ProjectileId, SimulationConfig, TileCoord, TileGrid, TowerConfig, TowerId,
    WELCOME_BANNER,
};
use path_defence_system_spawning::{Config as SpawnerConfig, Spawning};
use path_defence_system_tower_targeting::TowerTargeting;
use tracing::{debug, trace};

mod enemies;
pub mod path;
mod projectiles;
mod towers;

use enemies::Enemy;
use path::PathModel;
use projectiles::Projectile;
use towers::TowerRegistry;

/// Capabilities shared by every entity the world simulates.
pub(crate) trait SimulationEntity {
    /// Identifier type used to key the entity in its arena.
    type Id: Copy + Ord;

    /// Identifier assigned at creation.
    fn id(&self) -> Self::Id;

    /// Reports whether the entity still participates in the simulation.
    fn is_alive(&self) -> bool;
}

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_grid: TileGrid,
    path: PathModel,
    enemy_config: EnemyConfig,
    tower_config: TowerConfig,
    projectile_config: ProjectileConfig,
    enemies: BTreeMap<EnemyId, Enemy>,
    towers: TowerRegistry,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    spawning: Spawning,
    targeting: TowerTargeting,
    next_enemy_id: EnemyId,
    next_projectile_id: ProjectileId,
    stats: EncounterStats,
    tick_index: u64,
}

impl World {
    /// Creates a new world for the provided encounter.
    ///
    /// Fails when the configuration cannot describe a playable map, for
    /// example a path with fewer than two waypoints.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let tile_grid = config.map.tile_grid();
        let path = PathModel::new(&tile_grid, config.map.waypoints)?;
        debug!(
            columns = tile_grid.columns(),
            rows = tile_grid.rows(),
            waypoints = path.waypoints().len(),
            path_tiles = path.tiles().len(),
            "world created"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            tile_grid,
            path,
            enemy_config: config.enemy,
            tower_config: config.tower,
            projectile_config: config.projectile,
            enemies: BTreeMap::new(),
            towers: TowerRegistry::new(),
            projectiles: BTreeMap::new(),
            spawning: Spawning::new(SpawnerConfig::from(config.spawn)),
            targeting: TowerTargeting::new(),
            next_enemy_id: EnemyId::new(0),
            next_projectile_id: ProjectileId::new(0),
            stats: EncounterStats::default(),
            tick_index: 0,
        })
    }

    fn spawn_enemy(&mut self, out: &mut Vec<Event>) {
        let start = self.path.start();
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        admit(
            &mut self.enemies,
            Enemy::spawn(id, start, &self.enemy_config),
        );
        debug!(enemy = id.get(), x = start.x, y = start.y, "enemy spawned");
        out.push(Event::EnemySpawned {
            enemy: id,
            position: start,
        });
    }

    fn check_placement(&self, tile: TileCoord) -> Result<(), PlacementError> {
        if !self.tile_grid.contains(tile) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.path.covers(tile) {
            return Err(PlacementError::OnPath);
        }
        if self.towers.tower_at(tile).is_some() {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt, now } => tick(world, dt, now, out_events),
        Command::PlaceTower { tile } => {
            let _ = place_tower(world, tile, out_events);
        }
    }
}

/// Advances the simulation by `dt`, ending at simulation time `now`.
///
/// Phases run in a fixed order: spawning, enemy movement, tower targeting,
/// projectile flight, and finally removal of every enemy and projectile that
/// stopped being alive. Terminal events are emitted when the transition
/// happens, so removal never hides an event.
pub fn tick(world: &mut World, dt: Duration, now: Duration, out_events: &mut Vec<Event>) {
    let first_event = out_events.len();
    world.tick_index = world.tick_index.saturating_add(1);
    out_events.push(Event::TimeAdvanced { dt });

    for _ in 0..world.spawning.handle(dt) {
        world.spawn_enemy(out_events);
    }

    for enemy in world.enemies.values_mut() {
        enemy.advance(dt, world.path.route(), out_events);
    }

    world.targeting.prepare(
        world
            .enemies
            .values()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| (enemy.id(), enemy.position())),
    );
    for tower in world.towers.iter_mut() {
        let Some(order) = tower.advance(now, &world.targeting) else {
            continue;
        };

        let id = world.next_projectile_id;
        world.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        debug!(
            projectile = id.get(),
            tower = order.tower.get(),
            enemy = order.target.get(),
            "tower fired"
        );
        out_events.push(Event::ProjectileSpawned {
            projectile: id,
            tower: order.tower,
            from: order.from,
            target: order.target,
        });
        admit(
            &mut world.projectiles,
            Projectile::launch(id, order, world.projectile_config.speed),
        );
    }

    for projectile in world.projectiles.values_mut() {
        projectile.advance(dt, &mut world.enemies, out_events);
    }

    reconcile(&mut world.enemies);
    reconcile(&mut world.projectiles);

    for event in &out_events[first_event..] {
        record(&mut world.stats, event);
    }
    trace!(
        tick = world.tick_index,
        enemies = world.enemies.len(),
        projectiles = world.projectiles.len(),
        "tick complete"
    );
}

/// Builds a tower centred on `tile`.
///
/// Rejected placements leave the world untouched and are reported both as the
/// returned error and as [`Event::TowerPlacementRejected`].
pub fn place_tower(
    world: &mut World,
    tile: TileCoord,
    out_events: &mut Vec<Event>,
) -> Result<TowerId, PlacementError> {
    if let Err(reason) = world.check_placement(tile) {
        debug!(
            column = tile.column(),
            row = tile.row(),
            %reason,
            "tower placement rejected"
        );
        out_events.push(Event::TowerPlacementRejected { tile, reason });
        return Err(reason);
    }

    let position = world.tile_grid.tile_to_pixel(tile);
    let tower = world.towers.insert(tile, position, &world.tower_config);
    debug!(
        tower = tower.get(),
        column = tile.column(),
        row = tile.row(),
        "tower placed"
    );
    out_events.push(Event::TowerPlaced { tower, tile });
    Ok(tower)
}

/// Inserts a freshly created entity into its arena.
pub(crate) fn admit<E: SimulationEntity>(arena: &mut BTreeMap<E::Id, E>, entity: E) {
    let _ = arena.insert(entity.id(), entity);
}

/// Drops every entity that is no longer alive.
pub(crate) fn reconcile<E: SimulationEntity>(arena: &mut BTreeMap<E::Id, E>) {
    arena.retain(|_, entity| entity.is_alive());
}

/// Moves `from` toward `to` by at most `max_step`, landing exactly on `to`
/// when it is within reach. Coincident points yield no movement.
pub(crate) fn step_toward(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_step {
        return to;
    }
    from + offset / distance * max_step
}

fn record(stats: &mut EncounterStats, event: &Event) {
    let counter = match event {
        Event::EnemySpawned { .. } => &mut stats.enemies_spawned,
        Event::EnemyKilled { .. } => &mut stats.enemies_killed,
        Event::EnemyReachedEnd { .. } => &mut stats.enemies_leaked,
        Event::ProjectileSpawned { .. } => &mut stats.projectiles_fired,
        Event::ProjectileHit { .. } => &mut stats.projectiles_hit,
        Event::ProjectileLost { .. } => &mut stats.projectiles_lost,
        Event::TimeAdvanced { .. }
        | Event::TowerPlaced { .. }
        | Event::TowerPlacementRejected { .. } => return,
    };
    *counter = counter.saturating_add(1);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use super::{path, World};
    use path_defence_core::{
        EncounterStats, EnemyView, ProjectileView, TileCoord, TileGrid, TowerId, TowerView,
    };

    /// Retrieves the welcome banner that hosts may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Waypoints enemies follow, in tile coordinates.
    #[must_use]
    pub fn waypoints(world: &World) -> &[TileCoord] {
        world.path.waypoints()
    }

    /// Tiles covered by the enemy path.
    #[must_use]
    pub fn path_tiles(world: &World) -> &BTreeSet<TileCoord> {
        world.path.tiles()
    }

    /// Reports whether the tile lies inside the map and off the path.
    ///
    /// Existing towers are not considered; see [`can_place_tower`].
    #[must_use]
    pub fn is_buildable_tile(world: &World, tile: TileCoord) -> bool {
        path::is_buildable(tile, world.path.tiles(), &world.tile_grid)
    }

    /// Reports whether a placement request for the tile would succeed.
    #[must_use]
    pub fn can_place_tower(world: &World, tile: TileCoord) -> bool {
        world.check_placement(tile).is_ok()
    }

    /// Identifies the tower standing on the tile, if any.
    #[must_use]
    pub fn tower_at(world: &World, tile: TileCoord) -> Option<TowerId> {
        world.towers.tower_at(tile)
    }

    /// Captures a read-only view of the enemies on the path.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.values().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .values()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Running tally of spawns, kills, leaks and shots.
    #[must_use]
    pub fn encounter_stats(world: &World) -> EncounterStats {
        world.stats
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
