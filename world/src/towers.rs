//! Authoritative tower state management utilities.

use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use glam::Vec2;
use path_defence_core::{EnemyId, TileCoord, TowerConfig, TowerId, TowerSnapshot};
use path_defence_system_tower_targeting::TowerTargeting;
use tracing::trace;

use crate::SimulationEntity;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    id: TowerId,
    tile: TileCoord,
    position: Vec2,
    range: f32,
    damage: u32,
    fire_cooldown: Duration,
    last_fired: Duration,
}

/// Shot requested by a tower during its advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FireOrder {
    pub(crate) tower: TowerId,
    pub(crate) from: Vec2,
    pub(crate) target: EnemyId,
    pub(crate) damage: u32,
}

impl Tower {
    /// Scans the prepared enemies and fires at the nearest one when off cooldown.
    ///
    /// The cooldown is measured against `now`, so the number of shots over an
    /// interval does not depend on how finely the host slices time.
    pub(crate) fn advance(&mut self, now: Duration, targeting: &TowerTargeting) -> Option<FireOrder> {
        if now < self.last_fired.saturating_add(self.fire_cooldown) {
            return None;
        }

        let target = targeting.nearest(self.position, self.range)?;
        trace!(
            tower = self.id.get(),
            enemy = target.enemy.get(),
            x = target.enemy_position.x,
            y = target.enemy_position.y,
            distance = target.distance,
            "tower acquired target"
        );
        self.last_fired = now;
        Some(FireOrder {
            tower: self.id,
            from: self.position,
            target: target.enemy,
            damage: self.damage,
        })
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            tile: self.tile,
            position: self.position,
            range: self.range,
            last_fired: self.last_fired,
        }
    }
}

impl SimulationEntity for Tower {
    type Id = TowerId;

    fn id(&self) -> TowerId {
        self.id
    }

    fn is_alive(&self) -> bool {
        true
    }
}

/// Registry that stores towers, indexes them by tile, and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    by_tile: HashMap<TileCoord, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_tile: HashMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds a tower on `tile`. Callers validate the tile beforehand.
    pub(crate) fn insert(&mut self, tile: TileCoord, position: Vec2, config: &TowerConfig) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));

        let tower = Tower {
            id,
            tile,
            position,
            range: config.range,
            damage: config.damage,
            fire_cooldown: config.fire_cooldown(),
            last_fired: Duration::ZERO,
        };
        let _ = self.by_tile.insert(tile, id);
        crate::admit(&mut self.entries, tower);
        id
    }

    pub(crate) fn tower_at(&self, tile: TileCoord) -> Option<TowerId> {
        self.by_tile.get(&tile).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }
}
