//! Static waypoint path and the tiles it blocks from construction.

use std::collections::BTreeSet;

use glam::Vec2;
use path_defence_core::{ConfigError, TileCoord, TileGrid};

/// Fixed polyline enemies follow, resolved against a tile grid.
#[derive(Clone, Debug)]
pub struct PathModel {
    waypoints: Vec<TileCoord>,
    route: Vec<Vec2>,
    start: Vec2,
    tiles: BTreeSet<TileCoord>,
}

impl PathModel {
    /// Resolves waypoint tiles into pixel centres and blocked tiles.
    ///
    /// A path needs a start and an end, so fewer than two waypoints are rejected.
    pub fn new(grid: &TileGrid, waypoints: Vec<TileCoord>) -> Result<Self, ConfigError> {
        let [first, _, ..] = waypoints.as_slice() else {
            return Err(ConfigError::TooFewWaypoints(waypoints.len()));
        };

        let start = grid.tile_to_pixel(*first);
        let route = waypoints
            .iter()
            .map(|waypoint| grid.tile_to_pixel(*waypoint))
            .collect();
        let tiles = generate_path_tiles(&waypoints);
        Ok(Self {
            waypoints,
            route,
            start,
            tiles,
        })
    }

    /// Waypoints in travel order, in tile coordinates.
    #[must_use]
    pub fn waypoints(&self) -> &[TileCoord] {
        &self.waypoints
    }

    /// Waypoint tile centres in travel order, in pixels.
    #[must_use]
    pub fn route(&self) -> &[Vec2] {
        &self.route
    }

    /// Pixel position where enemies enter the path.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// Tiles covered by the path.
    #[must_use]
    pub fn tiles(&self) -> &BTreeSet<TileCoord> {
        &self.tiles
    }

    /// Reports whether the tile is covered by the path.
    #[must_use]
    pub fn covers(&self, tile: TileCoord) -> bool {
        self.tiles.contains(&tile)
    }
}

/// Collects every tile covered by the path.
///
/// Each consecutive waypoint pair contributes the full axis-aligned rectangle
/// spanning both endpoints. Straight segments therefore become one-tile-wide
/// strips while a diagonal pair blocks its entire bounding box.
#[must_use]
pub fn generate_path_tiles(waypoints: &[TileCoord]) -> BTreeSet<TileCoord> {
    let mut tiles = BTreeSet::new();

    for pair in waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let (min_column, max_column) = ordered(from.column(), to.column());
        let (min_row, max_row) = ordered(from.row(), to.row());

        for column in min_column..=max_column {
            for row in min_row..=max_row {
                let _ = tiles.insert(TileCoord::new(column, row));
            }
        }
    }

    tiles
}

/// Reports whether a tower may stand on the tile: inside the grid and off the path.
#[must_use]
pub fn is_buildable(tile: TileCoord, path_tiles: &BTreeSet<TileCoord>, grid: &TileGrid) -> bool {
    grid.contains(tile) && !path_tiles.contains(&tile)
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
