#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects the nearest enemy within a tower's range.

use glam::Vec2;
use path_defence_core::EnemyId;

/// Tower targeting system that reuses a scratch buffer of candidates across towers.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

/// Target chosen for a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Enemy selected by the scan.
    pub enemy: EnemyId,
    /// Pixel position of the enemy when the scan ran.
    pub enemy_position: Vec2,
    /// Euclidean distance between the tower and the enemy.
    pub distance: f32,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the live enemies that towers may scan during this tick.
    ///
    /// Candidates keep the order they are supplied in; that order decides ties.
    pub fn prepare<I>(&mut self, enemies: I)
    where
        I: IntoIterator<Item = (EnemyId, Vec2)>,
    {
        self.enemy_workspace.clear();
        self.enemy_workspace.extend(
            enemies
                .into_iter()
                .map(|(id, position)| EnemyCandidate { id, position }),
        );
    }

    /// Returns the nearest prepared enemy whose distance from `origin` is at most `range`.
    ///
    /// A later candidate only wins when strictly nearer, so equidistant enemies
    /// resolve to the one supplied first.
    #[must_use]
    pub fn nearest(&self, origin: Vec2, range: f32) -> Option<TowerTarget> {
        let mut best: Option<TowerTarget> = None;

        for candidate in &self.enemy_workspace {
            let distance = origin.distance(candidate.position);
            if distance > range {
                continue;
            }

            let improves = best.map_or(true, |current| distance < current.distance);
            if improves {
                best = Some(TowerTarget {
                    enemy: candidate.id,
                    enemy_position: candidate.position,
                    distance,
                });
            }
        }

        best
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}
