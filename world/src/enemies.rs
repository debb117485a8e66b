//! Enemies walking the waypoint path.

use std::time::Duration;

use glam::Vec2;
use path_defence_core::{EnemyConfig, EnemyId, EnemySnapshot, Event, Health};
use tracing::debug;

use crate::{step_toward, SimulationEntity};

/// Distance in pixels at which an enemy counts a waypoint as reached.
pub(crate) const ARRIVAL_RADIUS: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EnemyState {
    Moving,
    Dead,
    ReachedEnd,
}

/// Enemy stored inside the world's arena.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    position: Vec2,
    health: Health,
    max_health: Health,
    speed: f32,
    waypoint_index: usize,
    state: EnemyState,
}

impl Enemy {
    /// Creates an enemy at `position` heading for the first waypoint.
    pub(crate) fn spawn(id: EnemyId, position: Vec2, config: &EnemyConfig) -> Self {
        Self {
            id,
            position,
            health: config.max_health(),
            max_health: config.max_health(),
            speed: config.speed,
            waypoint_index: 0,
            state: EnemyState::Moving,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the enemy along `route` for `dt` of simulated time.
    ///
    /// Waypoints already within [`ARRIVAL_RADIUS`] are consumed before and
    /// after moving. Movement left over after landing on a waypoint carries
    /// into the next segment, so one tick may pass several waypoints and the
    /// distance walked is `speed * dt` however the host slices time. Passing
    /// the last waypoint ends the walk.
    pub(crate) fn advance(&mut self, dt: Duration, route: &[Vec2], out: &mut Vec<Event>) {
        if !self.is_alive() {
            return;
        }

        let mut remaining = self.speed * dt.as_secs_f32();
        loop {
            let Some(target) = self.consume_reached_waypoints(route, out) else {
                return;
            };

            let distance = self.position.distance(target);
            if distance > remaining {
                self.position = step_toward(self.position, target, remaining);
                break;
            }
            self.position = target;
            remaining -= distance;
        }

        let _ = self.consume_reached_waypoints(route, out);
    }

    /// Subtracts `amount` from the enemy's health, killing it at zero or below.
    pub(crate) fn take_damage(&mut self, amount: u32, out: &mut Vec<Event>) {
        if !self.is_alive() {
            return;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health.is_depleted() {
            self.state = EnemyState::Dead;
            debug!(enemy = self.id.get(), "enemy killed");
            out.push(Event::EnemyKilled { enemy: self.id });
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            waypoint_index: self.waypoint_index,
        }
    }

    /// Advances past every waypoint inside the arrival radius and returns the
    /// next one to walk toward, or `None` once the route is exhausted.
    fn consume_reached_waypoints(&mut self, route: &[Vec2], out: &mut Vec<Event>) -> Option<Vec2> {
        while let Some(target) = route.get(self.waypoint_index).copied() {
            if self.position.distance(target) >= ARRIVAL_RADIUS {
                return Some(target);
            }
            self.waypoint_index += 1;
        }

        self.state = EnemyState::ReachedEnd;
        debug!(enemy = self.id.get(), "enemy reached end of path");
        out.push(Event::EnemyReachedEnd { enemy: self.id });
        None
    }
}

impl SimulationEntity for Enemy {
    type Id = EnemyId;

    fn id(&self) -> EnemyId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.state == EnemyState::Moving
    }
}
