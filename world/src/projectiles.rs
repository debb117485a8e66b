//! Homing projectiles fired by towers.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use path_defence_core::{EnemyId, Event, ProjectileId, ProjectileSnapshot};
use tracing::trace;

use crate::{enemies::Enemy, step_toward, towers::FireOrder, SimulationEntity};

/// Distance in pixels at which a projectile strikes its target.
pub(crate) const HIT_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProjectileState {
    Homing,
    Hit,
    Lost,
}

/// Projectile stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    position: Vec2,
    speed: f32,
    damage: u32,
    target: EnemyId,
    state: ProjectileState,
}

impl Projectile {
    /// Launches a projectile from the tower described by `order`.
    pub(crate) fn launch(id: ProjectileId, order: FireOrder, speed: f32) -> Self {
        Self {
            id,
            position: order.from,
            speed,
            damage: order.damage,
            target: order.target,
            state: ProjectileState::Homing,
        }
    }

    /// Re-homes on the target and moves toward it, striking once close enough.
    ///
    /// The target is looked up by identifier every tick; a missing or inert
    /// enemy makes the projectile vanish without dealing damage.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        enemies: &mut BTreeMap<EnemyId, Enemy>,
        out: &mut Vec<Event>,
    ) {
        if !self.is_alive() {
            return;
        }

        let Some(target) = enemies
            .get_mut(&self.target)
            .filter(|enemy| enemy.is_alive())
        else {
            self.state = ProjectileState::Lost;
            trace!(projectile = self.id.get(), "projectile lost its target");
            out.push(Event::ProjectileLost {
                projectile: self.id,
            });
            return;
        };

        let destination = target.position();
        self.position = step_toward(self.position, destination, self.speed * dt.as_secs_f32());

        if self.position.distance(destination) < HIT_RADIUS {
            self.state = ProjectileState::Hit;
            trace!(
                projectile = self.id.get(),
                enemy = self.target.get(),
                damage = self.damage,
                "projectile hit"
            );
            out.push(Event::ProjectileHit {
                projectile: self.id,
                target: self.target,
                damage: self.damage,
            });
            target.take_damage(self.damage, out);
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            target: self.target,
        }
    }
}

impl SimulationEntity for Projectile {
    type Id = ProjectileId;

    fn id(&self) -> ProjectileId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.state == ProjectileState::Homing
    }
}
