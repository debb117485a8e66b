use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use path_defence_core::{
    Command, EnemyConfig, EnemyId, Event, MapConfig, SimulationConfig, SpawnConfig, TileCoord,
};
use path_defence_world::{self as world, query, World};

fn straight_path_config() -> SimulationConfig {
    SimulationConfig {
        map: MapConfig {
            waypoints: vec![TileCoord::new(0, 7), TileCoord::new(3, 7)],
            ..MapConfig::default()
        },
        spawn: SpawnConfig {
            timed: false,
            ..SpawnConfig::default()
        },
        ..SimulationConfig::default()
    }
}

/// Keeps a single enemy loitering next to the path start for the whole run.
fn loitering_enemy_config() -> SimulationConfig {
    SimulationConfig {
        enemy: EnemyConfig {
            health: 1_000_000,
            speed: 0.001,
        },
        spawn: SpawnConfig {
            timed: false,
            ..SpawnConfig::default()
        },
        ..SimulationConfig::default()
    }
}

fn run(world: &mut World, dt: Duration, ticks: u32, clock: &mut Duration) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        *clock += dt;
        world::apply(world, Command::Tick { dt, now: *clock }, &mut events);
    }
    events
}

fn count(events: &[Event], matches: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| matches(event)).count()
}

#[test]
fn enemy_reaches_end_of_straight_path_after_distance_over_speed() {
    let mut world = World::new(straight_path_config()).expect("valid config");
    let mut clock = Duration::ZERO;
    let dt = Duration::from_millis(100);

    let events = run(&mut world, dt, 11, &mut clock);
    assert_eq!(
        events[1],
        Event::EnemySpawned {
            enemy: EnemyId::new(0),
            position: Vec2::new(16.0, 240.0),
        }
    );
    let view = query::enemy_view(&world);
    let enemy = view.get(EnemyId::new(0)).expect("enemy still walking");
    assert_eq!(enemy.position, Vec2::new(104.0, 240.0));

    let events = run(&mut world, dt, 1, &mut clock);
    assert_eq!(clock, Duration::from_millis(1_200));
    assert!(events.contains(&Event::EnemyReachedEnd {
        enemy: EnemyId::new(0)
    }));
    assert!(query::enemy_view(&world).is_empty(), "leaked enemy is removed");
    assert_eq!(query::encounter_stats(&world).enemies_leaked, 1);
}

#[test]
fn tower_fire_count_is_independent_of_tick_granularity() {
    let fire_count = |dt: Duration, ticks: u32| {
        let mut world = World::new(loitering_enemy_config()).expect("valid config");
        let mut events = Vec::new();
        world::place_tower(&mut world, TileCoord::new(1, 6), &mut events).expect("buildable");

        let mut clock = Duration::ZERO;
        let events = run(&mut world, dt, ticks, &mut clock);
        assert_eq!(clock, Duration::from_secs(5));
        count(&events, |event| matches!(event, Event::ProjectileSpawned { .. }))
    };

    let fine = fire_count(Duration::from_millis(1), 5_000);
    let coarse = fire_count(Duration::from_millis(500), 10);
    assert_eq!(fine, coarse);
    assert_eq!(fine, 5, "one shot per full second of cooldown");
}

#[test]
fn tower_kills_enemy_with_four_hits() {
    let mut world = World::new(SimulationConfig {
        enemy: EnemyConfig {
            health: 100,
            speed: 0.001,
        },
        ..loitering_enemy_config()
    })
    .expect("valid config");
    let mut events = Vec::new();
    world::place_tower(&mut world, TileCoord::new(1, 6), &mut events).expect("buildable");

    let mut clock = Duration::ZERO;
    let events = run(&mut world, Duration::from_millis(50), 100, &mut clock);

    let hits: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileHit { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![25, 25, 25, 25]);
    assert_eq!(
        count(&events, |event| matches!(event, Event::EnemyKilled { .. })),
        1
    );
    assert!(query::enemy_view(&world).is_empty());

    let stats = query::encounter_stats(&world);
    assert_eq!(stats.enemies_killed, 1);
    assert_eq!(stats.projectiles_hit, 4);
}

#[test]
fn projectile_in_flight_is_lost_when_another_kills_its_target() {
    let mut world = World::new(SimulationConfig {
        enemy: EnemyConfig {
            health: 25,
            speed: 0.001,
        },
        ..loitering_enemy_config()
    })
    .expect("valid config");
    let mut events = Vec::new();
    // Both towers fire on the same tick; the nearer shot kills before the farther lands.
    world::place_tower(&mut world, TileCoord::new(1, 6), &mut events).expect("buildable");
    world::place_tower(&mut world, TileCoord::new(0, 4), &mut events).expect("buildable");

    let mut clock = Duration::ZERO;
    let events = run(&mut world, Duration::from_millis(50), 40, &mut clock);

    assert_eq!(
        count(&events, |event| matches!(event, Event::ProjectileSpawned { .. })),
        2
    );
    assert_eq!(
        count(&events, |event| matches!(event, Event::ProjectileHit { .. })),
        1
    );
    assert_eq!(
        count(&events, |event| matches!(event, Event::ProjectileLost { .. })),
        1
    );
    assert!(query::projectile_view(&world).into_vec().is_empty());
}

#[test]
fn health_and_waypoint_progress_are_monotonic() {
    let mut world = World::new(SimulationConfig::default()).expect("valid config");
    let mut events = Vec::new();
    for tile in [(2, 6), (4, 4), (7, 5), (9, 10), (13, 7), (15, 6)] {
        world::place_tower(&mut world, TileCoord::new(tile.0, tile.1), &mut events)
            .expect("buildable");
    }

    let mut previous: BTreeMap<EnemyId, (i32, usize)> = BTreeMap::new();
    let mut clock = Duration::ZERO;
    let dt = Duration::from_millis(16);
    let mut all_events = Vec::new();

    for _ in 0..3_000 {
        all_events.extend(run(&mut world, dt, 1, &mut clock));
        for enemy in query::enemy_view(&world).iter() {
            assert!(enemy.health <= enemy.max_health);
            assert!(!enemy.health.is_depleted(), "dead enemies are never visible");
            if let Some((health, waypoint)) = previous.get(&enemy.id) {
                assert!(enemy.health.get() <= *health, "health increased");
                assert!(enemy.waypoint_index >= *waypoint, "waypoint index decreased");
            }
            let _ = previous.insert(enemy.id, (enemy.health.get(), enemy.waypoint_index));
        }
    }

    let mut terminal: BTreeMap<EnemyId, usize> = BTreeMap::new();
    for event in &all_events {
        if let Event::EnemyKilled { enemy } | Event::EnemyReachedEnd { enemy } = event {
            *terminal.entry(*enemy).or_default() += 1;
        }
    }
    assert!(
        terminal.values().all(|count| *count == 1),
        "each enemy terminates exactly once"
    );

    let stats = query::encounter_stats(&world);
    assert!(stats.enemies_spawned > 20);
    assert!(stats.projectiles_fired > 0);
    assert_eq!(
        stats.enemies_spawned as usize,
        query::enemy_view(&world).len()
            + stats.enemies_killed as usize
            + stats.enemies_leaked as usize
    );
}

#[test]
fn timed_spawns_follow_interval_and_reset() {
    let mut world = World::new(SimulationConfig {
        spawn: SpawnConfig {
            interval_ms: 2_000,
            ..SpawnConfig::default()
        },
        ..SimulationConfig::default()
    })
    .expect("valid config");
    let mut clock = Duration::ZERO;

    fn spawned(events: &[Event]) -> usize {
        count(events, |event| matches!(event, Event::EnemySpawned { .. }))
    }

    assert_eq!(spawned(&run(&mut world, Duration::from_millis(500), 1, &mut clock)), 1);
    assert_eq!(spawned(&run(&mut world, Duration::from_millis(500), 2, &mut clock)), 0);
    assert_eq!(spawned(&run(&mut world, Duration::from_millis(500), 1, &mut clock)), 1);
    assert_eq!(spawned(&run(&mut world, Duration::from_millis(500), 4, &mut clock)), 1);

    let ids: Vec<_> = query::enemy_view(&world).iter().map(|enemy| enemy.id).collect();
    assert_eq!(ids, vec![EnemyId::new(0), EnemyId::new(1), EnemyId::new(2)]);
}

#[test]
fn zero_spawn_interval_spawns_on_every_tick() {
    let mut world = World::new(SimulationConfig {
        spawn: SpawnConfig {
            interval_ms: 0,
            spawn_on_start: false,
            ..SpawnConfig::default()
        },
        ..SimulationConfig::default()
    })
    .expect("valid config");
    let mut clock = Duration::ZERO;

    let events = run(&mut world, Duration::from_millis(16), 3, &mut clock);

    assert_eq!(
        count(&events, |event| matches!(event, Event::EnemySpawned { .. })),
        3
    );
    assert_eq!(query::enemy_view(&world).len(), 3);
}

#[test]
fn leak_time_does_not_depend_on_tick_size() {
    fn leak_time(dt: Duration) -> Duration {
        let mut world = World::new(SimulationConfig {
            spawn: SpawnConfig {
                timed: false,
                ..SpawnConfig::default()
            },
            ..SimulationConfig::default()
        })
        .expect("valid config");
        let mut clock = Duration::ZERO;

        while clock < Duration::from_secs(60) {
            let events = run(&mut world, dt, 1, &mut clock);
            if events
                .iter()
                .any(|event| matches!(event, Event::EnemyReachedEnd { .. }))
            {
                return clock;
            }
        }
        panic!("enemy never reached the end with dt {dt:?}");
    }

    // 1184 pixels of path at 80 pixels per second.
    let walk = 14.8_f32;
    // Each waypoint may be left up to one arrival radius (5 px) early.
    let arrival_slack = 8.0 * 5.0 / 80.0;

    for dt in [Duration::from_millis(1), Duration::from_millis(500)] {
        let leaked = leak_time(dt).as_secs_f32();
        let tolerance = dt.as_secs_f32() + arrival_slack;
        assert!(
            (leaked - walk).abs() <= tolerance,
            "dt {dt:?}: leaked after {leaked}s, expected {walk}s +/- {tolerance}s"
        );
    }
}
