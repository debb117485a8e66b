#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Path Defence encounter.

mod config;

use std::{path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_core::{Event, TileCoord};
use path_defence_world::{self as world, query, World};
use tracing::{debug, info, warn};

/// Runs a headless Path Defence encounter and reports how it went.
#[derive(Debug, Parser)]
#[command(name = "path-defence", version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default encounter.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long = "dt-ms", default_value_t = 16)]
    dt_ms: u64,

    /// Tile to build a tower on before the first tick, as COLUMN,ROW.
    #[arg(long = "tower", value_name = "COLUMN,ROW")]
    towers: Vec<TileArg>,
}

/// Tile coordinate accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TileArg(TileCoord);

impl FromStr for TileArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (column, row) = value
            .split_once(',')
            .ok_or_else(|| format!("expected COLUMN,ROW, got `{value}`"))?;
        let column = column
            .trim()
            .parse::<i32>()
            .map_err(|error| format!("invalid column `{column}`: {error}"))?;
        let row = row
            .trim()
            .parse::<i32>()
            .map_err(|error| format!("invalid row `{row}`: {error}"))?;
        Ok(Self(TileCoord::new(column, row)))
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = config::load(args.config.as_deref())?;
    let mut world = World::new(config).context("failed to create world")?;
    println!("{}", query::welcome_banner(&world));

    let mut events = Vec::new();
    for TileArg(tile) in &args.towers {
        if let Err(reason) = world::place_tower(&mut world, *tile, &mut events) {
            warn!(column = tile.column(), row = tile.row(), %reason, "skipping tower");
        }
    }
    events.clear();

    let dt = Duration::from_millis(args.dt_ms);
    let mut now = Duration::ZERO;
    for _ in 0..args.ticks {
        now += dt;
        world::tick(&mut world, dt, now, &mut events);
        for event in events.drain(..) {
            report(&event);
        }
    }

    let stats = query::encounter_stats(&world);
    info!(
        ticks = query::tick_index(&world),
        elapsed_ms = now.as_millis() as u64,
        spawned = stats.enemies_spawned,
        killed = stats.enemies_killed,
        leaked = stats.enemies_leaked,
        fired = stats.projectiles_fired,
        hit = stats.projectiles_hit,
        lost = stats.projectiles_lost,
        "encounter finished"
    );
    println!(
        "{} enemies spawned, {} killed, {} leaked; {} shots fired, {} hit",
        stats.enemies_spawned,
        stats.enemies_killed,
        stats.enemies_leaked,
        stats.projectiles_fired,
        stats.projectiles_hit,
    );
    Ok(())
}

fn report(event: &Event) {
    match event {
        Event::EnemyKilled { enemy } => info!(enemy = enemy.get(), "enemy killed"),
        Event::EnemyReachedEnd { enemy } => info!(enemy = enemy.get(), "enemy reached the end"),
        Event::TimeAdvanced { .. } => {}
        other => debug!(?other, "event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_arg_parses_column_then_row() {
        assert_eq!(
            "4,9".parse::<TileArg>(),
            Ok(TileArg(TileCoord::new(4, 9)))
        );
        assert_eq!(
            " -1 , 2".parse::<TileArg>(),
            Ok(TileArg(TileCoord::new(-1, 2)))
        );
    }

    #[test]
    fn tile_arg_rejects_malformed_input() {
        assert!("4".parse::<TileArg>().is_err());
        assert!("a,1".parse::<TileArg>().is_err());
        assert!("1,2,3".parse::<TileArg>().is_err());
    }

    #[test]
    fn args_accept_repeated_towers() {
        let args = Args::try_parse_from([
            "path-defence",
            "--ticks",
            "10",
            "--dt-ms",
            "50",
            "--tower",
            "1,1",
            "--tower",
            "5,5",
        ])
        .expect("arguments parse");

        assert_eq!(args.ticks, 10);
        assert_eq!(args.dt_ms, 50);
        assert_eq!(
            args.towers,
            vec![
                TileArg(TileCoord::new(1, 1)),
                TileArg(TileCoord::new(5, 5))
            ]
        );
        assert!(args.config.is_none());
    }
}
