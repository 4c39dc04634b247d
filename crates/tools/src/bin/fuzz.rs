use std::collections::BTreeSet;
use std::io;

use anyhow::{Result, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use worldmap::{Direction, Exit, GridPos, LayoutConfig, Location, Terrain, WorldMap};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    worlds: u32,
    #[arg(long, default_value_t = 60)]
    size: usize,
}

const TERRAIN: [Terrain; 6] = [
    Terrain::Lake,
    Terrain::Mountain,
    Terrain::Swamp,
    Terrain::OpenWater,
    Terrain::Forest,
    Terrain::Plains,
];

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn below(rng: &mut ChaCha8Rng, bound: usize) -> usize {
    rng.next_u64() as usize % bound.max(1)
}

fn random_world(rng: &mut ChaCha8Rng, max_size: usize) -> Vec<Location> {
    let size = 1 + below(rng, max_size);
    let mut locations: Vec<Location> =
        (0..size).map(|index| Location::new(format!("room{index}"))).collect();

    // Exits are random, so some are dangling, one-way or self-loops.
    for location in &mut locations {
        let exits = below(rng, 4);
        for _ in 0..exits {
            let target = if rng.next_u64() % 16 == 0 {
                format!("missing{}", below(rng, 4))
            } else {
                format!("room{}", below(rng, size))
            };
            let direction = choose(rng, &Direction::ALL);
            location.exits.push(Exit::new(target, direction));
        }
        if rng.next_u64() % 12 == 0 {
            let x = below(rng, 11) as i32 - 5;
            let y = below(rng, 11) as i32 - 5;
            location.grid = Some(GridPos::new(x, y));
        }
        if rng.next_u64() % 4 == 0 {
            location.terrain.insert(choose(rng, &TERRAIN));
        }
    }
    locations
}

fn check_world(world: &WorldMap, locations: &[Location]) -> Result<()> {
    let layout = world.layout(locations);
    let ids: BTreeSet<_> = locations.iter().map(|location| &location.id).collect();

    ensure!(layout.grid.len() == ids.len(), "every location must be placed exactly once");
    let cells: BTreeSet<_> = layout.grid.values().collect();
    ensure!(cells.len() == layout.grid.len(), "two locations share a grid cell");

    for location in locations {
        if let Some(stored) = location.grid
            && layout.grid.get(&location.id) != Some(&stored)
        {
            let taken_earlier = locations
                .iter()
                .take_while(|other| other.id != location.id)
                .any(|other| other.grid == Some(stored));
            ensure!(taken_earlier, "{} lost its stored cell {stored:?}", location.id);
        }
    }

    let padding = world.config().padding;
    for pos in layout.normalized.values() {
        for value in [pos.x, pos.y] {
            ensure!(
                value == 0.5 || (padding - 1e-9..=1.0 - padding + 1e-9).contains(&value),
                "normalized value {value} escaped the padded band"
            );
        }
    }

    for edge in &layout.edges {
        ensure!(edge.from != edge.to, "self-loop edge survived classification");
        ensure!(
            ids.contains(&edge.from) && ids.contains(&edge.to),
            "edge {} -> {} references an unknown location",
            edge.from,
            edge.to
        );
    }

    let paths = world.connection_paths(&layout, locations, None);
    ensure!(paths.iter().all(|path| path.is_two_way), "one-way path drawn without focus");
    ensure!(
        paths == world.connection_paths(&layout, locations, None),
        "connector routing is not deterministic"
    );
    ensure!(
        layout.snapshot_hash() == world.layout(locations).snapshot_hash(),
        "layout is not deterministic"
    );
    debug!(locations = locations.len(), paths = paths.len(), "world checked");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!(seed = args.seed, worlds = args.worlds, size = args.size, "starting layout fuzz");

    let world = WorldMap::new(LayoutConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for round in 0..args.worlds {
        let locations = random_world(&mut rng, args.size);
        check_world(&world, &locations)
            .map_err(|err| err.context(format!("world {round} (seed {})", args.seed)))?;
    }

    info!("fuzzing completed successfully");
    Ok(())
}
