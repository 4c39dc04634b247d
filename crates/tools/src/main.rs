use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use worldmap::{
    ConnectionPath, LayoutConfig, Location, LocationId, MapLayout, WorldMap, areas,
    locations_in_area, warn_duplicate_directions,
};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Lay out a location graph and route its connectors")]
struct Args {
    /// Path to a JSON array of locations
    #[arg(short, long)]
    locations: PathBuf,
    /// Optional TOML file overriding the layout defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Location whose one-way edges should also be drawn
    #[arg(short, long)]
    focus: Option<String>,
    /// Only lay out locations in this area
    #[arg(short, long)]
    area: Option<String>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Derive terrain from names and descriptions for locations that carry none
    #[arg(long)]
    classify_terrain: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    snapshot_hash: u64,
    layout: &'a MapLayout,
    paths: &'a [ConnectionPath],
}

fn load_config(args: &Args) -> Result<LayoutConfig> {
    let mut config = match &args.config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => LayoutConfig::default(),
    };
    if let Some(width) = args.width {
        config.viewport.width = width;
    }
    if let Some(height) = args.height {
        config.viewport.height = height;
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let raw = fs::read_to_string(&args.locations)
        .with_context(|| format!("Failed to read locations file: {}", args.locations.display()))?;
    let mut locations: Vec<Location> =
        serde_json::from_str(&raw).context("Failed to deserialize locations JSON")?;

    if let Some(area) = &args.area {
        let known = areas(&locations);
        if !known.contains(area) {
            bail!("Unknown area {area:?}; known areas: {known:?}");
        }
        locations = locations_in_area(&locations, area);
    }
    if args.classify_terrain {
        locations = locations
            .into_iter()
            .map(|location| match location.terrain.is_empty() {
                true => location.with_classified_terrain(),
                false => location,
            })
            .collect();
    }
    warn_duplicate_directions(&locations);

    let focus = args.focus.map(LocationId::from);
    let world = WorldMap::try_new(config).context("Invalid layout configuration")?;
    let layout = world.layout(&locations);
    let paths = world.connection_paths(&layout, &locations, focus.as_ref());
    info!(
        locations = layout.grid.len(),
        edges = layout.edges.len(),
        paths = paths.len(),
        "layout complete"
    );

    let output = Output { snapshot_hash: layout.snapshot_hash(), layout: &layout, paths: &paths };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
