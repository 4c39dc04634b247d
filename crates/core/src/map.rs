//! High-level layout orchestration that composes placement, normalization,
//! connectivity and routing into one snapshot for the rendering layer.

use std::collections::BTreeMap;
use std::hash::Hasher;

use serde::Serialize;
use tracing::{trace, warn};
use xxhash_rust::xxh3::Xxh3;

use crate::config::LayoutConfig;
use crate::connectivity::{Edge, classify, visible_edges};
use crate::error::ConfigError;
use crate::location::Location;
use crate::normalize::normalize;
use crate::placement::{PlacementRules, place_with};
use crate::routing::{ConnectionPath, connection_path, obstacle_sites, project};
use crate::types::{GridBounds, GridPos, LocationId, NormPos, Point};

pub struct WorldMap {
    config: LayoutConfig,
}

impl WorldMap {
    /// Trusts `config` as given. Configs built in code should go through [`WorldMap::try_new`].
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn try_new(config: LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self, locations: &[Location]) -> MapLayout {
        let grid = place_with(locations, &PlacementRules::from_config(&self.config));
        let (normalized, bounds) = normalize(&grid, self.config.padding);
        let edges = classify(locations);
        trace!(locations = grid.len(), edges = edges.len(), "computed map layout");
        MapLayout { grid, normalized, bounds, edges }
    }

    /// Connector curves for the edges visible under `focus`.
    pub fn connection_paths(
        &self,
        layout: &MapLayout,
        locations: &[Location],
        focus: Option<&LocationId>,
    ) -> Vec<ConnectionPath> {
        let projected = layout.projected(&self.config);
        let sites = obstacle_sites(locations, &projected);
        layout
            .visible_edges(focus)
            .into_iter()
            .filter_map(|edge| {
                let from = projected.get(&edge.from)?;
                let to = projected.get(&edge.to)?;
                connection_path(edge, *from, *to, &sites, &self.config.router)
            })
            .collect()
    }
}

/// Lays out `locations` in one call.
pub fn layout_world(locations: &[Location], config: &LayoutConfig) -> MapLayout {
    WorldMap::new(config.clone()).layout(locations)
}

/// Logs directions declared more than once on the same location. First-seen exits win.
pub fn warn_duplicate_directions(locations: &[Location]) -> usize {
    let mut flagged = 0;
    for location in locations {
        for direction in location.duplicate_directions() {
            warn!(location = %location.id, direction = direction.label(), "duplicate exit");
            flagged += 1;
        }
    }
    flagged
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapLayout {
    pub grid: BTreeMap<LocationId, GridPos>,
    pub normalized: BTreeMap<LocationId, NormPos>,
    pub bounds: Option<GridBounds>,
    pub edges: Vec<Edge>,
}

impl MapLayout {
    pub fn visible_edges(&self, focus: Option<&LocationId>) -> Vec<&Edge> {
        visible_edges(&self.edges, focus)
    }

    pub fn projected(&self, config: &LayoutConfig) -> BTreeMap<LocationId, Point> {
        self.normalized
            .iter()
            .map(|(id, pos)| (id.clone(), project(*pos, config.viewport)))
            .collect()
    }

    /// Stable digest of positions and edges, for cheap frame-to-frame diffing.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.grid.len() as u64);
        for (id, cell) in &self.grid {
            hasher.write(id.as_str().as_bytes());
            hasher.write_u8(0xff);
            hasher.write_i32(cell.x);
            hasher.write_i32(cell.y);
        }
        for pos in self.normalized.values() {
            hasher.write_u64(pos.x.to_bits());
            hasher.write_u64(pos.y.to_bits());
        }
        hasher.write_u64(self.edges.len() as u64);
        for edge in &self.edges {
            hasher.write(edge.from.as_str().as_bytes());
            hasher.write_u8(0xff);
            hasher.write(edge.to.as_str().as_bytes());
            hasher.write_u8(0xff);
            hasher.write_u8(u8::from(edge.is_two_way));
        }
        hasher.finish()
    }
}
