//! Location snapshot consumed by the layout engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::terrain::classify_terrain;
use crate::types::{GridPos, LocationId};

pub const DEFAULT_AREA: &str = "overworld";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Lake,
    Mountain,
    Swamp,
    OpenWater,
    Forest,
    Hills,
    Plains,
    Desert,
    Road,
    Settlement,
    Cave,
}

impl Terrain {
    /// Terrain that connector paths bend away from.
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Lake | Self::Mountain | Self::Swamp | Self::OpenWater)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub target: LocationId,
    pub direction: Direction,
}

impl Exit {
    pub fn new(target: impl Into<LocationId>, direction: Direction) -> Self {
        Self { target: target.into(), direction }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub grid: Option<GridPos>,
    #[serde(default = "default_area")]
    pub area: String,
    #[serde(default)]
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub terrain: BTreeSet<Terrain>,
}

fn default_area() -> String {
    DEFAULT_AREA.to_owned()
}

impl Location {
    pub fn new(id: impl Into<LocationId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            grid: None,
            area: default_area(),
            exits: Vec::new(),
            terrain: BTreeSet::new(),
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.grid = Some(GridPos::new(x, y));
        self
    }

    pub fn with_exit(mut self, target: impl Into<LocationId>, direction: Direction) -> Self {
        self.exits.push(Exit::new(target, direction));
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain.insert(terrain);
        self
    }

    pub fn in_area(mut self, area: impl Into<String>) -> Self {
        self.area = area.into();
        self
    }

    pub fn with_description(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// Adds the labels the keyword classifier finds in `name` and `description`.
    pub fn with_classified_terrain(mut self) -> Self {
        self.terrain.extend(classify_terrain(&self.name, &self.description));
        self
    }

    pub fn is_obstacle(&self) -> bool {
        self.terrain.iter().any(|terrain| terrain.is_obstacle())
    }

    /// First obstacle label, used as the routing hint classification.
    pub fn obstacle_terrain(&self) -> Option<Terrain> {
        self.terrain.iter().copied().find(|terrain| terrain.is_obstacle())
    }

    /// The first exit declared in `direction`; later duplicates are ignored.
    pub fn exit_towards(&self, direction: Direction) -> Option<&Exit> {
        self.exits.iter().find(|exit| exit.direction == direction)
    }

    pub fn has_exit_to(&self, target: &LocationId) -> bool {
        self.exits.iter().any(|exit| &exit.target == target)
    }

    /// Directions declared more than once, in first-repeat order.
    pub fn duplicate_directions(&self) -> Vec<Direction> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for exit in &self.exits {
            if !seen.insert(exit.direction) && !duplicates.contains(&exit.direction) {
                duplicates.push(exit.direction);
            }
        }
        duplicates
    }
}

/// Locations belonging to `area`, in input order.
pub fn locations_in_area(locations: &[Location], area: &str) -> Vec<Location> {
    locations.iter().filter(|location| location.area == area).cloned().collect()
}

pub fn areas(locations: &[Location]) -> BTreeSet<String> {
    locations.iter().map(|location| location.area.clone()).collect()
}
