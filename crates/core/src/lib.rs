pub mod config;
pub mod connectivity;
pub mod direction;
pub mod error;
pub mod location;
pub mod map;
pub mod normalize;
pub mod placement;
pub mod routing;
pub mod seed;
pub mod terrain;
pub mod types;

pub use config::{LayoutConfig, RouterConfig};
pub use connectivity::{Edge, classify, visible_edges};
pub use direction::Direction;
pub use error::ConfigError;
pub use location::{DEFAULT_AREA, Exit, Location, Terrain, areas, locations_in_area};
pub use map::{MapLayout, WorldMap, layout_world, warn_duplicate_directions};
pub use normalize::{grid_bounds, normalize};
pub use placement::{PlacementRules, find_nearby_free_spot, place, place_with};
pub use routing::{ConnectionPath, Curve, ObstacleHint, connection_path, route, shorten_segment};
pub use seed::edge_seed;
pub use terrain::classify_terrain;
pub use types::*;
