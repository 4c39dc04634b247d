//! Connector curves between adjacent locations.
//! Curves are seeded per location pair so re-renders never change their shape,
//! and control points are pushed sideways away from nearby obstacle terrain.
//! Avoidance is a bias, not a clearance guarantee.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::RouterConfig;
use crate::connectivity::Edge;
use crate::location::{Location, Terrain};
use crate::seed::{ShapeStream, edge_seed, mix_seed_stream};
use crate::types::{LocationId, NormPos, Point, Viewport};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObstacleHint {
    pub id: LocationId,
    pub point: Point,
    pub terrain: Terrain,
}

/// Cubic Bézier from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Curve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl Curve {
    pub fn control_points(&self) -> [Point; 4] {
        [self.start, self.control1, self.control2, self.end]
    }

    pub fn sample(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let weights = [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t];
        let points = self.control_points();
        let mut x = 0.0;
        let mut y = 0.0;
        for (weight, point) in weights.iter().zip(points) {
            x += weight * point.x;
            y += weight * point.y;
        }
        Point::new(x, y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConnectionPath {
    pub from: LocationId,
    pub to: LocationId,
    pub start: Point,
    pub end: Point,
    pub seed: u64,
    pub is_two_way: bool,
    pub obstacles: Vec<ObstacleHint>,
    pub curve: Curve,
}

pub fn project(pos: NormPos, viewport: Viewport) -> Point {
    Point::new(pos.x * viewport.width, pos.y * viewport.height)
}

/// Pulls both ends inward by the marker radius. `None` when the markers overlap.
pub fn shorten_segment(from: Point, to: Point, marker_radius: f64) -> Option<(Point, Point)> {
    let length = from.distance(to);
    if length < 2.0 * marker_radius || length <= f64::EPSILON {
        return None;
    }
    let t = marker_radius / length;
    Some((from.lerp(to, t), to.lerp(from, t)))
}

/// Projected obstacle-classified locations, ordered by id.
pub fn obstacle_sites(
    locations: &[Location],
    projected: &BTreeMap<LocationId, Point>,
) -> Vec<ObstacleHint> {
    let mut sites = BTreeMap::new();
    for location in locations {
        let (Some(terrain), Some(point)) =
            (location.obstacle_terrain(), projected.get(&location.id))
        else {
            continue;
        };
        sites.entry(&location.id).or_insert(ObstacleHint {
            id: location.id.clone(),
            point: *point,
            terrain,
        });
    }
    sites.into_values().collect()
}

/// Radius around the edge midpoint in which obstacles bend a connector.
pub fn search_radius(from: Point, to: Point, search_ratio: f64) -> f64 {
    search_ratio * from.distance(to)
}

/// Obstacles other than the endpoints strictly within `radius` of the edge midpoint.
pub fn nearby_obstacles(
    from: (&LocationId, Point),
    to: (&LocationId, Point),
    sites: &[ObstacleHint],
    radius: f64,
) -> Vec<ObstacleHint> {
    let midpoint = from.1.midpoint(to.1);
    sites
        .iter()
        .filter(|site| &site.id != from.0 && &site.id != to.0)
        .filter(|site| site.point.distance(midpoint) < radius)
        .cloned()
        .collect()
}

/// Bends the `start`..`end` segment into a cubic Bézier.
///
/// Every obstacle closer than `radius` to the segment midpoint pushes both control
/// points sideways by `avoidance_strength * radius * (1 - d / radius)`, where `d` is
/// its distance from that midpoint. `nearby_obstacles` filters with the same
/// measure, so every reported obstacle bends the curve.
pub fn route(
    start: Point,
    end: Point,
    seed: u64,
    obstacles: &[ObstacleHint],
    radius: f64,
    config: &RouterConfig,
) -> Curve {
    let length = start.distance(end);
    if length <= f64::EPSILON {
        return Curve { start, control1: start, control2: end, end };
    }

    let normal = ((start.y - end.y) / length, (end.x - start.x) / length);
    let midpoint = start.midpoint(end);
    let max_bend = config.max_bend_ratio * length;
    let mut stream = ShapeStream::new(seed);

    let [control1, control2] = [1.0 / 3.0, 2.0 / 3.0].map(|t| {
        let base = start.lerp(end, t);
        let wobble = stream.signed_unit() * config.wobble * length;
        let mut offset = (normal.0 * wobble, normal.1 * wobble);

        for (index, obstacle) in obstacles.iter().enumerate() {
            let distance = obstacle.point.distance(midpoint);
            if distance >= radius {
                continue;
            }
            let away = (base.x + offset.0 - obstacle.point.x, base.y + offset.1 - obstacle.point.y);
            let lateral = away.0 * normal.0 + away.1 * normal.1;
            let side = if lateral.abs() > f64::EPSILON {
                lateral.signum()
            } else if mix_seed_stream(seed, index as u64) & 1 == 0 {
                1.0
            } else {
                -1.0
            };
            let push = config.avoidance_strength * radius * (1.0 - distance / radius);
            offset.0 += normal.0 * side * push;
            offset.1 += normal.1 * side * push;
        }

        let displacement = offset.0.hypot(offset.1);
        if displacement > max_bend {
            let scale = max_bend / displacement;
            offset = (offset.0 * scale, offset.1 * scale);
        }
        Point::new(base.x + offset.0, base.y + offset.1)
    });

    Curve { start, control1, control2, end }
}

/// Full connector for one edge, or `None` when its endpoints are closer than a marker.
pub fn connection_path(
    edge: &Edge,
    from: Point,
    to: Point,
    sites: &[ObstacleHint],
    config: &RouterConfig,
) -> Option<ConnectionPath> {
    let (start, end) = shorten_segment(from, to, config.marker_radius())?;
    let seed = edge_seed(&edge.from, &edge.to);
    let radius = search_radius(from, to, config.obstacle_search_ratio);
    let obstacles = nearby_obstacles((&edge.from, from), (&edge.to, to), sites, radius);
    let curve = route(start, end, seed, &obstacles, radius, config);
    Some(ConnectionPath {
        from: edge.from.clone(),
        to: edge.to.clone(),
        start,
        end,
        seed,
        is_two_way: edge.is_two_way,
        obstacles,
        curve,
    })
}
