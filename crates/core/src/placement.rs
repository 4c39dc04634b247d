//! Integer grid placement of locations.
//! Anchored locations seed a multi-source BFS that walks exits and applies each
//! direction's grid offset; taken cells are resolved by a bounded ring search.
//! It does not own normalization or rendering concerns.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use crate::config::{DEFAULT_SPIRAL_MAX_RADIUS, LayoutConfig, MAX_SPIRAL_RADIUS};
use crate::location::Location;
use crate::types::{GridPos, LocationId};

const DEFAULT_FALLBACK_OFFSET: (i32, i32) = (10, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRules {
    max_radius: i32,
    fallback_offset: (i32, i32),
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self { max_radius: DEFAULT_SPIRAL_MAX_RADIUS, fallback_offset: DEFAULT_FALLBACK_OFFSET }
    }
}

impl PlacementRules {
    pub fn new(max_radius: i32, fallback_offset: (i32, i32)) -> Self {
        let fallback_offset =
            if fallback_offset == (0, 0) { DEFAULT_FALLBACK_OFFSET } else { fallback_offset };
        Self { max_radius: max_radius.clamp(1, MAX_SPIRAL_RADIUS), fallback_offset }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.spiral_max_radius, config.fallback_offset)
    }
}

/// Places every location on its own grid cell using the default rules.
pub fn place(locations: &[Location]) -> BTreeMap<LocationId, GridPos> {
    place_with(locations, &PlacementRules::default())
}

pub fn place_with(
    locations: &[Location],
    rules: &PlacementRules,
) -> BTreeMap<LocationId, GridPos> {
    match locations {
        [] => return BTreeMap::new(),
        [only] => {
            return BTreeMap::from([(only.id.clone(), only.grid.unwrap_or(GridPos::ORIGIN))]);
        }
        _ => {}
    }

    let mut state = PlacementState::new(locations, rules);
    let mut queue = VecDeque::new();

    for location in locations {
        if let Some(stored) = location.grid
            && state.claim(location, stored)
        {
            queue.push_back(location);
        }
    }
    if queue.is_empty() {
        let first = &locations[0];
        state.claim(first, GridPos::ORIGIN);
        queue.push_back(first);
    }
    state.expand(&mut queue);

    for location in locations {
        if state.is_visited(&location.id) {
            continue;
        }
        let anchor = location.grid.unwrap_or_else(|| state.below_placed_rows());
        if state.claim(location, anchor) {
            debug!(location = %location.id, "anchored disconnected island");
            queue.push_back(location);
            state.expand(&mut queue);
        }
    }

    state.placed
}

struct PlacementState<'a> {
    rules: &'a PlacementRules,
    index: BTreeMap<&'a LocationId, &'a Location>,
    visited: BTreeSet<&'a LocationId>,
    occupied: BTreeSet<GridPos>,
    placed: BTreeMap<LocationId, GridPos>,
}

impl<'a> PlacementState<'a> {
    fn new(locations: &'a [Location], rules: &'a PlacementRules) -> Self {
        let mut index = BTreeMap::new();
        for location in locations {
            index.entry(&location.id).or_insert(location);
        }
        Self {
            rules,
            index,
            visited: BTreeSet::new(),
            occupied: BTreeSet::new(),
            placed: BTreeMap::new(),
        }
    }

    fn is_visited(&self, id: &LocationId) -> bool {
        self.visited.contains(id)
    }

    /// Places `location` at `desired`, or the nearest free cell. Returns false if already placed.
    fn claim(&mut self, location: &'a Location, desired: GridPos) -> bool {
        if !self.visited.insert(&location.id) {
            return false;
        }
        let cell = if self.occupied.contains(&desired) {
            find_nearby_free_spot(desired, &self.occupied, self.rules)
        } else {
            desired
        };
        self.occupied.insert(cell);
        self.placed.insert(location.id.clone(), cell);
        true
    }

    fn expand(&mut self, queue: &mut VecDeque<&'a Location>) {
        while let Some(current) = queue.pop_front() {
            let Some(origin) = self.placed.get(&current.id).copied() else {
                continue;
            };
            for exit in &current.exits {
                let Some(target) = self.index.get(&exit.target).copied() else {
                    debug!(from = %current.id, to = %exit.target, "skipping exit to unknown id");
                    continue;
                };
                if self.is_visited(&target.id) {
                    continue;
                }
                // An offset past the grid edge lands on the origin and is ring-resolved.
                let desired = target.grid.unwrap_or_else(|| {
                    let (dx, dy) = exit.direction.grid_offset();
                    origin.checked_offset(dx, dy).unwrap_or(origin)
                });
                if self.claim(target, desired) {
                    queue.push_back(target);
                }
            }
        }
    }

    /// Left edge of the row below everything placed so far.
    fn below_placed_rows(&self) -> GridPos {
        let min_x = self.occupied.iter().map(|cell| cell.x).min();
        let max_y = self.occupied.iter().map(|cell| cell.y).max();
        match (min_x, max_y) {
            (Some(x), Some(y)) => {
                let corner = GridPos::new(x, y);
                corner.checked_offset(0, 1).unwrap_or(corner)
            }
            _ => GridPos::ORIGIN,
        }
    }
}

/// First free cell on the square rings around `target`.
///
/// Rings grow from radius 1 up to the configured bound. Within a ring the outer
/// loop walks `dx` and the inner loop `dy`, each centre-out (`0, -1, 1, -2, 2, ...`),
/// so the cell straight north of the target is tried first. When every ring is
/// full the target is shifted by the fallback offset, repeatedly if needed.
/// Cells beyond the `i32` grid are never produced.
pub fn find_nearby_free_spot(
    target: GridPos,
    occupied: &BTreeSet<GridPos>,
    rules: &PlacementRules,
) -> GridPos {
    for radius in 1..=rules.max_radius {
        for dx in centre_out(radius) {
            for dy in centre_out(radius) {
                if dx.abs().max(dy.abs()) != radius {
                    continue;
                }
                let Some(cell) = target.checked_offset(dx, dy) else {
                    continue;
                };
                if !occupied.contains(&cell) {
                    return cell;
                }
            }
        }
    }

    let cell = fallback_cell(target, occupied, rules.fallback_offset);
    debug!(
        target_x = target.x,
        target_y = target.y,
        x = cell.x,
        y = cell.y,
        "ring search exhausted, using fallback cell"
    );
    cell
}

/// Steps from `target` by `step` until a free cell turns up. If the grid edge is
/// reached first the walk restarts in the opposite direction.
fn fallback_cell(target: GridPos, occupied: &BTreeSet<GridPos>, step: (i32, i32)) -> GridPos {
    let (step_x, step_y) = step;
    let reverse = step_x.checked_neg().zip(step_y.checked_neg());
    for (dx, dy) in [Some(step), reverse].into_iter().flatten() {
        let mut cell = target;
        while let Some(next) = cell.checked_offset(dx, dy) {
            if !occupied.contains(&next) {
                return next;
            }
            cell = next;
        }
    }
    target
}

fn centre_out(radius: i32) -> impl Iterator<Item = i32> {
    (0..=2 * radius).map(|step| if step % 2 == 0 { step / 2 } else { -(step + 1) / 2 })
}
