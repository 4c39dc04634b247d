//! Maps the integer grid onto the padded unit square used for rendering.

use std::collections::BTreeMap;

use crate::types::{GridBounds, GridPos, LocationId, NormPos};

pub fn grid_bounds(grid: &BTreeMap<LocationId, GridPos>) -> Option<GridBounds> {
    let mut cells = grid.values().copied();
    let first = cells.next()?;
    let mut bounds = GridBounds::around(first);
    for cell in cells {
        bounds.include(cell);
    }
    Some(bounds)
}

/// Normalizes every cell into `[padding, 1 - padding]` on each axis.
///
/// An axis where every location shares the same coordinate is centred at `0.5`.
pub fn normalize(
    grid: &BTreeMap<LocationId, GridPos>,
    padding: f64,
) -> (BTreeMap<LocationId, NormPos>, Option<GridBounds>) {
    let Some(bounds) = grid_bounds(grid) else {
        return (BTreeMap::new(), None);
    };

    let normalized = grid
        .iter()
        .map(|(id, cell)| {
            let x = normalize_axis(cell.x, bounds.min_x, bounds.max_x, padding);
            let y = normalize_axis(cell.y, bounds.min_y, bounds.max_y, padding);
            (id.clone(), NormPos { x, y })
        })
        .collect();
    (normalized, Some(bounds))
}

fn normalize_axis(value: i32, min: i32, max: i32, padding: f64) -> f64 {
    if max == min {
        return 0.5;
    }
    let range = (f64::from(max) - f64::from(min)).max(1.0);
    padding + (1.0 - 2.0 * padding) * (f64::from(value) - f64::from(min)) / range
}
