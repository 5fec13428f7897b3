//! Landing cell resolution
//!
//! The trace names the last empty cell the ray crossed before striking a
//! bubble. That cell is only a valid resting place if it touches some
//! bubble; otherwise the projectile snaps to the nearest free slot next to
//! the bubble it hit, on the same side the ray came from.

use super::grid::{CellIndex, HexGrid};
use super::trajectory::Hit;

/// Empty cell the projectile settles in, or `None` when the shot cannot
/// land this frame
pub fn resolve_landing(grid: &HexGrid, hit: &Hit) -> Option<CellIndex> {
    let destination = hit.destination?;
    let Some(target) = hit.target else {
        // Nothing struck: the path ends in the ceiling row
        return Some(destination);
    };

    if grid
        .neighbors(destination)
        .any(|index| grid.is_occupied(index))
    {
        return Some(destination);
    }

    let resolved = nearest_free_neighbor(grid, target, destination);
    match resolved {
        Some(cell) => log::debug!(
            "landing {:?} is detached, moved next to {:?} at {:?}",
            destination,
            target,
            cell
        ),
        None => log::debug!(
            "landing {:?} is detached and {:?} has no free side",
            destination,
            target
        ),
    }
    resolved
}

/// Closest empty neighbor of `target` on the same side as `destination`
///
/// Equal distances keep the first cell in neighbor order.
fn nearest_free_neighbor(
    grid: &HexGrid,
    target: CellIndex,
    destination: CellIndex,
) -> Option<CellIndex> {
    let target_x = grid.cell(target).center.x;
    let dest_center = grid.cell(destination).center;
    let right_side = target_x <= dest_center.x;

    let mut best: Option<(CellIndex, f32)> = None;
    for index in grid.neighbors(target) {
        let cell = grid.cell(index);
        if cell.is_occupied() {
            continue;
        }
        let same_side = if right_side {
            target_x <= cell.center.x
        } else {
            target_x > cell.center.x
        };
        if !same_side {
            continue;
        }
        let distance = (cell.center - dest_center).as_vec2().length();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}
