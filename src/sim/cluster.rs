//! Flood fills run after a landing
//!
//! Both walks use an explicit stack and a visited set; the neighbor graph
//! is cyclic. Results are `BTreeSet`s so detach order is deterministic.

use std::collections::BTreeSet;

use super::grid::{CellIndex, HexGrid};

/// Walk occupied cells reachable from `seeds` whose occupant passes `accept`
fn flood(
    grid: &HexGrid,
    seeds: impl IntoIterator<Item = CellIndex>,
    accept: impl Fn(CellIndex) -> bool,
) -> BTreeSet<CellIndex> {
    let mut visited = BTreeSet::new();
    let mut stack: Vec<CellIndex> = seeds.into_iter().filter(|&i| accept(i)).collect();
    visited.extend(stack.iter().copied());

    while let Some(index) = stack.pop() {
        for next in grid.neighbors(index) {
            if accept(next) && visited.insert(next) {
                stack.push(next);
            }
        }
    }
    visited
}

/// Connected same-color bubbles around `start`, including `start`
///
/// Empty when `start` holds no bubble.
pub fn find_same_color_cluster(grid: &HexGrid, start: CellIndex) -> BTreeSet<CellIndex> {
    let Some(color) = grid.color_at(start) else {
        return BTreeSet::new();
    };
    flood(grid, [start], |index| grid.color_at(index) == Some(color))
}

/// Bubbles with a path of bubbles back to the ceiling row
pub fn find_connected(grid: &HexGrid) -> BTreeSet<CellIndex> {
    let ceiling = grid.row(0).iter().map(|cell| cell.index);
    flood(grid, ceiling, |index| grid.is_occupied(index))
}

/// Bubbles that lost their path to the ceiling and must fall
pub fn find_floating(grid: &HexGrid) -> BTreeSet<CellIndex> {
    let connected = find_connected(grid);
    grid.occupied()
        .filter(|index| !connected.contains(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Bubble, Color};

    fn put(grid: &mut HexGrid, row: usize, col: usize, color: Color) {
        let _ = grid.attach(
            CellIndex::new(row, col),
            Bubble {
                id: (row * 100 + col) as u32,
                color,
            },
        );
    }

    /// Five rows alternating two colors by column pair
    fn two_color_grid() -> HexGrid {
        let mut grid = HexGrid::default();
        for row in 0..5 {
            for col in 0..grid.cols() {
                let color = if (col / 2) % 2 == 0 {
                    Color::Blue
                } else {
                    Color::Red
                };
                put(&mut grid, row, col, color);
            }
        }
        grid
    }

    #[test]
    fn test_cluster_of_empty_cell_is_empty() {
        let grid = HexGrid::default();
        assert!(find_same_color_cluster(&grid, CellIndex::new(5, 5)).is_empty());
    }

    #[test]
    fn test_single_bubble_cluster() {
        let mut grid = HexGrid::default();
        put(&mut grid, 0, 0, Color::Red);
        put(&mut grid, 0, 1, Color::Blue);
        let cluster = find_same_color_cluster(&grid, CellIndex::new(0, 0));
        assert_eq!(cluster.into_iter().collect::<Vec<_>>(), vec![CellIndex::new(0, 0)]);
    }

    #[test]
    fn test_line_of_three() {
        let mut grid = HexGrid::default();
        for col in 0..grid.cols() {
            put(&mut grid, 0, col, Color::Blue);
        }
        put(&mut grid, 1, 3, Color::Red);
        put(&mut grid, 1, 4, Color::Red);
        put(&mut grid, 1, 5, Color::Red);
        put(&mut grid, 1, 6, Color::Blue);

        let cluster = find_same_color_cluster(&grid, CellIndex::new(1, 5));
        let expected: BTreeSet<_> = [(1, 3), (1, 4), (1, 5)]
            .into_iter()
            .map(|(r, c)| CellIndex::new(r, c))
            .collect();
        assert_eq!(cluster, expected);
    }

    #[test]
    fn test_cluster_idempotent() {
        let grid = two_color_grid();
        let seed = CellIndex::new(2, 4);
        assert_eq!(
            find_same_color_cluster(&grid, seed),
            find_same_color_cluster(&grid, seed)
        );
    }

    #[test]
    fn test_cluster_stays_within_color() {
        let grid = two_color_grid();
        let seed = CellIndex::new(3, 2);
        let color = grid.color_at(seed);
        let cluster = find_same_color_cluster(&grid, seed);
        assert!(cluster.contains(&seed));
        assert!(cluster.iter().all(|&i| grid.color_at(i) == color));
    }

    #[test]
    fn test_nothing_floats_when_all_connected() {
        let grid = two_color_grid();
        assert!(find_floating(&grid).is_empty());
        assert_eq!(find_connected(&grid).len(), grid.occupied_count());
    }

    #[test]
    fn test_cut_column_falls() {
        let mut grid = HexGrid::default();
        // A hanging chain: (0,0) -> (1,0) -> (2,0) -> (3,0)
        for row in 0..4 {
            put(&mut grid, row, 0, Color::Sky);
        }
        put(&mut grid, 5, 10, Color::Pink);
        let _ = grid.detach(CellIndex::new(1, 0));

        let floating = find_floating(&grid);
        let expected: BTreeSet<_> = [(2, 0), (3, 0), (5, 10)]
            .into_iter()
            .map(|(r, c)| CellIndex::new(r, c))
            .collect();
        assert_eq!(floating, expected);
    }

    #[test]
    fn test_connected_and_floating_partition_occupied() {
        let mut grid = two_color_grid();
        for col in 0..grid.cols() {
            let _ = grid.detach(CellIndex::new(2, col));
        }
        put(&mut grid, 8, 8, Color::Red);

        let connected = find_connected(&grid);
        let floating = find_floating(&grid);
        let occupied: BTreeSet<_> = grid.occupied().collect();

        assert!(connected.is_disjoint(&floating));
        let union: BTreeSet<_> = connected.union(&floating).copied().collect();
        assert_eq!(union, occupied);
        // Rows 3 and 4 plus the stray bubble are cut off
        assert_eq!(floating.len(), 2 * grid.cols() + 1);
    }

    #[test]
    fn test_two_color_scenario_pops_and_drops() {
        let mut grid = HexGrid::default();
        for row in 0..4 {
            for col in 0..grid.cols() {
                put(&mut grid, row, col, Color::Blue);
            }
        }
        for col in 0..grid.cols() {
            let color = if col <= 2 { Color::Red } else { Color::Blue };
            put(&mut grid, 4, col, color);
        }
        // Hangs only from the red cells (4, 1) and (4, 2)
        put(&mut grid, 5, 1, Color::Blue);

        let cluster = find_same_color_cluster(&grid, CellIndex::new(4, 1));
        let expected: BTreeSet<_> = [(4, 0), (4, 1), (4, 2)]
            .into_iter()
            .map(|(r, c)| CellIndex::new(r, c))
            .collect();
        assert_eq!(cluster, expected);

        for index in &cluster {
            let _ = grid.detach(*index);
        }
        let floating = find_floating(&grid);
        assert_eq!(floating.into_iter().collect::<Vec<_>>(), vec![CellIndex::new(5, 1)]);
    }
}
