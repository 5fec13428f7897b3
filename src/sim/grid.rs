//! Hexagonal bubble grid in offset coordinates
//!
//! Cells are laid out in rows; odd rows are shifted right by half a cell
//! (brick layout). Each cell keeps its center and the four edges of its
//! bounding square, computed once at construction. Only the occupant ever
//! changes after that.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use crate::consts::*;

/// Bubble colors in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue,
    YellowGreen,
    Pink,
    Purple,
    Red,
    Sky,
}

impl Color {
    /// Full palette, in a stable order
    pub const ALL: [Color; 6] = [
        Color::Blue,
        Color::YellowGreen,
        Color::Pink,
        Color::Purple,
        Color::Red,
        Color::Sky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::YellowGreen => "yellow_green",
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Red => "red",
            Color::Sky => "sky",
        }
    }

    /// RGB for renderers
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Color::Blue => [0, 0, 255],
            Color::YellowGreen => [153, 255, 102],
            Color::Pink => [255, 102, 255],
            Color::Purple => [204, 0, 255],
            Color::Red => [255, 0, 0],
            Color::Sky => [0, 255, 255],
        }
    }
}

/// A bubble. Owned by at most one cell, moved out when it falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub color: Color,
}

/// Grid position, ordered row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Neighbor offsets `(d_row, d_col)` for even rows. Row 0 uses the same
/// table; its upward entries always fall outside the grid.
const EVEN_ROW_NEIGHBORS: [(isize, isize); 6] = [
    (1, -1),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
];

/// Neighbor offsets for odd rows
const ODD_ROW_NEIGHBORS: [(isize, isize); 6] = [
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, 0),
    (-1, 1),
];

/// Placement of cell centers on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: i32,
    pub x0: i32,
    pub y0: i32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            cell_size: BUBBLE_SIZE,
            x0: GRID_X0,
            y0: GRID_Y0,
        }
    }
}

impl GridLayout {
    /// Center of the cell at `(row, col)`
    pub fn center(&self, row: usize, col: usize) -> IVec2 {
        let start = if row % 2 == 0 {
            self.x0
        } else {
            self.x0 + self.cell_size / 2
        };
        IVec2::new(
            start + self.cell_size * col as i32,
            self.y0 + self.cell_size * row as i32,
        )
    }
}

/// One fixed slot of the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub index: CellIndex,
    pub center: IVec2,
    pub left: Segment,
    pub right: Segment,
    pub top: Segment,
    pub bottom: Segment,
    pub occupant: Option<Bubble>,
}

impl Cell {
    fn new(index: CellIndex, layout: &GridLayout) -> Self {
        let center = layout.center(index.row, index.col);
        let half = layout.cell_size / 2;
        let left_top = IVec2::new(center.x - half, center.y - half);
        let right_top = IVec2::new(center.x + half, center.y - half);
        let left_bottom = IVec2::new(center.x - half, center.y + half);
        let right_bottom = IVec2::new(center.x + half, center.y + half);

        Self {
            index,
            center,
            left: Segment::new(left_top, left_bottom),
            right: Segment::new(right_top, right_bottom),
            top: Segment::new(left_top, right_top),
            bottom: Segment::new(left_bottom, right_bottom),
            occupant: None,
        }
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Edges in the order crossing points are searched
    pub fn edges(&self) -> [Segment; 4] {
        [self.bottom, self.right, self.left, self.top]
    }

    /// Whether the segment properly crosses any edge of this cell
    pub fn is_crossed_by(&self, segment: &Segment) -> bool {
        self.edges().iter().any(|edge| segment.crosses(edge))
    }
}

/// The fixed `rows x cols` grid. Cells are created once and never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexGrid {
    layout: GridLayout,
    cells: Vec<Cell>,
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new(GridLayout::default())
    }
}

impl HexGrid {
    pub fn new(layout: GridLayout) -> Self {
        let cells = (0..layout.rows)
            .flat_map(|row| (0..layout.cols).map(move |col| CellIndex::new(row, col)))
            .map(|index| Cell::new(index, &layout))
            .collect();
        Self { layout, cells }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    pub fn cols(&self) -> usize {
        self.layout.cols
    }

    #[inline]
    pub fn contains(&self, index: CellIndex) -> bool {
        index.row < self.layout.rows && index.col < self.layout.cols
    }

    /// Cell at `index`. Panics if out of bounds; callers hold indices
    /// produced by this grid.
    pub fn cell(&self, index: CellIndex) -> &Cell {
        &self.cells[index.row * self.layout.cols + index.col]
    }

    pub fn cell_mut(&mut self, index: CellIndex) -> &mut Cell {
        &mut self.cells[index.row * self.layout.cols + index.col]
    }

    pub fn get(&self, index: CellIndex) -> Option<&Cell> {
        self.contains(index).then(|| self.cell(index))
    }

    pub fn is_occupied(&self, index: CellIndex) -> bool {
        self.get(index).is_some_and(Cell::is_occupied)
    }

    /// Occupant color, if any
    pub fn color_at(&self, index: CellIndex) -> Option<Color> {
        self.get(index)
            .and_then(|cell| cell.occupant)
            .map(|bubble| bubble.color)
    }

    /// One row of cells, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.layout.cols;
        &self.cells[start..start + self.layout.cols]
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Rows from the bottom row up to the ceiling
    ///
    /// The ray trace depends on this order: the first row that a segment
    /// hits while walking upward decides where it stops.
    pub fn cells_bottom_to_top(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.layout.cols).rev()
    }

    /// Valid neighbors of `(row, col)`, in adjacency-table order
    pub fn neighbors(&self, index: CellIndex) -> impl Iterator<Item = CellIndex> + '_ {
        let offsets = if index.row % 2 == 0 {
            &EVEN_ROW_NEIGHBORS
        } else {
            &ODD_ROW_NEIGHBORS
        };
        let (rows, cols) = (self.layout.rows, self.layout.cols);
        offsets.iter().filter_map(move |&(dr, dc)| {
            let row = index.row.checked_add_signed(dr)?;
            let col = index.col.checked_add_signed(dc)?;
            (row < rows && col < cols).then_some(CellIndex::new(row, col))
        })
    }

    /// Number of cells holding a bubble
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// Indices of all occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells
            .iter()
            .filter(|c| c.is_occupied())
            .map(|c| c.index)
    }

    /// Put a bubble into an empty cell. Returns the bubble back if the
    /// cell is already taken.
    pub fn attach(&mut self, index: CellIndex, bubble: Bubble) -> Result<(), Bubble> {
        let cell = self.cell_mut(index);
        if cell.is_occupied() {
            return Err(bubble);
        }
        cell.occupant = Some(bubble);
        Ok(())
    }

    /// Take the bubble out of a cell
    pub fn detach(&mut self, index: CellIndex) -> Option<Bubble> {
        self.cell_mut(index).occupant.take()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.occupant = None;
        }
    }

    /// Fill the top `rows` rows, creating bubbles with `make`
    pub fn fill_rows(&mut self, rows: usize, mut make: impl FnMut() -> Bubble) {
        let end = rows.min(self.layout.rows) * self.layout.cols;
        for cell in &mut self.cells[..end] {
            cell.occupant = Some(make());
        }
    }
}
