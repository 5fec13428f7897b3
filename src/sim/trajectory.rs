//! Projectile path simulation with wall bounces
//!
//! A shot is cast as a chain of straight segments. Each segment is traced
//! through the grid bottom row first; the first row it touches that holds
//! a bubble stops it. Segments that reach a side wall without stopping are
//! reflected and cast again until the path hits the grid or the ceiling.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Segment, intersection_point, midpoint, round_up};
use super::grid::{Cell, CellIndex, HexGrid};
use crate::consts::*;
use crate::{atan2_degrees, tan_degrees};

/// Rectangle bounding all trajectory math. Walls sit at `x = 0` and
/// `x = width`, the ceiling at `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn half_width(&self) -> i32 {
        self.width / 2
    }

    /// Bottom-center launch point
    pub fn launch_point(&self) -> IVec2 {
        IVec2::new(self.half_width(), self.height)
    }

    /// Launcher angle aiming straight at a top corner, rounded up.
    /// Shallower shots hit a side wall before the ceiling.
    pub fn limit_angle(&self) -> i32 {
        round_up(atan2_degrees(self.height as f64, self.half_width() as f64))
    }
}

/// Which way to turn the launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// Counter-clockwise, angle increases
    Left,
    /// Clockwise, angle decreases
    Right,
}

/// The launcher: a fixed origin and an angle in degrees (90 = straight up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launcher {
    pub origin: IVec2,
    pub angle: i32,
    pub min_angle: i32,
    pub max_angle: i32,
    pub step: i32,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new(Arena::default().launch_point())
    }
}

impl Launcher {
    pub fn new(origin: IVec2) -> Self {
        Self {
            origin,
            angle: 90,
            min_angle: MIN_ANGLE,
            max_angle: MAX_ANGLE,
            step: ROTATE_STEP,
        }
    }

    /// Turn by one step, clamped to the angle limits
    pub fn rotate(&mut self, rotation: Rotation) {
        let delta = match rotation {
            Rotation::Left => self.step,
            Rotation::Right => -self.step,
        };
        self.set_angle(self.angle + delta);
    }

    pub fn set_angle(&mut self, angle: i32) {
        self.angle = angle.clamp(self.min_angle, self.max_angle);
    }
}

/// Rise over a horizontal run `base` at `angle` degrees, rounded up
fn height_for(angle: i32, base: i32) -> i32 {
    round_up(tan_degrees(angle as f64) * base as f64)
}

/// Horizontal run needed to rise `height` at `angle` degrees, rounded up
fn base_for(angle: i32, height: i32) -> i32 {
    round_up(height as f64 / tan_degrees(angle as f64))
}

/// Where a single straight segment meets the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hit {
    /// Empty cell the projectile would come to rest in
    pub destination: Option<CellIndex>,
    /// Occupied cell the projectile strikes
    pub target: Option<CellIndex>,
}

/// Outcome of casting one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cast {
    /// True when the path ends with this segment
    pub stop: bool,
    /// Segment to draw, if any cell was reached
    pub line: Option<Segment>,
    pub hit: Hit,
}

/// A full simulated shot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    /// Path segments in travel order
    pub segments: Vec<Segment>,
    /// Hit of the last cast segment
    pub hit: Hit,
    /// Reflection angle used off the walls, if the shot bounces
    pub reflection: Option<i32>,
    /// Number of wall bounces
    pub bounces: usize,
}

/// Which wall a bouncing segment is currently leaving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wall {
    Left,
    Right,
}

/// Cells a straight segment passes through, one per row, bottom row first
///
/// Within a row cells are scanned starting from the side the ray travels
/// away from. The first empty crossed cell is kept unless an occupied cell
/// is crossed in the same row, which ends the scan.
fn trace_cells<'a>(grid: &'a HexGrid, segment: &Segment) -> Vec<&'a Cell> {
    let leftward = segment.start.x >= segment.end.x;
    let mut traced = Vec::new();

    for row in grid.cells_bottom_to_top() {
        let mut empty = None;
        let mut target = None;
        let last = row.len() - 1;
        for i in 0..row.len() {
            let cell = if leftward { &row[i] } else { &row[last - i] };
            if !cell.is_crossed_by(segment) {
                continue;
            }
            if cell.is_occupied() {
                target = Some(cell);
                break;
            }
            if empty.is_none() {
                empty = Some(cell);
            }
        }
        match (target, empty) {
            (Some(target), _) => {
                traced.push(target);
                break;
            }
            (None, Some(empty)) => traced.push(empty),
            (None, None) => {}
        }
    }

    traced
}

/// Destination and target for one straight segment
pub fn find_hit(grid: &HexGrid, segment: &Segment) -> Hit {
    let traced = trace_cells(grid, segment);
    match traced.as_slice() {
        [] => Hit::default(),
        [only] if only.is_occupied() => Hit {
            destination: None,
            target: Some(only.index),
        },
        [.., last] if !last.is_occupied() => Hit {
            destination: Some(last.index),
            target: None,
        },
        [.., dest, target] => Hit {
            destination: Some(dest.index),
            target: Some(target.index),
        },
        // A lone occupied cell is handled above
        [_] => Hit::default(),
    }
}

/// Point where a stopping segment ends inside its last cell
///
/// The first edge crossed (bottom, right, left, top) gives the entry point.
/// For an empty destination the path ends halfway between the entry point
/// and the cell center.
fn crossing_point(segment: &Segment, cell: &Cell) -> Option<IVec2> {
    cell.edges()
        .iter()
        .find(|edge| segment.crosses(edge))
        .map(|edge| {
            let entry = intersection_point(segment.start, segment.end, edge.start, edge.end);
            if cell.is_occupied() {
                entry
            } else {
                midpoint(entry, cell.center)
            }
        })
}

/// End of the drawn line for a segment stopping in `cell`; the cell center
/// when none of its edges is crossed
fn stop_point(segment: &Segment, cell: &Cell) -> IVec2 {
    crossing_point(segment, cell).unwrap_or(cell.center)
}

/// Cast one straight segment and decide whether the path continues
///
/// `toward_ceiling` marks a segment that ends at `y = 0` and therefore
/// cannot bounce again.
pub fn cast(grid: &HexGrid, start: IVec2, end: IVec2, toward_ceiling: bool) -> Cast {
    let segment = Segment::new(start, end);
    let hit = find_hit(grid, &segment);

    let stop_cell = match (hit.destination, hit.target) {
        (Some(dest), Some(_)) => Some(dest),
        (Some(dest), None) if toward_ceiling => Some(dest),
        (None, Some(target)) => Some(target),
        (Some(_), None) => {
            return Cast {
                stop: false,
                line: Some(segment),
                hit,
            };
        }
        (None, None) => None,
    };

    let line = stop_cell.map(|index| {
        let end = stop_point(&segment, grid.cell(index));
        Segment::new(start, end)
    });

    Cast {
        stop: true,
        line,
        hit,
    }
}

/// Simulate a shot from the launcher's current angle
///
/// Three angle regimes pick the first cast: shallow right shots go to the
/// right wall, steep shots go straight to the ceiling, and shallow left
/// shots go to the left wall. Wall shots then bounce at the mirrored angle
/// until the path stops.
pub fn trace(grid: &HexGrid, arena: &Arena, launcher: &Launcher) -> Trajectory {
    let origin = launcher.origin;
    let angle = launcher.angle;
    let limit = arena.limit_angle();

    let mut trajectory = Trajectory::default();

    let (first_end, bounce) = if angle <= limit {
        let y = origin.y - height_for(angle, arena.width - origin.x);
        (IVec2::new(arena.width, y), Some((Wall::Right, 90 - angle)))
    } else if angle >= 180 - limit {
        let y = origin.y - height_for(180 - angle, origin.x);
        (IVec2::new(0, y), Some((Wall::Left, angle - 90)))
    } else {
        let x = if angle <= 90 {
            origin.x + height_for(90 - angle, origin.y)
        } else {
            origin.x - height_for(angle - 90, origin.y)
        };
        (IVec2::new(x, 0), None)
    };

    // A wall point at or above the ceiling means the ceiling comes first
    let first = cast(grid, origin, first_end, bounce.is_none() || first_end.y <= 0);
    trajectory.segments.extend(first.line);
    trajectory.hit = first.hit;

    let Some((mut wall, reflection)) = bounce else {
        return trajectory;
    };
    trajectory.reflection = Some(reflection);
    if first.stop {
        return trajectory;
    }

    let mut start = first_end;
    while trajectory.bounces < MAX_BOUNCES {
        trajectory.bounces += 1;

        // Distance travelled sideways before reaching the ceiling
        let run = height_for(reflection, start.y);
        let ceiling_x = match wall {
            Wall::Right => arena.width - run,
            Wall::Left => run,
        };
        let next = if (0..=arena.width).contains(&ceiling_x) {
            None
        } else {
            let wall_x = match wall {
                Wall::Right => 0,
                Wall::Left => arena.width,
            };
            Some(IVec2::new(wall_x, start.y - base_for(reflection, arena.width)))
        };

        let step = match next {
            None => cast(grid, start, IVec2::new(ceiling_x, 0), true),
            Some(end) => cast(grid, start, end, end.y <= 0),
        };
        trajectory.segments.extend(step.line);
        trajectory.hit = step.hit;

        match next {
            Some(end) if !step.stop => {
                start = end;
                wall = match wall {
                    Wall::Right => Wall::Left,
                    Wall::Left => Wall::Right,
                };
            }
            _ => return trajectory,
        }
    }

    log::warn!(
        "trace from angle {} gave up after {} bounces",
        launcher.angle,
        trajectory.bounces
    );
    trajectory
}
