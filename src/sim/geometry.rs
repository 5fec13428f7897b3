//! Segment intersection primitives
//!
//! All grid geometry is integral. Cell edges, wall points and ray ends are
//! `IVec2`, so the crossing test below is exact. Only the crossing point
//! itself goes through floating point and is rounded back to the grid.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A directed line segment between two integer points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub start: IVec2,
    pub end: IVec2,
}

impl Segment {
    pub const fn new(start: IVec2, end: IVec2) -> Self {
        Self { start, end }
    }

    /// Same segment, traversed the other way
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Whether this segment properly crosses `other`
    #[inline]
    pub fn crosses(&self, other: &Segment) -> bool {
        intersects(self.start, self.end, other.start, other.end)
    }

    /// Length in screen units
    pub fn length(&self) -> f32 {
        (self.end - self.start).as_vec2().length()
    }
}

/// Round away from zero to the next whole number (`2.1 -> 3`, `-2.1 -> -3`)
#[inline]
pub fn round_up(value: f64) -> i32 {
    value.abs().ceil().copysign(value) as i32
}

/// Round to nearest, halves toward positive infinity (`floor((2v + 1) / 2)`)
#[inline]
pub fn round_half_up(value: f64) -> i32 {
    ((value * 2.0 + 1.0) / 2.0).floor() as i32
}

/// Cross product sign of `p` relative to the line through `a` and `b`
#[inline]
fn side(a: IVec2, b: IVec2, p: IVec2) -> i64 {
    let (ax, ay) = (a.x as i64, a.y as i64);
    let (bx, by) = (b.x as i64, b.y as i64);
    let (px, py) = (p.x as i64, p.y as i64);
    (ax - bx) * (py - ay) + (ay - by) * (ax - px)
}

/// Returns true iff segment `p1-p2` properly crosses segment `p3-p4`
///
/// Both endpoint pairs must lie strictly on opposite sides of the other
/// segment's line. Touching at an endpoint or running collinear is not a
/// crossing: a ray that only grazes a cell boundary has not entered it yet.
pub fn intersects(p1: IVec2, p2: IVec2, p3: IVec2, p4: IVec2) -> bool {
    let tc1 = side(p1, p2, p3).signum();
    let tc2 = side(p1, p2, p4).signum();
    let td1 = side(p3, p4, p1).signum();
    let td2 = side(p3, p4, p2).signum();
    tc1 * tc2 < 0 && td1 * td2 < 0
}

/// Intersection of the infinite lines through `p1-p2` and `p3-p4`
///
/// Precondition: the lines are not parallel. Only call this after
/// [`intersects`] returned true for the same points; a zero determinant
/// is not guarded here.
pub fn intersection_point(p1: IVec2, p2: IVec2, p3: IVec2, p4: IVec2) -> IVec2 {
    let a0 = (p2.x - p1.x) as f64;
    let b0 = (p2.y - p1.y) as f64;
    let a2 = (p4.x - p3.x) as f64;
    let b2 = (p4.y - p3.y) as f64;

    let det = a0 * b2 - a2 * b0;
    let sn = b2 * (p3.x - p1.x) as f64 - a2 * (p3.y - p1.y) as f64;

    IVec2::new(
        round_half_up(p1.x as f64 + a0 * sn / det),
        round_half_up(p1.y as f64 + b0 * sn / det),
    )
}

/// Midpoint of two integer points, rounded half up
#[inline]
pub fn midpoint(a: IVec2, b: IVec2) -> IVec2 {
    IVec2::new(
        round_half_up((a.x + b.x) as f64 / 2.0),
        round_half_up((a.y + b.y) as f64 / 2.0),
    )
}
