//! Projectile travel animation
//!
//! A fired path is turned into a list of positions, one per tick. Each
//! segment is walked in fixed steps until the next step would pass its end.
//! The last segment is retargeted to the landing cell's center, which is
//! also the final frame.

use glam::{IVec2, Vec2};

use super::geometry::Segment;

/// Travel direction of a segment, picked once before stepping along it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Vertical,
    Rightward,
    Leftward,
}

impl Heading {
    pub fn of(segment: &Segment) -> Self {
        if segment.start.x == segment.end.x {
            Heading::Vertical
        } else if segment.start.x > segment.end.x {
            Heading::Leftward
        } else {
            Heading::Rightward
        }
    }

    /// Whether `point` still lies before `end` along this heading
    #[inline]
    pub fn before(&self, point: Vec2, end: Vec2) -> bool {
        match self {
            Heading::Vertical => end.y < point.y,
            Heading::Rightward => point.x < end.x,
            Heading::Leftward => point.x > end.x,
        }
    }
}

/// Intermediate positions along one segment, excluding both ends
fn step_along(segment: &Segment, step: f32, frames: &mut Vec<Vec2>) {
    let heading = Heading::of(segment);
    let start = segment.start.as_vec2();
    let end = segment.end.as_vec2();
    let delta = (end - start).normalize_or_zero() * step;
    if delta == Vec2::ZERO {
        return;
    }

    let mut point = start + delta;
    while heading.before(point, end) {
        frames.push(point);
        point += delta;
    }
}

/// Animation frames for a fired path landing at `destination`
///
/// Earlier segments keep their wall crossing points. The result always ends
/// with `destination`, so the projectile snaps exactly onto the cell at the
/// last index.
pub fn plan_frames(segments: &[Segment], destination: IVec2, step: f32) -> Vec<Vec2> {
    let mut frames = Vec::new();
    if let Some((last, rest)) = segments.split_last() {
        for segment in rest {
            step_along(segment, step, &mut frames);
        }
        step_along(&Segment::new(last.start, destination), step, &mut frames);
    }
    frames.push(destination.as_vec2());
    frames
}
