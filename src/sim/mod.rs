//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer grid geometry, one frame per tick
//! - Seeded RNG only
//! - Stable iteration order (row-major cell indices)
//! - No rendering or platform dependencies

pub mod cluster;
pub mod geometry;
pub mod grid;
pub mod landing;
pub mod motion;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use cluster::{find_connected, find_floating, find_same_color_cluster};
pub use geometry::{Segment, intersection_point, intersects, midpoint};
pub use grid::{Bubble, Cell, CellIndex, Color, GridLayout, HexGrid};
pub use landing::resolve_landing;
pub use motion::{Heading, plan_frames};
pub use state::{
    ColorSource, FallingBubble, GameEvent, GameState, MatchState, Preview, Projectile,
    SeededPalette, ShotPhase,
};
pub use tick::{POP_THRESHOLD, TickInput, fire, tick};
pub use trajectory::{Arena, Cast, Hit, Launcher, Rotation, Trajectory, cast, find_hit, trace};
