//! Bubble Shooter - trajectory and hex-grid engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, grid, trajectory, landing, matching)
//! - `settings`: Data-driven game configuration
//!
//! Rendering, audio, menus and key mapping live outside this crate. They drive
//! the simulation through [`sim::tick`] and read back positions and occupancy.

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, GameConfig};
pub use sim::geometry::{round_half_up, round_up};

/// Game configuration constants (reference build)
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: i32 = 526;
    pub const ARENA_HEIGHT: i32 = 600;

    /// Grid dimensions (row 0 is the ceiling)
    pub const GRID_ROWS: usize = 20;
    pub const GRID_COLS: usize = 17;

    /// Cell edge length; odd rows are shifted right by half of it
    pub const BUBBLE_SIZE: i32 = 30;
    /// Center of cell (0, 0)
    pub const GRID_X0: i32 = 16;
    pub const GRID_Y0: i32 = 15;

    /// Rows filled with bubbles when a game starts
    pub const INITIAL_ROWS: usize = 10;
    /// Number of bubble colors in play
    pub const PALETTE_SIZE: usize = 6;

    /// Launcher angle limits and step (degrees, 90 = straight up)
    pub const MIN_ANGLE: i32 = 5;
    pub const MAX_ANGLE: i32 = 175;
    pub const ROTATE_STEP: i32 = 2;

    /// Projectile travel per animation tick
    pub const MOTION_STEP: f32 = 10.0;

    /// Upper bound on wall bounces per trace
    pub const MAX_BOUNCES: usize = 32;
}

/// Tangent of an angle given in degrees
#[inline]
pub fn tan_degrees(angle: f64) -> f64 {
    angle.to_radians().tan()
}

/// Angle in degrees of the vector (x, y), as `atan2(y, x)`
#[inline]
pub fn atan2_degrees(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}
