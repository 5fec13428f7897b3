//! Game configuration
//!
//! Geometry, palette and pacing for one session. Defaults reproduce the
//! reference build; a JSON file may override any subset of fields.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::grid::{Color, GridLayout};
use crate::sim::trajectory::{Arena, Launcher};

/// Why a configuration was rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: i32,
    pub arena_height: i32,

    // === Grid ===
    pub rows: usize,
    pub cols: usize,
    pub bubble_size: i32,
    pub grid_x0: i32,
    pub grid_y0: i32,
    /// Rows filled when a game starts
    pub initial_rows: usize,
    /// How many colors of the palette are in play (1..=6)
    pub palette_size: usize,

    // === Launcher ===
    pub min_angle: i32,
    pub max_angle: i32,
    pub rotate_step: i32,

    // === Motion ===
    /// Projectile travel per tick
    pub motion_step: f32,

    /// Seed for bubble colors
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            rows: GRID_ROWS,
            cols: GRID_COLS,
            bubble_size: BUBBLE_SIZE,
            grid_x0: GRID_X0,
            grid_y0: GRID_Y0,
            initial_rows: INITIAL_ROWS,
            palette_size: PALETTE_SIZE,

            min_angle: MIN_ANGLE,
            max_angle: MAX_ANGLE,
            rotate_step: ROTATE_STEP,

            motion_step: MOTION_STEP,

            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid("grid must have at least one row and column"));
        }
        if self.initial_rows > self.rows {
            return Err(ConfigError::Invalid("initial_rows exceeds grid rows"));
        }
        if self.palette_size == 0 || self.palette_size > Color::ALL.len() {
            return Err(ConfigError::Invalid("palette_size must be between 1 and 6"));
        }
        if self.bubble_size < 2 {
            return Err(ConfigError::Invalid("bubble_size must be at least 2"));
        }
        if self.min_angle <= 0 || self.max_angle >= 180 || self.min_angle > self.max_angle {
            return Err(ConfigError::Invalid("angle limits must satisfy 0 < min <= max < 180"));
        }
        if self.rotate_step <= 0 {
            return Err(ConfigError::Invalid("rotate_step must be positive"));
        }
        if self.motion_step.is_nan() || self.motion_step <= 0.0 {
            return Err(ConfigError::Invalid("motion_step must be positive"));
        }
        if self.arena_width <= 0 || self.arena_height <= 0 {
            return Err(ConfigError::Invalid("arena must have a positive size"));
        }

        let (right, bottom) = self
            .grid_extent()
            .ok_or(ConfigError::Invalid("grid is too large"))?;
        let half = self.bubble_size / 2;
        if self.grid_x0 < half || self.grid_y0 < half {
            return Err(ConfigError::Invalid("grid starts outside the arena"));
        }
        if right > self.arena_width || bottom > self.arena_height {
            return Err(ConfigError::Invalid("grid does not fit inside the arena"));
        }
        Ok(())
    }

    /// Right and bottom edges of the grid, `None` if they overflow `i32`
    ///
    /// The widest row is the first odd row, shifted right by half a cell.
    fn grid_extent(&self) -> Option<(i32, i32)> {
        let size = self.bubble_size;
        let half = size / 2;
        let last_col = i32::try_from(self.cols.checked_sub(1)?).ok()?;
        let last_row = i32::try_from(self.rows.checked_sub(1)?).ok()?;
        let shift = if self.rows > 1 { half } else { 0 };

        let right = self
            .grid_x0
            .checked_add(shift)?
            .checked_add(size.checked_mul(last_col)?)?
            .checked_add(half)?;
        let bottom = self
            .grid_y0
            .checked_add(size.checked_mul(last_row)?)?
            .checked_add(half)?;
        Some((right, bottom))
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout {
            rows: self.rows,
            cols: self.cols,
            cell_size: self.bubble_size,
            x0: self.grid_x0,
            y0: self.grid_y0,
        }
    }

    pub fn arena(&self) -> Arena {
        Arena {
            width: self.arena_width,
            height: self.arena_height,
        }
    }

    /// Launcher at the bottom center of the arena, aimed straight up
    pub fn launcher(&self) -> Launcher {
        Launcher {
            origin: IVec2::new(self.arena_width / 2, self.arena_height),
            angle: 90_i32.clamp(self.min_angle, self.max_angle),
            min_angle: self.min_angle,
            max_angle: self.max_angle,
            step: self.rotate_step,
        }
    }

    /// Colors in play
    pub fn palette(&self) -> &'static [Color] {
        &Color::ALL[..self.palette_size.min(Color::ALL.len())]
    }
}
