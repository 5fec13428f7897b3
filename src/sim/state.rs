//! Game state and core runtime types
//!
//! One session: the grid, the launcher, the shot in flight and the queue of
//! events and falling bubbles handed to the presentation layer.

use std::fmt;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Bubble, CellIndex, Color, HexGrid};
use super::landing::resolve_landing;
use super::trajectory::{Arena, Launcher, Rotation, Trajectory, trace};
use crate::settings::GameConfig;

/// Life cycle of the launcher's current shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPhase {
    /// Loaded and aiming; the preview is live
    Ready,
    /// In flight along its planned frames
    Shot,
    /// Arrived and resolved; the next bubble is charged on the next tick
    Landed,
}

/// Outcome of the whole match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Playing,
    /// A bubble reached the bottom row
    GameOver,
    /// The grid was cleared
    Won,
}

/// Things collaborators may react to (sound, score)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { destination: CellIndex },
    Landed { destination: CellIndex, color: Color },
    /// Same-color cluster removed
    Popped { cells: Vec<CellIndex> },
    /// Bubbles cut off from the ceiling
    Dropped { cells: Vec<CellIndex> },
    Won,
    GameOver,
}

/// A bubble detached from the grid. Only its start position is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingBubble {
    pub bubble: Bubble,
    pub pos: Vec2,
}

/// The bubble in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub bubble: Bubble,
    pub destination: CellIndex,
    /// One position per tick; the last is the destination center
    pub frames: Vec<Vec2>,
    pub frame: usize,
}

impl Projectile {
    pub fn pos(&self) -> Vec2 {
        self.frames[self.frame]
    }

    pub fn is_arrived(&self) -> bool {
        self.frame + 1 >= self.frames.len()
    }

    /// Move to the next frame, returns false once on the last one
    pub fn advance(&mut self) -> bool {
        if self.is_arrived() {
            return false;
        }
        self.frame += 1;
        true
    }
}

/// Aim preview recomputed every tick while ready
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub trajectory: Trajectory,
    /// Resolved landing cell; `None` means the shot cannot be fired
    pub landing: Option<CellIndex>,
}

/// Source of colors for new bubbles
pub trait ColorSource {
    fn pick(&mut self) -> Color;
}

impl<F: FnMut() -> Color> ColorSource for F {
    fn pick(&mut self) -> Color {
        self()
    }
}

/// Seeded random draws from a fixed palette
#[derive(Debug, Clone)]
pub struct SeededPalette {
    colors: Vec<Color>,
    rng: Pcg32,
}

impl SeededPalette {
    pub fn new(colors: &[Color], seed: u64) -> Self {
        Self {
            colors: if colors.is_empty() {
                Color::ALL.to_vec()
            } else {
                colors.to_vec()
            },
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl ColorSource for SeededPalette {
    fn pick(&mut self) -> Color {
        self.colors[self.rng.random_range(0..self.colors.len())]
    }
}

/// Complete session state
pub struct GameState {
    pub config: GameConfig,
    pub arena: Arena,
    pub grid: HexGrid,
    pub launcher: Launcher,
    pub phase: ShotPhase,
    pub outcome: MatchState,
    /// Bubble waiting in the launcher
    pub loaded: Bubble,
    /// Color of the bubble after that
    pub next_color: Color,
    pub projectile: Option<Projectile>,
    pub preview: Preview,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) falling: Vec<FallingBubble>,
    pub(crate) events: Vec<GameEvent>,
    palette: Box<dyn ColorSource>,
    next_id: u32,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("phase", &self.phase)
            .field("outcome", &self.outcome)
            .field("angle", &self.launcher.angle)
            .field("loaded", &self.loaded)
            .field("next_color", &self.next_color)
            .field("occupied", &self.grid.occupied_count())
            .field("time_ticks", &self.time_ticks)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// New game with the config's seeded palette
    ///
    /// `config` must pass [`GameConfig::validate`]; geometry is not
    /// rechecked here.
    pub fn new(config: GameConfig) -> Self {
        let palette = SeededPalette::new(config.palette(), config.seed);
        Self::with_palette(config, Box::new(palette))
    }

    /// New game drawing colors from `palette`. Same contract as [`Self::new`].
    pub fn with_palette(config: GameConfig, palette: Box<dyn ColorSource>) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "GameState built from an invalid config: {config:?}"
        );
        // Loaded and on-deck bubbles are drawn by start()
        let mut state = Self {
            arena: config.arena(),
            grid: HexGrid::new(config.layout()),
            launcher: config.launcher(),
            phase: ShotPhase::Ready,
            outcome: MatchState::Playing,
            loaded: Bubble {
                id: 0,
                color: Color::Blue,
            },
            next_color: Color::Blue,
            projectile: None,
            preview: Preview::default(),
            time_ticks: 0,
            falling: Vec::new(),
            events: Vec::new(),
            palette,
            next_id: 1,
            config,
        };
        state.start();
        state
    }

    /// Fill the opening rows and load the launcher
    fn start(&mut self) {
        let rows = self.config.initial_rows;
        let mut make = {
            let palette = &mut self.palette;
            let next_id = &mut self.next_id;
            move || {
                let id = *next_id;
                *next_id += 1;
                Bubble {
                    id,
                    color: palette.pick(),
                }
            }
        };
        self.grid.fill_rows(rows, &mut make);

        self.next_color = self.palette.pick();
        self.charge();
        self.refresh_preview();
        log::info!(
            "game started: {} bubbles, seed {}",
            self.grid.occupied_count(),
            self.config.seed
        );
    }

    /// Clear everything and start over with the same palette
    pub fn restart(&mut self) {
        self.grid.clear();
        self.launcher = self.config.launcher();
        self.phase = ShotPhase::Ready;
        self.outcome = MatchState::Playing;
        self.projectile = None;
        self.preview = Preview::default();
        self.falling.clear();
        self.events.clear();
        self.start();
    }

    /// Allocate a new bubble ID
    pub fn next_bubble_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Promote the on-deck color into the launcher and draw a new one
    pub fn charge(&mut self) {
        let id = self.next_bubble_id();
        self.loaded = Bubble {
            id,
            color: self.next_color,
        };
        self.next_color = self.palette.pick();
        self.phase = ShotPhase::Ready;
    }

    /// Recompute the aim preview for the current angle
    pub fn refresh_preview(&mut self) {
        let trajectory = trace(&self.grid, &self.arena, &self.launcher);
        let landing = resolve_landing(&self.grid, &trajectory.hit);
        self.preview = Preview {
            trajectory,
            landing,
        };
    }

    /// Turn the launcher one step
    pub fn rotate(&mut self, rotation: Rotation) {
        self.launcher.rotate(rotation);
        if self.phase == ShotPhase::Ready {
            self.refresh_preview();
        }
    }

    /// Where the projectile is drawn
    pub fn projectile_pos(&self) -> Vec2 {
        match &self.projectile {
            Some(projectile) => projectile.pos(),
            None => self.launcher.origin.as_vec2(),
        }
    }

    /// Center of a cell, for placing falling bubbles
    pub fn cell_center(&self, index: CellIndex) -> IVec2 {
        self.grid.cell(index).center
    }

    /// Number of bubbles on the grid
    pub fn occupied_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Whether fire() would be accepted right now
    pub fn can_fire(&self) -> bool {
        self.outcome == MatchState::Playing
            && self.phase == ShotPhase::Ready
            && self.preview.landing.is_some()
    }

    /// Take the bubbles that fell since the last call
    pub fn take_falling(&mut self) -> Vec<FallingBubble> {
        std::mem::take(&mut self.falling)
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Detach bubbles from the grid and queue them as falling
    pub(crate) fn drop_cells<'a>(&mut self, cells: impl IntoIterator<Item = &'a CellIndex>) {
        for &index in cells {
            if let Some(bubble) = self.grid.detach(index) {
                let pos = self.grid.cell(index).center.as_vec2();
                self.falling.push(FallingBubble { bubble, pos });
            }
        }
    }
}
