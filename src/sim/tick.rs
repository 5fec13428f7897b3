//! Frame-stepped shot cycle
//!
//! Ready (aiming) -> Shot (in flight) -> Landed (resolved) -> Ready.
//! Grid mutation only happens in the tick the projectile arrives.

use super::cluster::{find_floating, find_same_color_cluster};
use super::grid::Cell;
use super::motion::plan_frames;
use super::state::{GameEvent, GameState, MatchState, Projectile, ShotPhase};
use super::trajectory::Rotation;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Turn the launcher one step
    pub rotate: Option<Rotation>,
    /// Fire the loaded bubble
    pub fire: bool,
}

/// Smallest cluster that pops
pub const POP_THRESHOLD: usize = 3;

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.outcome != MatchState::Playing {
        return;
    }
    state.time_ticks += 1;

    match state.phase {
        ShotPhase::Ready => {
            if let Some(rotation) = input.rotate {
                state.launcher.rotate(rotation);
            }
            state.refresh_preview();
            if input.fire {
                fire(state);
            }
        }
        ShotPhase::Shot => {
            let arrived = match state.projectile.as_mut() {
                Some(projectile) => {
                    projectile.advance();
                    projectile.is_arrived()
                }
                None => true,
            };
            if arrived {
                land(state);
            }
        }
        ShotPhase::Landed => {
            state.charge();
            state.refresh_preview();
        }
    }
}

/// Launch the loaded bubble along the current preview
///
/// Returns false, leaving the state untouched, unless the launcher is ready
/// and the preview resolved to a landing cell.
pub fn fire(state: &mut GameState) -> bool {
    if !state.can_fire() {
        return false;
    }
    let Some(destination) = state.preview.landing else {
        return false;
    };

    let frames = plan_frames(
        &state.preview.trajectory.segments,
        state.cell_center(destination),
        state.config.motion_step,
    );
    log::debug!(
        "fired {:?} at {} degrees toward {:?} ({} frames, {} bounces)",
        state.loaded.color,
        state.launcher.angle,
        destination,
        frames.len(),
        state.preview.trajectory.bounces
    );

    state.projectile = Some(Projectile {
        bubble: state.loaded,
        destination,
        frames,
        frame: 0,
    });
    state.phase = ShotPhase::Shot;
    state.events.push(GameEvent::Fired { destination });
    true
}

/// Attach the arrived projectile and settle the grid
fn land(state: &mut GameState) {
    state.phase = ShotPhase::Landed;
    let Some(projectile) = state.projectile.take() else {
        return;
    };
    let destination = projectile.destination;
    if let Err(bubble) = state.grid.attach(destination, projectile.bubble) {
        log::warn!("landing cell {destination:?} already occupied, dropping {bubble:?}");
        return;
    }
    state.events.push(GameEvent::Landed {
        destination,
        color: projectile.bubble.color,
    });

    let cluster = find_same_color_cluster(&state.grid, destination);
    if cluster.len() >= POP_THRESHOLD {
        state.drop_cells(&cluster);
        log::debug!("popped {} bubbles at {:?}", cluster.len(), destination);
        state.events.push(GameEvent::Popped {
            cells: cluster.into_iter().collect(),
        });
    }

    let floating = find_floating(&state.grid);
    if !floating.is_empty() {
        state.drop_cells(&floating);
        log::debug!("dropped {} floating bubbles", floating.len());
        state.events.push(GameEvent::Dropped {
            cells: floating.into_iter().collect(),
        });
    }

    check_outcome(state);
}

/// Won once the grid is empty, lost once the bottom row is reached
fn check_outcome(state: &mut GameState) {
    let bottom = state.grid.rows() - 1;
    if state.grid.occupied_count() == 0 {
        state.outcome = MatchState::Won;
        state.events.push(GameEvent::Won);
        log::info!("grid cleared after {} ticks", state.time_ticks);
    } else if state.grid.row(bottom).iter().any(Cell::is_occupied) {
        state.outcome = MatchState::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("bottom row reached after {} ticks", state.time_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::grid::{Bubble, CellIndex, Color};

    fn solid(color: Color, initial_rows: usize) -> GameState {
        GameState::with_palette(
            GameConfig {
                initial_rows,
                ..Default::default()
            },
            Box::new(move || color),
        )
    }

    fn fire_input() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    /// Tick until the shot in flight has been resolved
    fn run_shot(state: &mut GameState) {
        for _ in 0..500 {
            if state.phase != ShotPhase::Shot {
                return;
            }
            tick(state, &TickInput::default());
        }
        panic!("shot never landed");
    }

    fn recolor(state: &mut GameState, row: usize, col: usize, color: Color) {
        let index = CellIndex::new(row, col);
        let bubble = state.grid.detach(index).unwrap();
        state.grid.attach(index, Bubble { color, ..bubble }).unwrap();
    }

    #[test]
    fn test_idle_tick_stays_ready() {
        let mut state = GameState::new(GameConfig::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, ShotPhase::Ready);
        assert_eq!(state.time_ticks, 1);
        assert!(state.preview.landing.is_some());
    }

    #[test]
    fn test_rotate_input() {
        let mut state = GameState::new(GameConfig::default());
        let input = TickInput {
            rotate: Some(Rotation::Left),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.launcher.angle, 92);
        for _ in 0..100 {
            tick(&mut state, &input);
        }
        assert_eq!(state.launcher.angle, 175);
    }

    #[test]
    fn test_fire_straight_up_lands_on_ceiling() {
        let mut state = solid(Color::Sky, 0);
        let loaded = state.loaded;
        tick(&mut state, &fire_input());
        assert_eq!(state.phase, ShotPhase::Shot);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Fired {
                destination: CellIndex::new(0, 8)
            }]
        );

        run_shot(&mut state);
        assert_eq!(state.phase, ShotPhase::Landed);
        assert_eq!(state.grid.cell(CellIndex::new(0, 8)).occupant, Some(loaded));
        assert_eq!(state.projectile_pos(), state.launcher.origin.as_vec2());

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, ShotPhase::Ready);
        assert_ne!(state.loaded.id, loaded.id);
    }

    #[test]
    fn test_projectile_moves_upward_each_tick() {
        let mut state = solid(Color::Sky, 0);
        tick(&mut state, &fire_input());
        let mut last_y = state.projectile_pos().y;
        while state.phase == ShotPhase::Shot {
            tick(&mut state, &TickInput::default());
            if let Some(projectile) = &state.projectile {
                assert!(projectile.pos().y < last_y);
                last_y = projectile.pos().y;
            }
        }
    }

    #[test]
    fn test_fire_only_when_ready() {
        let mut state = solid(Color::Sky, 0);
        assert!(fire(&mut state));
        assert!(!fire(&mut state));
        let destination = state.projectile.as_ref().map(|p| p.destination);

        // Fire input while in flight is ignored
        tick(&mut state, &fire_input());
        assert_eq!(state.projectile.as_ref().map(|p| p.destination), destination);
    }

    #[test]
    fn test_fire_rejected_without_landing() {
        let mut state = GameState::new(GameConfig::default());
        state.preview.landing = None;
        assert!(!state.can_fire());
        assert!(!fire(&mut state));
        assert_eq!(state.phase, ShotPhase::Ready);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_three_in_a_column_pop_and_win() {
        let mut state = solid(Color::Red, 0);
        for _ in 0..3 {
            tick(&mut state, &fire_input());
            run_shot(&mut state);
            tick(&mut state, &TickInput::default());
        }

        let events = state.drain_events();
        let popped: Vec<CellIndex> = [(0, 8), (1, 8), (2, 8)]
            .into_iter()
            .map(|(r, c)| CellIndex::new(r, c))
            .collect();
        assert!(events.contains(&GameEvent::Popped { cells: popped }));
        assert_eq!(events.last(), Some(&GameEvent::Won));
        assert_eq!(state.outcome, MatchState::Won);
        assert_eq!(state.occupied_count(), 0);

        let falling = state.take_falling();
        assert_eq!(falling.len(), 3);
        assert!(falling.iter().all(|f| f.bubble.color == Color::Red));
        assert!(state.take_falling().is_empty());
    }

    #[test]
    fn test_two_of_a_kind_stay() {
        let mut state = solid(Color::Pink, 0);
        for _ in 0..2 {
            tick(&mut state, &fire_input());
            run_shot(&mut state);
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.occupied_count(), 2);
        assert_eq!(state.outcome, MatchState::Playing);
        assert!(state.take_falling().is_empty());
    }

    #[test]
    fn test_bottom_row_ends_match() {
        let mut state = solid(Color::Blue, 19);
        recolor(&mut state, 18, 8, Color::Red);
        recolor(&mut state, 18, 9, Color::Red);
        state.refresh_preview();
        assert_eq!(state.preview.landing, Some(CellIndex::new(19, 8)));

        tick(&mut state, &fire_input());
        run_shot(&mut state);
        assert_eq!(state.outcome, MatchState::GameOver);
        assert_eq!(state.drain_events().last(), Some(&GameEvent::GameOver));

        // Finished matches ignore input
        let ticks = state.time_ticks;
        tick(&mut state, &fire_input());
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.phase, ShotPhase::Landed);

        state.restart();
        assert_eq!(state.outcome, MatchState::Playing);
        assert_eq!(state.phase, ShotPhase::Ready);
    }

    #[test]
    fn test_landing_drops_cut_off_bubbles() {
        let mut state = solid(Color::Sky, 0);
        let mut id = 1000;
        let mut put = |state: &mut GameState, row: usize, col: usize, color: Color| {
            id += 1;
            state.grid.attach(CellIndex::new(row, col), Bubble { id, color }).unwrap();
        };
        // Red pair hanging from the ceiling with a purple bubble below it
        put(&mut state, 0, 8, Color::Red);
        put(&mut state, 1, 8, Color::Red);
        put(&mut state, 2, 8, Color::Purple);
        put(&mut state, 0, 7, Color::Sky);
        state.loaded.color = Color::Red;
        // Land a red next to the pair: (1, 7) touches (0, 7), (0, 8), (1, 8)
        state.projectile = Some(Projectile {
            bubble: state.loaded,
            destination: CellIndex::new(1, 7),
            frames: vec![state.cell_center(CellIndex::new(1, 7)).as_vec2()],
            frame: 0,
        });
        state.phase = ShotPhase::Shot;
        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, ShotPhase::Landed);
        let events = state.drain_events();
        assert!(matches!(events[1], GameEvent::Popped { ref cells } if cells.len() == 3));
        assert!(events.contains(&GameEvent::Dropped {
            cells: vec![CellIndex::new(2, 8)]
        }));
        assert_eq!(state.occupied_count(), 1);
        assert!(state.grid.is_occupied(CellIndex::new(0, 7)));
        assert_eq!(state.take_falling().len(), 4);
    }

    #[test]
    fn test_determinism() {
        let config = GameConfig {
            seed: 99999,
            ..Default::default()
        };
        let mut state1 = GameState::new(config.clone());
        let mut state2 = GameState::new(config);

        let mut inputs = Vec::new();
        for i in 0..400 {
            inputs.push(TickInput {
                rotate: match i % 7 {
                    0 => Some(Rotation::Left),
                    3 => Some(Rotation::Right),
                    _ => None,
                },
                fire: i % 90 == 10,
            });
        }

        for input in &inputs {
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.launcher.angle, state2.launcher.angle);
        assert_eq!(state1.drain_events(), state2.drain_events());
        let occupants = |s: &GameState| s.grid.cells().map(|c| c.occupant).collect::<Vec<_>>();
        assert_eq!(occupants(&state1), occupants(&state2));
    }
}
