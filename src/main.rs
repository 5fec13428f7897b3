//! Bubble Shooter headless runner
//!
//! Plays a fixed sweep of shots without a renderer and logs what happens.
//! Usage: `bubble-shooter [config.json]`

use bubble_shooter::GameConfig;
use bubble_shooter::sim::{GameEvent, GameState, MatchState, ShotPhase, TickInput, tick};

/// Launcher angles tried in turn
const SWEEP: [i32; 9] = [90, 60, 120, 30, 150, 10, 170, 45, 135];

const MAX_SHOTS: usize = 300;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bubble Shooter (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    if let Err(e) = config.validate() {
        log::error!("{e}");
        std::process::exit(1);
    }

    let mut state = GameState::new(config);
    let mut fired = 0;
    for (shot, angle) in SWEEP.iter().cycle().take(MAX_SHOTS).enumerate() {
        if state.outcome != MatchState::Playing {
            break;
        }
        if play_shot(&mut state, *angle) {
            fired += 1;
        } else {
            log::warn!("shot {shot}: no landing at {angle} degrees");
        }
        for event in state.drain_events() {
            log_event(shot, &event);
        }
        let _ = state.take_falling();
    }

    log::info!(
        "finished: {:?} after {} shots, {} ticks, {} bubbles left",
        state.outcome,
        fired,
        state.time_ticks,
        state.occupied_count()
    );
}

/// Aim, fire and tick until the shot resolves. False if it could not fire.
fn play_shot(state: &mut GameState, angle: i32) -> bool {
    state.launcher.set_angle(angle);
    tick(state, &TickInput::default());
    tick(
        state,
        &TickInput {
            fire: true,
            ..Default::default()
        },
    );
    if state.phase != ShotPhase::Shot {
        return false;
    }
    while state.phase == ShotPhase::Shot {
        tick(state, &TickInput::default());
    }
    // Charge the next bubble
    tick(state, &TickInput::default());
    true
}

fn log_event(shot: usize, event: &GameEvent) {
    match event {
        GameEvent::Fired { destination } => {
            log::debug!("shot {shot}: fired toward {destination:?}")
        }
        GameEvent::Landed { destination, color } => {
            log::info!("shot {shot}: {} landed at {destination:?}", color.as_str())
        }
        GameEvent::Popped { cells } => log::info!("shot {shot}: popped {}", cells.len()),
        GameEvent::Dropped { cells } => log::info!("shot {shot}: dropped {}", cells.len()),
        GameEvent::Won => log::info!("shot {shot}: grid cleared"),
        GameEvent::GameOver => log::info!("shot {shot}: game over"),
    }
}
