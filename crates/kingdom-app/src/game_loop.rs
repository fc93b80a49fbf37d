//! Game loop thread: runs the simulation engine at 30Hz and publishes
//! snapshots.
//!
//! The engine is created inside this thread so the loop owns it outright.
//! Commands arrive via an `mpsc` channel. Snapshots are stored in shared
//! state for polling. When the loop ends it hands back the player profile
//! with the session written into it.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use kingdom_campaign::PlayerProfile;
use kingdom_core::constants::TICK_RATE;
use kingdom_core::state::GameStateSnapshot;
use kingdom_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{AppError, GameLoopCommand};

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Fastest supported pacing.
pub const MAX_TIME_SCALE: f64 = 4.0;

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<PlayerProfile>), AppError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("kingdom-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::new(config);
            run_game_loop(engine, cmd_rx, &latest_snapshot)
        })
        .map_err(AppError::Spawn)?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> PlayerProfile {
    let mut time_scale = 1.0;
    let mut next_tick_time = Instant::now();
    info!("game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::SetTimeScale(scale)) => {
                    time_scale = clamp_time_scale(scale);
                    debug!(time_scale, "time scale changed");
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "game loop stopped");
                    return engine.profile();
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        if time_scale > 0.0 {
            let snapshot = engine.tick();

            // 3. Store latest snapshot for polling
            if let Ok(mut lock) = latest_snapshot.lock() {
                *lock = Some(snapshot);
            }
        }

        // 4. Sleep until next tick, adjusting for time_scale
        let effective_tick_duration = tick_duration(time_scale);
        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

pub fn clamp_time_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(0.0, MAX_TIME_SCALE)
    } else {
        1.0
    }
}

/// Wall-clock interval between ticks at `time_scale`. A frozen loop still
/// polls commands at the nominal rate.
fn tick_duration(time_scale: f64) -> Duration {
    if time_scale > 0.001 {
        TICK_DURATION.div_f64(time_scale)
    } else {
        TICK_DURATION
    }
}
