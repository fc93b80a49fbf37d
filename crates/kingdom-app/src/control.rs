//! Host-facing handlers that bridge requests to the game loop thread.

use kingdom_campaign::PlayerProfile;
use kingdom_core::commands::PlayerCommand;
use kingdom_core::state::GameStateSnapshot;
use kingdom_sim::engine::SimConfig;

use crate::game_loop;
use crate::state::{AppError, AppState, GameLoopCommand};

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(state: &AppState, config: SimConfig) -> Result<(), AppError> {
    let mut handle_lock = state.loop_handle.lock()?;
    if handle_lock.as_ref().is_some_and(|h| !h.is_finished()) {
        return Err(AppError::AlreadyRunning);
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(config, state.latest_snapshot.clone())?;

    *state.command_tx.lock()? = Some(cmd_tx);
    *handle_lock = Some(handle);
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), AppError> {
    send(state, GameLoopCommand::PlayerCommand(command))
}

pub fn set_time_scale(state: &AppState, scale: f64) -> Result<(), AppError> {
    send(state, GameLoopCommand::SetTimeScale(scale))
}

/// Get the latest snapshot (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, AppError> {
    Ok(state.latest_snapshot.lock()?.clone())
}

/// Stop the loop and wait for it. Returns the written-back profile.
pub fn stop_simulation(state: &AppState) -> Result<PlayerProfile, AppError> {
    let handle = state.loop_handle.lock()?.take().ok_or(AppError::NotStarted)?;
    if let Some(tx) = state.command_tx.lock()?.take() {
        // A loop that already exited has dropped its receiver.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    handle.join().map_err(|_| AppError::LoopPanicked)
}

fn send(state: &AppState, command: GameLoopCommand) -> Result<(), AppError> {
    let tx_lock = state.command_tx.lock()?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(command).map_err(|_| AppError::ChannelClosed),
        None => Err(AppError::NotStarted),
    }
}
