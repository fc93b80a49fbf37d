//! Application state shared between the host and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

use kingdom_campaign::{PlayerProfile, ProfileError};
use kingdom_core::commands::PlayerCommand;
use kingdom_core::error::ConfigError;
use kingdom_core::state::GameStateSnapshot;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Change the pacing of the loop. Clamped to 0.0..=4.0; 0 freezes it.
    SetTimeScale(f64),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop channel closed")]
    ChannelClosed,
    #[error("shared state lock poisoned")]
    LockPoisoned,
    #[error("game loop thread panicked")]
    LoopPanicked,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        AppError::LockPoisoned
    }
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in a `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` holds what does not exist before `start_simulation`
/// - the latest snapshot sits behind an `Arc` shared with the loop thread
pub struct AppState {
    /// Channel sender to the game loop thread. `None` before start.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot, updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    /// Loop thread; yields the written-back profile when it exits.
    pub loop_handle: Mutex<Option<JoinHandle<PlayerProfile>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_handle: Mutex::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
