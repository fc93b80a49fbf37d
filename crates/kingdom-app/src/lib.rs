//! Headless host for the Kingdom simulation.
//!
//! Runs the engine on its own thread behind a command channel, loads the
//! runner configuration and drives scripted defense rounds.

pub mod config;
pub mod control;
pub mod game_loop;
pub mod script;
pub mod state;

pub use kingdom_core as core;
