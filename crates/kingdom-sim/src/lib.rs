//! Simulation engine for the kingdom defense game.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the presentation layer.

pub mod components;
pub mod context;
pub mod damage;
pub mod deck;
pub mod defense;
pub mod engine;
pub mod scenario;
pub mod systems;
pub mod world_setup;

pub use kingdom_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use scenario::ScenarioConfig;

#[cfg(test)]
mod tests;
