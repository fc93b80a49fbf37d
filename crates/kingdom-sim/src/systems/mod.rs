//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only)
//! plus the tick's `SimContext`. They own no state.

pub mod abilities;
pub mod cleanup;
pub mod combat;
pub mod hub;
pub mod movement;
pub mod projectile;
pub mod snapshot;
pub mod spawner;
pub mod targeting;
