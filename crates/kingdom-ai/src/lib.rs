//! Decision logic for Kingdom units and spawners.
//!
//! Targeting, the attack state machine, seek steering, the mana economy
//! and the spawn selection policy. Pure functions over plain data; the
//! sim crate feeds them from the ECS world.

pub mod combat;
pub mod economy;
pub mod spawn_policy;
pub mod steering;
pub mod targeting;

pub use kingdom_core as core;
