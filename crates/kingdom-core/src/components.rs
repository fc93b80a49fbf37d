//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components. Components that hold
//! arena handles live in the sim crate, next to the arena.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Damageable state shared by every unit and structure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points, always in `[0, max]`.
    pub current: f64,
    pub max: f64,
    /// Flat reduction subtracted from every incoming hit.
    pub defense: f64,
    /// Set once, the first time `current` reaches zero.
    pub dead: bool,
}

/// Capability flags resolved once at spawn time.
/// Targeting permissions are checked against these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Towers, hubs and camps.
    pub building: bool,
    pub flying: bool,
    /// Whether Stun and Lightning can affect this entity.
    pub stunnable: bool,
}

/// Attack/cooldown state machine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AttackState {
    /// Seconds until the next attack may fire. Never negative.
    pub cooldown_secs: f64,
    pub phase: AttackPhase,
}

/// Stun deadline. Movement and attacks are suppressed until `until_secs`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Stun {
    /// Simulation time at which the stun expires. `None` = not stunned.
    pub until_secs: Option<f64>,
}

/// Regenerating mana pool (player hub and enemy camps).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ManaPool {
    /// Always in `[0, capacity]`.
    pub current: f64,
    pub capacity: f64,
    /// Mana per second.
    pub regen_rate: f64,
}

/// Sprite facing for the rendering collaborator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Facing {
    pub left: bool,
}

/// How an entity delivers its attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackMode {
    /// Damage applied directly to the target.
    Melee,
    /// Homing projectile carrying the damage.
    Projectile { speed: f64 },
    /// Wizard tower: cast the current spell, paid from the player hub.
    Spell,
}

/// Wizard tower spell book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Spellcaster {
    pub spell: SpellKind,
    pub mana_cost: f64,
    pub heal_amount: f64,
    pub stun_duration_secs: f64,
}

/// Marks an entity as a spawned unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Minion;

/// Marks an entity as a player tower.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tower;

/// Marks the player hub. There is at most one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerHub;

/// Marks an enemy camp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyCamp {
    pub kingdom: Kingdom,
}
