//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Faction tag. Entities never target their own team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
    #[default]
    Neutral,
}

/// Playable kingdoms. Units, camps and profiles belong to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kingdom {
    #[default]
    GreatZoey,
    SvenImmortal,
    AzarakhshMagus,
}

impl Kingdom {
    pub const ALL: [Kingdom; 3] = [
        Kingdom::GreatZoey,
        Kingdom::SvenImmortal,
        Kingdom::AzarakhshMagus,
    ];
}

/// Ability executed after each successful attack of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialAbility {
    #[default]
    None,
    /// Heal same-team entities around the attacker.
    Heal,
    /// Splash damage around the target.
    AreaDamage,
    /// Defined but inert.
    Boost,
    /// Stun the target for a fixed duration.
    Stun,
}

/// Wizard tower spells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellKind {
    #[default]
    Fire,
    Heal,
    /// Defined but inert.
    Boost,
    Lightning,
}

/// What kind of thing an entity is. Used by snapshots and capability resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Minion,
    Tower,
    PlayerHub,
    EnemyCamp,
    Projectile,
}

/// Per-entity attack state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPhase {
    /// No target in attack range.
    #[default]
    Idle,
    /// Target in range, waiting on cooldown.
    InRange,
    /// Attack executed this tick.
    Attacking,
    /// Stunned: attack and movement suppressed.
    Stunned,
}

/// Top-level game mode. Hub is the safe building phase; Defense runs camps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Hub,
    Defense,
}

/// Simulation run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// The player hub has been destroyed.
    GameOver,
}
