//! Events emitted by the simulation for rendering, audio and UI feedback.
//!
//! The core never renders; collaborators react to these triggers.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A unit entered the world.
    Spawned {
        entity: EntityId,
        unit: String,
        team: Team,
        position: Position,
    },
    /// An attack fired (melee swing, projectile launch or spell cast).
    Attack { attacker: EntityId, target: EntityId },
    /// Damage landed.
    Hit { target: EntityId, amount: f64 },
    /// An entity's health reached zero. Emitted once per entity.
    Death { entity: EntityId, kind: EntityKind },
    Healed { target: EntityId, amount: f64 },
    Stunned { target: EntityId, until_secs: f64 },
    ProjectileFired {
        projectile: EntityId,
        source: EntityId,
        target: EntityId,
    },
    CampActivated { camp: EntityId, kingdom: Kingdom },
    /// A camp fell; its units were removed and the reward granted.
    CampDestroyed {
        camp: EntityId,
        kingdom: Kingdom,
        reward_gold: u32,
    },
    LevelUp { level: u32 },
    ModeChanged { mode: GameMode },
    CommandRejected { reason: String },
}
