//! Game state snapshot: the read-only view polled by UI collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{EntityId, Position, SimTime};

/// Complete visible state, rebuilt after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub entities: Vec<EntityView>,
    pub hub: HubView,
    pub deck: Vec<CardView>,
    pub camps: Vec<CampView>,
    pub defense: DefenseView,
    /// Events raised since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// One damageable entity or projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub team: Team,
    pub position: Position,
    pub facing_left: bool,
    /// current / max, in `[0, 1]`. Projectiles report 1.
    pub health_ratio: f64,
    pub stunned: bool,
    /// Unit template name, if any.
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubView {
    pub id: Option<EntityId>,
    pub health_ratio: f64,
    pub mana: f64,
    pub mana_ratio: f64,
    pub gold: u32,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub slot: usize,
    pub unit: String,
    pub mana_cost: u32,
    pub cooldown_remaining_secs: f64,
    /// Affordable, off cooldown and in Defense mode.
    pub playable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampView {
    pub id: EntityId,
    pub kingdom: Kingdom,
    pub health_ratio: f64,
    pub mana_ratio: f64,
    pub live_units: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefenseView {
    /// A camp is currently fielded.
    pub active: bool,
    pub cooldown_remaining_secs: f64,
}
