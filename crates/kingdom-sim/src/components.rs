//! Components that hold arena handles or shared templates.
//!
//! Plain-data components live in `kingdom_core::components`; these ones
//! reference other entities and so belong next to the world.

use std::sync::Arc;

use hecs::Entity;

use kingdom_core::components::AttackMode;
use kingdom_core::enums::{SpecialAbility, Team};
use kingdom_core::types::Position;
use kingdom_core::units::UnitSpec;

/// Everything an attacking entity needs: stats, delivery and permissions.
/// Minions derive it from their template at spawn; towers from their template.
#[derive(Debug, Clone)]
pub struct Combatant {
    /// Shared template for units. `None` for towers.
    pub unit: Option<Arc<UnitSpec>>,
    /// Level-scaled damage.
    pub damage: f64,
    pub attack_speed: f64,
    pub attack_range: f64,
    pub detection_range: f64,
    /// Zero for stationary combatants.
    pub move_speed: f64,
    pub mode: AttackMode,
    pub ability: SpecialAbility,
    pub ability_range: Option<f64>,
    pub can_target_air: bool,
    pub can_target_buildings: bool,
}

/// Cached target and the countdown to the next search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Targeting {
    /// May go stale; resolved through the world every use.
    pub target: Option<Entity>,
    pub retarget_in_secs: f64,
}

/// The base an entity belongs to (its spawner or the player hub).
#[derive(Debug, Clone, Copy)]
pub struct HomeBase(pub Option<Entity>);

/// Homing projectile in flight.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub damage: f64,
    pub speed: f64,
    pub target: Entity,
    pub source: Entity,
    pub team: Team,
}

/// Startup state of a spawner waiting on the player hub.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readiness {
    Waiting { waited_secs: f64 },
    Ready,
    /// Gave up waiting; production stays off.
    Disabled,
}

/// One roster entry of a spawner.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub unit: Arc<UnitSpec>,
    /// Population cap for this unit type.
    pub cap: usize,
    pub cooldown_secs: f64,
    /// Recounted from `Spawner::live` on every production pass.
    pub live: usize,
}

/// Unit production state of an enemy camp.
#[derive(Debug, Clone)]
pub struct Spawner {
    pub roster: Vec<RosterEntry>,
    /// Non-owning handles of spawned units with their roster index.
    pub live: Vec<(Entity, usize)>,
    /// Absolute spawn positions, used round-robin.
    pub spawn_points: Vec<Position>,
    pub next_spawn_point: usize,
    /// Random spawn radius when no spawn points are configured.
    pub spawn_radius: f64,
    /// Spawner-wide population cap.
    pub max_live: usize,
    pub production_timer_secs: f64,
    pub level: u32,
    pub active: bool,
    pub readiness: Readiness,
    /// Set once the destruction hook has run.
    pub destroyed: bool,
}
