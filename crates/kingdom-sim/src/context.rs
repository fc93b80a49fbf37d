//! Per-tick simulation context: the game mode and the handles every system
//! would otherwise look up by type.

use hecs::{Entity, World};

use kingdom_core::components::Health;
use kingdom_core::enums::{GameMode, Team};
use kingdom_core::types::{EntityId, Position};

/// Shared state passed to every system.
#[derive(Debug, Clone)]
pub struct SimContext {
    pub mode: GameMode,
    /// Simulation time at the start of the current tick.
    pub now_secs: f64,
    pub dt: f64,
    pub player_hub: Option<Entity>,
    /// The camp fielded by the current defense round.
    pub enemy_camp: Option<Entity>,
    /// Whether the Heal ability also heals its caster.
    pub heal_includes_caster: bool,
}

impl SimContext {
    pub fn new(heal_includes_caster: bool) -> Self {
        Self {
            mode: GameMode::default(),
            now_secs: 0.0,
            dt: kingdom_core::constants::DT,
            player_hub: None,
            enemy_camp: None,
            heal_includes_caster,
        }
    }

    /// The base a unit of `team` marches on when it has no target.
    pub fn opposing_base(&self, team: Team) -> Option<Entity> {
        match team {
            Team::Player => self.enemy_camp,
            Team::Enemy => self.player_hub,
            Team::Neutral => None,
        }
    }

    /// Whether the player hub exists and is alive.
    pub fn hub_ready(&self, world: &World) -> bool {
        self.player_hub.is_some_and(|hub| is_alive(world, hub))
    }
}

/// Whether `entity` still resolves and is not dead.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    world
        .get::<&Health>(entity)
        .map(|h| !h.dead)
        .unwrap_or(false)
}

/// Position of a live entity.
pub fn live_position(world: &World, entity: Entity) -> Option<Position> {
    if !is_alive(world, entity) {
        return None;
    }
    world.get::<&Position>(entity).ok().map(|p| *p)
}

/// External handle for an arena entity.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Arena entity for an external handle, if the bits are well-formed.
pub fn entity_from_id(id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0)
}
