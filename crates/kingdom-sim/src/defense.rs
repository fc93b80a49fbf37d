//! Defense rounds: the countdown to the next enemy camp, camp placement
//! and the end-of-round teardown.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use kingdom_core::constants::TIMER_EPSILON;
use kingdom_core::enums::{GameMode, Kingdom};
use kingdom_core::error::SimError;
use kingdom_core::events::SimEvent;
use kingdom_core::units::UnitCatalog;

use crate::context::{live_position, SimContext};
use crate::scenario::ScenarioConfig;
use crate::systems::spawner;
use crate::world_setup;

/// Countdown state of the defense cycle.
#[derive(Debug, Clone, Copy)]
pub struct DefenseCycle {
    pub cooldown_remaining_secs: f64,
}

impl DefenseCycle {
    pub fn new(cooldown_secs: f64) -> Self {
        Self {
            cooldown_remaining_secs: cooldown_secs,
        }
    }
}

/// Everything a round needs besides the world.
pub struct RoundSetup<'a> {
    pub scenario: &'a ScenarioConfig,
    pub catalog: &'a UnitCatalog,
    pub player_kingdom: Kingdom,
}

/// Count down while no camp is fielded in Defense mode; field one at zero.
pub fn run(
    world: &mut World,
    ctx: &mut SimContext,
    cycle: &mut DefenseCycle,
    setup: &RoundSetup<'_>,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
) {
    if ctx.mode != GameMode::Defense || ctx.enemy_camp.is_some() {
        return;
    }
    cycle.cooldown_remaining_secs = (cycle.cooldown_remaining_secs - ctx.dt).max(0.0);
    if cycle.cooldown_remaining_secs > TIMER_EPSILON {
        return;
    }
    if let Err(err) = start_round(world, ctx, cycle, setup, rng, events) {
        warn!(%err, "defense round not started");
        cycle.cooldown_remaining_secs = setup.scenario.defense_cooldown_secs;
    }
}

/// Spawn and activate a camp of a random opposing kingdom next to the hub.
pub fn start_round(
    world: &mut World,
    ctx: &mut SimContext,
    cycle: &mut DefenseCycle,
    setup: &RoundSetup<'_>,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
) -> Result<Entity, SimError> {
    let hub = ctx
        .player_hub
        .and_then(|h| live_position(world, h))
        .ok_or(SimError::MissingReference("player hub"))?;
    let kingdoms = setup.scenario.opponent_kingdoms(setup.player_kingdom);
    if kingdoms.is_empty() {
        return Err(SimError::MissingReference("enemy camp template"));
    }
    let kingdom = kingdoms[rng.gen_range(0..kingdoms.len())];
    let template = setup
        .scenario
        .camp_for(kingdom)
        .ok_or(SimError::MissingReference("enemy camp template"))?;

    let offset = setup.scenario.camp_offset;
    let position = hub.offset(offset.x, offset.y);
    let (camp, _rejected) = world_setup::spawn_camp(world, template, setup.catalog, position);
    spawner::activate(world, camp, events);

    ctx.enemy_camp = Some(camp);
    cycle.cooldown_remaining_secs = setup.scenario.defense_cooldown_secs;
    info!(?kingdom, x = position.x, y = position.y, "defense round started");
    Ok(camp)
}

/// Remove the fielded camp and its units.
pub fn end_round(world: &mut World, ctx: &mut SimContext, despawn_buffer: &mut Vec<Entity>) {
    if let Some(camp) = ctx.enemy_camp.take() {
        spawner::remove_camp(world, camp, despawn_buffer);
        info!("defense round ended");
    }
}
