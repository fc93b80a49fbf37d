//! Enemy camp spawn economy.
//!
//! Each active camp regenerates mana, prunes its live list and counts its
//! roster cooldowns down every tick. Once per production interval it
//! produces at most one unit.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use kingdom_ai::combat::tick_cooldown;
use kingdom_ai::economy;
use kingdom_ai::spawn_policy::{self, RosterSlot};
use kingdom_core::components::{EnemyCamp, Health, ManaPool};
use kingdom_core::constants::*;
use kingdom_core::enums::{Kingdom, Team};
use kingdom_core::error::SimError;
use kingdom_core::events::SimEvent;
use kingdom_core::types::Position;

use crate::components::{Readiness, Spawner};
use crate::context::{entity_id, is_alive, SimContext};
use crate::world_setup;

pub fn run(world: &mut World, ctx: &SimContext, rng: &mut ChaCha8Rng, events: &mut Vec<SimEvent>) {
    let camps: Vec<Entity> = world
        .query::<&Spawner>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for camp in camps {
        step(world, ctx, rng, camp, events);
    }
}

/// Turn a camp on with a full mana pool.
pub fn activate(world: &mut World, camp: Entity, events: &mut Vec<SimEvent>) {
    let kingdom = match world.get::<&EnemyCamp>(camp) {
        Ok(c) => c.kingdom,
        Err(_) => return,
    };
    if let Ok(mut spawner) = world.get::<&mut Spawner>(camp) {
        spawner.active = true;
    }
    if let Ok(mut pool) = world.get::<&mut ManaPool>(camp) {
        economy::refill(&mut pool);
    }
    info!(?kingdom, "camp activated");
    events.push(SimEvent::CampActivated {
        camp: entity_id(camp),
        kingdom,
    });
}

/// Queue a camp and every unit it still owns for despawn.
pub fn remove_camp(world: &mut World, camp: Entity, despawn_buffer: &mut Vec<Entity>) {
    if let Ok(mut spawner) = world.get::<&mut Spawner>(camp) {
        spawner.active = false;
        despawn_buffer.extend(spawner.live.drain(..).map(|(e, _)| e));
    }
    despawn_buffer.push(camp);
}

/// Find camps whose health reached zero and run their destruction hook
/// once: live units force-removed, production off, camp despawned.
/// Returns the destroyed camps for the reward hook.
pub fn collect_destroyed(
    world: &mut World,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<(Entity, Kingdom)> {
    let fallen: Vec<(Entity, Kingdom)> = world
        .query::<(&EnemyCamp, &Spawner, &Health)>()
        .iter()
        .filter(|(_, (_, spawner, health))| health.dead && !spawner.destroyed)
        .map(|(e, (camp, _, _))| (e, camp.kingdom))
        .collect();
    for (camp, kingdom) in &fallen {
        if let Ok(mut spawner) = world.get::<&mut Spawner>(*camp) {
            spawner.destroyed = true;
        }
        remove_camp(world, *camp, despawn_buffer);
        info!(?kingdom, "camp destroyed");
    }
    fallen
}

fn step(
    world: &mut World,
    ctx: &SimContext,
    rng: &mut ChaCha8Rng,
    camp: Entity,
    events: &mut Vec<SimEvent>,
) {
    let Ok(mut spawner) = world.get::<&Spawner>(camp).map(|s| (*s).clone()) else {
        return;
    };
    if !spawner.active || spawner.destroyed || !is_alive(world, camp) {
        return;
    }

    match spawner.readiness {
        Readiness::Disabled => return,
        Readiness::Waiting { waited_secs } => {
            if ctx.hub_ready(world) {
                debug!(?camp, waited_secs, "player hub found");
                spawner.readiness = Readiness::Ready;
            } else {
                let waited_secs = waited_secs + ctx.dt;
                spawner.readiness = if waited_secs >= STARTUP_TIMEOUT_SECS {
                    let err = SimError::TransientUnavailable {
                        what: "player hub",
                        waited_secs,
                    };
                    warn!(?camp, %err, "camp disabled");
                    Readiness::Disabled
                } else {
                    Readiness::Waiting { waited_secs }
                };
                store(world, camp, spawner);
                return;
            }
        }
        Readiness::Ready => {}
    }

    let mana = match world.get::<&mut ManaPool>(camp) {
        Ok(mut pool) => {
            economy::regenerate(&mut pool, ctx.dt);
            pool.current
        }
        Err(_) => {
            warn!(?camp, error = %SimError::MissingReference("camp mana pool"), "camp skipped");
            return;
        }
    };
    resync(world, &mut spawner);
    for entry in &mut spawner.roster {
        entry.cooldown_secs = tick_cooldown(entry.cooldown_secs, ctx.dt);
    }

    spawner.production_timer_secs -= ctx.dt;
    if spawner.production_timer_secs > TIMER_EPSILON {
        store(world, camp, spawner);
        return;
    }
    spawner.production_timer_secs += PRODUCTION_INTERVAL_SECS;

    if spawner.live.len() < spawner.max_live {
        produce(world, rng, camp, &mut spawner, mana, events);
    }
    store(world, camp, spawner);
}

/// Drop dead or despawned units from the live list and recount each entry.
fn resync(world: &World, spawner: &mut Spawner) {
    spawner.live.retain(|(e, _)| is_alive(world, *e));
    for entry in &mut spawner.roster {
        entry.live = 0;
    }
    for (_, idx) in &spawner.live {
        if let Some(entry) = spawner.roster.get_mut(*idx) {
            entry.live += 1;
        }
    }
}

fn produce(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    camp: Entity,
    spawner: &mut Spawner,
    mana: f64,
    events: &mut Vec<SimEvent>,
) {
    let slots: Vec<RosterSlot> = spawner
        .roster
        .iter()
        .map(|e| RosterSlot {
            mana_cost: e.unit.mana_cost,
            cooldown_secs: e.cooldown_secs,
            live: e.live,
            cap: e.cap,
        })
        .collect();
    let Some(idx) = spawn_policy::choose(&slots, mana, rng) else {
        return;
    };

    let cost = spawner.roster[idx].unit.mana_cost as f64;
    let paid = match world.get::<&mut ManaPool>(camp) {
        Ok(mut pool) => economy::try_spend(&mut pool, cost),
        Err(_) => false,
    };
    if !paid {
        return;
    }

    let center = match world.get::<&Position>(camp) {
        Ok(p) => *p,
        Err(_) => return,
    };
    let position = spawn_policy::spawn_point(
        &spawner.spawn_points,
        &mut spawner.next_spawn_point,
        center,
        spawner.spawn_radius,
        rng,
    );

    let entry = &mut spawner.roster[idx];
    let unit = entry.unit.clone();
    let minion =
        world_setup::spawn_minion(world, &unit, Team::Enemy, spawner.level, position, Some(camp));
    entry.live += 1;
    entry.cooldown_secs = unit.attack_speed * SPAWN_COOLDOWN_FACTOR;
    spawner.live.push((minion, idx));

    debug!(?camp, unit = %unit.name, "camp spawned unit");
    events.push(SimEvent::Spawned {
        entity: entity_id(minion),
        unit: unit.name.clone(),
        team: Team::Enemy,
        position,
    });
}

fn store(world: &mut World, camp: Entity, spawner: Spawner) {
    if let Ok(mut s) = world.get::<&mut Spawner>(camp) {
        *s = spawner;
    }
}
