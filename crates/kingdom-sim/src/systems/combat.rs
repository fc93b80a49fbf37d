//! Attack/cooldown system.
//!
//! Every combatant is stepped in turn: count its cooldown down, run the
//! attack state machine against its current target, set its velocity and
//! execute at most one attack. Entities are processed sequentially so an
//! attack sees the effects of the ones before it in the same tick.

use hecs::{Entity, World};

use kingdom_ai::combat::{evaluate, is_stunned, tick_cooldown, CombatAction, CombatContext};
use kingdom_ai::steering;
use kingdom_core::components::{AttackMode, AttackState, Health, Stun};
use kingdom_core::enums::{AttackPhase, Team};
use kingdom_core::events::SimEvent;
use kingdom_core::types::{Position, Velocity};

use crate::components::{Combatant, HomeBase, Projectile, Targeting};
use crate::context::{entity_id, live_position, SimContext};
use crate::damage;
use crate::systems::abilities::{self, Attacker};
use crate::world_setup;

/// Copied-out view of one combatant.
struct Actor {
    attacker: Attacker,
    combatant: Combatant,
    cooldown_secs: f64,
    phase: AttackPhase,
    stun_until: Option<f64>,
    dead: bool,
    target: Option<Entity>,
}

pub fn run(world: &mut World, ctx: &SimContext, events: &mut Vec<SimEvent>) {
    let actors: Vec<Entity> = world
        .query::<(&Combatant, &AttackState)>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for entity in actors {
        step(world, ctx, entity, events);
    }
}

fn read_actor(world: &World, entity: Entity) -> Option<Actor> {
    let mut query = world
        .query_one::<(
            &Position,
            &Team,
            &Health,
            &Combatant,
            &AttackState,
            &Targeting,
            Option<&Stun>,
            Option<&HomeBase>,
        )>(entity)
        .ok()?;
    let (pos, team, health, combatant, attack, targeting, stun, home) = query.get()?;
    Some(Actor {
        attacker: Attacker {
            entity,
            position: *pos,
            team: *team,
            home: home.and_then(|h| h.0),
        },
        combatant: combatant.clone(),
        cooldown_secs: attack.cooldown_secs,
        phase: attack.phase,
        stun_until: stun.and_then(|s| s.until_secs),
        dead: health.dead,
        target: targeting.target,
    })
}

fn step(world: &mut World, ctx: &SimContext, entity: Entity, events: &mut Vec<SimEvent>) {
    let Some(actor) = read_actor(world, entity) else {
        return;
    };
    if actor.dead {
        set_velocity(world, entity, Velocity::zero());
        return;
    }

    let stunned = is_stunned(actor.stun_until, ctx.now_secs);
    if !stunned && actor.stun_until.is_some() {
        if let Ok(mut stun) = world.get::<&mut Stun>(entity) {
            stun.until_secs = None;
        }
    }

    let target_pos = actor.target.and_then(|t| live_position(world, t));
    let update = evaluate(&CombatContext {
        phase: actor.phase,
        cooldown_secs: tick_cooldown(actor.cooldown_secs, ctx.dt),
        stunned,
        target_distance: target_pos.map(|p| actor.attacker.position.distance_to(&p)),
        attack_range: actor.combatant.attack_range,
        attack_speed: actor.combatant.attack_speed,
    });

    if let Ok(mut attack) = world.get::<&mut AttackState>(entity) {
        attack.cooldown_secs = update.new_cooldown_secs;
        attack.phase = update.new_phase;
    }

    let velocity = match update.action {
        CombatAction::Seek => {
            let destination = target_pos.or_else(|| {
                ctx.opposing_base(actor.attacker.team).and_then(|base| live_position(world, base))
            });
            match destination {
                Some(dest) => steering::seek(
                    actor.attacker.position,
                    dest,
                    actor.combatant.move_speed,
                    actor.combatant.attack_range,
                ),
                None => Velocity::zero(),
            }
        }
        CombatAction::Attack | CombatAction::Hold | CombatAction::Frozen => Velocity::zero(),
    };
    set_velocity(world, entity, velocity);

    if update.action == CombatAction::Attack {
        if let Some(target) = actor.target {
            attack(world, ctx, &actor, target, events);
        }
    }
}

fn attack(
    world: &mut World,
    ctx: &SimContext,
    actor: &Actor,
    target: Entity,
    events: &mut Vec<SimEvent>,
) {
    let attacker = &actor.attacker;
    let combatant = &actor.combatant;
    let announce = SimEvent::Attack {
        attacker: entity_id(attacker.entity),
        target: entity_id(target),
    };
    match combatant.mode {
        AttackMode::Melee => {
            events.push(announce);
            damage::apply_damage(world, target, combatant.damage, events);
        }
        AttackMode::Projectile { speed } => {
            events.push(announce);
            let projectile = world_setup::spawn_projectile(
                world,
                attacker.position,
                Projectile {
                    damage: combatant.damage,
                    speed,
                    target,
                    source: attacker.entity,
                    team: attacker.team,
                },
            );
            events.push(SimEvent::ProjectileFired {
                projectile: entity_id(projectile),
                source: entity_id(attacker.entity),
                target: entity_id(target),
            });
        }
        AttackMode::Spell => {
            // The cast emits its own effects; an unpaid cast is not an attack.
            if abilities::cast_spell(world, ctx, attacker, combatant, target, events) {
                events.push(announce);
            }
            return;
        }
    }
    abilities::dispatch(world, ctx, attacker, combatant, target, events);
}

fn set_velocity(world: &mut World, entity: Entity, velocity: Velocity) {
    if let Ok(mut v) = world.get::<&mut Velocity>(entity) {
        *v = velocity;
    }
}
