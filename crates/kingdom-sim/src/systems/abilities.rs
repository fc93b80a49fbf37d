//! Post-attack special abilities and wizard tower spells.

use hecs::{Entity, World};
use tracing::{debug, warn};

use kingdom_ai::economy;
use kingdom_core::components::{Capabilities, Health, ManaPool, Spellcaster, Stun};
use kingdom_core::constants::*;
use kingdom_core::enums::{SpecialAbility, SpellKind, Team};
use kingdom_core::error::SimError;
use kingdom_core::events::SimEvent;
use kingdom_core::types::Position;

use crate::components::Combatant;
use crate::context::{entity_id, SimContext};
use crate::damage;

/// The attacker side of an executed attack.
#[derive(Debug, Clone, Copy)]
pub struct Attacker {
    pub entity: Entity,
    pub position: Position,
    pub team: Team,
    pub home: Option<Entity>,
}

/// Run the attacker's ability once, after a successful attack on `target`.
pub fn dispatch(
    world: &mut World,
    ctx: &SimContext,
    attacker: &Attacker,
    combatant: &Combatant,
    target: Entity,
    events: &mut Vec<SimEvent>,
) {
    match combatant.ability {
        SpecialAbility::None | SpecialAbility::Boost => {}
        SpecialAbility::Heal => {
            let radius = combatant.ability_range.unwrap_or(combatant.attack_range);
            let amount = combatant.damage * ABILITY_DAMAGE_FRACTION;
            let skip = if ctx.heal_includes_caster {
                None
            } else {
                Some(attacker.entity)
            };
            heal_area(world, attacker.position, attacker.team, radius, amount, skip, events);
        }
        SpecialAbility::AreaDamage => {
            let Ok(center) = world.get::<&Position>(target).map(|p| *p) else {
                return;
            };
            let radius = combatant
                .ability_range
                .unwrap_or(combatant.attack_range * AREA_DAMAGE_RADIUS_FRACTION);
            let amount = combatant.damage * ABILITY_DAMAGE_FRACTION;
            let victims: Vec<Entity> = within(world, center, radius)
                .into_iter()
                .filter(|(e, _)| *e != target && *e != attacker.entity && Some(*e) != attacker.home)
                .map(|(e, _)| e)
                .collect();
            for victim in victims {
                damage::apply_damage(world, victim, amount, events);
            }
        }
        SpecialAbility::Stun => {
            apply_stun(world, ctx, target, STUN_DURATION_SECS, events);
        }
    }
}

/// Cast the wizard tower's current spell at `target`, paid from the hub.
/// Returns whether the spell was cast.
pub fn cast_spell(
    world: &mut World,
    ctx: &SimContext,
    tower: &Attacker,
    combatant: &Combatant,
    target: Entity,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Ok(caster) = world.get::<&Spellcaster>(tower.entity).map(|s| *s) else {
        return false;
    };
    let Some(hub) = ctx.player_hub else {
        warn!(error = %SimError::MissingReference("player hub"), "wizard tower idle");
        return false;
    };
    let paid = match world.get::<&mut ManaPool>(hub) {
        Ok(mut pool) => economy::try_spend(&mut pool, caster.mana_cost),
        Err(_) => false,
    };
    if !paid {
        debug!(tower = ?tower.entity, spell = ?caster.spell, "not enough mana to cast");
        return false;
    }

    match caster.spell {
        SpellKind::Fire => {
            damage::apply_damage(world, target, combatant.damage, events);
        }
        SpellKind::Heal => {
            heal_area(
                world,
                tower.position,
                tower.team,
                combatant.attack_range,
                caster.heal_amount,
                None,
                events,
            );
        }
        SpellKind::Boost => {}
        SpellKind::Lightning => {
            apply_stun(world, ctx, target, caster.stun_duration_secs, events);
        }
    }
    true
}

/// Stun `target` until `now + duration` if it can be stunned.
/// An existing longer stun is kept.
pub fn apply_stun(
    world: &mut World,
    ctx: &SimContext,
    target: Entity,
    duration_secs: f64,
    events: &mut Vec<SimEvent>,
) -> bool {
    let stunnable = world
        .get::<&Capabilities>(target)
        .map(|c| c.stunnable)
        .unwrap_or(false);
    let alive = world
        .get::<&Health>(target)
        .map(|h| !h.dead)
        .unwrap_or(false);
    if !stunnable || !alive {
        return false;
    }
    let Ok(mut stun) = world.get::<&mut Stun>(target) else {
        return false;
    };
    let until = ctx.now_secs + duration_secs;
    let until = stun.until_secs.map_or(until, |t| t.max(until));
    stun.until_secs = Some(until);
    drop(stun);
    events.push(SimEvent::Stunned {
        target: entity_id(target),
        until_secs: until,
    });
    true
}

/// Heal every live `team` member within `radius` of `center`.
fn heal_area(
    world: &mut World,
    center: Position,
    team: Team,
    radius: f64,
    amount: f64,
    skip: Option<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let allies: Vec<Entity> = within(world, center, radius)
        .into_iter()
        .filter(|(e, t)| *t == team && Some(*e) != skip)
        .map(|(e, _)| e)
        .collect();
    for ally in allies {
        damage::apply_heal(world, ally, amount, events);
    }
}

/// Live damageable entities within `radius` of `center`, with their team.
fn within(world: &World, center: Position, radius: f64) -> Vec<(Entity, Team)> {
    let radius_sq = radius * radius;
    world
        .query::<(&Position, &Team, &Health)>()
        .iter()
        .filter(|(_, (pos, _, health))| !health.dead && pos.distance_sq_to(&center) <= radius_sq)
        .map(|(e, (_, team, _))| (e, *team))
        .collect()
}
