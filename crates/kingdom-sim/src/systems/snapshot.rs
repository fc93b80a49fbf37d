//! Snapshot system: queries the ECS world and builds a GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use kingdom_ai::combat::is_stunned;
use kingdom_ai::economy;
use kingdom_core::components::*;
use kingdom_core::enums::*;
use kingdom_core::events::SimEvent;
use kingdom_core::state::*;
use kingdom_core::types::{Position, SimTime};
use kingdom_campaign::PlayerProfile;

use crate::components::{Combatant, Projectile, Spawner};
use crate::context::{entity_id, SimContext};
use crate::damage::entity_kind;
use crate::deck::Deck;
use crate::defense::DefenseCycle;

/// Engine state the snapshot reads besides the world.
pub struct SnapshotInput<'a> {
    pub time: &'a SimTime,
    pub phase: GamePhase,
    pub ctx: &'a SimContext,
    pub deck: &'a Deck,
    pub profile: &'a PlayerProfile,
    pub defense: &'a DefenseCycle,
}

pub fn build_snapshot(
    world: &World,
    input: &SnapshotInput<'_>,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    let hub = build_hub(world, input);
    let deck = build_deck(input, hub.mana);
    GameStateSnapshot {
        time: *input.time,
        phase: input.phase,
        mode: input.ctx.mode,
        entities: build_entities(world, input.ctx),
        hub,
        deck,
        camps: build_camps(world),
        defense: DefenseView {
            active: input.ctx.enemy_camp.is_some(),
            cooldown_remaining_secs: input.defense.cooldown_remaining_secs,
        },
        events,
    }
}

fn ratio(health: &Health) -> f64 {
    if health.max <= 0.0 {
        0.0
    } else {
        health.current / health.max
    }
}

fn build_entities(world: &World, ctx: &SimContext) -> Vec<EntityView> {
    let mut views: Vec<EntityView> = world
        .query::<(&Position, &Team, &Health, Option<&Facing>, Option<&Stun>, Option<&Combatant>)>()
        .iter()
        .map(|(e, (pos, team, health, facing, stun, combatant))| EntityView {
            id: entity_id(e),
            kind: entity_kind(world, e),
            team: *team,
            position: *pos,
            facing_left: facing.is_some_and(|f| f.left),
            health_ratio: ratio(health),
            stunned: stun.is_some_and(|s| is_stunned(s.until_secs, ctx.now_secs)),
            unit: combatant.and_then(|c| c.unit.as_ref().map(|u| u.name.clone())),
        })
        .collect();

    views.extend(
        world
            .query::<(&Position, &Projectile)>()
            .iter()
            .map(|(e, (pos, p))| EntityView {
                id: entity_id(e),
                kind: EntityKind::Projectile,
                team: p.team,
                position: *pos,
                facing_left: false,
                health_ratio: 1.0,
                stunned: false,
                unit: None,
            }),
    );
    views.sort_by_key(|v| v.id);
    views
}

fn build_hub(world: &World, input: &SnapshotInput<'_>) -> HubView {
    let mut view = HubView {
        id: None,
        health_ratio: 0.0,
        mana: 0.0,
        mana_ratio: 0.0,
        gold: input.profile.gold,
        level: input.profile.level,
    };
    let Some(hub) = input.ctx.player_hub else {
        return view;
    };
    view.id = Some(entity_id(hub));
    if let Ok(health) = world.get::<&Health>(hub) {
        view.health_ratio = ratio(&health);
    }
    if let Ok(pool) = world.get::<&ManaPool>(hub) {
        view.mana = pool.current;
        view.mana_ratio = economy::fraction(&pool);
    }
    view
}

fn build_deck(input: &SnapshotInput<'_>, hub_mana: f64) -> Vec<CardView> {
    let in_defense = input.ctx.mode == GameMode::Defense;
    input
        .deck
        .cards()
        .iter()
        .enumerate()
        .map(|(slot, card)| CardView {
            slot,
            unit: card.unit.name.clone(),
            mana_cost: card.unit.mana_cost,
            cooldown_remaining_secs: card.cooldown_remaining_secs,
            playable: in_defense
                && !card.is_cooling_down()
                && hub_mana.floor() >= card.unit.mana_cost as f64,
        })
        .collect()
}

fn build_camps(world: &World) -> Vec<CampView> {
    let mut camps: Vec<CampView> = world
        .query::<(&EnemyCamp, &Spawner, &Health, &ManaPool)>()
        .iter()
        .map(|(e, (camp, spawner, health, pool))| CampView {
            id: entity_id(e),
            kingdom: camp.kingdom,
            health_ratio: ratio(health),
            mana_ratio: economy::fraction(pool),
            live_units: spawner.live.len(),
            active: spawner.active,
        })
        .collect();
    camps.sort_by_key(|c| c.id);
    camps
}
