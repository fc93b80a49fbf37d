//! Entity spawn factories.
//!
//! Creates the player hub, towers, camps, units and projectiles with
//! their component bundles. Capability flags are resolved here, once.

use std::sync::Arc;

use hecs::{Entity, World};
use tracing::warn;

use kingdom_core::components::*;
use kingdom_core::constants::PRODUCTION_INTERVAL_SECS;
use kingdom_core::enums::*;
use kingdom_core::error::ConfigError;
use kingdom_core::types::{Position, Velocity};
use kingdom_core::units::{UnitCatalog, UnitSpec};
use kingdom_campaign::PlayerProfile;

use crate::components::*;
use crate::scenario::{CampTemplate, ScenarioConfig, TowerKind, TowerTemplate};

/// Spawn the player hub and its towers. Returns the hub.
pub fn setup_base(world: &mut World, scenario: &ScenarioConfig, profile: &PlayerProfile) -> Entity {
    let hub = spawn_player_hub(world, scenario.hub_position, profile);
    for template in &scenario.towers {
        spawn_tower(world, template, hub);
    }
    hub
}

/// The player hub takes its stats from the profile.
pub fn spawn_player_hub(world: &mut World, position: Position, profile: &PlayerProfile) -> Entity {
    world.spawn((
        PlayerHub,
        position,
        Team::Player,
        Health {
            current: profile.max_health.max(1.0),
            max: profile.max_health.max(1.0),
            defense: profile.defense,
            dead: false,
        },
        ManaPool {
            current: profile.max_mana,
            capacity: profile.max_mana,
            regen_rate: profile.mana_regen,
        },
        Capabilities {
            building: true,
            flying: false,
            stunnable: false,
        },
    ))
}

pub fn spawn_tower(world: &mut World, template: &TowerTemplate, hub: Entity) -> Entity {
    let mode = match template.kind {
        TowerKind::Defense => AttackMode::Projectile {
            speed: template.projectile_speed,
        },
        TowerKind::Wizard => AttackMode::Spell,
    };
    let combatant = Combatant {
        unit: None,
        damage: template.damage,
        attack_speed: template.attack_speed.max(0.1),
        attack_range: template.attack_range,
        detection_range: template.attack_range,
        move_speed: 0.0,
        mode,
        ability: SpecialAbility::None,
        ability_range: None,
        can_target_air: true,
        can_target_buildings: true,
    };
    let entity = world.spawn((
        Tower,
        template.position,
        Team::Player,
        Health {
            current: template.max_health,
            max: template.max_health,
            defense: template.defense,
            dead: false,
        },
        Capabilities {
            building: true,
            flying: false,
            stunnable: false,
        },
        combatant,
        Targeting::default(),
        AttackState::default(),
        Facing::default(),
        HomeBase(Some(hub)),
    ));
    if template.kind == TowerKind::Wizard {
        let _ = world.insert_one(
            entity,
            Spellcaster {
                spell: template.spell,
                mana_cost: template.spell_mana_cost,
                heal_amount: template.heal_amount,
                stun_duration_secs: template.stun_duration_secs,
            },
        );
    }
    entity
}

/// Spawn one unit of `spec` at `level` (health and damage scaled).
pub fn spawn_minion(
    world: &mut World,
    spec: &Arc<UnitSpec>,
    team: Team,
    level: u32,
    position: Position,
    home: Option<Entity>,
) -> Entity {
    let multiplier = UnitSpec::level_multiplier(level);
    let max_health = spec.max_health * multiplier;
    let mode = if spec.is_ranged {
        AttackMode::Projectile {
            speed: spec.projectile_speed,
        }
    } else {
        AttackMode::Melee
    };
    world.spawn((
        Minion,
        position,
        Velocity::zero(),
        team,
        Health {
            current: max_health,
            max: max_health,
            defense: 0.0,
            dead: false,
        },
        Capabilities {
            building: false,
            flying: spec.is_flying,
            stunnable: true,
        },
        Combatant {
            unit: Some(spec.clone()),
            damage: spec.damage * multiplier,
            attack_speed: spec.attack_speed,
            attack_range: spec.attack_range,
            detection_range: spec.detection_range,
            move_speed: spec.move_speed,
            mode,
            ability: spec.special_ability,
            ability_range: spec.ability_range,
            can_target_air: spec.can_target_air,
            can_target_buildings: spec.can_target_buildings,
        },
        Targeting::default(),
        AttackState::default(),
        Stun::default(),
        Facing::default(),
        HomeBase(home),
    ))
}

/// Spawn an inactive enemy camp at `position`.
///
/// Roster entries naming unknown units or units of another kingdom are
/// dropped and reported.
pub fn spawn_camp(
    world: &mut World,
    template: &CampTemplate,
    catalog: &UnitCatalog,
    position: Position,
) -> (Entity, Vec<ConfigError>) {
    let (roster, rejected) = build_roster(template, catalog);
    for err in &rejected {
        warn!(kingdom = ?template.kingdom, %err, "roster entry dropped");
    }
    let spawner = Spawner {
        roster,
        live: Vec::new(),
        spawn_points: template
            .spawn_points
            .iter()
            .map(|o| position.offset(o.x, o.y))
            .collect(),
        next_spawn_point: 0,
        spawn_radius: template.spawn_radius,
        max_live: template.max_live,
        production_timer_secs: PRODUCTION_INTERVAL_SECS,
        level: template.level,
        active: false,
        readiness: Readiness::Waiting { waited_secs: 0.0 },
        destroyed: false,
    };
    let entity = world.spawn((
        EnemyCamp {
            kingdom: template.kingdom,
        },
        position,
        Team::Enemy,
        Health {
            current: template.max_health,
            max: template.max_health,
            defense: template.defense,
            dead: false,
        },
        ManaPool {
            current: template.mana_capacity,
            capacity: template.mana_capacity,
            regen_rate: template.mana_regen,
        },
        Capabilities {
            building: true,
            flying: false,
            stunnable: false,
        },
        spawner,
    ));
    (entity, rejected)
}

fn build_roster(
    template: &CampTemplate,
    catalog: &UnitCatalog,
) -> (Vec<RosterEntry>, Vec<ConfigError>) {
    let mut roster = Vec::new();
    let mut rejected = Vec::new();
    for entry in &template.roster {
        let Some(unit) = catalog.get(&entry.unit) else {
            rejected.push(ConfigError::UnknownUnit(entry.unit.clone()));
            continue;
        };
        if unit.kingdom != template.kingdom {
            rejected.push(ConfigError::KingdomMismatch {
                unit: unit.name.clone(),
                unit_kingdom: unit.kingdom,
                expected: template.kingdom,
            });
            continue;
        }
        roster.push(RosterEntry {
            unit: unit.clone(),
            cap: entry.max_count,
            cooldown_secs: 0.0,
            live: 0,
        });
    }
    (roster, rejected)
}

pub fn spawn_projectile(
    world: &mut World,
    position: Position,
    projectile: Projectile,
) -> Entity {
    world.spawn((position, projectile))
}
