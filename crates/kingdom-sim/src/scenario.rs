//! Scenario definitions: hub placement, towers, camp templates and the
//! defense-cycle tuning. Loadable from JSON; every field has a default.

use serde::{Deserialize, Serialize};

use kingdom_core::constants::*;
use kingdom_core::enums::{Kingdom, SpellKind};
use kingdom_core::error::ConfigError;
use kingdom_core::types::Position;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub hub_position: Position,
    pub towers: Vec<TowerTemplate>,
    pub camps: Vec<CampTemplate>,
    pub defense_cooldown_secs: f64,
    /// Camp placement relative to the player hub.
    pub camp_offset: Position,
    pub camp_reward_gold: u32,
    pub card_cooldown_secs: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            hub_position: Position::default(),
            towers: vec![
                TowerTemplate::defense(Position::new(4.0, 3.0)),
                TowerTemplate::defense(Position::new(4.0, -3.0)),
                TowerTemplate::wizard(Position::new(6.0, 0.0)),
            ],
            camps: vec![
                CampTemplate::new(
                    Kingdom::GreatZoey,
                    &[("Squire", 3), ("Longbowman", 2), ("Cleric", 1)],
                ),
                CampTemplate::new(
                    Kingdom::SvenImmortal,
                    &[("Berserker", 3), ("Warhammer", 1), ("Raven Rider", 2)],
                ),
                CampTemplate::new(
                    Kingdom::AzarakhshMagus,
                    &[("Apprentice", 3), ("Storm Mage", 1), ("Herald", 2)],
                ),
            ],
            defense_cooldown_secs: DEFENSE_COOLDOWN_SECS,
            camp_offset: Position::new(CAMP_SPAWN_OFFSET.0, CAMP_SPAWN_OFFSET.1),
            camp_reward_gold: CAMP_REWARD_GOLD,
            card_cooldown_secs: CARD_COOLDOWN_SECS,
        }
    }
}

impl ScenarioConfig {
    /// Parse a scenario; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn camp_for(&self, kingdom: Kingdom) -> Option<&CampTemplate> {
        self.camps.iter().find(|c| c.kingdom == kingdom)
    }

    /// Kingdoms with a camp template, excluding `player`, in template order.
    pub fn opponent_kingdoms(&self, player: Kingdom) -> Vec<Kingdom> {
        self.camps
            .iter()
            .map(|c| c.kingdom)
            .filter(|k| *k != player)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TowerKind {
    /// Fires homing projectiles.
    Defense,
    /// Casts spells paid from the player hub's mana.
    Wizard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerTemplate {
    pub kind: TowerKind,
    pub position: Position,
    #[serde(default = "default_building_health")]
    pub max_health: f64,
    #[serde(default = "default_building_defense")]
    pub defense: f64,
    #[serde(default = "default_tower_range")]
    pub attack_range: f64,
    #[serde(default = "default_one")]
    pub attack_speed: f64,
    #[serde(default = "default_tower_damage")]
    pub damage: f64,
    #[serde(default = "default_projectile_speed")]
    pub projectile_speed: f64,
    #[serde(default)]
    pub spell: SpellKind,
    #[serde(default = "default_spell_cost")]
    pub spell_mana_cost: f64,
    #[serde(default = "default_heal_amount")]
    pub heal_amount: f64,
    #[serde(default = "default_stun_duration")]
    pub stun_duration_secs: f64,
}

impl TowerTemplate {
    pub fn defense(position: Position) -> Self {
        Self {
            kind: TowerKind::Defense,
            position,
            max_health: default_building_health(),
            defense: default_building_defense(),
            attack_range: default_tower_range(),
            attack_speed: default_one(),
            damage: default_tower_damage(),
            projectile_speed: default_projectile_speed(),
            spell: SpellKind::default(),
            spell_mana_cost: default_spell_cost(),
            heal_amount: default_heal_amount(),
            stun_duration_secs: default_stun_duration(),
        }
    }

    pub fn wizard(position: Position) -> Self {
        Self {
            kind: TowerKind::Wizard,
            ..Self::defense(position)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterTemplate {
    pub unit: String,
    #[serde(default = "default_roster_cap")]
    pub max_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampTemplate {
    pub kingdom: Kingdom,
    pub roster: Vec<RosterTemplate>,
    #[serde(default = "default_building_health")]
    pub max_health: f64,
    #[serde(default = "default_building_defense")]
    pub defense: f64,
    #[serde(default = "default_mana_capacity")]
    pub mana_capacity: f64,
    #[serde(default = "default_one")]
    pub mana_regen: f64,
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f64,
    /// Offsets from the camp position. Empty = random within `spawn_radius`.
    #[serde(default)]
    pub spawn_points: Vec<Position>,
    #[serde(default = "default_max_live")]
    pub max_live: usize,
    #[serde(default = "default_level")]
    pub level: u32,
}

impl CampTemplate {
    pub fn new(kingdom: Kingdom, roster: &[(&str, usize)]) -> Self {
        Self {
            kingdom,
            roster: roster
                .iter()
                .map(|(unit, max_count)| RosterTemplate {
                    unit: unit.to_string(),
                    max_count: *max_count,
                })
                .collect(),
            max_health: default_building_health(),
            defense: default_building_defense(),
            mana_capacity: default_mana_capacity(),
            mana_regen: default_one(),
            spawn_radius: default_spawn_radius(),
            spawn_points: Vec::new(),
            max_live: default_max_live(),
            level: default_level(),
        }
    }
}

fn default_building_health() -> f64 {
    100.0
}
fn default_building_defense() -> f64 {
    HUB_BASE_DEFENSE
}
fn default_tower_range() -> f64 {
    5.0
}
fn default_one() -> f64 {
    1.0
}
fn default_tower_damage() -> f64 {
    10.0
}
fn default_projectile_speed() -> f64 {
    10.0
}
fn default_spell_cost() -> f64 {
    WIZARD_SPELL_MANA_COST
}
fn default_heal_amount() -> f64 {
    WIZARD_HEAL_AMOUNT
}
fn default_stun_duration() -> f64 {
    WIZARD_STUN_DURATION_SECS
}
fn default_roster_cap() -> usize {
    2
}
fn default_mana_capacity() -> f64 {
    100.0
}
fn default_spawn_radius() -> f64 {
    3.0
}
fn default_max_live() -> usize {
    10
}
fn default_level() -> u32 {
    1
}
