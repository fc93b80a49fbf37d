//! The persistent player record.

use serde::{Deserialize, Serialize};

use kingdom_core::enums::Kingdom;
use kingdom_core::units::UnitCatalog;

use crate::progression::HubStats;

/// Player profile, keyed by name in a `ProfileBook`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    /// True until the first session is played.
    #[serde(default = "default_true")]
    pub is_new: bool,
    #[serde(default)]
    pub kingdom: Kingdom,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default = "default_max_health")]
    pub max_health: f64,
    #[serde(default = "default_max_mana")]
    pub max_mana: f64,
    #[serde(default = "default_mana_regen")]
    pub mana_regen: f64,
    #[serde(default = "default_defense")]
    pub defense: f64,
    #[serde(default = "default_max_deck_size")]
    pub max_deck_size: u32,
    #[serde(default)]
    pub gold: u32,
    /// Unit names the player may put in a deck.
    #[serde(default)]
    pub unlocked_units: Vec<String>,
    /// Saved deck, in slot order.
    #[serde(default)]
    pub deck: Vec<String>,
    #[serde(default)]
    pub play_time_secs: f64,
}

fn default_true() -> bool {
    true
}
fn default_level() -> u32 {
    1
}
fn default_max_health() -> f64 {
    100.0
}
fn default_max_mana() -> f64 {
    50.0
}
fn default_mana_regen() -> f64 {
    1.0
}
fn default_defense() -> f64 {
    10.0
}
fn default_max_deck_size() -> u32 {
    4
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_new: true,
            kingdom: Kingdom::default(),
            level: default_level(),
            max_health: default_max_health(),
            max_mana: default_max_mana(),
            mana_regen: default_mana_regen(),
            defense: default_defense(),
            max_deck_size: default_max_deck_size(),
            gold: 0,
            unlocked_units: Vec::new(),
            deck: Vec::new(),
            play_time_secs: 0.0,
        }
    }

    /// New profile for `kingdom` with every unit of that kingdom unlocked.
    pub fn starter(name: impl Into<String>, kingdom: Kingdom, catalog: &UnitCatalog) -> Self {
        let mut profile = Self::new(name);
        profile.kingdom = kingdom;
        profile.unlocked_units = catalog
            .for_kingdom(kingdom)
            .iter()
            .map(|u| u.name.clone())
            .collect();
        profile
    }

    /// Advance one level and recompute hub stats. Returns the new stats.
    pub fn level_up(&mut self) -> HubStats {
        self.level = self.level.max(1).saturating_add(1);
        let stats = HubStats::for_level(self.level);
        self.apply_stats(&stats);
        stats
    }

    pub fn apply_stats(&mut self, stats: &HubStats) {
        self.max_health = stats.max_health;
        self.max_mana = stats.max_mana;
        self.mana_regen = stats.mana_regen;
        self.defense = stats.defense;
        self.max_deck_size = stats.max_deck_size;
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub fn unlock(&mut self, unit: &str) {
        if !self.unlocked_units.iter().any(|u| u == unit) {
            self.unlocked_units.push(unit.to_string());
        }
    }

    pub fn is_unlocked(&self, unit: &str) -> bool {
        self.unlocked_units.iter().any(|u| u == unit)
    }
}
