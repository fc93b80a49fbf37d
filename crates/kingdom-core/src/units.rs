//! Unit templates and the catalog that shares them.
//!
//! A `UnitSpec` is immutable once loaded; every spawned instance holds an
//! `Arc` to the same template.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::LEVEL_STAT_STEP;
use crate::enums::{Kingdom, SpecialAbility};
use crate::error::ConfigError;

/// Static description of a unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub kingdom: Kingdom,
    #[serde(default = "default_mana_cost")]
    pub mana_cost: u32,
    #[serde(default = "default_max_health")]
    pub max_health: f64,
    #[serde(default = "default_damage")]
    pub damage: f64,
    /// Attacks per second. Cooldown after an attack is `1 / attack_speed`.
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f64,
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
    #[serde(default = "default_attack_range")]
    pub attack_range: f64,
    /// Radius of the target search.
    #[serde(default = "default_detection_range")]
    pub detection_range: f64,
    #[serde(default)]
    pub is_ranged: bool,
    #[serde(default = "default_projectile_speed")]
    pub projectile_speed: f64,
    #[serde(default)]
    pub can_target_air: bool,
    #[serde(default = "default_true")]
    pub can_target_buildings: bool,
    #[serde(default)]
    pub is_flying: bool,
    #[serde(default)]
    pub special_ability: SpecialAbility,
    /// Overrides the ability radius. When absent, Heal uses the attack range
    /// and AreaDamage uses half of it.
    #[serde(default)]
    pub ability_range: Option<f64>,
}

fn default_mana_cost() -> u32 {
    10
}
fn default_max_health() -> f64 {
    100.0
}
fn default_damage() -> f64 {
    10.0
}
fn default_attack_speed() -> f64 {
    1.0
}
fn default_move_speed() -> f64 {
    3.0
}
fn default_attack_range() -> f64 {
    1.0
}
fn default_detection_range() -> f64 {
    10.0
}
fn default_projectile_speed() -> f64 {
    10.0
}
fn default_true() -> bool {
    true
}

impl UnitSpec {
    /// A melee unit with every stat at its default.
    pub fn new(name: impl Into<String>, kingdom: Kingdom) -> Self {
        Self {
            name: name.into(),
            kingdom,
            mana_cost: default_mana_cost(),
            max_health: default_max_health(),
            damage: default_damage(),
            attack_speed: default_attack_speed(),
            move_speed: default_move_speed(),
            attack_range: default_attack_range(),
            detection_range: default_detection_range(),
            is_ranged: false,
            projectile_speed: default_projectile_speed(),
            can_target_air: false,
            can_target_buildings: true,
            is_flying: false,
            special_ability: SpecialAbility::None,
            ability_range: None,
        }
    }

    /// Stat multiplier for a unit spawned at `level` (floored at 1).
    pub fn level_multiplier(level: u32) -> f64 {
        1.0 + (level.max(1) - 1) as f64 * LEVEL_STAT_STEP
    }

    /// Reject templates that cannot be simulated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let stats = [
            ("max_health", self.max_health),
            ("damage", self.damage),
            ("attack_speed", self.attack_speed),
            ("move_speed", self.move_speed),
            ("attack_range", self.attack_range),
            ("detection_range", self.detection_range),
            ("projectile_speed", self.projectile_speed),
        ];
        for (field, value) in stats {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    unit: self.name.clone(),
                    field,
                });
            }
        }
        if let Some(r) = self.ability_range {
            if !r.is_finite() {
                return Err(ConfigError::NonFinite {
                    unit: self.name.clone(),
                    field: "ability_range",
                });
            }
        }
        if self.is_ranged && self.projectile_speed <= 0.0 {
            return Err(ConfigError::MissingProjectileSpeed {
                unit: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Clamp stats into their usable ranges.
    pub fn sanitize(&mut self) {
        self.max_health = self.max_health.max(1.0);
        self.damage = self.damage.max(0.0);
        self.attack_speed = self.attack_speed.max(0.1);
        self.move_speed = self.move_speed.max(0.1);
        self.attack_range = self.attack_range.max(0.1);
        self.detection_range = self.detection_range.max(0.0);
        if let Some(r) = self.ability_range.as_mut() {
            *r = r.max(0.0);
        }
    }
}

/// Name-indexed set of shared unit templates.
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    units: BTreeMap<String, Arc<UnitSpec>>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, sanitize and insert a template.
    pub fn insert(&mut self, mut spec: UnitSpec) -> Result<Arc<UnitSpec>, ConfigError> {
        spec.validate()?;
        spec.sanitize();
        if self.units.contains_key(&spec.name) {
            return Err(ConfigError::DuplicateUnit(spec.name));
        }
        let spec = Arc::new(spec);
        self.units.insert(spec.name.clone(), spec.clone());
        Ok(spec)
    }

    /// Build a catalog from a list of templates. Bad entries are left out
    /// and returned alongside the catalog.
    pub fn from_specs(specs: impl IntoIterator<Item = UnitSpec>) -> (Self, Vec<ConfigError>) {
        let mut catalog = Self::new();
        let mut rejected = Vec::new();
        for spec in specs {
            if let Err(e) = catalog.insert(spec) {
                rejected.push(e);
            }
        }
        (catalog, rejected)
    }

    /// Parse a JSON array of templates.
    pub fn from_json(json: &str) -> Result<(Self, Vec<ConfigError>), ConfigError> {
        let specs: Vec<UnitSpec> = serde_json::from_str(json)?;
        Ok(Self::from_specs(specs))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<UnitSpec>> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<UnitSpec>> {
        self.units.values()
    }

    /// Units belonging to `kingdom`, in name order.
    pub fn for_kingdom(&self, kingdom: Kingdom) -> Vec<Arc<UnitSpec>> {
        self.units
            .values()
            .filter(|u| u.kingdom == kingdom)
            .cloned()
            .collect()
    }

    /// The stock roster: three units per kingdom.
    pub fn builtin() -> Self {
        let (catalog, _) = Self::from_specs(builtin_units());
        catalog
    }
}

fn builtin_units() -> Vec<UnitSpec> {
    use Kingdom::*;
    use SpecialAbility as A;

    let unit = |name: &str, kingdom: Kingdom, cost: u32| {
        let mut u = UnitSpec::new(name, kingdom);
        u.mana_cost = cost;
        u
    };

    let mut squire = unit("Squire", GreatZoey, 20);
    squire.max_health = 120.0;
    squire.damage = 12.0;
    squire.attack_range = 1.5;

    let mut longbow = unit("Longbowman", GreatZoey, 30);
    longbow.max_health = 70.0;
    longbow.attack_range = 5.0;
    longbow.is_ranged = true;
    longbow.can_target_air = true;

    let mut cleric = unit("Cleric", GreatZoey, 40);
    cleric.max_health = 80.0;
    cleric.damage = 8.0;
    cleric.attack_range = 3.0;
    cleric.special_ability = A::Heal;

    let mut berserker = unit("Berserker", SvenImmortal, 25);
    berserker.max_health = 140.0;
    berserker.damage = 15.0;
    berserker.attack_speed = 0.8;
    berserker.attack_range = 1.5;

    let mut hammer = unit("Warhammer", SvenImmortal, 45);
    hammer.max_health = 180.0;
    hammer.damage = 20.0;
    hammer.attack_speed = 0.5;
    hammer.move_speed = 2.0;
    hammer.attack_range = 2.0;
    hammer.special_ability = A::AreaDamage;

    let mut raven = unit("Raven Rider", SvenImmortal, 35);
    raven.max_health = 60.0;
    raven.move_speed = 4.5;
    raven.attack_range = 1.5;
    raven.is_flying = true;
    raven.can_target_air = true;
    raven.can_target_buildings = false;

    let mut apprentice = unit("Apprentice", AzarakhshMagus, 20);
    apprentice.max_health = 60.0;
    apprentice.attack_range = 4.0;
    apprentice.is_ranged = true;
    apprentice.projectile_speed = 8.0;
    apprentice.can_target_air = true;

    let mut storm = unit("Storm Mage", AzarakhshMagus, 50);
    storm.max_health = 70.0;
    storm.damage = 14.0;
    storm.attack_speed = 0.7;
    storm.attack_range = 4.0;
    storm.is_ranged = true;
    storm.projectile_speed = 12.0;
    storm.special_ability = A::Stun;

    let mut herald = unit("Herald", AzarakhshMagus, 30);
    herald.max_health = 90.0;
    herald.attack_range = 2.0;
    herald.special_ability = A::Boost;

    vec![
        squire, longbow, cleric, berserker, hammer, raven, apprentice, storm, herald,
    ]
}
