//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Timers at or below this many seconds count as expired.
/// Absorbs the float drift of summing `DT` over many ticks.
pub const TIMER_EPSILON: f64 = 1e-9;

// --- Targeting ---

/// Interval between target searches for an entity without a target (seconds).
pub const RETARGET_INTERVAL_SECS: f64 = 1.0;

// --- Combat ---

/// Fraction of the attacker's damage applied by Heal and AreaDamage abilities.
pub const ABILITY_DAMAGE_FRACTION: f64 = 0.5;

/// AreaDamage splash radius as a fraction of the attacker's attack range.
pub const AREA_DAMAGE_RADIUS_FRACTION: f64 = 0.5;

/// Duration of the Stun unit ability (seconds).
pub const STUN_DURATION_SECS: f64 = 1.0;

/// Distance at which a projectile counts as having reached its target.
pub const PROJECTILE_HIT_RADIUS: f64 = 0.1;

/// Per-level multiplier step for unit health and damage (10% per level).
pub const LEVEL_STAT_STEP: f64 = 0.1;

// --- Spawn economy ---

/// Interval between production attempts of an active camp (seconds).
pub const PRODUCTION_INTERVAL_SECS: f64 = 1.0;

/// Spawn cooldown of a roster entry as a multiple of its unit's attack speed.
pub const SPAWN_COOLDOWN_FACTOR: f64 = 2.0;

/// How long a camp waits for the player hub before disabling itself (seconds).
pub const STARTUP_TIMEOUT_SECS: f64 = 5.0;

// --- Defense cycle ---

/// Default delay before the next enemy camp appears in Defense mode (seconds).
pub const DEFENSE_COOLDOWN_SECS: f64 = 10.0;

/// Default camp placement relative to the player hub.
pub const CAMP_SPAWN_OFFSET: (f64, f64) = (20.0, 0.0);

/// Default gold granted when a camp is destroyed.
pub const CAMP_REWARD_GOLD: u32 = 100;

// --- Cards ---

/// Default cooldown of a card after it is played (seconds).
pub const CARD_COOLDOWN_SECS: f64 = 3.0;

// --- Wizard tower ---

/// Default mana cost of one wizard tower spell.
pub const WIZARD_SPELL_MANA_COST: f64 = 25.0;

/// Default heal amount of the wizard tower Heal spell.
pub const WIZARD_HEAL_AMOUNT: f64 = 20.0;

/// Default stun duration of the wizard tower Lightning spell (seconds).
pub const WIZARD_STUN_DURATION_SECS: f64 = 2.0;

// --- Player hub defaults ---

pub const HUB_BASE_MAX_HEALTH: f64 = 100.0;
pub const HUB_HEALTH_PER_LEVEL: f64 = 20.0;
pub const HUB_BASE_MAX_MANA: f64 = 100.0;
pub const HUB_MANA_PER_LEVEL: f64 = 10.0;
pub const HUB_BASE_MANA_REGEN: f64 = 1.0;
pub const HUB_MANA_REGEN_PER_LEVEL: f64 = 0.1;
pub const HUB_BASE_DEFENSE: f64 = 10.0;
pub const HUB_DEFENSE_PER_LEVEL: f64 = 2.0;
pub const BASE_DECK_SIZE: u32 = 4;
/// Levels per additional deck slot.
pub const LEVELS_PER_DECK_SLOT: u32 = 5;
