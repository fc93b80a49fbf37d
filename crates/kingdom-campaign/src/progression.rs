//! Player hub stats as a function of level.

use serde::{Deserialize, Serialize};

use kingdom_core::constants::*;

/// Derived hub stats for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HubStats {
    pub max_health: f64,
    pub max_mana: f64,
    pub mana_regen: f64,
    pub defense: f64,
    pub max_deck_size: u32,
}

impl HubStats {
    /// Stats at `level` (floored at 1).
    pub fn for_level(level: u32) -> Self {
        let steps = level.max(1) - 1;
        let l = steps as f64;
        Self {
            max_health: HUB_BASE_MAX_HEALTH + l * HUB_HEALTH_PER_LEVEL,
            max_mana: HUB_BASE_MAX_MANA + l * HUB_MANA_PER_LEVEL,
            mana_regen: HUB_BASE_MANA_REGEN + l * HUB_MANA_REGEN_PER_LEVEL,
            defense: HUB_BASE_DEFENSE + l * HUB_DEFENSE_PER_LEVEL,
            max_deck_size: BASE_DECK_SIZE + steps / LEVELS_PER_DECK_SLOT,
        }
    }
}
