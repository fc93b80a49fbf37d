//! Spawner production policy.
//!
//! Filter the roster to affordable, ready, under-cap entries, sort by
//! cost (most expensive first) and pick uniformly from the top half.

use std::f64::consts::TAU;

use rand::Rng;

use kingdom_core::constants::TIMER_EPSILON;
use kingdom_core::types::Position;

/// Production state of one roster entry.
#[derive(Debug, Clone, Copy)]
pub struct RosterSlot {
    pub mana_cost: u32,
    pub cooldown_secs: f64,
    pub live: usize,
    pub cap: usize,
}

impl RosterSlot {
    pub fn is_eligible(&self, mana: f64) -> bool {
        self.cooldown_secs <= TIMER_EPSILON && mana >= self.mana_cost as f64 && self.live < self.cap
    }
}

/// Indices of eligible slots, most expensive first. Equal costs keep roster order.
pub fn ranked_candidates(slots: &[RosterSlot], mana: f64) -> Vec<usize> {
    let mut eligible: Vec<usize> = (0..slots.len())
        .filter(|&i| slots[i].is_eligible(mana))
        .collect();
    eligible.sort_by(|&a, &b| slots[b].mana_cost.cmp(&slots[a].mana_cost));
    eligible
}

/// Choose the roster index to produce, or `None` when nothing qualifies.
pub fn choose<R: Rng>(slots: &[RosterSlot], mana: f64, rng: &mut R) -> Option<usize> {
    let ranked = ranked_candidates(slots, mana);
    if ranked.is_empty() {
        return None;
    }
    let top = (ranked.len() / 2).max(1);
    Some(ranked[rng.gen_range(0..top)])
}

/// Where the next unit appears: the next configured point in round-robin
/// order, or a uniform point within `radius` of `center` when none are set.
pub fn spawn_point<R: Rng>(
    points: &[Position],
    next_index: &mut usize,
    center: Position,
    radius: f64,
    rng: &mut R,
) -> Position {
    if !points.is_empty() {
        let p = points[*next_index % points.len()];
        *next_index = (*next_index + 1) % points.len();
        return p;
    }
    let angle = rng.gen_range(0.0..TAU);
    let r = radius * rng.gen::<f64>().sqrt();
    center.offset(r * angle.cos(), r * angle.sin())
}
