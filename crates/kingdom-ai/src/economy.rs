//! Mana pool arithmetic. Every operation keeps `0 <= current <= capacity`.

use kingdom_core::components::ManaPool;

/// Linear regeneration for one tick, clamped to capacity.
pub fn regenerate(pool: &mut ManaPool, dt: f64) {
    pool.current = (pool.current + pool.regen_rate * dt).clamp(0.0, pool.capacity);
}

/// Spend `amount` if available. Returns whether the spend happened.
pub fn try_spend(pool: &mut ManaPool, amount: f64) -> bool {
    if amount < 0.0 || pool.current < amount {
        return false;
    }
    pool.current = (pool.current - amount).max(0.0);
    true
}

/// Card affordability: whole mana only.
pub fn can_afford_card(pool: &ManaPool, cost: u32) -> bool {
    pool.current.floor() >= cost as f64
}

pub fn refill(pool: &mut ManaPool) {
    pool.current = pool.capacity;
}

/// Resize the pool, keeping `current` inside the new bounds.
pub fn set_capacity(pool: &mut ManaPool, capacity: f64) {
    pool.capacity = capacity.max(0.0);
    pool.current = pool.current.clamp(0.0, pool.capacity);
}

/// `current / capacity`, 0 for an empty pool.
pub fn fraction(pool: &ManaPool) -> f64 {
    if pool.capacity <= 0.0 {
        0.0
    } else {
        pool.current / pool.capacity
    }
}
