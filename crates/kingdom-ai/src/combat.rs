//! Attack/cooldown state machine.
//!
//! Idle → InRange → Attacking → Idle, with Stunned overriding every
//! transition while a stun deadline is in the future.

use kingdom_core::constants::TIMER_EPSILON;
use kingdom_core::enums::AttackPhase;

/// Input to the attack FSM for one entity.
#[derive(Debug, Clone, Copy)]
pub struct CombatContext {
    pub phase: AttackPhase,
    /// Already decremented for this tick.
    pub cooldown_secs: f64,
    pub stunned: bool,
    /// Distance to the current target, if it has one.
    pub target_distance: Option<f64>,
    pub attack_range: f64,
    pub attack_speed: f64,
}

/// What the entity does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatAction {
    /// Fire at the target and run the post-attack ability.
    Attack,
    /// In range, waiting on cooldown. Zero velocity.
    Hold,
    /// Move toward the target or the fallback destination.
    Seek,
    /// Frozen until the stun expires.
    Frozen,
}

/// Output of the attack FSM.
#[derive(Debug, Clone, Copy)]
pub struct CombatUpdate {
    pub action: CombatAction,
    pub new_phase: AttackPhase,
    pub new_cooldown_secs: f64,
}

/// Count a cooldown down by `dt`, clamped at zero.
pub fn tick_cooldown(cooldown_secs: f64, dt: f64) -> f64 {
    (cooldown_secs - dt).max(0.0)
}

/// Whether a stun with `until_secs` is still active at `now_secs`.
pub fn is_stunned(until_secs: Option<f64>, now_secs: f64) -> bool {
    until_secs.is_some_and(|t| now_secs + TIMER_EPSILON < t)
}

/// Evaluate the FSM for one entity.
pub fn evaluate(ctx: &CombatContext) -> CombatUpdate {
    if ctx.stunned {
        return CombatUpdate {
            action: CombatAction::Frozen,
            new_phase: AttackPhase::Stunned,
            new_cooldown_secs: ctx.cooldown_secs,
        };
    }

    let in_range = ctx
        .target_distance
        .is_some_and(|d| d <= ctx.attack_range);
    if !in_range {
        return CombatUpdate {
            action: CombatAction::Seek,
            new_phase: AttackPhase::Idle,
            new_cooldown_secs: ctx.cooldown_secs,
        };
    }

    if ctx.cooldown_secs <= TIMER_EPSILON {
        return CombatUpdate {
            action: CombatAction::Attack,
            new_phase: AttackPhase::Attacking,
            new_cooldown_secs: 1.0 / ctx.attack_speed,
        };
    }

    CombatUpdate {
        action: CombatAction::Hold,
        new_phase: AttackPhase::InRange,
        new_cooldown_secs: ctx.cooldown_secs,
    }
}
