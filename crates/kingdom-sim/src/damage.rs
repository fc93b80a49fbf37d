//! The damageable contract: damage and heal application.
//!
//! Health stays in `[0, max]`; death is recorded exactly once.

use hecs::{Entity, World};
use tracing::debug;

use kingdom_core::components::{EnemyCamp, Health, Minion, PlayerHub, Tower};
use kingdom_core::enums::EntityKind;
use kingdom_core::events::SimEvent;

use crate::context::entity_id;

/// Apply `amount` damage, reduced by the target's flat defense.
///
/// No-op when the target no longer resolves or is already dead.
pub fn apply_damage(world: &mut World, target: Entity, amount: f64, events: &mut Vec<SimEvent>) {
    let (applied, killed) = {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return;
        };
        if health.dead {
            return;
        }
        let applied = (amount - health.defense).max(0.0);
        health.current = (health.current - applied).clamp(0.0, health.max);
        let killed = health.current <= 0.0;
        if killed {
            health.dead = true;
        }
        (applied, killed)
    };

    let id = entity_id(target);
    events.push(SimEvent::Hit {
        target: id,
        amount: applied,
    });
    if killed {
        let kind = entity_kind(world, target);
        debug!(?id, ?kind, "entity died");
        events.push(SimEvent::Death { entity: id, kind });
    }
}

/// Restore up to `amount` health. Dead entities are not healed.
pub fn apply_heal(world: &mut World, target: Entity, amount: f64, events: &mut Vec<SimEvent>) {
    let restored = {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return;
        };
        if health.dead || amount <= 0.0 {
            return;
        }
        let before = health.current;
        health.current = (health.current + amount).clamp(0.0, health.max);
        health.current - before
    };
    events.push(SimEvent::Healed {
        target: entity_id(target),
        amount: restored,
    });
}

/// Kind of a damageable entity, resolved from its marker component.
pub fn entity_kind(world: &World, entity: Entity) -> EntityKind {
    if world.satisfies::<&PlayerHub>(entity).unwrap_or(false) {
        EntityKind::PlayerHub
    } else if world.satisfies::<&EnemyCamp>(entity).unwrap_or(false) {
        EntityKind::EnemyCamp
    } else if world.satisfies::<&Tower>(entity).unwrap_or(false) {
        EntityKind::Tower
    } else if world.satisfies::<&Minion>(entity).unwrap_or(false) {
        EntityKind::Minion
    } else {
        EntityKind::Projectile
    }
}
