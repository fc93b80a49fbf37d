//! Cleanup system: despawns dead units and towers plus anything other
//! systems queued this tick.
//!
//! The player hub is never despawned (its death ends the game) and camps
//! are removed by their destruction hook.

use hecs::{Entity, World};

use kingdom_core::components::{Health, Minion, Tower};

pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, (health, _minion)) in world.query_mut::<(&Health, &Minion)>() {
        if health.dead {
            despawn_buffer.push(entity);
        }
    }
    for (entity, (health, _tower)) in world.query_mut::<(&Health, &Tower)>() {
        if health.dead {
            despawn_buffer.push(entity);
        }
    }

    flush(world, despawn_buffer);
}

/// Despawn everything queued so far.
pub fn flush(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        // Already gone when queued twice.
        let _ = world.despawn(entity);
    }
}
