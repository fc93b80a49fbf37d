//! Homing projectile flight and impact.

use hecs::{Entity, World};

use kingdom_ai::steering::step_toward;
use kingdom_core::constants::PROJECTILE_HIT_RADIUS;
use kingdom_core::events::SimEvent;
use kingdom_core::types::Position;

use crate::components::Projectile;
use crate::context::{live_position, SimContext};
use crate::damage;

/// Move every projectile toward its target's current position. A projectile
/// whose target is gone or dead is discarded; one that arrives applies its
/// damage. Spent projectiles are queued for despawn.
pub fn run(
    world: &mut World,
    ctx: &SimContext,
    events: &mut Vec<SimEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    let flights: Vec<(Entity, Position, Projectile)> = world
        .query::<(&Position, &Projectile)>()
        .iter()
        .map(|(e, (pos, p))| (e, *pos, *p))
        .collect();

    for (entity, pos, projectile) in flights {
        let Some(target_pos) = live_position(world, projectile.target) else {
            despawn_buffer.push(entity);
            continue;
        };
        let (next, reached) = step_toward(pos, target_pos, projectile.speed * ctx.dt);
        if reached || next.distance_to(&target_pos) < PROJECTILE_HIT_RADIUS {
            damage::apply_damage(world, projectile.target, projectile.damage, events);
            despawn_buffer.push(entity);
        } else if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = next;
        }
    }
}
