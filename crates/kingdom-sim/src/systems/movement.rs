//! Kinematic integration: position += velocity * dt, plus sprite facing.

use hecs::World;

use kingdom_ai::steering::facing_left;
use kingdom_core::components::Facing;
use kingdom_core::types::{Position, Velocity};

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (pos, vel, facing)) in
        world.query_mut::<(&mut Position, &Velocity, Option<&mut Facing>)>()
    {
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        if let Some(facing) = facing {
            facing.left = facing_left(*vel, facing.left);
        }
    }
}
