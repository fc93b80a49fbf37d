//! Player hub upkeep: mana regeneration (Defense mode only) and the
//! game-over check.

use hecs::World;

use kingdom_ai::economy;
use kingdom_core::components::ManaPool;
use kingdom_core::enums::GameMode;

use crate::context::{is_alive, SimContext};

pub fn regenerate_mana(world: &mut World, ctx: &SimContext) {
    if ctx.mode != GameMode::Defense {
        return;
    }
    let Some(hub) = ctx.player_hub else {
        return;
    };
    if let Ok(mut pool) = world.get::<&mut ManaPool>(hub) {
        economy::regenerate(&mut pool, ctx.dt);
    }
}

/// True once the player hub has been destroyed.
pub fn is_destroyed(world: &World, ctx: &SimContext) -> bool {
    match ctx.player_hub {
        Some(hub) => !is_alive(world, hub),
        None => false,
    }
}
