//! Target acquisition for every combatant.
//!
//! A valid cached target is kept without searching. A target that died,
//! was despawned or became disallowed is dropped and replaced on the same
//! tick. Without a target, searches run on `RETARGET_INTERVAL_SECS`.

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::debug;

use kingdom_ai::combat::{is_stunned, tick_cooldown};
use kingdom_ai::targeting::{find_target, select_nearest, Candidate, Retarget, TargetingRules};
use kingdom_core::components::{Capabilities, Health, Stun};
use kingdom_core::constants::{RETARGET_INTERVAL_SECS, TIMER_EPSILON};
use kingdom_core::enums::Team;
use kingdom_core::types::Position;

use crate::components::{Combatant, Targeting};
use crate::context::SimContext;

pub fn run(world: &mut World, ctx: &SimContext) {
    let candidates: Vec<Candidate<Entity>> = world
        .query::<(&Position, &Team, &Health, &Capabilities)>()
        .iter()
        .map(|(e, (pos, team, health, caps))| Candidate {
            handle: e,
            team: *team,
            position: *pos,
            alive: !health.dead,
            capabilities: *caps,
        })
        .collect();
    let by_handle: HashMap<Entity, Candidate<Entity>> =
        candidates.iter().map(|c| (c.handle, *c)).collect();

    for (entity, (pos, team, health, combatant, targeting, stun)) in world.query_mut::<(
        &Position,
        &Team,
        &Health,
        &Combatant,
        &mut Targeting,
        Option<&Stun>,
    )>() {
        targeting.retarget_in_secs = tick_cooldown(targeting.retarget_in_secs, ctx.dt);
        if health.dead {
            targeting.target = None;
            continue;
        }
        if stun.is_some_and(|s| is_stunned(s.until_secs, ctx.now_secs)) {
            continue;
        }

        let rules = TargetingRules {
            team: *team,
            can_target_air: combatant.can_target_air,
            can_target_buildings: combatant.can_target_buildings,
        };
        let others = candidates.iter().copied().filter(|c| c.handle != entity);

        let result = match targeting.target {
            Some(current) => {
                // Stale handles resolve to no candidate and force a search.
                let resolved = by_handle.get(&current);
                find_target(&rules, *pos, combatant.detection_range, resolved, others)
            }
            None if targeting.retarget_in_secs <= TIMER_EPSILON => {
                targeting.retarget_in_secs = RETARGET_INTERVAL_SECS;
                match select_nearest(&rules, *pos, combatant.detection_range, others) {
                    Some(h) => Retarget::Acquired(h),
                    None => Retarget::Cleared,
                }
            }
            None => Retarget::Keep,
        };

        match result {
            Retarget::Keep => {}
            Retarget::Acquired(target) => {
                debug!(?entity, ?target, "target acquired");
                targeting.target = Some(target);
            }
            Retarget::Cleared => targeting.target = None,
        }
    }
}
