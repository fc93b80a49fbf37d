//! Nearest-opponent target selection.
//!
//! Generic over the handle type so the search can run on ECS entities or
//! on plain indices in tests.

use kingdom_core::components::Capabilities;
use kingdom_core::enums::Team;
use kingdom_core::types::Position;

/// Targeting permissions of a searching entity.
#[derive(Debug, Clone, Copy)]
pub struct TargetingRules {
    pub team: Team,
    pub can_target_air: bool,
    pub can_target_buildings: bool,
}

/// A damageable entity as seen by the search.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<H> {
    pub handle: H,
    pub team: Team,
    pub position: Position,
    pub alive: bool,
    pub capabilities: Capabilities,
}

impl TargetingRules {
    /// Whether `capabilities` are allowed by these permissions.
    pub fn permits(&self, capabilities: &Capabilities) -> bool {
        if capabilities.flying && !self.can_target_air {
            return false;
        }
        if capabilities.building && !self.can_target_buildings {
            return false;
        }
        true
    }
}

/// A candidate is valid when alive, on another team and permitted.
pub fn is_valid_target<H>(rules: &TargetingRules, candidate: &Candidate<H>) -> bool {
    candidate.alive && candidate.team != rules.team && rules.permits(&candidate.capabilities)
}

/// Nearest valid candidate within `radius` of `origin`.
///
/// Ties keep the first candidate encountered.
pub fn select_nearest<H, I>(
    rules: &TargetingRules,
    origin: Position,
    radius: f64,
    candidates: I,
) -> Option<H>
where
    I: IntoIterator<Item = Candidate<H>>,
{
    let radius_sq = radius * radius;
    let mut best: Option<(f64, H)> = None;
    for c in candidates {
        if !is_valid_target(rules, &c) {
            continue;
        }
        let d_sq = origin.distance_sq_to(&c.position);
        if d_sq > radius_sq {
            continue;
        }
        match &best {
            Some((best_sq, _)) if d_sq >= *best_sq => {}
            _ => best = Some((d_sq, c.handle)),
        }
    }
    best.map(|(_, h)| h)
}

/// Outcome of a targeting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retarget<H> {
    /// Current target still valid; no search performed.
    Keep,
    /// Search found a new target.
    Acquired(H),
    /// No candidate; fall back to the default destination.
    Cleared,
}

/// Keep the current target when it is still valid, otherwise search.
///
/// `current` is the resolved view of the cached target, or `None` when
/// there is no target or its handle no longer resolves.
pub fn find_target<H, I>(
    rules: &TargetingRules,
    origin: Position,
    radius: f64,
    current: Option<&Candidate<H>>,
    candidates: I,
) -> Retarget<H>
where
    I: IntoIterator<Item = Candidate<H>>,
{
    if let Some(cur) = current {
        if is_valid_target(rules, cur) {
            return Retarget::Keep;
        }
    }
    match select_nearest(rules, origin, radius, candidates) {
        Some(h) => Retarget::Acquired(h),
        None => Retarget::Cleared,
    }
}
