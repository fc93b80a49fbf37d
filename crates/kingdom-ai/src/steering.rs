//! Straight-line seek. No path-finding, no avoidance.

use kingdom_core::types::{Position, Velocity};

/// Velocity toward `to` at `speed`, or zero within `stop_distance`.
pub fn seek(from: Position, to: Position, speed: f64, stop_distance: f64) -> Velocity {
    let delta = to.as_vec() - from.as_vec();
    if delta.length() <= stop_distance {
        return Velocity::zero();
    }
    Velocity::from(delta.normalize_or_zero() * speed)
}

/// Sprite facing after moving with `velocity`. Unchanged when not moving horizontally.
pub fn facing_left(velocity: Velocity, current: bool) -> bool {
    if velocity.x < 0.0 {
        true
    } else if velocity.x > 0.0 {
        false
    } else {
        current
    }
}

/// Move `from` toward `to` by at most `step`. Returns the new position and
/// whether `to` was reached.
pub fn step_toward(from: Position, to: Position, step: f64) -> (Position, bool) {
    let delta = to.as_vec() - from.as_vec();
    let dist = delta.length();
    if dist <= step {
        return (to, true);
    }
    (Position::from(from.as_vec() + delta / dist * step), false)
}
