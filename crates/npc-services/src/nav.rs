//! Navigation trait and the arrival predicate.
//!
//! # Pluggability
//!
//! The behavior core steers NPCs only through [`Navigation`], so a host engine
//! can back it with a navmesh agent while tests and demos use the straight-line
//! [`KinematicNav`][crate::KinematicNav].  The core never computes paths.

use npc_core::{Millis, Position, Yaw};

/// Speeds at or below this (m/s) count as standing still.
pub const SPEED_EPSILON: f32 = 0.01;

/// One NPC's movement body as seen by the behavior core.
pub trait Navigation {
    /// Request a path to `destination`.  Setting the current position stops
    /// the NPC in place.
    fn set_destination(&mut self, destination: Position);

    fn position(&self) -> Position;

    fn facing(&self) -> Yaw;

    fn set_facing(&mut self, yaw: Yaw);

    /// `true` while the host is still computing a path.
    fn path_pending(&self) -> bool;

    /// Distance left along the current path, in metres.
    fn remaining_distance(&self) -> f32;

    /// Distance at which the host considers the destination reached.
    fn stopping_distance(&self) -> f32;

    fn has_path(&self) -> bool;

    /// Current speed in m/s.
    fn speed(&self) -> f32;

    /// Advance the body by `dt`.  Hosts that move bodies themselves keep the
    /// default no-op.
    fn step(&mut self, _dt: Millis) {}

    /// Stop in place.
    fn stop(&mut self) {
        let here = self.position();
        self.set_destination(here);
    }
}

/// `true` once the body is inside its stopping distance.
///
/// Used by scripted walk steps, which finish as soon as the NPC is close
/// enough regardless of residual velocity.
pub fn within_stopping_distance<N: Navigation + ?Sized>(nav: &N) -> bool {
    !nav.path_pending() && nav.remaining_distance() <= nav.stopping_distance()
}

/// Full arrival test used by patrol travel:
///
/// ```text
/// !path_pending && remaining <= stopping && (!has_path || speed ≈ 0)
/// ```
pub fn has_arrived<N: Navigation + ?Sized>(nav: &N) -> bool {
    within_stopping_distance(nav) && (!nav.has_path() || nav.speed() <= SPEED_EPSILON)
}
