//! World-space positions and yaw-only facing.
//!
//! The core never moves bodies itself; it only computes where an NPC should
//! head and which way it should face, then hands those values to the
//! navigation collaborator.  Heights are carried through unchanged but ignored
//! for facing: NPCs turn about the vertical axis only.

use std::f32::consts::{PI, TAU};

/// A point in world space (metres, y-up).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance in metres.
    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        let (dx, dy, dz) = (other.x - self.x, other.y - self.y, other.z - self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance on the ground plane, ignoring height.
    #[inline]
    pub fn planar_distance(self, other: Position) -> f32 {
        let (dx, dz) = (other.x - self.x, other.z - self.z);
        (dx * dx + dz * dz).sqrt()
    }

    /// Move up to `step` metres towards `target`, stopping on it.
    pub fn step_towards(self, target: Position, step: f32) -> Position {
        let d = self.distance(target);
        if d <= step || d <= f32::EPSILON {
            return target;
        }
        let t = step / d;
        Position {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }

    /// Yaw that faces from `self` towards `target` on the ground plane.
    ///
    /// Returns `None` when the two points coincide in plan view, where the
    /// facing is undefined and the caller should keep its current yaw.
    pub fn yaw_to(self, target: Position) -> Option<Yaw> {
        let (dx, dz) = (target.x - self.x, target.z - self.z);
        if dx.abs() <= f32::EPSILON && dz.abs() <= f32::EPSILON {
            return None;
        }
        Some(Yaw::new(dx.atan2(dz)))
    }
}

/// Heading about the vertical axis, in radians, normalised to `(-π, π]`.
///
/// `0` faces +z; positive values turn towards +x.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Yaw(f32);

impl Yaw {
    pub fn new(radians: f32) -> Self {
        Yaw(normalize(radians))
    }

    #[inline]
    pub fn radians(self) -> f32 {
        self.0
    }

    /// Signed shortest turn from `self` to `to`, in `(-π, π]`.
    pub fn delta(self, to: Yaw) -> f32 {
        normalize(to.0 - self.0)
    }

    /// Interpolate along the shortest arc; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Yaw, t: f32) -> Yaw {
        Yaw::new(self.0 + self.delta(to) * t.clamp(0.0, 1.0))
    }
}

fn normalize(radians: f32) -> f32 {
    let r = radians.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}
