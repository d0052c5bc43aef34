//! Straight-line navigation body.

use npc_core::{Millis, Position, Yaw};
use tracing::trace;

use crate::Navigation;

/// A [`Navigation`] body that walks in a straight line at constant speed.
///
/// There is no path planning: `set_destination` takes effect immediately and
/// `path_pending` is always `false`.  The body turns to face its direction of
/// travel while moving.  Good enough for demos and tests, and a reference for
/// what the core expects from a real navmesh adapter.
#[derive(Clone, Debug)]
pub struct KinematicNav {
    position:      Position,
    facing:        Yaw,
    destination:   Option<Position>,
    /// Walking speed in m/s.
    pub max_speed: f32,
    /// Arrival radius in metres.
    pub stopping:  f32,
    current_speed: f32,
}

impl KinematicNav {
    pub fn new(position: Position, max_speed: f32, stopping: f32) -> Self {
        Self {
            position,
            facing: Yaw::default(),
            destination: None,
            max_speed,
            stopping,
            current_speed: 0.0,
        }
    }

    /// Teleport without routing (initial placement).
    pub fn place(&mut self, position: Position) {
        self.position = position;
        self.destination = None;
        self.current_speed = 0.0;
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }
}

impl Navigation for KinematicNav {
    fn set_destination(&mut self, destination: Position) {
        if destination.distance(self.position) <= f32::EPSILON {
            self.destination = None;
            self.current_speed = 0.0;
        } else {
            self.destination = Some(destination);
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn facing(&self) -> Yaw {
        self.facing
    }

    fn set_facing(&mut self, yaw: Yaw) {
        self.facing = yaw;
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self) -> f32 {
        self.destination.map_or(0.0, |d| self.position.distance(d))
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn speed(&self) -> f32 {
        self.current_speed
    }

    fn step(&mut self, dt: Millis) {
        let Some(dest) = self.destination else {
            self.current_speed = 0.0;
            return;
        };
        let remaining = self.position.distance(dest);
        if remaining <= self.stopping {
            // Settle: inside the stopping radius the body coasts to a halt.
            self.destination = None;
            self.current_speed = 0.0;
            return;
        }
        if let Some(yaw) = self.position.yaw_to(dest) {
            self.facing = yaw;
        }
        let step = self.max_speed * dt.as_secs_f32();
        self.position = self.position.step_towards(dest, step);
        self.current_speed = self.max_speed;
        trace!(remaining = self.position.distance(dest), "kinematic step");
    }
}
