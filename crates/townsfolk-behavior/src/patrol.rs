//! Straight-line waypoint patrol.

use glam::Vec3;
use townsfolk_common::{direction_to, yaw_towards};

use crate::profile::NpcProfile;
use crate::route::{PatrolCursor, WaypointRoute};

/// Outcome of one patrol tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolStep {
    /// The route has no waypoints.
    NoRoute,
    /// The NPC is within tolerance of its target; the cursor was advanced.
    Reached {
        /// Index of the waypoint that was reached
        index: usize,
        /// Index the cursor now targets
        next: usize,
    },
    /// The NPC is still travelling towards its target.
    Moving {
        /// Displacement to apply this tick
        delta: Vec3,
        /// Yaw to turn towards, if the target is not straight above or below
        heading: Option<f32>,
        /// Waypoint being approached
        target: Vec3,
    },
}

/// Computes per-tick patrol movement along a route.
#[derive(Debug, Clone, Copy)]
pub struct PatrolController<'a> {
    route: &'a WaypointRoute,
    profile: &'a NpcProfile,
}

impl<'a> PatrolController<'a> {
    /// Creates a controller over `route` using the profile's speed and tolerance.
    #[must_use]
    pub const fn new(route: &'a WaypointRoute, profile: &'a NpcProfile) -> Self {
        Self { route, profile }
    }

    /// Advances the patrol by `dt` seconds from `position`.
    ///
    /// The step never carries the NPC past its target, so a waypoint overshot
    /// by a long tick is reached on the following tick instead.
    pub fn step(&self, cursor: &mut PatrolCursor, position: Vec3, dt: f32) -> PatrolStep {
        cursor.clamp_to(self.route);
        let Some(target) = cursor.target(self.route) else {
            return PatrolStep::NoRoute;
        };

        let distance = position.distance(target);
        if distance <= self.profile.waypoint_tolerance {
            let index = cursor.index();
            cursor.advance(self.route);
            return PatrolStep::Reached {
                index,
                next: cursor.index(),
            };
        }

        let travel = (self.profile.move_speed * dt).min(distance);
        PatrolStep::Moving {
            delta: direction_to(position, target) * travel,
            heading: yaw_towards(position, target),
            target,
        }
    }
}
