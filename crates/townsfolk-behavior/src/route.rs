//! Waypoint routes and the cursor that walks them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How a patrol cursor moves past the ends of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TraversalMode {
    /// Wrap from the last waypoint back to the first.
    #[default]
    Loop,
    /// Walk forward to the end, then backward to the start, never wrapping.
    PingPong,
}

/// Direction of travel along a ping-pong route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PatrolDirection {
    /// Towards higher indices
    #[default]
    Forward,
    /// Towards lower indices
    Backward,
}

/// Ordered patrol positions plus traversal mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WaypointRoute {
    /// Waypoints in patrol order
    pub waypoints: Vec<Vec3>,
    /// Traversal mode
    #[serde(default)]
    pub mode: TraversalMode,
}

impl WaypointRoute {
    /// Creates a route.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>, mode: TraversalMode) -> Self {
        Self { waypoints, mode }
    }

    /// Creates a looping route.
    #[must_use]
    pub fn looping(waypoints: Vec<Vec3>) -> Self {
        Self::new(waypoints, TraversalMode::Loop)
    }

    /// Creates a ping-pong route.
    #[must_use]
    pub fn ping_pong(waypoints: Vec<Vec3>) -> Self {
        Self::new(waypoints, TraversalMode::PingPong)
    }

    /// A route with no waypoints.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }

    /// Consecutive waypoint pairs for drawing the path.
    ///
    /// Looping routes of three or more points include the closing segment.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let closing = if self.mode == TraversalMode::Loop && self.len() >= 3 {
            self.waypoints.last().copied().zip(self.waypoints.first().copied())
        } else {
            None
        };
        self.waypoints
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(closing)
    }

    /// Length of one pass over [`Self::segments`].
    #[must_use]
    pub fn path_length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

/// Position of an NPC along its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatrolCursor {
    index: usize,
    direction: PatrolDirection,
}

impl PatrolCursor {
    /// A cursor at the first waypoint, heading forward.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: 0,
            direction: PatrolDirection::Forward,
        }
    }

    /// Current waypoint index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Current ping-pong direction.
    #[must_use]
    pub const fn direction(&self) -> PatrolDirection {
        self.direction
    }

    /// Waypoint the cursor currently targets.
    #[must_use]
    pub fn target(&self, route: &WaypointRoute) -> Option<Vec3> {
        route.get(self.index)
    }

    /// Pulls the cursor back inside `route` if it points past the end.
    pub fn clamp_to(&mut self, route: &WaypointRoute) {
        if let Some(last) = route.len().checked_sub(1) {
            self.index = self.index.min(last);
        }
    }

    /// Moves to the next waypoint according to `route.mode`.
    ///
    /// Empty and single-waypoint routes never move the cursor.
    pub fn advance(&mut self, route: &WaypointRoute) {
        let len = route.len();
        if len == 0 {
            return;
        }
        self.clamp_to(route);
        if len == 1 {
            return;
        }

        match route.mode {
            TraversalMode::Loop => self.index = (self.index + 1) % len,
            TraversalMode::PingPong => self.advance_ping_pong(len),
        }
    }

    fn advance_ping_pong(&mut self, len: usize) {
        match self.direction {
            PatrolDirection::Forward if self.index + 1 < len => self.index += 1,
            PatrolDirection::Forward => {
                self.direction = PatrolDirection::Backward;
                self.index -= 1;
            },
            PatrolDirection::Backward if self.index > 0 => self.index -= 1,
            PatrolDirection::Backward => {
                self.direction = PatrolDirection::Forward;
                self.index += 1;
            },
        }

        if self.index == len - 1 {
            self.direction = PatrolDirection::Backward;
        } else if self.index == 0 {
            self.direction = PatrolDirection::Forward;
        }
    }
}
