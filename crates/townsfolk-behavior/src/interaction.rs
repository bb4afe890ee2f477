//! Proximity-gated interaction trigger.
//!
//! The gate keeps one boolean, whether the tracked actor is in range,
//! refreshed once per tick from a [`ProximityQuery`]. It also remembers
//! whether the talk affordance is showing so the UI only hears about edges.

use glam::Vec3;
use townsfolk_common::ActorTag;

use crate::collaborators::{InteractionUi, ProximityQuery};
use crate::profile::NpcProfile;
use crate::state::NpcState;

/// Tracks the actor's proximity and decides whether interaction may start.
#[derive(Debug, Clone)]
pub struct InteractionGate {
    actor: ActorTag,
    radius: f32,
    in_range: bool,
    affordance_visible: bool,
}

impl InteractionGate {
    /// Creates a gate watching `actor` within `radius`.
    #[must_use]
    pub fn new(actor: ActorTag, radius: f32) -> Self {
        Self {
            actor,
            radius,
            in_range: false,
            affordance_visible: false,
        }
    }

    /// Creates a gate from a profile's actor tag and detection radius.
    #[must_use]
    pub fn from_profile(profile: &NpcProfile) -> Self {
        Self::new(profile.actor_tag.clone(), profile.detection_radius)
    }

    /// Result of the most recent poll.
    #[must_use]
    pub fn in_range(&self) -> bool {
        self.in_range
    }

    /// Whether the affordance is currently shown.
    #[must_use]
    pub fn affordance_visible(&self) -> bool {
        self.affordance_visible
    }

    /// Re-runs the proximity check from `position`.
    ///
    /// Without a query the actor is treated as out of range. Returns the new
    /// value on a rising or falling edge, `None` otherwise.
    pub fn poll<P>(&mut self, position: Vec3, proximity: Option<&P>) -> Option<bool>
    where
        P: ProximityQuery + ?Sized,
    {
        let now = proximity.is_some_and(|query| query.is_actor_in_range(position, self.radius, &self.actor));
        if now == self.in_range {
            return None;
        }
        self.in_range = now;
        Some(now)
    }

    /// Shows or hides the affordance so it is visible exactly when the actor
    /// is in range and `allowed` holds.
    ///
    /// Returns the new visibility when it changed.
    pub fn present<U>(&mut self, ui: Option<&mut U>, allowed: bool) -> Option<bool>
    where
        U: InteractionUi + ?Sized,
    {
        let visible = self.in_range && allowed;
        if visible == self.affordance_visible {
            return None;
        }
        self.affordance_visible = visible;
        if let Some(ui) = ui {
            ui.show_affordance(visible);
        }
        Some(visible)
    }

    /// Whether an interaction request would be accepted in `state`.
    ///
    /// Accepted only with the actor in range and no interaction under way.
    /// Asking twice while interacting yields `false` both times.
    #[must_use]
    pub fn request_interact(&self, state: NpcState) -> bool {
        self.in_range && state != NpcState::Interacting
    }
}
