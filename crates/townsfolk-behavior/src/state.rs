//! Behavior states and the transition table.
//!
//! States form a closed enum and every legal move between them is a row in
//! [`TRANSITIONS`]. The NPC dispatcher raises a [`Trigger`] and looks the
//! result up here; a trigger with no matching row is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::ClipSet;

/// What an NPC is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NpcState {
    /// Standing still, waiting for the idle timer
    #[default]
    Idle,
    /// Patrolling the waypoint route
    Walking,
    /// Talking with the tracked actor
    Interacting,
}

impl NpcState {
    /// Animation clip that entering this state requests.
    #[must_use]
    pub fn clip(self, clips: &ClipSet) -> &str {
        match self {
            NpcState::Idle => &clips.idle,
            NpcState::Walking => &clips.walk,
            NpcState::Interacting => &clips.interact,
        }
    }
}

impl fmt::Display for NpcState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NpcState::Idle => "Idle",
            NpcState::Walking => "Walking",
            NpcState::Interacting => "Interacting",
        };
        f.write_str(name)
    }
}

/// Events that can move an NPC between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Idle timer ran out with the tracked actor out of range
    IdleTimerExpired,
    /// An interaction request passed the gate
    InteractRequested,
    /// The route has no waypoints
    RouteEmpty,
    /// A waypoint was reached and patrol continues
    WaypointReached,
    /// A waypoint was reached and the profile asks to pause there
    DwellAtWaypoint,
    /// The interaction ended
    InteractionFinished,
}

/// Where a transition leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A fixed state
    State(NpcState),
    /// Whatever [`resume_state`] picks from the remembered previous state
    ResumePrevious,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State the row applies in
    pub from: NpcState,
    /// Trigger the row reacts to
    pub trigger: Trigger,
    /// Resulting state
    pub to: Target,
}

const fn row(from: NpcState, trigger: Trigger, to: Target) -> Transition {
    Transition { from, trigger, to }
}

/// Every legal transition.
pub const TRANSITIONS: &[Transition] = &[
    row(NpcState::Idle, Trigger::IdleTimerExpired, Target::State(NpcState::Walking)),
    row(NpcState::Idle, Trigger::InteractRequested, Target::State(NpcState::Interacting)),
    row(NpcState::Walking, Trigger::RouteEmpty, Target::State(NpcState::Idle)),
    row(NpcState::Walking, Trigger::WaypointReached, Target::State(NpcState::Walking)),
    row(NpcState::Walking, Trigger::DwellAtWaypoint, Target::State(NpcState::Idle)),
    row(NpcState::Walking, Trigger::InteractRequested, Target::State(NpcState::Interacting)),
    row(NpcState::Interacting, Trigger::InteractionFinished, Target::ResumePrevious),
];

/// State to resume after an interaction, given the state it interrupted.
///
/// An interrupted idle resumes as walking so the NPC does not sit idle
/// forever; walking resumes as walking; anything else falls back to idle.
#[must_use]
pub fn resume_state(previous: Option<NpcState>) -> NpcState {
    match previous {
        Some(NpcState::Idle | NpcState::Walking) => NpcState::Walking,
        Some(NpcState::Interacting) | None => NpcState::Idle,
    }
}

/// Looks up the state `trigger` leads to from `from`.
///
/// Returns `None` when the table has no row for the pair.
#[must_use]
pub fn next_state(from: NpcState, trigger: Trigger, previous: Option<NpcState>) -> Option<NpcState> {
    TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.trigger == trigger)
        .map(|t| match t.to {
            Target::State(state) => state,
            Target::ResumePrevious => resume_state(previous),
        })
}
