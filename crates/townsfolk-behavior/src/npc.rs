//! The NPC behavior state machine.
//!
//! An [`Npc`] owns its [`NpcRuntime`] and its collaborators. Each call to
//! [`Npc::tick`] runs, in order: the proximity check, the handler for the
//! current state, movement and rotation, and finally one animation request
//! if the desired clip changed. Input events ([`Npc::request_interact`],
//! dialogue navigation, [`Npc::finish_dialogue`]) run between ticks and take
//! effect immediately.

use std::sync::Arc;

use crossbeam_channel::Sender;
use glam::Vec3;
use tracing::{debug, info, warn};
use townsfolk_common::{rotate_towards, ConfigError, NpcId};

use crate::collaborators::{ClipDriver, Collaborators, InteractionUi, Mover, ProximityQuery, Slot};
use crate::dialogue::{DialogueScript, DialogueSession};
use crate::events::NpcEvent;
use crate::interaction::InteractionGate;
use crate::patrol::{PatrolController, PatrolStep};
use crate::profile::{CompletionSignal, NpcProfile};
use crate::route::{PatrolCursor, WaypointRoute};
use crate::state::{next_state, NpcState, Trigger};

/// Mutable per-NPC state, owned by exactly one [`Npc`].
#[derive(Debug, Clone)]
pub struct NpcRuntime {
    /// Kinematic position
    pub position: Vec3,
    /// Yaw in degrees
    pub orientation: f32,
    /// Active behavior state
    pub state: NpcState,
    /// Seconds left before idling ends
    pub idle_timer: f32,
    /// Patrol cursor and ping-pong direction
    pub cursor: PatrolCursor,
    /// State interrupted by the current interaction
    pub previous_state: Option<NpcState>,
    /// Dialogue session of the current interaction
    pub session: Option<DialogueSession>,
}

impl NpcRuntime {
    fn new(position: Vec3, idle_wait: f32) -> Self {
        Self {
            position,
            orientation: 0.0,
            state: NpcState::Idle,
            idle_timer: idle_wait,
            cursor: PatrolCursor::new(),
            previous_state: None,
            session: None,
        }
    }
}

/// Movement produced by the state handler, applied after dispatch.
#[derive(Debug, Clone, Copy)]
struct Motion {
    delta: Vec3,
    heading: Option<f32>,
}

/// One NPC: configuration, runtime state and the collaborators it drives.
pub struct Npc {
    id: NpcId,
    label: String,
    profile: NpcProfile,
    route: WaypointRoute,
    script: Option<Arc<DialogueScript>>,
    runtime: NpcRuntime,
    gate: InteractionGate,
    clips: ClipDriver,
    mover: Slot<dyn Mover>,
    proximity: Slot<dyn ProximityQuery>,
    ui: Slot<dyn InteractionUi>,
    events: Option<Sender<NpcEvent>>,
}

impl Npc {
    /// Creates an NPC in the `Idle` state at the first waypoint (or the
    /// origin for an empty route).
    ///
    /// An empty route or a missing script is logged and tolerated: the NPC
    /// then stays idle, or rejects interaction requests. Only an invalid
    /// profile is an error.
    pub fn init(
        profile: NpcProfile,
        route: WaypointRoute,
        script: Option<DialogueScript>,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        profile.validate()?;

        let id = NpcId::new();
        let label = format!("{} ({id})", profile.name);
        if route.is_empty() {
            warn!("{label}: {}, staying idle", ConfigError::EmptyRoute);
        }
        if script.is_none() {
            warn!("{label}: no dialogue script, interaction requests will be rejected");
        }

        let Collaborators {
            animation,
            mover,
            proximity,
            ui,
        } = collaborators;

        let start = route.get(0).unwrap_or(Vec3::ZERO);
        let mut npc = Self {
            id,
            gate: InteractionGate::from_profile(&profile),
            runtime: NpcRuntime::new(start, profile.idle_wait_secs),
            clips: ClipDriver::new(animation),
            mover: Slot::new(mover, "mover"),
            proximity: Slot::new(proximity, "proximity"),
            ui: Slot::new(ui, "ui"),
            script: script.map(Arc::new),
            events: None,
            label,
            profile,
            route,
        };
        npc.enter(NpcState::Idle, NpcState::Idle);

        info!(
            "{}: initialized with {} waypoints ({:?})",
            npc.label,
            npc.route.len(),
            npc.route.mode
        );
        Ok(npc)
    }

    /// Places the NPC at `position` instead of the first waypoint.
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.runtime.position = position;
        self
    }

    /// Publishes events through `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: Sender<NpcEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// NPC ID.
    #[must_use]
    pub fn id(&self) -> NpcId {
        self.id
    }

    /// Profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Configuration.
    #[must_use]
    pub fn profile(&self) -> &NpcProfile {
        &self.profile
    }

    /// Patrol route.
    #[must_use]
    pub fn route(&self) -> &WaypointRoute {
        &self.route
    }

    /// Dialogue script, if any.
    #[must_use]
    pub fn script(&self) -> Option<&DialogueScript> {
        self.script.as_deref()
    }

    /// Runtime state.
    #[must_use]
    pub fn runtime(&self) -> &NpcRuntime {
        &self.runtime
    }

    /// Active behavior state.
    #[must_use]
    pub fn state(&self) -> NpcState {
        self.runtime.state
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.runtime.position
    }

    /// Whether the tracked actor was in range at the last poll.
    #[must_use]
    pub fn actor_in_range(&self) -> bool {
        self.gate.in_range()
    }

    /// Whether the talk affordance is showing.
    #[must_use]
    pub fn affordance_visible(&self) -> bool {
        self.gate.affordance_visible()
    }

    /// Live dialogue session, if interacting.
    #[must_use]
    pub fn session(&self) -> Option<&DialogueSession> {
        self.runtime.session.as_ref()
    }

    /// Clip most recently requested from the animation service.
    #[must_use]
    pub fn playing_clip(&self) -> Option<&str> {
        self.clips.playing()
    }

    /// Corrects the kinematic position, e.g. after engine collision.
    pub fn sync_position(&mut self, position: Vec3) {
        self.runtime.position = position;
    }

    /// Advances the NPC by `dt` seconds.
    ///
    /// Negative or non-finite `dt` counts as zero.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(in_range) = self
            .gate
            .poll(self.runtime.position, self.proximity.get(&self.label))
        {
            debug!("{}: actor in range: {in_range}", self.label);
        }
        self.refresh_affordance();

        let motion = match self.runtime.state {
            NpcState::Idle => {
                self.tick_idle(dt);
                None
            },
            NpcState::Walking => self.tick_walking(dt),
            NpcState::Interacting => {
                self.tick_interacting();
                None
            },
        };

        if let Some(motion) = motion {
            self.apply_motion(motion, dt);
        }
        self.clips.flush(&self.label);
    }

    /// Asks to start talking with the tracked actor.
    ///
    /// Accepted only when the actor is in range, no interaction is under way
    /// and a script is loaded. Rejected requests change nothing.
    pub fn request_interact(&mut self) -> bool {
        if !self.gate.request_interact(self.runtime.state) {
            debug!(
                "{}: interaction request ignored (state {}, in range {})",
                self.label,
                self.runtime.state,
                self.gate.in_range()
            );
            return false;
        }
        let Some(script) = self.script.clone() else {
            debug!("{}: interaction request ignored, no script", self.label);
            return false;
        };

        self.runtime.session = Some(DialogueSession::new(Arc::clone(&script)));
        self.transition(Trigger::InteractRequested);
        self.emit(NpcEvent::InteractionStarted {
            npc: self.id,
            script: script.id().clone(),
        });
        self.present_dialogue();
        self.refresh_affordance();
        self.clips.flush(&self.label);
        true
    }

    /// Shows the next dialogue line. No-op on the last line.
    pub fn next_line(&mut self) -> bool {
        let moved = self
            .runtime
            .session
            .as_mut()
            .is_some_and(DialogueSession::next_line);
        if moved {
            self.present_dialogue();
        }
        moved
    }

    /// Shows the previous dialogue line. No-op on the first line.
    pub fn previous_line(&mut self) -> bool {
        let moved = self
            .runtime
            .session
            .as_mut()
            .is_some_and(DialogueSession::previous_line);
        if moved {
            self.present_dialogue();
        }
        moved
    }

    /// Ends the current interaction from any line and resumes patrol.
    ///
    /// Returns false if no interaction is under way.
    pub fn finish_dialogue(&mut self) -> bool {
        if self.runtime.state != NpcState::Interacting {
            return false;
        }
        self.complete_interaction();
        self.clips.flush(&self.label);
        true
    }

    /// Tears the NPC down, closing any open dialogue and hiding the
    /// affordance. Returns the final runtime state.
    pub fn dispose(mut self) -> NpcRuntime {
        if let Some(session) = self.runtime.session.take() {
            debug!("{}: dialogue closed on line {}", self.label, session.finish());
            if let Some(ui) = self.ui.get_mut(&self.label) {
                ui.close_dialogue();
            }
        }
        self.gate.present(self.ui.get_mut(&self.label), false);
        info!("{}: disposed in state {}", self.label, self.runtime.state);
        self.runtime
    }

    fn tick_idle(&mut self, dt: f32) {
        self.runtime.idle_timer -= dt;
        if self.runtime.idle_timer > 0.0 || self.gate.in_range() {
            return;
        }
        if self.route.is_empty() {
            self.runtime.idle_timer = self.profile.idle_wait_secs;
            return;
        }
        self.transition(Trigger::IdleTimerExpired);
    }

    fn tick_walking(&mut self, dt: f32) -> Option<Motion> {
        let step = PatrolController::new(&self.route, &self.profile).step(
            &mut self.runtime.cursor,
            self.runtime.position,
            dt,
        );
        match step {
            PatrolStep::NoRoute => {
                self.transition(Trigger::RouteEmpty);
                None
            },
            PatrolStep::Reached { index, next } => {
                debug!("{}: reached waypoint {index}, next {next}", self.label);
                self.emit(NpcEvent::WaypointReached { npc: self.id, index });
                let trigger = if self.profile.dwell_at_waypoints {
                    Trigger::DwellAtWaypoint
                } else {
                    Trigger::WaypointReached
                };
                self.transition(trigger);
                None
            },
            PatrolStep::Moving { delta, heading, .. } => Some(Motion { delta, heading }),
        }
    }

    fn tick_interacting(&mut self) {
        if self.profile.completion != CompletionSignal::Animation {
            return;
        }
        let done = if self.clips.has_service() {
            self.clips
                .progress(&self.label, &self.profile.clips.interact)
                .is_some_and(|progress| progress >= 1.0)
        } else {
            true
        };
        if done {
            self.complete_interaction();
        }
    }

    fn apply_motion(&mut self, motion: Motion, dt: f32) {
        self.runtime.position += motion.delta;
        let max_degrees = self.profile.rotation_speed * dt;
        if let Some(heading) = motion.heading {
            self.runtime.orientation = rotate_towards(self.runtime.orientation, heading, max_degrees);
        }

        if let Some(mover) = self.mover.get_mut(&self.label) {
            mover.apply_movement(motion.delta);
            if let Some(heading) = motion.heading {
                mover.apply_rotation(heading, max_degrees);
            }
        }
    }

    fn complete_interaction(&mut self) {
        if let Some(session) = self.runtime.session.take() {
            debug!("{}: dialogue finished on line {}", self.label, session.finish());
        }
        if let Some(ui) = self.ui.get_mut(&self.label) {
            ui.close_dialogue();
        }
        self.transition(Trigger::InteractionFinished);
        self.runtime.previous_state = None;
        self.emit(NpcEvent::InteractionFinished {
            npc: self.id,
            resumed: self.runtime.state,
        });
        self.refresh_affordance();
    }

    fn transition(&mut self, trigger: Trigger) {
        let from = self.runtime.state;
        let Some(to) = next_state(from, trigger, self.runtime.previous_state) else {
            debug!("{}: no transition from {from} on {trigger:?}", self.label);
            return;
        };

        self.runtime.state = to;
        self.enter(to, from);

        if from != to {
            debug!("{}: {from} -> {to} ({trigger:?})", self.label);
            self.emit(NpcEvent::StateChanged { npc: self.id, from, to });
        }
    }

    fn enter(&mut self, state: NpcState, from: NpcState) {
        self.clips.set_desired(state.clip(&self.profile.clips));
        match state {
            NpcState::Idle => self.runtime.idle_timer = self.profile.idle_wait_secs,
            NpcState::Walking => {},
            NpcState::Interacting => self.runtime.previous_state = Some(from),
        }
    }

    fn present_dialogue(&mut self) {
        let Some(session) = &self.runtime.session else {
            return;
        };
        let index = session.cursor();
        if let Some(ui) = self.ui.get_mut(&self.label) {
            ui.show_dialogue_line(session.current_line());
            ui.show_navigation_state(session.navigation());
        }
        self.emit(NpcEvent::DialogueLineShown { npc: self.id, index });
    }

    fn refresh_affordance(&mut self) {
        let allowed = self.runtime.state != NpcState::Interacting;
        if let Some(visible) = self.gate.present(self.ui.get_mut(&self.label), allowed) {
            self.emit(NpcEvent::AffordanceChanged { npc: self.id, visible });
        }
    }

    fn emit(&self, event: NpcEvent) {
        if let Some(sender) = &self.events {
            // Dropped when the bus is full
            let _ = sender.try_send(event);
        }
    }
}

impl std::fmt::Debug for Npc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Npc")
            .field("id", &self.id)
            .field("name", &self.profile.name)
            .field("state", &self.runtime.state)
            .field("position", &self.runtime.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MockHost;
    use crate::events::EventBus;
    use townsfolk_common::ScriptId;

    fn triangle() -> WaypointRoute {
        WaypointRoute::looping(vec![
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 4.0),
        ])
    }

    fn abc() -> DialogueScript {
        DialogueScript::new(ScriptId::new("greeting"), ["A", "B", "C"]).expect("script")
    }

    fn npc_with(profile: NpcProfile, route: WaypointRoute, host: &MockHost) -> Npc {
        Npc::init(profile, route, Some(abc()), Collaborators::all(host)).expect("init npc")
    }

    #[test]
    fn test_starts_idle_and_requests_idle_clip() {
        let host = MockHost::new();
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host);
        assert_eq!(npc.state(), NpcState::Idle);

        npc.tick(0.1);
        assert_eq!(host.log().clip_requests, vec!["Idle"]);
        npc.tick(0.1);
        assert_eq!(host.log().clip_requests, vec!["Idle"]);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let result = Npc::init(
            NpcProfile::default().with_move_speed(-2.0),
            triangle(),
            None,
            Collaborators::none(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidProfile { .. })));
    }

    #[test]
    fn test_first_tick_reaches_start_waypoint() {
        let host = MockHost::new();
        let profile = NpcProfile::default().with_idle_wait(0.0).with_tolerance(0.5);
        let mut npc = npc_with(profile, triangle(), &host).at(Vec3::new(0.2, 0.0, 0.0));

        npc.tick(0.1);
        assert_eq!(npc.state(), NpcState::Walking);
        npc.tick(0.1);
        assert_eq!(npc.runtime().cursor.index(), 1);
        assert_eq!(
            npc.runtime().cursor.target(npc.route()),
            Some(Vec3::new(4.0, 0.0, 0.0))
        );
        assert_eq!(npc.state(), NpcState::Walking);
        // Idle was superseded within the first tick, and re-entering
        // Walking on arrival must not request the clip again.
        assert_eq!(host.log().clip_requests, vec!["Walking"]);
    }

    #[test]
    fn test_idle_timer_expires_on_exact_tick() {
        let host = MockHost::new();
        let mut npc = npc_with(NpcProfile::default().with_idle_wait(5.0), triangle(), &host);

        npc.tick(2.0);
        assert_eq!(npc.state(), NpcState::Idle);
        npc.tick(2.0);
        assert_eq!(npc.state(), NpcState::Idle);
        npc.tick(1.0);
        assert_eq!(npc.state(), NpcState::Walking);
        assert_eq!(host.log().clip_requests, vec!["Idle", "Walking"]);
    }

    #[test]
    fn test_idle_waits_while_actor_in_range() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let mut npc = npc_with(NpcProfile::default().with_idle_wait(1.0), triangle(), &host);

        npc.tick(2.0);
        assert_eq!(npc.state(), NpcState::Idle);
        host.set_actor_in_range(false);
        npc.tick(0.0);
        assert_eq!(npc.state(), NpcState::Walking);
    }

    #[test]
    fn test_walking_moves_and_turns() {
        let host = MockHost::new();
        let profile = NpcProfile::default().with_idle_wait(0.0).with_move_speed(2.0);
        let mut npc = npc_with(profile, triangle(), &host);

        npc.tick(0.0);
        npc.tick(0.0);
        assert_eq!(npc.runtime().cursor.index(), 1);
        host.clear_log();

        npc.tick(0.5);
        let log = host.log();
        assert_eq!(log.movements.len(), 1);
        assert!((log.movements[0] - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(log.rotations.len(), 1);
        assert!((log.rotations[0].0 - 90.0).abs() < 1e-3);
        assert!((npc.position() - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((npc.runtime().orientation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_interaction_walkthrough() {
        let host = MockHost::new();
        let bus = EventBus::new(64);
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host).with_events(bus.sender());

        host.set_actor_in_range(true);
        npc.tick(0.1);
        assert!(npc.affordance_visible());

        assert!(npc.request_interact());
        assert_eq!(npc.state(), NpcState::Interacting);
        assert!(!npc.affordance_visible());
        assert_eq!(npc.session().map(DialogueSession::current_line), Some("A"));

        assert!(npc.next_line());
        assert!(npc.next_line());
        assert!(!npc.next_line());
        assert!(npc.session().is_some_and(DialogueSession::is_last));

        assert!(npc.finish_dialogue());
        assert_eq!(npc.state(), NpcState::Walking);
        assert!(npc.session().is_none());
        assert!(npc.affordance_visible());

        let log = host.log();
        assert_eq!(log.lines, vec!["A", "B", "C"]);
        assert_eq!(log.navigation.len(), 3);
        assert!(log.navigation[2].is_last);
        assert_eq!(log.dialogue_closed, 1);
        assert_eq!(log.affordance, vec![true, false, true]);
        assert_eq!(log.clip_requests, vec!["Idle", "Interacting", "Walking"]);

        let events = bus.drain();
        assert!(events.contains(&NpcEvent::InteractionFinished {
            npc: npc.id(),
            resumed: NpcState::Walking,
        }));
        assert!(events.contains(&NpcEvent::DialogueLineShown { npc: npc.id(), index: 2 }));
    }

    #[test]
    fn test_double_request_is_rejected() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host);
        npc.tick(0.1);

        assert!(npc.request_interact());
        assert!(!npc.request_interact());
        assert!(!npc.request_interact());
        assert_eq!(npc.state(), NpcState::Interacting);
        assert_eq!(npc.runtime().previous_state, Some(NpcState::Idle));
    }

    #[test]
    fn test_request_out_of_range_is_ignored() {
        let host = MockHost::new();
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host);
        npc.tick(0.1);

        assert!(!npc.request_interact());
        assert_eq!(npc.state(), NpcState::Idle);
        assert!(npc.session().is_none());
    }

    #[test]
    fn test_request_without_script_is_ignored() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let mut npc =
            Npc::init(NpcProfile::default(), triangle(), None, Collaborators::all(&host)).expect("init npc");
        npc.tick(0.1);

        assert!(!npc.request_interact());
        assert_eq!(npc.state(), NpcState::Idle);
    }

    #[test]
    fn test_empty_route_falls_back_to_idle() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let profile = NpcProfile::default().with_idle_wait(2.0);
        let mut npc = npc_with(profile, WaypointRoute::empty(), &host);
        npc.tick(0.1);

        assert!(npc.request_interact());
        assert!(npc.finish_dialogue());
        assert_eq!(npc.state(), NpcState::Walking);

        host.clear_log();
        npc.tick(0.5);
        assert_eq!(npc.state(), NpcState::Idle);
        assert!((npc.runtime().idle_timer - 2.0).abs() < f32::EPSILON);
        assert!(host.log().movements.is_empty());
    }

    #[test]
    fn test_empty_route_stays_idle() {
        let host = MockHost::new();
        let mut npc = npc_with(NpcProfile::default().with_idle_wait(1.0), WaypointRoute::empty(), &host);
        for _ in 0..10 {
            npc.tick(0.5);
            assert_eq!(npc.state(), NpcState::Idle);
        }
    }

    #[test]
    fn test_resume_walking_after_walk_interrupted() {
        let host = MockHost::new();
        let mut npc = npc_with(NpcProfile::default().with_idle_wait(0.0), triangle(), &host);
        npc.tick(0.1);
        assert_eq!(npc.state(), NpcState::Walking);

        host.set_actor_in_range(true);
        npc.tick(0.1);
        assert!(npc.request_interact());
        assert_eq!(npc.runtime().previous_state, Some(NpcState::Walking));
        assert!(npc.finish_dialogue());
        assert_eq!(npc.state(), NpcState::Walking);
        assert_eq!(npc.runtime().previous_state, None);
    }

    #[test]
    fn test_finish_from_first_line() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host);
        npc.tick(0.1);

        assert!(npc.request_interact());
        assert!(!npc.previous_line());
        assert!(npc.finish_dialogue());
        assert!(!npc.finish_dialogue());
    }

    #[test]
    fn test_dwell_at_waypoints() {
        let host = MockHost::new();
        let profile = NpcProfile::default().with_idle_wait(0.0).with_dwell(true);
        let mut npc = npc_with(profile, triangle(), &host);

        npc.tick(0.1);
        assert_eq!(npc.state(), NpcState::Walking);
        npc.tick(0.1);
        assert_eq!(npc.state(), NpcState::Idle);
        assert_eq!(npc.runtime().cursor.index(), 1);
    }

    #[test]
    fn test_animation_completion() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let profile = NpcProfile::default().with_completion(CompletionSignal::Animation);
        let mut npc = npc_with(profile, triangle(), &host);
        npc.tick(0.1);
        assert!(npc.request_interact());

        host.set_clip_progress("Interacting", 0.5);
        npc.tick(0.1);
        assert_eq!(npc.state(), NpcState::Interacting);

        host.set_clip_progress("Interacting", 1.0);
        npc.tick(0.1);
        assert_eq!(npc.state(), NpcState::Walking);
        assert_eq!(host.log().dialogue_closed, 1);
    }

    #[test]
    fn test_animation_not_playing_keeps_interacting() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let profile = NpcProfile::default().with_completion(CompletionSignal::Animation);
        let mut npc = npc_with(profile, triangle(), &host);
        npc.tick(0.1);
        assert!(npc.request_interact());

        // The host never reports progress for the interact clip.
        for _ in 0..20 {
            npc.tick(0.5);
            assert_eq!(npc.state(), NpcState::Interacting);
        }
        assert!(npc.session().is_some());
        assert_eq!(host.log().dialogue_closed, 0);

        assert!(npc.finish_dialogue());
        assert_eq!(npc.state(), NpcState::Walking);
    }

    #[test]
    fn test_animation_completion_without_service() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let collaborators = Collaborators::none()
            .with_proximity(host.clone())
            .with_ui(host.clone());
        let profile = NpcProfile::default().with_completion(CompletionSignal::Animation);
        let mut npc = Npc::init(profile, triangle(), Some(abc()), collaborators).expect("init npc");
        npc.tick(0.1);

        assert!(npc.request_interact());
        npc.tick(0.1);
        assert_eq!(npc.state(), NpcState::Walking);
    }

    #[test]
    fn test_runs_without_collaborators() {
        let mut npc = Npc::init(
            NpcProfile::default().with_idle_wait(0.0),
            triangle(),
            Some(abc()),
            Collaborators::none(),
        )
        .expect("init npc");

        for _ in 0..50 {
            npc.tick(0.1);
        }
        assert_eq!(npc.state(), NpcState::Walking);
        assert!(npc.position().length() > 0.0);
        assert!(!npc.request_interact());
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let host = MockHost::new();
        let mut npc = npc_with(NpcProfile::default().with_idle_wait(1.0), triangle(), &host);
        npc.tick(f32::NAN);
        npc.tick(-5.0);
        npc.tick(f32::INFINITY);
        assert!((npc.runtime().idle_timer - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_dispose_closes_dialogue() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host);
        npc.tick(0.1);
        assert!(npc.request_interact());

        let runtime = npc.dispose();
        assert!(runtime.session.is_none());
        assert_eq!(runtime.state, NpcState::Interacting);
        assert_eq!(host.log().dialogue_closed, 1);
    }

    #[test]
    fn test_dispose_hides_affordance() {
        let host = MockHost::new();
        host.set_actor_in_range(true);
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host);
        npc.tick(0.1);

        npc.dispose();
        assert_eq!(host.log().affordance, vec![true, false]);
    }

    #[test]
    fn test_sync_position() {
        let host = MockHost::new();
        let mut npc = npc_with(NpcProfile::default(), triangle(), &host);
        npc.sync_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(npc.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
