//! Engine-facing capability interfaces.
//!
//! The behavior core never talks to an engine directly. Animation playback,
//! movement, proximity queries and UI presentation are injected as trait
//! objects when an NPC is created, so the core runs the same against a real
//! engine binding or against [`MockHost`] in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use tracing::warn;
use townsfolk_common::ActorTag;

use crate::dialogue::NavigationState;

/// Animation playback service.
pub trait AnimationPlayback {
    /// Asks the engine to play `clip`. Fire-and-forget.
    fn request_clip(&mut self, clip: &str);

    /// Fraction of `clip` played so far, or `None` if it is not playing.
    fn normalized_progress(&self, clip: &str) -> Option<f32>;
}

/// Applies kinematic movement to the NPC's body.
pub trait Mover {
    /// Moves the body by `delta`.
    fn apply_movement(&mut self, delta: Vec3);

    /// Turns the body towards `target_heading` (yaw degrees) by at most
    /// `max_degrees`.
    fn apply_rotation(&mut self, target_heading: f32, max_degrees: f32);
}

/// Spatial overlap query against the tracked actor.
pub trait ProximityQuery {
    /// Whether an actor tagged `actor` lies within `radius` of `position`.
    fn is_actor_in_range(&self, position: Vec3, radius: f32, actor: &ActorTag) -> bool;
}

/// Presentation sink for interaction prompts and dialogue.
pub trait InteractionUi {
    /// Shows or hides the "talk" affordance.
    fn show_affordance(&mut self, visible: bool);

    /// Displays a dialogue line.
    fn show_dialogue_line(&mut self, text: &str);

    /// Updates the dialogue navigation controls.
    fn show_navigation_state(&mut self, navigation: NavigationState);

    /// Closes the dialogue panel.
    fn close_dialogue(&mut self) {}
}

/// The set of collaborators handed to an NPC at construction.
///
/// Every slot is optional. A missing collaborator turns its effects into
/// no-ops with a single warning.
#[derive(Default)]
pub struct Collaborators {
    /// Animation playback service
    pub animation: Option<Box<dyn AnimationPlayback>>,
    /// Body mover
    pub mover: Option<Box<dyn Mover>>,
    /// Proximity query
    pub proximity: Option<Box<dyn ProximityQuery>>,
    /// UI sink
    pub ui: Option<Box<dyn InteractionUi>>,
}

impl Collaborators {
    /// No collaborators at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the animation service.
    #[must_use]
    pub fn with_animation(mut self, animation: impl AnimationPlayback + 'static) -> Self {
        self.animation = Some(Box::new(animation));
        self
    }

    /// Sets the mover.
    #[must_use]
    pub fn with_mover(mut self, mover: impl Mover + 'static) -> Self {
        self.mover = Some(Box::new(mover));
        self
    }

    /// Sets the proximity query.
    #[must_use]
    pub fn with_proximity(mut self, proximity: impl ProximityQuery + 'static) -> Self {
        self.proximity = Some(Box::new(proximity));
        self
    }

    /// Sets the UI sink.
    #[must_use]
    pub fn with_ui(mut self, ui: impl InteractionUi + 'static) -> Self {
        self.ui = Some(Box::new(ui));
        self
    }

    /// Wires one shared host into every slot.
    #[must_use]
    pub fn all<H>(host: &H) -> Self
    where
        H: AnimationPlayback + Mover + ProximityQuery + InteractionUi + Clone + 'static,
    {
        Self::none()
            .with_animation(host.clone())
            .with_mover(host.clone())
            .with_proximity(host.clone())
            .with_ui(host.clone())
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("animation", &self.animation.is_some())
            .field("mover", &self.mover.is_some())
            .field("proximity", &self.proximity.is_some())
            .field("ui", &self.ui.is_some())
            .finish()
    }
}

/// One collaborator slot that warns the first time it is used while empty.
pub(crate) struct Slot<T: ?Sized> {
    inner: Option<Box<T>>,
    kind: &'static str,
    warned: bool,
}

impl<T: ?Sized> Slot<T> {
    pub(crate) fn new(inner: Option<Box<T>>, kind: &'static str) -> Self {
        Self {
            inner,
            kind,
            warned: false,
        }
    }

    pub(crate) fn is_wired(&self) -> bool {
        self.inner.is_some()
    }

    /// Borrows the collaborator, warning once per slot if it is missing.
    pub(crate) fn get_mut(&mut self, owner: &str) -> Option<&mut T> {
        if self.inner.is_none() && !self.warned {
            warn!("{owner}: no {} collaborator wired, its effects are skipped", self.kind);
            self.warned = true;
        }
        self.inner.as_deref_mut()
    }

    pub(crate) fn get(&mut self, owner: &str) -> Option<&T> {
        self.get_mut(owner).map(|inner| &*inner)
    }
}

/// Forwards animation requests only when the desired clip changes.
///
/// States set a desired clip; [`ClipDriver::flush`] issues at most one
/// request, and none if the clip is already the one playing.
pub(crate) struct ClipDriver {
    service: Slot<dyn AnimationPlayback>,
    playing: Option<String>,
    desired: Option<String>,
}

impl ClipDriver {
    pub(crate) fn new(service: Option<Box<dyn AnimationPlayback>>) -> Self {
        Self {
            service: Slot::new(service, "animation"),
            playing: None,
            desired: None,
        }
    }

    pub(crate) fn set_desired(&mut self, clip: &str) {
        self.desired = Some(clip.to_string());
    }

    /// Clip most recently forwarded to the service.
    pub(crate) fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    /// Sends the pending clip if it differs from the one playing.
    /// Returns true if a request went out.
    pub(crate) fn flush(&mut self, owner: &str) -> bool {
        let Some(desired) = self.desired.take() else {
            return false;
        };
        if self.playing.as_deref() == Some(desired.as_str()) {
            return false;
        }
        let sent = match self.service.get_mut(owner) {
            Some(service) => {
                service.request_clip(&desired);
                true
            },
            None => false,
        };
        self.playing = Some(desired);
        sent
    }

    pub(crate) fn has_service(&self) -> bool {
        self.service.is_wired()
    }

    pub(crate) fn progress(&mut self, owner: &str, clip: &str) -> Option<f32> {
        self.service
            .get(owner)
            .and_then(|service| service.normalized_progress(clip))
    }
}

/// Everything a [`MockHost`] observed, in call order per channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostLog {
    /// Clips requested from the animation service
    pub clip_requests: Vec<String>,
    /// Movement deltas applied
    pub movements: Vec<Vec3>,
    /// Rotation requests as (target heading, max degrees)
    pub rotations: Vec<(f32, f32)>,
    /// Affordance visibility changes
    pub affordance: Vec<bool>,
    /// Dialogue lines shown
    pub lines: Vec<String>,
    /// Navigation states shown
    pub navigation: Vec<NavigationState>,
    /// Number of times the dialogue panel was closed
    pub dialogue_closed: usize,
    /// Number of proximity queries answered
    pub proximity_queries: usize,
}

#[derive(Debug, Default)]
struct HostState {
    log: HostLog,
    actor_in_range: bool,
    clip_progress: HashMap<String, f32>,
}

/// In-memory host implementing every collaborator, for tests and tooling.
///
/// Clones share state, so a test keeps one handle and gives clones to the NPC.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    state: Rc<RefCell<HostState>>,
}

impl MockHost {
    /// Creates a host with the actor out of range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the tracked actor in or out of range.
    pub fn set_actor_in_range(&self, in_range: bool) {
        self.state.borrow_mut().actor_in_range = in_range;
    }

    /// Sets the normalized progress reported for `clip`.
    pub fn set_clip_progress(&self, clip: &str, progress: f32) {
        self.state
            .borrow_mut()
            .clip_progress
            .insert(clip.to_string(), progress);
    }

    /// Copy of everything observed so far.
    #[must_use]
    pub fn log(&self) -> HostLog {
        self.state.borrow().log.clone()
    }

    /// Forgets everything observed so far.
    pub fn clear_log(&self) {
        self.state.borrow_mut().log = HostLog::default();
    }
}

impl AnimationPlayback for MockHost {
    fn request_clip(&mut self, clip: &str) {
        self.state
            .borrow_mut()
            .log
            .clip_requests
            .push(clip.to_string());
    }

    fn normalized_progress(&self, clip: &str) -> Option<f32> {
        self.state.borrow().clip_progress.get(clip).copied()
    }
}

impl Mover for MockHost {
    fn apply_movement(&mut self, delta: Vec3) {
        self.state.borrow_mut().log.movements.push(delta);
    }

    fn apply_rotation(&mut self, target_heading: f32, max_degrees: f32) {
        self.state
            .borrow_mut()
            .log
            .rotations
            .push((target_heading, max_degrees));
    }
}

impl ProximityQuery for MockHost {
    fn is_actor_in_range(&self, _position: Vec3, _radius: f32, _actor: &ActorTag) -> bool {
        let mut state = self.state.borrow_mut();
        state.log.proximity_queries += 1;
        state.actor_in_range
    }
}

impl InteractionUi for MockHost {
    fn show_affordance(&mut self, visible: bool) {
        self.state.borrow_mut().log.affordance.push(visible);
    }

    fn show_dialogue_line(&mut self, text: &str) {
        self.state.borrow_mut().log.lines.push(text.to_string());
    }

    fn show_navigation_state(&mut self, navigation: NavigationState) {
        self.state.borrow_mut().log.navigation.push(navigation);
    }

    fn close_dialogue(&mut self) {
        self.state.borrow_mut().log.dialogue_closed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_driver_deduplicates() {
        let host = MockHost::new();
        let mut driver = ClipDriver::new(Some(Box::new(host.clone())));

        driver.set_desired("Walking");
        assert!(driver.flush("npc"));
        driver.set_desired("Walking");
        assert!(!driver.flush("npc"));
        driver.set_desired("Idle");
        assert!(driver.flush("npc"));

        assert_eq!(host.log().clip_requests, vec!["Walking", "Idle"]);
        assert_eq!(driver.playing(), Some("Idle"));
    }

    #[test]
    fn test_clip_driver_last_desire_wins() {
        let host = MockHost::new();
        let mut driver = ClipDriver::new(Some(Box::new(host.clone())));

        driver.set_desired("Walking");
        driver.set_desired("Idle");
        driver.flush("npc");

        assert_eq!(host.log().clip_requests, vec!["Idle"]);
    }

    #[test]
    fn test_clip_driver_without_service() {
        let mut driver = ClipDriver::new(None);
        driver.set_desired("Idle");
        assert!(!driver.flush("npc"));
        assert!(!driver.has_service());
        assert_eq!(driver.progress("npc", "Idle"), None);
    }

    #[test]
    fn test_slot_missing_is_none() {
        let mut slot: Slot<dyn Mover> = Slot::new(None, "mover");
        assert!(slot.get_mut("npc").is_none());
        assert!(slot.get_mut("npc").is_none());
        assert!(slot.warned);
    }

    #[test]
    fn test_mock_host_shares_state() {
        let host = MockHost::new();
        let mut clone = host.clone();
        clone.apply_movement(Vec3::X);
        host.set_actor_in_range(true);

        assert_eq!(host.log().movements, vec![Vec3::X]);
        assert!(clone.is_actor_in_range(Vec3::ZERO, 1.0, &ActorTag::player()));
        assert_eq!(host.log().proximity_queries, 1);
    }

    #[test]
    fn test_collaborators_debug_lists_slots() {
        let collaborators = Collaborators::none().with_mover(MockHost::new());
        let rendered = format!("{collaborators:?}");
        assert!(rendered.contains("mover: true"));
        assert!(rendered.contains("ui: false"));
    }
}
