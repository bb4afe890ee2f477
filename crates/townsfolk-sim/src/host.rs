//! Console collaborators: a stand-in engine that logs what it is asked to do.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use townsfolk_behavior::{AnimationPlayback, InteractionUi, Mover, NavigationState, ProximityQuery};
use townsfolk_common::ActorTag;
use tracing::{debug, info};

/// Nominal length of every clip, in seconds.
const CLIP_SECS: f32 = 1.2;

#[derive(Debug, Default)]
struct World {
    clock: f32,
    player: Vec3,
    clip: Option<(String, f32)>,
    affordance: bool,
    navigation: Option<NavigationState>,
    lines_shown: usize,
    dialogue_open: bool,
}

/// Shared handle to the console world. Clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct ConsoleHost {
    world: Rc<RefCell<World>>,
    speaker: String,
}

impl ConsoleHost {
    /// Creates a host with the player at `player` and lines attributed to
    /// `speaker`.
    pub fn new(player: Vec3, speaker: impl Into<String>) -> Self {
        let host = Self {
            world: Rc::default(),
            speaker: speaker.into(),
        };
        host.world.borrow_mut().player = player;
        host
    }

    /// Advances the animation clock.
    pub fn advance(&self, dt: f32) {
        self.world.borrow_mut().clock += dt;
    }

    /// Player position.
    pub fn player(&self) -> Vec3 {
        self.world.borrow().player
    }

    /// Moves the player.
    pub fn set_player(&self, position: Vec3) {
        self.world.borrow_mut().player = position;
    }

    /// Whether the talk prompt is on screen.
    pub fn affordance_visible(&self) -> bool {
        self.world.borrow().affordance
    }

    /// Navigation buttons currently offered, while a dialogue is open.
    pub fn navigation(&self) -> Option<NavigationState> {
        let world = self.world.borrow();
        world.dialogue_open.then_some(world.navigation).flatten()
    }

    /// Number of dialogue lines displayed so far.
    pub fn lines_shown(&self) -> usize {
        self.world.borrow().lines_shown
    }
}

impl AnimationPlayback for ConsoleHost {
    fn request_clip(&mut self, clip: &str) {
        let mut world = self.world.borrow_mut();
        info!("[anim] play '{clip}'");
        let started = world.clock;
        world.clip = Some((clip.to_string(), started));
    }

    fn normalized_progress(&self, clip: &str) -> Option<f32> {
        let world = self.world.borrow();
        match &world.clip {
            Some((playing, started)) if playing == clip => {
                Some(((world.clock - started) / CLIP_SECS).min(1.0))
            },
            _ => None,
        }
    }
}

impl Mover for ConsoleHost {
    fn apply_movement(&mut self, delta: Vec3) {
        debug!("[move] by ({:.2}, {:.2}, {:.2})", delta.x, delta.y, delta.z);
    }

    fn apply_rotation(&mut self, target_heading: f32, max_degrees: f32) {
        debug!("[move] turn towards {target_heading:.1} deg (max {max_degrees:.1})");
    }
}

impl ProximityQuery for ConsoleHost {
    fn is_actor_in_range(&self, position: Vec3, radius: f32, actor: &ActorTag) -> bool {
        // The console world has exactly one actor, the player.
        *actor == ActorTag::player() && self.world.borrow().player.distance(position) <= radius
    }
}

impl InteractionUi for ConsoleHost {
    fn show_affordance(&mut self, visible: bool) {
        self.world.borrow_mut().affordance = visible;
        if visible {
            info!("[ui] press E to talk");
        } else {
            debug!("[ui] talk prompt hidden");
        }
    }

    fn show_dialogue_line(&mut self, text: &str) {
        let mut world = self.world.borrow_mut();
        world.dialogue_open = true;
        world.lines_shown += 1;
        info!("[ui] {}: \"{text}\"", self.speaker);
    }

    fn show_navigation_state(&mut self, navigation: NavigationState) {
        self.world.borrow_mut().navigation = Some(navigation);
        debug!(
            "[ui] buttons: previous={} next={} finish={}",
            navigation.has_previous, navigation.has_next, navigation.is_last
        );
    }

    fn close_dialogue(&mut self) {
        let mut world = self.world.borrow_mut();
        world.dialogue_open = false;
        world.navigation = None;
        info!("[ui] dialogue closed");
    }
}
