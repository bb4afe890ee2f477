//! Scripted encounter between one NPC and a simulated player.
//!
//! The player walks up to the NPC, presses "talk" as soon as the prompt
//! appears, reads every line at a fixed pace, finishes the conversation and
//! walks back to where it started. The simulation then runs on for a while
//! so the NPC can be seen resuming its patrol.

use glam::Vec3;
use townsfolk_behavior::{Collaborators, DialogueScript, EventBus, Npc, NpcBundle, NpcEvent, NpcState};
use townsfolk_common::TownsfolkResult;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::host::ConsoleHost;

/// How close to its start the player must get to count as home.
const HOME_TOLERANCE: f32 = 0.1;

/// What the scripted player is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Approaching,
    Reading { elapsed: f32 },
    Leaving,
    RunOn { remaining: f32 },
}

/// Event counts gathered while the simulation ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSummary {
    /// State changes
    pub state_changes: usize,
    /// Waypoints reached
    pub waypoints_reached: usize,
    /// Interactions started
    pub interactions_started: usize,
    /// Dialogue lines shown
    pub lines_shown: usize,
    /// Interactions finished
    pub interactions_finished: usize,
    /// Affordance shown or hidden
    pub affordance_changes: usize,
}

impl EventSummary {
    fn record(&mut self, event: &NpcEvent) {
        match event {
            NpcEvent::StateChanged { .. } => self.state_changes += 1,
            NpcEvent::WaypointReached { .. } => self.waypoints_reached += 1,
            NpcEvent::InteractionStarted { .. } => self.interactions_started += 1,
            NpcEvent::DialogueLineShown { .. } => self.lines_shown += 1,
            NpcEvent::InteractionFinished { .. } => self.interactions_finished += 1,
            NpcEvent::AffordanceChanged { .. } => self.affordance_changes += 1,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct SimReport {
    /// Ticks simulated
    pub ticks: u64,
    /// Simulated seconds
    pub elapsed_secs: f32,
    /// Lines the player saw on screen
    pub lines_read: usize,
    /// Whether the conversation was finished
    pub conversation_finished: bool,
    /// NPC state at the end
    pub final_state: NpcState,
    /// NPC position at the end
    pub final_position: Vec3,
    /// Length of one pass over the patrol route
    pub route_length: f32,
    /// Event counts
    pub events: EventSummary,
}

/// One NPC, one player, one conversation.
pub struct Scenario {
    config: SimConfig,
    npc: Npc,
    host: ConsoleHost,
    bus: EventBus,
    rng: fastrand::Rng,
}

impl Scenario {
    /// Spawns the bundle's NPC wired to a console host.
    pub fn new(config: SimConfig, bundle: &NpcBundle) -> TownsfolkResult<Self> {
        let profile = bundle.profile()?;
        let speaker = bundle
            .resolve_script()?
            .and_then(DialogueScript::speaker)
            .unwrap_or(profile.name.as_str())
            .to_string();
        let host = ConsoleHost::new(config.player_start, speaker);
        let bus = EventBus::default();
        let npc = bundle.spawn(Collaborators::all(&host))?.with_events(bus.sender());
        let rng = config.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

        Ok(Self {
            config,
            npc,
            host,
            bus,
            rng,
        })
    }

    fn next_dt(&mut self) -> f32 {
        let nominal = self.config.tick_secs();
        let jitter = self.config.tick_jitter;
        nominal * (1.0 + jitter * (self.rng.f32() * 2.0 - 1.0))
    }

    /// Walks the player towards `goal`, stopping `stop` units short.
    /// Returns true once there.
    fn walk_player(&self, goal: Vec3, stop: f32, dt: f32) -> bool {
        let player = self.host.player();
        let distance = player.distance(goal);
        if distance <= stop {
            return true;
        }
        let step = (self.config.player_speed * dt).min(distance - stop);
        self.host
            .set_player(player + (goal - player).normalize_or_zero() * step);
        false
    }

    /// Runs until the scripted encounter is over or the time cap is hit.
    pub fn run(mut self) -> SimReport {
        info!(
            "Simulating '{}' at {} Hz (jitter {:.0}%)",
            self.npc.name(),
            self.config.tick_rate,
            self.config.tick_jitter * 100.0
        );
        let route_length = self.log_route();

        let mut phase = Phase::Approaching;
        let mut summary = EventSummary::default();
        let mut elapsed = 0.0_f32;
        let mut ticks = 0_u64;
        let mut finished = false;

        while elapsed < self.config.max_duration_secs {
            let dt = self.next_dt();
            elapsed += dt;
            ticks += 1;
            self.host.advance(dt);

            match phase {
                Phase::Approaching => {
                    self.walk_player(self.npc.position(), self.config.player_stop_distance, dt);
                },
                Phase::Leaving => {
                    if self.walk_player(self.config.player_start, HOME_TOLERANCE, dt) {
                        phase = Phase::RunOn {
                            remaining: self.config.run_on_secs,
                        };
                    }
                },
                Phase::Reading { .. } | Phase::RunOn { .. } => {},
            }

            self.npc.tick(dt);
            phase = self.react(phase, dt, &mut finished);

            for event in self.bus.drain() {
                if self.config.log_events {
                    info!("[event] {event:?}");
                }
                summary.record(&event);
            }

            if let Phase::RunOn { remaining } = phase {
                if remaining <= 0.0 {
                    break;
                }
            }
        }

        let report = SimReport {
            ticks,
            elapsed_secs: elapsed,
            lines_read: self.host.lines_shown(),
            conversation_finished: finished,
            final_state: self.npc.state(),
            final_position: self.npc.position(),
            route_length,
            events: summary,
        };
        self.npc.dispose();
        report
    }

    /// Logs the patrol path the way a host would draw it. Returns its length.
    fn log_route(&self) -> f32 {
        let route = self.npc.route();
        for (i, (from, to)) in route.segments().enumerate() {
            debug!(
                "  segment {i}: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})",
                from.x, from.y, from.z, to.x, to.y, to.z
            );
        }
        let length = route.path_length();
        info!(
            "Route: {} waypoints ({:?}), {length:.1} units per pass",
            route.len(),
            route.mode
        );
        length
    }

    /// Player input for this tick.
    fn react(&mut self, phase: Phase, dt: f32, finished: &mut bool) -> Phase {
        match phase {
            Phase::Approaching => {
                if self.host.affordance_visible() && self.npc.request_interact() {
                    info!("Player started talking to '{}'", self.npc.name());
                    return Phase::Reading { elapsed: 0.0 };
                }
                phase
            },
            Phase::Reading { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed < self.config.read_secs_per_line {
                    return Phase::Reading { elapsed };
                }
                let has_next = self.host.navigation().is_some_and(|nav| nav.has_next);
                if has_next && self.npc.next_line() {
                    return Phase::Reading { elapsed: 0.0 };
                }
                // The NPC may already have ended the conversation on its own.
                if self.npc.state() == NpcState::Interacting {
                    self.npc.finish_dialogue();
                }
                *finished = true;
                debug!("Player walking back to {:?}", self.config.player_start);
                Phase::Leaving
            },
            Phase::Leaving => phase,
            Phase::RunOn { remaining } => Phase::RunOn {
                remaining: remaining - dt,
            },
        }
    }
}

/// Logs a run's report.
pub fn log_report(report: &SimReport) {
    let events = &report.events;
    info!(
        "Simulated {:.1}s in {} ticks",
        report.elapsed_secs, report.ticks
    );
    info!(
        "  Conversation finished: {} ({} lines read)",
        report.conversation_finished, report.lines_read
    );
    info!(
        "  Final state: {} at ({:.2}, {:.2}, {:.2})",
        report.final_state, report.final_position.x, report.final_position.y, report.final_position.z
    );
    info!("  Route: {:.1} units per pass", report.route_length);
    info!(
        "  Events: {} state changes, {} waypoints, {} interactions ({} finished), {} lines, {} prompt changes",
        events.state_changes,
        events.waypoints_reached,
        events.interactions_started,
        events.interactions_finished,
        events.lines_shown,
        events.affordance_changes
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin_bundle;

    fn config() -> SimConfig {
        SimConfig {
            seed: Some(7),
            run_on_secs: 3.0,
            read_secs_per_line: 0.5,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_builtin_encounter_completes() {
        let bundle = builtin_bundle().expect("builtin bundle");
        let lines = bundle
            .resolve_script()
            .expect("resolve")
            .expect("script")
            .len();

        let report = Scenario::new(config(), &bundle).expect("scenario").run();

        assert!(report.conversation_finished);
        assert_eq!(report.lines_read, lines);
        assert_eq!(report.events.interactions_started, 1);
        assert_eq!(report.events.interactions_finished, 1);
        assert_eq!(report.events.lines_shown, lines);
        assert_ne!(report.final_state, NpcState::Interacting);
        assert!(report.elapsed_secs < config().max_duration_secs);
        // Closed square with 8-unit sides.
        assert!((report.route_length - 32.0).abs() < 1e-4);
    }

    #[test]
    fn test_unreachable_player_times_out() {
        let bundle = builtin_bundle().expect("builtin bundle");
        let config = SimConfig {
            player_speed: 0.1,
            player_start: Vec3::new(500.0, 0.0, 500.0),
            max_duration_secs: 5.0,
            ..config()
        };

        let report = Scenario::new(config, &bundle).expect("scenario").run();

        assert!(!report.conversation_finished);
        assert_eq!(report.lines_read, 0);
        assert!(report.elapsed_secs >= 5.0);
    }
}
