//! Immutable per-NPC configuration.

use serde::{Deserialize, Serialize};
use townsfolk_common::{ActorTag, ConfigError};

/// Animation clip names for the three behaviors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSet {
    /// Clip played while idling
    pub idle: String,
    /// Clip played while walking a route
    pub walk: String,
    /// Clip played while interacting
    pub interact: String,
}

impl Default for ClipSet {
    fn default() -> Self {
        Self {
            idle: "Idle".to_string(),
            walk: "Walking".to_string(),
            interact: "Interacting".to_string(),
        }
    }
}

/// Which signal ends an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionSignal {
    /// The dialogue session's finish call ends the interaction.
    #[default]
    Dialogue,
    /// The interact clip reaching full normalized progress ends it.
    Animation,
}

/// Movement, timing and presentation settings for one NPC.
///
/// Loaded once before the NPC starts and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcProfile {
    /// Display name used in logs
    pub name: String,
    /// Walking speed in world units per second
    pub move_speed: f32,
    /// Turning speed in degrees per second
    pub rotation_speed: f32,
    /// Distance at which a waypoint counts as reached
    pub waypoint_tolerance: f32,
    /// Seconds spent idling before patrolling resumes
    pub idle_wait_secs: f32,
    /// Animation clip names
    pub clips: ClipSet,
    /// Radius of the proximity check around the NPC
    pub detection_radius: f32,
    /// Tag of the actor whose proximity gates interaction
    pub actor_tag: ActorTag,
    /// Signal that ends an interaction
    pub completion: CompletionSignal,
    /// Pause (go idle) at every waypoint instead of walking straight on
    pub dwell_at_waypoints: bool,
}

impl Default for NpcProfile {
    fn default() -> Self {
        Self {
            name: "Villager".to_string(),
            move_speed: 1.5,
            rotation_speed: 180.0,
            waypoint_tolerance: 0.5,
            idle_wait_secs: 3.0,
            clips: ClipSet::default(),
            detection_radius: 2.0,
            actor_tag: ActorTag::player(),
            completion: CompletionSignal::Dialogue,
            dwell_at_waypoints: false,
        }
    }
}

impl NpcProfile {
    /// Creates a profile with default values and the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the movement speed.
    #[must_use]
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Sets the waypoint tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.waypoint_tolerance = tolerance;
        self
    }

    /// Sets the idle wait duration.
    #[must_use]
    pub fn with_idle_wait(mut self, secs: f32) -> Self {
        self.idle_wait_secs = secs;
        self
    }

    /// Sets the detection radius.
    #[must_use]
    pub fn with_detection_radius(mut self, radius: f32) -> Self {
        self.detection_radius = radius;
        self
    }

    /// Sets the completion signal.
    #[must_use]
    pub fn with_completion(mut self, completion: CompletionSignal) -> Self {
        self.completion = completion;
        self
    }

    /// Enables or disables dwelling at waypoints.
    #[must_use]
    pub fn with_dwell(mut self, dwell: bool) -> Self {
        self.dwell_at_waypoints = dwell;
        self
    }

    /// Checks that every numeric field is finite and non-negative and every
    /// clip name is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numeric = [
            ("move_speed", self.move_speed),
            ("rotation_speed", self.rotation_speed),
            ("waypoint_tolerance", self.waypoint_tolerance),
            ("idle_wait_secs", self.idle_wait_secs),
            ("detection_radius", self.detection_radius),
        ];
        for (field, value) in numeric {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidProfile {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }

        let clips = [
            ("clips.idle", &self.clips.idle),
            ("clips.walk", &self.clips.walk),
            ("clips.interact", &self.clips.interact),
        ];
        for (field, clip) in clips {
            if clip.trim().is_empty() {
                return Err(ConfigError::InvalidProfile {
                    field,
                    reason: "clip name is empty".to_string(),
                });
            }
        }

        if self.actor_tag.as_str().is_empty() {
            return Err(ConfigError::InvalidProfile {
                field: "actor_tag",
                reason: "actor tag is empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(NpcProfile::default().validate().is_ok());
    }

    #[test]
    fn test_negative_speed_rejected() {
        let profile = NpcProfile::default().with_move_speed(-1.0);
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::InvalidProfile {
                field: "move_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_wait_rejected() {
        let profile = NpcProfile::default().with_idle_wait(f32::NAN);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_empty_clip_rejected() {
        let mut profile = NpcProfile::default();
        profile.clips.walk = "  ".to_string();
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::InvalidProfile {
                field: "clips.walk",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let profile: NpcProfile =
            ron::from_str("(name: \"Guard\", move_speed: 2.5)").expect("parse profile");
        assert_eq!(profile.name, "Guard");
        assert!((profile.move_speed - 2.5).abs() < f32::EPSILON);
        assert_eq!(profile.clips, ClipSet::default());
        assert_eq!(profile.completion, CompletionSignal::Dialogue);
    }
}
