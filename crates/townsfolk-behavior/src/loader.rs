//! NPC content loading.
//!
//! This module provides:
//! - [`ContentFormat`]: RON, JSON or TOML, picked from the file extension
//! - [`NpcBundle`]: one NPC's profile, route and dialogue in a single file
//! - Standalone loaders for profiles, routes and scripts
//!
//! Everything is validated on load. Malformed content is a load-time error;
//! a running NPC never sees it.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use townsfolk_common::{ConfigError, SchemaVersion, ScriptId, TownsfolkError, TownsfolkResult};

use crate::collaborators::Collaborators;
use crate::dialogue::DialogueScript;
use crate::npc::Npc;
use crate::profile::NpcProfile;
use crate::route::WaypointRoute;

/// Supported content file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    /// Rusty Object Notation (`.ron`)
    Ron,
    /// JSON (`.json`)
    Json,
    /// TOML (`.toml`)
    Toml,
}

impl ContentFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> TownsfolkResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("ron") => Ok(Self::Ron),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(TownsfolkError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parses `text` in this format.
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> TownsfolkResult<T> {
        let parsed = match self {
            Self::Ron => ron::from_str(text).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(TownsfolkError::Serialization)
    }
}

fn read_content<T: DeserializeOwned>(path: &Path) -> TownsfolkResult<T> {
    let format = ContentFormat::from_path(path)?;
    debug!("Loading {:?} content from {}", format, path.display());
    let text = fs::read_to_string(path)?;
    format.parse(&text)
}

/// Everything needed to create one NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcBundle {
    /// Schema version the bundle was written for
    #[serde(default)]
    pub version: SchemaVersion,
    /// Movement and presentation settings
    #[serde(default)]
    pub profile: Option<NpcProfile>,
    /// Patrol route
    #[serde(default)]
    pub route: WaypointRoute,
    /// Script this NPC speaks, looked up in `scripts`
    #[serde(default)]
    pub script: Option<ScriptId>,
    /// Dialogue scripts carried by the bundle
    #[serde(default)]
    pub scripts: Vec<DialogueScript>,
}

impl NpcBundle {
    /// Creates a bundle at the current schema version.
    #[must_use]
    pub fn new(profile: NpcProfile, route: WaypointRoute) -> Self {
        Self {
            version: SchemaVersion::NPC_BUNDLE,
            profile: Some(profile),
            route,
            script: None,
            scripts: Vec::new(),
        }
    }

    /// Adds a script and makes it the one this NPC speaks.
    #[must_use]
    pub fn with_script(mut self, script: DialogueScript) -> Self {
        self.script = Some(script.id().clone());
        self.scripts.push(script);
        self
    }

    /// The profile, or [`ConfigError::MissingProfile`].
    pub fn profile(&self) -> Result<&NpcProfile, ConfigError> {
        self.profile.as_ref().ok_or(ConfigError::MissingProfile)
    }

    /// Finds the script named by `script`.
    ///
    /// `Ok(None)` when the bundle names no script.
    pub fn resolve_script(&self) -> Result<Option<&DialogueScript>, ConfigError> {
        let Some(id) = &self.script else {
            return Ok(None);
        };
        self.scripts
            .iter()
            .find(|script| script.id() == id)
            .map(Some)
            .ok_or_else(|| ConfigError::MissingScript(id.clone()))
    }

    /// Checks the schema version, the profile and the script reference.
    ///
    /// An empty route only warns; the NPC will stay idle.
    pub fn validate(&self) -> TownsfolkResult<()> {
        if !SchemaVersion::NPC_BUNDLE.can_read(&self.version) {
            return Err(TownsfolkError::VersionMismatch {
                expected: SchemaVersion::NPC_BUNDLE.to_string(),
                actual: self.version.to_string(),
            });
        }
        self.profile()?.validate()?;
        self.resolve_script()?;
        if self.route.is_empty() {
            warn!("Bundle for '{}' has an empty route", self.profile()?.name);
        }
        Ok(())
    }

    /// Validates the bundle and creates its NPC.
    pub fn spawn(&self, collaborators: Collaborators) -> TownsfolkResult<Npc> {
        self.validate()?;
        let profile = self.profile()?.clone();
        let script = self.resolve_script()?.cloned();
        Ok(Npc::init(profile, self.route.clone(), script, collaborators)?)
    }
}

/// Loads and validates an NPC bundle.
pub fn load_bundle(path: impl AsRef<Path>) -> TownsfolkResult<NpcBundle> {
    let path = path.as_ref();
    let bundle: NpcBundle = read_content(path)?;
    bundle.validate()?;
    info!(
        "Loaded NPC bundle {} (v{}, {} waypoints, {} scripts)",
        path.display(),
        bundle.version,
        bundle.route.len(),
        bundle.scripts.len()
    );
    Ok(bundle)
}

/// Loads and validates a profile.
pub fn load_profile(path: impl AsRef<Path>) -> TownsfolkResult<NpcProfile> {
    let profile: NpcProfile = read_content(path.as_ref())?;
    profile.validate()?;
    Ok(profile)
}

/// Loads a route. Empty routes are allowed.
pub fn load_route(path: impl AsRef<Path>) -> TownsfolkResult<WaypointRoute> {
    read_content(path.as_ref())
}

/// Loads a dialogue script. Scripts without lines fail to parse.
pub fn load_script(path: impl AsRef<Path>) -> TownsfolkResult<DialogueScript> {
    read_content(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::TraversalMode;
    use glam::Vec3;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write content file");
        path
    }

    const BUNDLE_JSON: &str = r#"{
        "version": {"major": 1, "minor": 2, "patch": 0},
        "profile": {"name": "Guide", "move_speed": 2.0},
        "route": {"waypoints": [[0.0, 0.0, 0.0], [6.0, 0.0, 0.0]], "mode": "PingPong"},
        "script": "welcome",
        "scripts": [{"id": "welcome", "speaker": "Guide", "lines": ["Hello.", "Goodbye."]}]
    }"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ContentFormat::from_path(Path::new("a.RON")).expect("ron"), ContentFormat::Ron);
        assert_eq!(ContentFormat::from_path(Path::new("a.json")).expect("json"), ContentFormat::Json);
        assert!(matches!(
            ContentFormat::from_path(Path::new("a.yaml")),
            Err(TownsfolkError::UnsupportedFormat(_))
        ));
        assert!(ContentFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_load_json_bundle() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&dir, "guide.json", BUNDLE_JSON);

        let bundle = load_bundle(&path).expect("load bundle");
        assert_eq!(bundle.profile().expect("profile").name, "Guide");
        assert_eq!(bundle.route.mode, TraversalMode::PingPong);
        let script = bundle.resolve_script().expect("resolve").expect("script");
        assert_eq!(script.len(), 2);

        let npc = bundle.spawn(Collaborators::none()).expect("spawn");
        assert_eq!(npc.name(), "Guide");
        assert_eq!(npc.position(), Vec3::ZERO);
    }

    #[test]
    fn test_load_toml_bundle() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(
            &dir,
            "guard.toml",
            r#"
script = "halt"

[profile]
name = "Guard"
idle_wait_secs = 1.0

[route]
waypoints = [[0.0, 0.0, 0.0], [0.0, 0.0, 8.0], [8.0, 0.0, 8.0]]

[[scripts]]
id = "halt"
lines = ["Halt!"]
"#,
        );

        let bundle = load_bundle(&path).expect("load bundle");
        assert_eq!(bundle.version, SchemaVersion::NPC_BUNDLE);
        assert_eq!(bundle.route.len(), 3);
        assert_eq!(bundle.route.mode, TraversalMode::Loop);
    }

    #[test]
    fn test_load_ron_profile() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&dir, "baker.ron", "(name: \"Baker\", detection_radius: 3.5)");

        let profile = load_profile(&path).expect("load profile");
        assert_eq!(profile.name, "Baker");
        assert!((profile.detection_radius - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&dir, "bad.json", r#"{"rotation_speed": -10.0}"#);
        assert!(matches!(
            load_profile(&path),
            Err(TownsfolkError::Config(ConfigError::InvalidProfile {
                field: "rotation_speed",
                ..
            }))
        ));
    }

    #[test]
    fn test_missing_script_reference() {
        let bundle = NpcBundle {
            script: Some(ScriptId::new("nowhere")),
            ..NpcBundle::new(NpcProfile::default(), WaypointRoute::empty())
        };
        assert!(matches!(
            bundle.validate(),
            Err(TownsfolkError::Config(ConfigError::MissingScript(_)))
        ));
    }

    #[test]
    fn test_missing_profile() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&dir, "empty.json", "{}");
        assert!(matches!(
            load_bundle(&path),
            Err(TownsfolkError::Config(ConfigError::MissingProfile))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut bundle = NpcBundle::new(NpcProfile::default(), WaypointRoute::empty());
        bundle.version = SchemaVersion::new(2, 0, 0);
        assert!(matches!(
            bundle.validate(),
            Err(TownsfolkError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_script_file_rejected() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&dir, "silent.json", r#"{"id": "silent", "lines": []}"#);
        assert!(matches!(load_script(&path), Err(TownsfolkError::Serialization(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_route("/nonexistent/route.json"),
            Err(TownsfolkError::Io(_))
        ));
    }

    #[test]
    fn test_bundle_round_trips_through_ron() {
        let script = DialogueScript::new(ScriptId::new("hi"), ["Hi there"]).expect("script");
        let bundle = NpcBundle::new(
            NpcProfile::named("Fisher"),
            WaypointRoute::looping(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)]),
        )
        .with_script(script);

        let text = ron::to_string(&bundle).expect("serialize");
        let parsed: NpcBundle = ContentFormat::Ron.parse(&text).expect("parse");
        assert_eq!(parsed, bundle);
    }
}
