//! Content selection for the simulation.

use std::path::Path;

use glam::Vec3;
use townsfolk_behavior::{load_bundle, DialogueScript, NpcBundle, NpcProfile, WaypointRoute};
use townsfolk_common::{ScriptId, TownsfolkResult};
use tracing::{info, warn};

/// The market guide used when no content file is given or it fails to load.
pub fn builtin_bundle() -> TownsfolkResult<NpcBundle> {
    let profile = NpcProfile::named("Market Guide")
        .with_move_speed(1.5)
        .with_idle_wait(2.0)
        .with_detection_radius(2.5);
    let route = WaypointRoute::looping(vec![
        Vec3::new(-4.0, 0.0, -4.0),
        Vec3::new(4.0, 0.0, -4.0),
        Vec3::new(4.0, 0.0, 4.0),
        Vec3::new(-4.0, 0.0, 4.0),
    ]);
    let script = DialogueScript::new(
        ScriptId::new("market_welcome"),
        [
            "Welcome to the market square.",
            "The baker opens at dawn; the smith, once the forge is hot.",
            "Mind the carts on your way out.",
        ],
    )?
    .with_speaker("Guide");

    Ok(NpcBundle::new(profile, route).with_script(script))
}

/// Loads the bundle at `path`, falling back to the built-in one.
pub fn select_bundle(path: Option<&Path>) -> TownsfolkResult<NpcBundle> {
    let Some(path) = path else {
        info!("No content file given, using the built-in market guide");
        return builtin_bundle();
    };
    match load_bundle(path) {
        Ok(bundle) => Ok(bundle),
        Err(e) => {
            warn!("Failed to load {}: {e}; using the built-in market guide", path.display());
            builtin_bundle()
        },
    }
}
