//! # Townsfolk Sim
//!
//! Headless driver for Townsfolk NPCs.
//!
//! Loads one NPC bundle (or the built-in market guide), wires it to console
//! collaborators that log through `tracing`, and plays a scripted encounter:
//! a player walks up, reads the whole conversation and leaves.
//!
//! Usage: `townsfolk-sim [content-path]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod content;
mod host;
mod scenario;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{SimConfig, CONFIG_FILE};
use crate::scenario::Scenario;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("townsfolk=info".parse()?))
        .init();

    info!("Townsfolk sim starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = SimConfig::load();
    config.validate();
    if !Path::new(CONFIG_FILE).exists() {
        if let Err(e) = config.save_to(CONFIG_FILE) {
            warn!("Failed to write default config: {e}");
        }
    }

    let content_path = std::env::args_os().nth(1).map(PathBuf::from);
    let bundle = content::select_bundle(content_path.as_deref())?;

    let report = Scenario::new(config, &bundle)?.run();
    scenario::log_report(&report);

    Ok(())
}
