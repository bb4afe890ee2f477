//! Simulation configuration.
//!
//! Read from `townsfolk-sim.toml` in the working directory. A missing or
//! unreadable file falls back to defaults.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "townsfolk-sim.toml";

/// Simulation driver parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Timing ===
    /// Simulated ticks per second
    pub tick_rate: u32,
    /// Random tick-length variation as a fraction of the nominal tick
    pub tick_jitter: f32,
    /// Seed for the jitter (None = random)
    pub seed: Option<u64>,
    /// Hard cap on simulated seconds
    pub max_duration_secs: f32,
    /// Seconds to keep running after the conversation ends
    pub run_on_secs: f32,

    // === Scripted player ===
    /// Player start position
    pub player_start: Vec3,
    /// Player walking speed in units per second
    pub player_speed: f32,
    /// How far from the NPC the player stops when approaching
    pub player_stop_distance: f32,
    /// Seconds the player spends reading each line
    pub read_secs_per_line: f32,

    // === Output ===
    /// Log every event as it is drained, not just the summary
    pub log_events: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            tick_jitter: 0.1,
            seed: None,
            max_duration_secs: 120.0,
            run_on_secs: 10.0,

            player_start: Vec3::new(12.0, 0.0, 12.0),
            player_speed: 2.5,
            player_stop_distance: 1.0,
            read_secs_per_line: 1.5,

            log_events: false,
        }
    }
}

impl SimConfig {
    /// Load configuration from the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(1, 240);
        self.tick_jitter = clamp_finite(self.tick_jitter, 0.0, 0.5);
        self.max_duration_secs = clamp_finite(self.max_duration_secs, 1.0, 3600.0);
        self.run_on_secs = clamp_finite(self.run_on_secs, 0.0, 600.0);

        if !self.player_start.is_finite() {
            self.player_start = Self::default().player_start;
        }
        self.player_speed = clamp_finite(self.player_speed, 0.1, 20.0);
        self.player_stop_distance = clamp_finite(self.player_stop_distance, 0.0, 10.0);
        self.read_secs_per_line = clamp_finite(self.read_secs_per_line, 0.0, 30.0);
    }

    /// Nominal tick length in seconds.
    #[must_use]
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}
