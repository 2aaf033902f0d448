//! JSON configuration
//!
//! Every field has a default, so a config file only needs the keys it changes.
//! A missing file is not an error; a malformed one is.

use crate::error::{Result, SkyburstError};
use crate::simulation::{SimulationSettings, MAX_BURST};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "skyburst.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub auto_launch: bool,
    /// Ticks between automatic launches
    pub launch_interval_ticks: u64,
    /// Keep automatic launches this far from the left/right edges
    pub edge_margin: f32,
    /// Rockets start this far above the bottom edge
    pub launch_height_offset: f32,
    pub stroke_width: f32,
    pub burst_min: u32,
    pub burst_max: u32,
    /// Ticks between consecutive launches of a burst (12 = 200ms at 60 Hz)
    pub burst_stagger_ticks: u64,
    /// Fixed RNG seed; omit for a different show every run
    pub seed: Option<u64>,
    /// Unix socket path for line-based remote control
    pub control_socket: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            vsync: true,
            auto_launch: true,
            launch_interval_ticks: 60,
            edge_margin: 100.0,
            launch_height_offset: 50.0,
            stroke_width: 3.0,
            burst_min: 5,
            burst_max: 10,
            burst_stagger_ticks: 12,
            seed: None,
            control_socket: None,
        }
    }
}

impl Config {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file, falling back to defaults if it doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.launch_interval_ticks == 0 {
            return Err(SkyburstError::InvalidConfig(
                "launch_interval_ticks must be at least 1".into(),
            ));
        }
        if self.burst_min > self.burst_max {
            return Err(SkyburstError::InvalidConfig(format!(
                "burst_min ({}) is larger than burst_max ({})",
                self.burst_min, self.burst_max
            )));
        }
        if self.burst_max as usize > MAX_BURST {
            return Err(SkyburstError::InvalidConfig(format!(
                "burst_max ({}) exceeds {}",
                self.burst_max, MAX_BURST
            )));
        }
        if self.stroke_width.is_nan() || self.stroke_width <= 0.0 {
            return Err(SkyburstError::InvalidConfig(format!(
                "stroke_width must be positive, got {}",
                self.stroke_width
            )));
        }
        Ok(())
    }

    pub fn simulation_settings(&self) -> SimulationSettings {
        SimulationSettings {
            auto_launch: self.auto_launch,
            launch_interval_ticks: self.launch_interval_ticks,
            edge_margin: self.edge_margin,
            launch_height_offset: self.launch_height_offset,
            stroke_width: self.stroke_width,
            burst_min: self.burst_min,
            burst_max: self.burst_max,
            burst_stagger_ticks: self.burst_stagger_ticks,
        }
    }
}
