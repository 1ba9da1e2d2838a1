// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Engine configuration.
//!
//! Track resolution and note defaults, loadable from YAML or TOML files.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::timing::SNAP_TOLERANCE;

/// Settings shared by every track built with them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Ticks per quarter note
    #[serde(default = "default_ticks_per_beat")]
    pub ticks_per_beat: u16,
    /// Velocity (1-100) for notes that do not set one
    #[serde(default = "default_velocity")]
    pub default_velocity: u8,
    /// MIDI channel (1-16) for notes that do not set one
    #[serde(default = "default_channel")]
    pub default_channel: u8,
    /// Distance from a whole tick treated as that tick
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
}

fn default_ticks_per_beat() -> u16 {
    128
}
fn default_velocity() -> u8 {
    50
}
fn default_channel() -> u8 {
    1
}
fn default_snap_tolerance() -> f64 {
    SNAP_TOLERANCE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticks_per_beat: default_ticks_per_beat(),
            default_velocity: default_velocity(),
            default_channel: default_channel(),
            snap_tolerance: default_snap_tolerance(),
        }
    }
}

impl EngineConfig {
    /// Load from a `.yaml`/`.yml` or `.toml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            other => bail!("Unsupported config file extension: {:?}", other),
        };
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        Ok(config)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse from a TOML string
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse TOML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Check that every field is in range
    pub fn validate(&self) -> Result<()> {
        // The top bit of the header division selects SMPTE timing
        if self.ticks_per_beat == 0 || self.ticks_per_beat > 0x7FFF {
            bail!("ticks_per_beat must be 1-32767, got {}", self.ticks_per_beat);
        }
        if !(1..=100).contains(&self.default_velocity) {
            bail!("default_velocity must be 1-100, got {}", self.default_velocity);
        }
        if !(1..=16).contains(&self.default_channel) {
            bail!("default_channel must be 1-16, got {}", self.default_channel);
        }
        if !(0.0..0.5).contains(&self.snap_tolerance) {
            bail!("snap_tolerance must be in [0, 0.5), got {}", self.snap_tolerance);
        }
        Ok(())
    }
}
