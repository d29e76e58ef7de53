//! # Track Configuration
//!
//! Tuning knobs for a run, loaded from TOML.
//!
//! ```toml
//! seed = 1234
//! road_chance = 0.2
//! lookahead_segments = 2
//! max_active_segments = 5
//!
//! [geometry]
//! segment_length = 120.0
//! slope_angle_deg = 15.0
//! lane_width = 2.5
//! interchunk_spacing = 8.0
//!
//! [snow]
//! bump_height = 0.35
//! bump_frequency = 0.04
//!
//! [difficulty]
//! medium_from = 300.0
//! easy_until = 900.0
//! hard_from = 1500.0
//! ```
//!
//! Every field is optional; missing ones take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyPolicy;
use crate::error::{TrackError, TrackResult};
use crate::noise::WorldSeed;
use crate::segment::SlopeGeometry;

/// Cosmetic snow surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    /// Amplitude of the first noise octave.
    pub bump_height: f32,
    /// Frequency of the first noise octave.
    pub bump_frequency: f64,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            bump_height: 0.35,
            bump_frequency: 0.04,
        }
    }
}

/// Full track configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Run seed.
    pub seed: WorldSeed,
    /// Chance that a road-capable chunk is generated as a road.
    pub road_chance: f32,
    /// Segments kept generated ahead of the player's segment.
    pub lookahead_segments: usize,
    /// Hard cap on segments held at once.
    pub max_active_segments: usize,
    /// Slope dimensions.
    pub geometry: SlopeGeometry,
    /// Snow surface.
    pub snow: SnowConfig,
    /// Distance-based difficulty ramp.
    pub difficulty: DifficultyPolicy,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            road_chance: 0.2,
            lookahead_segments: 2,
            max_active_segments: 5,
            geometry: SlopeGeometry::default(),
            snow: SnowConfig::default(),
            difficulty: DifficultyPolicy::default(),
        }
    }
}

impl TrackConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`TrackError::InvalidConfig`] on syntax errors or invalid values.
    pub fn from_toml_str(source: &str) -> TrackResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| {
            tracing::warn!("Rejected track config: {}", e);
            TrackError::InvalidConfig(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`TrackError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> TrackResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// [`TrackError::InvalidConfig`] if a value has no TOML form.
    pub fn to_toml_string(&self) -> TrackResult<String> {
        toml::to_string_pretty(self).map_err(|e| TrackError::InvalidConfig(e.to_string()))
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// [`TrackError::InvalidConfig`] naming the first violated constraint.
    pub fn validate(&self) -> TrackResult<()> {
        let result = self
            .geometry
            .validate()
            .and_then(|()| self.difficulty.validate())
            .and_then(|()| self.check_window());
        result.map_err(|reason| {
            tracing::warn!("Rejected track config: {}", reason);
            TrackError::InvalidConfig(reason)
        })
    }

    fn check_window(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.road_chance) {
            return Err(format!("road_chance must be in [0, 1], got {}", self.road_chance));
        }
        // Current segment, the one behind it, and the lookahead.
        let needed = self.lookahead_segments + 2;
        if self.max_active_segments < needed {
            return Err(format!(
                "max_active_segments ({}) must hold at least lookahead_segments + 2 ({})",
                self.max_active_segments, needed
            ));
        }
        if !(self.snow.bump_height.is_finite() && self.snow.bump_frequency.is_finite()) {
            return Err("snow parameters must be finite".into());
        }
        Ok(())
    }
}
