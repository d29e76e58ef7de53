//! # Custom Maps
//!
//! Level-editor interchange format. A custom map is a JSON array of chunk
//! definitions with fixed obstacle layouts:
//!
//! ```json
//! [
//!   {
//!     "name": "gate",
//!     "length": 4,
//!     "obstacle_spacing": 6.0,
//!     "difficulties": ["medium", "hard"],
//!     "can_be_road": false,
//!     "obstacles": [
//!       { "name": "left rock", "type": "big_rock",
//!         "position": { "x": -2.5, "y": 0.0, "z": -12.0 },
//!         "rotation": { "x": 0.0, "y": 45.0, "z": 0.0 }, "scale": 1.2 }
//!     ]
//!   }
//! ]
//! ```
//!
//! Rotations are degrees on disk and radians in memory. Conversion only
//! happens here.

use std::path::Path;

use avalanche_shared::Vec3;
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, ChunkLayout};
use crate::difficulty::{DifficultyMode, DifficultySet};
use crate::error::{TrackError, TrackResult};
use crate::obstacle::{Obstacle, ObstacleType, RampConfig};

/// One chunk of a custom map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkDefinition {
    /// Chunk name.
    pub name: String,
    /// Number of rows.
    pub length: usize,
    /// Distance between rows.
    pub obstacle_spacing: f32,
    /// Difficulties the chunk may appear at. Empty or missing means all.
    #[serde(default)]
    pub difficulties: Vec<DifficultyMode>,
    /// Whether the chunk counts as a road variant.
    #[serde(default)]
    pub can_be_road: bool,
    /// Obstacle layout, chunk-local.
    #[serde(default)]
    pub obstacles: Vec<ObstacleDefinition>,
}

/// One obstacle of a custom chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDefinition {
    /// Editor label.
    #[serde(default)]
    pub name: String,
    /// Obstacle type.
    #[serde(rename = "type")]
    pub kind: ObstacleType,
    /// Chunk-local position.
    pub position: Vec3,
    /// Euler rotation in degrees.
    #[serde(default)]
    pub rotation: Vec3,
    /// Uniform scale.
    #[serde(default = "unit_scale")]
    pub scale: f32,
    /// Ramp payload, only meaningful for ramps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp: Option<RampConfig>,
}

const fn unit_scale() -> f32 {
    1.0
}

fn malformed(chunk: &str, reason: impl std::fmt::Display) -> TrackError {
    TrackError::MalformedCustomMap(format!("chunk '{chunk}': {reason}"))
}

fn finite(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

impl ObstacleDefinition {
    fn into_obstacle(self, chunk: &str) -> TrackResult<Obstacle> {
        if !finite(self.position) || !finite(self.rotation) {
            return Err(malformed(chunk, format!("obstacle '{}' has a non-finite transform", self.name)));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(malformed(chunk, format!("obstacle '{}' has scale {}", self.name, self.scale)));
        }
        if self.ramp.is_some() && self.kind != ObstacleType::Ramp {
            return Err(malformed(
                chunk,
                format!("obstacle '{}' carries a ramp payload but is a {}", self.name, self.kind.name()),
            ));
        }

        let mut obstacle = if self.kind == ObstacleType::Ramp {
            Obstacle::ramp(self.position, self.ramp.unwrap_or_default())
        } else {
            Obstacle::new(self.kind, self.position)
        };
        obstacle.rotation = self.rotation.to_radians();
        obstacle.scale = self.scale;
        Ok(obstacle)
    }

    fn from_obstacle(obstacle: &Obstacle) -> Self {
        Self {
            name: obstacle.kind.name().to_owned(),
            kind: obstacle.kind,
            position: obstacle.position,
            rotation: obstacle.rotation.to_degrees(),
            scale: obstacle.scale,
            ramp: obstacle.ramp,
        }
    }
}

impl ChunkDefinition {
    /// Validates the definition and converts it into an authored chunk.
    ///
    /// # Errors
    ///
    /// [`TrackError::MalformedCustomMap`] describing the first problem.
    pub fn into_chunk(self) -> TrackResult<Chunk> {
        if self.name.trim().is_empty() {
            return Err(TrackError::MalformedCustomMap("chunk without a name".into()));
        }
        if self.length == 0 {
            return Err(malformed(&self.name, "length must be at least 1"));
        }
        if !(self.obstacle_spacing.is_finite() && self.obstacle_spacing > 0.0) {
            return Err(malformed(
                &self.name,
                format!("obstacle_spacing must be positive, got {}", self.obstacle_spacing),
            ));
        }

        let difficulties = if self.difficulties.is_empty() {
            DifficultySet::ALL
        } else {
            self.difficulties.iter().copied().collect()
        };
        let name = self.name;
        let obstacles = self
            .obstacles
            .into_iter()
            .map(|definition| definition.into_obstacle(&name))
            .collect::<TrackResult<Vec<_>>>()?;

        Ok(Chunk::authored(
            &name,
            self.length,
            self.obstacle_spacing,
            difficulties,
            self.can_be_road,
            obstacles,
        ))
    }

    /// Definition of an authored chunk.
    ///
    /// # Errors
    ///
    /// [`TrackError::MalformedCustomMap`] for procedural chunks, which have
    /// no fixed layout to export.
    pub fn from_chunk(chunk: &Chunk) -> TrackResult<Self> {
        let ChunkLayout::Authored(obstacles) = &chunk.layout else {
            return Err(malformed(&chunk.name, "procedural chunks cannot be exported"));
        };
        Ok(Self {
            name: chunk.name.clone(),
            length: chunk.length,
            obstacle_spacing: chunk.obstacle_spacing,
            difficulties: chunk.possible_difficulties.to_vec(),
            can_be_road: chunk.can_be_road,
            obstacles: obstacles.iter().map(ObstacleDefinition::from_obstacle).collect(),
        })
    }
}

/// Parses a custom map.
///
/// # Errors
///
/// [`TrackError::MalformedCustomMap`] on invalid JSON, missing fields or
/// invalid values.
pub fn parse_custom_map(json: &str) -> TrackResult<Vec<Chunk>> {
    let definitions: Vec<ChunkDefinition> =
        serde_json::from_str(json).map_err(|e| TrackError::MalformedCustomMap(e.to_string()))?;
    let chunks = definitions
        .into_iter()
        .map(ChunkDefinition::into_chunk)
        .collect::<TrackResult<Vec<_>>>()?;
    tracing::info!("Imported custom map: {} chunks", chunks.len());
    Ok(chunks)
}

/// Reads and parses a custom map file.
///
/// # Errors
///
/// [`TrackError::Io`] if the file cannot be read, otherwise as
/// [`parse_custom_map`].
pub fn load_custom_map(path: impl AsRef<Path>) -> TrackResult<Vec<Chunk>> {
    let json = std::fs::read_to_string(path.as_ref())?;
    parse_custom_map(&json)
}

/// Serializes authored chunks back into the editor format.
///
/// # Errors
///
/// [`TrackError::MalformedCustomMap`] if any chunk is procedural.
pub fn export_custom_map(chunks: &[Chunk]) -> TrackResult<String> {
    let definitions = chunks
        .iter()
        .map(ChunkDefinition::from_chunk)
        .collect::<TrackResult<Vec<_>>>()?;
    serde_json::to_string_pretty(&definitions).map_err(|e| TrackError::MalformedCustomMap(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    const MAP: &str = r#"[
        {
            "name": "gate",
            "length": 4,
            "obstacle_spacing": 6.0,
            "difficulties": ["medium", "hard"],
            "can_be_road": true,
            "obstacles": [
                { "name": "rock", "type": "big_rock",
                  "position": { "x": -2.5, "y": 0.0, "z": -12.0 },
                  "rotation": { "x": 0.0, "y": 90.0, "z": 0.0 }, "scale": 1.5 },
                { "type": "ramp", "position": { "x": 0.0, "y": 0.0, "z": -6.0 },
                  "ramp": { "has_small_obstacle": true, "has_big_obstacle": false } },
                { "type": { "meters_pickup": "epic" }, "position": { "x": 2.5, "y": 0.8, "z": -18.0 } }
            ]
        },
        { "name": "empty", "length": 2, "obstacle_spacing": 5.0 }
    ]"#;

    #[test]
    fn test_parse_converts_degrees() {
        let chunks = parse_custom_map(MAP).unwrap();
        assert_eq!(chunks.len(), 2);

        let gate = &chunks[0];
        assert!(gate.can_be_road);
        assert!(!gate.possible_difficulties.contains(DifficultyMode::Easy));
        let ChunkLayout::Authored(obstacles) = &gate.layout else {
            panic!("custom chunks are authored");
        };
        assert_eq!(obstacles.len(), 3);
        assert!((obstacles[0].rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(obstacles[0].scale, 1.5);
        assert_eq!(obstacles[1].ramp.map(|r| r.has_small_obstacle), Some(true));
        assert_eq!(obstacles[2].scale, 1.0);

        assert_eq!(chunks[1].possible_difficulties, DifficultySet::ALL);
    }

    #[test]
    fn test_export_restores_degrees() {
        let chunks = parse_custom_map(MAP).unwrap();
        let json = export_custom_map(&chunks).unwrap();
        let definitions: Vec<ChunkDefinition> = serde_json::from_str(&json).unwrap();
        assert!((definitions[0].obstacles[0].rotation.y - 90.0).abs() < 1e-3);
        assert_eq!(definitions[0].difficulties, vec![DifficultyMode::Medium, DifficultyMode::Hard]);
    }

    #[test]
    fn test_rejects_missing_fields() {
        let err = parse_custom_map(r#"[{ "name": "x", "length": 3 }]"#).unwrap_err();
        assert!(matches!(err, TrackError::MalformedCustomMap(_)));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let zero = r#"[{ "name": "x", "length": 0, "obstacle_spacing": 5.0 }]"#;
        assert!(matches!(parse_custom_map(zero), Err(TrackError::MalformedCustomMap(_))));

        let bad_scale = r#"[{ "name": "x", "length": 2, "obstacle_spacing": 5.0, "obstacles": [
            { "type": "tree", "position": { "x": 0.0, "y": 0.0, "z": 0.0 }, "scale": -1.0 } ] }]"#;
        assert!(matches!(parse_custom_map(bad_scale), Err(TrackError::MalformedCustomMap(_))));

        let stray_ramp = r#"[{ "name": "x", "length": 2, "obstacle_spacing": 5.0, "obstacles": [
            { "type": "tree", "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
              "ramp": { "has_small_obstacle": false, "has_big_obstacle": true } } ] }]"#;
        assert!(matches!(parse_custom_map(stray_ramp), Err(TrackError::MalformedCustomMap(_))));

        assert!(matches!(parse_custom_map("{"), Err(TrackError::MalformedCustomMap(_))));
    }

    #[test]
    fn test_procedural_chunks_do_not_export() {
        let builtin = catalog::builtin();
        assert!(matches!(
            export_custom_map(&builtin),
            Err(TrackError::MalformedCustomMap(_))
        ));
    }
}
