//! # Track Error Types
//!
//! All errors that can occur while configuring or generating the track.
//!
//! Generation itself is pure computation. The only fallible inputs are the
//! candidate pool (a configuration problem) and data coming from outside:
//! TOML configs and level-editor chunk maps.

use thiserror::Error;

use crate::difficulty::DifficultySet;
use crate::lane::Lane;

/// Errors that can occur in the track generator.
#[derive(Error, Debug)]
pub enum TrackError {
    /// No chunk in the active catalog supports any requested difficulty.
    #[error("no chunk in the catalog supports difficulties {allowed}")]
    EmptyCandidatePool {
        /// The requested difficulty set.
        allowed: DifficultySet,
    },

    /// Every candidate chunk blocks both lanes next to the previous entry lane.
    #[error("no chunk can be entered next to lane {previous:?} at difficulties {allowed}")]
    NoEnterableChunk {
        /// Entry lane of the previous chunk.
        previous: Option<Lane>,
        /// The requested difficulty set.
        allowed: DifficultySet,
    },

    /// Imported chunk map is missing fields or holds invalid values.
    #[error("malformed custom map: {0}")]
    MalformedCustomMap(String),

    /// Invalid configuration file or values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read a config or map file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for track operations.
pub type TrackResult<T> = Result<T, TrackError>;
