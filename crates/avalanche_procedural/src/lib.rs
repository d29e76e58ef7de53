//! # AVALANCHE Procedural Track
//!
//! Deterministic, endless slope generation for a three-lane ski runner.
//!
//! ## Design Principles
//!
//! 1. **Playable**: Every chunk leaves its entry lane open
//! 2. **Deterministic**: Same seed always produces the same slope
//! 3. **Segmented**: The slope is generated in fixed-length segments
//! 4. **Streamable**: Segments are generated ahead and dropped behind
//!
//! ## Core Components
//!
//! - `SimplexNoise` / `SnowBumps`: cosmetic noise
//! - `catalog`: the built-in chunk templates
//! - `Sequencer`: stitches chunk instances into segments
//! - `Segment`: a placed stretch of slope
//! - `TrackStream`: sliding window of segments driven by player distance
//! - `custom_map`: level-editor chunk import and export
//!
//! ## Example
//!
//! ```rust,ignore
//! use avalanche_procedural::{TrackConfig, TrackStream};
//!
//! let mut stream = TrackStream::new(TrackConfig::default())?;
//!
//! // Player 250m down the slope
//! stream.update(250.0)?;
//! for event in stream.drain_events() {
//!     // build or free colliders and meshes
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
// Lane indices and row counts are small; distances fit f32 comfortably.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod catalog;
pub mod chunk;
pub mod config;
pub mod custom_map;
pub mod difficulty;
pub mod error;
pub mod lane;
pub mod noise;
pub mod obstacle;
pub mod random;
pub mod segment;
pub mod sequencer;
pub mod stream;

pub use chunk::{Chunk, ChunkContext, ChunkInstance, ChunkLayout, ChunkRequest, GenerationEnv};
pub use config::{SnowConfig, TrackConfig};
pub use custom_map::{export_custom_map, load_custom_map, parse_custom_map, ChunkDefinition};
pub use difficulty::{DifficultyMode, DifficultyPolicy, DifficultySet};
pub use error::{TrackError, TrackResult};
pub use lane::Lane;
pub use noise::{SimplexNoise, SnowBumps, WorldSeed};
pub use obstacle::{Obstacle, ObstacleClass, ObstacleType, RampConfig, Rarity};
pub use random::{TrackRng, WeightedChoice, WeightedTable};
pub use segment::{Segment, SlopeGeometry};
pub use sequencer::{SegmentRequest, SequencedSegment, Sequencer};
pub use stream::{StreamStats, TrackStream};
