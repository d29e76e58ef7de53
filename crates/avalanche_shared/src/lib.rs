//! # AVALANCHE Shared
//!
//! Common types used by the track generator and the game shell.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a renderer
//! - a physics engine
//! - any browser binding
//!
//! If you need graphics types, keep them in the game shell.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod events;
pub mod math;

pub use constants::{INTERCHUNK_SPACING, LANE_COUNT, LANE_WIDTH, SEGMENT_LENGTH, SLOPE_ANGLE_DEG};
pub use events::{EventType, TrackEvent};
pub use math::Vec3;
