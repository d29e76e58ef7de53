//! # Track Geometry Constants
//!
//! Default geometry of the slope. Every value here can be overridden by the
//! track configuration, except the lane count.
//!
//! **CRITICAL:** Lane indices are baked into authored chunk maps.
//! Changing `LANE_COUNT` invalidates every saved map.

// =============================================================================
// LANES
// =============================================================================

/// Number of discrete horizontal lanes on the slope.
pub const LANE_COUNT: usize = 3;

/// Default distance between lane centers (world units).
pub const LANE_WIDTH: f32 = 2.5;

// =============================================================================
// SLOPE
// =============================================================================

/// Default length of one streamed segment (world units along the slope).
pub const SEGMENT_LENGTH: f32 = 120.0;

/// Default slope angle in degrees.
pub const SLOPE_ANGLE_DEG: f32 = 15.0;

/// Default gap left between two consecutive chunks (world units).
pub const INTERCHUNK_SPACING: f32 = 8.0;
