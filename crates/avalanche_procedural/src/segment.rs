//! # Segments
//!
//! A segment is a fixed-length stretch of slope made of chunk instances.
//! Segments are the unit of streaming: they are generated, placed on the
//! slope and evicted as a whole.
//!
//! ## Slope Placement
//!
//! Segment `i` starts at `z = -i * L * cos(angle)`, `y = i * L * sin(angle)`.
//! Consumers tilt the whole slope; segment placement only has to be
//! consistent with [`Segment::to_world`].

use avalanche_shared::{
    Vec3, INTERCHUNK_SPACING, LANE_WIDTH, SEGMENT_LENGTH, SLOPE_ANGLE_DEG,
};
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkInstance;
use crate::obstacle::Obstacle;

/// Dimensions of the slope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopeGeometry {
    /// Target length of one segment.
    pub segment_length: f32,
    /// Downhill angle in degrees.
    pub slope_angle_deg: f32,
    /// Distance between lane centers.
    pub lane_width: f32,
    /// Gap inserted after every chunk.
    pub interchunk_spacing: f32,
}

impl Default for SlopeGeometry {
    fn default() -> Self {
        Self {
            segment_length: SEGMENT_LENGTH,
            slope_angle_deg: SLOPE_ANGLE_DEG,
            lane_width: LANE_WIDTH,
            interchunk_spacing: INTERCHUNK_SPACING,
        }
    }
}

impl SlopeGeometry {
    /// Slope angle in radians.
    #[inline]
    #[must_use]
    pub fn slope_angle(&self) -> f32 {
        self.slope_angle_deg.to_radians()
    }

    /// World-space origin of segment `index`.
    #[must_use]
    pub fn segment_origin(&self, index: u64) -> Vec3 {
        let along = index as f32 * self.segment_length;
        let angle = self.slope_angle();
        Vec3::new(0.0, along * angle.sin(), -along * angle.cos())
    }

    /// Checks the geometry can produce a slope.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.segment_length.is_finite() && self.segment_length > 0.0) {
            return Err(format!("segment_length must be positive, got {}", self.segment_length));
        }
        if !(self.interchunk_spacing.is_finite() && self.interchunk_spacing > 0.0) {
            return Err(format!(
                "interchunk_spacing must be positive, got {}",
                self.interchunk_spacing
            ));
        }
        if !(self.lane_width.is_finite() && self.lane_width > 0.0) {
            return Err(format!("lane_width must be positive, got {}", self.lane_width));
        }
        if !(0.0..90.0).contains(&self.slope_angle_deg) {
            return Err(format!(
                "slope_angle_deg must be in [0, 90), got {}",
                self.slope_angle_deg
            ));
        }
        Ok(())
    }
}

/// A generated segment.
#[derive(Clone, Debug)]
pub struct Segment {
    /// Position in the run, starting at 0.
    pub index: u64,
    /// World z of the segment origin.
    pub z_offset: f32,
    /// World y of the segment origin.
    pub y_offset: f32,
    /// Slope angle in radians.
    pub slope_angle: f32,
    /// Target length.
    pub length: f32,
    /// Chunk instances, in slope order.
    pub chunks: Vec<ChunkInstance>,
    /// How far the last chunk (plus spacing) reached past `length`.
    pub overflow: f32,
}

impl Segment {
    /// Wraps sequenced chunks into a placed segment.
    #[must_use]
    pub fn assemble(
        index: u64,
        chunks: Vec<ChunkInstance>,
        overflow: f32,
        geometry: &SlopeGeometry,
    ) -> Self {
        let origin = geometry.segment_origin(index);
        Self {
            index,
            z_offset: origin.z,
            y_offset: origin.y,
            slope_angle: geometry.slope_angle(),
            length: geometry.segment_length,
            chunks,
            overflow,
        }
    }

    /// All obstacles, segment-local, in chunk order.
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.chunks.iter().flat_map(|chunk| chunk.obstacles.iter())
    }

    /// Number of obstacles.
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.obstacles.len()).sum()
    }

    /// World-space origin.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        Vec3::new(0.0, self.y_offset, self.z_offset)
    }

    /// Run distance (along the slope) where this segment starts.
    #[inline]
    #[must_use]
    pub fn start_distance(&self) -> f32 {
        self.index as f32 * self.length
    }

    /// Run distance where this segment ends.
    #[inline]
    #[must_use]
    pub fn end_distance(&self) -> f32 {
        (self.index + 1) as f32 * self.length
    }

    /// Run distance of the furthest chunk end. Never before [`Self::end_distance`].
    ///
    /// Chunks may spill past the nominal end; their obstacles still belong
    /// to this segment.
    #[must_use]
    pub fn reach_distance(&self) -> f32 {
        let furthest = self
            .chunks
            .iter()
            .map(ChunkInstance::end)
            .fold(self.length, f32::max);
        self.start_distance() + furthest
    }

    /// Maps a segment-local position onto the tilted slope.
    ///
    /// Local `-z` runs down the slope and local `y` is the height above
    /// the snow.
    #[must_use]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        let (sin, cos) = self.slope_angle.sin_cos();
        let along = -local.z;
        Vec3::new(
            local.x,
            self.y_offset + along * sin + local.y * cos,
            self.z_offset - along * cos + local.y * sin,
        )
    }

    /// World-space positions of every obstacle.
    pub fn world_obstacles(&self) -> impl Iterator<Item = Obstacle> + '_ {
        self.obstacles().map(|obstacle| {
            let mut placed = *obstacle;
            placed.position = self.to_world(obstacle.position);
            placed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_offsets_follow_slope() {
        let geometry = SlopeGeometry {
            segment_length: 100.0,
            slope_angle_deg: 30.0,
            ..SlopeGeometry::default()
        };
        let segment = Segment::assemble(2, Vec::new(), 0.0, &geometry);
        assert!((segment.z_offset + 200.0 * 30f32.to_radians().cos()).abs() < 1e-3);
        assert!((segment.y_offset - 100.0).abs() < 1e-3);
        assert_eq!(segment.obstacle_count(), 0);
    }

    #[test]
    fn test_segments_join_on_the_slope() {
        let geometry = SlopeGeometry::default();
        let first = Segment::assemble(3, Vec::new(), 0.0, &geometry);
        let second = Segment::assemble(4, Vec::new(), 0.0, &geometry);

        let end_of_first = first.to_world(Vec3::new(0.0, 0.0, -geometry.segment_length));
        assert!(close(end_of_first, second.origin()));
    }

    #[test]
    fn test_height_is_perpendicular_to_slope() {
        let geometry = SlopeGeometry::default();
        let segment = Segment::assemble(1, Vec::new(), 0.0, &geometry);
        let ground = segment.to_world(Vec3::new(0.0, 0.0, -10.0));
        let lifted = segment.to_world(Vec3::new(0.0, 2.0, -10.0));
        assert!(((lifted - ground).length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_geometry_validation() {
        assert!(SlopeGeometry::default().validate().is_ok());
        let broken = SlopeGeometry {
            interchunk_spacing: 0.0,
            ..SlopeGeometry::default()
        };
        assert!(broken.validate().is_err());
    }
}
