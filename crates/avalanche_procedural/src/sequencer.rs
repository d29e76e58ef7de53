//! # Chunk Sequencer
//!
//! Stitches chunk instances end to end until a segment is full.
//!
//! ## Algorithm
//!
//! 1. Keep the catalog chunks that support one of the allowed difficulties.
//! 2. Pick a chunk, then a difficulty both allow.
//! 3. Pick the entry lane: uniform for the very first chunk, otherwise
//!    exactly one lane away from the previous entry lane. Authored chunks
//!    only offer lanes free of blocking obstacles, and a chunk with no
//!    such lane next to the previous one is not drawn.
//! 4. Instantiate the chunk at the running cursor.
//! 5. Advance the cursor by the chunk's extent plus the interchunk gap.
//! 6. Stop once the cursor passes the segment length. The excess is the
//!    overflow the next segment starts at.
//!
//! The cursor grows by at least the interchunk gap per chunk, so a
//! segment never holds more than `length / gap + 1` chunks.
//!
//! All cross-segment state (previous entry lane, overflow, entropy
//! counter) goes in through [`SegmentRequest`] and comes back in
//! [`SequencedSegment`]. The sequencer itself is immutable.

use rand::{Rng, RngCore};

use crate::catalog;
use crate::chunk::{Chunk, ChunkRequest, GenerationEnv};
use crate::difficulty::DifficultySet;
use crate::error::{TrackError, TrackResult};
use crate::lane::Lane;
use crate::noise::{streams, SimplexNoise, WorldSeed};
use crate::random;
use crate::segment::{Segment, SlopeGeometry};

/// Inputs for one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentRequest {
    /// Index of the segment to build.
    pub index: u64,
    /// Overflow returned with the previous segment (0 for the first).
    pub previous_overflow: f32,
    /// Entry lane of the last chunk of the previous segment.
    pub previous_entry_lane: Option<Lane>,
    /// Difficulties allowed in this segment.
    pub allowed: DifficultySet,
    /// Entropy index of the first chunk.
    pub first_entropy_index: u64,
}

impl SegmentRequest {
    /// Request for the first segment of a run.
    #[must_use]
    pub const fn first(allowed: DifficultySet) -> Self {
        Self {
            index: 0,
            previous_overflow: 0.0,
            previous_entry_lane: None,
            allowed,
            first_entropy_index: 0,
        }
    }

    /// Request for the segment after `previous`.
    #[must_use]
    pub fn after(previous: &SequencedSegment, allowed: DifficultySet) -> Self {
        Self {
            index: previous.segment.index + 1,
            previous_overflow: previous.segment.overflow,
            previous_entry_lane: previous.last_entry_lane,
            allowed,
            first_entropy_index: previous.next_entropy_index,
        }
    }
}

/// A segment plus the state the next request needs.
#[derive(Clone, Debug)]
pub struct SequencedSegment {
    /// The assembled segment.
    pub segment: Segment,
    /// Entry lane of the last chunk.
    pub last_entry_lane: Option<Lane>,
    /// Entropy index for the next segment's first chunk.
    pub next_entropy_index: u64,
}

/// Chooses and places chunks.
pub struct Sequencer {
    catalog: Vec<Chunk>,
    /// Enterable lanes of each catalog chunk.
    open_lanes: Vec<Vec<Lane>>,
    geometry: SlopeGeometry,
    road_chance: f32,
    noise: SimplexNoise,
}

impl Sequencer {
    /// Creates a sequencer over an arbitrary catalog.
    ///
    /// # Errors
    ///
    /// [`TrackError::InvalidConfig`] if the geometry does not validate, and
    /// [`TrackError::MalformedCustomMap`] for an authored chunk that blocks
    /// every lane or reaches a full segment length.
    pub fn new(
        catalog: Vec<Chunk>,
        geometry: SlopeGeometry,
        road_chance: f32,
        seed: WorldSeed,
    ) -> TrackResult<Self> {
        geometry.validate().map_err(TrackError::InvalidConfig)?;

        let mut open_lanes = Vec::with_capacity(catalog.len());
        for chunk in &catalog {
            let lanes = chunk.open_lanes(geometry.lane_width);
            if lanes.is_empty() {
                return Err(TrackError::MalformedCustomMap(format!(
                    "chunk '{}' blocks every lane",
                    chunk.name
                )));
            }
            let reach = chunk.reach();
            if reach.is_nan() || reach >= geometry.segment_length {
                return Err(TrackError::MalformedCustomMap(format!(
                    "chunk '{}' reaches {} but segments are {} long",
                    chunk.name, reach, geometry.segment_length
                )));
            }
            open_lanes.push(lanes);
        }

        Ok(Self {
            catalog,
            open_lanes,
            geometry,
            road_chance,
            noise: SimplexNoise::new(seed.derive(streams::DECORATION)),
        })
    }

    /// Creates a sequencer over the built-in templates.
    ///
    /// # Errors
    ///
    /// [`TrackError::InvalidConfig`] if the geometry does not validate.
    pub fn builtin(geometry: SlopeGeometry, road_chance: f32, seed: WorldSeed) -> TrackResult<Self> {
        Self::new(catalog::builtin(), geometry, road_chance, seed)
    }

    /// Uses `custom` when it holds any chunk, the built-in templates otherwise.
    ///
    /// # Errors
    ///
    /// As [`Self::new`].
    pub fn with_custom_map(
        custom: Vec<Chunk>,
        geometry: SlopeGeometry,
        road_chance: f32,
        seed: WorldSeed,
    ) -> TrackResult<Self> {
        if custom.is_empty() {
            Self::builtin(geometry, road_chance, seed)
        } else {
            Self::new(custom, geometry, road_chance, seed)
        }
    }

    /// Active catalog.
    #[must_use]
    pub fn catalog(&self) -> &[Chunk] {
        &self.catalog
    }

    /// Slope dimensions.
    #[must_use]
    pub const fn geometry(&self) -> &SlopeGeometry {
        &self.geometry
    }

    /// Catalog chunks usable with `allowed`.
    pub fn candidates(&self, allowed: DifficultySet) -> impl Iterator<Item = &Chunk> + '_ {
        self.catalog.iter().filter(move |chunk| chunk.supports_any(allowed))
    }

    /// Upper bound on the number of chunks in one segment.
    #[must_use]
    pub fn max_chunks_per_segment(&self) -> usize {
        (self.geometry.segment_length / self.geometry.interchunk_spacing) as usize + 1
    }

    /// Builds one segment.
    ///
    /// # Errors
    ///
    /// [`TrackError::EmptyCandidatePool`] when no chunk supports `allowed`,
    /// [`TrackError::NoEnterableChunk`] when every candidate blocks the
    /// lanes next to the previous entry lane.
    pub fn generate_segment(
        &self,
        request: &SegmentRequest,
        rng: &mut dyn RngCore,
    ) -> TrackResult<SequencedSegment> {
        let pool: Vec<usize> = (0..self.catalog.len())
            .filter(|&i| self.catalog[i].supports_any(request.allowed))
            .collect();
        if pool.is_empty() {
            return Err(TrackError::EmptyCandidatePool {
                allowed: request.allowed,
            });
        }

        let env = GenerationEnv {
            lane_width: self.geometry.lane_width,
            noise: &self.noise,
        };
        let length = self.geometry.segment_length;
        let mut cursor = request.previous_overflow.max(0.0);
        let mut entry_lane = request.previous_entry_lane;
        let mut entropy_index = request.first_entropy_index;
        let mut chunks = Vec::new();

        while cursor < length {
            let options: Vec<(&Chunk, Vec<Lane>)> = pool
                .iter()
                .filter_map(|&i| {
                    let lanes = entry_lanes(&self.open_lanes[i], entry_lane);
                    (!lanes.is_empty()).then(|| (&self.catalog[i], lanes))
                })
                .collect();
            if options.is_empty() {
                return Err(TrackError::NoEnterableChunk {
                    previous: entry_lane,
                    allowed: request.allowed,
                });
            }

            let (chunk, lanes) = &options[rng.gen_range(0..options.len())];
            let Some(difficulty) = chunk.possible_difficulties.intersection(request.allowed).random(rng)
            else {
                continue;
            };
            let lane = lanes[rng.gen_range(0..lanes.len())];
            let is_road = chunk.can_be_road && random::chance(rng, self.road_chance);

            let chunk_request = ChunkRequest {
                entry_lane: lane,
                entropy_index,
                difficulty,
                is_road,
            };
            let instance = chunk.instantiate(chunk_request, cursor, &env, rng);
            tracing::debug!(
                "Segment {}: {} at {:.1} ({}, entry {:?}, road {})",
                request.index,
                instance.name,
                cursor,
                difficulty.name(),
                lane,
                is_road
            );

            cursor += instance.extent + self.geometry.interchunk_spacing;
            entry_lane = Some(lane);
            entropy_index += 1;
            chunks.push(instance);
        }

        let overflow = cursor - length;
        tracing::debug!(
            "Segment {} sequenced: {} chunks, overflow {:.2}",
            request.index,
            chunks.len(),
            overflow
        );

        Ok(SequencedSegment {
            segment: Segment::assemble(request.index, chunks, overflow, &self.geometry),
            last_entry_lane: entry_lane,
            next_entropy_index: entropy_index,
        })
    }
}

/// Entry lanes allowed after `previous`: any open lane for the first
/// chunk of a run, otherwise the open neighbours of `previous`.
fn entry_lanes(open: &[Lane], previous: Option<Lane>) -> Vec<Lane> {
    match previous {
        None => open.to_vec(),
        Some(previous) => previous
            .neighbors()
            .iter()
            .copied()
            .filter(|lane| open.contains(lane))
            .collect(),
    }
}
