//! # Track Stream
//!
//! Keeps a bounded window of segments around the player.
//!
//! ```text
//!   evicted        active window                    not generated yet
//!   ───────┤ seg n-1 │ seg n (player) │ seg n+1 │ seg n+2 ├──────────
//!                                       └── lookahead ──┘
//! ```
//!
//! The stream is driven by the game's frame loop through
//! [`TrackStream::update`]. Segments are generated strictly in index
//! order, so the sequencer state (entry lane, overflow, entropy counter)
//! flows from one segment to the next and the same seed always yields the
//! same slope.

use std::collections::VecDeque;

use avalanche_shared::TrackEvent;

use crate::chunk::Chunk;
use crate::config::TrackConfig;
use crate::difficulty::DifficultySet;
use crate::error::TrackResult;
use crate::lane::Lane;
use crate::noise::{streams, SnowBumps};
use crate::random::TrackRng;
use crate::segment::Segment;
use crate::sequencer::{SegmentRequest, Sequencer};

/// Counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Segments generated since creation.
    pub segments_generated: u64,
    /// Segments dropped from the window.
    pub segments_evicted: u64,
    /// Chunk instances generated.
    pub chunks_generated: u64,
}

/// Sliding window of generated segments.
pub struct TrackStream {
    config: TrackConfig,
    sequencer: Sequencer,
    rng: TrackRng,
    snow: SnowBumps,
    window: VecDeque<Segment>,
    next_index: u64,
    overflow: f32,
    last_entry_lane: Option<Lane>,
    entropy_index: u64,
    difficulty_override: Option<DifficultySet>,
    events: Vec<TrackEvent>,
    stats: StreamStats,
}

impl TrackStream {
    /// Creates a stream over the built-in catalog.
    ///
    /// # Errors
    ///
    /// [`crate::TrackError::InvalidConfig`] if the config does not validate.
    pub fn new(config: TrackConfig) -> TrackResult<Self> {
        Self::with_custom_map(config, Vec::new())
    }

    /// Creates a stream over a custom map, or the built-in catalog when
    /// `custom` is empty.
    ///
    /// # Errors
    ///
    /// [`crate::TrackError::InvalidConfig`] if the config does not validate,
    /// [`crate::TrackError::MalformedCustomMap`] if a custom chunk blocks
    /// every lane or is as long as a segment.
    pub fn with_custom_map(config: TrackConfig, custom: Vec<Chunk>) -> TrackResult<Self> {
        config.validate()?;

        let seed = config.seed;
        let sequencer =
            Sequencer::with_custom_map(custom, config.geometry, config.road_chance, seed)?;
        let snow = SnowBumps::new(
            seed.derive(streams::SNOW),
            config.snow.bump_height,
            config.snow.bump_frequency,
        );
        let capacity = config.max_active_segments;

        Ok(Self {
            rng: TrackRng::new(seed.derive(streams::PLACEMENT)),
            sequencer,
            snow,
            window: VecDeque::with_capacity(capacity),
            next_index: 0,
            overflow: 0.0,
            last_entry_lane: None,
            entropy_index: 0,
            difficulty_override: None,
            events: Vec::with_capacity(capacity * 2),
            stats: StreamStats::default(),
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Forces the allowed difficulties for every new segment, or restores
    /// the distance-based policy with `None`.
    pub fn set_difficulty_override(&mut self, allowed: Option<DifficultySet>) {
        self.difficulty_override = allowed;
    }

    /// Difficulties allowed for a segment starting at `distance`.
    #[must_use]
    pub fn allowed_at(&self, distance: f32) -> DifficultySet {
        self.difficulty_override
            .unwrap_or_else(|| self.config.difficulty.allowed_at(distance))
    }

    /// Generates segments up to and including `index`.
    ///
    /// Returns `false` when `index` was already generated, even if it has
    /// since been evicted.
    ///
    /// # Errors
    ///
    /// [`crate::TrackError::EmptyCandidatePool`] if the catalog cannot serve
    /// the allowed difficulties.
    pub fn ensure_segment(&mut self, index: u64) -> TrackResult<bool> {
        if index < self.next_index {
            return Ok(false);
        }
        while self.next_index <= index {
            self.generate_next()?;
        }
        Ok(true)
    }

    fn generate_next(&mut self) -> TrackResult<()> {
        let index = self.next_index;
        let start = index as f32 * self.config.geometry.segment_length;
        let request = SegmentRequest {
            index,
            previous_overflow: self.overflow,
            previous_entry_lane: self.last_entry_lane,
            allowed: self.allowed_at(start),
            first_entropy_index: self.entropy_index,
        };

        let out = self.sequencer.generate_segment(&request, &mut self.rng)?;
        let segment = out.segment;

        self.overflow = segment.overflow;
        self.last_entry_lane = out.last_entry_lane;
        self.entropy_index = out.next_entropy_index;
        self.next_index += 1;
        self.stats.segments_generated += 1;
        self.stats.chunks_generated += segment.chunks.len() as u64;

        self.events.push(TrackEvent::SegmentSpawned {
            index,
            origin: segment.origin(),
            obstacle_count: segment.obstacle_count(),
        });
        tracing::debug!(
            "Spawned segment {} ({} chunks, {} obstacles)",
            index,
            segment.chunks.len(),
            segment.obstacle_count()
        );

        self.window.push_back(segment);
        while self.window.len() > self.config.max_active_segments {
            self.evict_front();
        }
        Ok(())
    }

    fn evict_front(&mut self) {
        if let Some(segment) = self.window.pop_front() {
            tracing::info!("Evicted segment {}", segment.index);
            self.events.push(TrackEvent::SegmentEvicted { index: segment.index });
            self.stats.segments_evicted += 1;
        }
    }

    /// Advances the window for a player `player_distance` down the slope.
    ///
    /// Generates the player's segment plus the lookahead, then drops every
    /// segment the player has passed by more than one segment length. A
    /// segment counts as passed once its furthest chunk is, not its nominal
    /// end.
    /// Returns how many segments were generated.
    ///
    /// # Errors
    ///
    /// Propagates generation errors from [`Self::ensure_segment`].
    pub fn update(&mut self, player_distance: f32) -> TrackResult<usize> {
        let length = self.config.geometry.segment_length;
        let current = (player_distance.max(0.0) / length).floor() as u64;
        let before = self.next_index;
        self.ensure_segment(current + self.config.lookahead_segments as u64)?;

        while self
            .window
            .front()
            .is_some_and(|segment| segment.reach_distance() + length <= player_distance)
        {
            self.evict_front();
        }

        Ok((self.next_index - before) as usize)
    }

    /// Takes the events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<TrackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Active segments, oldest first.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.window.iter()
    }

    /// Number of active segments.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.window.len()
    }

    /// Active segment by index.
    #[must_use]
    pub fn segment(&self, index: u64) -> Option<&Segment> {
        self.window.iter().find(|segment| segment.index == index)
    }

    /// Index the next generated segment will get.
    #[must_use]
    pub const fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Cosmetic snow height at world `(x, z)`.
    #[must_use]
    pub fn snow_height(&self, x: f32, z: f32) -> f32 {
        self.snow.height(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::difficulty::DifficultyMode;
    use crate::error::TrackError;
    use crate::noise::WorldSeed;
    use avalanche_shared::EventType;

    fn stream(seed: u64) -> TrackStream {
        TrackStream::new(TrackConfig {
            seed: WorldSeed::new(seed),
            ..TrackConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_update_generates_lookahead() {
        let mut stream = stream(1);
        let generated = stream.update(0.0).unwrap();
        assert_eq!(generated, 3);
        assert_eq!(stream.active_count(), 3);

        let events = stream.drain_events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.event_type() == EventType::SegmentSpawned));
        assert!(stream.drain_events().is_empty());
    }

    #[test]
    fn test_ensure_segment_is_idempotent() {
        let mut stream = stream(2);
        assert!(stream.ensure_segment(1).unwrap());
        assert!(!stream.ensure_segment(1).unwrap());
        assert!(!stream.ensure_segment(0).unwrap());
        assert_eq!(stream.stats().segments_generated, 2);
    }

    #[test]
    fn test_eviction_behind_player() {
        let mut stream = stream(3);
        let length = stream.config().geometry.segment_length;
        stream.update(0.0).unwrap();
        stream.drain_events();

        // Player is inside segment 2: segment 0 ended two lengths ago.
        stream.update(length * 2.0 + 1.0).unwrap();
        let evicted: Vec<u64> = stream
            .drain_events()
            .iter()
            .filter(|e| e.event_type() == EventType::SegmentEvicted)
            .map(TrackEvent::segment_index)
            .collect();
        assert_eq!(evicted, vec![0]);
        assert!(stream.segment(0).is_none());
        assert!(stream.segment(1).is_some());
        assert!(stream.active_count() <= stream.config().max_active_segments);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut stream = stream(4);
        let length = stream.config().geometry.segment_length;
        for step in 0..200 {
            stream.update(step as f32 * length * 0.37).unwrap();
            assert!(stream.active_count() <= stream.config().max_active_segments);
        }
    }

    #[test]
    fn test_same_seed_same_slope() {
        let mut a = stream(5);
        let mut b = stream(5);
        a.ensure_segment(6).unwrap();
        b.ensure_segment(6).unwrap();
        for (x, y) in a.segments().zip(b.segments()) {
            assert_eq!(x.obstacle_count(), y.obstacle_count());
            for (p, q) in x.obstacles().zip(y.obstacles()) {
                assert_eq!(p, q);
            }
        }
    }

    #[test]
    fn test_difficulty_override() {
        let mut stream = stream(6);
        let hard = DifficultySet::single(DifficultyMode::Hard);
        stream.set_difficulty_override(Some(hard));
        assert_eq!(stream.allowed_at(0.0), hard);
        stream.update(0.0).unwrap();
        for segment in stream.segments() {
            assert!(segment
                .chunks
                .iter()
                .all(|chunk| chunk.request.difficulty == DifficultyMode::Hard));
        }
        stream.set_difficulty_override(None);
        assert_eq!(stream.allowed_at(0.0), DifficultySet::single(DifficultyMode::Easy));
    }

    #[test]
    fn test_snow_is_bounded() {
        let stream = stream(7);
        let limit = stream.config().snow.bump_height * 1.875 + 1e-4;
        for i in 0..500 {
            assert!(stream.snow_height(i as f32 * 0.3 - 3.0, -(i as f32)).abs() <= limit);
        }
    }

    #[test]
    fn test_spilling_chunks_outlive_nominal_end() {
        // 100 units per chunk: segment 0 holds chunks at 0 and 108, reaching 208.
        let long = Chunk::authored("long", 11, 10.0, DifficultySet::ALL, false, Vec::new());
        let mut stream = TrackStream::with_custom_map(TrackConfig::default(), vec![long]).unwrap();
        let length = stream.config().geometry.segment_length;

        stream.update(0.0).unwrap();
        let first = stream.segment(0).unwrap();
        assert!((first.reach_distance() - 208.0).abs() < 1e-3);
        assert!(first.reach_distance() > first.end_distance());

        // Past the nominal end by a full length, but not past the last chunk.
        stream.update(2.0 * length + 10.0).unwrap();
        assert!(stream.segment(0).is_some());

        stream.update(208.0 + length + 1.0).unwrap();
        assert!(stream.segment(0).is_none());
        assert!(stream.segment(1).is_some());
    }

    #[test]
    fn test_rejects_chunk_longer_than_segment() {
        let huge = Chunk::authored("huge", 40, 10.0, DifficultySet::ALL, false, Vec::new());
        let err = TrackStream::with_custom_map(TrackConfig::default(), vec![huge]).err();
        assert!(matches!(err, Some(TrackError::MalformedCustomMap(msg)) if msg.contains("huge")));
    }
}
