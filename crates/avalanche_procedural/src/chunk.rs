//! # Chunk System
//!
//! A chunk is a short, named template of obstacle rows. The slope is built
//! by stitching chunk instances end to end.
//!
//! ## Chunk Layout
//!
//! ```text
//!   row 0        row 1        row 2             row length-1
//!   ├─spacing────┼─spacing────┼── ... ──────────┤
//!   L  M  R      L  M  R      L  M  R           L  M  R
//! ```
//!
//! Templates are stateless. Every invocation gets a fresh [`ChunkContext`]
//! that enforces the playability rules:
//!
//! - the entry lane never receives a blocking obstacle
//! - on easy/medium an escape lane next to it stays clear too
//! - a long obstacle blocks the next row of its lane

use std::fmt;

use avalanche_shared::Vec3;
use rand::RngCore;

use crate::difficulty::{DifficultyMode, DifficultySet};
use crate::lane::Lane;
use crate::noise::SimplexNoise;
use crate::obstacle::{Obstacle, ObstacleType, RampConfig};
use crate::random;

/// Procedural template body. Pushes obstacles into the context.
pub type ChunkGenerator = fn(&mut ChunkContext<'_>);

/// How a chunk produces its obstacles.
#[derive(Clone)]
pub enum ChunkLayout {
    /// Built-in template.
    Procedural(ChunkGenerator),
    /// Fixed obstacle list from the level editor (chunk-local coordinates).
    Authored(Vec<Obstacle>),
}

impl fmt::Debug for ChunkLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Procedural(_) => f.write_str("Procedural"),
            Self::Authored(obstacles) => f.debug_tuple("Authored").field(&obstacles.len()).finish(),
        }
    }
}

/// A chunk template.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Template name.
    pub name: String,
    /// Number of rows.
    pub length: usize,
    /// Distance between rows.
    pub obstacle_spacing: f32,
    /// Difficulties this template can be generated at.
    pub possible_difficulties: DifficultySet,
    /// Whether the template has a road variant.
    pub can_be_road: bool,
    /// Obstacle source.
    pub layout: ChunkLayout,
}

/// Parameters of one chunk invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRequest {
    /// Lane the player is assumed to occupy when entering.
    pub entry_lane: Lane,
    /// Running chunk counter, varies decoration between instances.
    pub entropy_index: u64,
    /// Difficulty of this instance.
    pub difficulty: DifficultyMode,
    /// Road variant.
    pub is_road: bool,
}

/// Shared inputs for every chunk invocation of a run.
pub struct GenerationEnv<'a> {
    /// Distance between lane centers.
    pub lane_width: f32,
    /// Decoration noise.
    pub noise: &'a SimplexNoise,
}

impl Chunk {
    /// Creates a procedural template.
    #[must_use]
    pub fn procedural(
        name: &str,
        length: usize,
        obstacle_spacing: f32,
        possible_difficulties: DifficultySet,
        can_be_road: bool,
        generator: ChunkGenerator,
    ) -> Self {
        Self {
            name: name.to_owned(),
            length,
            obstacle_spacing,
            possible_difficulties,
            can_be_road,
            layout: ChunkLayout::Procedural(generator),
        }
    }

    /// Creates a chunk from a fixed, authored obstacle list.
    #[must_use]
    pub fn authored(
        name: &str,
        length: usize,
        obstacle_spacing: f32,
        possible_difficulties: DifficultySet,
        can_be_road: bool,
        obstacles: Vec<Obstacle>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            length,
            obstacle_spacing,
            possible_difficulties,
            can_be_road,
            layout: ChunkLayout::Authored(obstacles),
        }
    }

    /// Distance from the first row to the last row.
    #[inline]
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.length.saturating_sub(1) as f32 * self.obstacle_spacing
    }

    /// Distance from row 0 to the furthest row or authored obstacle.
    #[must_use]
    pub fn reach(&self) -> f32 {
        match &self.layout {
            ChunkLayout::Procedural(_) => self.extent(),
            ChunkLayout::Authored(obstacles) => obstacles
                .iter()
                .map(Obstacle::distance)
                .fold(self.extent(), f32::max),
        }
    }

    /// Lanes a player can enter without meeting a blocking obstacle.
    ///
    /// Procedural chunks protect whichever entry lane they are given.
    #[must_use]
    pub fn open_lanes(&self, lane_width: f32) -> Vec<Lane> {
        match &self.layout {
            ChunkLayout::Procedural(_) => Lane::ALL.to_vec(),
            ChunkLayout::Authored(obstacles) => Lane::ALL
                .into_iter()
                .filter(|&lane| {
                    !obstacles
                        .iter()
                        .any(|o| o.kind.is_blocking() && o.lane(lane_width) == lane)
                })
                .collect(),
        }
    }

    /// Whether the template supports at least one mode of `allowed`.
    #[inline]
    #[must_use]
    pub fn supports_any(&self, allowed: DifficultySet) -> bool {
        !self.possible_difficulties.intersection(allowed).is_empty()
    }

    /// Generates chunk-local obstacles.
    pub fn generate(
        &self,
        request: ChunkRequest,
        env: &GenerationEnv<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<Obstacle> {
        self.instantiate(request, 0.0, env, rng).obstacles
    }

    /// Generates an instance starting `start` units into its segment.
    pub fn instantiate(
        &self,
        request: ChunkRequest,
        start: f32,
        env: &GenerationEnv<'_>,
        rng: &mut dyn RngCore,
    ) -> ChunkInstance {
        let (obstacles, escape_lane, escape_from_row) = match &self.layout {
            ChunkLayout::Procedural(generator) => {
                let mut ctx = ChunkContext::new(self, request, env, rng);
                generator(&mut ctx);
                (ctx.obstacles, ctx.escape_lane, ctx.escape_from_row)
            }
            ChunkLayout::Authored(obstacles) => (obstacles.clone(), None, self.length),
        };

        let furthest = obstacles
            .iter()
            .map(Obstacle::distance)
            .fold(0.0_f32, f32::max);
        let extent = self.extent().max(furthest);

        ChunkInstance {
            name: self.name.clone(),
            request,
            escape_lane,
            escape_from_row,
            start,
            extent,
            length: self.length,
            obstacle_spacing: self.obstacle_spacing,
            lane_width: env.lane_width,
            obstacles: obstacles.into_iter().map(|o| o.shifted(start)).collect(),
        }
    }
}

/// One generated chunk inside a segment.
#[derive(Clone, Debug)]
pub struct ChunkInstance {
    /// Template name.
    pub name: String,
    /// Invocation parameters.
    pub request: ChunkRequest,
    /// Escape lane, if the instance reserved one.
    pub escape_lane: Option<Lane>,
    /// First row from which the escape lane is kept clear.
    pub escape_from_row: usize,
    /// Segment-local distance of row 0.
    pub start: f32,
    /// Distance from row 0 to the furthest row or obstacle.
    pub extent: f32,
    /// Number of rows.
    pub length: usize,
    /// Distance between rows.
    pub obstacle_spacing: f32,
    /// Distance between lane centers.
    pub lane_width: f32,
    /// Segment-local obstacles.
    pub obstacles: Vec<Obstacle>,
}

impl ChunkInstance {
    /// Segment-local distance where the instance ends.
    #[inline]
    #[must_use]
    pub fn end(&self) -> f32 {
        self.start + self.extent
    }

    /// Lane and row of an obstacle of this instance.
    #[must_use]
    pub fn cell_of(&self, obstacle: &Obstacle) -> (Lane, usize) {
        let row = ((obstacle.distance() - self.start) / self.obstacle_spacing)
            .round()
            .max(0.0) as usize;
        (obstacle.lane(self.lane_width), row)
    }

    /// Whether the playability rules reserve this cell.
    #[must_use]
    pub fn is_protected(&self, lane: Lane, row: usize) -> bool {
        protected(self.request.entry_lane, self.escape_lane, self.escape_from_row, lane, row)
    }

    /// Obstacles standing in a given cell.
    pub fn obstacles_at(&self, lane: Lane, row: usize) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles
            .iter()
            .filter(move |o| self.cell_of(o) == (lane, row))
    }
}

#[inline]
fn protected(entry: Lane, escape: Option<Lane>, escape_from_row: usize, lane: Lane, row: usize) -> bool {
    lane == entry || (escape == Some(lane) && row >= escape_from_row)
}

/// Resting height of rewards above the snow.
pub const REWARD_HEIGHT: f32 = 0.8;
/// Height of rewards hanging in a jump arc.
pub const AIR_HEIGHT: f32 = 3.2;

/// Mutable state of one template invocation.
///
/// Templates only talk to the context: it knows the protected cells,
/// converts lanes and rows into positions, and owns the RNG handle.
pub struct ChunkContext<'a> {
    request: ChunkRequest,
    length: usize,
    spacing: f32,
    lane_width: f32,
    noise: &'a SimplexNoise,
    rng: &'a mut dyn RngCore,
    escape_lane: Option<Lane>,
    escape_from_row: usize,
    obstacles: Vec<Obstacle>,
    /// Cells holding a blocking obstacle, and whether it is long.
    blocked: Vec<(Lane, usize, bool)>,
    power_up_placed: bool,
}

impl<'a> ChunkContext<'a> {
    /// Easy-mode extra coin flip.
    pub const ATTENUATION: f32 = 0.5;

    fn new(
        chunk: &Chunk,
        request: ChunkRequest,
        env: &GenerationEnv<'a>,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        let escape_lane = request
            .difficulty
            .has_escape_lane()
            .then(|| request.entry_lane.escape_for(&mut *rng));

        Self {
            request,
            length: chunk.length,
            spacing: chunk.obstacle_spacing,
            lane_width: env.lane_width,
            noise: env.noise,
            rng,
            escape_lane,
            escape_from_row: if escape_lane.is_some() { 0 } else { chunk.length },
            obstacles: Vec::with_capacity(chunk.length * 3),
            blocked: Vec::with_capacity(chunk.length * 2),
            power_up_placed: false,
        }
    }

    /// Invocation parameters.
    #[inline]
    #[must_use]
    pub const fn request(&self) -> ChunkRequest {
        self.request
    }

    /// Entry lane.
    #[inline]
    #[must_use]
    pub const fn entry_lane(&self) -> Lane {
        self.request.entry_lane
    }

    /// Difficulty of this instance.
    #[inline]
    #[must_use]
    pub const fn difficulty(&self) -> DifficultyMode {
        self.request.difficulty
    }

    /// Road variant.
    #[inline]
    #[must_use]
    pub const fn is_road(&self) -> bool {
        self.request.is_road
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Index of the last row.
    #[inline]
    #[must_use]
    pub const fn last_row(&self) -> usize {
        self.length.saturating_sub(1)
    }

    /// Escape lane, if reserved.
    #[inline]
    #[must_use]
    pub const fn escape_lane(&self) -> Option<Lane> {
        self.escape_lane
    }

    /// Returns the escape lane, reserving one if the difficulty did not.
    ///
    /// A lane reserved here is only protected from `from_row` on.
    pub fn reserve_escape_lane(&mut self, from_row: usize) -> Lane {
        if let Some(lane) = self.escape_lane {
            return lane;
        }
        let lane = self.request.entry_lane.escape_for(&mut *self.rng);
        self.escape_lane = Some(lane);
        self.escape_from_row = from_row;
        lane
    }

    /// Whether the playability rules reserve this cell.
    #[inline]
    #[must_use]
    pub fn is_protected(&self, lane: Lane, row: usize) -> bool {
        protected(self.request.entry_lane, self.escape_lane, self.escape_from_row, lane, row)
    }

    /// Whether a power-up was already placed in this instance.
    #[inline]
    #[must_use]
    pub const fn power_up_placed(&self) -> bool {
        self.power_up_placed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn roll(&mut self) -> f32 {
        random::roll(&mut *self.rng)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        random::chance(&mut *self.rng, p)
    }

    /// Chance for an optional placement; easy adds a 50% coin flip.
    pub fn optional(&mut self, p: f32) -> bool {
        self.chance(p) && (!self.request.difficulty.is_attenuated() || self.chance(Self::ATTENUATION))
    }

    /// RNG handle for helpers that need a raw draw.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    /// Chunk-local position of a cell.
    #[must_use]
    pub fn cell_position(&self, lane: Lane, row: usize, height: f32) -> Vec3 {
        Vec3::new(lane.x(self.lane_width), height, -(row as f32 * self.spacing))
    }

    fn blocked_at(&self, lane: Lane, row: usize) -> Option<bool> {
        self.blocked
            .iter()
            .find(|(l, r, _)| *l == lane && *r == row)
            .map(|(_, _, long)| *long)
    }

    /// Places a blocking obstacle, honoring every placement rule.
    ///
    /// Returns `false` when the cell is taken or protected, or when a long
    /// obstacle is involved: one in the previous row of the lane, or a new
    /// one that would run into an occupied or protected next row.
    pub fn place(&mut self, kind: ObstacleType, lane: Lane, row: usize) -> bool {
        debug_assert!(kind.is_blocking(), "use place_reward/place_ramp for {kind:?}");
        if row >= self.length || self.is_protected(lane, row) {
            return false;
        }
        if row > 0 && self.blocked_at(lane, row - 1) == Some(true) {
            return false;
        }
        if kind.is_long()
            && (self.blocked_at(lane, row + 1).is_some() || self.is_protected(lane, row + 1))
        {
            return false;
        }
        if self.blocked_at(lane, row).is_some() {
            return false;
        }

        let obstacle = self.decorate(Obstacle::new(kind, self.cell_position(lane, row, 0.0)), lane, row);
        self.obstacles.push(obstacle);
        self.blocked.push((lane, row, kind.is_long()));
        true
    }

    /// Places a ramp. Ramps are traversable and allowed in the entry lane.
    pub fn place_ramp(&mut self, lane: Lane, row: usize, config: RampConfig) {
        let position = self.cell_position(lane, row, 0.0);
        self.obstacles.push(Obstacle::ramp(position, config));
    }

    /// Places a reward at `height` above the snow.
    pub fn place_reward(&mut self, kind: ObstacleType, lane: Lane, row: usize, height: f32) {
        debug_assert!(kind.is_reward(), "{kind:?} is not a reward");
        if kind.is_power_up() {
            self.power_up_placed = true;
        }
        let position = self.cell_position(lane, row, height);
        self.obstacles.push(Obstacle::new(kind, position));
    }

    /// Noise-driven yaw and scale so repeated trees do not look stamped.
    fn decorate(&self, obstacle: Obstacle, lane: Lane, row: usize) -> Obstacle {
        if obstacle.kind != ObstacleType::Tree {
            return obstacle;
        }
        let u = self.request.entropy_index as f64 * 0.37 + lane.index() as f64 * 1.91;
        let v = row as f64 * 0.61;
        let yaw = self.noise.sample(u, v) as f32 * std::f32::consts::PI;
        let scale = 1.0 + 0.2 * self.noise.sample(u + 17.0, v - 5.0) as f32;
        obstacle
            .with_rotation(Vec3::new(0.0, yaw, 0.0))
            .with_scale(scale)
    }
}
