//! # Lanes
//!
//! The slope is three lanes wide. All placement logic reasons in lane
//! space; world X is only produced when an obstacle is emitted.

use avalanche_shared::LANE_COUNT;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// One of the three discrete horizontal positions on the slope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Lane {
    /// Leftmost lane (index 0).
    Left = 0,
    /// Center lane (index 1).
    Middle = 1,
    /// Rightmost lane (index 2).
    Right = 2,
}

impl Lane {
    /// All lanes, left to right.
    pub const ALL: [Self; LANE_COUNT] = [Self::Left, Self::Middle, Self::Right];

    /// Returns the lane index (0-2).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converts an index to a lane. Out-of-range indices yield `None`.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    /// World X coordinate of the lane center.
    #[inline]
    #[must_use]
    pub fn x(self, lane_width: f32) -> f32 {
        (self.index() as f32 - 1.0) * lane_width
    }

    /// Nearest lane to a world X coordinate (clamped to the slope).
    #[must_use]
    pub fn from_x(x: f32, lane_width: f32) -> Self {
        let offset = (x / lane_width).round();
        if offset <= -1.0 {
            Self::Left
        } else if offset >= 1.0 {
            Self::Right
        } else {
            Self::Middle
        }
    }

    /// Returns true for the two outer lanes.
    #[inline]
    #[must_use]
    pub const fn is_side(self) -> bool {
        !matches!(self, Self::Middle)
    }

    /// Mirrors the lane across the center line.
    #[inline]
    #[must_use]
    pub const fn mirror(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Middle => Self::Middle,
            Self::Right => Self::Left,
        }
    }

    /// Lanes exactly one step away.
    #[must_use]
    pub const fn neighbors(self) -> &'static [Self] {
        match self {
            Self::Left => &[Self::Middle],
            Self::Middle => &[Self::Left, Self::Right],
            Self::Right => &[Self::Middle],
        }
    }

    /// Absolute lane distance.
    #[inline]
    #[must_use]
    pub const fn distance(self, other: Self) -> usize {
        self.index().abs_diff(other.index())
    }

    /// Uniformly random lane.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::ALL[rng.gen_range(0..LANE_COUNT)]
    }

    /// Uniformly random outer lane.
    pub fn random_side(rng: &mut dyn RngCore) -> Self {
        if rng.gen_bool(0.5) {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Random lane exactly one step away from this one.
    pub fn random_neighbor(self, rng: &mut dyn RngCore) -> Self {
        let neighbors = self.neighbors();
        neighbors[rng.gen_range(0..neighbors.len())]
    }

    /// Picks the escape lane for this entry lane.
    ///
    /// From the middle a random side is chosen, from a side it is the middle.
    pub fn escape_for(self, rng: &mut dyn RngCore) -> Self {
        match self {
            Self::Middle => Self::random_side(rng),
            Self::Left | Self::Right => Self::Middle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_index_round_trip() {
        for lane in Lane::ALL {
            assert_eq!(Lane::from_index(lane.index()), Some(lane));
        }
        assert_eq!(Lane::from_index(3), None);
    }

    #[test]
    fn test_world_x_and_back() {
        let width = 2.5;
        assert_eq!(Lane::Left.x(width), -2.5);
        assert_eq!(Lane::Middle.x(width), 0.0);
        assert_eq!(Lane::Right.x(width), 2.5);

        for lane in Lane::ALL {
            assert_eq!(Lane::from_x(lane.x(width) + 0.4, width), lane);
        }
        assert_eq!(Lane::from_x(-40.0, width), Lane::Left);
        assert_eq!(Lane::from_x(40.0, width), Lane::Right);
    }

    #[test]
    fn test_neighbors_are_one_step() {
        for lane in Lane::ALL {
            for neighbor in lane.neighbors() {
                assert_eq!(lane.distance(*neighbor), 1);
            }
        }
    }

    #[test]
    fn test_escape_lane_is_adjacent() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            for lane in Lane::ALL {
                let escape = lane.escape_for(&mut rng);
                assert_eq!(lane.distance(escape), 1);
            }
        }
        assert_eq!(Lane::Left.escape_for(&mut rng), Lane::Middle);
        assert_eq!(Lane::Right.escape_for(&mut rng), Lane::Middle);
    }

    #[test]
    fn test_random_neighbor_never_stays() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut lane = Lane::Middle;
        for _ in 0..1000 {
            let next = lane.random_neighbor(&mut rng);
            assert_eq!(lane.distance(next), 1);
            lane = next;
        }
    }
}
