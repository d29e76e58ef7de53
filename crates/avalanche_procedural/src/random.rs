//! # Random Source
//!
//! Every probabilistic decision goes through an injected `RngCore`.
//! There is no global generator: the same seed replays the same slope.

use rand::{Error, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::noise::WorldSeed;

/// Seedable PRNG used for placement decisions.
///
/// ChaCha8 is fast and its output is identical across platforms.
#[derive(Clone, Debug)]
pub struct TrackRng(ChaCha8Rng);

impl TrackRng {
    /// Creates a generator from a run seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed.value()))
    }
}

impl RngCore for TrackRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.try_fill_bytes(dest)
    }
}

/// Uniform draw in `[0, 1)`.
#[inline]
pub fn roll(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// True with probability `p`. Values at or below 0 never pass, values
/// above 1 always do.
#[inline]
pub fn chance(rng: &mut dyn RngCore, p: f32) -> bool {
    roll(rng) < p
}

/// Weighted pick over tagged variants.
///
/// Entries declare their own chance. If the chances add up to more than 1
/// they are normalized. Draws that match no entry fall through to the last
/// entry. Use [`WeightedChoice::or_else`] to name a catch-all that owns
/// `1 - sum(chances)` instead.
///
/// ```rust,ignore
/// static POOL: [(ObstacleType, f32); 2] = [(ObstacleType::Snowman, 0.2), (ObstacleType::Bonfire, 0.1)];
/// let pool = WeightedChoice::new(&POOL).or_else(ObstacleType::Tree);
/// // Tree is drawn 70% of the time
/// let kind: ObstacleType = pool.sample(&mut rng);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct WeightedChoice<'a, T> {
    entries: &'a [(T, f32)],
}

/// A [`WeightedChoice`] with a catch-all. Always yields a variant.
#[derive(Clone, Copy, Debug)]
pub struct WeightedTable<'a, T> {
    entries: &'a [(T, f32)],
    fallback: T,
}

impl<'a, T: Copy> WeightedChoice<'a, T> {
    /// Creates a choice without a catch-all.
    #[must_use]
    pub const fn new(entries: &'a [(T, f32)]) -> Self {
        Self { entries }
    }

    /// Adds the catch-all variant.
    #[must_use]
    pub fn or_else(self, fallback: T) -> WeightedTable<'a, T> {
        WeightedTable {
            entries: self.entries,
            fallback,
        }
    }

    /// Sum of the declared (non-negative) chances.
    #[must_use]
    pub fn declared_total(&self) -> f32 {
        declared_total(self.entries)
    }

    /// Draws one variant. `None` only when there are no entries.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Option<T> {
        self.pick(scaled_roll(self.entries, rng))
    }

    fn pick(&self, draw: f32) -> Option<T> {
        pick(self.entries, draw).or_else(|| self.entries.last().map(|(value, _)| *value))
    }
}

impl<'a, T: Copy> WeightedTable<'a, T> {
    /// Sum of the declared (non-negative) chances.
    #[must_use]
    pub fn declared_total(&self) -> f32 {
        declared_total(self.entries)
    }

    /// Draws one variant.
    pub fn sample(&self, rng: &mut dyn RngCore) -> T {
        self.pick(scaled_roll(self.entries, rng))
    }

    fn pick(&self, draw: f32) -> T {
        pick(self.entries, draw).unwrap_or(self.fallback)
    }
}

fn declared_total<T>(entries: &[(T, f32)]) -> f32 {
    entries.iter().map(|(_, chance)| chance.max(0.0)).sum()
}

/// Uniform draw over `[0, max(1, total))`.
fn scaled_roll<T>(entries: &[(T, f32)], rng: &mut dyn RngCore) -> f32 {
    roll(rng) * declared_total(entries).max(1.0)
}

/// First entry whose cumulative chance exceeds `draw`.
fn pick<T: Copy>(entries: &[(T, f32)], draw: f32) -> Option<T> {
    let mut cumulative = 0.0;
    for &(value, chance) in entries {
        cumulative += chance.max(0.0);
        if draw < cumulative {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Pick {
        A,
        B,
        Rest,
    }

    fn frequencies(table: &WeightedTable<'_, Pick>, draws: usize) -> [f32; 3] {
        let mut rng = TrackRng::new(WorldSeed::new(77));
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            match table.sample(&mut rng) {
                Pick::A => counts[0] += 1,
                Pick::B => counts[1] += 1,
                Pick::Rest => counts[2] += 1,
            }
        }
        counts.map(|c| c as f32 / draws as f32)
    }

    #[test]
    fn test_catch_all_takes_remainder() {
        let entries = [(Pick::A, 0.2), (Pick::B, 0.1)];
        let choice = WeightedChoice::new(&entries).or_else(Pick::Rest);
        let freq = frequencies(&choice, 20_000);

        assert!((freq[0] - 0.2).abs() < 0.02, "A drawn {}", freq[0]);
        assert!((freq[1] - 0.1).abs() < 0.02, "B drawn {}", freq[1]);
        assert!((freq[2] - 0.7).abs() < 0.02, "Rest drawn {}", freq[2]);
    }

    #[test]
    fn test_unmatched_falls_to_last_entry() {
        let entries = [(Pick::A, 0.25), (Pick::B, 0.25)];
        let choice = WeightedChoice::new(&entries);
        assert_eq!(choice.pick(0.9), Some(Pick::B));
        assert_eq!(choice.pick(0.1), Some(Pick::A));
    }

    #[test]
    fn test_overfull_chances_are_normalized() {
        let entries = [(Pick::A, 1.5), (Pick::B, 0.5)];
        let choice = WeightedChoice::new(&entries).or_else(Pick::Rest);
        let freq = frequencies(&choice, 20_000);

        assert!((freq[0] - 0.75).abs() < 0.02, "A drawn {}", freq[0]);
        assert!((freq[1] - 0.25).abs() < 0.02, "B drawn {}", freq[1]);
        assert!(freq[2] < 0.001, "catch-all must starve when chances exceed 1");
    }

    #[test]
    fn test_negative_chances_ignored() {
        let entries = [(Pick::A, -1.0), (Pick::B, 0.5)];
        let choice = WeightedChoice::new(&entries).or_else(Pick::Rest);
        assert_eq!(choice.pick(0.0), Pick::B);
        assert_eq!(choice.pick(0.6), Pick::Rest);
    }

    #[test]
    fn test_empty_choice() {
        let entries: [(Pick, f32); 0] = [];
        let mut rng = TrackRng::new(WorldSeed::new(1));
        assert_eq!(WeightedChoice::new(&entries).sample(&mut rng), None);
        assert_eq!(WeightedChoice::new(&entries).or_else(Pick::Rest).sample(&mut rng), Pick::Rest);
    }

    #[test]
    fn test_chance_bounds() {
        let mut rng = TrackRng::new(WorldSeed::new(3));
        for _ in 0..1000 {
            assert!(!chance(&mut rng, 0.0));
            assert!(!chance(&mut rng, -0.5));
            assert!(chance(&mut rng, 1.0));
            assert!(chance(&mut rng, 1.5));
        }
    }

    #[test]
    fn test_rng_is_replayable() {
        let mut a = TrackRng::new(WorldSeed::new(2024));
        let mut b = TrackRng::new(WorldSeed::new(2024));
        for _ in 0..64 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = TrackRng::new(WorldSeed::new(3));
        for _ in 0..500 {
            assert!(!chance(&mut rng, 0.0));
            assert!(chance(&mut rng, 1.0));
        }
    }
}
