//! # Simplex Noise
//!
//! Deterministic 2D noise shared by the cosmetic snow height field and
//! the per-chunk decoration jitter.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation will produce
//! **exactly** the same values on any platform, any time.
//!
//! Noise never decides *whether* an obstacle is placed. That is the job of
//! the injected RNG. Noise only shapes how things look.

use serde::{Deserialize, Serialize};

/// Run seed for deterministic generation.
///
/// Every random stream of a run derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new run seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., snow bumps).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x5EED_0F_5A0E)
    }
}

/// Purpose tags for [`WorldSeed::derive`].
pub mod streams {
    /// Obstacle placement RNG.
    pub const PLACEMENT: u64 = 1;
    /// Decoration jitter noise.
    pub const DECORATION: u64 = 2;
    /// Snow bump noise.
    pub const SNOW: u64 = 3;
}

/// Seeded permutation table.
struct PermutationTable {
    /// 256 entries, doubled so lookups never wrap.
    perm: [u8; 512],
}

impl PermutationTable {
    /// 2D simplex gradients.
    const GRADIENTS: [[i8; 2]; 12] = [
        [1, 0], [1, 1], [0, 1], [-1, 1],
        [-1, 0], [-1, -1], [0, -1], [1, -1],
        [1, 0], [0, 1], [-1, 0], [0, -1],
    ];

    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates with xorshift64. Zero would lock xorshift at zero.
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(hash: u8) -> [i8; 2] {
        Self::GRADIENTS[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous values in the range [-1, 1].
pub struct SimplexNoise {
    table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor: (sqrt(3) - 1) / 2
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskewing factor: (3 - sqrt(3)) / 6
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a new noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            table: PermutationTable::new(seed),
        }
    }

    /// Samples noise at `(x, y)`. Returns a value in [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle of the skewed cell
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let t = &self.table;
        let g0 = t.get(ii + t.get(jj) as usize);
        let g1 = t.get(ii + i1 + t.get(jj + j1) as usize);
        let g2 = t.get(ii + 1 + t.get(jj + 1) as usize);

        // 70 scales the corner sum to [-1, 1]
        70.0 * (corner(x0, y0, g0) + corner(x1, y1, g1) + corner(x2, y2, g2))
    }
}

/// Contribution of one simplex corner.
#[inline]
fn corner(x: f64, y: f64, hash: u8) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let grad = PermutationTable::gradient(hash);
    let t2 = t * t;
    t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
}

#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}

/// Cosmetic snow height field.
///
/// Four octaves of simplex noise; each octave halves the amplitude and
/// doubles the frequency. Never affects gameplay.
pub struct SnowBumps {
    noise: SimplexNoise,
    /// Peak amplitude of the first octave (world units).
    height: f32,
    /// Base frequency of the first octave.
    frequency: f64,
}

impl SnowBumps {
    /// Octaves summed per sample.
    pub const OCTAVES: u32 = 4;
    /// Amplitude multiplier per octave.
    pub const PERSISTENCE: f64 = 0.5;
    /// Frequency multiplier per octave.
    pub const LACUNARITY: f64 = 2.0;

    /// Creates a height field.
    #[must_use]
    pub fn new(seed: WorldSeed, height: f32, frequency: f64) -> Self {
        Self {
            noise: SimplexNoise::new(seed),
            height,
            frequency,
        }
    }

    /// Height offset at world `(x, z)`.
    ///
    /// Bounded by `height * (1 + 0.5 + 0.25 + 0.125)`.
    #[must_use]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;

        for _ in 0..Self::OCTAVES {
            total += self.noise.sample(f64::from(x) * frequency, f64::from(z) * frequency) * amplitude;
            amplitude *= Self::PERSISTENCE;
            frequency *= Self::LACUNARITY;
        }

        total as f32 * self.height
    }

    /// Largest absolute value [`Self::height`] can return.
    #[must_use]
    pub fn max_height(&self) -> f32 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..Self::OCTAVES {
            sum += amplitude;
            amplitude *= Self::PERSISTENCE;
        }
        sum as f32 * self.height.abs()
    }
}
