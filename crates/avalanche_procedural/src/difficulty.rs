//! # Difficulty
//!
//! Difficulty modes, small copyable mode sets, and the distance-based
//! policy that decides which modes are allowed at a given point of the run.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Difficulty of a single chunk instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DifficultyMode {
    /// Escape lane kept clear, obstacle density halved.
    Easy = 0,
    /// Escape lane kept clear.
    Medium = 1,
    /// Only the entry lane is guaranteed.
    Hard = 2,
}

impl DifficultyMode {
    /// All modes, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Whether chunks at this difficulty keep an escape lane clear.
    #[inline]
    #[must_use]
    pub const fn has_escape_lane(self) -> bool {
        matches!(self, Self::Easy | Self::Medium)
    }

    /// Whether optional placements must also pass the extra coin flip.
    #[inline]
    #[must_use]
    pub const fn is_attenuated(self) -> bool {
        matches!(self, Self::Easy)
    }

    /// Lowercase name, as used in configs and maps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of difficulty modes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DifficultySet(u8);

impl DifficultySet {
    /// No modes.
    pub const EMPTY: Self = Self(0);
    /// Every mode.
    pub const ALL: Self = Self(0b111);

    /// Set holding a single mode.
    #[must_use]
    pub const fn single(mode: DifficultyMode) -> Self {
        Self(mode.bit())
    }

    /// Builds a set from a list of modes.
    #[must_use]
    pub fn of(modes: &[DifficultyMode]) -> Self {
        modes.iter().fold(Self::EMPTY, |set, mode| set.with(*mode))
    }

    /// Returns a copy of the set with `mode` added.
    #[must_use]
    pub const fn with(self, mode: DifficultyMode) -> Self {
        Self(self.0 | mode.bit())
    }

    /// Membership test.
    #[must_use]
    pub const fn contains(self, mode: DifficultyMode) -> bool {
        self.0 & mode.bit() != 0
    }

    /// Modes present in both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// True when no mode is present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of modes in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the modes, easiest first.
    pub fn iter(self) -> impl Iterator<Item = DifficultyMode> {
        DifficultyMode::ALL.into_iter().filter(move |mode| self.contains(*mode))
    }

    /// Uniformly random member, `None` for the empty set.
    pub fn random(self, rng: &mut dyn RngCore) -> Option<DifficultyMode> {
        if self.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..self.len());
        self.iter().nth(pick)
    }

    /// Converts to a list, easiest first.
    #[must_use]
    pub fn to_vec(self) -> Vec<DifficultyMode> {
        self.iter().collect()
    }
}

impl fmt::Debug for DifficultySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for DifficultySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, mode) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(mode.name())?;
        }
        f.write_str("]")
    }
}

impl From<DifficultyMode> for DifficultySet {
    fn from(mode: DifficultyMode) -> Self {
        Self::single(mode)
    }
}

impl FromIterator<DifficultyMode> for DifficultySet {
    fn from_iter<I: IntoIterator<Item = DifficultyMode>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Distance-based difficulty ramp.
///
/// ```text
/// distance:  0 ──── medium_from ──── easy_until ──── hard_from ────▶
/// easy:      ████████████████████████████
/// medium:                ████████████████████████████████████████
/// hard:                                              ████████████
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyPolicy {
    /// Distance at which medium chunks start appearing.
    pub medium_from: f32,
    /// Distance after which easy chunks stop appearing.
    pub easy_until: f32,
    /// Distance at which hard chunks start appearing.
    pub hard_from: f32,
}

impl DifficultyPolicy {
    /// Allowed modes at a distance down the slope.
    #[must_use]
    pub fn allowed_at(&self, distance: f32) -> DifficultySet {
        let mut set = DifficultySet::EMPTY;
        if distance < self.easy_until {
            set = set.with(DifficultyMode::Easy);
        }
        if distance >= self.medium_from {
            set = set.with(DifficultyMode::Medium);
        }
        if distance >= self.hard_from {
            set = set.with(DifficultyMode::Hard);
        }
        set
    }

    /// Checks that every reachable distance allows at least one mode.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken threshold.
    pub fn validate(&self) -> Result<(), String> {
        let thresholds = [self.medium_from, self.easy_until, self.hard_from];
        if thresholds.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err("difficulty thresholds must be finite and non-negative".into());
        }
        if self.medium_from > self.easy_until {
            return Err(format!(
                "medium_from ({}) must not exceed easy_until ({}), or no mode is allowed in between",
                self.medium_from, self.easy_until
            ));
        }
        Ok(())
    }
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self {
            medium_from: 300.0,
            easy_until: 900.0,
            hard_from: 1500.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_set_operations() {
        let easy_medium = DifficultySet::of(&[DifficultyMode::Easy, DifficultyMode::Medium]);
        let medium_hard: DifficultySet =
            [DifficultyMode::Medium, DifficultyMode::Hard].into_iter().collect();

        assert_eq!(easy_medium.len(), 2);
        assert!(easy_medium.contains(DifficultyMode::Easy));
        assert!(!easy_medium.contains(DifficultyMode::Hard));

        let both = easy_medium.intersection(medium_hard);
        assert_eq!(both, DifficultySet::single(DifficultyMode::Medium));
        assert!(DifficultySet::single(DifficultyMode::Easy)
            .intersection(DifficultySet::single(DifficultyMode::Hard))
            .is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(DifficultySet::ALL.to_string(), "[easy, medium, hard]");
        assert_eq!(DifficultySet::EMPTY.to_string(), "[]");
    }

    #[test]
    fn test_random_member() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let set = DifficultySet::of(&[DifficultyMode::Easy, DifficultyMode::Hard]);
        let mut seen_easy = false;
        let mut seen_hard = false;
        for _ in 0..200 {
            match set.random(&mut rng) {
                Some(DifficultyMode::Easy) => seen_easy = true,
                Some(DifficultyMode::Hard) => seen_hard = true,
                other => panic!("unexpected draw {other:?}"),
            }
        }
        assert!(seen_easy && seen_hard);
        assert_eq!(DifficultySet::EMPTY.random(&mut rng), None);
    }

    #[test]
    fn test_policy_ramp() {
        let policy = DifficultyPolicy::default();
        assert_eq!(policy.allowed_at(0.0), DifficultySet::single(DifficultyMode::Easy));
        assert_eq!(
            policy.allowed_at(500.0),
            DifficultySet::of(&[DifficultyMode::Easy, DifficultyMode::Medium])
        );
        assert_eq!(policy.allowed_at(1000.0), DifficultySet::single(DifficultyMode::Medium));
        assert_eq!(
            policy.allowed_at(10_000.0),
            DifficultySet::of(&[DifficultyMode::Medium, DifficultyMode::Hard])
        );
    }

    #[test]
    fn test_policy_never_empty() {
        let policy = DifficultyPolicy::default();
        assert!(policy.validate().is_ok());
        for step in 0..5000 {
            assert!(!policy.allowed_at(step as f32).is_empty());
        }
    }

    #[test]
    fn test_policy_rejects_gap() {
        let policy = DifficultyPolicy {
            medium_from: 1000.0,
            easy_until: 200.0,
            hard_from: 2000.0,
        };
        assert!(policy.validate().is_err());
    }
}
