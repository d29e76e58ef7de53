//! # Obstacles
//!
//! Obstacle descriptors handed to physics and rendering.
//!
//! ## Coordinates
//!
//! Positions are produced chunk-local, with `z = -distance` along the
//! slope, then shifted once by the sequencer into segment-local space.
//! World placement is the segment's job (see [`crate::segment::Segment::to_world`]).

use avalanche_shared::Vec3;
use serde::{Deserialize, Serialize};

use crate::lane::Lane;

/// Rarity of a meters pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rarity {
    /// Small distance bonus.
    Common = 0,
    /// Medium distance bonus.
    Rare = 1,
    /// Large distance bonus.
    Epic = 2,
}

impl Rarity {
    /// Meters granted when the pickup is collected.
    #[must_use]
    pub const fn bonus_meters(self) -> u32 {
        match self {
            Self::Common => 50,
            Self::Rare => 150,
            Self::Epic => 500,
        }
    }
}

/// Semantic class of an obstacle type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleClass {
    /// Deadly on contact.
    Blocking,
    /// Can be ridden over.
    Traversable,
    /// Collected on contact.
    Reward,
}

/// Every kind of object the generator can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleType {
    /// Standing pine tree.
    Tree,
    /// Low rock.
    LowRock,
    /// Boulder.
    BigRock,
    /// Snowman.
    Snowman,
    /// Campfire.
    Bonfire,
    /// Dumpster (road only).
    Dumpster,
    /// Parked car (road only). Long.
    Car,
    /// Sleigh. Long.
    Sleigh,
    /// Reindeer. Long.
    Reindeer,
    /// Fence section.
    Fence,
    /// Fallen tree lying across a lane.
    LyingTree,
    /// Jump ramp.
    Ramp,
    /// Collectible fish (currency).
    Fish,
    /// Temporary collect-radius power-up.
    FishingNet,
    /// Temporary collection multiplier power-up.
    FishMultiplier,
    /// Instant distance bonus.
    MetersPickup(Rarity),
}

impl ObstacleType {
    /// Returns the semantic class.
    #[must_use]
    pub const fn class(self) -> ObstacleClass {
        match self {
            Self::Ramp => ObstacleClass::Traversable,
            Self::Fish | Self::FishingNet | Self::FishMultiplier | Self::MetersPickup(_) => {
                ObstacleClass::Reward
            }
            _ => ObstacleClass::Blocking,
        }
    }

    /// Deadly on contact.
    #[inline]
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self.class(), ObstacleClass::Blocking)
    }

    /// Collected on contact.
    #[inline]
    #[must_use]
    pub const fn is_reward(self) -> bool {
        matches!(self.class(), ObstacleClass::Reward)
    }

    /// Temporary gameplay modifier.
    #[inline]
    #[must_use]
    pub const fn is_power_up(self) -> bool {
        matches!(self, Self::FishingNet | Self::FishMultiplier)
    }

    /// Long obstacles overlap the next row of their lane.
    #[inline]
    #[must_use]
    pub const fn is_long(self) -> bool {
        matches!(self, Self::Sleigh | Self::Reindeer | Self::Car)
    }

    /// Snake-case name, used as the default object name in exported maps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::LowRock => "low_rock",
            Self::BigRock => "big_rock",
            Self::Snowman => "snowman",
            Self::Bonfire => "bonfire",
            Self::Dumpster => "dumpster",
            Self::Car => "car",
            Self::Sleigh => "sleigh",
            Self::Reindeer => "reindeer",
            Self::Fence => "fence",
            Self::LyingTree => "lying_tree",
            Self::Ramp => "ramp",
            Self::Fish => "fish",
            Self::FishingNet => "fishing_net",
            Self::FishMultiplier => "fish_multiplier",
            Self::MetersPickup(_) => "meters_pickup",
        }
    }
}

/// What sits on top of a ramp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RampConfig {
    /// A small obstacle on the ramp lip.
    pub has_small_obstacle: bool,
    /// A big obstacle behind the ramp that must be jumped.
    pub has_big_obstacle: bool,
}

impl RampConfig {
    /// The player must be airborne to clear this ramp.
    #[must_use]
    pub const fn requires_jump(self) -> bool {
        self.has_small_obstacle || self.has_big_obstacle
    }
}

/// A placed obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    /// Position (chunk-local or segment-local, `z = -distance`).
    pub position: Vec3,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
    /// Obstacle type.
    pub kind: ObstacleType,
    /// Ramp payload, only for [`ObstacleType::Ramp`].
    pub ramp: Option<RampConfig>,
}

impl Obstacle {
    /// Creates an unrotated, unit-scale obstacle.
    #[must_use]
    pub const fn new(kind: ObstacleType, position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
            kind,
            ramp: None,
        }
    }

    /// Creates a ramp.
    #[must_use]
    pub const fn ramp(position: Vec3, config: RampConfig) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
            kind: ObstacleType::Ramp,
            ramp: Some(config),
        }
    }

    /// Sets the rotation (radians).
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the uniform scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Distance along the slope from the origin of the current space.
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f32 {
        -self.position.z
    }

    /// Lane this obstacle stands in.
    #[inline]
    #[must_use]
    pub fn lane(&self, lane_width: f32) -> Lane {
        Lane::from_x(self.position.x, lane_width)
    }

    /// Returns a copy pushed `offset` further down the slope.
    #[must_use]
    pub fn shifted(mut self, offset: f32) -> Self {
        self.position.z -= offset;
        self
    }
}
