//! Ramp templates: `one_ramp` and `two_ramps`.
//!
//! Ramps sit in the entry lane. They are traversable, so they never
//! conflict with the entry-lane rule; what makes them dangerous is the
//! payload described by their [`RampConfig`].

use super::placement::{end_reward, fish_arc, scatter_row_except, start_reward};
use crate::chunk::{ChunkContext, AIR_HEIGHT};
use crate::difficulty::DifficultyMode;
use crate::lane::Lane;
use crate::obstacle::{ObstacleType, RampConfig};

const ONE_RAMP_DENSITY: f32 = 0.35;
const TWO_RAMPS_DENSITY: f32 = 0.3;

/// Chance of a small obstacle on a ramp without a big one.
const SMALL_OBSTACLE_CHANCE: f32 = 0.4;
/// Landing low-rock in the lane opposite a big-obstacle ramp.
const LANDING_ROCK_CHANCE: f32 = 0.25;

const FIRST_RAMP_SMALL_CHANCE: f32 = 0.3;
const SECOND_RAMP_BIG_CHANCE: f32 = 0.4;
const SECOND_RAMP_BIG_CHANCE_HARD: f32 = 0.6;

/// Fishing net behind the second ramp when it carries a big obstacle.
pub const FISHING_NET_CHANCE_AFTER_BIG_RAMP: f32 = 0.3;
/// Fishing net behind the second ramp otherwise.
pub const TWO_RAMPS_FISHING_NET_CHANCE: f32 = 0.3;

const fn big_obstacle_chance(difficulty: DifficultyMode) -> f32 {
    match difficulty {
        DifficultyMode::Easy => 0.15,
        DifficultyMode::Medium => 0.3,
        DifficultyMode::Hard => 0.5,
    }
}

/// Lane opposite the entry lane.
///
/// A side entry mirrors; a middle entry takes the side that is not the
/// escape lane, or a random side when there is none.
fn opposite_lane(ctx: &mut ChunkContext<'_>) -> Lane {
    let entry = ctx.entry_lane();
    if entry.is_side() {
        return entry.mirror();
    }
    match ctx.escape_lane() {
        Some(escape) => escape.mirror(),
        None => Lane::random_side(ctx.rng()),
    }
}

/// One ramp three rows before the end, fish over the landing.
pub fn one_ramp(ctx: &mut ChunkContext<'_>) {
    start_reward(ctx);

    let entry = ctx.entry_lane();
    let last = ctx.last_row();
    let ramp_row = ctx.length().saturating_sub(3);

    let has_big_obstacle = ctx.chance(big_obstacle_chance(ctx.difficulty()));
    let config = RampConfig {
        has_small_obstacle: !has_big_obstacle && ctx.chance(SMALL_OBSTACLE_CHANCE),
        has_big_obstacle,
    };
    ctx.place_ramp(entry, ramp_row, config);

    let opposite = opposite_lane(ctx);
    for row in 0..ctx.length() {
        // Landing rows, plus the ramp row so nothing long reaches into them.
        let landing = has_big_obstacle && row + 2 >= last;
        let skip = if landing { Some(opposite) } else { None };
        scatter_row_except(ctx, row, ONE_RAMP_DENSITY, skip);
    }

    fish_arc(ctx, entry, ramp_row + 1..last);

    if has_big_obstacle && ctx.chance(LANDING_ROCK_CHANCE) {
        ctx.place(ObstacleType::LowRock, opposite, last);
    }

    end_reward(ctx);
}

/// Two ramps in the entry lane with fish in the air between them.
pub fn two_ramps(ctx: &mut ChunkContext<'_>) {
    const FIRST: usize = 1;
    const SECOND: usize = 5;

    start_reward(ctx);

    let entry = ctx.entry_lane();
    let first = RampConfig {
        has_small_obstacle: ctx.chance(FIRST_RAMP_SMALL_CHANCE),
        has_big_obstacle: false,
    };
    let big_chance = if ctx.difficulty() == DifficultyMode::Hard {
        SECOND_RAMP_BIG_CHANCE_HARD
    } else {
        SECOND_RAMP_BIG_CHANCE
    };
    let second = RampConfig {
        has_small_obstacle: false,
        has_big_obstacle: ctx.chance(big_chance),
    };
    ctx.place_ramp(entry, FIRST, first);
    ctx.place_ramp(entry, SECOND, second);

    for row in 0..ctx.length() {
        scatter_row_except(ctx, row, TWO_RAMPS_DENSITY, None);
    }

    fish_arc(ctx, entry, FIRST + 1..SECOND);

    let fishing_net_chance = if second.has_big_obstacle {
        FISHING_NET_CHANCE_AFTER_BIG_RAMP
    } else {
        TWO_RAMPS_FISHING_NET_CHANCE
    };
    if !ctx.power_up_placed() && ctx.chance(fishing_net_chance) {
        ctx.place_reward(ObstacleType::FishingNet, entry, SECOND + 1, AIR_HEIGHT);
    }

    end_reward(ctx);
}
