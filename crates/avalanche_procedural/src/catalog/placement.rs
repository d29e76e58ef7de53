//! Shared placement helpers: obstacle pools, row scattering and the
//! boundary reward rules every template uses.

use crate::chunk::{ChunkContext, AIR_HEIGHT, REWARD_HEIGHT};
use crate::lane::Lane;
use crate::obstacle::{ObstacleType, Rarity};
use crate::random::{WeightedChoice, WeightedTable};

/// Off-road pool. Trees take whatever the others leave.
pub static FOREST_POOL: [(ObstacleType, f32); 5] = [
    (ObstacleType::Snowman, 0.15),
    (ObstacleType::LowRock, 0.15),
    (ObstacleType::Bonfire, 0.10),
    (ObstacleType::Sleigh, 0.05),
    (ObstacleType::Reindeer, 0.05),
];

/// Road pool. Cars take the remainder.
pub static ROAD_POOL: [(ObstacleType, f32); 3] = [
    (ObstacleType::Dumpster, 0.25),
    (ObstacleType::Sleigh, 0.15),
    (ObstacleType::Snowman, 0.10),
];

/// Fishing net chance at a chunk boundary.
pub const FISHING_NET_CHANCE: f32 = 0.15;
/// Fish multiplier chance at a chunk boundary.
pub const FISH_MULTIPLIER_CHANCE: f32 = 0.10;
/// Plain fish chance when no power-up is rolled.
pub const FISH_CHANCE: f32 = 0.70;
/// Chance of a meters pickup in chunks that offer one.
pub const METERS_PICKUP_CHANCE: f32 = 0.04;

/// `None` is the catch-all: no power-up this time.
static POWER_UPS: [(Option<ObstacleType>, f32); 2] = [
    (Some(ObstacleType::FishingNet), FISHING_NET_CHANCE),
    (Some(ObstacleType::FishMultiplier), FISH_MULTIPLIER_CHANCE),
];

static RARITIES: [(Rarity, f32); 2] = [(Rarity::Common, 0.7), (Rarity::Rare, 0.25)];

/// Pool matching the chunk's road flag.
#[must_use]
pub fn pool_for(ctx: &ChunkContext<'_>) -> WeightedTable<'static, ObstacleType> {
    if ctx.is_road() {
        WeightedChoice::new(&ROAD_POOL).or_else(ObstacleType::Car)
    } else {
        WeightedChoice::new(&FOREST_POOL).or_else(ObstacleType::Tree)
    }
}

/// Draws one obstacle type from the chunk's pool.
pub fn pick_obstacle(ctx: &mut ChunkContext<'_>) -> ObstacleType {
    let pool = pool_for(ctx);
    pool.sample(ctx.rng())
}

/// Fills unprotected cells of `row` with pool obstacles, each with
/// probability `density`. Returns how many were placed.
pub fn scatter_row(ctx: &mut ChunkContext<'_>, row: usize, density: f32) -> usize {
    scatter_row_except(ctx, row, density, None)
}

/// Like [`scatter_row`], leaving `skip` untouched.
pub fn scatter_row_except(
    ctx: &mut ChunkContext<'_>,
    row: usize,
    density: f32,
    skip: Option<Lane>,
) -> usize {
    let mut placed = 0;
    for lane in Lane::ALL {
        if Some(lane) == skip || ctx.is_protected(lane, row) {
            continue;
        }
        if ctx.optional(density) {
            let kind = pick_obstacle(ctx);
            if ctx.place(kind, lane, row) {
                placed += 1;
            }
        }
    }
    placed
}

/// Scatters every row in `rows`.
pub fn scatter_rows(ctx: &mut ChunkContext<'_>, rows: std::ops::Range<usize>, density: f32) {
    for row in rows {
        scatter_row(ctx, row, density);
    }
}

/// Rolls the reward at a chunk boundary.
///
/// At most one power-up per instance: the end roll skips power-ups if the
/// start already produced one.
fn boundary_reward(ctx: &mut ChunkContext<'_>, row: usize, allow_power_up: bool) {
    let lane = ctx.entry_lane();
    if allow_power_up {
        let rolled = WeightedChoice::new(&POWER_UPS)
            .or_else(None)
            .sample(ctx.rng());
        if let Some(power_up) = rolled {
            ctx.place_reward(power_up, lane, row, REWARD_HEIGHT);
            return;
        }
    }
    if ctx.chance(FISH_CHANCE) {
        ctx.place_reward(ObstacleType::Fish, lane, row, REWARD_HEIGHT);
    }
}

/// Reward at row 0.
pub fn start_reward(ctx: &mut ChunkContext<'_>) {
    boundary_reward(ctx, 0, true);
}

/// Reward at the last row.
pub fn end_reward(ctx: &mut ChunkContext<'_>) {
    let allow = !ctx.power_up_placed();
    let row = ctx.last_row();
    boundary_reward(ctx, row, allow);
}

/// Rare meters pickup hovering over the entry lane.
pub fn maybe_meters_pickup(ctx: &mut ChunkContext<'_>, row: usize) {
    if !ctx.chance(METERS_PICKUP_CHANCE) {
        return;
    }
    let rarity = WeightedChoice::new(&RARITIES)
        .or_else(Rarity::Epic)
        .sample(ctx.rng());
    let lane = ctx.entry_lane();
    ctx.place_reward(ObstacleType::MetersPickup(rarity), lane, row, REWARD_HEIGHT);
}

/// Fish hanging over a ramp landing.
pub fn fish_arc(ctx: &mut ChunkContext<'_>, lane: Lane, rows: std::ops::Range<usize>) {
    for row in rows {
        ctx.place_reward(ObstacleType::Fish, lane, row, AIR_HEIGHT);
    }
}
