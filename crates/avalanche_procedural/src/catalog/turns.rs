//! `turns_only`: scattered pool obstacles that force a lane change.

use super::placement::{end_reward, scatter_rows, start_reward};
use crate::chunk::ChunkContext;

/// Density of scattered obstacles.
const DENSITY: f32 = 0.45;

/// Scatters pool obstacles around the protected lanes.
pub fn turns_only(ctx: &mut ChunkContext<'_>) {
    start_reward(ctx);
    let rows = ctx.length();
    scatter_rows(ctx, 0..rows, DENSITY);
    end_reward(ctx);
}
