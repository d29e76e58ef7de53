//! `lying_tree`: a fallen tree across every unprotected lane at the end.

use super::placement::{end_reward, scatter_rows, start_reward};
use crate::chunk::ChunkContext;
use crate::lane::Lane;
use crate::obstacle::ObstacleType;

const DENSITY: f32 = 0.3;

/// Sparse obstacles upstream, lying trees on the last row.
pub fn lying_tree(ctx: &mut ChunkContext<'_>) {
    start_reward(ctx);
    let last = ctx.last_row();
    scatter_rows(ctx, 0..last.saturating_sub(1), DENSITY);
    for lane in Lane::ALL {
        ctx.place(ObstacleType::LyingTree, lane, last);
    }
    end_reward(ctx);
}
