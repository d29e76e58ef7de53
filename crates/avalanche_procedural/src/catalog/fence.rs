//! `fence_at_the_end`: the last row is fenced off except for the safe lanes.

use super::placement::{end_reward, scatter_rows, start_reward};
use crate::chunk::ChunkContext;
use crate::lane::Lane;
use crate::obstacle::ObstacleType;

const DENSITY: f32 = 0.35;

/// Fences every lane of the last row that is not kept open.
///
/// A middle entry always keeps one side lane open at the fence, even on
/// hard where no escape lane is reserved upstream.
pub fn fence_at_the_end(ctx: &mut ChunkContext<'_>) {
    start_reward(ctx);

    let last = ctx.last_row();
    if ctx.entry_lane() == Lane::Middle {
        ctx.reserve_escape_lane(last);
    }

    // Row before the fence stays empty so nothing long runs into it.
    scatter_rows(ctx, 0..last.saturating_sub(1), DENSITY);
    for lane in Lane::ALL {
        ctx.place(ObstacleType::Fence, lane, last);
    }

    end_reward(ctx);
}
