//! `big_obstacle_at_the_end`: one lane is closed by a big obstacle over
//! the last two rows.

use super::placement::{end_reward, scatter_rows, start_reward};
use crate::chunk::ChunkContext;
use crate::lane::Lane;
use crate::obstacle::ObstacleType;

const DENSITY: f32 = 0.4;

/// Escape lane: clear throughout on medium, only over the final two rows
/// on hard. The remaining lane gets the big obstacle.
pub fn big_obstacle_at_the_end(ctx: &mut ChunkContext<'_>) {
    start_reward(ctx);

    let entry = ctx.entry_lane();
    let first_big_row = ctx.length().saturating_sub(2);
    let escape = ctx.reserve_escape_lane(first_big_row);
    let closed = Lane::ALL
        .into_iter()
        .find(|lane| *lane != entry && *lane != escape)
        .unwrap_or(Lane::Left);

    if ctx.is_road() {
        ctx.place(ObstacleType::Car, closed, first_big_row);
    } else {
        for row in first_big_row..ctx.length() {
            ctx.place(ObstacleType::BigRock, closed, row);
        }
    }

    scatter_rows(ctx, 0..first_big_row, DENSITY);
    end_reward(ctx);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_playable, instances};
    use super::*;
    use crate::chunk::Chunk;
    use crate::difficulty::{DifficultyMode, DifficultySet};

    fn chunk() -> Chunk {
        let modes = DifficultySet::of(&[DifficultyMode::Medium, DifficultyMode::Hard]);
        Chunk::procedural("big_obstacle_at_the_end", 6, 6.0, modes, true, big_obstacle_at_the_end)
    }

    #[test]
    fn test_big_obstacle_closes_remaining_lane() {
        for is_road in [false, true] {
            for mode in [DifficultyMode::Medium, DifficultyMode::Hard] {
                for instance in instances(&chunk(), mode, is_road, 20) {
                    assert_playable(&instance);
                    let escape = instance.escape_lane.unwrap();
                    let closed = Lane::ALL
                        .into_iter()
                        .find(|l| *l != instance.request.entry_lane && *l != escape)
                        .unwrap();
                    let big = if is_road { ObstacleType::Car } else { ObstacleType::BigRock };
                    assert!(instance.obstacles_at(closed, 4).any(|o| o.kind == big));
                }
            }
        }
    }

    #[test]
    fn test_hard_escape_protected_only_at_the_end() {
        for instance in instances(&chunk(), DifficultyMode::Hard, false, 10) {
            assert_eq!(instance.escape_from_row, 4);
        }
        for instance in instances(&chunk(), DifficultyMode::Medium, false, 10) {
            assert_eq!(instance.escape_from_row, 0);
        }
    }
}
