//! `forest`: dense trees with a fish trail down the entry lane.

use super::placement::{end_reward, maybe_meters_pickup, pick_obstacle, start_reward};
use crate::chunk::{ChunkContext, REWARD_HEIGHT};
use crate::lane::Lane;
use crate::obstacle::ObstacleType;

/// Chance of a tree in an unprotected cell.
const TREE_DENSITY: f32 = 0.7;
/// Chance that a cell gets a pool obstacle instead of a tree.
const CLUTTER: f32 = 0.1;

/// Fills the free lanes with trees and lays fish along the entry lane.
pub fn forest(ctx: &mut ChunkContext<'_>) {
    start_reward(ctx);

    let entry = ctx.entry_lane();
    for row in 0..ctx.length() {
        for lane in Lane::ALL {
            if ctx.is_protected(lane, row) || !ctx.optional(TREE_DENSITY) {
                continue;
            }
            let kind = if ctx.chance(CLUTTER) {
                pick_obstacle(ctx)
            } else {
                ObstacleType::Tree
            };
            ctx.place(kind, lane, row);
        }
    }

    // Odd rows; the boundaries carry their own rewards.
    for row in (1..ctx.last_row()).step_by(2) {
        ctx.place_reward(ObstacleType::Fish, entry, row, REWARD_HEIGHT);
    }
    let middle = ctx.length() / 2;
    maybe_meters_pickup(ctx, middle);

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
        Chunk::procedural("forest", 8, 5.0, modes, false, forest)
    }

    #[test]
    fn test_trees_are_jittered() {
        let all = instances(&chunk(), DifficultyMode::Hard, false, 20);
        let trees: Vec<_> = all
            .iter()
            .flat_map(|i| i.obstacles.iter())
            .filter(|o| o.kind == ObstacleType::Tree)
            .collect();
        assert!(trees.len() > 50);
        assert!(trees.iter().any(|t| t.rotation.y.abs() > 1e-3));
        assert!(trees.iter().all(|t| (0.8..=1.2).contains(&t.scale)));
    }

    #[test]
    fn test_fish_trail_in_entry_lane() {
        for instance in instances(&chunk(), DifficultyMode::Medium, false, 10) {
            assert_playable(&instance);
            let trail = instance
                .obstacles
                .iter()
                .filter(|o| o.kind == ObstacleType::Fish && o.lane(2.5) == instance.request.entry_lane)
                .count();
            assert!(trail >= 3, "expected fish trail, got {trail}");
        }
    }
}
