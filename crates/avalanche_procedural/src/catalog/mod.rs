//! # Chunk Catalog
//!
//! The built-in chunk templates.
//!
//! | template                  | rows | spacing | difficulties        | road |
//! |---------------------------|------|---------|---------------------|------|
//! | `turns_only`              | 4    | 6.0     | easy, medium, hard  | yes  |
//! | `forest`                  | 8    | 5.0     | medium, hard        | no   |
//! | `lying_tree`              | 5    | 6.0     | easy, medium, hard  | no   |
//! | `one_ramp`                | 6    | 6.0     | easy, medium, hard  | yes  |
//! | `two_ramps`               | 8    | 6.0     | medium, hard        | no   |
//! | `fence_at_the_end`        | 5    | 6.0     | medium, hard        | yes  |
//! | `big_obstacle_at_the_end` | 6    | 6.0     | medium, hard        | yes  |
//!
//! Each template is a plain function over a [`ChunkContext`](crate::chunk::ChunkContext). The context
//! rejects placements that would break the playability rules, so
//! templates can be written optimistically.

pub mod placement;

mod big_obstacle;
mod fence;
mod forest;
mod lying_tree;
mod ramps;
mod turns;

use crate::chunk::Chunk;
use crate::difficulty::{DifficultyMode, DifficultySet};

pub use big_obstacle::big_obstacle_at_the_end;
pub use fence::fence_at_the_end;
pub use forest::forest;
pub use lying_tree::lying_tree;
pub use ramps::{one_ramp, two_ramps};
pub use turns::turns_only;

const ALL: DifficultySet = DifficultySet::ALL;
const MEDIUM_HARD: DifficultySet =
    DifficultySet::single(DifficultyMode::Medium).with(DifficultyMode::Hard);

/// Builds the built-in catalog.
#[must_use]
pub fn builtin() -> Vec<Chunk> {
    vec![
        Chunk::procedural("turns_only", 4, 6.0, ALL, true, turns_only),
        Chunk::procedural("forest", 8, 5.0, MEDIUM_HARD, false, forest),
        Chunk::procedural("lying_tree", 5, 6.0, ALL, false, lying_tree),
        Chunk::procedural("one_ramp", 6, 6.0, ALL, true, one_ramp),
        Chunk::procedural("two_ramps", 8, 6.0, MEDIUM_HARD, false, two_ramps),
        Chunk::procedural("fence_at_the_end", 5, 6.0, MEDIUM_HARD, true, fence_at_the_end),
        Chunk::procedural(
            "big_obstacle_at_the_end",
            6,
            6.0,
            MEDIUM_HARD,
            true,
            big_obstacle_at_the_end,
        ),
    ]
}

/// Looks up a built-in template by name.
#[must_use]
pub fn builtin_by_name(name: &str) -> Option<Chunk> {
    builtin().into_iter().find(|chunk| chunk.name == name)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_table() {
        let catalog = builtin();
        assert_eq!(catalog.len(), 7);

        let forest = builtin_by_name("forest").unwrap();
        assert_eq!(forest.length, 8);
        assert_eq!(forest.obstacle_spacing, 5.0);
        assert!(!forest.possible_difficulties.contains(DifficultyMode::Easy));
        assert!(!forest.can_be_road);

        let roads: Vec<_> = catalog.iter().filter(|c| c.can_be_road).map(|c| c.name.as_str()).collect();
        assert_eq!(
            roads,
            vec!["turns_only", "one_ramp", "fence_at_the_end", "big_obstacle_at_the_end"]
        );
    }

    #[test]
    fn test_easy_pool() {
        let easy: Vec<_> = builtin()
            .into_iter()
            .filter(|c| c.supports_any(DifficultyMode::Easy.into()))
            .map(|c| c.name)
            .collect();
        assert_eq!(easy, vec!["turns_only", "lying_tree", "one_ramp"]);
    }

    #[test]
    fn test_every_template_is_playable() {
        for chunk in builtin() {
            for difficulty in chunk.possible_difficulties.iter() {
                for is_road in [false, true] {
                    if is_road && !chunk.can_be_road {
                        continue;
                    }
                    for instance in test_support::instances(&chunk, difficulty, is_road, 40) {
                        test_support::assert_playable(&instance);
                    }
                }
            }
        }
    }
}
