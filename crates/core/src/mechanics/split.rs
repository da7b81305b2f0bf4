//! Split/merge mechanic.
//!
//! A lying block that lands exactly on a level's split trigger breaks into two
//! single cubes. While split, whenever the two cubes end a move side by side
//! they fuse back into one lying block.

use tracing::debug;

use crate::block::{BlockState, Pose};
use crate::grid::Grid;
use crate::types::SubBlock;

/// Shape change applied by [`apply_split_merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitTransition {
    Split,
    Merge,
}

/// Split or merge `after` in place when the level's rule calls for it.
///
/// `before` is the state at the start of the move: merging is only considered
/// for moves that began split, so a block that just broke apart onto adjacent
/// cells stays split.
pub fn apply_split_merge(
    grid: &Grid,
    before: &BlockState,
    after: &mut BlockState,
) -> Option<SplitTransition> {
    let rule = grid.split_rule()?;

    match (*before, *after) {
        (BlockState::Split { .. }, BlockState::Split { cells, .. }) => {
            let joined = BlockState::lying(cells[0], cells[1])?;
            debug!(a = ?cells[0], b = ?cells[1], "sub-blocks merged");
            *after = joined;
            Some(SplitTransition::Merge)
        }
        (
            BlockState::Joined { .. },
            BlockState::Joined {
                pose: Pose::Lying(_),
                ..
            },
        ) if after.covers_exactly(&rule.triggers) => {
            let landing = rule.landing();
            debug!(a = ?landing[0], b = ?landing[1], "block split");
            *after = BlockState::split(landing, SubBlock::First);
            Some(SplitTransition::Split)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelDef;
    use crate::types::{Axis, Pos};

    fn grid() -> Grid {
        LevelDef::new("split", 20, &["S#####", "##x###", "##x###", "#####G"])
            .build(0)
            .unwrap()
            .grid
    }

    #[test]
    fn test_lying_on_trigger_splits() {
        let grid = grid();
        let before = BlockState::standing(Pos::new(2, 4));
        let mut after = BlockState::lying(Pos::new(2, 1), Pos::new(2, 2)).unwrap();
        assert_eq!(
            apply_split_merge(&grid, &before, &mut after),
            Some(SplitTransition::Split)
        );
        assert_eq!(
            after,
            BlockState::split([Pos::new(2, 1), Pos::new(2, 2)], SubBlock::First)
        );
    }

    #[test]
    fn test_partial_cover_does_not_split() {
        let grid = grid();
        let before = BlockState::standing(Pos::new(0, 0));
        let mut after = BlockState::lying(Pos::new(2, 2), Pos::new(2, 3)).unwrap();
        assert_eq!(apply_split_merge(&grid, &before, &mut after), None);
        assert!(!after.is_split());
    }

    #[test]
    fn test_standing_on_trigger_does_not_split() {
        let grid = grid();
        let before = BlockState::lying(Pos::new(2, 2), Pos::new(2, 3)).unwrap();
        let mut after = BlockState::standing(Pos::new(2, 1));
        assert_eq!(apply_split_merge(&grid, &before, &mut after), None);
    }

    #[test]
    fn test_adjacent_cubes_merge_with_shared_axis() {
        let grid = grid();
        let before = BlockState::split([Pos::new(4, 0), Pos::new(5, 1)], SubBlock::First);
        let mut after = BlockState::split([Pos::new(5, 0), Pos::new(5, 1)], SubBlock::First);
        assert_eq!(
            apply_split_merge(&grid, &before, &mut after),
            Some(SplitTransition::Merge)
        );
        assert_eq!(after.pose(), Some(Pose::Lying(Axis::Y)));
        assert_eq!(after.footprint().as_slice(), &[Pos::new(5, 0), Pos::new(5, 1)]);
    }

    #[test]
    fn test_overlapping_or_distant_cubes_stay_split() {
        let grid = grid();
        let before = BlockState::split([Pos::new(1, 0), Pos::new(3, 0)], SubBlock::First);

        let mut same = BlockState::split([Pos::new(3, 0), Pos::new(3, 0)], SubBlock::First);
        assert_eq!(apply_split_merge(&grid, &before, &mut same), None);
        assert!(same.is_split());

        let mut diagonal = BlockState::split([Pos::new(2, 1), Pos::new(3, 0)], SubBlock::First);
        assert_eq!(apply_split_merge(&grid, &before, &mut diagonal), None);
        assert!(diagonal.is_split());
    }

    #[test]
    fn test_no_rule_no_transition() {
        let grid = Grid::from_map(&["S##G"]).unwrap();
        let before = BlockState::split([Pos::new(0, 0), Pos::new(2, 0)], SubBlock::First);
        let mut after = BlockState::split([Pos::new(1, 0), Pos::new(2, 0)], SubBlock::First);
        assert_eq!(apply_split_merge(&grid, &before, &mut after), None);
    }
}
