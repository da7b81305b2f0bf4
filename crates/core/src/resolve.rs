//! Move resolver - rolling geometry and footprint classification
//!
//! [`roll`] maps a block and a direction to the block's next resting state,
//! treating a joined block as a rigid prism that tips 90° over the ground edge
//! facing the direction of travel:
//!
//! | before | roll along | after |
//! |--------|-----------|-------|
//! | standing on `c` | any axis | lying on `c+d`, `c+2d` |
//! | lying on the roll axis | same axis | standing on `far+d` |
//! | lying across the roll axis | other axis | lying, both cells shifted by `d` |
//!
//! A split cube has no long axis, so it simply slides one cell.
//!
//! [`classify`] then inspects the new footprint against the grid and the switch
//! state *as it was before this move*.

use crate::block::{BlockState, Pose};
use crate::grid::{Grid, SwitchState};
use crate::types::{Direction, Pos};

/// What happened to the block after a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootprintEvent {
    /// Legal resting state; play continues.
    Continue,
    /// Some footprint cell cannot carry the block.
    Fall,
    /// Standing upright on the goal cell.
    Goal,
}

/// Result of resolving one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub block: BlockState,
    pub event: FootprintEvent,
}

/// Pure rolling geometry; never looks at the grid.
pub fn roll(block: BlockState, dir: Direction) -> BlockState {
    match block {
        BlockState::Joined {
            cell,
            pose: Pose::Standing,
        } => BlockState::Joined {
            cell: lower_of(cell.offset(dir, 1), cell.offset(dir, 2)),
            pose: Pose::Lying(dir.axis()),
        },
        BlockState::Joined {
            cell,
            pose: Pose::Lying(axis),
        } if axis == dir.axis() => {
            // `cell` is the low end, so the far end is one step further
            // when rolling towards increasing coordinates.
            let far = if dir.is_positive() {
                cell.offset(dir, 1)
            } else {
                cell
            };
            BlockState::standing(far.step(dir))
        }
        BlockState::Joined {
            cell,
            pose: Pose::Lying(axis),
        } => BlockState::Joined {
            cell: cell.step(dir),
            pose: Pose::Lying(axis),
        },
        BlockState::Split { active, mut cells } => {
            let idx = active.index();
            cells[idx] = cells[idx].step(dir);
            BlockState::Split { active, cells }
        }
    }
}

/// Decide whether `block` rests legally, fell, or reached the goal.
pub fn classify(block: &BlockState, grid: &Grid, switches: &SwitchState) -> FootprintEvent {
    let standing = block.is_standing();
    let footprint = block.footprint();

    if footprint
        .iter()
        .any(|&pos| !grid.supports(pos, standing, switches))
    {
        return FootprintEvent::Fall;
    }

    if standing && footprint[0] == grid.goal() {
        return FootprintEvent::Goal;
    }

    FootprintEvent::Continue
}

/// Roll `block` in `dir` and classify where it lands.
///
/// Total and side-effect free: invalid outcomes are reported through the
/// event, never as an error.
pub fn resolve(
    block: BlockState,
    dir: Direction,
    grid: &Grid,
    switches: &SwitchState,
) -> Resolution {
    let block = roll(block, dir);
    let event = classify(&block, grid, switches);
    Resolution { block, event }
}

fn lower_of(a: Pos, b: Pos) -> Pos {
    a.min(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Axis, SubBlock};

    fn lying(a: (i16, i16), b: (i16, i16)) -> BlockState {
        BlockState::lying(a.into(), b.into()).unwrap()
    }

    #[test]
    fn test_standing_tips_over() {
        let start = BlockState::standing(Pos::new(5, 5));
        assert_eq!(roll(start, Direction::Right), lying((6, 5), (7, 5)));
        assert_eq!(roll(start, Direction::Left), lying((3, 5), (4, 5)));
        assert_eq!(roll(start, Direction::Down), lying((5, 6), (5, 7)));
        assert_eq!(roll(start, Direction::Up), lying((5, 3), (5, 4)));
    }

    #[test]
    fn test_lying_along_axis_stands_up_beyond_far_end() {
        let block = lying((2, 2), (3, 2));
        assert_eq!(roll(block, Direction::Right), BlockState::standing(Pos::new(4, 2)));
        assert_eq!(roll(block, Direction::Left), BlockState::standing(Pos::new(1, 2)));

        let block = lying((2, 2), (2, 3));
        assert_eq!(roll(block, Direction::Down), BlockState::standing(Pos::new(2, 4)));
        assert_eq!(roll(block, Direction::Up), BlockState::standing(Pos::new(2, 1)));
    }

    #[test]
    fn test_lying_across_axis_slides() {
        let block = lying((2, 2), (3, 2));
        let moved = roll(block, Direction::Down);
        assert_eq!(moved, lying((2, 3), (3, 3)));
        assert_eq!(moved.pose(), Some(Pose::Lying(Axis::X)));

        let block = lying((2, 2), (2, 3));
        assert_eq!(roll(block, Direction::Left), lying((1, 2), (1, 3)));
    }

    #[test]
    fn test_roll_involution_every_direction() {
        let start = BlockState::standing(Pos::new(10, 10));
        for dir in Direction::ALL {
            assert_eq!(roll(roll(start, dir), dir.opposite()), start);
        }
    }

    #[test]
    fn test_split_moves_only_active_cube() {
        let block = BlockState::split([Pos::new(1, 1), Pos::new(5, 5)], SubBlock::Second);
        let moved = roll(block, Direction::Up);
        assert_eq!(
            moved,
            BlockState::split([Pos::new(1, 1), Pos::new(5, 4)], SubBlock::Second)
        );
    }

    #[test]
    fn test_classify_out_of_bounds_is_fall() {
        let grid = Grid::from_map(&["S#G"]).unwrap();
        let r = resolve(
            BlockState::standing(Pos::new(0, 0)),
            Direction::Up,
            &grid,
            &SwitchState::closed(),
        );
        assert_eq!(r.event, FootprintEvent::Fall);
    }

    #[test]
    fn test_classify_half_over_hole_is_fall() {
        let grid = Grid::from_map(&["S#.G"]).unwrap();
        let r = resolve(
            BlockState::standing(Pos::new(0, 0)),
            Direction::Right,
            &grid,
            &SwitchState::closed(),
        );
        assert_eq!(r.block, lying((1, 0), (2, 0)));
        assert_eq!(r.event, FootprintEvent::Fall);
    }

    #[test]
    fn test_goal_requires_standing() {
        let grid = Grid::from_map(&["S##G#"]).unwrap();
        let switches = SwitchState::closed();

        // Straddling the goal and a floor cell is not a win.
        assert_eq!(
            classify(&lying((3, 0), (4, 0)), &grid, &switches),
            FootprintEvent::Continue
        );
        assert_eq!(
            classify(&BlockState::standing(Pos::new(3, 0)), &grid, &switches),
            FootprintEvent::Goal
        );
    }

    #[test]
    fn test_split_cube_on_goal_is_not_goal() {
        let grid = Grid::from_map(&["S#G"]).unwrap();
        let block = BlockState::split([Pos::new(2, 0), Pos::new(0, 0)], SubBlock::First);
        assert_eq!(
            classify(&block, &grid, &SwitchState::closed()),
            FootprintEvent::Continue
        );
    }
}
