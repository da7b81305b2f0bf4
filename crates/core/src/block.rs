//! Block module - footprint and orientation of the rolling block
//!
//! The block is a 1x1x2 prism. While joined it either stands on one cell or
//! lies across two adjacent cells; on split levels it can break into two 1x1x1
//! cubes that move independently until they touch again.

use arrayvec::ArrayVec;

use crate::types::{Axis, Pos, SubBlock};

/// Cells currently under the block (one or two).
pub type Footprint = ArrayVec<Pos, 2>;

/// Orientation of a joined block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Upright on a single cell, two units tall.
    Standing,
    /// On its side across two cells along the axis.
    Lying(Axis),
}

/// The block's full discrete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockState {
    /// One rigid prism. For `Lying`, `cell` is the end with the lower
    /// coordinate and the other end is one step along the axis.
    Joined { cell: Pos, pose: Pose },
    /// Two single-cell cubes; only `active` responds to rolls.
    Split { active: SubBlock, cells: [Pos; 2] },
}

impl BlockState {
    pub fn standing(cell: Pos) -> Self {
        BlockState::Joined {
            cell,
            pose: Pose::Standing,
        }
    }

    /// A lying block covering `a` and `b`, in either order.
    ///
    /// Returns `None` unless the two cells are orthogonally adjacent.
    pub fn lying(a: Pos, b: Pos) -> Option<Self> {
        let axis = a.adjacent_axis(b)?;
        Some(BlockState::Joined {
            cell: a.min(b),
            pose: Pose::Lying(axis),
        })
    }

    pub fn split(cells: [Pos; 2], active: SubBlock) -> Self {
        BlockState::Split { active, cells }
    }

    pub fn is_standing(&self) -> bool {
        matches!(
            self,
            BlockState::Joined {
                pose: Pose::Standing,
                ..
            }
        )
    }

    pub fn is_split(&self) -> bool {
        matches!(self, BlockState::Split { .. })
    }

    pub fn pose(&self) -> Option<Pose> {
        match self {
            BlockState::Joined { pose, .. } => Some(*pose),
            BlockState::Split { .. } => None,
        }
    }

    pub fn active(&self) -> Option<SubBlock> {
        match self {
            BlockState::Split { active, .. } => Some(*active),
            BlockState::Joined { .. } => None,
        }
    }

    /// Every cell the block currently rests on.
    pub fn footprint(&self) -> Footprint {
        let mut cells = ArrayVec::new();
        match *self {
            BlockState::Joined {
                cell,
                pose: Pose::Standing,
            } => cells.push(cell),
            BlockState::Joined {
                cell,
                pose: Pose::Lying(axis),
            } => {
                let (dx, dy) = axis.unit();
                cells.push(cell);
                cells.push(Pos::new(cell.x + dx, cell.y + dy));
            }
            BlockState::Split { cells: pair, .. } => {
                cells.push(pair[0]);
                cells.push(pair[1]);
            }
        }
        cells
    }

    /// Does the footprint cover exactly `cells`, ignoring order and duplicates?
    pub fn covers_exactly(&self, cells: &[Pos]) -> bool {
        let footprint = self.footprint();
        footprint.iter().all(|p| cells.contains(p)) && cells.iter().all(|p| footprint.contains(p))
    }

    /// Swap which half responds to rolls. No-op for a joined block.
    pub fn toggle_active(&mut self) -> bool {
        match self {
            BlockState::Split { active, .. } => {
                *active = active.other();
                true
            }
            BlockState::Joined { .. } => false,
        }
    }
}
