//! Mechanic controllers and the per-move pipeline
//!
//! Every roll runs through the same three stages, in order:
//!
//! 1. [`crate::resolve::resolve`] rolls the block and classifies the landing
//!    against the switch state from *before* the move.
//! 2. [`switch::apply_switches`] flips the bridges the block is pressing
//!    (skipped on a fall).
//! 3. [`split::apply_split_merge`] breaks a lying block apart on the split
//!    trigger, or fuses two touching cubes (skipped on a fall).
//!
//! [`take_turn`] is that pipeline as a pure function. The session uses it to
//! play, and the solver uses it to explore.

pub mod split;
pub mod switch;

pub use split::{apply_split_merge, SplitTransition};
pub use switch::{apply_switches, pressed_cells};

use crate::block::BlockState;
use crate::grid::{Grid, SwitchState};
use crate::resolve::{resolve, FootprintEvent};
use crate::types::Direction;

/// Everything one roll produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub block: BlockState,
    pub switches: SwitchState,
    pub event: FootprintEvent,
    /// Bitmask of switch groups flipped by this roll.
    pub toggled: u64,
    pub transition: Option<SplitTransition>,
}

/// Run one roll through resolve, switches and split/merge.
pub fn take_turn(
    grid: &Grid,
    block: BlockState,
    switches: SwitchState,
    dir: Direction,
) -> Turn {
    let resolution = resolve(block, dir, grid, &switches);
    let mut turn = Turn {
        block: resolution.block,
        switches,
        event: resolution.event,
        toggled: 0,
        transition: None,
    };

    if turn.event == FootprintEvent::Fall {
        return turn;
    }

    turn.toggled = apply_switches(grid, &block, &turn.block, &mut turn.switches);
    turn.transition = apply_split_merge(grid, &block, &mut turn.block);
    turn
}
