//! Switch/bridge mechanic.
//!
//! After every move that does not fall, each switch group checks whether the
//! block is pressing its triggers and, if so, flips its bridge tiles between
//! open and closed. The flip happens once per move, never per frame.

use tracing::trace;

use crate::block::{BlockState, Footprint};
use crate::grid::{Grid, SwitchActivation, SwitchState};

/// Cells that became occupied by the move from `before` to `after`.
///
/// For a joined block that is the whole new footprint. For a split block it is
/// only the cube that moved; the resting cube does not press anything again.
pub fn pressed_cells(before: &BlockState, after: &BlockState) -> Footprint {
    match (before, after) {
        (BlockState::Split { .. }, BlockState::Split { active, cells }) => {
            let mut pressed = Footprint::new();
            pressed.push(cells[active.index()]);
            pressed
        }
        _ => after.footprint(),
    }
}

/// Flip every switch group that `after` triggers.
///
/// Returns a bitmask of the groups that toggled (bit `i` = group `i`).
pub fn apply_switches(
    grid: &Grid,
    before: &BlockState,
    after: &BlockState,
    switches: &mut SwitchState,
) -> u64 {
    let pressed = pressed_cells(before, after);
    let mut toggled = 0u64;

    for (idx, group) in grid.switch_groups().iter().enumerate() {
        let hit = match group.activation {
            SwitchActivation::Exact => after.covers_exactly(&group.triggers),
            SwitchActivation::Any => pressed.iter().any(|p| group.triggers.contains(p)),
        };
        if hit {
            switches.toggle(idx);
            toggled |= 1 << idx;
            trace!(
                group = %group.name,
                open = switches.is_open(idx),
                "switch toggled"
            );
        }
    }

    toggled
}
