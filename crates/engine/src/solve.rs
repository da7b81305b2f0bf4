use std::collections::{HashMap, VecDeque};

use tracing::debug;

use tui_bloxorz_core::{
    take_turn, BlockState, FootprintEvent, GameSession, Grid, Level, Phase, SwitchState,
};
use tui_bloxorz_types::{Command, Direction};

/// Upper bound on explored states; keeps pathological packs from hanging.
const MAX_STATES: usize = 1 << 20;

type Node = (BlockState, SwitchState);

/// A winning command sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub commands: Vec<Command>,
    /// Rolls only; toggling the active sub-block is free.
    pub moves: u32,
    /// States dequeued before the goal was found.
    pub explored: usize,
}

impl Solution {
    /// Compact form, e.g. `RDDRRDR`; `T` marks a sub-block toggle.
    pub fn to_letters(&self) -> String {
        self.commands
            .iter()
            .map(|cmd| match cmd {
                Command::Move(dir) => dir.letter(),
                _ => 'T',
            })
            .collect()
    }
}

/// Fewest-moves solution of `level` from its start.
pub fn solve(level: &Level) -> Option<Solution> {
    let grid = &level.grid;
    solve_from(grid, BlockState::standing(grid.start()), SwitchState::closed())
}

/// Fewest-moves solution from an arbitrary state.
///
/// Rolls cost one and toggles cost nothing, so this is a 0-1 BFS: toggles go
/// to the front of the queue.
pub fn solve_from(grid: &Grid, block: BlockState, switches: SwitchState) -> Option<Solution> {
    let start: Node = (block, switches);
    let mut parent: HashMap<Node, Option<(Node, Command)>> = HashMap::new();
    let mut dist: HashMap<Node, u32> = HashMap::new();
    let mut queue = VecDeque::new();

    parent.insert(start, None);
    dist.insert(start, 0);
    queue.push_back(start);
    let mut explored = 0usize;

    while let Some(node) = queue.pop_front() {
        explored += 1;
        if explored > MAX_STATES {
            debug!(explored, "solver gave up");
            return None;
        }
        let d = dist[&node];
        let (block, switches) = node;

        let mut toggled = block;
        if toggled.toggle_active() {
            let next = (toggled, switches);
            if !matches!(dist.get(&next), Some(&nd) if nd <= d) {
                dist.insert(next, d);
                parent.insert(next, Some((node, Command::ToggleActiveSubBlock)));
                queue.push_front(next);
            }
        }

        for dir in Direction::ALL {
            let turn = take_turn(grid, block, switches, dir);
            match turn.event {
                FootprintEvent::Fall => continue,
                FootprintEvent::Goal => {
                    let mut commands = unwind(&parent, node);
                    commands.reverse();
                    commands.push(Command::Move(dir));
                    debug!(moves = d + 1, explored, "solution found");
                    return Some(Solution {
                        commands,
                        moves: d + 1,
                        explored,
                    });
                }
                FootprintEvent::Continue => {
                    let next = (turn.block, turn.switches);
                    if !matches!(dist.get(&next), Some(&nd) if nd <= d + 1) {
                        dist.insert(next, d + 1);
                        parent.insert(next, Some((node, Command::Move(dir))));
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    None
}

/// Commands leading to `node`, last one first.
fn unwind(parent: &HashMap<Node, Option<(Node, Command)>>, mut node: Node) -> Vec<Command> {
    let mut out = Vec::new();
    while let Some(Some((prev, cmd))) = parent.get(&node) {
        out.push(*cmd);
        node = *prev;
    }
    out
}

/// Next command on a fewest-moves path from the session's current state.
pub fn hint(session: &GameSession) -> Option<Command> {
    if session.phase() != Phase::Playing {
        return None;
    }
    solve_from(session.grid(), session.block(), session.switches())
        .and_then(|solution| solution.commands.first().copied())
}
