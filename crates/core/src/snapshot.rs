use std::sync::Arc;

use crate::block::{BlockState, Footprint, Pose};
use crate::grid::SwitchState;
use crate::resolve::FootprintEvent;
use crate::session::Phase;
use crate::types::{Pos, SubBlock};

/// Where the block is and how it is oriented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSnapshot {
    pub state: BlockState,
    pub footprint: Footprint,
    /// `None` while split.
    pub pose: Option<Pose>,
    /// `None` while joined.
    pub active: Option<SubBlock>,
}

impl From<BlockState> for BlockSnapshot {
    fn from(value: BlockState) -> Self {
        Self {
            state: value,
            footprint: value.footprint(),
            pose: value.pose(),
            active: value.active(),
        }
    }
}

impl BlockSnapshot {
    /// Cell of the sub-block that responds to moves, when split.
    pub fn active_cell(&self) -> Option<Pos> {
        match self.state {
            BlockState::Split { active, cells } => Some(cells[active.index()]),
            BlockState::Joined { .. } => None,
        }
    }
}

/// Read-only view of a session, produced once per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub level_index: usize,
    pub level_count: usize,
    pub level_name: Arc<str>,
    pub block: BlockSnapshot,
    pub lives: u32,
    pub moves_remaining: i32,
    pub move_budget: u32,
    pub elapsed_ms: u64,
    pub phase: Phase,
    pub last_event: Option<FootprintEvent>,
    pub switches: SwitchState,
    pub moves_made: u32,
    pub falls: u32,
    pub levels_completed: usize,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Whole seconds on the session clock.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }
}
