//! Grid module - the per-level tile map
//!
//! A grid is a `width x height` map of [`TileKind`]s stored as a flat,
//! row-major array, plus the declarative mechanic data attached to the level:
//! switch groups (trigger cells that open/close bridge tiles) and an optional
//! split rule.
//!
//! The grid never changes while a level is being played. Everything that does
//! change (which bridges are open) lives in [`SwitchState`], owned by the
//! session and passed alongside the grid.
//!
//! Coordinates: (x, y) where x is the column and y the row; (0, 0) is top-left.

use serde::{Deserialize, Serialize};

use crate::level::{LevelDef, LevelError};
use crate::types::{Pos, TileKind};

/// Most switch groups a single level may declare.
pub const MAX_SWITCH_GROUPS: usize = 64;

/// How a switch decides that the block is pressing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchActivation {
    /// The whole footprint must equal the trigger set (heavy switch).
    #[default]
    Exact,
    /// Any freshly occupied cell on a trigger is enough (soft switch).
    Any,
}

/// A named set of trigger cells that toggles a set of bridge cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchGroup {
    pub name: String,
    pub activation: SwitchActivation,
    pub triggers: Vec<Pos>,
    pub controls: Vec<Pos>,
}

/// Where the block breaks in two, and where the halves land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRule {
    /// Two adjacent cells a lying block must cover exactly.
    pub triggers: [Pos; 2],
    /// Landing cells for the halves; `None` keeps them on the triggers.
    pub targets: Option<[Pos; 2]>,
}

impl SplitRule {
    /// Cells the two sub-blocks occupy right after splitting.
    pub fn landing(&self) -> [Pos; 2] {
        self.targets.unwrap_or(self.triggers)
    }
}

/// Open/closed flags for every switch group of a level, one bit per group.
///
/// All groups start closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwitchState {
    bits: u64,
}

impl SwitchState {
    pub fn closed() -> Self {
        Self { bits: 0 }
    }

    pub fn is_open(&self, group: usize) -> bool {
        group < MAX_SWITCH_GROUPS && self.bits & (1 << group) != 0
    }

    pub fn toggle(&mut self, group: usize) {
        if group < MAX_SWITCH_GROUPS {
            self.bits ^= 1 << group;
        }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }
}

/// The level's tile map and mechanic declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Flat array of tiles, row-major order (y * width + x)
    tiles: Vec<TileKind>,
    start: Pos,
    goal: Pos,
    switch_groups: Vec<SwitchGroup>,
    split: Option<SplitRule>,
}

impl Grid {
    /// Assemble a grid from already-validated parts.
    ///
    /// Callers outside the level loader should go through
    /// [`crate::level::LevelDef`], which checks every invariant first.
    pub(crate) fn from_parts(
        width: u16,
        height: u16,
        tiles: Vec<TileKind>,
        start: Pos,
        goal: Pos,
        switch_groups: Vec<SwitchGroup>,
        split: Option<SplitRule>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), width as usize * height as usize);
        Self {
            width,
            height,
            tiles,
            start,
            goal,
            switch_groups,
            split,
        }
    }

    /// Build a mechanic-free grid straight from level-map rows.
    pub fn from_map(rows: &[&str]) -> Result<Self, LevelError> {
        LevelDef::new("map", 1, rows).build(0).map(|level| level.grid)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if self.is_out_of_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn switch_groups(&self) -> &[SwitchGroup] {
        &self.switch_groups
    }

    pub fn split_rule(&self) -> Option<&SplitRule> {
        self.split.as_ref()
    }

    pub fn is_out_of_bounds(&self, pos: Pos) -> bool {
        pos.x < 0 || pos.y < 0 || pos.x >= self.width as i16 || pos.y >= self.height as i16
    }

    /// Tile at `pos`, or `None` outside the grid.
    pub fn tile(&self, pos: Pos) -> Option<TileKind> {
        self.index(pos).map(|idx| self.tiles[idx])
    }

    /// Index of the switch group that controls the bridge at `pos`.
    pub fn controlling_group(&self, pos: Pos) -> Option<usize> {
        self.switch_groups
            .iter()
            .position(|group| group.controls.contains(&pos))
    }

    /// Can a cube of the block rest on `pos`?
    ///
    /// `standing` is true when the full height of the block presses on this
    /// one cell, which fragile tiles cannot bear. Out-of-bounds cells never
    /// support anything.
    pub fn supports(&self, pos: Pos, standing: bool, switches: &SwitchState) -> bool {
        match self.tile(pos) {
            None | Some(TileKind::Hole) => false,
            Some(TileKind::Floor) | Some(TileKind::SplitTrigger) => true,
            Some(TileKind::Fragile) => !standing,
            Some(TileKind::ConditionalFloor) => self
                .controlling_group(pos)
                .is_some_and(|group| switches.is_open(group)),
        }
    }

    /// Iterate every `(pos, tile)` pair in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, TileKind)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            let pos = Pos::new((idx % width) as i16, (idx / width) as i16);
            (pos, *tile)
        })
    }

    /// Render the tile map back into level-map rows (for debugging/tests).
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as i16)
            .map(|y| {
                (0..self.width as i16)
                    .map(|x| {
                        let pos = Pos::new(x, y);
                        if pos == self.start {
                            'S'
                        } else if pos == self.goal {
                            'G'
                        } else {
                            self.tile(pos).unwrap_or_default().as_char()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
