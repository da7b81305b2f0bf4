//! Level module - level definitions, packs, and load-time validation
//!
//! Levels are described declaratively: a list of map rows plus the switch
//! groups and split rule that belong to them. A [`LevelPack`] is the ordered
//! sequence of levels together with the life budget, stored as JSON.
//!
//! [`LevelDef::build`] is the only way to obtain a playable [`Grid`]; it checks
//! every structural invariant up front so gameplay never has to.
//!
//! # Map characters
//!
//! | char | tile |
//! |------|------|
//! | `.` / space | hole |
//! | `#` | floor |
//! | `S` | floor, block start (exactly one) |
//! | `G` | floor, goal (exactly one) |
//! | `=` | conditional floor (must be controlled by a switch) |
//! | `F` | fragile floor |
//! | `x` | split trigger (exactly two, adjacent) |

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, SplitRule, SwitchActivation, SwitchGroup, MAX_SWITCH_GROUPS};
use crate::types::{Pos, TileKind, DEFAULT_LIVES, MAX_GRID_DIM};

/// The pack compiled into the binary.
pub const BUILTIN_PACK_JSON: &str = include_str!("../levels/default.json");

/// Why a level or pack was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    Io { path: String, reason: String },
    Json { line: usize, column: usize, reason: String },
    EmptyPack,
    ZeroLives,
    NoSuchLevel { level: usize },
    EmptyMap { level: usize },
    TooLarge { level: usize },
    RaggedMap { level: usize, row: usize },
    UnknownTile { level: usize, pos: Pos, ch: char },
    MissingStart { level: usize },
    DuplicateStart { level: usize, pos: Pos },
    MissingGoal { level: usize },
    DuplicateGoal { level: usize, pos: Pos },
    OutOfBounds { level: usize, pos: Pos },
    BadSplitTriggers { level: usize },
    BadSplitTarget { level: usize, pos: Pos },
    NotConditional { level: usize, pos: Pos },
    UncontrolledBridge { level: usize, pos: Pos },
    SharedBridge { level: usize, pos: Pos },
    TooManySwitches { level: usize },
    ZeroBudget { level: usize },
    BudgetTooLarge { level: usize },
}

impl LevelError {
    pub fn code(&self) -> &'static str {
        match self {
            LevelError::Io { .. } => "io",
            LevelError::Json { .. } => "invalid_json",
            LevelError::EmptyPack | LevelError::ZeroLives | LevelError::NoSuchLevel { .. } => {
                "invalid_pack"
            }
            LevelError::EmptyMap { .. }
            | LevelError::TooLarge { .. }
            | LevelError::RaggedMap { .. }
            | LevelError::UnknownTile { .. } => "invalid_map",
            LevelError::MissingStart { .. }
            | LevelError::DuplicateStart { .. }
            | LevelError::MissingGoal { .. }
            | LevelError::DuplicateGoal { .. } => "invalid_markers",
            LevelError::OutOfBounds { .. }
            | LevelError::BadSplitTriggers { .. }
            | LevelError::BadSplitTarget { .. }
            | LevelError::NotConditional { .. }
            | LevelError::UncontrolledBridge { .. }
            | LevelError::SharedBridge { .. }
            | LevelError::TooManySwitches { .. } => "invalid_mechanics",
            LevelError::ZeroBudget { .. } | LevelError::BudgetTooLarge { .. } => "invalid_budget",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LevelError::Io { .. } => "could not read level pack",
            LevelError::Json { .. } => "level pack is not valid JSON",
            LevelError::EmptyPack => "level pack has no levels",
            LevelError::ZeroLives => "life budget must be at least 1",
            LevelError::NoSuchLevel { .. } => "level index out of range",
            LevelError::EmptyMap { .. } => "map has no rows",
            LevelError::TooLarge { .. } => "map exceeds the largest supported size",
            LevelError::RaggedMap { .. } => "map rows differ in length",
            LevelError::UnknownTile { .. } => "unknown map character",
            LevelError::MissingStart { .. } => "map has no start cell",
            LevelError::DuplicateStart { .. } => "map has more than one start cell",
            LevelError::MissingGoal { .. } => "map has no goal cell",
            LevelError::DuplicateGoal { .. } => "map has more than one goal cell",
            LevelError::OutOfBounds { .. } => "coordinate outside the map",
            LevelError::BadSplitTriggers { .. } => "split needs exactly two adjacent trigger cells",
            LevelError::BadSplitTarget { .. } => "split target is not walkable",
            LevelError::NotConditional { .. } => "switch controls a cell that is not a bridge",
            LevelError::UncontrolledBridge { .. } => "bridge cell has no switch",
            LevelError::SharedBridge { .. } => "bridge cell is controlled by more than one switch",
            LevelError::TooManySwitches { .. } => "too many switch groups",
            LevelError::ZeroBudget { .. } => "move budget must be at least 1",
            LevelError::BudgetTooLarge { .. } => "move budget exceeds the largest supported value",
        }
    }

    /// Level index the error refers to, if any.
    pub fn level(&self) -> Option<usize> {
        match self {
            LevelError::Io { .. }
            | LevelError::Json { .. }
            | LevelError::EmptyPack
            | LevelError::ZeroLives => None,
            LevelError::NoSuchLevel { level }
            | LevelError::EmptyMap { level }
            | LevelError::TooLarge { level }
            | LevelError::RaggedMap { level, .. }
            | LevelError::UnknownTile { level, .. }
            | LevelError::MissingStart { level }
            | LevelError::DuplicateStart { level, .. }
            | LevelError::MissingGoal { level }
            | LevelError::DuplicateGoal { level, .. }
            | LevelError::OutOfBounds { level, .. }
            | LevelError::BadSplitTriggers { level }
            | LevelError::BadSplitTarget { level, .. }
            | LevelError::NotConditional { level, .. }
            | LevelError::UncontrolledBridge { level, .. }
            | LevelError::SharedBridge { level, .. }
            | LevelError::TooManySwitches { level }
            | LevelError::ZeroBudget { level }
            | LevelError::BudgetTooLarge { level } => Some(*level),
        }
    }
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io { path, reason } => write!(f, "{}: {} ({})", path, self.message(), reason),
            LevelError::Json {
                line,
                column,
                reason,
            } => write!(f, "{} at {}:{}: {}", self.message(), line, column, reason),
            LevelError::RaggedMap { level, row } => {
                write!(f, "level {}: {} (row {})", level, self.message(), row)
            }
            LevelError::UnknownTile { level, pos, ch } => write!(
                f,
                "level {}: {} {:?} at ({}, {})",
                level,
                self.message(),
                ch,
                pos.x,
                pos.y
            ),
            LevelError::DuplicateStart { level, pos }
            | LevelError::DuplicateGoal { level, pos }
            | LevelError::OutOfBounds { level, pos }
            | LevelError::BadSplitTarget { level, pos }
            | LevelError::NotConditional { level, pos }
            | LevelError::UncontrolledBridge { level, pos }
            | LevelError::SharedBridge { level, pos } => write!(
                f,
                "level {}: {} at ({}, {})",
                level,
                self.message(),
                pos.x,
                pos.y
            ),
            other => match other.level() {
                Some(level) => write!(f, "level {}: {}", level, self.message()),
                None => f.write_str(self.message()),
            },
        }
    }
}

impl std::error::Error for LevelError {}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::Json {
            line: err.line(),
            column: err.column(),
            reason: err.to_string(),
        }
    }
}

/// A switch group as written in a level file. Coordinates are `[x, y]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDef {
    pub name: String,
    #[serde(default)]
    pub activation: SwitchActivation,
    pub triggers: Vec<(i16, i16)>,
    pub controls: Vec<(i16, i16)>,
}

/// Optional split settings. The trigger cells come from the map's `x` tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitDef {
    #[serde(default)]
    pub targets: Option<[(i16, i16); 2]>,
}

/// One level as written in a level file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub move_budget: u32,
    pub map: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub switches: Vec<SwitchDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitDef>,
}

/// A validated, playable level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub index: usize,
    /// Shared so per-frame snapshots can carry it without copying.
    pub name: Arc<str>,
    pub move_budget: u32,
    pub grid: Grid,
}

impl Level {
    /// Move budget as the session counts it.
    ///
    /// `build` rejects budgets above `i32::MAX`; a hand-built level saturates.
    pub fn budget(&self) -> i32 {
        i32::try_from(self.move_budget).unwrap_or(i32::MAX)
    }
}

impl LevelDef {
    pub fn new(name: &str, move_budget: u32, rows: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            move_budget,
            map: rows.iter().map(|row| row.to_string()).collect(),
            switches: Vec::new(),
            split: None,
        }
    }

    pub fn with_switch(
        mut self,
        name: &str,
        activation: SwitchActivation,
        triggers: &[(i16, i16)],
        controls: &[(i16, i16)],
    ) -> Self {
        self.switches.push(SwitchDef {
            name: name.to_string(),
            activation,
            triggers: triggers.to_vec(),
            controls: controls.to_vec(),
        });
        self
    }

    pub fn with_split_targets(mut self, targets: [(i16, i16); 2]) -> Self {
        self.split = Some(SplitDef {
            targets: Some(targets),
        });
        self
    }

    /// Validate the definition and build the playable level.
    ///
    /// `index` is the level's position in its pack and is only used to label
    /// errors.
    pub fn build(&self, index: usize) -> Result<Level, LevelError> {
        let level = index;
        if self.move_budget == 0 {
            return Err(LevelError::ZeroBudget { level });
        }
        if i32::try_from(self.move_budget).is_err() {
            return Err(LevelError::BudgetTooLarge { level });
        }

        let height = self.map.len();
        if height == 0 {
            return Err(LevelError::EmptyMap { level });
        }
        let width = self.map[0].chars().count();
        if width == 0 {
            return Err(LevelError::EmptyMap { level });
        }
        if width > MAX_GRID_DIM || height > MAX_GRID_DIM {
            return Err(LevelError::TooLarge { level });
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut start = None;
        let mut goal = None;
        let mut split_cells: Vec<Pos> = Vec::new();

        for (y, row) in self.map.iter().enumerate() {
            if row.chars().count() != width {
                return Err(LevelError::RaggedMap { level, row: y });
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = Pos::new(x as i16, y as i16);
                let tile =
                    TileKind::from_char(ch).ok_or(LevelError::UnknownTile { level, pos, ch })?;
                match ch {
                    'S' if start.is_some() => return Err(LevelError::DuplicateStart { level, pos }),
                    'S' => start = Some(pos),
                    'G' if goal.is_some() => return Err(LevelError::DuplicateGoal { level, pos }),
                    'G' => goal = Some(pos),
                    'x' => split_cells.push(pos),
                    _ => {}
                }
                tiles.push(tile);
            }
        }

        let start = start.ok_or(LevelError::MissingStart { level })?;
        let goal = goal.ok_or(LevelError::MissingGoal { level })?;

        let in_bounds = |(x, y): (i16, i16)| -> Result<Pos, LevelError> {
            let pos = Pos::new(x, y);
            if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
                return Err(LevelError::OutOfBounds { level, pos });
            }
            Ok(pos)
        };
        let tile_at = |pos: Pos| tiles[pos.y as usize * width + pos.x as usize];

        if self.switches.len() > MAX_SWITCH_GROUPS {
            return Err(LevelError::TooManySwitches { level });
        }

        let mut switch_groups = Vec::with_capacity(self.switches.len());
        for def in &self.switches {
            let triggers = def
                .triggers
                .iter()
                .map(|&c| in_bounds(c))
                .collect::<Result<Vec<_>, _>>()?;
            let controls = def
                .controls
                .iter()
                .map(|&c| in_bounds(c))
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(&pos) = controls
                .iter()
                .find(|&&pos| tile_at(pos) != TileKind::ConditionalFloor)
            {
                return Err(LevelError::NotConditional { level, pos });
            }
            switch_groups.push(SwitchGroup {
                name: def.name.clone(),
                activation: def.activation,
                triggers,
                controls,
            });
        }

        for (idx, tile) in tiles.iter().enumerate() {
            if *tile != TileKind::ConditionalFloor {
                continue;
            }
            let pos = Pos::new((idx % width) as i16, (idx / width) as i16);
            match switch_groups
                .iter()
                .filter(|g| g.controls.contains(&pos))
                .count()
            {
                0 => return Err(LevelError::UncontrolledBridge { level, pos }),
                1 => {}
                _ => return Err(LevelError::SharedBridge { level, pos }),
            }
        }

        let split = match (split_cells.as_slice(), self.split) {
            ([], None) => None,
            (&[a, b], def) if a.adjacent_axis(b).is_some() => {
                let targets = match def.and_then(|d| d.targets) {
                    Some([ta, tb]) => {
                        let targets = [in_bounds(ta)?, in_bounds(tb)?];
                        if let Some(&pos) = targets.iter().find(|&&pos| !tile_at(pos).is_walkable())
                        {
                            return Err(LevelError::BadSplitTarget { level, pos });
                        }
                        Some(targets)
                    }
                    None => None,
                };
                Some(SplitRule {
                    triggers: [a, b],
                    targets,
                })
            }
            _ => return Err(LevelError::BadSplitTriggers { level }),
        };

        let grid = Grid::from_parts(
            width as u16,
            height as u16,
            tiles,
            start,
            goal,
            switch_groups,
            split,
        );

        Ok(Level {
            index,
            name: Arc::from(self.name.as_str()),
            move_budget: self.move_budget,
            grid,
        })
    }
}

fn default_lives() -> u32 {
    DEFAULT_LIVES
}

/// Ordered levels plus the life budget granted at the start of each level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPack {
    #[serde(default = "default_lives")]
    pub lives: u32,
    pub levels: Vec<LevelDef>,
}

impl LevelPack {
    /// Parse a pack from JSON. Levels are validated by [`LevelPack::build`].
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| LevelError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// The four levels that ship with the game.
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_PACK_JSON)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every level, in order.
    pub fn build(&self) -> Result<Vec<Level>, LevelError> {
        if self.lives == 0 {
            return Err(LevelError::ZeroLives);
        }
        if self.levels.is_empty() {
            return Err(LevelError::EmptyPack);
        }
        self.levels
            .iter()
            .enumerate()
            .map(|(idx, def)| def.build(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(def: LevelDef) -> LevelError {
        def.build(2).unwrap_err()
    }

    #[test]
    fn test_builtin_pack_builds() {
        let pack = LevelPack::builtin().unwrap();
        assert_eq!(pack.lives, 3);
        let levels = pack.build().unwrap();
        assert_eq!(levels.len(), 4);
        assert_eq!(levels[1].grid.switch_groups().len(), 2);
        assert!(levels[3].grid.split_rule().is_some());
        assert_eq!(levels[3].index, 3);
    }

    #[test]
    fn test_marker_errors() {
        assert_eq!(
            err(LevelDef::new("l", 5, &["##G"])),
            LevelError::MissingStart { level: 2 }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &["S#S"])),
            LevelError::DuplicateStart {
                level: 2,
                pos: Pos::new(2, 0)
            }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &["S##"])),
            LevelError::MissingGoal { level: 2 }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &["SGG"])).code(),
            "invalid_markers"
        );
    }

    #[test]
    fn test_map_shape_errors() {
        assert_eq!(err(LevelDef::new("l", 5, &[])), LevelError::EmptyMap { level: 2 });
        assert_eq!(
            err(LevelDef::new("l", 5, &["S#G", "##"])),
            LevelError::RaggedMap { level: 2, row: 1 }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &["S?G"])),
            LevelError::UnknownTile {
                level: 2,
                pos: Pos::new(1, 0),
                ch: '?'
            }
        );
        assert_eq!(err(LevelDef::new("l", 0, &["SG"])), LevelError::ZeroBudget { level: 2 });
    }

    #[test]
    fn test_budget_must_fit_the_move_counter() {
        let over = i32::MAX as u32 + 1;
        let e = err(LevelDef::new("l", over, &["S####G#", "#######"]));
        assert_eq!(e, LevelError::BudgetTooLarge { level: 2 });
        assert_eq!(e.code(), "invalid_budget");

        let level = LevelDef::new("l", i32::MAX as u32, &["S####G#", "#######"])
            .build(0)
            .unwrap();
        assert_eq!(level.budget(), i32::MAX);
    }

    #[test]
    fn test_switch_errors() {
        let bridge = ["S#=#G"];
        assert_eq!(
            err(LevelDef::new("l", 5, &bridge)),
            LevelError::UncontrolledBridge {
                level: 2,
                pos: Pos::new(2, 0)
            }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &bridge).with_switch(
                "s",
                SwitchActivation::Exact,
                &[(1, 0)],
                &[(3, 0)]
            )),
            LevelError::NotConditional {
                level: 2,
                pos: Pos::new(3, 0)
            }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &bridge).with_switch(
                "s",
                SwitchActivation::Exact,
                &[(9, 0)],
                &[(2, 0)]
            )),
            LevelError::OutOfBounds {
                level: 2,
                pos: Pos::new(9, 0)
            }
        );
    }

    #[test]
    fn test_bridge_owned_by_two_switches_is_rejected() {
        let def = LevelDef::new("l", 5, &["S#==G"])
            .with_switch("a", SwitchActivation::Exact, &[(1, 0)], &[(2, 0), (3, 0)])
            .with_switch("b", SwitchActivation::Any, &[(4, 0)], &[(3, 0)]);
        let e = err(def);
        assert_eq!(
            e,
            LevelError::SharedBridge {
                level: 2,
                pos: Pos::new(3, 0)
            }
        );
        assert_eq!(e.code(), "invalid_mechanics");
    }

    #[test]
    fn test_split_errors() {
        assert_eq!(
            err(LevelDef::new("l", 5, &["Sx#xG"])),
            LevelError::BadSplitTriggers { level: 2 }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &["Sx##G"])),
            LevelError::BadSplitTriggers { level: 2 }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &["S###G"]).with_split_targets([(1, 0), (2, 0)])),
            LevelError::BadSplitTriggers { level: 2 }
        );
        assert_eq!(
            err(LevelDef::new("l", 5, &["Sxx.G"]).with_split_targets([(3, 0), (4, 0)])),
            LevelError::BadSplitTarget {
                level: 2,
                pos: Pos::new(3, 0)
            }
        );
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            LevelPack::from_json("{ not json"),
            Err(LevelError::Json { line: 1, .. })
        ));
        let empty = LevelPack::from_json(r#"{"levels": []}"#).unwrap();
        assert_eq!(empty.lives, DEFAULT_LIVES);
        assert_eq!(empty.build(), Err(LevelError::EmptyPack));

        let dead = LevelPack::from_json(r#"{"lives": 0, "levels": []}"#).unwrap();
        assert_eq!(dead.build(), Err(LevelError::ZeroLives));
    }

    #[test]
    fn test_json_defaults_and_roundtrip() {
        let json = r#"{
            "levels": [{
                "name": "one",
                "move_budget": 9,
                "map": ["S#=G"],
                "switches": [{"name": "s", "triggers": [[1, 0]], "controls": [[2, 0]]}]
            }]
        }"#;
        let pack = LevelPack::from_json(json).unwrap();
        assert_eq!(pack.levels[0].switches[0].activation, SwitchActivation::Exact);
        let again = LevelPack::from_json(&pack.to_json().unwrap()).unwrap();
        assert_eq!(again, pack);
    }

    #[test]
    fn test_error_display_mentions_level_and_position() {
        let e = LevelError::UncontrolledBridge {
            level: 1,
            pos: Pos::new(4, 2),
        };
        assert_eq!(e.to_string(), "level 1: bridge cell has no switch at (4, 2)");
        assert_eq!(LevelError::EmptyPack.to_string(), "level pack has no levels");
        assert_eq!(LevelError::EmptyPack.level(), None);
    }
}
