//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, solver, terminal rendering).
//!
//! # Coordinates
//!
//! Grid positions are `(x, y)` with `x` growing left to right (columns) and `y`
//! growing top to bottom (rows). `Direction::Up` therefore decrements `y`.
//!
//! # Budgets
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_LIVES` | 3 | Lives granted at the start of every fresh level |
//! | `MAX_GRID_DIM` | 100 | Largest accepted grid width/height |
//! | `TICK_MS` | 16 | Fixed frame interval of the terminal loop (~60 FPS) |
//! | `LEVEL_CLEAR_PAUSE_MS` | 600 | Time spent in `LevelCleared` before the next level loads |
//!
//! # Examples
//!
//! ```
//! use tui_bloxorz_types::{Axis, Direction, Pos, TileKind};
//!
//! let p = Pos::new(2, 3);
//! assert_eq!(p.step(Direction::Right), Pos::new(3, 3));
//! assert_eq!(p.step(Direction::Up), Pos::new(2, 2));
//! assert_eq!(Direction::Left.axis(), Axis::X);
//!
//! assert_eq!(TileKind::from_char('#'), Some(TileKind::Floor));
//! assert!(!TileKind::Hole.is_walkable());
//! ```

/// Lives granted at the start of every fresh level.
pub const DEFAULT_LIVES: u32 = 3;

/// Largest accepted grid width or height.
pub const MAX_GRID_DIM: usize = 100;

/// Fixed frame interval of the terminal loop in milliseconds (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// How long a cleared level stays on screen before the next one loads.
pub const LEVEL_CLEAR_PAUSE_MS: u32 = 600;

/// A grid cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pos {
    pub x: i16,
    pub y: i16,
}

impl Pos {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Offset by `n` unit steps in `dir`.
    pub fn offset(self, dir: Direction, n: i16) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * n,
            y: self.y + dy * n,
        }
    }

    /// One step in `dir`.
    pub fn step(self, dir: Direction) -> Self {
        self.offset(dir, 1)
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) as u32 + self.y.abs_diff(other.y) as u32
    }

    /// The axis shared by two orthogonally adjacent cells.
    ///
    /// Returns `None` unless the cells are exactly one step apart.
    pub fn adjacent_axis(self, other: Pos) -> Option<Axis> {
        if self.manhattan(other) != 1 {
            return None;
        }
        if self.y == other.y {
            Some(Axis::X)
        } else {
            Some(Axis::Y)
        }
    }
}

impl From<(i16, i16)> for Pos {
    fn from((x, y): (i16, i16)) -> Self {
        Self { x, y }
    }
}

/// Grid axis a lying block is aligned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Unit vector pointing towards increasing coordinates along the axis.
    pub fn unit(self) -> (i16, i16) {
        match self {
            Axis::X => (1, 0),
            Axis::Y => (0, 1),
        }
    }
}

/// Cardinal roll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit `(dx, dy)` step.
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Up | Direction::Down => Axis::Y,
        }
    }

    /// True when the direction walks towards increasing coordinates.
    pub fn is_positive(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r".
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Single uppercase letter, used for compact solution strings.
    pub fn letter(&self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// What a grid cell is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    /// Not walkable. Any footprint cell here is a fall.
    #[default]
    Hole,
    /// Plain walkable floor.
    Floor,
    /// Bridge tile: walkable only while its switch group is open.
    ConditionalFloor,
    /// Floor that arms the split mechanic when fully covered.
    SplitTrigger,
    /// Floor that gives way under a standing block.
    Fragile,
}

impl TileKind {
    /// Parse a level-map character.
    ///
    /// `S` and `G` are plain floor; the loader records their positions
    /// separately as the start and goal cells.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | ' ' => Some(TileKind::Hole),
            '#' | 'S' | 'G' => Some(TileKind::Floor),
            '=' => Some(TileKind::ConditionalFloor),
            'x' => Some(TileKind::SplitTrigger),
            'F' => Some(TileKind::Fragile),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            TileKind::Hole => '.',
            TileKind::Floor => '#',
            TileKind::ConditionalFloor => '=',
            TileKind::SplitTrigger => 'x',
            TileKind::Fragile => 'F',
        }
    }

    /// Walkable regardless of switch state and block pose.
    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            TileKind::Floor | TileKind::SplitTrigger | TileKind::Fragile
        )
    }
}

/// Which half of a split block responds to movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubBlock {
    #[default]
    First,
    Second,
}

impl SubBlock {
    pub fn index(self) -> usize {
        match self {
            SubBlock::First => 0,
            SubBlock::Second => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            SubBlock::First => SubBlock::Second,
            SubBlock::Second => SubBlock::First,
        }
    }
}

/// Commands the input layer feeds into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Roll the block (or the active sub-block) one step
    Move(Direction),
    /// Swap which sub-block responds to movement (split mode only)
    ToggleActiveSubBlock,
    /// Reset the current level, or start a new run after game over
    RestartLevel,
    /// End the run
    Quit,
    /// Cycle the frontend's view mode; ignored by the core
    ToggleView,
    /// Ask the frontend for the next step of a shortest solution; ignored by
    /// the core
    Hint,
}

/// Frontend camera modes, cycled by [`Command::ToggleView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Whole grid centered in the viewport
    #[default]
    Top,
    /// Grid scrolled so the block stays centered
    Follow,
}

impl ViewMode {
    pub fn next(self) -> Self {
        match self {
            ViewMode::Top => ViewMode::Follow,
            ViewMode::Follow => ViewMode::Top,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Top => "TOP VIEW",
            ViewMode::Follow => "FOLLOW VIEW",
        }
    }
}
