//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains every rule of the rolling-block puzzle: the tile map,
//! the block's orientation, how a roll moves it, what the tiles do in response
//! and how a run is scored in lives and moves. It has **no dependencies** on
//! terminal I/O, so the same session can be driven by the TUI, by the solver or
//! headless from tests.
//!
//! # Module Structure
//!
//! - [`grid`]: per-level tile map, switch groups, split rule, switch state
//! - [`block`]: the block's footprint and orientation (`Joined` or `Split`)
//! - [`resolve`]: rolling geometry and footprint classification
//! - [`mechanics`]: switch/bridge and split/merge, plus the per-move pipeline
//! - [`level`]: JSON level packs, validation, and the built-in levels
//! - [`session`]: lives, move budget, clock, and level progression
//! - [`snapshot`]: read-only per-frame view of a session
//!
//! # Rules
//!
//! - A roll tips a standing block onto its side, stands a lying block back
//!   up, or slides a lying block sideways.
//! - Any footprint cell over a hole, off the map, over a closed bridge, or a
//!   fragile tile under a standing block is a fall: one life is lost and the
//!   level restarts.
//! - Standing on the goal clears the level.
//! - Every legal roll spends one move; running out of moves costs one life.
//!
//! # Example
//!
//! ```
//! use tui_bloxorz_core::{FootprintEvent, GameSession, LevelDef, Phase, SessionConfig};
//! use tui_bloxorz_types::Direction;
//!
//! let level = LevelDef::new("corridor", 5, &["S##G#"]).build(0).unwrap();
//! let mut session = GameSession::new(vec![level], SessionConfig::default()).unwrap();
//!
//! assert_eq!(session.apply_move(Direction::Right), Some(FootprintEvent::Continue));
//! assert_eq!(session.apply_move(Direction::Right), Some(FootprintEvent::Goal));
//! assert_eq!(session.phase(), Phase::LevelCleared);
//! ```
//!
//! # Timing
//!
//! Gameplay is purely discrete. The only clock is the session's elapsed time
//! and the short `LevelCleared` pause, both advanced by
//! [`GameSession::tick`](session::GameSession::tick) with the frame's elapsed
//! milliseconds.

pub mod block;
pub mod grid;
pub mod level;
pub mod mechanics;
pub mod resolve;
pub mod session;
pub mod snapshot;

pub use tui_bloxorz_types as types;

// Re-export commonly used types for convenience
pub use block::{BlockState, Footprint, Pose};
pub use grid::{Grid, SplitRule, SwitchActivation, SwitchGroup, SwitchState};
pub use level::{Level, LevelDef, LevelError, LevelPack};
pub use mechanics::{take_turn, SplitTransition, Turn};
pub use resolve::{classify, resolve, roll, FootprintEvent, Resolution};
pub use session::{GameOverReason, GameSession, Phase, SessionConfig};
pub use snapshot::{BlockSnapshot, SessionSnapshot};
