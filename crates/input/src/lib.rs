//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::Command`]s. Rolls are
//! discrete, so there is no auto-repeat handling: one key press is one
//! command.

pub mod map;

pub use tui_bloxorz_types as types;

pub use map::{handle_key_event, should_quit};
