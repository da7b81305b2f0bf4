//! TUI Bloxorz (workspace facade crate).
//!
//! Exposes `tui_bloxorz::{core,engine,input,term,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tui_bloxorz_core as core;
pub use tui_bloxorz_engine as engine;
pub use tui_bloxorz_input as input;
pub use tui_bloxorz_term as term;
pub use tui_bloxorz_types as types;
