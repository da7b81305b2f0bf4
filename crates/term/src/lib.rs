//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! libraries and renders into a plain framebuffer that is diffed and flushed
//! to the terminal.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: grid + session snapshot → framebuffer (pure)
//! - [`renderer`]: framebuffer → terminal, with diffing

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_bloxorz_core as core;
pub use tui_bloxorz_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, ViewState, Viewport};
pub use renderer::{encode_frame_into, TerminalRenderer};
