//! GameView: maps a level grid plus a `SessionSnapshot` into a terminal
//! framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{
    BlockState, FootprintEvent, GameOverReason, Grid, Phase, Pose, SessionSnapshot,
    SwitchActivation, SwitchState,
};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Axis, Command, Direction, Pos, SubBlock, TileKind, ViewMode};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Frontend-only state drawn alongside the session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Suggested next command, shown until the player acts.
    pub hint: Option<Command>,
}

impl From<ViewMode> for ViewState {
    fn from(mode: ViewMode) -> Self {
        Self { mode, hint: None }
    }
}

const BOARD_BG: Rgb = Rgb::new(20, 20, 28);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const FLOOR: CellStyle = CellStyle::new(Rgb::new(150, 150, 160), BOARD_BG);
const GOAL: CellStyle = CellStyle::new(Rgb::new(80, 220, 120), BOARD_BG).bold();
const FRAGILE: CellStyle = CellStyle::new(Rgb::new(255, 165, 0), BOARD_BG);
const SPLIT_TRIGGER: CellStyle = CellStyle::new(Rgb::new(120, 180, 255), BOARD_BG).bold();
const BRIDGE_OPEN: CellStyle = CellStyle::new(Rgb::new(180, 180, 220), BOARD_BG);
const BRIDGE_CLOSED: CellStyle = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
const SWITCH: CellStyle = CellStyle::new(Rgb::new(240, 220, 80), BOARD_BG).bold();
const BLOCK: CellStyle = CellStyle::new(Rgb::new(220, 80, 80), BOARD_BG).bold();
const BLOCK_IDLE: CellStyle = CellStyle::new(Rgb::new(150, 60, 60), BOARD_BG).dim();

const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
const ALERT: CellStyle = CellStyle::new(Rgb::new(255, 90, 90), PANEL_BG).bold();
const OVERLAY: CellStyle = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();

/// A lightweight terminal renderer for the puzzle.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

/// Where the grid lands inside the frame for one render.
struct Layout {
    /// Top-left of the frame interior, in terminal cells.
    ix: u16,
    iy: u16,
    iw: u16,
    ih: u16,
    /// Offset of grid cell (0, 0) from the interior origin; may be negative
    /// when the camera scrolls.
    ox: i32,
    oy: i32,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render one frame into an existing framebuffer.
    ///
    /// Callers can reuse the framebuffer across frames; it is resized to the
    /// viewport when needed.
    pub fn render_into(
        &self,
        grid: &Grid,
        snap: &SessionSnapshot,
        state: ViewState,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_px_w = grid.width() * self.cell_w;
        let board_px_h = grid.height() * self.cell_h;
        let frame_w = (board_px_w + 2).min(viewport.width);
        let frame_h = (board_px_h + 2).min(viewport.height);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        let iw = frame_w.saturating_sub(2);
        let ih = frame_h.saturating_sub(2);
        fb.fill_rect(start_x + 1, start_y + 1, iw, ih, ' ', CellStyle::new(BOARD_BG, BOARD_BG));

        let (ox, oy) = match state.mode {
            ViewMode::Top => (
                (iw as i32 - board_px_w as i32) / 2,
                (ih as i32 - board_px_h as i32) / 2,
            ),
            ViewMode::Follow => {
                let anchor = camera_anchor(&snap.block.state);
                (
                    iw as i32 / 2 - anchor.x as i32 * self.cell_w as i32,
                    ih as i32 / 2 - anchor.y as i32 * self.cell_h as i32,
                )
            }
        };
        let layout = Layout {
            ix: start_x + 1,
            iy: start_y + 1,
            iw,
            ih,
            ox,
            oy,
        };

        self.draw_tiles(fb, &layout, grid, &snap.switches);
        self.draw_block(fb, &layout, &snap.block.state);
        self.draw_side_panel(fb, snap, state, viewport, start_x, start_y, frame_w);
        self.draw_overlay(fb, snap, start_x, start_y, frame_w, frame_h);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        grid: &Grid,
        snap: &SessionSnapshot,
        state: ViewState,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(grid, snap, state, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_tiles(&self, fb: &mut FrameBuffer, layout: &Layout, grid: &Grid, switches: &SwitchState) {
        for (pos, tile) in grid.cells() {
            let glyph = if pos == grid.goal() {
                Some(('▓', GOAL))
            } else {
                match tile {
                    TileKind::Hole => None,
                    TileKind::Floor => Some(('░', FLOOR)),
                    TileKind::Fragile => Some(('░', FRAGILE)),
                    TileKind::SplitTrigger => Some(('x', SPLIT_TRIGGER)),
                    TileKind::ConditionalFloor => {
                        let open = grid
                            .controlling_group(pos)
                            .is_some_and(|group| switches.is_open(group));
                        if open {
                            Some(('=', BRIDGE_OPEN))
                        } else {
                            Some(('·', BRIDGE_CLOSED))
                        }
                    }
                }
            };
            if let Some((ch, style)) = glyph {
                self.fill_grid_cell(fb, layout, pos, ch, style);
            }
        }

        for group in grid.switch_groups() {
            let ch = match group.activation {
                SwitchActivation::Any => 'o',
                SwitchActivation::Exact => 'O',
            };
            for &pos in &group.triggers {
                self.fill_grid_cell(fb, layout, pos, ch, SWITCH);
            }
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, layout: &Layout, block: &BlockState) {
        match *block {
            BlockState::Joined { .. } => {
                for pos in block.footprint() {
                    self.fill_grid_cell(fb, layout, pos, '█', BLOCK);
                }
            }
            BlockState::Split { active, cells } => {
                let idle = cells[active.other().index()];
                self.fill_grid_cell(fb, layout, idle, '█', BLOCK_IDLE);
                self.fill_grid_cell(fb, layout, cells[active.index()], '█', BLOCK);
            }
        }
    }

    /// Paint one grid cell, clipped to the frame interior.
    fn fill_grid_cell(&self, fb: &mut FrameBuffer, layout: &Layout, pos: Pos, ch: char, style: CellStyle) {
        let px = layout.ox + pos.x as i32 * self.cell_w as i32;
        let py = layout.oy + pos.y as i32 * self.cell_h as i32;
        for dy in 0..self.cell_h as i32 {
            for dx in 0..self.cell_w as i32 {
                let x = px + dx;
                let y = py + dy;
                if x < 0 || y < 0 || x >= layout.iw as i32 || y >= layout.ih as i32 {
                    continue;
                }
                fb.put_char(layout.ix + x as u16, layout.iy + y as u16, ch, style);
            }
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        state: ViewState,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        if viewport.width - panel_x < 12 {
            return;
        }
        let value_x = panel_x + 6;

        let mut y = start_y;
        fb.put_str(panel_x, y, "LEVEL", LABEL);
        let x = fb.put_u32(value_x, y, snap.level_index as u32 + 1, VALUE);
        let x = fb.put_str(x, y, "/", VALUE);
        fb.put_u32(x, y, snap.level_count as u32, VALUE);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &snap.level_name, VALUE.dim());
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LIVES", LABEL);
        fb.put_u32(value_x, y, snap.lives, VALUE);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "MOVES", LABEL);
        fb.put_i32(value_x, y, snap.moves_remaining, VALUE);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "TIME", LABEL);
        fb.put_u32(value_x, y, snap.elapsed_secs().min(u32::MAX as u64) as u32, VALUE);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "POSE", LABEL);
        let pose = match (snap.block.pose, snap.block.active) {
            (Some(Pose::Standing), _) => "STANDING",
            (Some(Pose::Lying(Axis::X)), _) => "LYING X",
            (Some(Pose::Lying(Axis::Y)), _) => "LYING Y",
            (None, Some(SubBlock::Second)) => "SPLIT B",
            (None, _) => "SPLIT A",
        };
        fb.put_str(value_x, y, pose, VALUE);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "VIEW", LABEL);
        fb.put_str(value_x, y, state.mode.label(), VALUE);
        y = y.saturating_add(1);

        if let Some(hint) = state.hint.and_then(hint_label) {
            fb.put_str(panel_x, y, "HINT", LABEL);
            fb.put_str(value_x, y, hint, VALUE);
        }
        y = y.saturating_add(2);

        if snap.playable() && snap.last_event == Some(FootprintEvent::Fall) {
            fb.put_str(panel_x, y, "FELL! -1 LIFE", ALERT);
        }
    }

    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let headline = match snap.phase {
            Phase::Playing => return,
            Phase::LevelCleared => {
                fb.put_str_centered(start_x, mid_y, frame_w, "LEVEL CLEARED", OVERLAY);
                return;
            }
            Phase::GameOver(GameOverReason::Completed) => "CONGRATS!",
            Phase::GameOver(_) => "GAME OVER",
        };
        fb.put_str_centered(start_x, mid_y.saturating_sub(1), frame_w, headline, OVERLAY);

        let mut line = [0u8; 40];
        let text = completed_text(snap.levels_completed, &mut line);
        fb.put_str_centered(start_x, mid_y, frame_w, text, OVERLAY);
        fb.put_str_centered(start_x, mid_y.saturating_add(1), frame_w, "R NEW RUN  Q QUIT", VALUE);
    }
}

/// Cell the follow camera keeps centered.
fn camera_anchor(block: &BlockState) -> Pos {
    match *block {
        BlockState::Joined { cell, .. } => cell,
        BlockState::Split { active, cells } => cells[active.index()],
    }
}

fn hint_label(command: Command) -> Option<&'static str> {
    match command {
        Command::Move(Direction::Up) => Some("UP"),
        Command::Move(Direction::Down) => Some("DOWN"),
        Command::Move(Direction::Left) => Some("LEFT"),
        Command::Move(Direction::Right) => Some("RIGHT"),
        Command::ToggleActiveSubBlock => Some("SWAP"),
        _ => None,
    }
}

/// Format `COMPLETED N LEVELS` into `buf` without allocating.
fn completed_text(n: usize, buf: &mut [u8; 40]) -> &str {
    const HEAD: &[u8] = b"COMPLETED ";
    const TAIL: &[u8] = b" LEVELS";

    let mut digits = [0u8; 20];
    let mut len = 0;
    let mut v = n;
    loop {
        digits[len] = b'0' + (v % 10) as u8;
        len += 1;
        v /= 10;
        if v == 0 {
            break;
        }
    }

    let mut at = 0;
    for &b in HEAD {
        buf[at] = b;
        at += 1;
    }
    for &d in digits[..len].iter().rev() {
        buf[at] = d;
        at += 1;
    }
    for &b in TAIL {
        buf[at] = b;
        at += 1;
    }
    std::str::from_utf8(&buf[..at]).unwrap_or("COMPLETED")
}
