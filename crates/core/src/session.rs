//! Session module - lives, move budget, clock, and level progression
//!
//! [`GameSession`] is the one owned value the frontend talks to. It holds the
//! validated levels, the current grid/block/switch state and all bookkeeping.
//! Every entry point is a plain method call that returns what changed; no
//! command ever fails, commands that make no sense in the current phase are
//! ignored.

use std::sync::Arc;

use tracing::{debug, info};

use crate::block::BlockState;
use crate::grid::{Grid, SwitchState};
use crate::level::{Level, LevelError, LevelPack};
use crate::mechanics::take_turn;
use crate::resolve::FootprintEvent;
use crate::snapshot::SessionSnapshot;
use crate::types::{Command, Direction, DEFAULT_LIVES, LEVEL_CLEAR_PAUSE_MS};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    OutOfLives,
    /// Every level of the pack was cleared.
    Completed,
    Quit,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::OutOfLives => "out_of_lives",
            GameOverReason::Completed => "completed",
            GameOverReason::Quit => "quit",
        }
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Playing,
    /// The goal was reached; the next level loads on `tick` or `advance_level`.
    LevelCleared,
    GameOver(GameOverReason),
}

impl Phase {
    pub fn is_game_over(&self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

/// Tunables that are not part of any single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lives granted each time a fresh level starts.
    pub lives: u32,
    /// Time `LevelCleared` lasts before `tick` loads the next level.
    pub level_clear_pause_ms: u32,
    /// Level the session opens on.
    pub start_level: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lives: DEFAULT_LIVES,
            level_clear_pause_ms: LEVEL_CLEAR_PAUSE_MS,
            start_level: 0,
        }
    }
}

impl SessionConfig {
    pub fn from_pack(pack: &LevelPack) -> Self {
        Self {
            lives: pack.lives,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    levels: Vec<Level>,
    config: SessionConfig,
    level_idx: usize,
    block: BlockState,
    switches: SwitchState,
    lives: u32,
    moves_remaining: i32,
    /// Run clock; only advances while playing.
    elapsed_ms: u64,
    /// Time spent in the current `LevelCleared` pause.
    clear_timer_ms: u32,
    phase: Phase,
    last_event: Option<FootprintEvent>,
    moves_made: u32,
    falls: u32,
    levels_completed: usize,
}

impl GameSession {
    /// Start a run over already-validated levels.
    pub fn new(levels: Vec<Level>, config: SessionConfig) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyPack);
        }
        if config.lives == 0 {
            return Err(LevelError::ZeroLives);
        }
        if config.start_level >= levels.len() {
            return Err(LevelError::NoSuchLevel {
                level: config.start_level,
            });
        }

        let first = &levels[config.start_level];
        let mut session = Self {
            block: BlockState::standing(first.grid.start()),
            switches: SwitchState::closed(),
            lives: config.lives,
            moves_remaining: first.budget(),
            levels,
            config,
            level_idx: config.start_level,
            elapsed_ms: 0,
            clear_timer_ms: 0,
            phase: Phase::Playing,
            last_event: None,
            moves_made: 0,
            falls: 0,
            levels_completed: 0,
        };
        session.load_level(config.start_level);
        Ok(session)
    }

    /// Validate a pack and open it with its own life budget.
    pub fn from_pack(pack: &LevelPack) -> Result<Self, LevelError> {
        Self::new(pack.build()?, SessionConfig::from_pack(pack))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.level_idx]
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn grid(&self) -> &Grid {
        &self.level().grid
    }

    pub fn level_index(&self) -> usize {
        self.level_idx
    }

    pub fn block(&self) -> BlockState {
        self.block
    }

    pub fn switches(&self) -> SwitchState {
        self.switches
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn moves_remaining(&self) -> i32 {
        self.moves_remaining
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_event(&self) -> Option<FootprintEvent> {
        self.last_event
    }

    pub fn levels_completed(&self) -> usize {
        self.levels_completed
    }

    /// Roll the block (or the active sub-block) one step.
    ///
    /// Returns the footprint event, or `None` when the session is not
    /// playing.
    pub fn apply_move(&mut self, dir: Direction) -> Option<FootprintEvent> {
        if self.phase != Phase::Playing {
            return None;
        }

        let turn = take_turn(self.grid(), self.block, self.switches, dir);
        self.moves_made = self.moves_made.saturating_add(1);
        self.last_event = Some(turn.event);

        match turn.event {
            FootprintEvent::Fall => {
                self.falls = self.falls.saturating_add(1);
                debug!(dir = dir.as_str(), lives = self.lives, "block fell");
                self.lose_life("fall");
            }
            FootprintEvent::Goal => {
                self.block = turn.block;
                self.switches = turn.switches;
                self.levels_completed += 1;
                self.clear_timer_ms = 0;
                self.phase = Phase::LevelCleared;
                info!(
                    level = self.level_idx,
                    moves = i64::from(self.level().budget()) - i64::from(self.moves_remaining) + 1,
                    "level cleared"
                );
            }
            FootprintEvent::Continue => {
                self.block = turn.block;
                self.switches = turn.switches;
                self.moves_remaining = self.moves_remaining.saturating_sub(1);
                if self.moves_remaining < 0 {
                    debug!(level = self.level_idx, "move budget exhausted");
                    self.lose_life("out_of_moves");
                }
            }
        }

        Some(turn.event)
    }

    /// Swap the active sub-block. Free, and only meaningful while split.
    pub fn toggle_active_sub_block(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let toggled = self.block.toggle_active();
        if toggled {
            debug!(active = ?self.block.active(), "active sub-block toggled");
        }
        toggled
    }

    /// Reset the level without losing a life, or begin a fresh run after
    /// game over.
    pub fn restart_level(&mut self) -> bool {
        match self.phase {
            Phase::Playing => {
                debug!(level = self.level_idx, "level restarted");
                self.reset_level();
                true
            }
            Phase::GameOver(_) => {
                info!("new run");
                self.elapsed_ms = 0;
                self.moves_made = 0;
                self.falls = 0;
                self.levels_completed = 0;
                self.load_level(0);
                true
            }
            Phase::LevelCleared => false,
        }
    }

    pub fn quit(&mut self) -> bool {
        if self.phase.is_game_over() {
            return false;
        }
        self.end_run(GameOverReason::Quit);
        true
    }

    /// Dispatch a frontend command. Returns whether the session changed.
    pub fn apply_command(&mut self, command: Command) -> bool {
        match command {
            Command::Move(dir) => self.apply_move(dir).is_some(),
            Command::ToggleActiveSubBlock => self.toggle_active_sub_block(),
            Command::RestartLevel => self.restart_level(),
            Command::Quit => self.quit(),
            Command::ToggleView | Command::Hint => false,
        }
    }

    /// Advance the clock. Completes a `LevelCleared` pause once it has
    /// lasted `level_clear_pause_ms`.
    ///
    /// Returns true when a new level was loaded or the run completed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        match self.phase {
            Phase::Playing => {
                self.elapsed_ms += elapsed_ms as u64;
                false
            }
            Phase::LevelCleared => {
                self.clear_timer_ms = self.clear_timer_ms.saturating_add(elapsed_ms);
                if self.clear_timer_ms >= self.config.level_clear_pause_ms {
                    self.advance_level()
                } else {
                    false
                }
            }
            Phase::GameOver(_) => false,
        }
    }

    /// Leave `LevelCleared` right away.
    pub fn advance_level(&mut self) -> bool {
        if self.phase != Phase::LevelCleared {
            return false;
        }
        let next = self.level_idx + 1;
        if next < self.levels.len() {
            self.load_level(next);
        } else {
            self.end_run(GameOverReason::Completed);
        }
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let level = self.level();
        SessionSnapshot {
            level_index: self.level_idx,
            level_count: self.levels.len(),
            level_name: Arc::clone(&level.name),
            block: self.block.into(),
            lives: self.lives,
            moves_remaining: self.moves_remaining,
            move_budget: level.move_budget,
            elapsed_ms: self.elapsed_ms,
            phase: self.phase,
            last_event: self.last_event,
            switches: self.switches,
            moves_made: self.moves_made,
            falls: self.falls,
            levels_completed: self.levels_completed,
        }
    }

    /// Start `index` fresh: full lives, closed switches, block on start.
    fn load_level(&mut self, index: usize) {
        self.level_idx = index;
        self.lives = self.config.lives;
        self.phase = Phase::Playing;
        self.last_event = None;
        self.clear_timer_ms = 0;
        self.reset_level();
        info!(
            level = index,
            name = %self.level().name,
            budget = self.level().move_budget,
            "level started"
        );
    }

    /// Put the block back on start and refill the move budget. Lives are
    /// left alone.
    fn reset_level(&mut self) {
        let level = &self.levels[self.level_idx];
        self.block = BlockState::standing(level.grid.start());
        self.switches = SwitchState::closed();
        self.moves_remaining = level.budget();
    }

    fn lose_life(&mut self, cause: &'static str) {
        self.lives = self.lives.saturating_sub(1);
        info!(cause, lives = self.lives, "life lost");
        if self.lives == 0 {
            self.end_run(GameOverReason::OutOfLives);
        } else {
            self.reset_level();
        }
    }

    fn end_run(&mut self, reason: GameOverReason) {
        self.phase = Phase::GameOver(reason);
        info!(
            reason = reason.as_str(),
            levels_completed = self.levels_completed,
            "game over"
        );
    }
}
