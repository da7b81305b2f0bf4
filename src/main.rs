//! Terminal Bloxorz runner (default binary).
//!
//! Plays a level pack in the terminal using crossterm for input and the
//! framebuffer renderer from `tui_bloxorz::term`. Logs go to a file since the
//! game owns the screen.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use tui_bloxorz::core::{GameSession, LevelPack, SessionConfig};
use tui_bloxorz::engine::{hint, solve};
use tui_bloxorz::input::handle_key_event;
use tui_bloxorz::term::{FrameBuffer, GameView, TerminalRenderer, ViewState, Viewport};
use tui_bloxorz::types::{Command, TICK_MS};

#[derive(Parser)]
#[command(name = "tui-bloxorz")]
#[command(about = "Rolling-block puzzle for the terminal", long_about = None)]
struct Cli {
    /// Level pack (JSON) to play instead of the built-in levels
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,

    /// Lives granted at the start of every level (overrides the pack)
    #[arg(long)]
    lives: Option<u32>,

    /// Level to start on, counted from 0
    #[arg(long, default_value_t = 0)]
    start_level: usize,

    /// Where to write logs (filter with RUST_LOG, e.g. RUST_LOG=debug)
    #[arg(long, value_name = "PATH", default_value = "tui-bloxorz.log")]
    log_file: PathBuf,

    /// Print the fewest-moves solution of every level and exit
    #[arg(long)]
    solve: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("opening log file {}", cli.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let pack = match &cli.levels {
        Some(path) => LevelPack::from_path(path)
            .with_context(|| format!("loading level pack {}", path.display()))?,
        None => LevelPack::builtin().context("loading built-in levels")?,
    };

    if cli.solve {
        return print_solutions(&pack);
    }

    let config = SessionConfig {
        lives: cli.lives.unwrap_or(pack.lives),
        start_level: cli.start_level,
        ..SessionConfig::from_pack(&pack)
    };
    let levels = pack.build().context("validating level pack")?;
    let mut session = GameSession::new(levels, config).context("starting session")?;
    info!(levels = session.levels().len(), lives = config.lives, "session ready");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result?;

    println!(
        "Completed {} of {} levels.",
        session.levels_completed(),
        session.levels().len()
    );
    Ok(())
}

fn run(term: &mut TerminalRenderer, session: &mut GameSession) -> Result<()> {
    let view = GameView::default();
    let mut state = ViewState::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let snap = session.snapshot();
        view.render_into(session.grid(), &snap, state, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match handle_key_event(key) {
                        Some(Command::Quit) => {
                            session.quit();
                            return Ok(());
                        }
                        Some(Command::ToggleView) => state.mode = state.mode.next(),
                        Some(Command::Hint) => state.hint = hint(session),
                        Some(command) => {
                            state.hint = None;
                            session.apply_command(command);
                        }
                        None => {}
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            if session.tick(elapsed.as_millis().min(u32::MAX as u128) as u32) {
                state.hint = None;
            }
        }
    }
}

fn print_solutions(pack: &LevelPack) -> Result<()> {
    let levels = pack.build().context("validating level pack")?;
    let mut failures = 0;

    for level in &levels {
        match solve(level) {
            Some(solution) => {
                let verdict = if solution.moves <= level.move_budget {
                    "ok"
                } else {
                    failures += 1;
                    "OVER BUDGET"
                };
                println!(
                    "{:>2}  {:<16} {:>3}/{:<3} {:<11} {}",
                    level.index,
                    level.name,
                    solution.moves,
                    level.move_budget,
                    verdict,
                    solution.to_letters()
                );
            }
            None => {
                failures += 1;
                println!("{:>2}  {:<16} unsolvable", level.index, level.name);
            }
        }
    }

    if failures > 0 {
        bail!("{} level(s) cannot be finished within budget", failures);
    }
    Ok(())
}
