use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, GridSize, INITIAL_SNAKE_LENGTH, INPUT_POLL_MS,
};
use grid_snake::game::GameState;
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::logging;
use grid_snake::palette::load_palette;
use grid_snake::renderer;
use grid_snake::storage;
use grid_snake::terminal_runtime::{AppTerminal, TerminalSession, install_panic_hook};
use tracing::{error, info};

/// Two-player grid snake. Player one steers with the arrow keys, player two
/// with WASD. F2 saves both snakes, F3 restores them.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Play-field width in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_WIDTH, value_parser = clap::value_parser!(u16).range(8..))]
    width: u16,

    /// Play-field height in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_HEIGHT, value_parser = clap::value_parser!(u16).range(6..))]
    height: u16,

    /// Segments each snake spawns with.
    #[arg(long, default_value_t = INITIAL_SNAKE_LENGTH)]
    length: usize,

    /// Directory holding the save slots.
    #[arg(long = "save-dir")]
    save_dir: Option<PathBuf>,

    /// JSON palette file; repeat once per player.
    #[arg(long = "palette")]
    palettes: Vec<PathBuf>,

    /// Write tracing events to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path)?;
    }

    let bounds = GridSize {
        width: cli.width,
        height: cli.height,
    };
    let mut state = GameState::new(bounds, cli.length);
    for (player, path) in cli.palettes.iter().enumerate() {
        match load_palette(path) {
            Ok(palette) => state.set_palette(player, palette),
            Err(error) => eprintln!("Ignoring palette {}: {error}", path.display()),
        }
    }

    let save_dir = cli.save_dir.unwrap_or_else(storage::save_dir);
    info!(save_dir = %save_dir.display(), width = cli.width, height = cli.height, "starting");

    install_panic_hook();
    let mut session = TerminalSession::enter(bounds)?;
    run(session.terminal_mut(), &mut state, &save_dir)
}

fn run(terminal: &mut AppTerminal, state: &mut GameState, save_dir: &Path) -> io::Result<()> {
    let mut input = InputHandler::new(Duration::from_millis(INPUT_POLL_MS));
    let mut message: Option<String> = None;
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| renderer::render(frame, state, message.as_deref()))?;

        if let Some(game_input) = input.poll_input()? {
            match game_input {
                GameInput::Quit => break,
                GameInput::Save => message = Some(save(state, save_dir)),
                GameInput::Load => message = Some(load(state, save_dir)),
                other => state.apply_input(other),
            }
        }

        if last_tick.elapsed() >= state.tick_interval() {
            state.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn save(state: &GameState, save_dir: &Path) -> String {
    match state.save(save_dir) {
        Ok(()) => "saved".to_owned(),
        Err(err) => {
            error!(%err, "save failed");
            format!("save failed: {err}")
        }
    }
}

fn load(state: &mut GameState, save_dir: &Path) -> String {
    match state.load(save_dir) {
        Ok(0) => "nothing to load".to_owned(),
        Ok(count) => format!("loaded {count} snake(s)"),
        Err(err) => {
            error!(%err, "load failed");
            format!("load failed: {err}")
        }
    }
}
