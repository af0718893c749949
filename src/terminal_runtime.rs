use std::io;
use std::panic;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use thiserror::Error;
use tracing::debug;

use crate::config::GridSize;

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Rows and columns drawn around the board: a border on every side plus the
/// HUD row underneath.
const BORDER_CELLS: u16 = 2;
const HUD_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("terminal is {actual_width}x{actual_height}, a {board_width}x{board_height} board needs {needed_width}x{needed_height}")]
pub struct TerminalTooSmall {
    pub board_width: u16,
    pub board_height: u16,
    pub needed_width: u16,
    pub needed_height: u16,
    pub actual_width: u16,
    pub actual_height: u16,
}

/// Terminal columns and rows needed to show a whole board of `bounds`.
#[must_use]
pub fn required_size(bounds: GridSize) -> (u16, u16) {
    (
        bounds.width.saturating_add(BORDER_CELLS),
        bounds
            .height
            .saturating_add(BORDER_CELLS)
            .saturating_add(HUD_ROWS),
    )
}

/// Checks a terminal of `actual` columns and rows against the board.
pub fn check_fits(bounds: GridSize, actual: (u16, u16)) -> Result<(), TerminalTooSmall> {
    let (needed_width, needed_height) = required_size(bounds);
    if actual.0 >= needed_width && actual.1 >= needed_height {
        return Ok(());
    }

    Err(TerminalTooSmall {
        board_width: bounds.width,
        board_height: bounds.height,
        needed_width,
        needed_height,
        actual_width: actual.0,
        actual_height: actual.1,
    })
}

/// Raw mode plus alternate screen for one game session on a board of fixed
/// size.
///
/// Dropping the session restores the terminal best-effort, including when
/// the game loop unwinds.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Refuses to start when the board would be clipped, since cells outside
    /// the visible area would hide snakes and food.
    pub fn enter(bounds: GridSize) -> io::Result<Self> {
        let actual = terminal::size()?;
        check_fits(bounds, actual).map_err(io::Error::other)?;
        debug!(?actual, ?bounds, "entering terminal session");

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        Terminal::new(CrosstermBackend::new(stdout))
            .map(|terminal| Self { terminal })
            .inspect_err(|_| restore_terminal())
    }

    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Restores the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
    }));
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
}
