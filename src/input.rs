use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement headings on the grid.
///
/// The discriminants are the ordinal codes written by the save format.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

/// Movement dimension shared by a pair of opposite directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the axis this direction moves along.
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Unit `(dx, dy)` step for one tick; `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Ordinal code used by the save format.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a heading by ordinal code.
    ///
    /// Code 4 is the "no change" ordinal and never a valid heading, so it
    /// resolves to `None` like any other unknown value.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Up),
            1 => Some(Self::Down),
            2 => Some(Self::Left),
            3 => Some(Self::Right),
            _ => None,
        }
    }

    /// Returns the heading of a single step from `from` to `to`, if the two
    /// cells are orthogonal neighbours.
    #[must_use]
    pub fn between(from: crate::snake::Position, to: crate::snake::Position) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Turn { player: usize, direction: Direction },
    Pause,
    Save,
    Load,
    Quit,
}

/// Returns whether a direction change is legal: the new heading must leave
/// the current axis.
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next.axis() != current.axis()
}

/// Polls crossterm for key presses and maps them to [`GameInput`].
#[derive(Debug, Clone, Copy)]
pub struct InputHandler {
    poll_timeout: Duration,
}

impl InputHandler {
    #[must_use]
    pub fn new(poll_timeout: Duration) -> Self {
        Self { poll_timeout }
    }

    /// Waits up to the poll timeout for one mapped input event.
    pub fn poll_input(&mut self) -> io::Result<Option<GameInput>> {
        if !event::poll(self.poll_timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

/// Player one steers with the arrow keys, player two with WASD.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let turn = |player, direction| Some(GameInput::Turn { player, direction });

    match key.code {
        KeyCode::Up => turn(0, Direction::Up),
        KeyCode::Down => turn(0, Direction::Down),
        KeyCode::Left => turn(0, Direction::Left),
        KeyCode::Right => turn(0, Direction::Right),
        KeyCode::Char('w' | 'W') => turn(1, Direction::Up),
        KeyCode::Char('s' | 'S') => turn(1, Direction::Down),
        KeyCode::Char('a' | 'A') => turn(1, Direction::Left),
        KeyCode::Char('d' | 'D') => turn(1, Direction::Right),
        KeyCode::Char('p' | ' ') => Some(GameInput::Pause),
        KeyCode::F(2) => Some(GameInput::Save),
        KeyCode::F(3) => Some(GameInput::Load),
        KeyCode::Char('q') | KeyCode::Esc => Some(GameInput::Quit),
        _ => None,
    }
}
