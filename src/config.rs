/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Default play-field width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Default play-field height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Segments a snake spawns with.
pub const INITIAL_SNAKE_LENGTH: usize = 4;

/// Number of locally controlled snakes.
pub const PLAYER_COUNT: usize = 2;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 160;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 60;

/// Tick interval reduction per point of the best score.
pub const TICK_SPEEDUP_PER_POINT_MS: u64 = 4;

/// How long the input handler waits for a key per frame.
pub const INPUT_POLL_MS: u64 = 16;

/// Body segment glyph.
pub const GLYPH_SNAKE_BODY: &str = "█";

pub const GLYPH_SNAKE_HEAD_UP: &str = "ᐃ";
pub const GLYPH_SNAKE_HEAD_DOWN: &str = "ᐁ";
pub const GLYPH_SNAKE_HEAD_LEFT: &str = "ᐊ";
pub const GLYPH_SNAKE_HEAD_RIGHT: &str = "ᐅ";

/// Tail triangles, named by the direction the tip points.
pub const GLYPH_TAIL_UP: &str = "▲";
pub const GLYPH_TAIL_DOWN: &str = "▼";
pub const GLYPH_TAIL_LEFT: &str = "◀";
pub const GLYPH_TAIL_RIGHT: &str = "▶";

/// Upper half-block glyph for the blended segment.
pub const GLYPH_HALF_UPPER: &str = "▀";

/// Left half-block glyph for the blended segment.
pub const GLYPH_HALF_LEFT: &str = "▌";

/// Food glyph.
pub const GLYPH_FOOD: &str = "●";
