use tracing::trace;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};
use crate::palette::Palette;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step along `direction`.
    ///
    /// Coordinates wrap at the `i32` limits; the play field is the caller's
    /// concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

/// Segmented grid creature.
///
/// The body is ordered head first and always holds at least one segment, so
/// the length and head position are read straight off it. A fresh snake is a
/// stack of coincident segments on one cell that unspools over the following
/// `len()` moves.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    pub(crate) body: Vec<Position>,
    pub(crate) direction: Direction,
    palette: Option<Palette>,
}

impl Snake {
    /// Creates a snake of `length` coincident segments at `position`.
    ///
    /// A `length` of zero is treated as one.
    #[must_use]
    pub fn new(length: usize, position: Position, direction: Direction) -> Self {
        Self {
            body: vec![position; length.max(1)],
            direction,
            palette: None,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Returns `None` for an empty segment list.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: segments,
            direction,
            palette: None,
        })
    }

    /// Attaches display colors.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn set_palette(&mut self, palette: Option<Palette>) {
        self.palette = palette;
    }

    /// Changes heading unless the request is empty or stays on the current axis.
    ///
    /// Rejected requests are silently ignored.
    pub fn turn(&mut self, requested: impl Into<Option<Direction>>) {
        let Some(requested) = requested.into() else {
            return;
        };

        if !direction_change_is_valid(self.direction, requested) {
            trace!(current = ?self.direction, ?requested, "turn rejected");
            return;
        }

        self.direction = requested;
    }

    /// Advances the head one cell and drags every segment one slot tailwards.
    ///
    /// The length is unchanged; the oldest tail cell is dropped.
    pub fn move_forward(&mut self) {
        let next_head = self.next_head_position();
        self.body.rotate_right(1);
        self.body[0] = next_head;
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.direction)
    }

    /// Appends a copy of the tail; it separates from the tail on later moves.
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push(tail);
    }

    /// Rebuilds the snake as `length` coincident segments at `position`.
    pub fn reset(&mut self, length: usize, position: Position, direction: Direction) {
        self.body.clear();
        self.body.resize(length.max(1), position);
        self.direction = direction;
    }

    /// Returns true if any non-head segment shares the head's cell.
    ///
    /// This also holds for a freshly spawned or reset snake of two or more
    /// segments, so callers evaluate it only after a move.
    #[must_use]
    pub fn has_collided_with_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns true if this snake's head lies on any segment of `other`.
    ///
    /// The check is one-directional.
    #[must_use]
    pub fn has_collided_with(&self, other: &Snake) -> bool {
        other.occupies(self.head())
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the last segment.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn palette(&self) -> Option<Palette> {
        self.palette
    }

    /// Body segments from head to tail.
    #[must_use]
    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
