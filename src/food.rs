use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Food pellet currently on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Spawns food in a cell no snake occupies.
    ///
    /// Returns `None` when the board is full.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize, snakes: &[Snake]) -> Option<Self> {
        spawn_position(rng, bounds, snakes).map(Self::new)
    }
}

/// Picks a random free position that is not occupied by any snake.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snakes: &[Snake],
) -> Option<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells());

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snakes.iter().any(|snake| snake.occupies(position)) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
