use std::path::Path;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::config::{
    DEFAULT_TICK_INTERVAL_MS, GridSize, MIN_TICK_INTERVAL_MS, PLAYER_COUNT,
    TICK_SPEEDUP_PER_POINT_MS,
};
use crate::food::Food;
use crate::input::{Direction, GameInput};
use crate::palette::{Palette, default_palette};
use crate::snake::{Position, Snake};
use crate::storage::{self, StorageError};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    Paused,
}

/// Why a snake was sent back to its spawn point.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathCause {
    Wall,
    SelfCollision,
    /// Ran into the snake of the given player.
    Snake(usize),
}

/// Where and how a player's snake (re)spawns.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Spawn {
    pub position: Position,
    pub direction: Direction,
}

/// One locally controlled snake plus its bookkeeping.
#[derive(Debug, Clone)]
pub struct Player {
    pub snake: Snake,
    pub score: u32,
    pub deaths: u32,
    pub last_death: Option<DeathCause>,
    spawn: Spawn,
    pending_turn: Option<Direction>,
}

/// Outcome of reading one save slot, applied only once every slot is read.
#[derive(Debug)]
enum SlotLoad {
    Restored(Snake),
    Missing,
    Malformed,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub players: Vec<Player>,
    pub food: Option<Food>,
    pub tick_count: u64,
    pub status: GameStatus,
    bounds: GridSize,
    initial_length: usize,
    rng: StdRng,
}

impl GameState {
    /// Creates a state seeded from system entropy.
    #[must_use]
    pub fn new(bounds: GridSize, initial_length: usize) -> Self {
        Self::with_rng(bounds, initial_length, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, initial_length: usize, seed: u64) -> Self {
        Self::with_rng(bounds, initial_length, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, initial_length: usize, mut rng: StdRng) -> Self {
        let players: Vec<Player> = (0..PLAYER_COUNT)
            .map(|index| {
                let spawn = spawn_point(bounds, index);
                Player {
                    snake: Snake::new(initial_length, spawn.position, spawn.direction)
                        .with_palette(default_palette(index)),
                    score: 0,
                    deaths: 0,
                    last_death: None,
                    spawn,
                    pending_turn: None,
                }
            })
            .collect();

        let snakes: Vec<Snake> = players.iter().map(|player| player.snake.clone()).collect();
        let food = Food::spawn(&mut rng, bounds, &snakes);

        Self {
            players,
            food,
            tick_count: 0,
            status: GameStatus::Playing,
            bounds,
            initial_length,
            rng,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    pub fn set_palette(&mut self, player: usize, palette: Palette) {
        if let Some(player) = self.players.get_mut(player) {
            player.snake.set_palette(Some(palette));
        }
    }

    /// Advances simulation by one gameplay tick.
    ///
    /// Every snake turns and moves before any collision is evaluated, so a
    /// freshly spawned snake is never checked while its segments still share
    /// one cell.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        self.tick_count += 1;
        for player in &mut self.players {
            player.snake.turn(player.pending_turn.take());
            player.snake.move_forward();
        }

        let deaths = self.collisions();
        for &(index, cause) in &deaths {
            self.kill(index, cause);
        }

        for index in 0..self.players.len() {
            if deaths.iter().any(|&(dead, _)| dead == index) {
                continue;
            }
            self.try_eat(index);
        }

        if self.food.is_none() {
            self.respawn_food();
        }
    }

    /// Evaluates collisions for every player against the play field, itself
    /// and every other snake.
    #[must_use]
    pub fn collisions(&self) -> Vec<(usize, DeathCause)> {
        let mut deaths = Vec::new();

        for (index, player) in self.players.iter().enumerate() {
            let snake = &player.snake;
            if !snake.head().is_within_bounds(self.bounds) {
                deaths.push((index, DeathCause::Wall));
                continue;
            }

            if snake.has_collided_with_itself() {
                deaths.push((index, DeathCause::SelfCollision));
                continue;
            }

            let rival = self
                .players
                .iter()
                .enumerate()
                .find(|&(other, rival)| other != index && snake.has_collided_with(&rival.snake));
            if let Some((other, _)) = rival {
                deaths.push((index, DeathCause::Snake(other)));
            }
        }

        deaths
    }

    fn kill(&mut self, index: usize, cause: DeathCause) {
        let initial_length = self.initial_length;
        let player = &mut self.players[index];

        debug!(player = index, ?cause, length = player.snake.len(), "snake died");
        player.score = 0;
        player.deaths += 1;
        player.last_death = Some(cause);
        player.pending_turn = None;
        player
            .snake
            .reset(initial_length, player.spawn.position, player.spawn.direction);
    }

    fn try_eat(&mut self, index: usize) {
        let Some(food) = self.food else {
            return;
        };

        let player = &mut self.players[index];
        if player.snake.head() != food.position {
            return;
        }

        player.snake.grow();
        player.score += 1;
        debug!(player = index, score = player.score, "food eaten");
        self.respawn_food();
    }

    fn respawn_food(&mut self) {
        let snakes: Vec<Snake> = self
            .players
            .iter()
            .map(|player| player.snake.clone())
            .collect();
        self.food = Food::spawn(&mut self.rng, self.bounds, &snakes);
    }

    /// Applies one external input event.
    ///
    /// Turns are queued per player and applied at the start of the next tick;
    /// a later turn before that tick replaces the earlier one.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Turn { player, direction } => {
                if self.status != GameStatus::Playing {
                    return;
                }
                if let Some(player) = self.players.get_mut(player) {
                    player.pending_turn = Some(direction);
                }
            }
            GameInput::Pause => {
                self.status = match self.status {
                    GameStatus::Playing => GameStatus::Paused,
                    GameStatus::Paused => GameStatus::Playing,
                };
            }
            GameInput::Save | GameInput::Load | GameInput::Quit => {}
        }
    }

    /// Writes every snake to its slot under `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), StorageError> {
        for (index, player) in self.players.iter().enumerate() {
            storage::save_snake(&storage::slot_path(dir, index), &player.snake)?;
        }
        Ok(())
    }

    /// Restores every snake from its slot under `dir`.
    ///
    /// Missing slots are skipped. A slot holding malformed data is discarded
    /// and that snake respawns. All slots are read before any snake changes,
    /// so an i/o error leaves every player as it was. Returns how many snakes
    /// were restored.
    pub fn load(&mut self, dir: &Path) -> Result<usize, StorageError> {
        let mut staged = Vec::with_capacity(self.players.len());

        for (index, player) in self.players.iter().enumerate() {
            let path = storage::slot_path(dir, index);
            let mut snake = player.snake.clone();
            let slot = match storage::load_snake(&path, &mut snake) {
                Ok(true) => SlotLoad::Restored(snake),
                Ok(false) => SlotLoad::Missing,
                Err(StorageError::Format(error)) => {
                    warn!(path = %path.display(), %error, "discarding malformed save");
                    SlotLoad::Malformed
                }
                Err(error) => return Err(error),
            };
            staged.push(slot);
        }

        let mut restored = 0;
        for (player, slot) in self.players.iter_mut().zip(staged) {
            match slot {
                SlotLoad::Restored(snake) => {
                    player.snake = snake;
                    player.pending_turn = None;
                    restored += 1;
                }
                SlotLoad::Malformed => {
                    player.pending_turn = None;
                    player.snake.reset(
                        self.initial_length,
                        player.spawn.position,
                        player.spawn.direction,
                    );
                }
                SlotLoad::Missing => {}
            }
        }

        Ok(restored)
    }

    /// Highest score among all players.
    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.players
            .iter()
            .map(|player| player.score)
            .max()
            .unwrap_or(0)
    }

    /// Tick interval, shortening as the best score grows.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let speedup_ms = u64::from(self.best_score()) * TICK_SPEEDUP_PER_POINT_MS;
        let clamped_ms = DEFAULT_TICK_INTERVAL_MS
            .saturating_sub(speedup_ms)
            .max(MIN_TICK_INTERVAL_MS);
        Duration::from_millis(clamped_ms)
    }
}

/// Spawn points: player one on the upper third heading right, player two on
/// the lower third heading left.
#[must_use]
pub fn spawn_point(bounds: GridSize, player: usize) -> Spawn {
    let width = i32::from(bounds.width);
    let height = i32::from(bounds.height);

    if player % 2 == 0 {
        Spawn {
            position: Position {
                x: width / 4,
                y: height / 3,
            },
            direction: Direction::Right,
        }
    } else {
        Spawn {
            position: Position {
                x: width - 1 - width / 4,
                y: height - 1 - height / 3,
            },
            direction: Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{GridSize, MIN_TICK_INTERVAL_MS};
    use crate::food::Food;
    use crate::input::{Direction, GameInput};
    use crate::snake::{Position, Snake};
    use crate::storage::{self, StorageError};

    use super::{DeathCause, GameState, GameStatus, spawn_point};

    const BOUNDS: GridSize = GridSize {
        width: 20,
        height: 12,
    };

    fn snake(segments: &[(i32, i32)], direction: Direction) -> Snake {
        Snake::from_segments(
            segments.iter().map(|&(x, y)| Position { x, y }).collect(),
            direction,
        )
        .expect("segments are non-empty")
    }

    #[test]
    fn spawn_points_are_inside_and_distinct() {
        let first = spawn_point(BOUNDS, 0);
        let second = spawn_point(BOUNDS, 1);

        assert!(first.position.is_within_bounds(BOUNDS));
        assert!(second.position.is_within_bounds(BOUNDS));
        assert_ne!(first.position, second.position);
        assert_ne!(first.position.y, second.position.y);
    }

    #[test]
    fn fresh_game_survives_its_first_tick() {
        let mut state = GameState::new_with_seed(BOUNDS, 4, 1);
        assert!(state.players[0].snake.has_collided_with_itself());

        state.tick();

        assert!(state.players.iter().all(|player| player.deaths == 0));
        assert_eq!(state.players[0].snake.head(), Position { x: 6, y: 4 });
    }

    #[test]
    fn snake_grows_after_eating_food() {
        let mut state = GameState::new_with_seed(BOUNDS, 4, 2);
        state.players[0].snake = snake(&[(1, 1)], Direction::Right);
        state.food = Some(Food::new(Position { x: 2, y: 1 }));

        state.tick();

        assert_eq!(state.players[0].snake.len(), 2);
        assert_eq!(state.players[0].score, 1);
        assert_ne!(state.food, Some(Food::new(Position { x: 2, y: 1 })));
    }

    #[test]
    fn leaving_the_field_respawns_the_snake() {
        let mut state = GameState::new_with_seed(BOUNDS, 3, 3);
        state.players[0].snake = snake(&[(19, 1), (18, 1)], Direction::Right);
        state.players[0].score = 4;

        state.tick();

        let player = &state.players[0];
        assert_eq!(player.last_death, Some(DeathCause::Wall));
        assert_eq!(player.score, 0);
        assert_eq!(player.snake.len(), 3);
        assert_eq!(player.snake.head(), spawn_point(BOUNDS, 0).position);
    }

    #[test]
    fn self_collision_respawns_the_snake() {
        let mut state = GameState::new_with_seed(BOUNDS, 3, 4);
        state.players[0].snake = snake(
            &[(2, 2), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2)],
            Direction::Left,
        );
        state.apply_input(GameInput::Turn {
            player: 0,
            direction: Direction::Down,
        });

        state.tick();

        assert_eq!(state.players[0].last_death, Some(DeathCause::SelfCollision));
    }

    #[test]
    fn running_into_another_snake_kills_only_the_attacker() {
        let mut state = GameState::new_with_seed(BOUNDS, 3, 5);
        state.players[0].snake = snake(&[(4, 5), (3, 5)], Direction::Right);
        state.players[1].snake = snake(&[(5, 4), (5, 5), (5, 6), (5, 7)], Direction::Up);

        state.tick();

        assert_eq!(state.players[0].last_death, Some(DeathCause::Snake(1)));
        assert_eq!(state.players[1].last_death, None);
    }

    #[test]
    fn head_on_collision_kills_both() {
        let mut state = GameState::new_with_seed(BOUNDS, 3, 6);
        state.players[0].snake = snake(&[(4, 5), (3, 5)], Direction::Right);
        state.players[1].snake = snake(&[(6, 5), (7, 5)], Direction::Left);

        state.tick();

        assert_eq!(state.players[0].last_death, Some(DeathCause::Snake(1)));
        assert_eq!(state.players[1].last_death, Some(DeathCause::Snake(0)));
    }

    #[test]
    fn only_the_last_queued_turn_applies() {
        let mut state = GameState::new_with_seed(BOUNDS, 3, 7);
        state.players[0].snake = snake(&[(5, 5), (4, 5)], Direction::Right);

        state.apply_input(GameInput::Turn {
            player: 0,
            direction: Direction::Up,
        });
        state.apply_input(GameInput::Turn {
            player: 0,
            direction: Direction::Down,
        });
        state.tick();

        assert_eq!(state.players[0].snake.head(), Position { x: 5, y: 6 });
    }

    #[test]
    fn paused_game_ignores_ticks_and_turns() {
        let mut state = GameState::new_with_seed(BOUNDS, 3, 8);
        let before = state.players[0].snake.clone();

        state.apply_input(GameInput::Pause);
        state.apply_input(GameInput::Turn {
            player: 0,
            direction: Direction::Up,
        });
        state.tick();

        assert_eq!(state.status, GameStatus::Paused);
        assert_eq!(state.players[0].snake, before);
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn failed_load_leaves_every_player_untouched() {
        let dir = std::env::temp_dir().join(format!(
            "grid-snake-partial-load-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        let mut state = GameState::new_with_seed(BOUNDS, 3, 10);
        state.tick();
        state.save(&dir).expect("save should succeed");

        // A directory where the second slot file belongs fails to read.
        let second_slot = storage::slot_path(&dir, 1);
        std::fs::remove_file(&second_slot).expect("second slot should exist");
        std::fs::create_dir_all(&second_slot).expect("test directory should be creatable");

        state.tick();
        state.tick();
        let before: Vec<Snake> = state.players.iter().map(|p| p.snake.clone()).collect();

        assert!(matches!(state.load(&dir), Err(StorageError::Io(_))));
        for (player, snake) in state.players.iter().zip(&before) {
            assert_eq!(&player.snake, snake);
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn tick_interval_speeds_up_and_clamps() {
        let mut state = GameState::new_with_seed(BOUNDS, 3, 9);
        let base = state.tick_interval();

        state.players[1].score = 5;
        assert!(state.tick_interval() < base);

        state.players[1].score = 10_000;
        assert_eq!(
            state.tick_interval(),
            Duration::from_millis(MIN_TICK_INTERVAL_MS)
        );
    }
}
