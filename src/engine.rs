//! Game state: snake, fruit, direction, score and the per-tick update.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::Config;
use crate::snake::{wrap, Direction, Snake};
use crate::{BoardInt, Coords};

/// Random fruit positions tried before falling back to scanning free cells.
pub const FRUIT_RETRY_LIMIT: usize = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No direction issued yet, nothing moved.
    Waiting,
    Moved,
    Ate,
    Crashed,
    /// The snake ate the last fruit that could fit on the board.
    BoardFull,
    /// Called after the game ended.
    Finished,
}

pub struct Engine<R> {
    width: BoardInt,
    height: BoardInt,
    reward: u32,
    snake: Snake,
    fruit: Coords,
    direction: Direction,
    score: u32,
    game_over: bool,
    rng: R,
}

impl Engine<StdRng> {
    pub fn with_seed(width: BoardInt, height: BoardInt, seed: u64) -> Result<Self> {
        let config = Config::default().with_board(width, height).with_seed(seed);
        Engine::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Engine::new(config, StdRng::seed_from_u64(config.seed))
    }
}

impl<R: Rng> Engine<R> {
    pub fn new(config: &Config, rng: R) -> Result<Self> {
        check_board(config.width, config.height)?;

        let center = (config.width / 2, config.height / 2);
        let mut engine = Engine {
            width: config.width,
            height: config.height,
            reward: config.fruit_reward,
            snake: Snake::new(center),
            fruit: center,
            direction: Direction::Idle,
            score: 0,
            game_over: false,
            rng,
        };
        engine.initialize();
        Ok(engine)
    }

    /// Resumes a known position. `segments` are listed head first.
    pub fn from_parts(
        config: &Config,
        segments: Vec<Coords>,
        direction: Direction,
        fruit: Coords,
        rng: R,
    ) -> Result<Self> {
        check_board(config.width, config.height)?;

        let in_board = |(x, y): Coords| x >= 0 && y >= 0 && x < config.width && y < config.height;
        if let Some(pos) = segments.iter().copied().find(|p| !in_board(*p)) {
            bail!("segment {:?} lies outside the {}x{} board", pos, config.width, config.height);
        }
        if !in_board(fruit) {
            bail!("fruit {:?} lies outside the {}x{} board", fruit, config.width, config.height);
        }

        Ok(Engine {
            width: config.width,
            height: config.height,
            reward: config.fruit_reward,
            snake: Snake::from_segments(segments)?,
            fruit,
            direction,
            score: 0,
            game_over: false,
            rng,
        })
    }

    /// Back to the starting position: one segment at the center, idle, no score.
    ///
    /// The first fruit is not checked against the snake; only fruit placed
    /// after eating avoids the body.
    pub fn initialize(&mut self) {
        self.snake = Snake::new((self.width / 2, self.height / 2));
        self.direction = Direction::Idle;
        self.score = 0;
        self.game_over = false;
        self.fruit = self.random_cell();
    }

    /// Turns the snake, unless `new_direction` would reverse it onto itself.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if new_direction == Direction::Idle || new_direction == self.direction.opposite() {
            return;
        }

        if new_direction != self.direction {
            debug!(from = ?self.direction, to = ?new_direction, "direction changed");
        }
        self.direction = new_direction;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Finished;
        }
        if self.direction == Direction::Idle {
            return TickOutcome::Waiting;
        }

        let new_head = self.next_head();

        if self.snake.contains(&new_head) {
            self.game_over = true;
            info!(
                head = ?new_head,
                score = self.score,
                length = self.snake.len(),
                "snake crashed into itself"
            );
            return TickOutcome::Crashed;
        }

        self.snake.push_head(new_head);

        if new_head != self.fruit {
            self.snake.pop_tail();
            return TickOutcome::Moved;
        }

        self.score += self.reward;
        info!(score = self.score, length = self.snake.len(), "fruit eaten");

        match self.spawn_fruit() {
            Some(fruit) => {
                self.fruit = fruit;
                TickOutcome::Ate
            }
            None => {
                self.game_over = true;
                info!(score = self.score, "board is full");
                TickOutcome::BoardFull
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn next_head(&self) -> Coords {
        let (x, y) = self.snake.head();
        let (dx, dy) = self.direction.offset();
        (wrap(x + dx, self.width), wrap(y + dy, self.height))
    }

    fn random_cell(&mut self) -> Coords {
        (self.rng.gen_range(0..self.width), self.rng.gen_range(0..self.height))
    }

    fn spawn_fruit(&mut self) -> Option<Coords> {
        for _ in 0..FRUIT_RETRY_LIMIT {
            let pos = self.random_cell();
            if !self.snake.contains(&pos) {
                return Some(pos);
            }
        }

        // Crowded board, pick among what's left
        let free: Vec<Coords> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|pos| !self.snake.contains(pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}

/// Read-only view, used by the renderer.
impl<R> Engine<R> {
    pub fn width(&self) -> BoardInt {
        self.width
    }

    pub fn height(&self) -> BoardInt {
        self.height
    }

    pub fn segments(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.snake.segments()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn occupies(&self, pos: &Coords) -> bool {
        self.snake.contains(pos)
    }

    pub fn head(&self) -> Coords {
        self.snake.head()
    }

    pub fn fruit(&self) -> Coords {
        self.fruit
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

fn check_board(width: BoardInt, height: BoardInt) -> Result<()> {
    if width <= 0 || height <= 0 {
        bail!("board must be at least 1x1, got {}x{}", width, height);
    }
    Ok(())
}
