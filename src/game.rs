use std::thread::sleep;

use anyhow::Result;
use rand::Rng;
use tracing::info;

use crate::config::Config;
use crate::engine::Engine;
use crate::render::render_frame;
use crate::term::{parse_key, Command, Display, InputSource};

/// Something that can hand over one pending keypress without waiting.
pub trait KeySource {
    fn poll(&mut self) -> Option<char>;
}

/// Something that shows a rendered frame.
pub trait FrameSink {
    fn draw(&mut self, lines: &[String]) -> Result<()>;
}

impl KeySource for InputSource {
    fn poll(&mut self) -> Option<char> {
        InputSource::poll(self)
    }
}

impl FrameSink for Display {
    fn draw(&mut self, lines: &[String]) -> Result<()> {
        Display::draw(self, lines)
    }
}

pub struct SnakeGame<R, K, F> {
    config: Config,
    engine: Engine<R>,
    keys: K,
    frames: F,
    exit_requested: bool,
}

impl<R: Rng, K: KeySource, F: FrameSink> SnakeGame<R, K, F> {
    pub fn new(config: Config, engine: Engine<R>, keys: K, frames: F) -> Self {
        SnakeGame { config, engine, keys, frames, exit_requested: false }
    }

    /// Plays until the snake crashes or the player asks to leave, then
    /// returns the final score.
    pub fn run(&mut self) -> Result<u32> {
        while !self.engine.is_game_over() && !self.exit_requested {
            self.frames.draw(&render_frame(&self.engine))?;

            if let Some(key) = self.keys.poll() {
                match parse_key(key) {
                    Some(Command::Turn(dir)) => self.engine.set_direction(dir),
                    Some(Command::Exit) => {
                        info!(score = self.engine.score(), "exit requested");
                        self.exit_requested = true;
                    }
                    None => {}
                }
            }

            self.engine.tick();

            sleep(self.config.tick_interval);
        }

        Ok(self.engine.score())
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use std::time::Duration;

    struct Scripted(VecDeque<Option<char>>);

    impl KeySource for Scripted {
        fn poll(&mut self) -> Option<char> {
            self.0.pop_front().flatten()
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<Vec<String>>);

    impl FrameSink for Recorder {
        fn draw(&mut self, lines: &[String]) -> Result<()> {
            self.0.push(lines.to_vec());
            Ok(())
        }
    }

    fn config() -> Config {
        let mut config = Config::default().with_board(10, 10).with_seed(4);
        config.tick_interval = Duration::ZERO;
        config
    }

    fn game(
        segments: Vec<(i32, i32)>,
        direction: Direction,
        keys: Vec<Option<char>>,
    ) -> SnakeGame<StdRng, Scripted, Recorder> {
        let config = config();
        let rng = StdRng::seed_from_u64(4);
        let engine = Engine::from_parts(&config, segments, direction, (9, 9), rng).unwrap();
        SnakeGame::new(config, engine, Scripted(keys.into()), Recorder::default())
    }

    #[test]
    fn exit_key_stops_the_loop() {
        let mut game = game(vec![(5, 5)], Direction::Idle, vec![None, Some('d'), Some('X')]);

        assert_eq!(game.run().unwrap(), 0);
        assert!(game.exit_requested());
        assert!(!game.engine().is_game_over());
        // The cycle that saw the exit key still ticks once
        assert_eq!(game.engine().head(), (7, 5));
        assert_eq!(game.frames().0.len(), 3);
    }

    #[test]
    fn crash_ends_the_loop() {
        let body = vec![(2, 2), (3, 2), (3, 3), (2, 3), (1, 3), (1, 2)];
        let mut game = game(body, Direction::Left, vec![Some('s')]);

        assert_eq!(game.run().unwrap(), 0);
        assert!(game.engine().is_game_over());
        assert!(!game.exit_requested());
        // Drawn once, before the crashing tick
        assert_eq!(game.frames().0.len(), 1);
    }

    #[test]
    fn reversal_key_is_ignored_by_the_loop() {
        let mut game = game(vec![(5, 5), (4, 5)], Direction::Right, vec![Some('a'), Some('x')]);
        game.run().unwrap();

        assert_eq!(game.engine().direction(), Direction::Right);
        assert_eq!(game.engine().head(), (7, 5));
    }

    #[test]
    fn frames_show_state_before_each_tick() {
        let mut game = game(vec![(5, 5)], Direction::Right, vec![None, Some('x')]);
        game.run().unwrap();

        let frames = &game.frames().0;
        assert_eq!(frames[0][6], "#     0    #");
        assert_eq!(frames[1][6], "#      0   #");
    }
}
