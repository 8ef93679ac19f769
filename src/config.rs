use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::BoardInt;

pub const BOARD_WIDTH: BoardInt = 20;
pub const BOARD_HEIGHT: BoardInt = 17;
pub const TICK_INTERVAL_MS: u64 = 100;
pub const FRUIT_REWARD: u32 = 10;

pub const BORDER_CHAR: char = '#';
pub const HEAD_CHAR: char = '0';
pub const FRUIT_CHAR: char = 'F';
pub const BODY_CHAR: char = 'o';

/// Environment variable holding a fixed RNG seed.
pub const SEED_VAR: &str = "SNAKE_SEED";

#[derive(Debug, Clone)]
pub struct Config {
    pub width: BoardInt,
    pub height: BoardInt,
    pub tick_interval: Duration,
    pub fruit_reward: u32,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            fruit_reward: FRUIT_REWARD,
            seed: clock_seed(),
        }
    }
}

impl Config {
    /// Defaults, with the seed taken from `SNAKE_SEED` when it is set.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(raw) = std::env::var(SEED_VAR) {
            config.seed = parse_seed(&raw)?;
        }

        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_board(mut self, width: BoardInt, height: BoardInt) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

fn parse_seed(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be an unsigned integer, got {:?}", SEED_VAR, raw))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = Config::default();
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 17);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.fruit_reward, 10);
    }

    #[test]
    fn seed_parsing() {
        assert_eq!(parse_seed(" 42 ").unwrap(), 42);
        assert!(parse_seed("-1").is_err());
        assert!(parse_seed("abc").is_err());
    }

    #[test]
    fn builders_override_fields() {
        let config = Config::default().with_seed(7).with_board(5, 5);
        assert_eq!(config.seed, 7);
        assert_eq!((config.width, config.height), (5, 5));
    }
}
