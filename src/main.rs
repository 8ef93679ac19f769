use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use snake::config::Config;
use snake::engine::Engine;
use snake::game::SnakeGame;
use snake::term::{Display, InputSource, RawMode};

/// Log file path; logging stays off when unset since stdout holds the board.
const LOG_VAR: &str = "SNAKE_LOG";

fn main() -> Result<()> {
    init_logging()?;

    let config = Config::from_env()?;
    info!(seed = config.seed, width = config.width, height = config.height, "starting");

    let engine = Engine::from_config(&config)?;
    let raw = RawMode::enable()?;

    let mut game = SnakeGame::new(config, engine, InputSource::new(), Display::new());
    let result = game.run();

    // Restore before reporting anything, whatever the loop returned
    raw.restore()?;
    let score = result?;

    println!("Game Over! Final Score: {}", score);
    Ok(())
}

fn init_logging() -> Result<()> {
    let path = match std::env::var_os(LOG_VAR) {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
