pub mod config;
pub mod engine;
pub mod game;
pub mod render;
pub mod snake;
pub mod term;

pub type BoardInt = i32;
pub type Coords = (BoardInt, BoardInt);
