use std::iter;

use crate::config::{BODY_CHAR, BORDER_CHAR, FRUIT_CHAR, HEAD_CHAR};
use crate::engine::Engine;

pub const CONTROLS_HINT: &str = "Controls: W A S D to move | X to exit";

/// Projects the game onto text lines: bordered board, score, controls.
pub fn render_frame<R>(engine: &Engine<R>) -> Vec<String> {
    let (width, height) = (engine.width(), engine.height());
    let head = engine.head();
    let fruit = engine.fruit();

    let border: String = iter::repeat(BORDER_CHAR).take(width as usize + 2).collect();
    let mut lines = Vec::with_capacity(height as usize + 4);
    lines.push(border.clone());

    for y in 0..height {
        let mut row = String::with_capacity(width as usize + 2);
        row.push(BORDER_CHAR);

        for x in 0..width {
            let pos = (x, y);
            let ch = if pos == head {
                HEAD_CHAR
            } else if pos == fruit {
                FRUIT_CHAR
            } else if engine.occupies(&pos) {
                BODY_CHAR
            } else {
                ' '
            };
            row.push(ch);
        }

        row.push(BORDER_CHAR);
        lines.push(row);
    }

    lines.push(border);
    lines.push(format!("Score: {}", engine.score()));
    lines.push(CONTROLS_HINT.to_string());
    lines
}
