use std::collections::{BTreeSet, VecDeque};

use anyhow::{bail, Result};

use crate::{BoardInt, Coords};
use Direction::*;

/// `Idle` is the pre-game state: no movement issued yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Idle,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Idle => Idle,
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn offset(self) -> (BoardInt, BoardInt) {
        match self {
            Idle => (0, 0),
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// The snake body, head first.
///
/// `body` keeps the order, `occupied` answers membership in O(log n).
/// Both always hold exactly the same positions: every mutation below
/// touches both containers before returning.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    occupied: BTreeSet<Coords>,
}

impl Snake {
    pub fn new(head: Coords) -> Self {
        let mut snake = Snake { body: VecDeque::new(), occupied: BTreeSet::new() };
        snake.push_head(head);
        snake
    }

    /// Builds a snake from segments listed head first.
    pub fn from_segments<I: IntoIterator<Item = Coords>>(segments: I) -> Result<Self> {
        let mut body = VecDeque::new();
        let mut occupied = BTreeSet::new();

        for pos in segments {
            if !occupied.insert(pos) {
                bail!("segment {:?} appears twice in the snake body", pos);
            }
            body.push_back(pos);
        }

        if body.is_empty() {
            bail!("a snake needs at least one segment");
        }

        Ok(Snake { body, occupied })
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn tail(&self) -> Coords {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Coords> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, pos: &Coords) -> bool {
        self.occupied.contains(pos)
    }

    pub fn push_head(&mut self, pos: Coords) {
        self.body.push_front(pos);
        self.occupied.insert(pos);
    }

    pub fn pop_tail(&mut self) -> Option<Coords> {
        let tail = self.body.pop_back()?;
        self.occupied.remove(&tail);
        Some(tail)
    }

    #[cfg(test)]
    pub(crate) fn in_sync(&self) -> bool {
        self.body.len() == self.occupied.len()
            && self.body.iter().all(|p| self.occupied.contains(p))
    }
}

/// Wraps one axis of a position that moved at most one cell off the board.
pub fn wrap(coord: BoardInt, bound: BoardInt) -> BoardInt {
    if coord >= bound {
        0
    } else if coord < 0 {
        bound - 1
    } else {
        coord
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Direction::*;

    #[test]
    fn opposites_pair_up() {
        assert_eq!(Left.opposite(), Right);
        assert_eq!(Right.opposite(), Left);
        assert_eq!(Up.opposite(), Down);
        assert_eq!(Down.opposite(), Up);
        assert_eq!(Idle.opposite(), Idle);
    }

    #[test]
    fn push_and_pop_keep_containers_in_sync() {
        let mut snake = Snake::new((2, 2));
        snake.push_head((3, 2));
        snake.push_head((4, 2));
        assert!(snake.in_sync());
        assert_eq!(snake.head(), (4, 2));
        assert_eq!(snake.tail(), (2, 2));

        assert_eq!(snake.pop_tail(), Some((2, 2)));
        assert!(snake.in_sync());
        assert!(!snake.contains(&(2, 2)));
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn from_segments_rejects_bad_bodies() {
        assert!(Snake::from_segments(vec![]).is_err());
        assert!(Snake::from_segments(vec![(1, 1), (1, 2), (1, 1)]).is_err());

        let snake = Snake::from_segments(vec![(1, 1), (1, 2), (1, 3)]).unwrap();
        assert_eq!(snake.head(), (1, 1));
        assert_eq!(snake.tail(), (1, 3));
        assert!(snake.in_sync());
    }

    #[test]
    fn wrap_both_edges() {
        assert_eq!(wrap(20, 20), 0);
        assert_eq!(wrap(-1, 20), 19);
        assert_eq!(wrap(7, 20), 7);
    }
}
