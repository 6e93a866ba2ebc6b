//! Grid geometry: facing directions and cell coordinates.

use std::fmt;
use std::str::FromStr;

use crate::ScError;

// ── Direction ─────────────────────────────────────────────────────────────────

/// A robot's facing, in counter-clockwise order starting from `Up`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Direction {
        Self::ALL[i % 4]
    }

    /// The opposite direction.
    #[inline]
    pub fn inverse(self) -> Direction {
        Self::from_index(self.index() + 2)
    }

    /// Minimal number of 90° turns needed to face `to` from `self`.
    #[inline]
    pub fn turn_count(self, to: Direction) -> u32 {
        let diff = (to.index() + 4 - self.index()) % 4;
        if diff == 3 { 1 } else { diff as u32 }
    }

    /// Short lowercase name used in logs and exported records.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = ScError;

    /// Accepts the lowercase names written by `as_str`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ScError::Parse(format!("unknown direction {s:?}")))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Position ──────────────────────────────────────────────────────────────────

/// A grid coordinate.  Rows grow downwards, columns grow to the right.
///
/// Signed so that `next_on` can step off the grid; the grid decides whether
/// the result is inside the map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in direction `dir`.
    #[inline]
    pub fn next_on(self, dir: Direction) -> Position {
        match dir {
            Direction::Up => Position::new(self.row - 1, self.col),
            Direction::Left => Position::new(self.row, self.col - 1),
            Direction::Down => Position::new(self.row + 1, self.col),
            Direction::Right => Position::new(self.row, self.col + 1),
        }
    }

    #[inline]
    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
