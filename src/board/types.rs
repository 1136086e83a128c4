use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PositionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    pub fn opponent(self) -> Color { !self }

    /// White maximizes the score, Black minimizes it.
    pub fn is_maximizing(self) -> bool { self == Color::White }

    /// Rank step a pawn of this color advances by.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub fn promotion_rank(self) -> u8 { self.opponent().home_rank() }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Board square, `rank * 8 + file` with a1 = 0 and h8 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = 64;

    pub fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "square out of range: {file},{rank}");
        Square(rank * 8 + file)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Square(index as u8))
    }

    pub fn try_new(file: i8, rank: i8) -> Option<Self> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    pub fn file(self) -> u8 { self.0 % 8 }
    pub fn rank(self) -> u8 { self.0 / 8 }
    pub fn index(self) -> usize { self.0 as usize }

    /// The square `df` files and `dr` ranks away, if it is still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        Square::try_new(self.file() as i8 + df, self.rank() as i8 + dr)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl FromStr for Square {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
            return Err(PositionError::InvalidSquare(s.to_string()));
        }
        Ok(Square::new(b[0] - b'a', b[1] - b'1'))
    }
}
