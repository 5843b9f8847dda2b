//! Player side representation.

use serde::{Deserialize, Serialize};

use crate::Rank;

/// The two sides of a chess game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the rank the side's king and rooks start on.
    #[inline]
    pub const fn home_rank(self) -> Rank {
        match self {
            Side::White => Rank::R1,
            Side::Black => Rank::R8,
        }
    }

    /// Returns the rank a pawn of this side must stand on to capture en passant.
    #[inline]
    pub const fn en_passant_rank(self) -> Rank {
        match self {
            Side::White => Rank::R5,
            Side::Black => Rank::R4,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_side() {
        assert_eq!(Side::White.opposite(), Side::Black);
        assert_eq!(Side::Black.opposite(), Side::White);
    }

    #[test]
    fn home_and_en_passant_ranks() {
        assert_eq!(Side::White.home_rank(), Rank::R1);
        assert_eq!(Side::Black.home_rank(), Rank::R8);
        assert_eq!(Side::White.en_passant_rank(), Rank::R5);
        assert_eq!(Side::Black.en_passant_rank(), Rank::R4);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Side::White), "White");
        assert_eq!(format!("{}", Side::Black), "Black");
    }
}
