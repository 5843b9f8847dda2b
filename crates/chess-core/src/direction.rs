//! Neighbor directions on the board.

use crate::Side;

/// A step from one square to a neighboring square.
///
/// The first eight variants are the ray directions used by sliding and
/// stepping pieces; the remaining eight are the knight jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Above,
    AboveRight,
    Right,
    BelowRight,
    Below,
    BelowLeft,
    Left,
    AboveLeft,
    KnightAboveLeft,
    KnightAboveRight,
    KnightRightAbove,
    KnightRightBelow,
    KnightBelowRight,
    KnightBelowLeft,
    KnightLeftBelow,
    KnightLeftAbove,
}

impl Direction {
    /// The eight ray directions, clockwise from `Above`.
    pub const RAYS: [Direction; 8] = [
        Direction::Above,
        Direction::AboveRight,
        Direction::Right,
        Direction::BelowRight,
        Direction::Below,
        Direction::BelowLeft,
        Direction::Left,
        Direction::AboveLeft,
    ];

    /// The eight knight jumps, clockwise from `KnightAboveRight`.
    pub const KNIGHT_JUMPS: [Direction; 8] = [
        Direction::KnightAboveRight,
        Direction::KnightRightAbove,
        Direction::KnightRightBelow,
        Direction::KnightBelowRight,
        Direction::KnightBelowLeft,
        Direction::KnightLeftBelow,
        Direction::KnightLeftAbove,
        Direction::KnightAboveLeft,
    ];

    /// Returns the (file, rank) displacement of this direction.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Above => (0, 1),
            Direction::AboveRight => (1, 1),
            Direction::Right => (1, 0),
            Direction::BelowRight => (1, -1),
            Direction::Below => (0, -1),
            Direction::BelowLeft => (-1, -1),
            Direction::Left => (-1, 0),
            Direction::AboveLeft => (-1, 1),
            Direction::KnightAboveLeft => (-1, 2),
            Direction::KnightAboveRight => (1, 2),
            Direction::KnightRightAbove => (2, 1),
            Direction::KnightRightBelow => (2, -1),
            Direction::KnightBelowRight => (1, -2),
            Direction::KnightBelowLeft => (-1, -2),
            Direction::KnightLeftBelow => (-2, -1),
            Direction::KnightLeftAbove => (-2, 1),
        }
    }

    /// The direction a pawn of `side` advances in.
    #[inline]
    pub const fn forward(side: Side) -> Direction {
        match side {
            Side::White => Direction::Above,
            Side::Black => Direction::Below,
        }
    }

    /// The direction pointing back toward `side`'s home rank.
    #[inline]
    pub const fn backward(side: Side) -> Direction {
        match side {
            Side::White => Direction::Below,
            Side::Black => Direction::Above,
        }
    }
}
