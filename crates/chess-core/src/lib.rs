//! Core types for chess.
//!
//! This crate provides the fundamental value types used by the rules engine:
//! - [`Piece`], [`PieceKind`] and [`Side`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Direction`] for neighbor traversal, including knight jumps

mod direction;
mod piece;
mod side;
mod square;

pub use direction::Direction;
pub use piece::{Piece, PieceKind};
pub use side::Side;
pub use square::{File, ParseSquareError, Rank, Square};
