//! Error types for board mutation, validation and game play.

use chess_core::{PieceKind, Side, Square};
use thiserror::Error;

/// Errors raised by [`Board`](crate::Board) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid square: '{0}'")]
    InvalidSquare(String),

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("source and destination are both {0}")]
    NullMove(Square),

    #[error("cannot undo a move multiple times")]
    AlreadyUndone,
}

/// Errors raised by the validation passes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("piece is invalid: expected {expected} on {square}, found {found:?}")]
    InvalidPiece {
        square: Square,
        expected: PieceKind,
        found: Option<PieceKind>,
    },

    #[error("board is invalid: {0} has no king")]
    InvalidBoard(Side),

    #[error("game is invalid: {0} has no king")]
    InvalidGame(Side),
}

/// Errors raised while playing a game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("move is invalid ({from} to {to})")]
    IllegalMove { from: Square, to: Square },

    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),
}
