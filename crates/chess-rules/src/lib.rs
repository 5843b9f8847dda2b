//! Chess rules validation.
//!
//! This crate provides:
//! - [`Board`] - 64 squares with reversible, event-producing moves
//! - [`PieceValidation`] - pseudo-legal destinations for a single piece
//! - [`BoardValidation`] - legal moves with castling and king safety
//! - [`Game`] - move and capture history with position hashing
//! - [`GameValidation`] - check, checkmate, stalemate and repetition
//! - [`GameClient`] - a game that only accepts legal moves
//!
//! # Example
//!
//! ```
//! use chess_rules::{Game, GameValidation};
//!
//! let mut game = Game::replay(&[("e2", "e4"), ("f7", "f6"), ("d2", "d4"), ("g7", "g5"), ("d1", "h5")])
//!     .unwrap();
//! let status = GameValidation::new(&mut game).start().unwrap();
//! assert!(status.is_checkmate);
//! ```

mod board;
pub mod board_validation;
mod client;
mod config;
mod error;
mod game;
mod game_validation;
mod piece_validation;
pub mod zobrist;

pub use board::{AppliedMove, Board, BoardEvent, IntoSquare, MoveRecord, PieceId, Simulation};
pub use board_validation::{
    find_attackers, is_square_attacked, BoardAnalysis, BoardValidation, LegalMove, LegalMoves,
};
pub use client::GameClient;
pub use config::{ConfigError, GameConfig};
pub use error::{BoardError, GameError, ValidationError};
pub use game::{Game, GameEvent, HistoryEntry};
pub use game_validation::{GameStatus, GameValidation};
pub use piece_validation::{Movement, PieceValidation};
