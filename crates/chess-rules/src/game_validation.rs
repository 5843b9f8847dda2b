//! Game-level status: check, checkmate, stalemate and repetition.

use std::collections::HashMap;

use chess_core::Side;
use serde::Serialize;

use crate::board_validation::is_square_attacked;
use crate::{BoardValidation, Game, LegalMoves, ValidationError};

/// Status of the side to move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStatus {
    pub side: Side,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_repetition: bool,
    pub legal_moves: LegalMoves,
}

impl GameStatus {
    /// True once the side to move has no legal move.
    pub fn is_over(&self) -> bool {
        self.is_checkmate || self.is_stalemate
    }
}

/// Derives the [`GameStatus`] of a [`Game`].
pub struct GameValidation<'g> {
    game: &'g mut Game,
}

impl<'g> GameValidation<'g> {
    pub fn new(game: &'g mut Game) -> Self {
        GameValidation { game }
    }

    /// Classifies the current position.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGame`] when the side to move has no
    /// king on the board.
    pub fn start(&mut self) -> Result<GameStatus, ValidationError> {
        let side = self.game.current_side();
        let king = self
            .game
            .board()
            .king_square(side)
            .ok_or(ValidationError::InvalidGame(side))?;
        let attacked = is_square_attacked(self.game.board(), king);

        let analysis = BoardValidation::new(&mut *self.game).start()?;
        let stuck = analysis.legal_moves.is_empty();

        Ok(GameStatus {
            side,
            is_check: attacked && !stuck,
            is_checkmate: attacked && stuck,
            is_stalemate: !attacked && stuck,
            is_repetition: self.is_repetition(),
            legal_moves: analysis.legal_moves,
        })
    }

    /// True if any position in the history occurred at least as often as the
    /// configured threshold.
    pub fn is_repetition(&self) -> bool {
        let threshold = self.game.config().repetition_threshold;
        let mut seen: HashMap<u64, usize> = HashMap::new();
        self.game.move_history().iter().any(|entry| {
            let count = seen.entry(entry.hash).or_insert(0);
            *count += 1;
            *count >= threshold
        })
    }
}
