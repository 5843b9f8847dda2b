//! A game driven by square pairs, with legality enforced.

use chess_core::{PieceKind, Square};

use crate::{AppliedMove, Game, GameError, GameEvent, GameStatus, GameValidation, IntoSquare};

/// Plays a [`Game`], accepting only legal moves.
///
/// The status of the side to move is recomputed after every move and kept
/// until the next one.
#[derive(Debug)]
pub struct GameClient {
    game: Game,
    status: GameStatus,
}

impl GameClient {
    /// Starts a client on a new standard game.
    pub fn new() -> Result<Self, GameError> {
        Self::from_game(Game::new())
    }

    /// Wraps an existing game.
    pub fn from_game(mut game: Game) -> Result<Self, GameError> {
        let status = GameValidation::new(&mut game).start()?;
        Ok(GameClient { game, status })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    /// Status computed after the last move.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Recomputes the status from the current position.
    pub fn refresh(&mut self) -> Result<&GameStatus, GameError> {
        self.status = GameValidation::new(&mut self.game).start()?;
        Ok(&self.status)
    }

    /// Plays `src` to `dest` if it is a legal move.
    ///
    /// `promotion` replaces a pawn that reaches the last rank; it is ignored
    /// for any other move.
    pub fn play(
        &mut self,
        src: impl IntoSquare,
        dest: impl IntoSquare,
        promotion: Option<PieceKind>,
    ) -> Result<AppliedMove, GameError> {
        let (src, dest) = (src.into_square()?, dest.into_square()?);

        if let Some(kind) = promotion.filter(|kind| !kind.is_promotion_target()) {
            return Err(GameError::InvalidPromotion(kind));
        }
        if !self.status.legal_moves.contains(src, dest) {
            return Err(GameError::IllegalMove { from: src, to: dest });
        }

        let side = self.game.current_side();
        let applied = self.game.apply(src, dest)?;

        if let Some(kind) = promotion {
            let reached_end = dest.rank() == side.opposite().home_rank();
            let is_pawn = self
                .game
                .board()
                .piece(applied.record().piece)
                .kind
                == PieceKind::Pawn;
            if reached_end && is_pawn {
                self.game.promote(dest, kind)?;
            }
        }

        self.refresh()?;
        Ok(applied)
    }

    /// Takes the events queued by the game since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.game.drain_events()
    }

    /// Legal destinations for the piece on `from` in the current position.
    pub fn destinations(&self, from: Square) -> &[Square] {
        self.status.legal_moves.destinations(from)
    }
}
