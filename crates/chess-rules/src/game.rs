//! A single game: one board plus its move and capture history.
//!
//! [`Game`] forwards moves to its [`Board`] and folds the returned
//! [`BoardEvent`]s into its own bookkeeping: every real move pushes a
//! [`HistoryEntry`] with the resulting position hash, captures are kept in
//! order, and undo pops both. The events are also queued, together with the
//! check signals raised by validation, until the caller drains them.

use chess_core::{PieceKind, Side, Square};

use crate::zobrist::position_hash;
use crate::{
    AppliedMove, Board, BoardError, BoardEvent, ConfigError, GameConfig, IntoSquare, PieceId,
    Simulation,
};

/// One ply in the game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The piece that moved; the promoted piece once a promotion happened.
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    /// Hash of the position reached by this move.
    pub hash: u64,
    /// Set when the moved pawn was promoted afterwards.
    pub promotion: bool,
    pub from: Square,
    pub to: Square,
    pub notation: Option<String>,
}

/// Everything a game reports to its caller, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A board mutation.
    Board(BoardEvent),
    /// The side to move is in check but has legal moves.
    Check { king: Square, attackers: Vec<Square> },
    /// The side to move is in check with no legal moves.
    Checkmate { king: Square, attackers: Vec<Square> },
}

/// A chess game with history tracking.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    move_history: Vec<HistoryEntry>,
    capture_history: Vec<PieceId>,
    config: GameConfig,
    events: Vec<GameEvent>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        Self::build(Board::standard(), GameConfig::default())
    }

    /// Creates a game from the standard starting position with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] for a repetition threshold
    /// below 2, the same check applied when loading from TOML.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(Board::standard(), config))
    }

    /// Creates a game from a custom position where `first_side` moves first.
    pub fn from_board(board: Board, first_side: Side) -> Self {
        let config = GameConfig {
            first_side,
            ..GameConfig::default()
        };
        Self::build(board, config)
    }

    fn build(board: Board, config: GameConfig) -> Self {
        Game {
            board,
            move_history: Vec::new(),
            capture_history: Vec::new(),
            config,
            events: Vec::new(),
        }
    }

    /// Plays a recorded sequence of moves from the starting position.
    ///
    /// Moves are applied as given; legality is not checked.
    pub fn replay<S: IntoSquare + Copy>(moves: &[(S, S)]) -> Result<Self, BoardError> {
        let mut game = Game::new();
        for &(src, dest) in moves {
            let _ = game.apply(src, dest)?;
        }
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn move_history(&self) -> &[HistoryEntry] {
        &self.move_history
    }

    /// Captured pieces, oldest first.
    pub fn capture_history(&self) -> &[PieceId] {
        &self.capture_history
    }

    /// The side whose turn it is.
    pub fn current_side(&self) -> Side {
        if self.move_history.len() % 2 == 0 {
            self.config.first_side
        } else {
            self.config.first_side.opposite()
        }
    }

    /// Hash of the current position with the current side to move.
    pub fn position_hash(&self) -> u64 {
        position_hash(&self.board, self.current_side())
    }

    /// Moves the piece on `src` to `dest` and records it.
    ///
    /// The move is not checked for legality; use
    /// [`GameValidation`](crate::GameValidation) or
    /// [`GameClient`](crate::GameClient) for that.
    pub fn apply(&mut self, src: impl IntoSquare, dest: impl IntoSquare) -> Result<AppliedMove, BoardError> {
        let applied = self.board.apply(src, dest)?;
        self.consume(applied.events());
        Ok(applied)
    }

    /// Like [`Game::apply`], keeping `notation` in the history entry.
    pub fn apply_with_notation(
        &mut self,
        src: impl IntoSquare,
        dest: impl IntoSquare,
        notation: impl Into<String>,
    ) -> Result<AppliedMove, BoardError> {
        let applied = self.board.apply_with_notation(src, dest, notation)?;
        self.consume(applied.events());
        Ok(applied)
    }

    /// Tries a move without recording it; reverted when the guard drops.
    pub fn simulate(&mut self, src: impl IntoSquare, dest: impl IntoSquare) -> Result<Simulation<'_>, BoardError> {
        self.board.simulate(src, dest)
    }

    /// Reverts `applied`, which must be the most recent move of this game.
    pub fn undo(&mut self, applied: &mut AppliedMove) -> Result<(), BoardError> {
        if let Some(event) = self.board.undo(applied)? {
            self.consume(std::slice::from_ref(&event));
        }
        Ok(())
    }

    /// Replaces the piece on `square` with a new `kind` piece.
    pub fn promote(&mut self, square: impl IntoSquare, kind: PieceKind) -> Result<(), BoardError> {
        let event = self.board.promote(square, kind)?;
        self.consume(std::slice::from_ref(&event));
        Ok(())
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn signal(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn consume(&mut self, events: &[BoardEvent]) {
        for event in events.iter().cloned() {
            match &event {
                BoardEvent::Captured(record) => {
                    if let Some(captured) = record.captured {
                        self.capture_history.push(captured);
                    }
                }
                BoardEvent::Moved(record) => {
                    let next = self.current_side().opposite();
                    self.move_history.push(HistoryEntry {
                        piece: record.piece,
                        captured: record.captured,
                        hash: position_hash(&self.board, next),
                        promotion: false,
                        from: record.from,
                        to: record.to,
                        notation: record.notation.clone(),
                    });
                }
                BoardEvent::Promoted { piece, .. } => {
                    let hash = self.position_hash();
                    if let Some(entry) = self.move_history.last_mut() {
                        entry.promotion = true;
                        entry.piece = *piece;
                        entry.hash = hash;
                    }
                }
                BoardEvent::Undone(record) => {
                    self.move_history.pop();
                    if record.captured.is_some() {
                        self.capture_history.pop();
                    }
                    let last = self.move_history.last().map(|entry| entry.piece);
                    self.board.set_last_moved(last);
                }
                _ => {}
            }
            self.events.push(GameEvent::Board(event));
        }
    }
}
