//! The board: 64 squares, the pieces standing on them, and reversible moves.
//!
//! Pieces live in an arena owned by the board and are referred to by
//! [`PieceId`]. Squares hold optional handles, so a piece keeps its identity
//! as it moves around. This is what lets en passant refer to the exact pawn
//! that just advanced two squares.
//!
//! Every move returns an [`AppliedMove`] that can undo it exactly once.
//! Real moves also return the [`BoardEvent`]s they produced; the board itself
//! never interprets them.

use std::fmt;
use std::ops::Deref;

use chess_core::{Direction, File, Piece, PieceKind, Rank, Side, Square};

use crate::BoardError;

/// Stable handle to a piece in the board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u32);

impl PieceId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Anything that names a square: a [`Square`], a `(File, Rank)` pair, or a
/// two-character coordinate such as `"e4"`.
pub trait IntoSquare {
    fn into_square(self) -> Result<Square, BoardError>;
}

impl IntoSquare for Square {
    #[inline]
    fn into_square(self) -> Result<Square, BoardError> {
        Ok(self)
    }
}

impl IntoSquare for (File, Rank) {
    #[inline]
    fn into_square(self) -> Result<Square, BoardError> {
        Ok(Square::new(self.0, self.1))
    }
}

impl IntoSquare for &str {
    fn into_square(self) -> Result<Square, BoardError> {
        Square::from_algebraic(self).ok_or_else(|| BoardError::InvalidSquare(self.to_string()))
    }
}

/// The record of one applied move (a ply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Square the piece left.
    pub from: Square,
    /// Square the piece landed on.
    pub to: Square,
    /// The piece that moved.
    pub piece: PieceId,
    /// The piece removed by this move, if any.
    pub captured: Option<PieceId>,
    /// True if the move was a castle and relocated a rook.
    pub castle: bool,
    /// True if the move was an en-passant capture.
    pub en_passant: bool,
    /// Notation supplied by the caller.
    pub notation: Option<String>,
    /// Set once the move has been undone.
    pub undone: bool,
}

impl MoveRecord {
    /// Square the captured piece stood on. Differs from `to` for en passant.
    pub fn captured_square(&self) -> Square {
        if self.en_passant {
            Square::new(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }

    /// The rook's (corner, landing) squares for a castle.
    pub fn rook_squares(&self) -> Option<(Square, Square)> {
        if self.castle {
            castle_rook_squares(self.to)
        } else {
            None
        }
    }
}

/// Notifications produced by real (non-simulated) board mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Captured(MoveRecord),
    Castled(MoveRecord),
    EnPassant(MoveRecord),
    Moved(MoveRecord),
    Promoted { square: Square, piece: PieceId },
    Undone(MoveRecord),
}

/// A move that has been applied to a board and can be undone once.
#[derive(Debug)]
#[must_use = "an applied move should be kept to allow undoing it"]
pub struct AppliedMove {
    record: MoveRecord,
    simulated: bool,
    previous_last_moved: Option<PieceId>,
    events: Vec<BoardEvent>,
}

impl AppliedMove {
    /// The move record.
    pub fn record(&self) -> &MoveRecord {
        &self.record
    }

    /// True if the move was applied for analysis only.
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Events emitted when the move was applied, empty for simulations.
    ///
    /// Moves made through [`Game`](crate::Game) keep their events here as
    /// well as in the game's queue.
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Reverts the move on `board`. Fails if it was already undone.
    pub fn undo(&mut self, board: &mut Board) -> Result<Option<BoardEvent>, BoardError> {
        board.undo(self)
    }
}

/// A simulated move that is reverted when the guard is dropped.
///
/// The guard derefs to the mutated board so queries can run against the
/// trial position.
pub struct Simulation<'a> {
    board: &'a mut Board,
    applied: AppliedMove,
}

impl Simulation<'_> {
    /// The simulated move.
    pub fn record(&self) -> &MoveRecord {
        self.applied.record()
    }
}

impl Deref for Simulation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        let restored = self.board.undo(&mut self.applied);
        debug_assert!(restored.is_ok(), "simulation undone twice");
    }
}

/// The 64 squares and the pieces on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<PieceId>; 64],
    pieces: Vec<Piece>,
    last_moved: Option<PieceId>,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            pieces: Vec::with_capacity(32),
            last_moved: None,
        }
    }

    /// Creates a board with the standard starting position.
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
            board.place(Square::new(file, Rank::R1), kind, Side::White);
            board.place(Square::new(file, Rank::R2), PieceKind::Pawn, Side::White);
            board.place(Square::new(file, Rank::R7), PieceKind::Pawn, Side::Black);
            board.place(Square::new(file, Rank::R8), kind, Side::Black);
        }
        board
    }

    /// Puts a new, unmoved piece on `square`, replacing any occupant.
    ///
    /// Intended for setting up positions; it is not a move.
    pub fn place(&mut self, square: Square, kind: PieceKind, side: Side) -> PieceId {
        let id = self.alloc(Piece::new(kind, side));
        self.squares[square.index() as usize] = Some(id);
        id
    }

    /// Takes the occupant off `square` without recording a move.
    pub fn remove(&mut self, square: Square) -> Option<PieceId> {
        self.squares[square.index() as usize].take()
    }

    fn alloc(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(piece);
        id
    }

    /// Looks up a square by its two-character coordinate.
    pub fn square(&self, coord: &str) -> Option<Square> {
        Square::from_algebraic(coord)
    }

    /// Looks up a square by file letter and rank number.
    pub fn square_at(&self, file: char, rank: u8) -> Option<Square> {
        Some(Square::new(File::from_char(file)?, Rank::from_number(rank)?))
    }

    /// Returns the square next to `square` in `direction`, or `None` at the edge.
    #[inline]
    pub fn neighbor(&self, square: Square, direction: Direction) -> Option<Square> {
        square.neighbor(direction)
    }

    /// Returns the handle of the piece on `square`.
    #[inline]
    pub fn occupant(&self, square: Square) -> Option<PieceId> {
        self.squares[square.index() as usize]
    }

    /// Returns the piece behind a handle.
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Returns the piece on `square`, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.occupant(square).map(|id| self.piece(id))
    }

    /// Returns true if nothing stands on `square`.
    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.occupant(square).is_none()
    }

    /// Squares occupied by `side`, in board order (a1 to h8).
    pub fn squares(&self, side: Side) -> Vec<Square> {
        Square::all()
            .filter(|&sq| self.piece_at(sq).is_some_and(|p| p.side == side))
            .collect()
    }

    /// All occupied squares with their pieces, in board order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Returns the square of `side`'s king.
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.occupied()
            .find(|(_, p)| p.kind == PieceKind::King && p.side == side)
            .map(|(sq, _)| sq)
    }

    /// The piece moved (or promoted) most recently by a real move.
    #[inline]
    pub fn last_moved(&self) -> Option<PieceId> {
        self.last_moved
    }

    pub(crate) fn set_last_moved(&mut self, id: Option<PieceId>) {
        self.last_moved = id;
    }

    /// Moves the piece on `src` to `dest`.
    pub fn apply(&mut self, src: impl IntoSquare, dest: impl IntoSquare) -> Result<AppliedMove, BoardError> {
        self.execute(src.into_square()?, dest.into_square()?, false, None)
    }

    /// Moves the piece on `src` to `dest`, recording caller-supplied notation.
    pub fn apply_with_notation(
        &mut self,
        src: impl IntoSquare,
        dest: impl IntoSquare,
        notation: impl Into<String>,
    ) -> Result<AppliedMove, BoardError> {
        self.execute(
            src.into_square()?,
            dest.into_square()?,
            false,
            Some(notation.into()),
        )
    }

    /// Applies a move for analysis only.
    ///
    /// Move counts, `last_moved` and events are left untouched. The caller
    /// must undo it before making any other move; prefer [`Board::simulate`].
    pub fn apply_simulated(
        &mut self,
        src: impl IntoSquare,
        dest: impl IntoSquare,
    ) -> Result<AppliedMove, BoardError> {
        self.execute(src.into_square()?, dest.into_square()?, true, None)
    }

    /// Applies a simulated move that is undone when the returned guard drops.
    pub fn simulate(
        &mut self,
        src: impl IntoSquare,
        dest: impl IntoSquare,
    ) -> Result<Simulation<'_>, BoardError> {
        let applied = self.apply_simulated(src, dest)?;
        Ok(Simulation {
            board: self,
            applied,
        })
    }

    fn execute(
        &mut self,
        src: Square,
        dest: Square,
        simulate: bool,
        notation: Option<String>,
    ) -> Result<AppliedMove, BoardError> {
        if src == dest {
            return Err(BoardError::NullMove(src));
        }
        let mover = self.occupant(src).ok_or(BoardError::EmptySquare(src))?;
        let piece = *self.piece(mover);

        let mut record = MoveRecord {
            from: src,
            to: dest,
            piece: mover,
            captured: self.occupant(dest),
            castle: false,
            en_passant: false,
            notation,
            undone: false,
        };

        let rook_move = if piece.kind == PieceKind::King
            && piece.is_unmoved()
            && src.file() == File::E
            && src.rank() == dest.rank()
            && matches!(dest.file(), File::G | File::C)
        {
            self.castle_rook(piece.side, dest)
        } else {
            None
        };
        record.castle = rook_move.is_some();
        record.en_passant =
            piece.kind == PieceKind::Pawn && record.captured.is_none() && dest.file() != src.file();

        self.squares[src.index() as usize] = None;
        self.squares[dest.index() as usize] = Some(mover);

        if record.en_passant {
            let square = record.captured_square();
            record.captured = self.squares[square.index() as usize].take();
        }

        if let Some((corner, landing)) = rook_move {
            self.squares[landing.index() as usize] = self.squares[corner.index() as usize].take();
        }

        let previous_last_moved = self.last_moved;
        let mut events = Vec::new();

        if simulate {
            tracing::trace!(from = %src, to = %dest, "simulated move");
        } else {
            self.pieces[mover.index()].move_count += 1;
            self.last_moved = Some(mover);

            if record.captured.is_some() {
                events.push(BoardEvent::Captured(record.clone()));
            }
            if record.castle {
                events.push(BoardEvent::Castled(record.clone()));
            }
            if record.en_passant {
                events.push(BoardEvent::EnPassant(record.clone()));
            }
            events.push(BoardEvent::Moved(record.clone()));

            tracing::debug!(
                from = %src,
                to = %dest,
                piece = %piece.kind,
                capture = record.captured.is_some(),
                castle = record.castle,
                en_passant = record.en_passant,
                "applied move"
            );
        }

        Ok(AppliedMove {
            record,
            simulated: simulate,
            previous_last_moved,
            events,
        })
    }

    /// Returns the rook's (corner, landing) squares if an unmoved rook of
    /// `side` waits in the corner matching the king's castle destination.
    fn castle_rook(&self, side: Side, king_dest: Square) -> Option<(Square, Square)> {
        let (corner, landing) = castle_rook_squares(king_dest)?;
        let rook = self.piece_at(corner)?;
        (rook.kind == PieceKind::Rook && rook.side == side && rook.is_unmoved())
            .then_some((corner, landing))
    }

    /// Reverts `applied`, including captures, castle rooks and, for real
    /// moves, the move count and `last_moved`.
    pub fn undo(&mut self, applied: &mut AppliedMove) -> Result<Option<BoardEvent>, BoardError> {
        if applied.record.undone {
            return Err(BoardError::AlreadyUndone);
        }

        let record = &applied.record;
        self.squares[record.to.index() as usize] = None;
        self.squares[record.from.index() as usize] = Some(record.piece);

        if let Some(captured) = record.captured {
            self.squares[record.captured_square().index() as usize] = Some(captured);
        }

        if let Some((corner, landing)) = record.rook_squares() {
            self.squares[corner.index() as usize] = self.squares[landing.index() as usize].take();
        }

        applied.record.undone = true;

        if applied.simulated {
            return Ok(None);
        }

        let mover = &mut self.pieces[applied.record.piece.index()];
        mover.move_count = mover.move_count.saturating_sub(1);
        self.last_moved = applied.previous_last_moved;

        tracing::debug!(from = %applied.record.from, to = %applied.record.to, "undid move");
        Ok(Some(BoardEvent::Undone(applied.record.clone())))
    }

    /// Replaces the piece on `square` with a new piece of `kind`.
    ///
    /// The replacement keeps the side and move count of the piece it replaces
    /// and becomes the last moved piece. Whether the promotion is allowed is
    /// the caller's decision.
    pub fn promote(&mut self, square: impl IntoSquare, kind: PieceKind) -> Result<BoardEvent, BoardError> {
        let square = square.into_square()?;
        let old = *self.piece_at(square).ok_or(BoardError::EmptySquare(square))?;

        let id = self.alloc(Piece {
            kind,
            side: old.side,
            move_count: old.move_count,
        });
        self.squares[square.index() as usize] = Some(id);
        self.last_moved = Some(id);

        tracing::debug!(%square, %kind, "promoted piece");
        Ok(BoardEvent::Promoted { square, piece: id })
    }
}

/// Rook (corner, landing) squares for a king landing on the g- or c-file.
fn castle_rook_squares(king_dest: Square) -> Option<(Square, Square)> {
    let rank = king_dest.rank();
    match king_dest.file() {
        File::G => Some((Square::new(File::H, rank), Square::new(File::F, rank))),
        File::C => Some((Square::new(File::A, rank), Square::new(File::D, rank))),
        _ => None,
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, *rank))
                    .map_or('.', |p| p.to_char());
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
