//! Per-piece pseudo-legal destination generation.
//!
//! A [`PieceValidation`] looks at a single piece and reports where it could
//! move given only the pieces in its way. It ignores king safety and castling;
//! [`BoardValidation`](crate::BoardValidation) layers those on top.

use chess_core::{Direction, Piece, PieceKind, Side, Square};

use crate::{Board, ValidationError};

/// Which rays a piece kind moves along, and how far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub forward: bool,
    pub backward: bool,
    pub horizontal: bool,
    pub diagonal: bool,
    /// Maximum number of steps along each ray.
    pub repeat: u8,
}

impl Movement {
    /// Movement of the given piece kind.
    ///
    /// Knights use no rays at all; their jumps are handled separately.
    pub const fn of(kind: PieceKind) -> Self {
        let (forward, backward, horizontal, diagonal) = match kind {
            PieceKind::Pawn => (true, false, false, false),
            PieceKind::Knight => (false, false, false, false),
            PieceKind::Bishop => (false, false, false, true),
            PieceKind::Rook => (true, true, true, false),
            PieceKind::Queen | PieceKind::King => (true, true, true, true),
        };
        Movement {
            forward,
            backward,
            horizontal,
            diagonal,
            repeat: if kind.is_slider() { 8 } else { 1 },
        }
    }
}

/// Pseudo-legal move generator for one piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceValidation {
    kind: PieceKind,
    movement: Movement,
}

impl PieceValidation {
    /// Creates the validator for `kind`.
    pub const fn for_kind(kind: PieceKind) -> Self {
        PieceValidation {
            kind,
            movement: Movement::of(kind),
        }
    }

    /// Returns the squares the piece on `origin` could move to.
    ///
    /// Fails with [`ValidationError::InvalidPiece`] when `origin` is empty or
    /// holds a different kind of piece.
    pub fn start(&self, board: &Board, origin: Square) -> Result<Vec<Square>, ValidationError> {
        let piece = board
            .piece_at(origin)
            .copied()
            .filter(|p| p.kind == self.kind)
            .ok_or_else(|| ValidationError::InvalidPiece {
                square: origin,
                expected: self.kind,
                found: board.piece_at(origin).map(|p| p.kind),
            })?;

        let mut destinations = Vec::new();
        let movement = self.movement;

        if movement.forward {
            self.walk(board, origin, &piece, Direction::forward(piece.side), &mut destinations);
        }
        if movement.backward {
            self.walk(board, origin, &piece, Direction::backward(piece.side), &mut destinations);
        }
        if movement.horizontal {
            for dir in [Direction::Left, Direction::Right] {
                self.walk(board, origin, &piece, dir, &mut destinations);
            }
        }
        if movement.diagonal {
            for dir in [
                Direction::AboveLeft,
                Direction::BelowRight,
                Direction::BelowLeft,
                Direction::AboveRight,
            ] {
                self.walk(board, origin, &piece, dir, &mut destinations);
            }
        }

        match self.kind {
            PieceKind::Knight => knight_jumps(board, origin, &piece, &mut destinations),
            PieceKind::Pawn => pawn_extras(board, origin, &piece, &mut destinations),
            _ => {}
        }

        Ok(destinations)
    }

    /// Walks one ray, stopping at the first occupied square.
    fn walk(
        &self,
        board: &Board,
        origin: Square,
        piece: &Piece,
        direction: Direction,
        destinations: &mut Vec<Square>,
    ) {
        let mut current = board.neighbor(origin, direction);
        let mut steps = 0;

        while let Some(square) = current {
            if steps >= self.movement.repeat {
                break;
            }
            match board.piece_at(square) {
                None => {
                    destinations.push(square);
                    current = board.neighbor(square, direction);
                    steps += 1;
                }
                Some(occupant) => {
                    // pawns never capture straight ahead
                    if piece.kind != PieceKind::Pawn && occupant.side != piece.side {
                        destinations.push(square);
                    }
                    break;
                }
            }
        }
    }
}

/// Adds the eight L-shaped jumps, each composed of a diagonal step followed
/// by a straight step away from the origin.
fn knight_jumps(board: &Board, origin: Square, piece: &Piece, destinations: &mut Vec<Square>) {
    const COMPOSITIONS: [(Direction, [Direction; 2]); 4] = [
        (Direction::AboveLeft, [Direction::Above, Direction::Left]),
        (Direction::AboveRight, [Direction::Above, Direction::Right]),
        (Direction::BelowLeft, [Direction::Below, Direction::Left]),
        (Direction::BelowRight, [Direction::Below, Direction::Right]),
    ];

    for (diagonal, straights) in COMPOSITIONS {
        let Some(corner) = board.neighbor(origin, diagonal) else {
            continue;
        };
        for straight in straights {
            let Some(target) = board.neighbor(corner, straight) else {
                continue;
            };
            if board.piece_at(target).map_or(true, |p| p.side != piece.side) {
                destinations.push(target);
            }
        }
    }
}

/// Adds diagonal captures, the initial double step and en passant.
fn pawn_extras(board: &Board, origin: Square, piece: &Piece, destinations: &mut Vec<Square>) {
    let forward = Direction::forward(piece.side);
    let capture_dirs = match piece.side {
        Side::White => [Direction::AboveLeft, Direction::AboveRight],
        Side::Black => [Direction::BelowLeft, Direction::BelowRight],
    };

    for dir in capture_dirs {
        if let Some(target) = board.neighbor(origin, dir) {
            if board.piece_at(target).is_some_and(|p| p.side != piece.side) {
                destinations.push(target);
            }
        }
    }

    if piece.is_unmoved() {
        let double = board
            .neighbor(origin, forward)
            .filter(|&first| board.is_empty(first))
            .and_then(|first| board.neighbor(first, forward))
            .filter(|&second| board.is_empty(second));
        if let Some(target) = double {
            destinations.push(target);
        }
    }

    if origin.rank() != piece.side.en_passant_rank() {
        return;
    }

    for dir in [Direction::Left, Direction::Right] {
        let Some(beside) = board.neighbor(origin, dir) else {
            continue;
        };
        let Some(id) = board.occupant(beside) else {
            continue;
        };
        let enemy = board.piece(id);
        // identity matters: another pawn may also have moved exactly once
        if enemy.kind == PieceKind::Pawn
            && enemy.side != piece.side
            && enemy.move_count == 1
            && board.last_moved() == Some(id)
        {
            if let Some(target) = board.neighbor(beside, forward) {
                destinations.push(target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;


    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn sorted(mut squares: Vec<Square>) -> Vec<Square> {
        squares.sort();
        squares
    }

    fn squares(list: &[&str]) -> Vec<Square> {
        sorted(list.iter().map(|s| sq(s)).collect())
    }

    #[test]
    fn movement_table() {
        assert_eq!(Movement::of(PieceKind::Queen).repeat, 8);
        assert_eq!(Movement::of(PieceKind::King).repeat, 1);
        assert!(!Movement::of(PieceKind::Bishop).forward);
        assert!(Movement::of(PieceKind::Rook).horizontal);
        assert!(!Movement::of(PieceKind::Pawn).backward);
        assert_eq!(Movement::of(PieceKind::Bishop).repeat, 8);
        assert_eq!(Movement::of(PieceKind::Pawn).repeat, 1);
    }

    #[test]
    fn wrong_piece_kind_is_invalid() {
        let board = Board::standard();
        let err = PieceValidation::for_kind(PieceKind::Bishop)
            .start(&board, sq("e2"))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPiece {
                square: sq("e2"),
                expected: PieceKind::Bishop,
                found: Some(PieceKind::Pawn),
            }
        );

        let err = PieceValidation::for_kind(PieceKind::Pawn)
            .start(&board, sq("e4"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPiece { found: None, .. }));
    }

    #[test]
    fn unmoved_pawn_has_two_moves() {
        let board = Board::standard();
        let moves = PieceValidation::for_kind(PieceKind::Pawn)
            .start(&board, sq("e2"))
            .unwrap();
        assert_eq!(sorted(moves), squares(&["e3", "e4"]));
    }

    #[test]
    fn blocked_pawn_cannot_advance_or_capture_ahead() {
        let mut board = Board::standard();
        let _a = board.apply("e2", "e4").unwrap();
        let _b = board.apply("e7", "e5").unwrap();
        let moves = PieceValidation::for_kind(PieceKind::Pawn)
            .start(&board, sq("e5"))
            .unwrap();
        assert!(moves.is_empty());
    }

    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let mut board = Board::empty();
        board.place(sq("c2"), PieceKind::Pawn, Side::White);
        board.place(sq("c4"), PieceKind::Knight, Side::Black);
        let moves = PieceValidation::for_kind(PieceKind::Pawn)
            .start(&board, sq("c2"))
            .unwrap();
        assert_eq!(moves, vec![sq("c3")]);
    }

    #[test]
    fn pawn_captures_diagonally() {
        let mut board = Board::empty();
        board.place(sq("d4"), PieceKind::Pawn, Side::Black);
        board.place(sq("c2"), PieceKind::Rook, Side::White);
        board.place(sq("e2"), PieceKind::Rook, Side::Black);
        let _moved = board.apply("d4", "d3").unwrap();

        let moves = PieceValidation::for_kind(PieceKind::Pawn)
            .start(&board, sq("d3"))
            .unwrap();
        assert_eq!(sorted(moves), squares(&["c2", "d2"]));
    }

    #[test]
    fn en_passant_requires_last_moved_pawn() {
        let mut board = Board::standard();
        let _a = board.apply("e2", "e4").unwrap();
        let _b = board.apply("a7", "a6").unwrap();
        let _c = board.apply("e4", "e5").unwrap();
        let _d = board.apply("f7", "f5").unwrap();

        let validation = PieceValidation::for_kind(PieceKind::Pawn);
        let moves = validation.start(&board, sq("e5")).unwrap();
        assert!(moves.contains(&sq("f6")));

        // the f-pawn still has one move, but is no longer the last piece moved
        let _e = board.apply("b1", "c3").unwrap();
        let _f = board.apply("a6", "a5").unwrap();
        let moves = validation.start(&board, sq("e5")).unwrap();
        assert!(!moves.contains(&sq("f6")));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let board = Board::standard();
        let moves = PieceValidation::for_kind(PieceKind::Knight)
            .start(&board, sq("g1"))
            .unwrap();
        assert_eq!(sorted(moves), squares(&["f3", "h3"]));
    }

    #[test]
    fn knight_in_center_has_eight_jumps() {
        let mut board = Board::empty();
        board.place(sq("d4"), PieceKind::Knight, Side::White);
        board.place(sq("e6"), PieceKind::Pawn, Side::White);
        board.place(sq("c6"), PieceKind::Pawn, Side::Black);
        let moves = PieceValidation::for_kind(PieceKind::Knight)
            .start(&board, sq("d4"))
            .unwrap();
        assert_eq!(
            sorted(moves),
            squares(&["b3", "b5", "c2", "c6", "e2", "f3", "f5"])
        );
    }

    #[test]
    fn knight_on_edge_does_not_wrap() {
        let mut board = Board::empty();
        board.place(sq("a4"), PieceKind::Knight, Side::White);
        let moves = PieceValidation::for_kind(PieceKind::Knight)
            .start(&board, sq("a4"))
            .unwrap();
        assert_eq!(sorted(moves), squares(&["b2", "b6", "c3", "c5"]));
    }

    #[test]
    fn rook_rays_stop_at_pieces() {
        let mut board = Board::empty();
        board.place(sq("d4"), PieceKind::Rook, Side::White);
        board.place(sq("d6"), PieceKind::Pawn, Side::Black);
        board.place(sq("b4"), PieceKind::Pawn, Side::White);
        let moves = PieceValidation::for_kind(PieceKind::Rook)
            .start(&board, sq("d4"))
            .unwrap();
        assert_eq!(
            sorted(moves),
            squares(&["c4", "d1", "d2", "d3", "d5", "d6", "e4", "f4", "g4", "h4"])
        );
    }

    #[test]
    fn bishop_from_corner() {
        let mut board = Board::empty();
        board.place(Square::A1, PieceKind::Bishop, Side::Black);
        let moves = PieceValidation::for_kind(PieceKind::Bishop)
            .start(&board, Square::A1)
            .unwrap();
        assert_eq!(moves.len(), 7);
        assert!(moves.contains(&Square::H8));
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let mut board = Board::empty();
        board.place(sq("d4"), PieceKind::Queen, Side::White);
        let moves = PieceValidation::for_kind(PieceKind::Queen)
            .start(&board, sq("d4"))
            .unwrap();
        assert_eq!(moves.len(), 27);
    }

    #[test]
    fn king_steps_once_without_castling() {
        let board = Board::standard();
        let moves = PieceValidation::for_kind(PieceKind::King)
            .start(&board, Square::E1)
            .unwrap();
        assert!(moves.is_empty());

        let mut board = Board::empty();
        board.place(Square::E1, PieceKind::King, Side::White);
        board.place(Square::H1, PieceKind::Rook, Side::White);
        let moves = PieceValidation::for_kind(PieceKind::King)
            .start(&board, Square::E1)
            .unwrap();
        assert_eq!(sorted(moves), squares(&["d1", "d2", "e2", "f1", "f2"]));
    }

    #[test]
    fn validation_does_not_mutate() {
        let board = Board::standard();
        let before = board.clone();
        for (square, piece) in board.occupied() {
            let _ = PieceValidation::for_kind(piece.kind).start(&board, square);
        }
        assert_eq!(board, before);
    }
}
