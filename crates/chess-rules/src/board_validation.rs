//! Whole-board legality: castling, king safety, and attack detection.
//!
//! [`BoardValidation`] gathers the pseudo-legal moves of every piece of the
//! side to move, adds castling where allowed, then discards any move that
//! would leave the mover's king attacked. Every candidate is tried on the
//! real board through a [`Simulation`](crate::Simulation) and reverted before
//! the next one.
//!
//! Attack detection reuses [`PieceValidation`]: the first enemy piece on
//! each ray out of a square only counts as an attacker if its own movement
//! rules reach that square. A pawn directly ahead of a piece therefore does
//! not attack it.

use chess_core::{Direction, File, PieceKind, Side, Square};
use serde::Serialize;

use crate::{Board, Game, GameEvent, PieceValidation, ValidationError};

/// Legal destinations from one origin square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegalMove {
    pub from: Square,
    pub to: Vec<Square>,
}

/// Legal moves of the side to move, grouped by origin in board order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LegalMoves(Vec<LegalMove>);

impl LegalMoves {
    /// Total number of (origin, destination) pairs.
    pub fn len(&self) -> usize {
        self.0.iter().map(|m| m.to.len()).sum()
    }

    /// True if there is no legal move at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Origins that have at least one legal destination.
    pub fn sources(&self) -> impl Iterator<Item = Square> + '_ {
        self.0.iter().map(|m| m.from)
    }

    /// Legal destinations from `from`, empty if none.
    pub fn destinations(&self, from: Square) -> &[Square] {
        self.0
            .iter()
            .find(|m| m.from == from)
            .map(|m| m.to.as_slice())
            .unwrap_or(&[])
    }

    /// True if moving from `from` to `to` is legal.
    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.destinations(from).contains(&to)
    }

    /// Iterates over every (origin, destination) pair.
    pub fn pairs(&self) -> impl Iterator<Item = (Square, Square)> + '_ {
        self.0
            .iter()
            .flat_map(|m| m.to.iter().map(move |&to| (m.from, to)))
    }

    /// Iterates over the grouped moves.
    pub fn iter(&self) -> std::slice::Iter<'_, LegalMove> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a LegalMoves {
    type Item = &'a LegalMove;
    type IntoIter = std::slice::Iter<'a, LegalMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of a full board validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardAnalysis {
    pub legal_moves: LegalMoves,
    /// Square of the mover's king.
    pub king: Square,
    /// Enemy pieces attacking the king; more than one means double check.
    pub attackers: Vec<Square>,
}

/// Legal move generation for the side to move in a [`Game`].
pub struct BoardValidation<'g> {
    game: &'g mut Game,
}

impl<'g> BoardValidation<'g> {
    pub fn new(game: &'g mut Game) -> Self {
        BoardValidation { game }
    }

    /// Returns true if the piece on `square` is attacked by the other side.
    pub fn is_square_attacked(&self, square: Square) -> bool {
        is_square_attacked(self.game.board(), square)
    }

    /// Returns every enemy piece attacking the piece on `square`.
    pub fn find_attackers(&self, square: Square) -> Vec<Square> {
        find_attackers(self.game.board(), square)
    }

    /// Computes the legal moves of the side to move.
    ///
    /// Signals [`GameEvent::Check`] or [`GameEvent::Checkmate`] on the game
    /// when the mover's king is attacked.
    pub fn start(&mut self) -> Result<BoardAnalysis, ValidationError> {
        let side = self.game.current_side();
        let board = self.game.board();
        let king = board
            .king_square(side)
            .ok_or(ValidationError::InvalidBoard(side))?;

        let mut candidates = Vec::new();
        for origin in board.squares(side) {
            let Some(piece) = board.piece_at(origin) else {
                continue;
            };
            let to = PieceValidation::for_kind(piece.kind).start(board, origin)?;
            if !to.is_empty() || origin == king {
                candidates.push(LegalMove { from: origin, to });
            }
        }

        self.evaluate_castle(side, &mut candidates);
        let legal_moves = self.filter_king_attack(king, candidates);
        let attackers = find_attackers(self.game.board(), king);

        if !attackers.is_empty() {
            let event = if legal_moves.is_empty() {
                tracing::debug!(%side, %king, "checkmate");
                GameEvent::Checkmate {
                    king,
                    attackers: attackers.clone(),
                }
            } else {
                tracing::debug!(%side, %king, attackers = attackers.len(), "check");
                GameEvent::Check {
                    king,
                    attackers: attackers.clone(),
                }
            };
            self.game.signal(event);
        }

        Ok(BoardAnalysis {
            legal_moves,
            king,
            attackers,
        })
    }

    /// Adds castle destinations to the king's candidate moves.
    fn evaluate_castle(&mut self, side: Side, candidates: &mut [LegalMove]) {
        let rank = side.home_rank();
        let at = |file: File| Square::new(file, rank);
        let king_square = at(File::E);
        let board = self.game.board_mut();

        let king_ready = board.piece_at(king_square).is_some_and(|p| {
            p.kind == PieceKind::King && p.side == side && p.is_unmoved()
        });
        if !king_ready || is_square_attacked(board, king_square) {
            return;
        }

        // (rook corner, squares between, king transit, king landing)
        let wings: [(File, &[File], File, File); 2] = [
            (File::A, &[File::B, File::C, File::D], File::D, File::C),
            (File::H, &[File::F, File::G], File::F, File::G),
        ];

        let mut landings = Vec::new();
        for (corner, between, transit, landing) in wings {
            let rook_ready = board.piece_at(at(corner)).is_some_and(|p| {
                p.kind == PieceKind::Rook && p.side == side && p.is_unmoved()
            });
            if !rook_ready || !between.iter().all(|&f| board.is_empty(at(f))) {
                continue;
            }

            let transit_safe = match board.simulate(king_square, at(transit)) {
                Ok(trial) => !is_square_attacked(&trial, at(transit)),
                Err(_) => false,
            };
            if !transit_safe {
                tracing::trace!(%side, square = %at(transit), "castle transit attacked");
                continue;
            }

            let landing_safe = match board.simulate(king_square, at(landing)) {
                Ok(trial) => !is_square_attacked(&trial, at(landing)),
                Err(_) => false,
            };
            if landing_safe {
                landings.push(at(landing));
            }
        }

        if let Some(entry) = candidates.iter_mut().find(|m| m.from == king_square) {
            entry.to.extend(landings);
        }
    }

    /// Keeps only the moves after which the mover's king is not attacked.
    fn filter_king_attack(&mut self, king: Square, candidates: Vec<LegalMove>) -> LegalMoves {
        let board = self.game.board_mut();
        let mut legal = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let mut safe = Vec::with_capacity(candidate.to.len());
            for dest in candidate.to {
                let target = if candidate.from == king { dest } else { king };
                let attacked = match board.simulate(candidate.from, dest) {
                    Ok(trial) => is_square_attacked(&trial, target),
                    Err(_) => true,
                };
                if !attacked {
                    safe.push(dest);
                }
            }
            if !safe.is_empty() {
                legal.push(LegalMove {
                    from: candidate.from,
                    to: safe,
                });
            }
        }

        LegalMoves(legal)
    }
}

/// Returns true if the piece on `square` is attacked by an enemy piece.
///
/// An empty square is never attacked.
pub fn is_square_attacked(board: &Board, square: Square) -> bool {
    !scan_attackers(board, square, true).is_empty()
}

/// Returns the squares of every enemy piece attacking the piece on `square`.
pub fn find_attackers(board: &Board, square: Square) -> Vec<Square> {
    scan_attackers(board, square, false)
}

fn scan_attackers(board: &Board, square: Square, first_only: bool) -> Vec<Square> {
    let mut attackers = Vec::new();
    let Some(defender) = board.piece_at(square).map(|p| p.side) else {
        return attackers;
    };

    for dir in Direction::RAYS {
        let mut current = board.neighbor(square, dir);
        while let Some(sq) = current {
            match board.piece_at(sq) {
                None => current = board.neighbor(sq, dir),
                Some(piece) => {
                    if piece.side != defender && reaches(board, sq, piece.kind, square) {
                        attackers.push(sq);
                        if first_only {
                            return attackers;
                        }
                    }
                    break;
                }
            }
        }
    }

    for dir in Direction::KNIGHT_JUMPS {
        let Some(sq) = board.neighbor(square, dir) else {
            continue;
        };
        let is_enemy_knight = board
            .piece_at(sq)
            .is_some_and(|p| p.kind == PieceKind::Knight && p.side != defender);
        if is_enemy_knight && reaches(board, sq, PieceKind::Knight, square) {
            attackers.push(sq);
            if first_only {
                return attackers;
            }
        }
    }

    attackers
}

/// True if the `kind` piece on `origin` can move to `target`.
fn reaches(board: &Board, origin: Square, kind: PieceKind, target: Square) -> bool {
    PieceValidation::for_kind(kind)
        .start(board, origin)
        .is_ok_and(|destinations| destinations.contains(&target))
}
