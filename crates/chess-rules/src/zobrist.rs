//! Zobrist hashing for repetition detection.
//!
//! A position hash XORs one key per occupied square (by kind, side and
//! square), a key when Black is to move, and one key per castling right
//! still available. Castling rights are read off the board: an unmoved king
//! on its home e-square paired with an unmoved rook in a corner.

use chess_core::{File, PieceKind, Side, Square};

use crate::Board;

/// Zobrist hash keys, generated from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][side][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    /// XORed in when Black is to move.
    pub black_to_move: u64,
    /// White kingside, White queenside, Black kingside, Black queenside.
    pub castling: [u64; 4],
}

impl ZobristKeys {
    /// Builds the key table with a xorshift64 generator.
    const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];

        let mut kind = 0;
        while kind < 6 {
            let mut side = 0;
            while side < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[kind][side][square] = state;
                    square += 1;
                }
                side += 1;
            }
            kind += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
        }
    }

    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, side: Side, square: Square) -> u64 {
        self.pieces[kind.index()][side.index()][square.index() as usize]
    }

    #[inline]
    pub const fn castling_key(&self, side: Side, kingside: bool) -> u64 {
        let wing = if kingside { 0 } else { 1 };
        self.castling[side.index() * 2 + wing]
    }
}

/// Global keys, built at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Hashes the board with `side_to_move` to play.
pub fn position_hash(board: &Board, side_to_move: Side) -> u64 {
    let mut hash = board
        .occupied()
        .fold(0u64, |acc, (square, piece)| {
            acc ^ ZOBRIST.piece_key(piece.kind, piece.side, square)
        });

    if side_to_move == Side::Black {
        hash ^= ZOBRIST.black_to_move;
    }

    for side in [Side::White, Side::Black] {
        for kingside in [true, false] {
            if has_castling_right(board, side, kingside) {
                hash ^= ZOBRIST.castling_key(side, kingside);
            }
        }
    }

    hash
}

fn has_castling_right(board: &Board, side: Side, kingside: bool) -> bool {
    let rank = side.home_rank();
    let corner = if kingside { File::H } else { File::A };
    let unmoved = |file: File, kind: PieceKind| {
        board
            .piece_at(Square::new(file, rank))
            .is_some_and(|p| p.kind == kind && p.side == side && p.is_unmoved())
    };
    unmoved(File::E, PieceKind::King) && unmoved(corner, PieceKind::Rook)
}
