//! Whole-game scenarios played through the public API.

use std::io;
use std::sync::{Arc, Mutex};

use chess_core::{PieceKind, Side, Square};
use chess_rules::{
    Board, BoardError, BoardEvent, Game, GameClient, GameConfig, GameEvent, GameStatus,
    GameValidation,
};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

/// Splits coordinate moves such as "e2e4" into square pairs.
fn pairs(moves: &str) -> Vec<(&str, &str)> {
    moves
        .split_whitespace()
        .map(|m| (&m[0..2], &m[2..4]))
        .collect()
}

fn status(game: &mut Game) -> GameStatus {
    GameValidation::new(game).start().unwrap()
}

#[test]
fn twenty_moves_at_start() {
    let mut game = Game::new();
    assert_eq!(status(&mut game).legal_moves.len(), 20);
}

#[test]
fn twenty_one_moves_after_b4_e6() {
    let mut game = Game::replay(&pairs("b2b4 e7e6")).unwrap();
    assert_eq!(status(&mut game).legal_moves.len(), 21);
}

#[test]
fn pawn_takes_pawn() {
    let mut game = Game::replay(&pairs("e2e4 d7d5")).unwrap();
    let mut applied = game.apply("e4", "d5").unwrap();

    let captured = applied.record().captured.unwrap();
    assert_eq!(game.board().piece(captured).kind, PieceKind::Pawn);
    assert_eq!(game.board().piece(captured).side, Side::Black);

    let capturer = game.board().piece_at(sq("d5")).unwrap();
    assert_eq!(capturer.kind, PieceKind::Pawn);
    assert_eq!(capturer.side, Side::White);
    assert!(game.board().is_empty(sq("e4")));

    game.undo(&mut applied).unwrap();
    assert_eq!(game.board().occupant(sq("d5")), Some(captured));
    assert_eq!(game.board().piece_at(sq("e4")).unwrap().side, Side::White);
}

#[test]
fn ordinary_move_undo_round_trip() {
    let mut game = Game::replay(&pairs("g1f3 g8f6")).unwrap();
    let before = game.board().clone();

    let mut applied = game.apply("f3", "e5").unwrap();
    game.undo(&mut applied).unwrap();

    assert_eq!(game.board(), &before);
    assert_eq!(game.move_history().len(), 2);
    assert_eq!(game.undo(&mut applied), Err(BoardError::AlreadyUndone));
}

#[test]
fn en_passant_undo_round_trip() {
    let mut game = Game::replay(&pairs("e2e4 a7a6 e4e5 d7d5")).unwrap();
    let before = game.board().clone();

    let mut applied = game.apply("e5", "d6").unwrap();
    assert!(applied.record().en_passant);
    assert!(game.board().is_empty(sq("d5")));
    assert_eq!(game.capture_history().len(), 1);

    game.undo(&mut applied).unwrap();
    assert_eq!(game.board(), &before);
    assert!(game.capture_history().is_empty());
}

#[test]
fn castle_undo_round_trip() {
    let mut game = Game::replay(&pairs("e2e4 e7e5 g1f3 b8c6 f1c4 g8f6")).unwrap();
    assert!(status(&mut game).legal_moves.contains(Square::E1, Square::G1));
    let before = game.board().clone();

    let mut applied = game.apply("e1", "g1").unwrap();
    assert!(applied.record().castle);
    assert_eq!(game.board().piece_at(Square::F1).unwrap().kind, PieceKind::Rook);
    assert!(game.board().is_empty(Square::H1));

    game.undo(&mut applied).unwrap();
    assert_eq!(game.board(), &before);
    assert!(status(&mut game).legal_moves.contains(Square::E1, Square::G1));
}

#[test]
fn queenside_castle_for_black() {
    let mut game =
        Game::replay(&pairs("d2d4 d7d5 c1f4 c8f5 b1c3 b8c6 d1d2 d8d7 e2e3")).unwrap();
    let moves = status(&mut game).legal_moves;
    assert!(moves.contains(Square::E8, Square::C8));

    let applied = game.apply("e8", "c8").unwrap();
    assert!(applied.record().castle);
    assert_eq!(game.board().piece_at(Square::D8).unwrap().kind, PieceKind::Rook);
}

#[test]
fn bishop_gives_check() {
    let mut game = Game::replay(&pairs("d2d4 e7e5 d4e5 f8b4")).unwrap();
    let status = status(&mut game);
    assert!(status.is_check);
    assert!(!status.is_checkmate);
}

#[test]
fn fools_mate() {
    let mut game = Game::replay(&pairs("e2e4 f7f6 d2d4 g7g5 d1h5")).unwrap();
    let status = status(&mut game);
    assert!(status.is_checkmate);
    assert!(status.legal_moves.is_empty());

    let signals: Vec<_> = game
        .drain_events()
        .into_iter()
        .filter(|e| !matches!(e, GameEvent::Board(_)))
        .collect();
    assert_eq!(
        signals,
        vec![GameEvent::Checkmate {
            king: Square::E8,
            attackers: vec![sq("h5")],
        }]
    );
}

#[test]
fn king_and_queen_stalemate() {
    let mut board = Board::empty();
    board.place(Square::A8, PieceKind::King, Side::Black);
    board.place(sq("b6"), PieceKind::King, Side::White);
    board.place(sq("c7"), PieceKind::Queen, Side::White);
    let mut game = Game::from_board(board, Side::Black);

    let status = status(&mut game);
    assert!(status.is_stalemate);
    assert!(!status.is_check);
    assert!(!status.is_checkmate);
}

#[test]
fn fischer_petrosian_repetition() {
    // Buenos Aires 1971, game 3
    let moves = pairs(
        "e2e4 e7e6 d2d4 d7d5 b1c3 g8f6 c1g5 d5e4 c3e4 f8e7 g5f6 g7f6 g2g3 f6f5 \
         e4c3 e7f6 g1e2 b8c6 d4d5 e6d5 c3d5 f6b2 f1g2 e8g8 e1g1 b2h8 e2f4 c6e5 \
         d1h5 e5g6 a1d1 c7c6 d5e3 d8f6 g1h1 h8g7 g2h3 g6e7 d1d3 c8e6 f1d1 g7h6 \
         d3d4 h6f4 d4f4 a8d8 d1d8 f8d8 h3f5 e7f5 e3f5 d8d5 g3g4 e6f5 g4f5 h7h6 \
         h2h3 g8h7 h5e2 f6e5 e2h5 e5f6 h5e2 d5e5 e2d3 e5d5 d3e2",
    );
    let mut game = Game::new();
    let mut expected_side = Side::White;
    for (from, to) in moves {
        assert_eq!(game.current_side(), expected_side);
        let status = status(&mut game);
        assert!(
            status.legal_moves.contains(sq(from), sq(to)),
            "{from}{to} should be legal"
        );
        assert!(!status.is_repetition, "repetition before {from}{to}");
        let _ = game.apply(from, to).unwrap();
        expected_side = expected_side.opposite();
    }

    let status = status(&mut game);
    assert!(status.is_repetition);
    assert!(!status.legal_moves.is_empty());
}

#[test]
fn simulation_changes_nothing() {
    let mut game = Game::replay(&pairs("e2e4 d7d5")).unwrap();
    let _ = game.drain_events();
    let board = game.board().clone();
    let history = game.move_history().to_vec();
    let captures = game.capture_history().to_vec();

    {
        let trial = game.simulate("e4", "d5").unwrap();
        assert!(trial.record().captured.is_some());
        assert!(trial.is_empty(sq("e4")));
    }

    assert_eq!(game.board(), &board);
    assert_eq!(game.move_history(), history.as_slice());
    assert_eq!(game.capture_history(), captures.as_slice());
    assert!(game.drain_events().is_empty());
}

#[test]
fn client_plays_to_promotion() {
    let mut board = Board::empty();
    board.place(Square::E1, PieceKind::King, Side::White);
    board.place(Square::A8, PieceKind::King, Side::Black);
    board.place(sq("g7"), PieceKind::Pawn, Side::White);
    let mut client = GameClient::from_game(Game::from_board(board, Side::White)).unwrap();

    let _ = client.play("g7", "g8", Some(PieceKind::Queen)).unwrap();
    assert_eq!(
        client.game().board().piece_at(Square::G8).unwrap().kind,
        PieceKind::Queen
    );
    assert_eq!(client.status().side, Side::Black);
    // The new queen covers the whole back rank
    assert!(!client.status().legal_moves.contains(Square::A8, Square::B8));

    let events = client.drain_events();
    assert!(matches!(
        events.last(),
        Some(GameEvent::Board(BoardEvent::Promoted { .. })) | Some(GameEvent::Check { .. })
    ));
}

#[test]
fn status_serializes_to_json() {
    let mut game = Game::new();
    let json = serde_json::to_value(status(&mut game)).unwrap();

    assert_eq!(json["side"], "white");
    assert_eq!(json["is_check"], false);
    assert_eq!(json["is_repetition"], false);

    let moves = json["legal_moves"].as_array().unwrap();
    assert_eq!(moves.len(), 10);
    assert_eq!(moves[0]["from"], "b1");
    assert_eq!(moves[1]["from"], "g1");
    assert_eq!(moves[2]["from"], "a2");
    assert_eq!(moves[2]["to"], serde_json::json!(["a3", "a4"]));
}

#[test]
fn config_file_drives_first_side() {
    let config = GameConfig::from_toml_str("first_side = \"black\"").unwrap();
    let mut game = Game::with_config(config).unwrap();
    assert_eq!(game.current_side(), Side::Black);

    let status = status(&mut game);
    assert_eq!(status.side, Side::Black);
    assert!(status.legal_moves.contains(sq("e7"), sq("e5")));
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn moves_are_logged() {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut client = GameClient::new().unwrap();
        for (from, to) in pairs("f2f3 e7e5 g2g4 d8h4") {
            let _ = client.play(from, to, None).unwrap();
        }
        assert!(client.status().is_checkmate);
    });

    let logs = buffer.contents();
    assert_eq!(logs.matches("applied move").count(), 4);
    assert!(logs.contains("from=d8 to=h4"));
    assert!(logs.contains("checkmate"));
    // Simulations during validation log at trace level only
    assert!(!logs.contains("simulated move"));
}
