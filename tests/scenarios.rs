//! End-to-end scenarios through the public API.

use std::time::Duration;

use gomoku::eval::Evaluator;
use gomoku::rules::WinKind;
use gomoku::search::{MoveBucket, MoveOrderer, NullObserver, OrderHints};
use gomoku::{AiEngine, Board, EngineConfig, GameStatus, IllegalMove, Pos, Position, Stone};

fn engine(size: usize, depth: u8) -> AiEngine {
    let mut config = EngineConfig::default();
    config.game.board_size = size;
    config.search.max_depth = depth;
    config.search.tt_size_mb = 2;
    AiEngine::new(config).expect("valid config")
}

fn board_with(size: usize, black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
    let mut board = Board::with_size(size);
    for &(r, c) in black {
        board.place_stone(Pos::new(r, c), Stone::Black);
    }
    for &(r, c) in white {
        board.place_stone(Pos::new(r, c), Stone::White);
    }
    board
}

fn snapshot(p: &Position) -> (Board, u64, GameStatus) {
    (*p.board(), p.hash(), p.status())
}

#[test]
fn capture_win_beats_breakable_five() {
    // Black can complete a five at (5,8), but white could break it by
    // capturing (5,6)-(6,6). Black can also take a fifth pair at (12,8).
    let mut board = board_with(
        19,
        &[(5, 4), (5, 5), (5, 6), (5, 7), (6, 6), (12, 5)],
        &[(7, 6), (12, 6), (12, 7)],
    );
    board.black_captures = 4;
    let mut position = Position::from_board(board, 5);
    let engine = engine(19, 3);

    let decision = engine.get_best_move(&mut position, Stone::Black, Duration::from_secs(20));
    assert_eq!(decision.best_move, Some(Pos::new(12, 8)));
    assert!(decision.score >= engine.evaluator().win_score() - 2);

    position.play(Pos::new(12, 8), Stone::Black).expect("legal");
    assert_eq!(
        position.status(),
        GameStatus::Won {
            winner: Stone::Black,
            by: WinKind::Captures
        }
    );
}

#[test]
fn pending_five_lifecycle() {
    let board = board_with(19, &[(9, 5), (9, 6), (9, 7), (9, 8), (10, 6)], &[(8, 6), (0, 0)]);

    // Broken by the reply
    let mut position = Position::from_board(board, 5);
    position.play(Pos::new(9, 9), Stone::Black).expect("legal");
    assert!(matches!(position.status(), GameStatus::PendingWin(pw) if pw.player == Stone::Black));
    position.play(Pos::new(11, 6), Stone::White).expect("legal");
    assert_eq!(position.status(), GameStatus::Ongoing);
    assert_eq!(position.captures(Stone::White), 1);

    // Confirmed when the reply does not break it
    let mut position = Position::from_board(board, 5);
    position.play(Pos::new(9, 9), Stone::Black).expect("legal");
    position.play(Pos::new(0, 1), Stone::White).expect("legal");
    assert_eq!(
        position.status(),
        GameStatus::Won {
            winner: Stone::Black,
            by: WinKind::Line
        }
    );
    assert_eq!(position.play(Pos::new(1, 1), Stone::White), Err(IllegalMove::GameOver));
}

#[test]
fn engine_breaks_pending_five() {
    let board = board_with(19, &[(9, 5), (9, 6), (9, 7), (9, 8), (10, 6)], &[(8, 6), (3, 3)]);
    let mut position = Position::from_board(board, 5);
    position.play(Pos::new(9, 9), Stone::Black).expect("legal");

    let engine = engine(19, 2);
    let decision = engine.get_best_move(&mut position, Stone::White, Duration::from_secs(20));
    assert_eq!(decision.best_move, Some(Pos::new(11, 6)));
}

#[test]
fn open_four_blocked_at_either_end() {
    let config = EngineConfig::default();
    let evaluator = Evaluator::new(&config.heuristic);
    let board = board_with(15, &[(7, 5), (7, 6), (7, 7), (7, 8)], &[(8, 5), (6, 8), (9, 9)]);
    let mut position = Position::from_board(board, 5);

    let hints = OrderHints {
        cap: 10,
        ..OrderHints::default()
    };
    let moves = MoveOrderer::new(&evaluator, &config.search).order_moves(&mut position, Stone::White, &hints);
    let mut top: Vec<Pos> = moves.iter().take(2).map(|m| m.pos).collect();
    top.sort();
    assert_eq!(top, vec![Pos::new(7, 4), Pos::new(7, 9)]);
    assert!(moves[..2].iter().all(|m| m.bucket == MoveBucket::Blocking));
}

#[test]
fn exposing_a_pair_scores_below_neutral_move() {
    // Black already has 4 pairs. White extends a lone stone into a pair:
    // next to a black stone the pair can be captured, against the edge it
    // cannot. Both make the same closed two.
    let mut board = board_with(19, &[(7, 9)], &[(7, 7), (0, 5)]);
    board.black_captures = 4;
    let mut position = Position::from_board(board, 5);
    let config = EngineConfig::default();
    let evaluator = Evaluator::new(&config.heuristic);

    let exposed = Pos::new(7, 8);
    let neutral = Pos::new(1, 5);
    let exposed_delta = evaluator.delta_score_at(&mut position, exposed, Stone::White, Stone::White);
    let neutral_delta = evaluator.delta_score_at(&mut position, neutral, Stone::White, Stone::White);
    assert!(
        exposed_delta.total() < neutral_delta.total(),
        "exposed {} vs neutral {}",
        exposed_delta.total(),
        neutral_delta.total()
    );

    let orderer = MoveOrderer::new(&evaluator, &config.search);
    let a = orderer.classify(&mut position, exposed, Stone::White).expect("legal");
    let b = orderer.classify(&mut position, neutral, Stone::White).expect("legal");
    assert!(a.strength < b.strength);
}

#[test]
fn double_three_rejected_even_when_capturing() {
    let engine = engine(19, 2);
    let board = board_with(19, &[(0, 18)], &[(9, 8), (9, 10), (8, 9), (10, 9)]);
    let position = Position::from_board(board, 5);
    assert_eq!(
        engine.is_legal_move(&position, Pos::new(9, 9), Stone::White),
        Err(IllegalMove::DoubleThree(Pos::new(9, 9)))
    );

    // Capturing the black pair at (10,10)-(11,11) leaves both threes standing
    let board = board_with(
        19,
        &[(10, 10), (11, 11)],
        &[(9, 8), (9, 10), (8, 9), (10, 9), (12, 12)],
    );
    let position = Position::from_board(board, 5);
    assert_eq!(
        engine.is_legal_move(&position, Pos::new(9, 9), Stone::White),
        Err(IllegalMove::DoubleThree(Pos::new(9, 9)))
    );
}

#[test]
fn search_leaves_position_untouched_under_tiny_budget() {
    let engine = engine(19, 10);
    let mut position = engine.new_game();
    for (i, &(r, c)) in [(9, 9), (9, 10), (10, 10), (8, 8), (10, 9), (10, 8)]
        .iter()
        .enumerate()
    {
        let player = if i % 2 == 0 { Stone::Black } else { Stone::White };
        position.play(Pos::new(r, c), player).expect("legal");
    }
    let before = snapshot(&position);

    let decision = engine.get_best_move_with(
        &mut position,
        Stone::Black,
        Duration::from_millis(1),
        &mut NullObserver,
    );
    let reply = decision.best_move.expect("depth 1 always completes");
    assert!(decision.depth >= 1);
    assert_eq!(snapshot(&position), before);
    assert!(engine.is_legal_move(&position, reply, Stone::Black).is_ok());
}

#[test]
fn config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("gomoku-config-{}.json", std::process::id()));
    let mut config = EngineConfig::default();
    config.game.board_size = 13;
    config.search.killer_moves = false;
    std::fs::write(&path, config.to_json_pretty().expect("serialize")).expect("write");

    let loaded = EngineConfig::load(&path).expect("load");
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
    assert_eq!(AiEngine::new(loaded).expect("valid").new_game().board().size(), 13);
}
