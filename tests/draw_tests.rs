use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempo::board::Board;
use tempo::search::time::SearchLimits;
use tempo::search::{DRAW_SCORE, Searcher};
use tempo::uci::apply_position;

fn search(board: &mut Board, depth: i32) -> i32 {
    let mut searcher = Searcher::new(8);
    searcher.silent = true;
    let limits = SearchLimits {
        depth: Some(depth),
        ..Default::default()
    };
    searcher
        .find_best_move(board, &limits, Arc::new(AtomicBool::new(false)))
        .score
}

#[test]
fn insufficient_material_scores_zero() {
    let mut board = Board::from_fen("8/8/8/8/3k4/8/3K4/8 w - - 0 1").unwrap();
    assert_eq!(search(&mut board, 1), DRAW_SCORE);
    let mut board = Board::from_fen("8/8/8/8/3k4/8/3KB3/8 b - - 0 1").unwrap();
    assert_eq!(search(&mut board, 4), DRAW_SCORE);
}

#[test]
fn fifty_move_rule_shows_up_in_search() {
    // Rook up, but one reversible ply from the fifty-move draw: every line
    // the search visits is adjudicated 0.
    let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80 ").unwrap();
    let score = search(&mut board, 3);
    assert_eq!(score, DRAW_SCORE);
}

#[test]
fn repetition_is_a_draw_in_search() {
    // Build a game heading for a third occurrence of the start position.
    let mut board = Board::new();
    apply_position(
        &mut board,
        None,
        &[
            "g1f3".into(),
            "g8f6".into(),
            "f3g1".into(),
            "f6g8".into(),
            "g1f3".into(),
            "g8f6".into(),
            "f3g1".into(),
        ],
    )
    .unwrap();
    // Black retreating the knight repeats the start position a third time;
    // the search must see that line as dead equal.
    assert_eq!(board.repetitions(), 2);
    let mut searcher = Searcher::new(8);
    searcher.silent = true;
    let limits = SearchLimits {
        depth: Some(4),
        searchmoves: vec!["f6g8".to_string()],
        ..Default::default()
    };
    let result = searcher.find_best_move(&mut board, &limits, Arc::new(AtomicBool::new(false)));
    assert_eq!(result.score, DRAW_SCORE);
}

#[test]
fn drawish_pawnless_endings_stay_near_zero() {
    // Rook versus rook and minor: damped toward the draw.
    let mut board = Board::from_fen("1n2k2r/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    let score = search(&mut board, 4);
    assert!(score.abs() < 150, "drawish ending scored {score}");
}
