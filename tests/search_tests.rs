use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempo::board::Board;
use tempo::search::time::SearchLimits;
use tempo::search::{MATE_SCORE, MATE_THRESHOLD, SearchResult, Searcher};

fn search_depth(fen: &str, depth: i32) -> SearchResult {
    let mut board = Board::from_fen(fen).unwrap();
    let mut searcher = Searcher::new(16);
    searcher.silent = true;
    let limits = SearchLimits {
        depth: Some(depth),
        ..Default::default()
    };
    searcher.find_best_move(&mut board, &limits, Arc::new(AtomicBool::new(false)))
}

#[test]
fn finds_mate_in_two() {
    // 1.Kb6 Kb8 2.Rh8#.
    let result = search_depth("k7/8/2K5/8/8/8/8/7R w - - 0 1", 5);
    assert_eq!(result.score, MATE_SCORE - 3, "expected mate in two");
    assert!(result.pv.len() >= 3);
}

#[test]
fn grabs_the_hanging_queen() {
    let result = search_depth("3q3k/8/8/8/8/8/8/3R3K w - - 0 1", 4);
    assert_eq!(result.best_move.to_uci(), "d1d8");
    assert!(result.score > 400, "winning the queen scored {}", result.score);
}

#[test]
fn avoids_losing_the_queen_for_nothing() {
    // The black rook attacks the white queen; any safe retreat keeps the
    // material balance near equality.
    let result = search_depth("r6k/8/8/8/8/8/8/Q6K w - - 0 1", 5);
    assert!(result.score > -200, "white should not be losing: {}", result.score);
}

#[test]
fn node_limit_cuts_the_search_short() {
    let mut board = Board::new();
    let mut searcher = Searcher::new(8);
    searcher.silent = true;
    let limits = SearchLimits {
        nodes: Some(5_000),
        ..Default::default()
    };
    let result = searcher.find_best_move(&mut board, &limits, Arc::new(AtomicBool::new(false)));
    assert!(!result.best_move.is_null());
    // The probe fires every 2048 nodes, so overshoot stays bounded.
    assert!(result.nodes < 20_000, "searched {} nodes", result.nodes);
}

#[test]
fn stop_flag_aborts_but_returns_a_move() {
    let mut board = Board::new();
    let mut searcher = Searcher::new(8);
    searcher.silent = true;
    let stop = Arc::new(AtomicBool::new(true));
    let limits = SearchLimits {
        depth: Some(12),
        ..Default::default()
    };
    let result = searcher.find_best_move(&mut board, &limits, stop);
    assert!(!result.best_move.is_null());
}

#[test]
fn deeper_search_never_worsens_a_forced_mate() {
    let shallow = search_depth("4k3/8/4K3/4Q3/8/8/8/8 w - - 0 1", 2);
    let deep = search_depth("4k3/8/4K3/4Q3/8/8/8/8 w - - 0 1", 6);
    assert!(shallow.score >= MATE_THRESHOLD);
    assert!(deep.score >= shallow.score);
}

#[test]
fn searchmoves_restricts_the_root() {
    let mut board = Board::new();
    let mut searcher = Searcher::new(8);
    searcher.silent = true;
    let limits = SearchLimits {
        depth: Some(4),
        searchmoves: vec!["a2a3".to_string()],
        ..Default::default()
    };
    let result = searcher.find_best_move(&mut board, &limits, Arc::new(AtomicBool::new(false)));
    assert_eq!(result.best_move.to_uci(), "a2a3");
}

#[test]
fn repeated_search_from_warm_tt_is_consistent() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
    let mut board = Board::from_fen(fen).unwrap();
    let mut searcher = Searcher::new(16);
    searcher.silent = true;
    let limits = SearchLimits {
        depth: Some(6),
        ..Default::default()
    };
    let cold = searcher.find_best_move(&mut board, &limits, Arc::new(AtomicBool::new(false)));
    let warm = searcher.find_best_move(&mut board, &limits, Arc::new(AtomicBool::new(false)));
    assert_eq!(cold.best_move, warm.best_move);
    assert!(warm.nodes <= cold.nodes, "warm TT should not search more");
}

#[test]
fn reports_progress_depth() {
    let result = search_depth(Board::STARTPOS, 5);
    assert_eq!(result.depth, 5);
    assert!(result.seldepth >= 5);
    assert!(result.nodes > 0);
    assert!(!result.pv.is_empty());
}
