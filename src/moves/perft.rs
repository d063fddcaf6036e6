//! Perft: exhaustive legal-move counting for move-generator validation.

use crate::board::Board;
use crate::moves::movegen::{GenMode, next_move};
use crate::moves::types::Move;
use crate::search::context::History;

/// Leaf-node count of the legal move tree to `depth`.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let history = History::new();
    perft_inner(board, depth, &history)
}

fn perft_inner(board: &mut Board, depth: u32, history: &History) -> u64 {
    let mut nodes = 0;
    board.pos_mut().reset_gen(Move::NULL);
    while let Some(mut mv) = next_move(board, GenMode::AllMoves, !0u64, [Move::NULL; 2], history)
    {
        if !board.is_move_legal(&mut mv) {
            continue;
        }
        if depth == 1 {
            nodes += 1;
        } else {
            board.play(mv);
            nodes += perft_inner(board, depth - 1, history);
            board.undo();
        }
    }
    nodes
}

/// Per-root-move breakdown, for diffing against another engine.
pub fn divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    assert!(depth > 0);
    let history = History::new();
    let mut results = Vec::new();
    board.pos_mut().reset_gen(Move::NULL);
    let mut roots = Vec::new();
    while let Some(mut mv) = next_move(board, GenMode::AllMoves, !0u64, [Move::NULL; 2], &history)
    {
        if board.is_move_legal(&mut mv) {
            roots.push(mv);
        }
    }
    for mv in roots {
        board.play(mv);
        let nodes = if depth == 1 {
            1
        } else {
            perft_inner(board, depth - 1, &history)
        };
        board.undo();
        results.push((mv, nodes));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_shallow_counts() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::new();
        let split = divide(&mut board, 3);
        let total: u64 = split.iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&mut board, 3));
        assert_eq!(split.len(), 20);
    }
}
