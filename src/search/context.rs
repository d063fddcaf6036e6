//! Quiet-move ordering memory: killer slots and the history table.

use crate::board::{MAX_PLY, Piece};
use crate::moves::types::{HISTORY_MAX, Move};
use crate::square::Square;

/// Butterfly-style history indexed by (moving piece, destination square).
pub struct History {
    table: [[i32; 64]; Piece::COUNT],
}

impl History {
    pub fn new() -> History {
        History {
            table: [[0; 64]; Piece::COUNT],
        }
    }

    #[inline(always)]
    pub fn value(&self, piece: Piece, to: Square) -> i32 {
        self.table[piece.index()][to.idx()]
    }

    #[inline(always)]
    fn bump(&mut self, piece: Piece, to: Square, delta: i32) {
        let cell = &mut self.table[piece.index()][to.idx()];
        *cell = (*cell + delta).clamp(-HISTORY_MAX, HISTORY_MAX);
    }

    pub fn reset(&mut self) {
        self.table = [[0; 64]; Piece::COUNT];
    }

    /// Halves every entry; called between searches so stale preferences fade.
    pub fn age(&mut self) {
        for row in self.table.iter_mut() {
            for cell in row.iter_mut() {
                *cell /= 2;
            }
        }
    }
}

impl Default for History {
    fn default() -> History {
        History::new()
    }
}

pub struct SearchContext {
    killers: [[Move; 2]; MAX_PLY],
    pub history: History,
}

impl SearchContext {
    pub fn new() -> SearchContext {
        SearchContext {
            killers: [[Move::NULL; 2]; MAX_PLY],
            history: History::new(),
        }
    }

    pub fn reset(&mut self) {
        self.killers = [[Move::NULL; 2]; MAX_PLY];
        self.history.reset();
    }

    pub fn new_search(&mut self) {
        self.killers = [[Move::NULL; 2]; MAX_PLY];
        self.history.age();
    }

    #[inline(always)]
    pub fn killers_at(&self, ply: usize) -> [Move; 2] {
        self.killers[ply]
    }

    /// Primary slot takes the new killer, the old primary becomes secondary.
    pub fn update_killer(&mut self, ply: usize, mv: Move) {
        if self.killers[ply][0] != mv {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = mv;
        }
    }

    /// Rewards a quiet cutoff move and punishes the quiet moves tried before
    /// it, both by depth squared.
    pub fn update_history(
        &mut self,
        cutoff: (Piece, Move),
        earlier_quiets: &[(Piece, Move)],
        to_horizon: i32,
    ) {
        let bonus = to_horizon * to_horizon;
        self.history.bump(cutoff.0, cutoff.1.to(), bonus);
        for &(piece, mv) in earlier_quiets {
            if mv != cutoff.1 {
                self.history.bump(piece, mv.to(), -bonus);
            }
        }
    }
}

impl Default for SearchContext {
    fn default() -> SearchContext {
        SearchContext::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: &str, to: &str) -> Move {
        Move::new(from.parse().unwrap(), to.parse().unwrap())
    }

    #[test]
    fn killer_slots_shift() {
        let mut ctx = SearchContext::new();
        let a = mv("g1", "f3");
        let b = mv("b1", "c3");
        ctx.update_killer(3, a);
        assert_eq!(ctx.killers_at(3)[0], a);
        ctx.update_killer(3, b);
        assert_eq!(ctx.killers_at(3), [b, a]);
        // Re-storing the primary does not duplicate it.
        ctx.update_killer(3, b);
        assert_eq!(ctx.killers_at(3), [b, a]);
    }

    #[test]
    fn history_rewards_and_punishes() {
        let mut ctx = SearchContext::new();
        let good = (Piece::WhiteKnight, mv("g1", "f3"));
        let bad = (Piece::WhitePawn, mv("a2", "a3"));
        ctx.update_history(good, &[bad], 4);
        assert_eq!(ctx.history.value(Piece::WhiteKnight, good.1.to()), 16);
        assert_eq!(ctx.history.value(Piece::WhitePawn, bad.1.to()), -16);
    }

    #[test]
    fn history_clamps() {
        let mut ctx = SearchContext::new();
        let cut = (Piece::WhiteKnight, mv("g1", "f3"));
        for _ in 0..10_000 {
            ctx.update_history(cut, &[], 20);
        }
        assert_eq!(ctx.history.value(Piece::WhiteKnight, cut.1.to()), HISTORY_MAX);
    }

    #[test]
    fn aging_halves_values() {
        let mut ctx = SearchContext::new();
        let cut = (Piece::WhiteKnight, mv("g1", "f3"));
        ctx.update_history(cut, &[], 10);
        ctx.new_search();
        assert_eq!(ctx.history.value(Piece::WhiteKnight, cut.1.to()), 50);
        assert!(ctx.killers_at(0)[0].is_null());
    }
}
