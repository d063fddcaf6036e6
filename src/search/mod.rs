//! The search core: iterative deepening with aspiration windows over a
//! principal-variation negamax, with transposition table, staged move
//! ordering, null-move/reverse-futility/futility/late-move pruning, late
//! move reductions, singular extensions, and a capture-only quiescence.
//!
//! Time and node exhaustion travel as the `INTERRUPTED` sentinel score, not
//! as an error: callers detect it by magnitude and refuse to commit scores
//! from the aborted iteration. The best move of the last completed iteration
//! is always the one returned.

pub mod context;
pub mod exchange;
pub mod time;
pub mod tt;

use crate::board::{Board, EVAL_UNKNOWN, MAX_MOVES, MAX_PLY, Piece};
use crate::eval::{Eval, exchange_value};
use crate::moves::movegen::{GenMode, GenStage, complete_move, legal_moves, next_move};
use crate::moves::types::Move;
use arrayvec::ArrayVec;
use context::SearchContext;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};
use time::{SearchLimits, TimeManager};
use tt::{Bound, TranspositionTable, score_from_tt, score_to_tt};

/// Largest representable score; the search window is `(-MAX_SCORE, MAX_SCORE)`.
pub const MAX_SCORE: i32 = 32000;
/// Mate at the root; mate at ply N scores `MATE_SCORE - N`.
pub const MATE_SCORE: i32 = 31000;
/// Scores beyond this are mate scores and carry distance information.
pub const MATE_THRESHOLD: i32 = 30000;
/// Sentinel for an aborted search, outside every legitimate score.
pub const INTERRUPTED: i32 = 32500;
pub const DRAW_SCORE: i32 = 0;
pub const MAX_DEPTH: i32 = 64;

const ASPIRATION_WINDOW: i32 = 100;
const NODE_PROBE_MASK: u64 = 2047;

/// Reverse-futility margins by remaining horizon, roughly `50 * h^2`.
const STATIC_MARGINS: [i32; 4] = [0, 50, 200, 450];
/// Futility margins by remaining horizon.
const FUTILITY_MARGINS: [i32; 5] = [0, 100, 200, 450, 800];
/// Quiet moves searched before late-move pruning kicks in, by horizon.
const LMP_THRESHOLDS: [usize; 6] = [0, 4, 7, 11, 17, 25];
/// Late-move reduction by quiet-move index, capped at 5.
const LMR_TABLE: [i32; 32] = [
    0, 0, 0, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5,
    5,
];
/// Quiescence delta-pruning margin.
const QSEARCH_FUTILITY: i32 = 150;
/// Quiescence plies after which only recaptures are examined.
const RECAPTURE_ONLY_AFTER: i32 = 2;
const CURRMOVE_REPORT_AFTER: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
struct RootMove {
    mv: Move,
    score: i32,
    pv: Vec<Move>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: i32,
    pub seldepth: usize,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

pub struct Searcher {
    pub tt: TranspositionTable,
    pub ctx: SearchContext,
    pub eval: Eval,
    pub multipv: usize,
    /// When false (analysis), exact TT hits in PV nodes re-search instead of
    /// returning, so reported variations stay full length.
    pub truncate_pv: bool,
    /// Suppresses info output; used by tests.
    pub silent: bool,
    nodes: u64,
    seldepth: usize,
    time: TimeManager,
    pv: Box<[[Move; MAX_PLY]]>,
    pv_len: [usize; MAX_PLY],
    root_moves: Vec<RootMove>,
}

impl Searcher {
    pub fn new(hash_mb: usize) -> Searcher {
        Searcher {
            tt: TranspositionTable::new(hash_mb),
            ctx: SearchContext::new(),
            eval: Eval::new(),
            multipv: 1,
            truncate_pv: true,
            silent: false,
            nodes: 0,
            seldepth: 0,
            time: TimeManager::unbounded(Arc::new(AtomicBool::new(false))),
            pv: vec![[Move::NULL; MAX_PLY]; MAX_PLY].into_boxed_slice(),
            pv_len: [0; MAX_PLY],
            root_moves: Vec::new(),
        }
    }

    /// Resets everything a `ucinewgame` should reset.
    pub fn new_game(&mut self) {
        self.tt.reset();
        self.ctx.reset();
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Runs the iterative-deepening loop and returns the best move found by
    /// the last completed iteration.
    pub fn find_best_move(
        &mut self,
        board: &mut Board,
        limits: &SearchLimits,
        stop: Arc<AtomicBool>,
    ) -> SearchResult {
        self.tt.next_search();
        self.ctx.new_search();
        self.nodes = 0;
        self.seldepth = 0;
        self.time = TimeManager::new(limits, board.pos().side_to_move, stop);
        board.rebase();

        let mut all = legal_moves(board);
        if !limits.searchmoves.is_empty() {
            all.retain(|m| limits.searchmoves.iter().any(|s| *s == m.to_uci()));
        }
        self.root_moves = all
            .into_iter()
            .map(|mv| RootMove {
                mv,
                score: 0,
                pv: vec![mv],
            })
            .collect();

        if self.root_moves.is_empty() {
            let score = if board.pos().in_check { -MATE_SCORE } else { DRAW_SCORE };
            return SearchResult {
                best_move: Move::NULL,
                score,
                depth: 0,
                seldepth: 0,
                nodes: self.nodes,
                pv: Vec::new(),
            };
        }

        let max_depth = limits.depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH);
        let mut completed_depth = 0;
        let mut last_score: i32 = 0;
        let mut last_iteration = Duration::ZERO;

        'deepening: for depth in 1..=max_depth {
            if depth > 1 && !self.time.may_start_iteration(last_iteration) {
                break;
            }
            let iteration_start = Instant::now();
            let lines = self.multipv.min(self.root_moves.len());

            for pv_index in 0..lines {
                // Aspiration windows need a stable reference score; multi-PV
                // and early iterations search the full window.
                let mut alpha = -MAX_SCORE;
                let mut beta = MAX_SCORE;
                if self.multipv == 1 && depth > 4 && last_score.abs() < MATE_THRESHOLD {
                    alpha = last_score - ASPIRATION_WINDOW;
                    beta = last_score + ASPIRATION_WINDOW;
                }

                let score = loop {
                    let s = self.search_root(board, depth, pv_index, alpha, beta);
                    if s.abs() >= INTERRUPTED {
                        break 'deepening;
                    }
                    if s <= alpha {
                        alpha = -MAX_SCORE;
                        continue;
                    }
                    if s >= beta {
                        beta = MAX_SCORE;
                        continue;
                    }
                    break s;
                };

                if pv_index == 0 {
                    last_score = score;
                }
                self.report_line(depth, pv_index);
            }

            completed_depth = depth;
            last_iteration = iteration_start.elapsed();

            if self.time.soft_expired() {
                break;
            }
            if self.multipv == 1 && last_score.abs() >= MATE_THRESHOLD {
                let moves_to_mate = (MATE_SCORE - last_score.abs() + 1) / 2;
                match limits.mate {
                    Some(target) if moves_to_mate > target => {}
                    _ => break,
                }
            }
        }

        let best = &self.root_moves[0];
        tracing::debug!(
            best = %best.mv,
            score = best.score,
            depth = completed_depth,
            nodes = self.nodes,
            "search finished"
        );
        SearchResult {
            best_move: best.mv,
            score: best.score,
            depth: completed_depth,
            seldepth: self.seldepth,
            nodes: self.nodes,
            pv: best.pv.clone(),
        }
    }

    /// One aspiration attempt over the root move list, starting at
    /// `start_index` (multi-PV lines before it are already fixed for this
    /// depth).
    fn search_root(
        &mut self,
        board: &mut Board,
        horizon: i32,
        start_index: usize,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.pv_len[0] = 0;
        for i in start_index..self.root_moves.len() {
            let mv = self.root_moves[i].mv;
            if !self.silent && self.time.elapsed() >= CURRMOVE_REPORT_AFTER {
                println!(
                    "info hashfull {} currmove {} currmovenumber {}",
                    self.tt.hashfull(),
                    mv.to_uci(),
                    i + 1
                );
            }

            board.play(mv);
            self.pv_len[1] = 0;
            let score = if i == start_index {
                -self.negamax(board, 1, horizon, true, -beta, -alpha, Move::NULL)
            } else {
                let mut s = -self.negamax(board, 1, horizon, true, -alpha - 1, -alpha, Move::NULL);
                if s.abs() < INTERRUPTED && s > alpha && s < beta {
                    s = -self.negamax(board, 1, horizon, true, -beta, -alpha, Move::NULL);
                }
                s
            };
            board.undo();
            if score.abs() >= INTERRUPTED {
                return INTERRUPTED;
            }

            if i == start_index || score > alpha {
                self.root_moves[i].score = score;
                let mut pv = vec![mv];
                pv.extend_from_slice(&self.pv[1][..self.pv_len[1]]);
                self.root_moves[i].pv = pv;
            }
            if score > alpha {
                alpha = score;
                if score >= beta {
                    return score;
                }
            }
        }
        self.root_moves[start_index..].sort_by_key(|rm| std::cmp::Reverse(rm.score));
        alpha
    }

    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &mut self,
        board: &mut Board,
        ply: usize,
        horizon: i32,
        allow_null: bool,
        mut alpha: i32,
        beta: i32,
        excluded: Move,
    ) -> i32 {
        self.nodes += 1;
        if self.nodes & NODE_PROBE_MASK == 0 {
            self.time.check(self.nodes);
        }
        if self.time.interrupted {
            return INTERRUPTED;
        }
        self.pv_len[ply] = 0;
        if ply >= MAX_PLY - 4 {
            return self.cached_eval(board).0;
        }

        if board.repetitions() >= 2
            || board.pos().halfmove_clock >= 100
            || crate::eval::endgame::is_insufficient_material(board.pos())
        {
            return DRAW_SCORE;
        }

        let to_horizon = horizon - ply as i32;
        let key = board.pos().key;
        let in_check = board.pos().in_check;
        let is_pv = beta - alpha > 1;
        let us = board.pos().side_to_move;

        // Transposition table. Exclusion searches probe nothing and store
        // nothing; their scores answer a different question.
        let mut tt_move = Move::NULL;
        let mut tt_info: Option<(u8, Bound, i32)> = None;
        if excluded.is_null()
            && let Some(hit) = self.tt.probe(key)
        {
            if hit.has_move()
                && let Some(mut m) = complete_move(board.pos(), hit.from, hit.to, hit.promoted)
            {
                m.set_best();
                tt_move = m;
            }
            tt_info = Some((hit.depth, hit.bound, hit.score));
            if hit.depth as i32 >= to_horizon {
                let score = score_from_tt(hit.score, ply);
                let usable = match hit.bound {
                    Bound::Exact => true,
                    Bound::Lower => score >= beta,
                    Bound::Upper => score <= alpha,
                    Bound::None => false,
                };
                // In analysis mode a PV-node hit would truncate the reported
                // variation; search on instead.
                if usable && (!is_pv || self.truncate_pv) {
                    return score;
                }
            }
        }

        if to_horizon <= 0 {
            return self.quiescence(board, ply, 0, alpha, beta);
        }

        // Static evaluation, cached on the slot. In check there is no
        // meaningful stand-pat; the flag value disables static pruning.
        let (static_eval, drawn) = if in_check {
            (-MAX_SCORE, false)
        } else {
            self.cached_eval(board)
        };
        if drawn {
            return DRAW_SCORE;
        }

        // Reverse futility: hopelessly good positions near the horizon.
        if !in_check
            && excluded.is_null()
            && beta.abs() < MATE_THRESHOLD
            && (to_horizon as usize) < STATIC_MARGINS.len()
            && static_eval - STATIC_MARGINS[to_horizon as usize] > beta
        {
            return beta;
        }

        // Null move: hand over the turn and search reduced with a zero
        // window. Requires a piece on the board to dodge zugzwang.
        if allow_null
            && !in_check
            && excluded.is_null()
            && to_horizon >= 2
            && static_eval >= beta
            && beta.abs() < MATE_THRESHOLD
            && board.pos().has_non_pawn_material(us)
        {
            let r = if static_eval - beta > 600 {
                5
            } else if static_eval - beta > 300 {
                4
            } else {
                3
            };
            board.play_null();
            let score = -self.negamax(board, ply + 1, horizon - r, false, -beta, -beta + 1, Move::NULL);
            board.undo();
            if score.abs() >= INTERRUPTED {
                return INTERRUPTED;
            }
            if score >= beta {
                return beta;
            }
        }

        // Internal iterative deepening: a PV node without a table move finds
        // one with a shallower search of itself.
        if tt_move.is_null() && is_pv && to_horizon >= 6 && excluded.is_null() {
            let score = self.negamax(board, ply, horizon - 1, false, alpha, beta, Move::NULL);
            if score.abs() >= INTERRUPTED {
                return INTERRUPTED;
            }
            if let Some(hit) = self.tt.probe(key)
                && hit.has_move()
                && let Some(mut m) = complete_move(board.pos(), hit.from, hit.to, hit.promoted)
            {
                m.set_best();
                tt_move = m;
            }
        }

        board.pos_mut().reset_gen(tt_move);
        let killers = self.ctx.killers_at(ply);
        let original_alpha = alpha;
        let mut best_score = -MAX_SCORE;
        let mut best_move = Move::NULL;
        let mut legal = 0usize;
        let mut quiet_count = 0usize;
        let mut quiets_tried: ArrayVec<(Piece, Move), 64> = ArrayVec::new();

        loop {
            let Some(mut mv) = next_move(board, GenMode::AllMoves, !0u64, killers, &self.ctx.history)
            else {
                break;
            };
            if !excluded.is_null() && mv == excluded {
                continue;
            }
            if !board.is_move_legal(&mut mv) {
                continue;
            }
            let mover = board.pos().squares[mv.from().idx()];
            legal += 1;
            let is_quiet = mv.is_quiet();

            // Futility: the move cannot lift a hopeless static score back to
            // alpha. Advanced pawn pushes are never futile.
            if legal > 1
                && !in_check
                && !mv.is_check()
                && alpha.abs() < MATE_THRESHOLD
                && (to_horizon as usize) < FUTILITY_MARGINS.len()
                && !advanced_pawn_push(mv, us.is_white())
            {
                let gain = exchange_value(mv.victim())
                    + if mv.promoted().is_some() {
                        exchange_value(mv.promoted()) - 100
                    } else {
                        0
                    };
                if static_eval + gain + FUTILITY_MARGINS[to_horizon as usize] <= alpha {
                    continue;
                }
            }

            // Late-move pruning: enough quiets tried without raising alpha.
            if legal > 1
                && !in_check
                && is_quiet
                && !mv.is_check()
                && alpha == original_alpha
                && alpha.abs() < MATE_THRESHOLD
                && (to_horizon as usize) < LMP_THRESHOLDS.len()
                && quiet_count >= LMP_THRESHOLDS[to_horizon as usize]
            {
                continue;
            }

            // Singular extension: the table move is so much better than the
            // rest that it deserves another ply. Verified by a reduced search
            // of this node with the move excluded.
            let mut extension = 0;
            if excluded.is_null()
                && mv.is_best()
                && to_horizon >= 6
                && let Some((tt_depth, Bound::Lower, tt_raw)) = tt_info
                && tt_depth as i32 >= to_horizon - 3
            {
                let tt_score = score_from_tt(tt_raw, ply);
                if tt_score.abs() < MATE_THRESHOLD {
                    let target = tt_score - 2 * to_horizon;
                    let saved = snapshot_gen(board);
                    let verification = self.negamax(
                        board,
                        ply,
                        ply as i32 + (to_horizon - 1) / 2,
                        false,
                        target - 1,
                        target,
                        mv,
                    );
                    restore_gen(board, saved);
                    if verification.abs() >= INTERRUPTED {
                        return INTERRUPTED;
                    }
                    if verification < target {
                        extension = 1;
                    }
                }
            }

            board.play(mv);
            self.pv_len[ply + 1] = 0;
            let mut score;
            if legal == 1 {
                score =
                    -self.negamax(board, ply + 1, horizon + extension, true, -beta, -alpha, Move::NULL);
            } else {
                // Late move reductions for quiet non-killer moves; the check
                // flag inhibits any reduction.
                let mut reduction = 0;
                if is_quiet && !mv.is_check() && !in_check && mv.killer_rank() == 0 && to_horizon >= 2
                {
                    reduction = LMR_TABLE[quiet_count.min(LMR_TABLE.len() - 1)];
                    if is_pv && reduction > 0 {
                        reduction -= 1;
                    }
                    reduction = reduction.min(to_horizon - 1);
                }

                score = -self.negamax(
                    board,
                    ply + 1,
                    horizon - reduction,
                    true,
                    -alpha - 1,
                    -alpha,
                    Move::NULL,
                );
                if score.abs() < INTERRUPTED && score > alpha && reduction > 0 {
                    score =
                        -self.negamax(board, ply + 1, horizon, true, -alpha - 1, -alpha, Move::NULL);
                }
                if score.abs() < INTERRUPTED && score > alpha && score < beta {
                    score = -self.negamax(
                        board,
                        ply + 1,
                        horizon + extension,
                        true,
                        -beta,
                        -alpha,
                        Move::NULL,
                    );
                }
            }
            board.undo();
            if score.abs() >= INTERRUPTED {
                return INTERRUPTED;
            }

            if is_quiet {
                quiet_count += 1;
                let _ = quiets_tried.try_push((mover, mv));
            }
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
                self.collect_pv(ply, mv);
            }
            if score >= beta {
                if is_quiet {
                    self.ctx.update_killer(ply, mv);
                    self.ctx.update_history((mover, mv), &quiets_tried, to_horizon);
                }
                if excluded.is_null() {
                    self.tt
                        .store(key, mv, to_horizon as u8, Bound::Lower, score_to_tt(beta, ply));
                }
                return beta;
            }
        }

        if legal == 0 {
            if !excluded.is_null() {
                // Only the excluded move was playable here.
                return alpha;
            }
            return if in_check {
                -MATE_SCORE + ply as i32
            } else {
                DRAW_SCORE
            };
        }

        if excluded.is_null() {
            let bound = if alpha > original_alpha {
                Bound::Exact
            } else {
                Bound::Upper
            };
            self.tt
                .store(key, best_move, to_horizon as u8, bound, score_to_tt(alpha, ply));
        }
        alpha
    }

    /// Selective search past the horizon: all evasions in check, otherwise
    /// captures only, narrowing to recaptures on the previous destination
    /// once the local depth passes the threshold.
    fn quiescence(&mut self, board: &mut Board, ply: usize, qdepth: i32, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        if self.nodes & NODE_PROBE_MASK == 0 {
            self.time.check(self.nodes);
        }
        if self.time.interrupted {
            return INTERRUPTED;
        }
        self.pv_len[ply] = 0;
        self.seldepth = self.seldepth.max(ply);
        if ply >= MAX_PLY - 4 {
            return self.cached_eval(board).0;
        }

        if board.repetitions() >= 2
            || board.pos().halfmove_clock >= 100
            || crate::eval::endgame::is_insufficient_material(board.pos())
        {
            return DRAW_SCORE;
        }

        let in_check = board.pos().in_check;
        let (stand_pat, drawn) = if in_check {
            (-MAX_SCORE, false)
        } else {
            self.cached_eval(board)
        };
        if drawn {
            return DRAW_SCORE;
        }
        if !in_check {
            if stand_pat >= beta {
                return beta;
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
        }

        let to_mask = if !in_check && qdepth > RECAPTURE_ONLY_AFTER {
            let previous = board.pos().played_move;
            if previous.is_null() { !0u64 } else { previous.to().bit() }
        } else {
            !0u64
        };
        let mode = if in_check { GenMode::AllMoves } else { GenMode::CapturesOnly };
        board.pos_mut().reset_gen(Move::NULL);

        let mut legal = 0usize;
        while let Some(mut mv) =
            next_move(board, mode, to_mask, [Move::NULL; 2], &self.ctx.history)
        {
            if !board.is_move_legal(&mut mv) {
                continue;
            }
            legal += 1;

            if !in_check {
                let gain = exchange_value(mv.victim()) + exchange_value(mv.promoted());
                if mv.promoted().is_none() && stand_pat + gain + QSEARCH_FUTILITY <= alpha {
                    continue;
                }
                // Losing captures cannot rescue a stand-pat below alpha.
                if exchange::exchange_score(board.pos(), mv) < 0 {
                    continue;
                }
            }

            board.play(mv);
            self.pv_len[ply + 1] = 0;
            let score = -self.quiescence(board, ply + 1, qdepth + 1, -beta, -alpha);
            board.undo();
            if score.abs() >= INTERRUPTED {
                return INTERRUPTED;
            }
            if score > alpha {
                alpha = score;
                self.collect_pv(ply, mv);
                if score >= beta {
                    return beta;
                }
            }
        }

        if in_check && legal == 0 {
            return -MATE_SCORE + ply as i32;
        }
        alpha
    }

    fn cached_eval(&mut self, board: &mut Board) -> (i32, bool) {
        let pos = board.pos();
        if pos.static_eval != EVAL_UNKNOWN {
            return (pos.static_eval, pos.eval_drawn);
        }
        let (score, drawn) = self.eval.evaluate(pos);
        let pos = board.pos_mut();
        pos.static_eval = score;
        pos.eval_drawn = drawn;
        (score, drawn)
    }

    /// Prepends `mv` to the child line one ply deeper.
    fn collect_pv(&mut self, ply: usize, mv: Move) {
        let child_len = self.pv_len[ply + 1].min(MAX_PLY - ply - 2);
        let (head, tail) = self.pv.split_at_mut(ply + 1);
        head[ply][0] = mv;
        head[ply][1..=child_len].copy_from_slice(&tail[0][..child_len]);
        self.pv_len[ply] = child_len + 1;
    }

    fn report_line(&self, depth: i32, pv_index: usize) {
        if self.silent {
            return;
        }
        let rm = &self.root_moves[pv_index];
        let millis = self.time.elapsed().as_millis().max(1) as u64;
        let nps = self.nodes.saturating_mul(1000) / millis;
        let pv = rm
            .pv
            .iter()
            .map(|m| m.to_uci())
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "info depth {} seldepth {} multipv {} time {} nodes {} nps {} hashfull {} score {} pv {}",
            depth,
            self.seldepth,
            pv_index + 1,
            millis,
            self.nodes,
            nps,
            self.tt.hashfull(),
            format_score(rm.score),
            pv
        );
    }
}

/// Pawn pushes reaching the sixth rank and beyond stay exempt from futility
/// pruning.
#[inline]
fn advanced_pawn_push(mv: Move, white: bool) -> bool {
    mv.is_pawn_move() && !mv.is_capture() && mv.to().relative_rank(white) >= 5
}

/// Saved staged-generator state around a singular-verification search, which
/// re-runs move generation on the same position slot.
struct GenSnapshot {
    stage: GenStage,
    best_move: Move,
    captures_generated: bool,
    move_count: usize,
    move_cursor: usize,
    moves: [Move; MAX_MOVES],
}

fn snapshot_gen(board: &Board) -> GenSnapshot {
    let pos = board.pos();
    GenSnapshot {
        stage: pos.stage,
        best_move: pos.best_move,
        captures_generated: pos.captures_generated,
        move_count: pos.move_count,
        move_cursor: pos.move_cursor,
        moves: pos.moves,
    }
}

fn restore_gen(board: &mut Board, saved: GenSnapshot) {
    let pos = board.pos_mut();
    pos.stage = saved.stage;
    pos.best_move = saved.best_move;
    pos.captures_generated = saved.captures_generated;
    pos.move_count = saved.move_count;
    pos.move_cursor = saved.move_cursor;
    pos.moves = saved.moves;
}

/// UCI score field: `cp N`, or `mate M` with M in moves (not plies).
pub fn format_score(score: i32) -> String {
    if score.abs() >= MATE_THRESHOLD {
        let moves = (MATE_SCORE - score.abs() + 1) / 2;
        if score > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {score}")
    }
}
