//! Staged move generation.
//!
//! Each position slot carries its own generation cursor, so a node asks for
//! one move at a time and never pays for moves behind a beta cutoff. Stages:
//!
//! `BestMove -> Captures -> NonCaptures -> End`
//!
//! The best move (from the transposition table) is emitted first and checked
//! for legality by the caller like every other move. Captures are ordered by
//! MVV/LVA, quiets by killer rank then history, all by comparing the packed
//! move integers. Pin data is computed on the `BestMove -> Captures`
//! transition and cached on the position.

use crate::attacks::ATTACKS;
use crate::bitboard::{BitboardExt, Bits};
use crate::board::castling::{
    BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE, WHITE_QUEENSIDE,
};
use crate::board::{Board, Piece, PieceKind, Position};
use crate::moves::types::Move;
use crate::search::context::History;
use crate::square::Square;
use arrayvec::ArrayVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenStage {
    BestMove,
    Captures,
    NonCaptures,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenMode {
    AllMoves,
    /// Quiescence: skip straight from `Captures` to `End`.
    CapturesOnly,
}

type MoveBuf = ArrayVec<Move, 256>;

/// Returns the next pseudo-legal move of the current position, best first.
/// `to_mask` restricts destinations (quiescence recaptures); pass `!0` for
/// the full board. The caller is responsible for the legality test.
pub fn next_move(
    board: &mut Board,
    mode: GenMode,
    to_mask: u64,
    killers: [Move; 2],
    history: &History,
) -> Option<Move> {
    loop {
        match board.pos().stage {
            GenStage::BestMove => {
                // Pins are discovered on this transition and cached for the
                // legality fast path.
                board.ensure_pins();
                let pos = board.pos_mut();
                pos.stage = GenStage::Captures;
                pos.captures_generated = false;
                let best = pos.best_move;
                if !best.is_null() {
                    return Some(best);
                }
            }
            GenStage::Captures => {
                if !board.pos().captures_generated {
                    // Generated only now: a cutoff on the best move never
                    // pays for the capture list.
                    let mut buf = MoveBuf::new();
                    generate_captures(board.pos(), to_mask, &mut buf);
                    let pos = board.pos_mut();
                    pos.move_count = 0;
                    pos.move_cursor = 0;
                    for mv in buf {
                        pos.moves[pos.move_count] = mv;
                        pos.move_count += 1;
                    }
                    pos.captures_generated = true;
                }
                let best = board.pos().best_move;
                if let Some(mv) = pick_best(board.pos_mut()) {
                    if mv == best {
                        continue;
                    }
                    return Some(mv);
                }
                if mode == GenMode::CapturesOnly {
                    board.pos_mut().stage = GenStage::End;
                    continue;
                }
                let mut buf = MoveBuf::new();
                generate_quiets(board.pos(), to_mask, &mut buf);
                let pos = board.pos_mut();
                let stm = pos.side_to_move;
                for mut mv in buf {
                    let rank = killer_rank(&killers, mv);
                    mv.set_killer_rank(rank);
                    let mover = Piece::new(stm, mover_kind(mv, pos));
                    mv.set_history(history.value(mover, mv.to()));
                    pos.moves[pos.move_count] = mv;
                    pos.move_count += 1;
                }
                pos.stage = GenStage::NonCaptures;
            }
            GenStage::NonCaptures => {
                let best = board.pos().best_move;
                if let Some(mv) = pick_best(board.pos_mut()) {
                    if mv == best {
                        continue;
                    }
                    return Some(mv);
                }
                board.pos_mut().stage = GenStage::End;
            }
            GenStage::End => return None,
        }
    }
}

#[inline]
fn mover_kind(mv: Move, pos: &Position) -> PieceKind {
    if mv.is_king_move() {
        PieceKind::King
    } else if mv.is_pawn_move() {
        PieceKind::Pawn
    } else {
        pos.squares[mv.from().idx()].kind()
    }
}

#[inline]
fn killer_rank(killers: &[Move; 2], mv: Move) -> u8 {
    if mv == killers[0] {
        2
    } else if mv == killers[1] {
        1
    } else {
        0
    }
}

/// Selection-sorts the highest-priority move to the cursor and returns it.
fn pick_best(pos: &mut Position) -> Option<Move> {
    if pos.move_cursor >= pos.move_count {
        return None;
    }
    let mut best_idx = pos.move_cursor;
    let mut best_priority = pos.moves[best_idx].priority();
    for i in pos.move_cursor + 1..pos.move_count {
        let priority = pos.moves[i].priority();
        if priority > best_priority {
            best_priority = priority;
            best_idx = i;
        }
    }
    pos.moves.swap(pos.move_cursor, best_idx);
    let mv = pos.moves[pos.move_cursor];
    pos.move_cursor += 1;
    Some(mv)
}

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

fn capture_move(pos: &Position, from: Square, to: Square) -> Move {
    let mut mv = Move::new(from, to);
    let attacker = pos.squares[from.idx()];
    let victim = pos.squares[to.idx()];
    debug_assert!(victim.is_some());
    mv.set_victim(victim);
    mv.set_victim_sort(victim.kind().value_class());
    mv.set_attacker_sort(7 - attacker.kind().value_class());
    match attacker.kind() {
        PieceKind::Pawn => mv.set_pawn_move(),
        PieceKind::King => mv.set_king_move(),
        _ => {}
    }
    mv
}

/// Pseudo-legal captures, en-passant captures and promotions, gated by
/// `to_mask`.
pub(crate) fn generate_captures(pos: &Position, to_mask: u64, out: &mut MoveBuf) {
    let tables = &*ATTACKS;
    let us = pos.side_to_move;
    let them = us.opposite();
    let enemy = pos.occupancy(them);
    let targets = enemy & to_mask;
    let occ = pos.occ_all;
    let promo_rank = if us.is_white() { 7 } else { 0 };

    for from in Bits(pos.bb(us, PieceKind::Knight)) {
        for to in Bits(tables.knight[from.idx()] & targets) {
            out.push(capture_move(pos, from, to));
        }
    }
    for from in Bits(pos.bb(us, PieceKind::Bishop)) {
        for to in Bits(tables.bishop(from, occ) & targets) {
            out.push(capture_move(pos, from, to));
        }
    }
    for from in Bits(pos.bb(us, PieceKind::Rook)) {
        for to in Bits(tables.rook(from, occ) & targets) {
            out.push(capture_move(pos, from, to));
        }
    }
    for from in Bits(pos.bb(us, PieceKind::Queen)) {
        for to in Bits(tables.queen(from, occ) & targets) {
            out.push(capture_move(pos, from, to));
        }
    }
    {
        let from = pos.king_square(us);
        for to in Bits(tables.king[from.idx()] & targets) {
            out.push(capture_move(pos, from, to));
        }
    }

    for from in Bits(pos.bb(us, PieceKind::Pawn)) {
        // Diagonal captures, promoting on the last rank.
        for to in Bits(tables.pawn_attacks[us as usize][from.idx()] & targets) {
            if to.rank() == promo_rank {
                let victim = pos.squares[to.idx()];
                for kind in PROMOTION_KINDS {
                    let mut mv = capture_move(pos, from, to);
                    let promoted = Piece::new(us, kind);
                    mv.set_promoted(promoted);
                    mv.set_victim_sort(victim.kind().value_class() + kind.value_class());
                    out.push(mv);
                }
            } else {
                out.push(capture_move(pos, from, to));
            }
        }
        if to_rank_of(tables.pawn_push[us as usize][from.idx()]) == Some(promo_rank) {
            // Non-capture promotions count as noisy moves.
            let push = tables.pawn_push[us as usize][from.idx()] & !occ & to_mask;
            for to in Bits(push) {
                for kind in PROMOTION_KINDS {
                    let mut mv = Move::new(from, to);
                    mv.set_pawn_move();
                    mv.set_promoted(Piece::new(us, kind));
                    mv.set_victim_sort(kind.value_class());
                    mv.set_attacker_sort(7 - PieceKind::Pawn.value_class());
                    out.push(mv);
                }
            }
        }
        if pos.en_passant.is_some()
            && tables.pawn_attacks[us as usize][from.idx()] & pos.en_passant.bit() & to_mask != 0
        {
            let mut mv = Move::new(from, pos.en_passant);
            mv.set_pawn_move();
            mv.set_en_passant();
            mv.set_victim(Piece::new(them, PieceKind::Pawn));
            mv.set_victim_sort(PieceKind::Pawn.value_class());
            mv.set_attacker_sort(7 - PieceKind::Pawn.value_class());
            out.push(mv);
        }
    }
}

#[inline]
fn to_rank_of(push_mask: u64) -> Option<u8> {
    if push_mask == 0 { None } else { Some(push_mask.lsb().rank()) }
}

/// Pseudo-legal non-captures (pushes, piece moves, castling), gated by
/// `to_mask`. Promotions are emitted by the capture phase.
pub(crate) fn generate_quiets(pos: &Position, to_mask: u64, out: &mut MoveBuf) {
    let tables = &*ATTACKS;
    let us = pos.side_to_move;
    let occ = pos.occ_all;
    let empty = !occ;
    let targets = empty & to_mask;
    let promo_rank = if us.is_white() { 7 } else { 0 };

    for from in Bits(pos.bb(us, PieceKind::Knight)) {
        for to in Bits(tables.knight[from.idx()] & targets) {
            out.push(Move::new(from, to));
        }
    }
    for from in Bits(pos.bb(us, PieceKind::Bishop)) {
        for to in Bits(tables.bishop(from, occ) & targets) {
            out.push(Move::new(from, to));
        }
    }
    for from in Bits(pos.bb(us, PieceKind::Rook)) {
        for to in Bits(tables.rook(from, occ) & targets) {
            out.push(Move::new(from, to));
        }
    }
    for from in Bits(pos.bb(us, PieceKind::Queen)) {
        for to in Bits(tables.queen(from, occ) & targets) {
            out.push(Move::new(from, to));
        }
    }

    for from in Bits(pos.bb(us, PieceKind::Pawn)) {
        let single = tables.pawn_push[us as usize][from.idx()] & empty;
        if single != 0 && single.lsb().rank() != promo_rank {
            if single & to_mask != 0 {
                let mut mv = Move::new(from, single.lsb());
                mv.set_pawn_move();
                out.push(mv);
            }
            let double = tables.pawn_double_push[us as usize][from.idx()] & empty & to_mask;
            if double != 0 {
                let mut mv = Move::new(from, double.lsb());
                mv.set_pawn_move();
                mv.set_double_push();
                out.push(mv);
            }
        }
    }

    {
        let from = pos.king_square(us);
        for to in Bits(tables.king[from.idx()] & targets) {
            let mut mv = Move::new(from, to);
            mv.set_king_move();
            out.push(mv);
        }
    }

    generate_castling(pos, to_mask, out);
}

fn generate_castling(pos: &Position, to_mask: u64, out: &mut MoveBuf) {
    let us = pos.side_to_move;
    let occ = pos.occ_all;
    // Rights alone are not trusted: the king and rook must actually stand on
    // their home squares (hand-written FENs get this wrong).
    let candidates: [(u8, Square, Square, Square, u64); 2] = if us.is_white() {
        [
            (WHITE_KINGSIDE, Square::E1, Square::G1, Square::H1, 0x60),
            (WHITE_QUEENSIDE, Square::E1, Square::C1, Square::A1, 0x0E),
        ]
    } else {
        [
            (
                BLACK_KINGSIDE,
                Square::E8,
                Square::G8,
                Square::H8,
                0x60 << 56,
            ),
            (
                BLACK_QUEENSIDE,
                Square::E8,
                Square::C8,
                Square::A8,
                0x0E << 56,
            ),
        ]
    };

    for (right, king_from, king_to, rook_from, between) in candidates {
        if pos.castling & right == 0 || occ & between != 0 || king_to.bit() & to_mask == 0 {
            continue;
        }
        if pos.squares[king_from.idx()] != Piece::new(us, PieceKind::King)
            || pos.squares[rook_from.idx()] != Piece::new(us, PieceKind::Rook)
        {
            continue;
        }
        let mut mv = Move::new(king_from, king_to);
        mv.set_king_move();
        mv.set_castling();
        out.push(mv);
    }
}

/// Rebuilds a bare (from, to, promotion) triple, typically a transposition
/// table move, into a fully annotated move, validating it against the
/// current position. Returns `None` when the triple cannot be a pseudo-legal
/// move here.
pub fn complete_move(pos: &Position, from: Square, to: Square, promoted: Piece) -> Option<Move> {
    if from.is_none() || to.is_none() || from == to {
        return None;
    }
    let tables = &*ATTACKS;
    let us = pos.side_to_move;
    let piece = pos.squares[from.idx()];
    if piece.is_none() || piece.color() != us {
        return None;
    }
    if pos.occupancy(us) & to.bit() != 0 {
        return None;
    }
    let victim = pos.squares[to.idx()];
    if victim.is_some() && victim.kind() == PieceKind::King {
        return None;
    }
    let occ = pos.occ_all;

    let mut mv = Move::new(from, to);
    match piece.kind() {
        PieceKind::Knight => {
            if tables.knight[from.idx()] & to.bit() == 0 {
                return None;
            }
        }
        PieceKind::Bishop => {
            if tables.bishop(from, occ) & to.bit() == 0 {
                return None;
            }
        }
        PieceKind::Rook => {
            if tables.rook(from, occ) & to.bit() == 0 {
                return None;
            }
        }
        PieceKind::Queen => {
            if tables.queen(from, occ) & to.bit() == 0 {
                return None;
            }
        }
        PieceKind::King => {
            mv.set_king_move();
            if from.file().abs_diff(to.file()) == 2 && from.rank() == to.rank() {
                // Must match a generatable castling move exactly.
                let mut buf = MoveBuf::new();
                generate_castling(pos, !0u64, &mut buf);
                return buf.into_iter().find(|m| *m == mv);
            }
            if tables.king[from.idx()] & to.bit() == 0 {
                return None;
            }
        }
        PieceKind::Pawn => {
            mv.set_pawn_move();
            let promo_rank = if us.is_white() { 7 } else { 0 };
            if (to.rank() == promo_rank) != promoted.is_some() {
                return None;
            }
            if promoted.is_some() {
                if promoted.color() != us || matches!(promoted.kind(), PieceKind::Pawn | PieceKind::King)
                {
                    return None;
                }
                mv.set_promoted(promoted);
                mv.set_victim_sort(promoted.kind().value_class());
            }
            if tables.pawn_attacks[us as usize][from.idx()] & to.bit() != 0 {
                if to == pos.en_passant {
                    mv.set_en_passant();
                    mv.set_victim(Piece::new(us.opposite(), PieceKind::Pawn));
                } else if victim.is_none() {
                    return None;
                }
            } else if tables.pawn_push[us as usize][from.idx()] & to.bit() != 0 {
                if occ & to.bit() != 0 {
                    return None;
                }
            } else if tables.pawn_double_push[us as usize][from.idx()] & to.bit() != 0 {
                let step = tables.pawn_push[us as usize][from.idx()];
                if occ & (step | to.bit()) != 0 {
                    return None;
                }
                mv.set_double_push();
            } else {
                return None;
            }
        }
    }

    if piece.kind() != PieceKind::Pawn && promoted.is_some() {
        return None;
    }
    if victim.is_some() && !mv.is_en_passant() {
        mv.set_victim(victim);
        mv.set_victim_sort(victim.kind().value_class());
        mv.set_attacker_sort(7 - piece.kind().value_class());
    }
    Some(mv)
}

/// All legal moves of the current position, annotated with their check flag.
/// Convenience for perft, the UCI move parser and tests; the search pulls
/// from the staged generator instead.
pub fn legal_moves(board: &mut Board) -> Vec<Move> {
    let history = History::new();
    board.pos_mut().reset_gen(Move::NULL);
    let mut moves = Vec::with_capacity(64);
    while let Some(mut mv) = next_move(
        board,
        GenMode::AllMoves,
        !0u64,
        [Move::NULL; 2],
        &history,
    ) {
        if board.is_move_legal(&mut mv) {
            moves.push(mv);
        }
    }
    moves
}
