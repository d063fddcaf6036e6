//! Static exchange resolution on a single square.
//!
//! `exchange_score` answers "what does this capture net after every
//! profitable recapture?" with fixed material values and no positional
//! terms. The swap runs on bitboards alone; sliders hidden behind the first
//! attacker are revealed as the occupancy shrinks.

use crate::bitboard::BitboardExt;
use crate::board::{Color, PieceKind, Position, attackers_to};
use crate::eval::exchange_value;
use crate::moves::types::Move;
use crate::square::Square;

/// Net material outcome of playing `mv` and resolving the recapture
/// sequence on its destination square, from the moving side's perspective.
pub fn exchange_score(pos: &Position, mv: Move) -> i32 {
    let to = mv.to();
    let from = mv.from();

    let mut value = exchange_value(mv.victim());
    let mut next_victim = if mv.promoted().is_some() {
        value += exchange_value(mv.promoted()) - exchange_value(pos.squares[from.idx()]);
        mv.promoted()
    } else {
        pos.squares[from.idx()]
    };

    let mut gain = [0i32; 32];
    let mut depth = 0;
    gain[0] = value;

    let mut occupancy = pos.occ_all & !from.bit();
    if mv.is_en_passant() {
        let victim_sq = Square::from_file_rank(to.file(), from.rank());
        occupancy &= !victim_sq.bit();
    }
    let mut attackers = attackers_to(pos, to, occupancy);
    let mut side = pos.side_to_move.opposite();

    loop {
        depth += 1;
        let attacker_sq = least_valuable_attacker(pos, attackers, side);
        let Some(attacker_sq) = attacker_sq else {
            break;
        };

        occupancy &= !attacker_sq.bit();
        attackers &= !attacker_sq.bit();
        // Capturing may uncover a slider behind the capturer.
        if matches!(
            pos.squares[attacker_sq.idx()].kind(),
            PieceKind::Pawn | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        ) {
            attackers = attackers_to(pos, to, occupancy);
        }

        if depth >= 31 {
            break;
        }
        gain[depth] = exchange_value(next_victim) - gain[depth - 1];
        next_victim = pos.squares[attacker_sq.idx()];
        side = side.opposite();
    }

    while depth > 1 {
        depth -= 1;
        gain[depth - 1] = -std::cmp::max(-gain[depth - 1], gain[depth]);
    }
    gain[0]
}

fn least_valuable_attacker(pos: &Position, attackers: u64, side: Color) -> Option<Square> {
    let own = attackers & pos.occupancy(side);
    if own == 0 {
        return None;
    }
    for kind in crate::board::PIECE_KINDS {
        let subset = own & pos.bb(side, kind);
        if subset != 0 {
            return Some(subset.lsb());
        }
    }
    None
}

/// Convenience used by pruning sites: does the capture at least break even?
#[inline(always)]
pub fn exchange_at_least(pos: &Position, mv: Move, threshold: i32) -> bool {
    exchange_score(pos, mv) >= threshold
}
