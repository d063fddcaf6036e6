//! Simple-endgame recognition: positions the search should not have to
//! discover move by move. Covers the bare-king endings (draws and forced
//! mates with a known technique) and the material-based drawishness scale.

use crate::bitboard::{BitboardExt, DARK_SQUARES, LIGHT_SQUARES};
use crate::board::geometry::GEOMETRY;
use crate::board::{Color, PieceKind, Position};
use crate::eval::psqt::piece_value;
use crate::square::Square;

/// Maximum value of the endgame scale: no damping.
pub const SCALE_MAX: i32 = 128;
/// Scale for pawnless endings a tablebase calls drawn with best play.
const SCALE_DRAWISH: i32 = 16;

const CORNER_DRIVE_WEIGHT: i32 = 10;
const KING_CLOSENESS_WEIGHT: i32 = 4;

/// Tries to classify the position as a known simple endgame. Returns the
/// score from the side to move's perspective plus the drawn flag, or `None`
/// when the position is not simple enough to call.
pub fn recognize(pos: &Position) -> Option<(i32, bool)> {
    let white_extra = pos.occ_white & !pos.bb(Color::White, PieceKind::King);
    let black_extra = pos.occ_black & !pos.bb(Color::Black, PieceKind::King);

    let (winner, material) = match (white_extra, black_extra) {
        (0, 0) => return Some((0, true)),
        (w, 0) => (Color::White, w),
        (0, b) => (Color::Black, b),
        _ => return None,
    };
    let loser = winner.opposite();

    let pawns = pos.bb(winner, PieceKind::Pawn);
    let knights = pos.bb(winner, PieceKind::Knight);
    let bishops = pos.bb(winner, PieceKind::Bishop);
    let majors = pos.bb(winner, PieceKind::Rook) | pos.bb(winner, PieceKind::Queen);
    let minors = knights | bishops;

    let score = if material == pawns {
        // King and pawns versus bare king.
        if pawns.count_ones() == 1 {
            return kpk(pos, winner, pawns.lsb());
        }
        return None;
    } else if pawns != 0 {
        // Pieces plus pawns: an easy win only when a major is around.
        if majors == 0 {
            return None;
        }
        corner_drive(pos, winner, loser)
    } else if majors != 0 {
        corner_drive(pos, winner, loser)
    } else if minors == bishops && bishops.count_ones() >= 2 {
        // Two bishops mate, but only if they live on both colors.
        if bishops & LIGHT_SQUARES != 0 && bishops & DARK_SQUARES != 0 {
            corner_drive(pos, winner, loser)
        } else {
            return Some((0, true));
        }
    } else if minors.count_ones() == 1 {
        // Lone minor cannot mate.
        return Some((0, true));
    } else if bishops == 0 && knights.count_ones() == 2 {
        // Two knights cannot force mate.
        return Some((0, true));
    } else if knights.count_ones() == 1 && bishops.count_ones() == 1 {
        return Some((bishop_knight_drive(pos, winner, loser), false));
    } else {
        return None;
    };

    Some((score, false))
}

/// Mate with a major piece (or overwhelming material): push the defending
/// king toward any corner and bring the attacking king up.
fn corner_drive(pos: &Position, winner: Color, loser: Color) -> i32 {
    let wk = pos.king_square(winner);
    let lk = pos.king_square(loser);
    let material = material_eg(pos, winner) - material_eg(pos, loser);

    let rank = lk.rank() as i32;
    let file = lk.file() as i32;
    let center_distance = (2 * rank - 7).abs() + (2 * file - 7).abs();
    let kings = GEOMETRY.chebyshev(wk, lk) as i32;

    let drive = CORNER_DRIVE_WEIGHT * center_distance + KING_CLOSENESS_WEIGHT * (14 - kings);
    signed_for_stm(pos, winner, material + drive)
}

/// Bishop and knight mate: the defending king must be driven to a corner of
/// the bishop's color.
fn bishop_knight_drive(pos: &Position, winner: Color, loser: Color) -> i32 {
    let wk = pos.king_square(winner);
    let lk = pos.king_square(loser);
    let bishop = pos.bb(winner, PieceKind::Bishop).lsb();

    let light_bishop = bishop.bit() & LIGHT_SQUARES != 0;
    // a8 and h1 are the light corners.
    let (c1, c2) = if light_bishop {
        (Square::A8, Square::H1)
    } else {
        (Square::A1, Square::H8)
    };
    let corner_distance = GEOMETRY
        .chebyshev(lk, c1)
        .min(GEOMETRY.chebyshev(lk, c2)) as i32;
    let kings = GEOMETRY.chebyshev(wk, lk) as i32;

    let material = material_eg(pos, winner);
    let drive =
        CORNER_DRIVE_WEIGHT * (7 - corner_distance) + KING_CLOSENESS_WEIGHT * (7 - kings);
    signed_for_stm(pos, winner, material + drive)
}

/// King and pawn versus king, decided by the square of the pawn and the key
/// squares. Unclear positions return `None` and stay with the search.
fn kpk(pos: &Position, winner: Color, pawn: Square) -> Option<(i32, bool)> {
    let loser = winner.opposite();
    let wk = pos.king_square(winner);
    let lk = pos.king_square(loser);
    let white = winner.is_white();

    let promo = Square::from_file_rank(pawn.file(), if white { 7 } else { 0 });
    let mut steps = 7 - pawn.relative_rank(white) as i32;
    if pawn.relative_rank(white) == 1 {
        steps -= 1; // double push
    }
    let tempo = if pos.side_to_move == loser { 1 } else { 0 };
    let defender_steps = GEOMETRY.chebyshev(lk, promo) as i32 - tempo;

    // Square of the pawn: the defender can never catch it.
    if defender_steps > steps && GEOMETRY.chebyshev(wk, promo) as i32 >= steps {
        let score = piece_value(PieceKind::Queen).1 - 8 * steps;
        return Some((signed_for_stm(pos, winner, score), false));
    }

    let rook_pawn = pawn.file() == 0 || pawn.file() == 7;
    if rook_pawn {
        // Defender in front of a rook pawn holds the corner.
        if GEOMETRY.chebyshev(lk, promo) <= 1 {
            return Some((0, true));
        }
        return None;
    }

    // Key squares: standing on one wins regardless of the move.
    if on_key_square(wk, pawn, white) {
        let score = piece_value(PieceKind::Queen).1 - 8 * steps - 40;
        return Some((signed_for_stm(pos, winner, score), false));
    }

    None
}

fn on_key_square(king: Square, pawn: Square, white: bool) -> bool {
    let rel_rank = pawn.relative_rank(white);
    let king_rel = king.relative_rank(white);
    let file_near = king.file().abs_diff(pawn.file()) <= 1;
    if !file_near {
        return false;
    }
    if rel_rank <= 3 {
        king_rel == rel_rank + 2
    } else {
        // Advanced pawns: the two ranks ahead are all key.
        king_rel > rel_rank && king_rel <= rel_rank + 2 && king_rel < 7
    }
}

fn material_eg(pos: &Position, color: Color) -> i32 {
    let mut total = 0;
    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ] {
        total += pos.bb(color, kind).count_ones() as i32 * piece_value(kind).1;
    }
    total
}

#[inline]
fn signed_for_stm(pos: &Position, winner: Color, score: i32) -> i32 {
    if pos.side_to_move == winner { score } else { -score }
}

/// Neither side can ever deliver mate.
pub fn is_insufficient_material(pos: &Position) -> bool {
    let heavy = pos.bb(Color::White, PieceKind::Pawn)
        | pos.bb(Color::Black, PieceKind::Pawn)
        | pos.bb(Color::White, PieceKind::Rook)
        | pos.bb(Color::Black, PieceKind::Rook)
        | pos.bb(Color::White, PieceKind::Queen)
        | pos.bb(Color::Black, PieceKind::Queen);
    if heavy != 0 {
        return false;
    }

    let white_minors = (pos.bb(Color::White, PieceKind::Knight)
        | pos.bb(Color::White, PieceKind::Bishop))
    .count_ones();
    let black_minors = (pos.bb(Color::Black, PieceKind::Knight)
        | pos.bb(Color::Black, PieceKind::Bishop))
    .count_ones();

    match white_minors + black_minors {
        0 | 1 => true,
        2 => {
            // Minor versus minor cannot be forced; two knights cannot mate.
            white_minors == 1
                || pos.bb(Color::White, PieceKind::Knight).count_ones() == 2
                || pos.bb(Color::Black, PieceKind::Knight).count_ones() == 2
        }
        _ => false,
    }
}

/// Damping factor in `[0, SCALE_MAX]` applied to the final evaluation; 0
/// marks a dead draw.
pub fn endgame_scale(pos: &Position) -> i32 {
    if is_insufficient_material(pos) {
        return 0;
    }
    let pawns =
        pos.bb(Color::White, PieceKind::Pawn) | pos.bb(Color::Black, PieceKind::Pawn);
    if pawns != 0 {
        return SCALE_MAX;
    }
    // Pawnless: a material edge below roughly a minor piece is rarely enough
    // (R vs R+minor, Q vs 2R and friends).
    let diff = (material_eg(pos, Color::White) - material_eg(pos, Color::Black)).abs();
    if diff <= piece_value(PieceKind::Bishop).1 {
        SCALE_DRAWISH
    } else {
        SCALE_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn bare_kings_draw() {
        let board = Board::from_fen("8/8/8/8/3k4/8/3K4/8 w - - 0 1").unwrap();
        assert_eq!(recognize(board.pos()), Some((0, true)));
        assert!(is_insufficient_material(board.pos()));
        assert_eq!(endgame_scale(board.pos()), 0);
    }

    #[test]
    fn lone_minor_draws() {
        let board = Board::from_fen("8/8/8/8/3k4/8/3KB3/8 w - - 0 1").unwrap();
        assert_eq!(recognize(board.pos()), Some((0, true)));
        let board = Board::from_fen("8/8/8/8/3k4/8/3KN3/8 b - - 0 1").unwrap();
        assert_eq!(recognize(board.pos()), Some((0, true)));
    }

    #[test]
    fn two_knights_draw_two_bishops_win() {
        let board = Board::from_fen("8/8/8/8/3k4/8/3KNN2/8 w - - 0 1").unwrap();
        assert_eq!(recognize(board.pos()), Some((0, true)));
        let board = Board::from_fen("8/8/8/8/3k4/8/3KBB2/8 w - - 0 1").unwrap();
        let (score, drawn) = recognize(board.pos()).unwrap();
        assert!(!drawn);
        assert!(score > 500);
    }

    #[test]
    fn queen_endgame_prefers_cornered_king() {
        let cornered = Board::from_fen("k7/8/1K6/8/8/8/8/7Q w - - 0 1").unwrap();
        let centered = Board::from_fen("8/8/8/3k4/8/1K6/8/7Q w - - 0 1").unwrap();
        let (c_score, _) = recognize(cornered.pos()).unwrap();
        let (m_score, _) = recognize(centered.pos()).unwrap();
        assert!(c_score > m_score);
    }

    #[test]
    fn recognizer_score_flips_with_side_to_move() {
        let white_to_move = Board::from_fen("k7/8/1K6/8/8/8/8/7Q w - - 0 1").unwrap();
        let black_to_move = Board::from_fen("k7/8/1K6/8/8/8/8/7Q b - - 0 1").unwrap();
        let (w, _) = recognize(white_to_move.pos()).unwrap();
        let (b, _) = recognize(black_to_move.pos()).unwrap();
        assert!(w > 0 && b < 0);
    }

    #[test]
    fn unstoppable_passer_is_winning() {
        // Black king far away from the a-file... use a center pawn clear of
        // the defender's square.
        let board = Board::from_fen("8/3P4/8/8/8/8/k7/3K4 w - - 0 1").unwrap();
        let (score, drawn) = recognize(board.pos()).unwrap();
        assert!(!drawn);
        assert!(score > 500);
    }

    #[test]
    fn rook_pawn_with_cornered_defender_draws() {
        let board = Board::from_fen("7k/8/6K1/7P/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(recognize(board.pos()), Some((0, true)));
    }

    #[test]
    fn pawnless_small_edge_is_damped() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K1n1 w - - 0 1").unwrap();
        assert_eq!(endgame_scale(board.pos()), SCALE_DRAWISH);
        let board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        assert_eq!(endgame_scale(board.pos()), SCALE_MAX);
    }
}
