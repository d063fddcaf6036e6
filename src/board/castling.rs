use crate::square::Square;

pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;
pub const ALL_RIGHTS: u8 = 0b1111;

/// Rights that survive a move touching each square. Moving or capturing on a
/// king or rook home square extinguishes the matching rights.
pub const RIGHTS_MASK: [u8; 64] = {
    let mut table = [ALL_RIGHTS; 64];
    table[0] = ALL_RIGHTS & !WHITE_QUEENSIDE; // a1
    table[4] = ALL_RIGHTS & !(WHITE_KINGSIDE | WHITE_QUEENSIDE); // e1
    table[7] = ALL_RIGHTS & !WHITE_KINGSIDE; // h1
    table[56] = ALL_RIGHTS & !BLACK_QUEENSIDE; // a8
    table[60] = ALL_RIGHTS & !(BLACK_KINGSIDE | BLACK_QUEENSIDE); // e8
    table[63] = ALL_RIGHTS & !BLACK_KINGSIDE; // h8
    table
};

/// Rook displacement for a castling move, keyed by the king's destination.
#[inline(always)]
pub fn rook_castle_squares(king_to: Square) -> (Square, Square) {
    match king_to.index() {
        6 => (Square::H1, Square::F1),   // White O-O
        2 => (Square::A1, Square::D1),   // White O-O-O
        62 => (Square::H8, Square::F8),  // Black O-O
        58 => (Square::A8, Square::D8),  // Black O-O-O
        _ => unreachable!("not a castling destination"),
    }
}
