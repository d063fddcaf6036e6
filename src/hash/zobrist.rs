use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Process-wide Zobrist keys. The full position key is
/// `xor(piece_square[piece][sq]) ^ side[stm] ^ castling[rights] ^ en_passant[ep]`,
/// and the pieces-squares sub-key is the first term alone.
///
/// The generator is seeded with a fixed constant so that search results are
/// reproducible run to run (fixed seed + fixed table size + fixed node limit
/// gives identical moves and PVs).
pub struct ZobristKeys {
    /// `[piece 0..=12][square]`; the `Piece::None` row is all zeros.
    pub piece_square: [[u64; 64]; 13],
    /// `[Color::White, Color::Black]`.
    pub side: [u64; 2],
    /// Indexed by the 4-bit castling rights nibble.
    pub castling: [u64; 16],
    /// Indexed by the en-passant square; slot 64 (`Square::NONE`) is zero.
    pub en_passant: [u64; 65],
}

const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        // Zero keys would make absences and presences collide.
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece_square: [[0u64; 64]; 13],
        side: [0u64; 2],
        castling: [0u64; 16],
        en_passant: [0u64; 65],
    };

    // Row 0 stays zero: Piece::None never contributes to a key.
    for piece in 1..13 {
        for sq in 0..64 {
            keys.piece_square[piece][sq] = non_zero(&mut rng);
        }
    }
    keys.side[0] = non_zero(&mut rng);
    keys.side[1] = non_zero(&mut rng);
    for rights in 0..16 {
        keys.castling[rights] = non_zero(&mut rng);
    }
    for sq in 0..64 {
        keys.en_passant[sq] = non_zero(&mut rng);
    }
    // en_passant[64] stays zero: no EP square, no contribution.

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable_across_calls() {
        let a = zobrist_keys();
        let b = zobrist_keys();
        assert_eq!(a.piece_square[1][0], b.piece_square[1][0]);
        assert_eq!(a.side[1], b.side[1]);
    }

    #[test]
    fn sentinel_rows_are_zero() {
        let keys = zobrist_keys();
        assert!(keys.piece_square[0].iter().all(|&k| k == 0));
        assert_eq!(keys.en_passant[64], 0);
    }

    #[test]
    fn live_keys_are_non_zero_and_distinct() {
        let keys = zobrist_keys();
        assert_ne!(keys.piece_square[1][0], 0);
        assert_ne!(keys.piece_square[1][0], keys.piece_square[1][1]);
        assert_ne!(keys.side[0], keys.side[1]);
    }
}
