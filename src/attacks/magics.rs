//! Magic bitboard tables for the sliding pieces.
//!
//! For every square we enumerate all blocker subsets of the square's
//! ray-relevant mask, precompute the reachable squares for each subset, and
//! index the table by `(blockers & mask) * magic >> shift`. The magic factors
//! are found by a seeded random search at startup, so the tables are
//! deterministic without any on-disk state.

use rand::{RngCore, SeedableRng, rngs::StdRng};

const MAGIC_SEED: u64 = 0x45;

/// One square's slider lookup: hash factor, shift, relevant-occupancy mask,
/// and the attack table indexed by the hashed blockers.
pub struct MagicEntry {
    pub magic: u64,
    pub shift: u32,
    pub mask: u64,
    pub table: Box<[u64]>,
}

impl MagicEntry {
    #[inline(always)]
    pub fn attacks(&self, occupancy: u64) -> u64 {
        let masked = occupancy & self.mask;
        let index = (masked.wrapping_mul(self.magic) >> self.shift) as usize;
        self.table[index]
    }
}

pub struct SliderAttacks {
    rook: Vec<MagicEntry>,
    bishop: Vec<MagicEntry>,
}

impl SliderAttacks {
    pub fn build() -> SliderAttacks {
        let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
        let rook = (0..64)
            .map(|sq| find_magic(sq, false, &mut rng))
            .collect();
        let bishop = (0..64)
            .map(|sq| find_magic(sq, true, &mut rng))
            .collect();
        SliderAttacks { rook, bishop }
    }

    #[inline(always)]
    pub fn rook_attacks(&self, sq: usize, occupancy: u64) -> u64 {
        self.rook[sq].attacks(occupancy)
    }

    #[inline(always)]
    pub fn bishop_attacks(&self, sq: usize, occupancy: u64) -> u64 {
        self.bishop[sq].attacks(occupancy)
    }

    #[inline(always)]
    pub fn queen_attacks(&self, sq: usize, occupancy: u64) -> u64 {
        self.rook[sq].attacks(occupancy) | self.bishop[sq].attacks(occupancy)
    }
}

/// Scans one ray, accumulating squares until (and including) the first
/// blocker.
fn scan_ray(square: usize, df: i32, dr: i32, blockers: u64, stop_before_edge: bool) -> u64 {
    let mut attacks = 0u64;
    let mut file = (square % 8) as i32 + df;
    let mut rank = (square / 8) as i32 + dr;
    while (0..8).contains(&file) && (0..8).contains(&rank) {
        let sq = (rank * 8 + file) as u64;
        if stop_before_edge {
            let next_f = file + df;
            let next_r = rank + dr;
            if !(0..8).contains(&next_f) || !(0..8).contains(&next_r) {
                break;
            }
        }
        attacks |= 1 << sq;
        if blockers >> sq & 1 != 0 {
            break;
        }
        file += df;
        rank += dr;
    }
    attacks
}

const ROOK_RAYS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_RAYS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Reference (scan-based) rook attacks; also used to validate the magics.
pub fn rook_attacks_slow(square: usize, blockers: u64) -> u64 {
    ROOK_RAYS
        .iter()
        .fold(0, |acc, &(df, dr)| acc | scan_ray(square, df, dr, blockers, false))
}

/// Reference (scan-based) bishop attacks.
pub fn bishop_attacks_slow(square: usize, blockers: u64) -> u64 {
    BISHOP_RAYS
        .iter()
        .fold(0, |acc, &(df, dr)| acc | scan_ray(square, df, dr, blockers, false))
}

/// Ray-relevant occupancy mask: the rays with their edge squares dropped,
/// since an edge blocker cannot change the attack set.
fn relevant_mask(square: usize, bishop: bool) -> u64 {
    let rays = if bishop { &BISHOP_RAYS } else { &ROOK_RAYS };
    rays.iter()
        .fold(0, |acc, &(df, dr)| acc | scan_ray(square, df, dr, 0, true))
}

fn find_magic(square: usize, bishop: bool, rng: &mut StdRng) -> MagicEntry {
    let mask = relevant_mask(square, bishop);
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let size = 1usize << bits;

    // Enumerate every blocker subset of the mask with the carry-rippler and
    // precompute its attack set once.
    let mut subsets = Vec::with_capacity(size);
    let mut subset = 0u64;
    loop {
        let attacks = if bishop {
            bishop_attacks_slow(square, subset)
        } else {
            rook_attacks_slow(square, subset)
        };
        subsets.push((subset, attacks));
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    let mut table = vec![0u64; size];
    loop {
        // Sparse candidates collide far less often.
        let magic = rng.next_u64() & rng.next_u64() & rng.next_u64();
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }

        table.iter_mut().for_each(|slot| *slot = 0);
        let mut used = vec![false; size];
        let mut ok = true;
        for &(blockers, attacks) in &subsets {
            let index = (blockers.wrapping_mul(magic) >> shift) as usize;
            if used[index] && table[index] != attacks {
                ok = false;
                break;
            }
            used[index] = true;
            table[index] = attacks;
        }
        if ok {
            return MagicEntry {
                magic,
                shift,
                mask,
                table: table.into_boxed_slice(),
            };
        }
    }
}
