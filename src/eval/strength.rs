//! Limited-strength play.
//!
//! Strength limiting never touches the search: positional evaluation terms
//! are scaled down by an Elo-derived percentage, and a bounded random error
//! (with a small blunder chance) is mixed into the final score. The noise
//! source is seeded, so limited-strength games stay reproducible.

use rand::{Rng, SeedableRng, rngs::StdRng};

pub const MIN_ELO: i32 = 600;
pub const MAX_ELO: i32 = 2600;

const NOISE_SEED: u64 = 0x5EED_0F0E_1A7E_u64;

pub struct Strength {
    limited: bool,
    elo: i32,
    rng: StdRng,
}

impl Strength {
    pub fn new() -> Strength {
        Strength {
            limited: false,
            elo: MAX_ELO,
            rng: StdRng::seed_from_u64(NOISE_SEED),
        }
    }

    pub fn set(&mut self, limited: bool, elo: i32) {
        self.limited = limited;
        self.elo = elo.clamp(MIN_ELO, MAX_ELO);
        // Reseed so the same settings replay the same game.
        self.rng = StdRng::seed_from_u64(NOISE_SEED ^ self.elo as u64);
    }

    #[inline(always)]
    pub fn is_limited(&self) -> bool {
        self.limited
    }

    /// Percentage of positional understanding retained, 0..=100.
    #[inline(always)]
    pub fn positional_percent(&self) -> i32 {
        if !self.limited {
            100
        } else {
            ((self.elo - MIN_ELO) * 100 / (MAX_ELO - MIN_ELO)).clamp(0, 100)
        }
    }

    /// Adds the Elo-dependent score perturbation. A blunder multiplies the
    /// error, with a probability that grows as the target Elo shrinks.
    pub fn perturb(&mut self, score: i32) -> i32 {
        if !self.limited {
            return score;
        }
        let magnitude = (MAX_ELO - self.elo) / 8;
        if magnitude == 0 {
            return score;
        }
        let mut noise = self.rng.random_range(-magnitude..=magnitude);
        let blunder_permille = ((MAX_ELO - self.elo) / 20).min(250);
        if self.rng.random_range(0..1000) < blunder_permille {
            noise *= 4;
        }
        score + noise
    }
}

impl Default for Strength {
    fn default() -> Strength {
        Strength::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_strength_is_transparent() {
        let mut s = Strength::new();
        assert_eq!(s.positional_percent(), 100);
        assert_eq!(s.perturb(123), 123);
    }

    #[test]
    fn limited_strength_scales_and_perturbs() {
        let mut s = Strength::new();
        s.set(true, 1000);
        assert!(s.positional_percent() < 50);
        let magnitude = (MAX_ELO - 1000) / 8;
        for _ in 0..100 {
            let v = s.perturb(0);
            assert!(v.abs() <= magnitude * 4, "noise {v} exceeds blunder bound");
        }
    }

    #[test]
    fn same_settings_replay_the_same_noise() {
        let mut a = Strength::new();
        let mut b = Strength::new();
        a.set(true, 1500);
        b.set(true, 1500);
        let seq_a: Vec<i32> = (0..32).map(|_| a.perturb(0)).collect();
        let seq_b: Vec<i32> = (0..32).map(|_| b.perturb(0)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn elo_is_clamped() {
        let mut s = Strength::new();
        s.set(true, 100);
        assert_eq!(s.positional_percent(), 0);
        s.set(true, 9000);
        assert_eq!(s.positional_percent(), 100);
    }
}
