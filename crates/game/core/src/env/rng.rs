//! Shared deterministic random source.
//!
//! Every probability roll an actor makes is drawn from the one [`RngOracle`]
//! passed into the call. Given the same seed and the same sequence of
//! activations, every outcome replays exactly.

/// Deterministic random source.
///
/// Only [`next_u32`](RngOracle::next_u32) is required; the dice helpers are
/// derived from [`unit`](RngOracle::unit) so a scripted source can override
/// that single method to pin outcomes in tests.
pub trait RngOracle: Send {
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform integer in `[lo, hi]` inclusive (bounds may be given in either order).
    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let span = (hi as i64 - lo as i64 + 1) as f64;
        let offset = (self.unit() * span) as i64;
        (lo as i64 + offset.min(hi as i64 - lo as i64)) as i32
    }

    /// Uniform float in `[lo, hi)`.
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit() as f32
    }

    /// True with probability `1 / n`; always true for `n <= 1`.
    fn one_in(&mut self, n: i32) -> bool {
        n <= 1 || self.range(0, n - 1) == 0
    }

    /// True with probability `x / y`.
    fn x_in_y(&mut self, x: f64, y: f64) -> bool {
        if x <= 0.0 {
            return false;
        }
        if x >= y {
            return true;
        }
        self.unit() * y < x
    }

    /// Sum of `count` rolls of a die with `sides` faces.
    fn dice(&mut self, count: i32, sides: i32) -> i32 {
        if sides < 1 {
            return 0;
        }
        (0..count.max(0)).map(|_| self.range(1, sides)).sum()
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: compute_seed(seed, 0),
        }
    }

    /// Independent generator for a numbered stream of the same game seed.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        Self {
            state: compute_seed(seed, stream),
        }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

/// Mixes a game seed with a stream number into a well-distributed start state.
///
/// Constants are the SplitMix64 / FxHash multipliers followed by the
/// MurmurHash3 finalizer.
pub fn compute_seed(game_seed: u64, stream: u64) -> u64 {
    let mut hash = game_seed;
    hash ^= stream.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PcgRng::new(42);
        let mut b = PcgRng::new(42);
        let xs: Vec<u32> = (0..16).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.next_u32()).collect();
        assert_eq!(xs, ys);
        assert_ne!(PcgRng::new(43).next_u32(), PcgRng::new(42).next_u32());
    }

    #[test]
    fn range_stays_in_bounds() {
        let mut rng = PcgRng::new(7);
        for _ in 0..1000 {
            let v = rng.range(-3, 5);
            assert!((-3..=5).contains(&v));
        }
        assert_eq!(rng.range(4, 4), 4);
    }

    #[test]
    fn x_in_y_edges() {
        let mut rng = PcgRng::new(1);
        assert!(!rng.x_in_y(0.0, 1.0));
        assert!(rng.x_in_y(1.0, 1.0));
    }

    #[test]
    fn dice_sum_is_bounded() {
        let mut rng = PcgRng::new(9);
        for _ in 0..200 {
            let v = rng.dice(3, 6);
            assert!((3..=18).contains(&v));
        }
        assert_eq!(rng.dice(3, 0), 0);
    }
}
