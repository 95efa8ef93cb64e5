use std::collections::VecDeque;

use crate::env::{PcgRng, RngOracle};

/// RNG that returns queued unit values first, then falls back to PCG.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    units: VecDeque<f64>,
    fallback: PcgRng,
}

impl ScriptedRng {
    pub fn new(seed: u64) -> Self {
        Self {
            units: VecDeque::new(),
            fallback: PcgRng::new(seed),
        }
    }

    /// Queues unit draws in `[0, 1)` consumed in order.
    pub fn with_units(units: impl IntoIterator<Item = f64>) -> Self {
        let mut rng = Self::new(0);
        rng.units.extend(units);
        rng
    }

    pub fn push(&mut self, unit: f64) {
        self.units.push_back(unit);
    }

    /// Unit draw that makes `range(lo, hi)` return `value`.
    pub fn unit_for(lo: i32, hi: i32, value: i32) -> f64 {
        let span = (hi - lo + 1) as f64;
        ((value - lo) as f64 + 0.5) / span
    }

    pub fn remaining(&self) -> usize {
        self.units.len()
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        match self.units.pop_front() {
            Some(unit) => (unit.clamp(0.0, 1.0 - f64::EPSILON) * (u32::MAX as f64 + 1.0)) as u32,
            None => self.fallback.next_u32(),
        }
    }

    fn unit(&mut self) -> f64 {
        match self.units.pop_front() {
            Some(unit) => unit.clamp(0.0, 1.0 - f64::EPSILON),
            None => self.fallback.unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_for_hits_value() {
        let mut rng = ScriptedRng::with_units([
            ScriptedRng::unit_for(0, 10, 7),
            ScriptedRng::unit_for(-5, 5, -5),
        ]);
        assert_eq!(rng.range(0, 10), 7);
        assert_eq!(rng.range(-5, 5), -5);
        assert_eq!(rng.remaining(), 0);
    }
}
