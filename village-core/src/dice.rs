//! Probability rolls.
//!
//! Every roll takes its RNG explicitly so that a battle can be replayed
//! from a seed (tests use `StdRng::seed_from_u64`).

use rand::Rng;
use std::fmt;

/// A single uniform roll in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Roll(pub f64);

impl Roll {
    /// Roll with a specific RNG.
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Roll(rng.gen::<f64>())
    }

    /// True when the roll lands strictly below `chance`.
    pub fn under(self, chance: f64) -> bool {
        self.0 < chance
    }

    /// True when the roll lands strictly above `threshold`.
    pub fn over(self, threshold: f64) -> bool {
        self.0 > threshold
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Roll against a probability. Returns true with probability `chance`.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    Roll::with_rng(rng).under(chance)
}

/// Pick one element uniformly, or `None` for an empty slice.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.gen_range(0..items.len()))
}

/// Clamp a probability into `[0, 1]`.
pub fn clamp_probability(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

/// Scale a whole amount by a factor, flooring the result.
pub fn scale(base: u32, factor: f64) -> u32 {
    let scaled = (base as f64 * factor).floor();
    if scaled <= 0.0 {
        0
    } else {
        scaled as u32
    }
}
