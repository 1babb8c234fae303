//! Injectable randomness for template selection and follow-up chance

use std::collections::VecDeque;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the two kinds of draws the interview makes
pub trait RandomSource {
    /// Uniform draw in [0, 1)
    fn chance(&mut self) -> f64;

    /// Uniform index in [0, len); `len` is never 0
    fn index(&mut self, len: usize) -> usize;
}

/// Pick one item uniformly; `None` for an empty slice
pub fn choose<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.index(items.len()))
}

/// `StdRng`-backed source, seedable for reproducible runs
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, otherwise from entropy
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map(Self::from_seed).unwrap_or_else(Self::from_entropy)
    }
}

impl RandomSource for SeededRandom {
    fn chance(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Scripted draws for tests
///
/// Queued values are consumed in order. Once a queue runs dry, `chance`
/// returns 0.99 (the random follow-up never fires) and `index` returns 0.
#[derive(Debug, Clone, Default)]
pub struct FixedDraws {
    chances: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl FixedDraws {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = f64>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }
}

impl RandomSource for FixedDraws {
    fn chance(&mut self) -> f64 {
        self.chances.pop_front().unwrap_or(0.99)
    }

    fn index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededRandom::from_seed(7);
        let mut b = SeededRandom::from_seed(7);
        for _ in 0..20 {
            assert_eq!(a.index(10), b.index(10));
            assert_eq!(a.chance(), b.chance());
        }
    }

    #[test]
    fn test_fixed_draws_queue_then_default() {
        let mut draws = FixedDraws::new().with_indices([2, 5]).with_chances([0.1]);
        assert_eq!(draws.index(3), 2);
        assert_eq!(draws.index(3), 2); // 5 % 3
        assert_eq!(draws.index(3), 0);
        assert_eq!(draws.chance(), 0.1);
        assert_eq!(draws.chance(), 0.99);
    }

    #[test]
    fn test_choose_empty() {
        let mut draws = FixedDraws::new();
        let empty: [&str; 0] = [];
        assert!(choose(&mut draws, &empty).is_none());
        assert_eq!(choose(&mut draws, &["a", "b"]), Some(&"a"));
    }
}
