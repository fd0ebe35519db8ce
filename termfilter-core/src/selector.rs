//! selector.rs - Picks one substitution out of a term's candidates.
//!
//! License: MIT OR APACHE 2.0

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Chooses an index into a non-empty list of candidates.
pub trait SubstitutionSelector: Send + Sync + fmt::Debug {
    /// `candidates` is always at least 1; the result must be below it.
    fn select(&self, candidates: usize) -> usize;
}

/// Uniform choice backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl SubstitutionSelector for RandomSelector {
    fn select(&self, candidates: usize) -> usize {
        if candidates <= 1 {
            0
        } else {
            rand::rng().random_range(0..candidates)
        }
    }
}

/// Uniform choice from a seeded generator, for reproducible runs.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl SubstitutionSelector for SeededSelector {
    fn select(&self, candidates: usize) -> usize {
        if candidates <= 1 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..candidates)
    }
}

/// Always the same position, clamped to the candidate count.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl SubstitutionSelector for FixedSelector {
    fn select(&self, candidates: usize) -> usize {
        self.0.min(candidates.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_candidate_is_deterministic() {
        assert_eq!(RandomSelector.select(1), 0);
        assert_eq!(SeededSelector::new(7).select(1), 0);
    }

    #[test]
    fn test_seeded_selector_is_reproducible() {
        let a = SeededSelector::new(42);
        let b = SeededSelector::new(42);
        let left: Vec<usize> = (0..16).map(|_| a.select(5)).collect();
        let right: Vec<usize> = (0..16).map(|_| b.select(5)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|&i| i < 5));
    }

    #[test]
    fn test_fixed_selector_clamps() {
        assert_eq!(FixedSelector(3).select(2), 1);
        assert_eq!(FixedSelector(0).select(4), 0);
    }
}
