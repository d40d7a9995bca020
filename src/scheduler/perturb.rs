use rand::prelude::*;

use crate::core::Priority;

/// Random decisions made by the dynamic-priority criterion. Swappable so tests
/// can pin them.
pub trait Perturber {
    /// Index in `0..window_len` of the candidate whose priority changes.
    fn pick(&mut self, window_len: usize) -> usize;

    /// Replacement priority, expected within `perturbation_bounds(current)`.
    fn reprioritize(&mut self, current: Priority) -> Priority;
}

/// Inclusive range `[current / 2, current * 2 + 1]`, reordered when a negative
/// priority flips it.
pub fn perturbation_bounds(current: Priority) -> (Priority, Priority) {
    let low = current / 2;
    let high = current.saturating_mul(2).saturating_add(1);
    (low.min(high), low.max(high))
}

#[derive(Debug, Clone)]
pub struct SeededPerturber {
    rng: StdRng,
}

impl SeededPerturber {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Perturber for SeededPerturber {
    fn pick(&mut self, window_len: usize) -> usize {
        if window_len == 0 {
            return 0;
        }
        self.rng.random_range(0..window_len)
    }

    fn reprioritize(&mut self, current: Priority) -> Priority {
        let (low, high) = perturbation_bounds(current);
        self.rng.random_range(low..=high)
    }
}

/// Always picks the window front and leaves its priority unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrozenPerturber;

impl Perturber for FrozenPerturber {
    fn pick(&mut self, _window_len: usize) -> usize {
        0
    }

    fn reprioritize(&mut self, current: Priority) -> Priority {
        current
    }
}
