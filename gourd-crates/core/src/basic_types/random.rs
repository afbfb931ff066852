use std::fmt::Debug;
use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;

#[cfg(doc)]
use crate::branching::value_selection::InDomainRandom;

/// The source of randomness of the branching heuristics, e.g. the [`InDomainRandom`] value
/// selector.
///
/// Every search worker owns its own generator, seeded from the solver parameters and the worker
/// index, so a run is reproducible for a fixed seed and worker count.
pub trait Random: Debug {
    /// Generates a random usize in the range `[range.start, range.end)` with equal probability.
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize;

    /// Generates a random i64 in the inclusive range `[lower, upper]` with equal probability.
    fn generate_i64_in_range(&mut self, lower: i64, upper: i64) -> i64;
}

impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        self.gen_range(range)
    }

    fn generate_i64_in_range(&mut self, lower: i64, upper: i64) -> i64 {
        self.gen_range(lower..=upper)
    }
}
