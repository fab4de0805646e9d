//! Geometric level generator.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::level_generator::LevelGenerator;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator flipping a biased coin for every promotion round.
///
/// Each round succeeds independently with probability `$p$`, so a tower
/// reaches height `$h$` with probability `$p^{h-1}$`. The heights follow a
/// geometric distribution with mean `$1 / (1 - p)$`; with the default
/// `$p = 1/2$` the mean tower height is 2.
///
/// Unlike a capped generator, there is no maximum height: the number of
/// levels grows as the list needs them.
#[derive(Debug, Clone)]
pub struct Geometric {
    /// The probability that a tower is promoted one more level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// The promotion probability used by [`SkipList::new`][crate::SkipList::new].
    pub const DEFAULT_P: f64 = 0.5;

    /// Create a new geometric level generator with `p` as the probability
    /// that a tower is promoted once more, seeded from the thread-local
    /// entropy source.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1.
    #[inline]
    pub fn new(p: f64) -> Result<Self, GeometricError> {
        Self::with_rng(p, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Create a geometric level generator with a fixed seed, producing the same
    /// sequence of promotions (and therefore the same list shape) on every run.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1.
    #[inline]
    pub fn seeded(p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::with_rng(p, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(p: f64, rng: SmallRng) -> Result<Self, GeometricError> {
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(Geometric { p, rng })
    }

    /// The probability that a tower is promoted one more level.
    #[inline]
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Default for Geometric {
    /// A fair coin seeded from the thread-local entropy source.
    #[inline]
    fn default() -> Self {
        Geometric {
            p: Self::DEFAULT_P,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn promote(&mut self) -> bool {
        self.rng.random::<f64>() < self.p
    }
}
