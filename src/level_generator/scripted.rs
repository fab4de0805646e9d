//! Deterministic level generator replaying a fixed sequence of coin flips.

use std::collections::VecDeque;

use crate::level_generator::LevelGenerator;

/// A level generator which replays a pre-recorded sequence of promotions.
///
/// Once the script runs out every further flip fails, so each subsequent
/// insertion produces a single-rung tower. This makes it possible to build
/// a list of an exact shape:
///
/// ```
/// use skipdict::{SkipList, level_generator::Scripted};
///
/// // `1` gets a single rung, `2` gets three rungs.
/// let mut list = SkipList::with_level_generator(Scripted::new([false, true, true, false]));
/// list.put(1, "a");
/// list.put(2, "b");
/// assert_eq!(list.height(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    /// Flips still to replay, front first.
    flips: VecDeque<bool>,
}

impl Scripted {
    /// Create a generator replaying `flips` in order.
    #[inline]
    pub fn new(flips: impl IntoIterator<Item = bool>) -> Self {
        Scripted {
            flips: flips.into_iter().collect(),
        }
    }

    /// Build the script which gives successive insertions towers of the given
    /// heights (each height counts the bottom rung, so `0` is treated as `1`).
    ///
    /// ```
    /// use skipdict::level_generator::{LevelGenerator, Scripted};
    ///
    /// let mut generator = Scripted::heights([1, 3]);
    /// assert!(!generator.promote());
    /// assert!(generator.promote());
    /// assert!(generator.promote());
    /// assert!(!generator.promote());
    /// ```
    #[inline]
    pub fn heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let mut flips = VecDeque::new();
        for height in heights {
            flips.extend(std::iter::repeat_n(true, height.saturating_sub(1)));
            flips.push_back(false);
        }
        Scripted { flips }
    }

    /// Number of flips left in the script.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.flips.len()
    }
}

impl LevelGenerator for Scripted {
    #[inline]
    fn promote(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{LevelGenerator, Scripted};

    #[test]
    fn replays_then_fails() {
        let mut generator = Scripted::new([true, false, true]);
        assert_eq!(generator.remaining(), 3);
        let flips: Vec<_> = (0..5).map(|_| generator.promote()).collect();
        assert_eq!(flips, [true, false, true, false, false]);
        assert_eq!(generator.remaining(), 0);
    }

    #[test]
    fn heights() {
        let generator = Scripted::heights([2, 0, 1, 4]);
        assert_eq!(
            generator.flips.into_iter().collect::<Vec<_>>(),
            [true, false, false, false, true, true, true, false]
        );
    }
}
