//! Towers grow one rung at a time: after a new entry lands on the bottom
//! level, the list keeps asking a [`LevelGenerator`] whether the tower should
//! be promoted to the next level, and stops at the first refusal.
//!
//! With a fair coin this produces a geometric distribution of tower heights
//! (mean height 2, expected maximum height `$O(\log n)$`), which is what the
//! default [`Geometric`] generator does.
//!
//! The generator is injectable so that tests (or callers who want a
//! reproducible shape) can replace the entropy source, either with a seeded
//! [`Geometric`] or with a [`Scripted`] sequence of coin flips.

pub mod geometric;
pub mod scripted;

pub use self::geometric::{Geometric, GeometricError};
pub use self::scripted::Scripted;

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Decides, one round at a time, whether a freshly inserted tower grows
/// another rung.
pub trait LevelGenerator {
    /// Flip the promotion coin once.
    ///
    /// Returning `true` adds one more rung to the tower being built (creating
    /// a new top level if needed); returning `false` ends the tower.
    #[must_use]
    fn promote(&mut self) -> bool;
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for &mut G {
    #[inline]
    fn promote(&mut self) -> bool {
        (**self).promote()
    }
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for Box<G> {
    #[inline]
    fn promote(&mut self) -> bool {
        (**self).promote()
    }
}

#[cfg(test)]
mod tests {
    use super::{LevelGenerator, Scripted};

    #[test]
    fn boxed_generator_forwards() {
        let mut generator: Box<dyn LevelGenerator> = Box::new(Scripted::new([true, false]));
        assert!(generator.promote());
        assert!(!generator.promote());
    }

    fn flip<G: LevelGenerator>(mut generator: G) -> bool {
        generator.promote()
    }

    #[test]
    fn borrowed_generator_forwards() {
        let mut scripted = Scripted::new([true]);
        assert!(flip(&mut scripted));
        assert!(!flip(&mut scripted));
    }
}
