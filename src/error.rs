//! Errors raised when an entry does not satisfy the ordering contract.

use thiserror::Error;

/// Errors that can occur when inserting into a [`SkipList`][crate::SkipList].
///
/// Every check happens before the list is touched, so an `Err` always leaves
/// the list exactly as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The key cannot be compared with itself (for example a float `NaN`).
    #[error("key cannot be ordered.")]
    UnorderableKey,
    /// Value ordering is enabled and the value cannot be compared with itself.
    #[error("value cannot be ordered.")]
    UnorderableValue,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Error;

    #[test]
    fn display() {
        assert_eq!(Error::UnorderableKey.to_string(), "key cannot be ordered.");
        assert_eq!(
            Error::UnorderableValue.to_string(),
            "value cannot be ordered."
        );
    }
}
