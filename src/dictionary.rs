//! The minimal multiset-dictionary interface.

use crate::{SkipList, level_generator::LevelGenerator};

/// A dictionary which may hold several values under one key.
///
/// This is the common surface of [`SkipList`] that callers generic over the
/// backing store can rely on.
///
/// # Examples
///
/// ```
/// use skipdict::{Dictionary, SkipList};
///
/// fn record<D: Dictionary<&'static str, u32>>(dict: &mut D) {
///     dict.put("hits", 1);
///     dict.put("hits", 2);
/// }
///
/// let mut list = SkipList::new();
/// record(&mut list);
/// assert_eq!(Dictionary::remove(&mut list, &"hits"), 2);
/// ```
pub trait Dictionary<K, V> {
    /// Stores an entry, keeping entries already stored under the same key.
    fn put(&mut self, key: K, value: V);

    /// Returns a value stored under `key`.
    fn get(&self, key: &K) -> Option<&V>;

    /// Removes every entry stored under `key`, returning how many there were.
    fn remove(&mut self, key: &K) -> usize;
}

impl<K, V, G> Dictionary<K, V> for SkipList<K, V, G>
where
    K: PartialOrd,
    G: LevelGenerator,
{
    #[inline]
    fn put(&mut self, key: K, value: V) {
        SkipList::put(self, key, value);
    }

    #[inline]
    fn get(&self, key: &K) -> Option<&V> {
        SkipList::get(self, key)
    }

    #[inline]
    fn remove(&mut self, key: &K) -> usize {
        SkipList::remove(self, key)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Dictionary;
    use crate::SkipList;

    fn exercise<D: Dictionary<u16, char> + ?Sized>(
        dict: &mut D,
    ) -> (Option<char>, usize, Option<char>) {
        dict.put(7, 'x');
        dict.put(3, 'y');
        dict.put(7, 'z');
        let before = dict.get(&3).copied();
        let removed = dict.remove(&7);
        (before, removed, dict.get(&7).copied())
    }

    #[test]
    fn skiplist_is_a_dictionary() {
        let mut list = SkipList::new();
        assert_eq!(exercise(&mut list), (Some('y'), 2, None));
        assert_eq!(list.len(), 1);

        let mut boxed: Box<dyn Dictionary<u16, char>> = Box::new(SkipList::new());
        assert_eq!(exercise(boxed.as_mut()), (Some('y'), 2, None));
    }
}
