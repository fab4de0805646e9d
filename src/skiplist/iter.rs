//! Borrowing iterators over the bottom level of a [`SkipList`].
//!
//! [`SkipList`]: crate::SkipList

use std::iter::FusedIterator;

use crate::{
    arena::Arena,
    skipnode::{Entry, NodeId, Nodes},
};

/// A double-ended walk over the inclusive stretch of bottom-level nodes
/// between `front` and `back`.
struct Span<'a, K, V> {
    /// Nodes of the list being walked.
    nodes: &'a Nodes<K, V>,
    /// Entries of the list being walked.
    entries: &'a Arena<Entry<K, V>>,
    /// Next node to yield from the front; `None` once exhausted.
    front: Option<NodeId<K, V>>,
    /// Next node to yield from the back; `None` once exhausted.
    back: Option<NodeId<K, V>>,
}

#[expect(
    clippy::indexing_slicing,
    reason = "A span only covers live nodes of a borrowed list"
)]
impl<'a, K, V> Span<'a, K, V> {
    /// The key and value carried by `node`.
    #[inline]
    fn item(&self, node: NodeId<K, V>) -> Option<(&'a K, &'a V)> {
        let nodes: &'a Nodes<K, V> = self.nodes;
        let entries: &'a Arena<Entry<K, V>> = self.entries;
        let entry = &entries[nodes[node].entry?];
        Some((&entry.key, &entry.value))
    }

    /// Yields the front node and advances past it.
    #[inline]
    fn next_front(&mut self) -> Option<(&'a K, &'a V)> {
        let node = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.nodes[node].right;
        }
        self.item(node)
    }

    /// Yields the back node and retreats past it.
    #[inline]
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        let node = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.nodes[node].left;
        }
        self.item(node)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Iter
// ////////////////////////////////////////////////////////////////////////////

/// An iterator over all entries of a [`SkipList`][crate::SkipList], in order.
///
/// Created by [`SkipList::iter`][crate::SkipList::iter].
pub struct Iter<'a, K, V> {
    /// The nodes still to visit.
    span: Span<'a, K, V>,
    /// Number of entries still to yield.
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Walks `len` entries from `first` to `last`.
    #[inline]
    pub(crate) fn new(
        nodes: &'a Nodes<K, V>,
        entries: &'a Arena<Entry<K, V>>,
        first: Option<NodeId<K, V>>,
        last: Option<NodeId<K, V>>,
        len: usize,
    ) -> Self {
        Iter {
            span: Span {
                nodes,
                entries,
                front: first,
                back: last,
            },
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.span.next_front()?;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.span.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// ////////////////////////////////////////////////////////////////////////////
// Range
// ////////////////////////////////////////////////////////////////////////////

/// An iterator over the entries whose keys fall in an inclusive range.
///
/// Created by [`SkipList::get_range`][crate::SkipList::get_range]. Its length
/// is not known up front; counting it walks the range.
pub struct Range<'a, K, V> {
    /// The nodes still to visit.
    span: Span<'a, K, V>,
}

impl<'a, K, V> Range<'a, K, V> {
    /// Walks the bottom level from `first` to `last`, both included.
    #[inline]
    pub(crate) fn new(
        nodes: &'a Nodes<K, V>,
        entries: &'a Arena<Entry<K, V>>,
        first: NodeId<K, V>,
        last: NodeId<K, V>,
    ) -> Self {
        Range {
            span: Span {
                nodes,
                entries,
                front: Some(first),
                back: Some(last),
            },
        }
    }

    /// A range yielding nothing.
    #[inline]
    pub(crate) fn empty(nodes: &'a Nodes<K, V>, entries: &'a Arena<Entry<K, V>>) -> Self {
        Range {
            span: Span {
                nodes,
                entries,
                front: None,
                back: None,
            },
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.span.next_front()
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.span.next_back()
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{SkipList, level_generator::Scripted};

    #[test]
    fn range_from_both_ends() {
        let list: SkipList<_, _> = (0..10).map(|x| (x, x * x)).collect();
        let mut range = list.get_range(&3, &6);
        assert_eq!(range.next(), Some((&3, &9)));
        assert_eq!(range.next_back(), Some((&6, &36)));
        assert_eq!(range.next_back(), Some((&5, &25)));
        assert_eq!(range.next(), Some((&4, &16)));
        assert_eq!(range.next(), None);
        assert_eq!(range.next_back(), None);
    }

    #[test]
    fn single_entry_range() {
        let mut list = SkipList::with_level_generator(Scripted::heights([3]));
        list.put("only", 1);
        let mut range = list.get_range(&"only", &"only");
        assert_eq!(range.next_back(), Some((&"only", &1)));
        assert_eq!(range.next(), None);
    }

    #[test]
    fn iter_len_tracks_consumption() {
        let list: SkipList<_, _> = "skiplist".chars().map(|c| (c, ())).collect();
        let mut iter = list.iter();
        assert_eq!(iter.len(), 8);
        iter.next();
        iter.next_back();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.map(|(c, _)| *c).collect::<String>(), "iklpss");
    }
}
