//! A skip list holding key-value entries in key order, duplicates included.
//!
//! The list is a stack of [`Level`]s. The bottom level holds every entry
//! exactly once, in ascending key order; each level above holds a random
//! subset of the one below, the rungs of one entry forming a tower:
//!
//! ```text
//! <head>-----[2]-----------------<tail>
//! <head>-----[2]---------[7]-----<tail>
//! <head>-[1]-[2]-[4]-[4]-[7]-[9]-<tail>
//! ```
//!
//! Every operation starts with the same layered search: scan right on the top
//! level while the next key is not greater than the target, drop down a level
//! when the scan stalls, and stop as soon as a rung with a matching key is
//! met (or the bottom level is exhausted).

use std::{cmp::Ordering, fmt, iter::successors, mem};

use crate::{
    arena::Arena,
    error::Error,
    level_generator::{Geometric, LevelGenerator},
    skipnode::{Entry, EntryId, Level, NodeId, Nodes},
};

mod iter;

pub use self::iter::{Iter, Range};

/// Comparison used to sub-order the values of duplicate keys.
type ValueOrder<V> = fn(&V, &V) -> Option<Ordering>;

/// `a` does not sort before `b`.
#[inline]
fn not_less<T: PartialOrd + ?Sized>(a: &T, b: &T) -> bool {
    a.partial_cmp(b) != Some(Ordering::Less)
}

/// Two keys are the same key when neither sorts before the other.
#[inline]
fn equivalent<T: PartialOrd + ?Sized>(a: &T, b: &T) -> bool {
    not_less(a, b) && not_less(b, a)
}

/// A key must at least be comparable with itself.
#[inline]
fn ordered_key<K: PartialOrd>(key: &K) -> Result<(), Error> {
    match key.partial_cmp(key) {
        Some(_) => Ok(()),
        None => Err(Error::UnorderableKey),
    }
}

/// Panicking form of [`ordered_key`] for the lookups, which have no error
/// channel.
#[inline]
#[expect(clippy::panic, reason = "Lookups have no error channel")]
fn expect_ordered_key<K: PartialOrd>(key: &K) {
    if let Err(err) = ordered_key(key) {
        panic!("{err}");
    }
}

/// Where the layered search stopped.
enum Search<K, V> {
    /// The list has no levels at all.
    Empty,
    /// A rung carrying the key, on the highest level the search reached it.
    Found {
        /// The matching rung.
        node: NodeId<K, V>,
        /// Level of `node`.
        level: usize,
    },
    /// No entry carries the key.
    Missed {
        /// The bottom-level node with the largest key below the target (the
        /// head sentinel if every key is larger).
        pred: NodeId<K, V>,
    },
}

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// An ordered multiset of key-value entries.
///
/// Keys only need [`PartialOrd`]: two keys are considered equal when neither
/// is less than the other, and a key that cannot be compared with itself
/// (such as `f64::NAN`) is rejected before the list is modified.
///
/// Several entries may share a key. By default, duplicates keep their
/// insertion order; with [`with_value_order`][SkipList::with_value_order]
/// they are kept sorted by value instead.
///
/// The height of every tower is decided by the [`LevelGenerator`] `G`, a fair
/// coin by default.
///
/// # Examples
///
/// ```
/// use skipdict::SkipList;
///
/// let mut list = SkipList::new();
/// list.put(2, "a");
/// list.put(3, "b");
/// list.put(2, "c");
/// assert_eq!(list.len(), 3);
///
/// assert_eq!(list.remove(&2), 2);
/// assert_eq!(list.iter().collect::<Vec<_>>(), [(&3, &"b")]);
/// ```
pub struct SkipList<K, V, G = Geometric> {
    /// Every rung of every level, sentinels included.
    nodes: Nodes<K, V>,
    /// One entry per tower.
    entries: Arena<Entry<K, V>>,
    /// `levels[0]` is the bottom level, the last one is the top.
    levels: Vec<Level<K, V>>,
    /// Number of entries.
    len: usize,
    /// Decides how tall new towers grow.
    level_generator: G,
    /// Sub-order for the values of duplicate keys, if enabled.
    value_order: Option<ValueOrder<V>>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipList<K, V> {
    /// Create an empty list whose towers are grown by a fair coin seeded from
    /// the thread-local entropy source.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let list: SkipList<i64, String> = SkipList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default())
    }
}

#[expect(
    clippy::indexing_slicing,
    reason = "Node handles held by the list always point at live nodes"
)]
impl<K, V, G> SkipList<K, V, G> {
    /// Create an empty list using `level_generator` to decide tower heights.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::{Geometric, SkipList};
    ///
    /// let generator = Geometric::seeded(0.25, 42).unwrap();
    /// let mut list = SkipList::with_level_generator(generator);
    /// list.put("k", 1);
    /// ```
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        SkipList {
            nodes: Nodes::new(),
            entries: Arena::new(),
            levels: Vec::new(),
            len: 0,
            level_generator,
            value_order: None,
        }
    }

    /// Keep entries sharing a key sorted by value, using `V`'s own ordering.
    ///
    /// Once enabled, [`get`][SkipList::get] on a duplicated key returns the
    /// smallest value, and inserting a value which cannot be compared with
    /// itself is an error.
    ///
    /// # Panics
    ///
    /// Panics if the list is not empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let mut list = SkipList::new().with_value_order();
    /// list.put(1, 'c');
    /// list.put(1, 'a');
    /// list.put(1, 'b');
    /// assert_eq!(list.get(&1), Some(&'a'));
    /// assert_eq!(list.values().collect::<String>(), "abc");
    /// ```
    #[inline]
    #[must_use]
    pub fn with_value_order(self) -> Self
    where
        V: PartialOrd,
    {
        self.with_value_order_by(V::partial_cmp)
    }

    /// Keep entries sharing a key sorted by value according to `order`.
    ///
    /// `order` must behave like [`PartialOrd::partial_cmp`] on a total order;
    /// a value for which `order(v, v)` is `None` is rejected.
    ///
    /// # Panics
    ///
    /// Panics if the list is not empty.
    #[inline]
    #[must_use]
    pub fn with_value_order_by(mut self, order: fn(&V, &V) -> Option<Ordering>) -> Self {
        assert!(self.is_empty(), "value order must be chosen before inserting");
        self.value_order = Some(order);
        self
    }

    /// Returns the number of entries in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.extend((0..10).map(|x| (x % 3, x)));
    /// assert_eq!(list.len(), 10);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in the list; `0` for an empty list.
    #[inline]
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Removes every entry and level.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entries.clear();
        self.levels.clear();
        self.len = 0;
    }

    /// The entry with the smallest key, or `None` if the list is empty.
    #[inline]
    pub fn first(&self) -> Option<(&K, &V)> {
        let bottom = self.levels.first()?;
        self.entry(bottom.first(&self.nodes)?)
            .map(|e| (&e.key, &e.value))
    }

    /// The entry with the largest key, or `None` if the list is empty.
    #[inline]
    pub fn last(&self) -> Option<(&K, &V)> {
        let bottom = self.levels.first()?;
        self.entry(bottom.last(&self.nodes)?)
            .map(|e| (&e.key, &e.value))
    }

    /// Iterates over every entry in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let list: SkipList<_, _> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    /// let keys: Vec<_> = list.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        let bottom = self.levels.first();
        Iter::new(
            &self.nodes,
            &self.entries,
            bottom.and_then(|level| level.first(&self.nodes)),
            bottom.and_then(|level| level.last(&self.nodes)),
            self.len,
        )
    }

    /// Iterates over the keys in ascending order.
    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates over the values in key order.
    #[inline]
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, v)| v)
    }

    /// Visits every entry in ascending key order (then value order, when
    /// enabled).
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let list: SkipList<_, _> = [(2, 20), (1, 10)].into_iter().collect();
    /// let mut sum = 0;
    /// list.traverse(|k, v| sum += k * v);
    /// assert_eq!(sum, 50);
    /// ```
    #[inline]
    pub fn traverse(&self, mut visit: impl FnMut(&K, &V)) {
        for (key, value) in self {
            visit(key, value);
        }
    }

    /// Visits every rung of every tower: towers from left to right, and the
    /// rungs of each tower from the bottom up, tagging each visit with the
    /// tower's index (starting at 0).
    ///
    /// The number of visits an entry receives is the height of its tower, so
    /// this exposes the random shape of the list; it is meant for diagnostics.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::{SkipList, level_generator::Scripted};
    ///
    /// let mut list = SkipList::with_level_generator(Scripted::heights([2, 1]));
    /// list.put('a', ());
    /// list.put('b', ());
    ///
    /// let mut visits = Vec::new();
    /// list.walk(|k, _, tower| visits.push((*k, tower)));
    /// assert_eq!(visits, [('a', 0), ('a', 0), ('b', 1)]);
    /// ```
    #[inline]
    pub fn walk(&self, mut visit: impl FnMut(&K, &V, usize)) {
        for (tower, bottom) in self.bottom_nodes().enumerate() {
            let mut rung = Some(bottom);
            while let Some(id) = rung {
                if let Some(entry) = self.entry(id) {
                    visit(&entry.key, &entry.value, tower);
                }
                rung = self.nodes[id].up;
            }
        }
    }

    // /////////////////////////////
    // Node helpers
    // /////////////////////////////

    /// The entry carried by `node`; `None` for a sentinel.
    #[inline]
    fn entry(&self, node: NodeId<K, V>) -> Option<&Entry<K, V>> {
        self.nodes[node].entry.map(|entry| &self.entries[entry])
    }

    /// The key carried by `node`; `None` for a sentinel.
    #[inline]
    fn key(&self, node: NodeId<K, V>) -> Option<&K> {
        self.entry(node).map(|entry| &entry.key)
    }

    /// Right neighbour on the same level, unless it is the tail sentinel.
    #[inline]
    fn right(&self, node: NodeId<K, V>) -> Option<NodeId<K, V>> {
        self.nodes[node]
            .right
            .filter(|&right| !self.nodes[right].is_sentinel())
    }

    /// Left neighbour on the same level, unless it is the head sentinel.
    #[inline]
    fn left(&self, node: NodeId<K, V>) -> Option<NodeId<K, V>> {
        self.nodes[node]
            .left
            .filter(|&left| !self.nodes[left].is_sentinel())
    }

    /// The bottom rung of the tower `node` belongs to.
    fn bottom_of(&self, mut node: NodeId<K, V>) -> NodeId<K, V> {
        while let Some(down) = self.nodes[node].down {
            node = down;
        }
        node
    }

    /// The top rung of the tower standing on `bottom`, and its level.
    fn top_of(&self, bottom: NodeId<K, V>) -> (NodeId<K, V>, usize) {
        let mut node = bottom;
        let mut level = 0;
        while let Some(up) = self.nodes[node].up {
            node = up;
            level += 1;
        }
        (node, level)
    }

    /// Bottom-level nodes from left to right.
    fn bottom_nodes(&self) -> impl Iterator<Item = NodeId<K, V>> + '_ {
        let first = self
            .levels
            .first()
            .and_then(|level| level.first(&self.nodes));
        successors(first, move |&node| self.right(node))
    }

    /// Number of rungs in the tower standing on `bottom`.
    fn tower_height(&self, bottom: NodeId<K, V>) -> usize {
        self.top_of(bottom).1 + 1
    }

    // /////////////////////////////
    // Level management
    // /////////////////////////////

    /// Add a new, empty top level.
    fn push_level(&mut self) {
        let level = Level::new(&mut self.nodes);
        if let Some(below) = self.levels.last() {
            level.stack_on(&mut self.nodes, below);
        }
        self.levels.push(level);
        #[cfg(feature = "tracing")]
        tracing::trace!(height = self.levels.len(), "skip list grew a level");
    }

    /// Drop empty levels from the top so the top level always holds a rung.
    fn prune(&mut self) {
        while self
            .levels
            .last()
            .is_some_and(|level| level.is_empty())
        {
            if let Some(level) = self.levels.pop() {
                level.destroy(&mut self.nodes);
                #[cfg(feature = "tracing")]
                tracing::trace!(height = self.levels.len(), "skip list pruned an empty level");
            }
        }
    }

    /// Unlink every rung of the tower whose top rung is `top` (on `level`),
    /// release its entry and prune emptied levels.
    ///
    /// Returns the entry-carrying bottom-level neighbours the tower had.
    fn destroy_tower(
        &mut self,
        top: NodeId<K, V>,
        mut level: usize,
    ) -> (Option<NodeId<K, V>>, Option<NodeId<K, V>>) {
        let mut rung = Some(top);
        let mut released = None;
        let mut neighbours = (None, None);
        while let Some(id) = rung {
            let node = self.levels[level].unlink(&mut self.nodes, id);
            released = node.entry;
            if level == 0 {
                // Captured before pruning: the sentinels may go with the level.
                neighbours = (
                    node.left.filter(|&left| !self.nodes[left].is_sentinel()),
                    node.right.filter(|&right| !self.nodes[right].is_sentinel()),
                );
                break;
            }
            rung = node.down;
            level -= 1;
        }
        if let Some(entry) = released {
            self.entries.remove(entry);
        }
        self.len -= 1;
        self.prune();
        neighbours
    }
}

#[expect(
    clippy::indexing_slicing,
    reason = "Node handles held by the list always point at live nodes"
)]
impl<K, V, G> SkipList<K, V, G>
where
    K: PartialOrd,
{
    /// The layered search shared by every operation.
    fn search(&self, key: &K) -> Search<K, V> {
        let Some(mut level) = self.levels.len().checked_sub(1) else {
            return Search::Empty;
        };
        let mut node = self.levels[level].head;
        loop {
            while let Some(next) = self.right(node) {
                match self.key(next) {
                    Some(next_key) if not_less(key, next_key) => node = next,
                    _ => break,
                }
            }
            if self.key(node).is_some_and(|found| equivalent(found, key)) {
                return Search::Found { node, level };
            }
            if level == 0 {
                return Search::Missed { pred: node };
            }
            level -= 1;
            node = self.nodes[node].down.unwrap_or(self.levels[level].head);
        }
    }

    /// Returns `node`'s entry if it carries `key`.
    fn entry_with_key(&self, node: NodeId<K, V>, key: &K) -> Option<&Entry<K, V>> {
        self.entry(node).filter(|entry| equivalent(&entry.key, key))
    }

    /// Rejects a value the configured value order cannot compare.
    fn ordered_value(&self, value: &V) -> Result<(), Error> {
        match self.value_order {
            Some(order) if order(value, value).is_none() => Err(Error::UnorderableValue),
            _ => Ok(()),
        }
    }

    /// Returns a value stored under `key`, or `None` if there is none.
    ///
    /// When several entries share the key and value order is enabled, the
    /// smallest value is returned. Without value order, which of the
    /// duplicates is returned depends on the random shape of the list.
    ///
    /// # Panics
    ///
    /// Panics if `key` cannot be compared with itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// assert_eq!(list.get(&1), None);
    /// list.put(1, "one");
    /// assert_eq!(list.get(&1), Some(&"one"));
    /// ```
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        expect_ordered_key(key);
        let Search::Found { node, .. } = self.search(key) else {
            return None;
        };
        let Some(order) = self.value_order else {
            return self.entry(node).map(|entry| &entry.value);
        };
        let mut bottom = self.bottom_of(node);
        while let Some(left) = self.left(bottom) {
            let Some(left_entry) = self.entry_with_key(left, key) else {
                break;
            };
            let Some(entry) = self.entry(bottom) else {
                break;
            };
            match order(&left_entry.value, &entry.value) {
                Some(Ordering::Less | Ordering::Equal) => bottom = left,
                _ => break,
            }
        }
        self.entry(bottom).map(|entry| &entry.value)
    }

    /// Returns `true` if at least one entry carries `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` cannot be compared with itself.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        expect_ordered_key(key);
        matches!(self.search(key), Search::Found { .. })
    }

    /// Number of entries carrying `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` cannot be compared with itself.
    #[inline]
    pub fn count(&self, key: &K) -> usize {
        self.get_range(key, key).count()
    }

    /// Iterates over the entries with `start <= key <= end`, in order.
    ///
    /// The range is empty when `start > end`.
    ///
    /// # Panics
    ///
    /// Panics if either bound cannot be compared with itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let list: SkipList<_, _> = [1, 4, 7, 9, 11].into_iter().map(|k| (k, ())).collect();
    /// let keys: Vec<_> = list.get_range(&1, &5).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 4]);
    /// assert_eq!(list.get_range(&5, &1).count(), 0);
    /// ```
    #[inline]
    pub fn get_range(&self, start: &K, end: &K) -> Range<'_, K, V> {
        expect_ordered_key(start);
        expect_ordered_key(end);
        let first = match self.search(start) {
            Search::Empty => None,
            Search::Found { node, .. } => {
                let mut bottom = self.bottom_of(node);
                while let Some(left) = self
                    .left(bottom)
                    .filter(|&left| self.key(left).is_some_and(|key| not_less(key, start)))
                {
                    bottom = left;
                }
                Some(bottom)
            }
            Search::Missed { pred } => self.right(pred),
        };
        let last = match self.search(end) {
            Search::Empty => None,
            Search::Found { node, .. } => {
                let mut bottom = self.bottom_of(node);
                while let Some(right) = self
                    .right(bottom)
                    .filter(|&right| self.key(right).is_some_and(|key| not_less(end, key)))
                {
                    bottom = right;
                }
                Some(bottom)
            }
            Search::Missed { pred } => Some(pred).filter(|&id| !self.nodes[id].is_sentinel()),
        };
        match (first, last) {
            (Some(first), Some(last))
                if self
                    .key(first)
                    .zip(self.key(last))
                    .is_some_and(|(lo, hi)| not_less(hi, lo)) =>
            {
                Range::new(&self.nodes, &self.entries, first, last)
            }
            _ => Range::empty(&self.nodes, &self.entries),
        }
    }

    /// Removes every entry carrying `key` and returns how many there were.
    ///
    /// # Panics
    ///
    /// Panics if `key` cannot be compared with itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let mut list: SkipList<_, _> = [(1, 'a'), (2, 'b'), (1, 'c')].into_iter().collect();
    /// assert_eq!(list.remove(&1), 2);
    /// assert_eq!(list.remove(&1), 0);
    /// assert_eq!(list.len(), 1);
    /// ```
    #[inline]
    pub fn remove(&mut self, key: &K) -> usize {
        expect_ordered_key(key);
        let Search::Found { node, level } = self.search(key) else {
            return 0;
        };
        let (mut left, mut right) = self.destroy_tower(node, level);
        let mut removed = 1;
        while let Some(bottom) = left.filter(|&id| self.entry_with_key(id, key).is_some()) {
            let (top, top_level) = self.top_of(bottom);
            left = self.destroy_tower(top, top_level).0;
            removed += 1;
        }
        while let Some(bottom) = right.filter(|&id| self.entry_with_key(id, key).is_some()) {
            let (top, top_level) = self.top_of(bottom);
            right = self.destroy_tower(top, top_level).1;
            removed += 1;
        }
        #[cfg(feature = "tracing")]
        if removed > 1 {
            tracing::debug!(removed, len = self.len, "removed duplicate entries");
        }
        removed
    }
}

#[expect(
    clippy::indexing_slicing,
    reason = "The bottom level exists once a landing position is known"
)]
impl<K, V, G> SkipList<K, V, G>
where
    K: PartialOrd,
    G: LevelGenerator,
{
    /// Inserts an entry, keeping any existing entries with the same key.
    ///
    /// # Panics
    ///
    /// Panics if the key (or, with value order enabled, the value) cannot be
    /// compared with itself. Use [`try_put`][SkipList::try_put] to handle this
    /// as an error instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.put(1, "Hello");
    /// list.put(1, "World");
    /// assert_eq!(list.len(), 2);
    /// ```
    #[inline]
    #[expect(clippy::panic, reason = "Use `try_put` to handle unorderable entries")]
    pub fn put(&mut self, key: K, value: V) {
        if let Err(err) = self.try_put(key, value) {
            panic!("{err}");
        }
    }

    /// Inserts an entry, keeping any existing entries with the same key.
    ///
    /// # Errors
    ///
    /// Fails without modifying the list if the key (or, with value order
    /// enabled, the value) cannot be compared with itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::{Error, SkipList};
    ///
    /// let mut list = SkipList::new();
    /// assert_eq!(list.try_put(f64::NAN, ()), Err(Error::UnorderableKey));
    /// assert_eq!(list.try_put(1.5, ()), Ok(()));
    /// ```
    #[inline]
    pub fn try_put(&mut self, key: K, value: V) -> Result<(), Error> {
        ordered_key(&key)?;
        self.ordered_value(&value)?;
        let landing = self.search(&key);
        self.insert(key, value, landing);
        Ok(())
    }

    /// Inserts an entry, overwriting the entry already stored under `key` if
    /// there is one, and returns the previous value.
    ///
    /// This is meant for lists where each key is unique. If `key` has been
    /// [`put`][SkipList::put] several times, only one of its entries is
    /// overwritten.
    ///
    /// # Panics
    ///
    /// Panics if the key (or, with value order enabled, the value) cannot be
    /// compared with itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipdict::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// assert_eq!(list.replace(100, "v1"), None);
    /// assert_eq!(list.replace(100, "v2"), Some("v1"));
    /// assert_eq!(list.len(), 1);
    /// assert_eq!(list.get(&100), Some(&"v2"));
    /// ```
    #[inline]
    #[expect(clippy::panic, reason = "Use `try_replace` to handle unorderable entries")]
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        match self.try_replace(key, value) {
            Ok(old) => old,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`replace`][SkipList::replace].
    ///
    /// # Errors
    ///
    /// Fails without modifying the list if the key (or, with value order
    /// enabled, the value) cannot be compared with itself.
    #[inline]
    pub fn try_replace(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        ordered_key(&key)?;
        self.ordered_value(&value)?;
        let landing = self.search(&key);
        if let Search::Found { node, .. } = landing {
            if let Some(entry) = self.nodes[node].entry {
                let old = mem::replace(&mut self.entries[entry], Entry { key, value });
                return Ok(Some(old.value));
            }
        }
        self.insert(key, value, landing);
        Ok(None)
    }

    /// Link a new tower for `key` at the position found by `landing`.
    fn insert(&mut self, key: K, value: V, landing: Search<K, V>) {
        let pred = match landing {
            Search::Empty => {
                self.push_level();
                self.levels[0].head
            }
            Search::Missed { pred } => pred,
            Search::Found { node, .. } => self.duplicate_pred(self.bottom_of(node), &key, &value),
        };
        let entry = self.entries.insert(Entry { key, value });
        let bottom = self.levels[0].insert_after(&mut self.nodes, pred, entry, None);
        self.len += 1;
        self.grow_tower(bottom, entry);
    }

    /// Choose the bottom-level node a new duplicate of `key` goes after,
    /// starting from `landed`, a bottom rung already carrying the key.
    ///
    /// With value order, the new entry is spliced among the neighbouring
    /// duplicates so their values stay ascending; otherwise it goes after the
    /// last duplicate.
    fn duplicate_pred(&self, landed: NodeId<K, V>, key: &K, value: &V) -> NodeId<K, V> {
        let sorts_before = |node: NodeId<K, V>| {
            self.value_order
                .zip(self.entry(node))
                .is_some_and(|(order, entry)| order(value, &entry.value) == Some(Ordering::Less))
        };
        if sorts_before(landed) {
            let mut node = landed;
            while let Some(left) = self
                .left(node)
                .filter(|&left| self.entry_with_key(left, key).is_some() && sorts_before(left))
            {
                node = left;
            }
            return self.nodes[node].left.unwrap_or(self.levels[0].head);
        }
        let mut node = landed;
        while let Some(right) = self
            .right(node)
            .filter(|&right| {
                self.entry_with_key(right, key).is_some() && !sorts_before(right)
            })
        {
            node = right;
        }
        node
    }

    /// Flip the promotion coin until it fails, adding one rung on top of
    /// `bottom` per success.
    fn grow_tower(&mut self, bottom: NodeId<K, V>, entry: EntryId<K, V>) {
        let mut below = bottom;
        let mut level = 1;
        while self.level_generator.promote() {
            if level == self.levels.len() {
                self.push_level();
            }
            let pred = self.pred_above(below, level);
            below = self.levels[level].insert_after(&mut self.nodes, pred, entry, Some(below));
            level += 1;
        }
    }

    /// The node on `level` after which a rung stacked on `below` belongs: the
    /// nearest node left of `below` which reaches up to `level`.
    fn pred_above(&self, below: NodeId<K, V>, level: usize) -> NodeId<K, V> {
        let mut cursor = self.nodes[below].left;
        while let Some(id) = cursor {
            if let Some(up) = self.nodes[id].up {
                return up;
            }
            cursor = self.nodes[id].left;
        }
        self.levels[level].head
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K, V> Default for SkipList<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Two lists are equal when they hold the same entries in the same order;
/// their shapes and level generators are not compared.
impl<AK, AV, AG, BK, BV, BG> PartialEq<SkipList<BK, BV, BG>> for SkipList<AK, AV, AG>
where
    AK: PartialEq<BK>,
    AV: PartialEq<BV>,
{
    #[inline]
    fn eq(&self, other: &SkipList<BK, BV, BG>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.0 == b.0 && a.1 == b.1)
    }
}

impl<K: Eq, V: Eq, G> Eq for SkipList<K, V, G> {}

impl<K, V, G> Extend<(K, V)> for SkipList<K, V, G>
where
    K: PartialOrd,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.put(key, value);
        }
    }
}

impl<K: PartialOrd, V> FromIterator<(K, V)> for SkipList<K, V> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<'a, K, V, G> IntoIterator for &'a SkipList<K, V, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, G> fmt::Debug for SkipList<K, V, G> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Draws the levels of the list, top level first, one column per tower.
///
/// ```
/// use skipdict::{SkipList, level_generator::Scripted};
///
/// let mut list = SkipList::with_level_generator(Scripted::heights([1, 2]));
/// list.put(1, ());
/// list.put(2, ());
/// assert_eq!(list.to_string(), "<head>-----[2]-<tail>\n<head>-[1]-[2]-<tail>");
/// ```
impl<K: fmt::Display, V, G> fmt::Display for SkipList<K, V, G> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<(String, usize)> = self
            .bottom_nodes()
            .filter_map(|node| {
                let key = self.key(node)?;
                Some((format!("[{key}]"), self.tower_height(node)))
            })
            .collect();
        for level in (0..self.levels.len()).rev() {
            f.write_str("<head>")?;
            for (label, height) in &columns {
                f.write_str("-")?;
                if *height > level {
                    f.write_str(label)?;
                } else {
                    f.write_str(&"-".repeat(label.chars().count()))?;
                }
            }
            f.write_str("-<tail>")?;
            if level > 0 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

// ///////////////////////////////////////////////
// Internal checks
// ///////////////////////////////////////////////

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "The walk follows live links only")]
impl<K, V, G> SkipList<K, V, G>
where
    K: PartialOrd + fmt::Debug,
{
    /// Checks every structural invariant of the list.
    pub(crate) fn check(&self) {
        use pretty_assertions::assert_eq;

        if self.len == 0 {
            assert!(self.levels.is_empty(), "empty list still has levels");
            assert_eq!(self.entries.len(), 0);
            assert_eq!(self.nodes.len(), 0);
            return;
        }
        let top = self.levels.last().expect("non-empty list has levels");
        assert!(!top.is_empty(), "top level is empty");
        assert_eq!(self.levels[0].len(), self.len);
        assert_eq!(self.entries.len(), self.len);

        let mut total_nodes = 0;
        for (height, level) in self.levels.iter().enumerate() {
            total_nodes += level.len() + 2;
            let mut prev = level.head;
            let mut cursor = self.nodes[level.head].right.expect("head links right");
            let mut count = 0;
            while cursor != level.tail {
                let node = &self.nodes[cursor];
                assert_eq!(node.left, Some(prev));
                let entry = node.entry.expect("inner node carries an entry");
                if let Some(prev_key) = self.key(prev) {
                    assert!(
                        not_less(&self.entries[entry].key, prev_key),
                        "level {height} out of order: {prev_key:?} before {:?}",
                        self.entries[entry].key
                    );
                }
                if height == 0 {
                    assert_eq!(node.down, None);
                } else {
                    let down = node.down.expect("upper rung stands on a lower rung");
                    assert_eq!(self.nodes[down].up, Some(cursor));
                    assert_eq!(self.nodes[down].entry, Some(entry));
                }
                if let Some(up) = node.up {
                    assert_eq!(self.nodes[up].down, Some(cursor));
                }
                prev = cursor;
                cursor = node.right.expect("inner node links right");
                count += 1;
            }
            assert_eq!(self.nodes[level.tail].left, Some(prev));
            assert_eq!(count, level.len());
        }
        assert_eq!(self.nodes.len(), total_nodes);

        if let Some(order) = self.value_order {
            let entries: Vec<_> = self.iter().collect();
            for pair in entries.windows(2) {
                if equivalent(pair[0].0, pair[1].0) {
                    assert_ne!(order(pair[0].1, pair[1].1), Some(Ordering::Greater));
                }
            }
        }
    }
}
