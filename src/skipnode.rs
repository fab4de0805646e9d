//! Rungs and levels: the primitives the skip list is assembled from.
//!
//! A [`Level`] is a doubly linked sequence of [`SkipNode`]s bounded by a head
//! and a tail sentinel. A node above the bottom level is additionally linked
//! `down` to the rung of the same tower on the level below, which links back
//! `up`; those vertical chains are the towers.
//!
//! Nodes do not own their entry. All rungs of a tower share a single
//! [`Entry`] stored once in the list's entry arena, so the rungs of a tower
//! always carry an identical entry and overwriting it in place updates the
//! whole tower.

use crate::arena::{Arena, Handle};

/// A key-value pair stored in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(
    clippy::field_scoped_visibility_modifiers,
    reason = "Plain data shared with the list and its iterators"
)]
pub(crate) struct Entry<K, V> {
    /// The ordering key.
    pub(crate) key: K,
    /// The payload.
    pub(crate) value: V,
}

/// Handle to an [`Entry`] in the list's entry arena.
pub(crate) type EntryId<K, V> = Handle<Entry<K, V>>;
/// Handle to a [`SkipNode`] in the list's node arena.
pub(crate) type NodeId<K, V> = Handle<SkipNode<K, V>>;
/// The arena owning every node of a list.
pub(crate) type Nodes<K, V> = Arena<SkipNode<K, V>>;

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// One rung of a tower.
///
/// The links are non-owning: the arena owns every node, and the level the
/// node belongs to is responsible for keeping `left`/`right` consistent.
#[expect(
    clippy::field_scoped_visibility_modifiers,
    reason = "The list walks links directly"
)]
pub(crate) struct SkipNode<K, V> {
    /// The shared entry; only the head and tail sentinels have none.
    pub(crate) entry: Option<EntryId<K, V>>,
    /// Previous node on the same level.
    pub(crate) left: Option<NodeId<K, V>>,
    /// Next node on the same level.
    pub(crate) right: Option<NodeId<K, V>>,
    /// Rung of the same tower one level up.
    pub(crate) up: Option<NodeId<K, V>>,
    /// Rung of the same tower one level down.
    pub(crate) down: Option<NodeId<K, V>>,
}

impl<K, V> SkipNode<K, V> {
    /// An unlinked node without entry.
    fn sentinel() -> Self {
        SkipNode {
            entry: None,
            left: None,
            right: None,
            up: None,
            down: None,
        }
    }

    /// Returns `true` for the head and tail sentinels of a level.
    #[inline]
    pub(crate) fn is_sentinel(&self) -> bool {
        self.entry.is_none()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Level
// ////////////////////////////////////////////////////////////////////////////

/// One horizontal rung of the list.
#[expect(
    clippy::field_scoped_visibility_modifiers,
    reason = "Searches start from the sentinels"
)]
pub(crate) struct Level<K, V> {
    /// Left sentinel.
    pub(crate) head: NodeId<K, V>,
    /// Right sentinel.
    pub(crate) tail: NodeId<K, V>,
    /// Number of entry-carrying nodes.
    len: usize,
}

#[expect(
    clippy::indexing_slicing,
    reason = "Handles held by a level always point at live nodes"
)]
impl<K, V> Level<K, V> {
    /// Allocate an empty level (just the two sentinels).
    pub(crate) fn new(nodes: &mut Nodes<K, V>) -> Self {
        let head = nodes.insert(SkipNode::sentinel());
        let tail = nodes.insert(SkipNode::sentinel());
        nodes[head].right = Some(tail);
        nodes[tail].left = Some(head);
        Level { head, tail, len: 0 }
    }

    /// Number of entry-carrying nodes on this level.
    #[cfg(test)]
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if only the sentinels are left.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The leftmost entry-carrying node.
    pub(crate) fn first(&self, nodes: &Nodes<K, V>) -> Option<NodeId<K, V>> {
        nodes[self.head].right.filter(|&id| id != self.tail)
    }

    /// The rightmost entry-carrying node.
    pub(crate) fn last(&self, nodes: &Nodes<K, V>) -> Option<NodeId<K, V>> {
        nodes[self.tail].left.filter(|&id| id != self.head)
    }

    /// Splice a new rung carrying `entry` directly after `pred`, stacking it
    /// on top of `down` when given.
    ///
    /// All four links of the new node, and the links pointing back at it, are
    /// set here.
    pub(crate) fn insert_after(
        &mut self,
        nodes: &mut Nodes<K, V>,
        pred: NodeId<K, V>,
        entry: EntryId<K, V>,
        down: Option<NodeId<K, V>>,
    ) -> NodeId<K, V> {
        debug_assert!(pred != self.tail, "cannot insert after the tail sentinel");
        let succ = nodes[pred].right;
        let id = nodes.insert(SkipNode {
            entry: Some(entry),
            left: Some(pred),
            right: succ,
            up: None,
            down,
        });
        nodes[pred].right = Some(id);
        if let Some(succ) = succ {
            nodes[succ].left = Some(id);
        }
        if let Some(down) = down {
            nodes[down].up = Some(id);
        }
        self.len += 1;
        id
    }

    /// Remove `id` from this level, detaching it from its neighbours on every
    /// side, and return the node.
    #[expect(clippy::panic, reason = "Unlinking a missing rung is a broken link invariant")]
    pub(crate) fn unlink(
        &mut self,
        nodes: &mut Nodes<K, V>,
        id: NodeId<K, V>,
    ) -> SkipNode<K, V> {
        let node = nodes
            .remove(id)
            .unwrap_or_else(|| panic!("rung {id:?} is not part of the list"));
        debug_assert!(!node.is_sentinel(), "sentinels are never unlinked");
        if let Some(left) = node.left {
            nodes[left].right = node.right;
        }
        if let Some(right) = node.right {
            nodes[right].left = node.left;
        }
        if let Some(down) = node.down {
            nodes[down].up = None;
        }
        if let Some(up) = node.up {
            nodes[up].down = None;
        }
        self.len -= 1;
        node
    }

    /// Release the sentinels of an empty level.
    pub(crate) fn destroy(self, nodes: &mut Nodes<K, V>) {
        debug_assert!(self.is_empty(), "only empty levels are destroyed");
        for sentinel in [self.head, self.tail] {
            if let Some(node) = nodes.remove(sentinel) {
                if let Some(down) = node.down {
                    nodes[down].up = None;
                }
                if let Some(up) = node.up {
                    nodes[up].down = None;
                }
            }
        }
    }

    /// Stack `self` directly above `below`, chaining the head sentinels so a
    /// search stalled on a head can descend.
    pub(crate) fn stack_on(&self, nodes: &mut Nodes<K, V>, below: &Self) {
        nodes[self.head].down = Some(below.head);
        nodes[below.head].up = Some(self.head);
        nodes[self.tail].down = Some(below.tail);
        nodes[below.tail].up = Some(self.tail);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Entry, Level, Nodes, SkipNode};
    use crate::arena::Arena;

    type Entries = Arena<Entry<u32, ()>>;

    fn entry(entries: &mut Entries, key: u32) -> super::EntryId<u32, ()> {
        entries.insert(Entry { key, value: () })
    }

    fn keys(level: &Level<u32, ()>, nodes: &Nodes<u32, ()>, entries: &Entries) -> Vec<u32> {
        let mut out = Vec::new();
        let mut cursor = level.first(nodes);
        while let Some(id) = cursor {
            let node: &SkipNode<u32, ()> = &nodes[id];
            if let Some(entry) = node.entry {
                out.push(entries[entry].key);
            }
            cursor = node.right.filter(|&right| right != level.tail);
        }
        out
    }

    #[test]
    fn empty_level() {
        let mut nodes = Nodes::<u32, ()>::new();
        let level = Level::new(&mut nodes);
        assert!(level.is_empty());
        assert_eq!(level.first(&nodes), None);
        assert_eq!(level.last(&nodes), None);
        assert_eq!(nodes[level.head].right, Some(level.tail));
        assert_eq!(nodes[level.tail].left, Some(level.head));
        level.destroy(&mut nodes);
        assert_eq!(nodes.len(), 0);
    }

    #[test]
    fn insert_and_unlink() {
        let mut nodes = Nodes::new();
        let mut entries = Entries::new();
        let mut level = Level::new(&mut nodes);

        let head = level.head;
        let two = level.insert_after(&mut nodes, head, entry(&mut entries, 2), None);
        let one = level.insert_after(&mut nodes, head, entry(&mut entries, 1), None);
        let three = level.insert_after(&mut nodes, two, entry(&mut entries, 3), None);
        assert_eq!(level.len(), 3);
        assert_eq!(keys(&level, &nodes, &entries), [1, 2, 3]);
        assert_eq!(level.first(&nodes), Some(one));
        assert_eq!(level.last(&nodes), Some(three));

        let removed = level.unlink(&mut nodes, two);
        assert_eq!(removed.left, Some(one));
        assert_eq!(removed.right, Some(three));
        assert_eq!(nodes[one].right, Some(three));
        assert_eq!(nodes[three].left, Some(one));
        assert_eq!(keys(&level, &nodes, &entries), [1, 3]);

        level.unlink(&mut nodes, one);
        level.unlink(&mut nodes, three);
        assert!(level.is_empty());
        level.destroy(&mut nodes);
        assert_eq!(nodes.len(), 0);
    }

    #[test]
    fn vertical_links() {
        let mut nodes = Nodes::new();
        let mut entries = Entries::new();
        let mut bottom = Level::new(&mut nodes);
        let mut top = Level::new(&mut nodes);
        top.stack_on(&mut nodes, &bottom);
        assert_eq!(nodes[top.head].down, Some(bottom.head));
        assert_eq!(nodes[bottom.head].up, Some(top.head));

        let seven = entry(&mut entries, 7);
        let lower = bottom.insert_after(&mut nodes, bottom.head, seven, None);
        let upper = top.insert_after(&mut nodes, top.head, seven, Some(lower));
        assert_eq!(nodes[lower].up, Some(upper));
        assert_eq!(nodes[upper].down, Some(lower));
        assert_eq!(nodes[upper].entry, nodes[lower].entry);

        top.unlink(&mut nodes, upper);
        assert_eq!(nodes[lower].up, None);

        top.destroy(&mut nodes);
        assert_eq!(nodes[bottom.head].up, None);
        bottom.unlink(&mut nodes, lower);
        bottom.destroy(&mut nodes);
        assert_eq!(nodes.len(), 0);
    }
}
