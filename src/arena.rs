//! Arena storage shared by all queue variants
//!
//! Every variant keeps its nodes in slot maps instead of a graph of raw
//! pointers. Links between nodes are [`NodeKey`]s, so cutting, linking and
//! splicing only rewrite small `Copy` values and a node can never be freed
//! twice: it has exactly one slot, and removing an already-removed key is a
//! no-op that returns `None`.
//!
//! # Segments
//!
//! An arena is a set of segments. Each segment is a [`SlotMap`] tagged with a
//! number from a process-wide counter, and a [`NodeKey`] names both the
//! segment and the slot. A fresh arena owns one segment, its *local* one, and
//! inserts only there. Merging two queues hands the donor's segments over to
//! the receiver as they are: no node moves and no link is rewritten, so the
//! cost depends on the number of segments and not on the number of nodes.
//! The side with fewer adopted segments is folded into the other.
//!
//! # Handles
//!
//! A [`Handle`] is a node key. Since the key carries its segment tag, a
//! handle from another queue instance never resolves here, even if its slot
//! index and version happen to coincide with a live slot. Generational slot
//! keys take care of handles to elements that were already popped. After a
//! merge the donor's segments belong to the receiver, so the donor's handles
//! resolve in the receiver.

use crate::traits::QueueError;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    struct SlotKey;
}

/// Key of a node inside one arena
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct NodeKey {
    segment: u64,
    slot: SlotKey,
}

static NEXT_SEGMENT_TAG: AtomicU64 = AtomicU64::new(1);

fn next_tag() -> u64 {
    NEXT_SEGMENT_TAG.fetch_add(1, Ordering::Relaxed)
}

/// Opaque reference to an element, returned by `push`.
///
/// Handles stay valid until the element is popped or the queue is cleared.
/// Merging keeps them valid: the element's handle follows it into the
/// receiving queue.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Handle {
    key: NodeKey,
}

type Segment<N> = SlotMap<SlotKey, N>;

/// Node storage with stable keys.
pub(crate) struct Arena<N> {
    /// Tag of `local`
    home: u64,
    local: Segment<N>,
    /// Segments taken over from merged arenas, keyed by tag; never empty
    adopted: FxHashMap<u64, Segment<N>>,
    len: usize,
}

impl<N> Arena<N> {
    pub(crate) fn new() -> Self {
        Arena {
            home: next_tag(),
            local: SlotMap::with_key(),
            adopted: FxHashMap::default(),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of segments holding at least one node, plus the local one
    pub(crate) fn segment_count(&self) -> usize {
        1 + self.adopted.len()
    }

    #[inline]
    fn segment(&self, tag: u64) -> Option<&Segment<N>> {
        if tag == self.home {
            Some(&self.local)
        } else {
            self.adopted.get(&tag)
        }
    }

    #[inline]
    pub(crate) fn insert(&mut self, node: N) -> NodeKey {
        self.len += 1;
        NodeKey {
            segment: self.home,
            slot: self.local.insert(node),
        }
    }

    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<N> {
        let node = if key.segment == self.home {
            self.local.remove(key.slot)?
        } else {
            let segment = self.adopted.get_mut(&key.segment)?;
            let node = segment.remove(key.slot)?;
            if segment.is_empty() {
                self.adopted.remove(&key.segment);
            }
            node
        };
        self.len -= 1;
        Some(node)
    }

    #[inline]
    pub(crate) fn contains(&self, key: NodeKey) -> bool {
        self.segment(key.segment)
            .is_some_and(|segment| segment.contains_key(key.slot))
    }

    #[inline]
    pub(crate) fn handle(&self, key: NodeKey) -> Handle {
        Handle { key }
    }

    /// Resolves a handle to a live key of this arena.
    pub(crate) fn resolve(&self, handle: &Handle) -> Result<NodeKey, QueueError> {
        if self.contains(handle.key) {
            Ok(handle.key)
        } else {
            Err(QueueError::InvalidHandle)
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeKey, &N)> {
        let home = self.home;
        let local = self
            .local
            .iter()
            .map(move |(slot, node)| (NodeKey { segment: home, slot }, node));
        let adopted = self.adopted.iter().flat_map(|(&segment, nodes)| {
            nodes
                .iter()
                .map(move |(slot, node)| (NodeKey { segment, slot }, node))
        });
        local.chain(adopted)
    }

    /// Takes over every segment of `other`.
    ///
    /// Keys and handles issued by `other` stay valid here. Costs
    /// O(min(adopted segments of either side) + 1).
    pub(crate) fn adopt(&mut self, other: Arena<N>) {
        let Arena {
            home,
            local,
            mut adopted,
            len,
        } = other;
        if adopted.len() > self.adopted.len() {
            std::mem::swap(&mut self.adopted, &mut adopted);
        }
        self.adopted.extend(adopted);
        if !local.is_empty() {
            self.adopted.insert(home, local);
        }
        self.len += len;
    }

    /// Drops every node without walking any structure.
    pub(crate) fn clear(&mut self) {
        self.local.clear();
        self.adopted.clear();
        self.len = 0;
    }
}

impl<N: TreeLinks> Arena<N> {
    /// Releases every node reachable from `start` through child and sibling
    /// links, returning how many nodes were released.
    ///
    /// Uses an explicit worklist, so neither deep nor wide trees recurse. A
    /// node reached twice (the circular root list leads back to its start) is
    /// already gone from the arena on the second visit and is skipped.
    pub(crate) fn release_from(&mut self, start: NodeKey) -> usize {
        let mut released = 0;
        let mut worklist = vec![start];
        while let Some(key) = worklist.pop() {
            let Some(node) = self.remove(key) else {
                continue;
            };
            released += 1;
            worklist.extend(node.sibling());
            worklist.extend(node.child());
        }
        released
    }
}

impl<N> Index<NodeKey> for Arena<N> {
    type Output = N;

    #[inline]
    fn index(&self, key: NodeKey) -> &N {
        if key.segment == self.home {
            &self.local[key.slot]
        } else {
            &self.adopted[&key.segment][key.slot]
        }
    }
}

impl<N> IndexMut<NodeKey> for Arena<N> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut N {
        if key.segment == self.home {
            &mut self.local[key.slot]
        } else {
            match self.adopted.get_mut(&key.segment) {
                Some(segment) => &mut segment[key.slot],
                None => panic!("node key from a segment this arena does not hold: {key:?}"),
            }
        }
    }
}

/// Leftmost-child / right-sibling shape shared by the tree-based variants.
pub(crate) trait TreeLinks {
    fn child(&self) -> Option<NodeKey>;
    fn sibling(&self) -> Option<NodeKey>;
}
