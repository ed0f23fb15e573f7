//! Lazy Binomial Heap implementation
//!
//! A lazy binomial heap is a collection of binomial trees with:
//! - O(1) insert and merge (the new trees are spliced into the root list)
//! - O(log n) amortized delete-min
//! - O(log n) change_priority
//!
//! # Algorithm Overview
//!
//! **Binomial Tree Bₖ**: B₀ is a single node; Bₖ is formed by linking two
//! B_{k-1} trees, making the root with the larger rank the leftmost child of
//! the other. Bₖ has exactly 2ᵏ nodes and its root's children have degrees
//! k-1, k-2, ..., 0 from left to right.
//!
//! **Laziness**: unlike an eager binomial heap, push and merge never link
//! anything. Roots accumulate in a circular list next to a pointer to the
//! minimum root. Delete-min pays for this: it promotes the minimum's children
//! to roots and **consolidates** the whole forest, linking equal-degree trees
//! until every root degree is distinct.
//!
//! **Consolidation policies** ([`ConsolidationPolicy`]):
//! - *Multi-pass*: scan the pending trees, parking each in a degree-indexed
//!   table and setting aside the result of every collision; rescan the set-aside
//!   trees until a scan produces no collision.
//! - *Single-pass*: scan once left to right, carrying each collision result
//!   straight into the next degree slot until it lands in an empty one.
//!
//! Both leave at most one tree per degree, and because ranks are a total order
//! (priority, then identifier) both yield the same pop sequence.
//!
//! **Change priority**: tree shape is never altered. A promoted element moves
//! up by swapping tree positions with its parent's element; a demoted element
//! moves down by swapping with its minimum child's element. Handles refer to
//! elements rather than tree positions, so they follow the element through
//! every swap.

use crate::arena::{Arena, Handle, NodeKey, TreeLinks};
use crate::element::{Element, Id, Shift};
use crate::rank::{checked_increment, Degree};
use crate::traits::{MergeableQueue, QueueError};
use smallvec::SmallVec;
use std::fmt;

/// How delete-min links equal-degree trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsolidationPolicy {
    /// Link on first collision while scanning once
    SinglePass,
    /// Rescan collision results until no two trees share a degree
    #[default]
    MultiPass,
}

/// Element storage; handles point here
struct Slot<P, T> {
    element: Element<P, T>,
    /// Tree position currently holding this element
    node: NodeKey,
}

/// Tree position.
///
/// `sibling` is circular among roots and null-terminated within a child chain.
struct TreeNode {
    elem: NodeKey,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    sibling: Option<NodeKey>,
    degree: Degree,
}

impl TreeLinks for TreeNode {
    fn child(&self) -> Option<NodeKey> {
        self.child
    }

    fn sibling(&self) -> Option<NodeKey> {
        self.sibling
    }
}

type DegreeTable = SmallVec<[Option<NodeKey>; 64]>;

/// Lazy Binomial Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::binomial::{ConsolidationPolicy, LazyBinomialHeap};
/// use mergeable_heaps::MergeableQueue;
///
/// let mut heap = LazyBinomialHeap::with_policy(ConsolidationPolicy::SinglePass);
/// let handle = heap.push(7, 5, "item");
/// heap.push(8, 3, "other");
/// heap.change_priority(&handle, 1).unwrap();
/// assert_eq!(heap.pop(), Ok((7, "item")));
/// ```
pub struct LazyBinomialHeap<T, P: Ord> {
    elements: Arena<Slot<P, T>>,
    nodes: Arena<TreeNode>,
    /// Minimum root; entry point of the circular root list
    min: Option<NodeKey>,
    policy: ConsolidationPolicy,
    /// False while push or merge have added roots since the last consolidation
    consolidated: bool,
}

impl<T, P: Ord> MergeableQueue<T, P> for LazyBinomialHeap<T, P> {
    fn new() -> Self {
        Self::with_policy(ConsolidationPolicy::default())
    }

    fn len(&self) -> usize {
        self.elements.len()
    }

    fn push(&mut self, id: Id, priority: P, payload: T) -> Handle {
        let node = self.nodes.insert(TreeNode {
            elem: NodeKey::default(),
            parent: None,
            child: None,
            sibling: None,
            degree: 0,
        });
        let elem = self.elements.insert(Slot {
            element: Element::new(id, priority, payload),
            node,
        });
        self.nodes[node].elem = elem;

        self.splice_root(node);
        self.consolidated = false;
        self.elements.handle(elem)
    }

    fn pop(&mut self) -> Result<(Id, T), QueueError> {
        let min = self.min.ok_or(QueueError::EmptyQueue)?;

        // Old roots, left to right starting after the minimum
        let mut pending: Vec<NodeKey> = Vec::new();
        let mut current = self.nodes[min].sibling.unwrap_or(min);
        while current != min {
            pending.push(current);
            current = self.nodes[current].sibling.unwrap_or(min);
        }

        // Promoted children
        let mut child = self.nodes[min].child;
        while let Some(c) = child {
            let node = &mut self.nodes[c];
            child = node.sibling.take();
            node.parent = None;
            pending.push(c);
        }

        let node = self.nodes.remove(min).ok_or(QueueError::EmptyQueue)?;
        let slot = self
            .elements
            .remove(node.elem)
            .ok_or(QueueError::EmptyQueue)?;

        self.min = None;
        self.consolidate(pending);

        let (id, _, payload) = slot.element.into_parts();
        Ok((id, payload))
    }

    fn peek(&self) -> Option<(Id, &P, &T)> {
        self.min.map(|min| {
            let element = self.element_at(min);
            (element.id, &element.priority, &element.payload)
        })
    }

    fn priority(&self, handle: &Handle) -> Result<&P, QueueError> {
        let elem = self.elements.resolve(handle)?;
        Ok(&self.elements[elem].element.priority)
    }

    fn change_priority(&mut self, handle: &Handle, new_priority: P) -> Result<(), QueueError> {
        let elem = self.elements.resolve(handle)?;
        let slot = &mut self.elements[elem];
        let shift = Shift::between(&slot.element.priority, &new_priority);
        slot.element.priority = new_priority;
        let node = slot.node;

        match shift {
            Shift::Promoted => self.promote(node),
            Shift::Demoted => self.demote(node),
            Shift::Unchanged => {}
        }
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        let LazyBinomialHeap {
            elements,
            nodes,
            min: other_min,
            ..
        } = other;
        self.elements.adopt(elements);
        self.nodes.adopt(nodes);
        let Some(other_min) = other_min else {
            return;
        };

        match self.min {
            None => self.min = Some(other_min),
            Some(min) => {
                // Splice the two rings by exchanging one successor pointer each
                let a_next = self.nodes[min].sibling;
                let b_next = self.nodes[other_min].sibling;
                self.nodes[min].sibling = b_next;
                self.nodes[other_min].sibling = a_next;
                if self.node_lt(other_min, min) {
                    self.min = Some(other_min);
                }
            }
        }
        self.consolidated = false;
    }

    fn clear(&mut self) {
        if let Some(min) = self.min.take() {
            let released = self.nodes.release_from(min);
            debug_assert_eq!(released, self.elements.len());
        }
        debug_assert_eq!(self.nodes.len(), 0);
        self.elements.clear();
        self.consolidated = true;
    }

    fn verify_structure(&self) -> bool {
        if self.nodes.len() != self.elements.len() {
            return false;
        }
        for (elem, slot) in self.elements.iter() {
            if !self.nodes.contains(slot.node) || self.nodes[slot.node].elem != elem {
                return false;
            }
        }

        let Some(min) = self.min else {
            return self.elements.len() == 0;
        };

        let mut seen_degrees: Vec<bool> = Vec::new();
        let mut visited = 0;
        let mut root = min;
        loop {
            let node = &self.nodes[root];
            if node.parent.is_some() || self.node_lt(root, min) {
                return false;
            }
            if self.consolidated {
                let d = node.degree as usize;
                if seen_degrees.len() <= d {
                    seen_degrees.resize(d + 1, false);
                }
                if seen_degrees[d] {
                    return false;
                }
                seen_degrees[d] = true;
            }
            match self.verify_tree(root) {
                Some(count) => visited += count,
                None => return false,
            }
            if visited > self.len() {
                return false;
            }
            match node.sibling {
                Some(next) if next == min => break,
                Some(next) => root = next,
                None => return false,
            }
        }

        visited == self.len()
    }
}

impl<T, P: Ord> LazyBinomialHeap<T, P> {
    /// Creates an empty heap using the given consolidation policy
    pub fn with_policy(policy: ConsolidationPolicy) -> Self {
        LazyBinomialHeap {
            elements: Arena::new(),
            nodes: Arena::new(),
            min: None,
            policy,
            consolidated: true,
        }
    }

    /// Returns the consolidation policy used by delete-min
    pub fn policy(&self) -> ConsolidationPolicy {
        self.policy
    }

    /// Number of trees in the root list
    pub fn root_count(&self) -> usize {
        let Some(min) = self.min else {
            return 0;
        };
        let mut count = 1;
        let mut current = self.nodes[min].sibling.unwrap_or(min);
        while current != min {
            count += 1;
            current = self.nodes[current].sibling.unwrap_or(min);
        }
        count
    }

    #[inline]
    fn element_at(&self, node: NodeKey) -> &Element<P, T> {
        &self.elements[self.nodes[node].elem].element
    }

    #[inline]
    fn node_lt(&self, a: NodeKey, b: NodeKey) -> bool {
        self.element_at(a).ranks_lt(self.element_at(b))
    }

    /// Adds a parentless tree to the root list, updating the minimum
    fn splice_root(&mut self, node: NodeKey) {
        match self.min {
            None => {
                self.nodes[node].sibling = Some(node);
                self.min = Some(node);
            }
            Some(min) => {
                self.nodes[node].sibling = self.nodes[min].sibling;
                self.nodes[min].sibling = Some(node);
                if self.node_lt(node, min) {
                    self.min = Some(node);
                }
            }
        }
    }

    /// Links two roots of equal degree; the loser becomes the winner's leftmost child
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        debug_assert_eq!(self.nodes[a].degree, self.nodes[b].degree);
        let (winner, loser) = if self.node_lt(b, a) { (b, a) } else { (a, b) };

        let old_child = self.nodes[winner].child;
        let loser_node = &mut self.nodes[loser];
        loser_node.parent = Some(winner);
        loser_node.sibling = old_child;

        let winner_node = &mut self.nodes[winner];
        winner_node.child = Some(loser);
        winner_node.degree = checked_increment(winner_node.degree);
        winner
    }

    /// Links equal-degree trees among `pending` and rebuilds the root list
    fn consolidate(&mut self, pending: Vec<NodeKey>) {
        let mut table: DegreeTable = SmallVec::new();

        match self.policy {
            ConsolidationPolicy::SinglePass => {
                for tree in pending {
                    let mut tree = tree;
                    let mut degree = self.nodes[tree].degree as usize;
                    loop {
                        if table.len() <= degree {
                            table.resize(degree + 1, None);
                        }
                        match table[degree].take() {
                            Some(other) => {
                                tree = self.link(other, tree);
                                degree += 1;
                            }
                            None => {
                                table[degree] = Some(tree);
                                break;
                            }
                        }
                    }
                }
            }
            ConsolidationPolicy::MultiPass => {
                let mut scan = pending;
                while !scan.is_empty() {
                    let mut collided = Vec::new();
                    for tree in scan {
                        let degree = self.nodes[tree].degree as usize;
                        if table.len() <= degree {
                            table.resize(degree + 1, None);
                        }
                        match table[degree].take() {
                            Some(other) => collided.push(self.link(other, tree)),
                            None => table[degree] = Some(tree),
                        }
                    }
                    scan = collided;
                }
            }
        }

        for tree in table.into_iter().flatten() {
            self.splice_root(tree);
        }
        self.consolidated = true;
    }

    /// Moves two elements between tree positions, keeping slots in step
    fn swap_elements(&mut self, a: NodeKey, b: NodeKey) {
        let ea = self.nodes[a].elem;
        let eb = self.nodes[b].elem;
        self.nodes[a].elem = eb;
        self.nodes[b].elem = ea;
        self.elements[ea].node = b;
        self.elements[eb].node = a;
    }

    fn promote(&mut self, mut node: NodeKey) {
        while let Some(parent) = self.nodes[node].parent {
            if !self.node_lt(node, parent) {
                return;
            }
            self.swap_elements(node, parent);
            node = parent;
        }

        if let Some(min) = self.min {
            if self.node_lt(node, min) {
                self.min = Some(node);
            }
        }
    }

    fn demote(&mut self, start: NodeKey) {
        let mut node = start;
        loop {
            let mut best: Option<NodeKey> = None;
            let mut child = self.nodes[node].child;
            while let Some(c) = child {
                if best.map_or(true, |b| self.node_lt(c, b)) {
                    best = Some(c);
                }
                child = self.nodes[c].sibling;
            }

            match best {
                Some(c) if self.node_lt(c, node) => {
                    self.swap_elements(node, c);
                    node = c;
                }
                _ => break,
            }
        }

        if self.min == Some(start) {
            self.refresh_min();
        }
    }

    /// Rescans the root list for the minimum
    fn refresh_min(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        let mut best = start;
        let mut current = self.nodes[start].sibling.unwrap_or(start);
        while current != start {
            if self.node_lt(current, best) {
                best = current;
            }
            current = self.nodes[current].sibling.unwrap_or(start);
        }
        self.min = Some(best);
    }

    /// Checks heap order and binomial shape below `root`, returning the node count
    fn verify_tree(&self, root: NodeKey) -> Option<usize> {
        let mut count = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            count += 1;
            if count > self.len() {
                return None;
            }
            let degree = self.nodes[node].degree;

            // Children of a Bₖ root have degrees k-1, ..., 0 from left to right
            let mut expected = degree;
            let mut child = self.nodes[node].child;
            while let Some(c) = child {
                let child_node = &self.nodes[c];
                if expected == 0
                    || child_node.degree != expected - 1
                    || child_node.parent != Some(node)
                    || self.node_lt(c, node)
                {
                    return None;
                }
                expected -= 1;
                stack.push(c);
                child = child_node.sibling;
            }
            if expected != 0 {
                return None;
            }
        }
        Some(count)
    }
}

impl<T, P: Ord> Default for LazyBinomialHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> fmt::Debug for LazyBinomialHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyBinomialHeap")
            .field("len", &self.len())
            .field("roots", &self.root_count())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T, P: Ord> Extend<(Id, P, T)> for LazyBinomialHeap<T, P> {
    fn extend<I: IntoIterator<Item = (Id, P, T)>>(&mut self, iter: I) {
        for (id, priority, payload) in iter {
            self.push(id, priority, payload);
        }
    }
}
