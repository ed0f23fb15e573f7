//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert and merge
//! - O(1) amortized change_priority when the priority is promoted
//! - O(log n) amortized delete_min and demotion
//!
//! The structure consists of a collection of heap-ordered trees. Roots form a
//! circular list through their sibling links and the heap keeps the minimum
//! root as its entry point. Within a tree, children hang off their parent's
//! leftmost-child link as a null-terminated sibling chain.
//!
//! # Node bookkeeping
//!
//! Each node carries two upward links:
//! - `prev`: its parent in the binary encoding, i.e. the left sibling, or the
//!   parent itself for a leftmost child. This is what a cut rewrites.
//! - `ordered_ancestor`: its parent in the heap-ordered tree. Cascading cuts
//!   climb this link directly instead of walking left through the sibling
//!   chain to find the parent.
//!
//! `marked` records that a non-root node has lost a child since it last became
//! a child itself. Losing a second child cuts it too, which keeps the size of a
//! degree-k subtree at least F(k+2) and so bounds every degree by
//! `log_φ(n)`.

use crate::arena::{Arena, Handle, NodeKey, TreeLinks};
use crate::element::{Element, Id, Shift};
use crate::rank::{checked_increment, degree_table_size, saturating_decrement, Degree};
use crate::traits::{MergeableQueue, QueueError};
use rustc_hash::FxHashMap;
use std::fmt;

struct Node<P, T> {
    element: Element<P, T>,
    /// Leftmost child
    child: Option<NodeKey>,
    /// Right sibling; circular in the root list, null-terminated among children
    sibling: Option<NodeKey>,
    /// Left sibling, or the parent for a leftmost child; None for roots
    prev: Option<NodeKey>,
    /// Parent in the heap-ordered tree; None for roots
    ordered_ancestor: Option<NodeKey>,
    degree: Degree,
    marked: bool,
}

impl<P, T> TreeLinks for Node<P, T> {
    fn child(&self) -> Option<NodeKey> {
        self.child
    }

    fn sibling(&self) -> Option<NodeKey> {
        self.sibling
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::FibonacciHeap;
/// use mergeable_heaps::MergeableQueue;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push(0, 5, "item");
/// heap.push(1, 3, "other");
/// heap.change_priority(&handle, 1).unwrap();
/// assert_eq!(heap.peek(), Some((0, &1, &"item")));
/// ```
pub struct FibonacciHeap<T, P: Ord> {
    nodes: Arena<Node<P, T>>,
    /// Minimum root; entry point of the circular root list
    min: Option<NodeKey>,
    /// False while push, merge or cuts have added roots since the last consolidation
    consolidated: bool,
}

impl<T, P: Ord> MergeableQueue<T, P> for FibonacciHeap<T, P> {
    fn new() -> Self {
        FibonacciHeap {
            nodes: Arena::new(),
            min: None,
            consolidated: true,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, id: Id, priority: P, payload: T) -> Handle {
        let node = self.nodes.insert(Node {
            element: Element::new(id, priority, payload),
            child: None,
            sibling: None,
            prev: None,
            ordered_ancestor: None,
            degree: 0,
            marked: false,
        });
        self.splice_root(node);
        self.consolidated = false;
        self.nodes.handle(node)
    }

    fn pop(&mut self) -> Result<(Id, T), QueueError> {
        let min = self.min.take().ok_or(QueueError::EmptyQueue)?;

        let mut pending = self.other_roots(min);

        // Promote children to roots
        let mut child = self.nodes[min].child;
        while let Some(c) = child {
            let node = &mut self.nodes[c];
            child = node.sibling.take();
            node.prev = None;
            node.ordered_ancestor = None;
            node.marked = false;
            pending.push(c);
        }

        let node = self.nodes.remove(min).ok_or(QueueError::EmptyQueue)?;
        self.consolidate(pending);

        let (id, _, payload) = node.element.into_parts();
        Ok((id, payload))
    }

    fn peek(&self) -> Option<(Id, &P, &T)> {
        self.min.map(|min| {
            let element = &self.nodes[min].element;
            (element.id, &element.priority, &element.payload)
        })
    }

    fn priority(&self, handle: &Handle) -> Result<&P, QueueError> {
        let node = self.nodes.resolve(handle)?;
        Ok(&self.nodes[node].element.priority)
    }

    fn change_priority(&mut self, handle: &Handle, new_priority: P) -> Result<(), QueueError> {
        let node = self.nodes.resolve(handle)?;
        let element = &mut self.nodes[node].element;
        let shift = Shift::between(&element.priority, &new_priority);
        element.priority = new_priority;

        match shift {
            Shift::Promoted => self.promote(node),
            Shift::Demoted => self.demote(node),
            Shift::Unchanged => {}
        }
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        let FibonacciHeap {
            nodes,
            min: other_min,
            ..
        } = other;
        self.nodes.adopt(nodes);
        let Some(other_min) = other_min else {
            return;
        };

        match self.min {
            None => self.min = Some(other_min),
            Some(min) => {
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
            self.nodes.release_from(min);
        }
        debug_assert_eq!(self.nodes.len(), 0);
        self.nodes.clear();
        self.consolidated = true;
    }

    fn verify_structure(&self) -> bool {
        let Some(min) = self.min else {
            return self.nodes.len() == 0;
        };

        let mut seen_degrees: Vec<bool> = Vec::new();
        let mut visited = 0;
        let mut root = min;
        loop {
            let node = &self.nodes[root];
            if node.prev.is_some()
                || node.ordered_ancestor.is_some()
                || node.marked
                || self.node_lt(root, min)
            {
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

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Number of trees in the root list
    pub fn root_count(&self) -> usize {
        self.min.map_or(0, |min| self.other_roots(min).len() + 1)
    }

    /// Largest degree of any node
    pub fn max_degree(&self) -> Degree {
        self.nodes
            .iter()
            .map(|(_, node)| node.degree)
            .max()
            .unwrap_or(0)
    }

    #[inline]
    fn node_lt(&self, a: NodeKey, b: NodeKey) -> bool {
        self.nodes[a].element.ranks_lt(&self.nodes[b].element)
    }

    /// Roots after `start` in ring order, excluding `start`
    fn other_roots(&self, start: NodeKey) -> Vec<NodeKey> {
        let mut roots = Vec::new();
        let mut current = self.nodes[start].sibling.unwrap_or(start);
        while current != start {
            roots.push(current);
            current = self.nodes[current].sibling.unwrap_or(start);
        }
        roots
    }

    /// Adds a detached tree to the root list, updating the minimum
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

    /// Links two roots; the loser becomes the winner's leftmost child
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (winner, loser) = if self.node_lt(b, a) { (b, a) } else { (a, b) };

        let old_child = self.nodes[winner].child;
        if let Some(c) = old_child {
            self.nodes[c].prev = Some(loser);
        }

        let loser_node = &mut self.nodes[loser];
        loser_node.sibling = old_child;
        loser_node.prev = Some(winner);
        loser_node.ordered_ancestor = Some(winner);
        loser_node.marked = false;

        let winner_node = &mut self.nodes[winner];
        winner_node.child = Some(loser);
        winner_node.degree = checked_increment(winner_node.degree);
        winner
    }

    /// Links equal-degree trees among `pending` and rebuilds the root list
    fn consolidate(&mut self, pending: Vec<NodeKey>) {
        let mut table: Vec<Option<NodeKey>> = vec![None; degree_table_size(self.len())];

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

        self.min = None;
        for tree in table.into_iter().flatten() {
            self.splice_root(tree);
        }
        self.consolidated = true;
    }

    /// Detaches a non-root node with its subtree and adds it to the root list
    fn cut(&mut self, node: NodeKey) {
        let Some(parent) = self.nodes[node].ordered_ancestor else {
            return;
        };
        let prev = self.nodes[node].prev;
        let next = self.nodes[node].sibling;

        if self.nodes[parent].child == Some(node) {
            self.nodes[parent].child = next;
            if let Some(n) = next {
                self.nodes[n].prev = Some(parent);
            }
        } else if let Some(left) = prev {
            self.nodes[left].sibling = next;
            if let Some(n) = next {
                self.nodes[n].prev = Some(left);
            }
        }
        self.nodes[parent].degree = saturating_decrement(self.nodes[parent].degree);

        let detached = &mut self.nodes[node];
        detached.sibling = None;
        detached.prev = None;
        detached.ordered_ancestor = None;
        detached.marked = false;

        self.splice_root(node);
        self.consolidated = false;
    }

    /// Climbs from `node`, cutting marked ancestors until one can absorb the loss
    fn cascading_cut(&mut self, mut node: NodeKey) {
        while let Some(parent) = self.nodes[node].ordered_ancestor {
            if !self.nodes[node].marked {
                self.nodes[node].marked = true;
                return;
            }
            self.cut(node);
            node = parent;
        }
    }

    fn promote(&mut self, node: NodeKey) {
        match self.nodes[node].ordered_ancestor {
            Some(parent) => {
                if self.node_lt(node, parent) {
                    // cut() splices into the root list and refreshes the minimum
                    self.cut(node);
                    self.cascading_cut(parent);
                }
            }
            None => {
                if let Some(min) = self.min {
                    if self.node_lt(node, min) {
                        self.min = Some(node);
                    }
                }
            }
        }
    }

    /// Children are an unordered set, so there is no sift-down: the node leaves
    /// its parent, its children become roots, and it stays behind as a
    /// singleton root.
    fn demote(&mut self, node: NodeKey) {
        if let Some(parent) = self.nodes[node].ordered_ancestor {
            self.cut(node);
            self.cascading_cut(parent);
        }

        let was_min = self.min == Some(node);
        let mut child = self.nodes[node].child.take();
        self.nodes[node].degree = 0;
        while let Some(c) = child {
            let child_node = &mut self.nodes[c];
            child = child_node.sibling.take();
            child_node.prev = None;
            child_node.ordered_ancestor = None;
            child_node.marked = false;
            if was_min {
                // the ring is rebuilt below; just keep `c` reachable from it
                self.nodes[c].sibling = self.nodes[node].sibling;
                self.nodes[node].sibling = Some(c);
            } else {
                self.splice_root(c);
            }
        }

        if was_min {
            let mut roots = self.other_roots(node);
            roots.push(node);
            self.consolidate(roots);
        } else {
            self.consolidated = false;
        }
    }

    /// Checks heap order, link consistency and the Fibonacci size bound below
    /// `root`, returning the node count
    fn verify_tree(&self, root: NodeKey) -> Option<usize> {
        let mut preorder = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            preorder.push(node);
            if preorder.len() > self.len() {
                return None;
            }

            let mut children = 0usize;
            let mut left = node;
            let mut child = self.nodes[node].child;
            while let Some(c) = child {
                let child_node = &self.nodes[c];
                if child_node.ordered_ancestor != Some(node)
                    || child_node.prev != Some(left)
                    || self.node_lt(c, node)
                {
                    return None;
                }
                children += 1;
                stack.push(c);
                left = c;
                child = child_node.sibling;
            }
            if children != self.nodes[node].degree as usize {
                return None;
            }
        }

        // Subtree sizes bottom-up: a degree-k node must own at least F(k+2) nodes
        let mut sizes: FxHashMap<NodeKey, usize> = FxHashMap::default();
        for &node in preorder.iter().rev() {
            let mut size = 1;
            let mut child = self.nodes[node].child;
            while let Some(c) = child {
                size += sizes.get(&c).copied().unwrap_or(0);
                child = self.nodes[c].sibling;
            }
            if (size as u64) < fibonacci_number(self.nodes[node].degree as usize + 2) {
                return None;
            }
            sizes.insert(node, size);
        }

        Some(preorder.len())
    }
}

/// F(0) = 0, F(1) = 1, saturating at u64::MAX
fn fibonacci_number(n: usize) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

impl<T, P: Ord> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> fmt::Debug for FibonacciHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len())
            .field("roots", &self.root_count())
            .finish()
    }
}

impl<T, P: Ord> Extend<(Id, P, T)> for FibonacciHeap<T, P> {
    fn extend<I: IntoIterator<Item = (Id, P, T)>>(&mut self, iter: I) {
        for (id, priority, payload) in iter {
            self.push(id, priority, payload);
        }
    }
}
