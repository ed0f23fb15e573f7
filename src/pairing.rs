//! Pairing Heap implementation
//!
//! A pairing heap is a single heap-ordered multiway tree with:
//! - O(1) insert and merge
//! - O(log n) amortized delete_min
//! - o(log n) amortized promotion through change_priority
//!
//! There is no degree or rank bookkeeping. The only structural primitive is
//! *link*: the root with the larger rank becomes the leftmost child of the
//! other. Delete-min removes the root and re-pairs its child chain into one
//! tree using a [`PairingPolicy`]:
//!
//! - **Two-pass**: link children in consecutive pairs from left to right, then
//!   fold the pairs from the last one back to the first.
//! - **Multi-pass**: link children in consecutive pairs, then keep linking the
//!   two oldest trees in a FIFO queue until a single tree remains.
//!
//! # Representation
//!
//! The multiway tree is stored in its binary encoding: `child` is the
//! leftmost child, `sibling` the next child to the right, and `prev` the
//! binary-tree parent (the left sibling, or the parent for a leftmost child).
//! `prev` is what makes a cut O(1): without it, change_priority would have to
//! search a sibling chain for the node's predecessor.

use crate::arena::{Arena, Handle, NodeKey, TreeLinks};
use crate::element::{Element, Id, Shift};
use crate::traits::{MergeableQueue, QueueError};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

/// How delete-min collapses the root's child chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PairingPolicy {
    /// Pair left to right, then fold right to left
    #[default]
    TwoPass,
    /// Pair left to right, then link front-of-queue pairs until one tree remains
    MultiPass,
}

struct Node<P, T> {
    element: Element<P, T>,
    /// Leftmost child
    child: Option<NodeKey>,
    /// Next child of the same parent
    sibling: Option<NodeKey>,
    /// Left sibling, or the parent for a leftmost child; None for the root
    prev: Option<NodeKey>,
}

impl<P, T> TreeLinks for Node<P, T> {
    fn child(&self) -> Option<NodeKey> {
        self.child
    }

    fn sibling(&self) -> Option<NodeKey> {
        self.sibling
    }
}

/// Pairing Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::pairing::{PairingHeap, PairingPolicy};
/// use mergeable_heaps::MergeableQueue;
///
/// let mut heap = PairingHeap::with_policy(PairingPolicy::MultiPass);
/// let handle = heap.push(0, 5, "item");
/// heap.push(1, 2, "other");
/// heap.change_priority(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok(&"item"));
/// ```
pub struct PairingHeap<T, P: Ord> {
    nodes: Arena<Node<P, T>>,
    root: Option<NodeKey>,
    policy: PairingPolicy,
}

impl<T, P: Ord> MergeableQueue<T, P> for PairingHeap<T, P> {
    fn new() -> Self {
        Self::with_policy(PairingPolicy::default())
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
        });
        self.root = Some(self.meld(self.root, node));
        self.nodes.handle(node)
    }

    fn pop(&mut self) -> Result<(Id, T), QueueError> {
        let root = self.root.take().ok_or(QueueError::EmptyQueue)?;
        let node = self.nodes.remove(root).ok_or(QueueError::EmptyQueue)?;

        self.root = self.combine(node.child);

        let (id, _, payload) = node.element.into_parts();
        Ok((id, payload))
    }

    fn peek(&self) -> Option<(Id, &P, &T)> {
        self.root.map(|root| {
            let element = &self.nodes[root].element;
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
        let PairingHeap {
            nodes,
            root: other_root,
            ..
        } = other;
        self.nodes.adopt(nodes);
        if let Some(other_root) = other_root {
            self.root = Some(self.meld(self.root, other_root));
        }
    }

    fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            self.nodes.release_from(root);
        }
        debug_assert_eq!(self.nodes.len(), 0);
        self.nodes.clear();
    }

    fn verify_structure(&self) -> bool {
        let Some(root) = self.root else {
            return self.nodes.len() == 0;
        };
        let root_node = &self.nodes[root];
        if root_node.prev.is_some() || root_node.sibling.is_some() {
            return false;
        }

        let mut visited = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            visited += 1;
            if visited > self.len() {
                return false;
            }
            let mut left = node;
            let mut child = self.nodes[node].child;
            while let Some(c) = child {
                let child_node = &self.nodes[c];
                if child_node.prev != Some(left) || self.node_lt(c, node) {
                    return false;
                }
                stack.push(c);
                left = c;
                child = child_node.sibling;
            }
        }

        visited == self.len()
    }
}

impl<T, P: Ord> PairingHeap<T, P> {
    /// Creates an empty heap using the given re-pairing policy
    pub fn with_policy(policy: PairingPolicy) -> Self {
        PairingHeap {
            nodes: Arena::new(),
            root: None,
            policy,
        }
    }

    /// Returns the re-pairing policy used by delete-min and demotion
    pub fn policy(&self) -> PairingPolicy {
        self.policy
    }

    /// Number of children of the root
    pub fn root_degree(&self) -> usize {
        let mut count = 0;
        let mut child = self.root.and_then(|r| self.nodes[r].child);
        while let Some(c) = child {
            count += 1;
            child = self.nodes[c].sibling;
        }
        count
    }

    #[inline]
    fn node_lt(&self, a: NodeKey, b: NodeKey) -> bool {
        self.nodes[a].element.ranks_lt(&self.nodes[b].element)
    }

    /// Links two detached trees; the loser becomes the winner's leftmost child
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (winner, loser) = if self.node_lt(b, a) { (b, a) } else { (a, b) };

        let old_child = self.nodes[winner].child;
        if let Some(c) = old_child {
            self.nodes[c].prev = Some(loser);
        }

        let loser_node = &mut self.nodes[loser];
        loser_node.sibling = old_child;
        loser_node.prev = Some(winner);

        self.nodes[winner].child = Some(loser);
        winner
    }

    fn meld(&mut self, root: Option<NodeKey>, tree: NodeKey) -> NodeKey {
        match root {
            Some(root) => self.link(root, tree),
            None => tree,
        }
    }

    /// Re-pairs a child chain into a single detached tree
    fn combine(&mut self, first: Option<NodeKey>) -> Option<NodeKey> {
        let first = first?;

        // First pass, shared by both policies: link consecutive pairs
        let mut pairs: SmallVec<[NodeKey; 32]> = SmallVec::new();
        let mut current = Some(first);
        while let Some(a) = current {
            let b = self.detach_head(a);
            match b {
                Some(b) => {
                    current = self.detach_head(b);
                    pairs.push(self.link(a, b));
                }
                None => {
                    pairs.push(a);
                    current = None;
                }
            }
        }

        let result = match self.policy {
            PairingPolicy::TwoPass => {
                let mut acc = pairs.pop()?;
                while let Some(tree) = pairs.pop() {
                    acc = self.link(tree, acc);
                }
                acc
            }
            PairingPolicy::MultiPass => {
                let mut queue: VecDeque<NodeKey> = pairs.into_iter().collect();
                loop {
                    let a = queue.pop_front()?;
                    match queue.pop_front() {
                        Some(b) => {
                            let linked = self.link(a, b);
                            queue.push_back(linked);
                        }
                        None => break a,
                    }
                }
            }
        };

        let node = &mut self.nodes[result];
        node.prev = None;
        node.sibling = None;
        Some(result)
    }

    /// Clears `node`'s chain links, returning the sibling that followed it
    fn detach_head(&mut self, node: NodeKey) -> Option<NodeKey> {
        let n = &mut self.nodes[node];
        n.prev = None;
        n.sibling.take()
    }

    /// Unlinks `node` and its subtree from wherever it hangs
    fn cut(&mut self, node: NodeKey) {
        let Some(prev) = self.nodes[node].prev else {
            return;
        };
        let next = self.nodes[node].sibling;

        if self.nodes[prev].child == Some(node) {
            self.nodes[prev].child = next;
        } else {
            self.nodes[prev].sibling = next;
        }
        if let Some(n) = next {
            self.nodes[n].prev = Some(prev);
        }

        let detached = &mut self.nodes[node];
        detached.prev = None;
        detached.sibling = None;
    }

    fn promote(&mut self, node: NodeKey) {
        let Some(root) = self.root else {
            return;
        };
        if root == node {
            return;
        }
        self.cut(node);
        self.root = Some(self.link(root, node));
    }

    /// The node's children may now outrank it: re-pair them into one tree,
    /// put that tree where the node was, and meld the node back in alone.
    fn demote(&mut self, node: NodeKey) {
        let children = self.nodes[node].child.take();
        let replacement = self.combine(children);
        let prev = self.nodes[node].prev;
        let next = self.nodes[node].sibling;

        match replacement {
            Some(tree) => {
                self.nodes[tree].prev = prev;
                self.nodes[tree].sibling = next;
                if let Some(n) = next {
                    self.nodes[n].prev = Some(tree);
                }
                match prev {
                    Some(p) if self.nodes[p].child == Some(node) => self.nodes[p].child = Some(tree),
                    Some(p) => self.nodes[p].sibling = Some(tree),
                    None => self.root = Some(tree),
                }
                let detached = &mut self.nodes[node];
                detached.prev = None;
                detached.sibling = None;
            }
            None => {
                if prev.is_none() {
                    // a childless root is the whole heap
                    return;
                }
                self.cut(node);
            }
        }

        let root = self.root;
        self.root = Some(self.meld(root, node));
    }
}

impl<T, P: Ord> Default for PairingHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> fmt::Debug for PairingHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHeap")
            .field("len", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T, P: Ord> Extend<(Id, P, T)> for PairingHeap<T, P> {
    fn extend<I: IntoIterator<Item = (Id, P, T)>>(&mut self, iter: I) {
        for (id, priority, payload) in iter {
            self.push(id, priority, payload);
        }
    }
}
