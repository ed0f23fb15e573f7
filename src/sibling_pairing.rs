//! Heap-of-heaps Pairing Heap
//!
//! The same pairing algorithm as [`PairingHeap`](crate::pairing::PairingHeap),
//! on a different node shape. Here every node is itself a small heap: it owns
//! the list of its subheaps directly, oldest first, instead of encoding them
//! as a binary tree. Each node also records its parent and its position in
//! the parent's list, so a cut removes it with a swap-remove in O(1) and
//! never walks a sibling chain.
//!
//! Swap-remove reorders the parent's remaining subheaps. Heap order does not
//! depend on that order, so delete-min still returns elements in rank order;
//! only the pairing sequence of the affected parent changes.
//!
//! Both [`PairingPolicy`] values are supported.

use crate::arena::{Arena, Handle, NodeKey};
use crate::element::{Element, Id, Shift};
use crate::pairing::PairingPolicy;
use crate::traits::{MergeableQueue, QueueError};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

type Subheaps = SmallVec<[NodeKey; 4]>;

struct Node<P, T> {
    element: Element<P, T>,
    /// Child heaps, oldest link first
    subheaps: Subheaps,
    parent: Option<NodeKey>,
    /// Index into the parent's `subheaps`
    position: usize,
}

/// Heap-of-heaps Pairing Heap
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::pairing::PairingPolicy;
/// use mergeable_heaps::sibling_pairing::SiblingPairingHeap;
/// use mergeable_heaps::MergeableQueue;
///
/// let mut heap = SiblingPairingHeap::with_policy(PairingPolicy::TwoPass);
/// let handle = heap.push(0, 5, "item");
/// heap.push(1, 2, "other");
/// heap.change_priority(&handle, 1).unwrap();
/// assert_eq!(heap.pop(), Ok((0, "item")));
/// ```
pub struct SiblingPairingHeap<T, P: Ord> {
    nodes: Arena<Node<P, T>>,
    root: Option<NodeKey>,
    policy: PairingPolicy,
}

impl<T, P: Ord> MergeableQueue<T, P> for SiblingPairingHeap<T, P> {
    fn new() -> Self {
        Self::with_policy(PairingPolicy::default())
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, id: Id, priority: P, payload: T) -> Handle {
        let node = self.nodes.insert(Node {
            element: Element::new(id, priority, payload),
            subheaps: Subheaps::new(),
            parent: None,
            position: 0,
        });
        self.root = Some(self.meld(self.root, node));
        self.nodes.handle(node)
    }

    fn pop(&mut self) -> Result<(Id, T), QueueError> {
        let root = self.root.take().ok_or(QueueError::EmptyQueue)?;
        let node = self.nodes.remove(root).ok_or(QueueError::EmptyQueue)?;

        self.root = self.combine(node.subheaps);

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
        let SiblingPairingHeap {
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
        self.root = None;
        self.nodes.clear();
    }

    fn verify_structure(&self) -> bool {
        let Some(root) = self.root else {
            return self.nodes.len() == 0;
        };
        if self.nodes[root].parent.is_some() {
            return false;
        }

        let mut visited = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            visited += 1;
            if visited > self.len() {
                return false;
            }
            for (position, &sub) in self.nodes[node].subheaps.iter().enumerate() {
                let sub_node = &self.nodes[sub];
                if sub_node.parent != Some(node)
                    || sub_node.position != position
                    || self.node_lt(sub, node)
                {
                    return false;
                }
                stack.push(sub);
            }
        }

        visited == self.len()
    }
}

impl<T, P: Ord> SiblingPairingHeap<T, P> {
    /// Creates an empty heap using the given re-pairing policy
    pub fn with_policy(policy: PairingPolicy) -> Self {
        SiblingPairingHeap {
            nodes: Arena::new(),
            root: None,
            policy,
        }
    }

    pub fn policy(&self) -> PairingPolicy {
        self.policy
    }

    /// Number of subheaps held by the root
    pub fn root_degree(&self) -> usize {
        self.root.map_or(0, |r| self.nodes[r].subheaps.len())
    }

    #[inline]
    fn node_lt(&self, a: NodeKey, b: NodeKey) -> bool {
        self.nodes[a].element.ranks_lt(&self.nodes[b].element)
    }

    /// Links two detached heaps; the loser joins the winner's subheaps
    fn link(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (winner, loser) = if self.node_lt(b, a) { (b, a) } else { (a, b) };

        let position = self.nodes[winner].subheaps.len();
        self.nodes[winner].subheaps.push(loser);
        let loser_node = &mut self.nodes[loser];
        loser_node.parent = Some(winner);
        loser_node.position = position;
        winner
    }

    fn meld(&mut self, root: Option<NodeKey>, heap: NodeKey) -> NodeKey {
        match root {
            Some(root) => self.link(root, heap),
            None => heap,
        }
    }

    /// Re-pairs detached subheaps into one heap, newest first
    fn combine(&mut self, subheaps: Subheaps) -> Option<NodeKey> {
        for &sub in &subheaps {
            self.nodes[sub].parent = None;
        }

        let mut pairs: SmallVec<[NodeKey; 32]> = SmallVec::new();
        let mut newest_first = subheaps.into_iter().rev();
        while let Some(a) = newest_first.next() {
            match newest_first.next() {
                Some(b) => pairs.push(self.link(a, b)),
                None => pairs.push(a),
            }
        }

        let result = match self.policy {
            PairingPolicy::TwoPass => {
                let mut acc = pairs.pop()?;
                while let Some(heap) = pairs.pop() {
                    acc = self.link(heap, acc);
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

        self.nodes[result].parent = None;
        Some(result)
    }

    /// Removes `node` from its parent's subheaps
    fn cut(&mut self, node: NodeKey) {
        let Some(parent) = self.nodes[node].parent.take() else {
            return;
        };
        let position = self.nodes[node].position;
        let subheaps = &mut self.nodes[parent].subheaps;
        subheaps.swap_remove(position);
        let moved = subheaps.get(position).copied();
        if let Some(moved) = moved {
            self.nodes[moved].position = position;
        }
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

    /// Re-pairs the node's subheaps, puts the result in the node's place and
    /// melds the node back in alone.
    fn demote(&mut self, node: NodeKey) {
        let subheaps = std::mem::take(&mut self.nodes[node].subheaps);
        let replacement = self.combine(subheaps);
        let parent = self.nodes[node].parent;

        match (parent, replacement) {
            (None, None) => return,
            (None, Some(heap)) => {
                self.root = Some(heap);
            }
            (Some(p), Some(heap)) => {
                let position = self.nodes[node].position;
                self.nodes[p].subheaps[position] = heap;
                let heap_node = &mut self.nodes[heap];
                heap_node.parent = Some(p);
                heap_node.position = position;
                self.nodes[node].parent = None;
            }
            (Some(_), None) => self.cut(node),
        }

        let root = self.root;
        self.root = Some(self.meld(root, node));
    }
}

impl<T, P: Ord> Default for SiblingPairingHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> fmt::Debug for SiblingPairingHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiblingPairingHeap")
            .field("len", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T, P: Ord> Extend<(Id, P, T)> for SiblingPairingHeap<T, P> {
    fn extend<I: IntoIterator<Item = (Id, P, T)>>(&mut self, iter: I) {
        for (id, priority, payload) in iter {
            self.push(id, priority, payload);
        }
    }
}
