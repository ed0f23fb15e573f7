//! Binary Heap implementation
//!
//! An array-backed implicit complete binary tree with handle support.
//!
//! Element `i` has children `2i + 1` and `2i + 2` and parent `(i - 1) / 2`.
//! Elements themselves live in an arena; the array only holds their keys, and
//! every arena slot records the array position its key currently occupies.
//! Each swap updates both positions, so a handle finds its element's position
//! in O(1) without searching.
//!
//! # Time Complexity
//!
//! | Operation         | Complexity |
//! |-------------------|------------|
//! | `push`            | O(log n)   |
//! | `pop`             | O(log n)   |
//! | `peek`            | O(1)       |
//! | `change_priority` | O(log n)   |
//! | `merge`           | O(n)       |
//!
//! Merge appends the donor's elements and rebuilds heap order bottom-up. This
//! variant has no efficient merge; that is the price of the flat layout.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::binary::BinaryHeap;
//! use mergeable_heaps::MergeableQueue;
//!
//! let mut heap = BinaryHeap::new();
//! heap.push(0, 3, "three");
//! heap.push(1, 1, "one");
//! heap.push(2, 2, "two");
//!
//! assert_eq!(heap.peek(), Some((1, &1, &"one")));
//! assert_eq!(heap.pop(), Ok((1, "one")));
//! assert_eq!(heap.pop(), Ok((2, "two")));
//! assert_eq!(heap.pop(), Ok((0, "three")));
//! assert!(heap.pop().is_err());
//! ```

use crate::arena::{Arena, Handle, NodeKey};
use crate::element::{Element, Id, Shift};
use crate::traits::{MergeableQueue, QueueError};
use std::fmt;

struct Slot<P, T> {
    element: Element<P, T>,
    /// Current position of this slot's key in `order`
    index: usize,
}

/// Array-backed binary min-heap
pub struct BinaryHeap<T, P: Ord> {
    slots: Arena<Slot<P, T>>,
    /// Implicit complete binary tree of slot keys
    order: Vec<NodeKey>,
}

impl<T, P: Ord> MergeableQueue<T, P> for BinaryHeap<T, P> {
    fn new() -> Self {
        BinaryHeap {
            slots: Arena::new(),
            order: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn push(&mut self, id: Id, priority: P, payload: T) -> Handle {
        let index = self.order.len();
        let key = self.slots.insert(Slot {
            element: Element::new(id, priority, payload),
            index,
        });
        self.order.push(key);
        self.sift_up(index);
        self.slots.handle(key)
    }

    fn pop(&mut self) -> Result<(Id, T), QueueError> {
        if self.order.is_empty() {
            return Err(QueueError::EmptyQueue);
        }

        let last = self.order.len() - 1;
        self.swap(0, last);
        let key = self.order.pop().ok_or(QueueError::EmptyQueue)?;
        let slot = self.slots.remove(key).ok_or(QueueError::EmptyQueue)?;

        if !self.order.is_empty() {
            self.sift_down(0);
        }

        let (id, _, payload) = slot.element.into_parts();
        Ok((id, payload))
    }

    fn peek(&self) -> Option<(Id, &P, &T)> {
        self.order.first().map(|&key| {
            let element = &self.slots[key].element;
            (element.id, &element.priority, &element.payload)
        })
    }

    fn priority(&self, handle: &Handle) -> Result<&P, QueueError> {
        let key = self.slots.resolve(handle)?;
        Ok(&self.slots[key].element.priority)
    }

    fn change_priority(&mut self, handle: &Handle, new_priority: P) -> Result<(), QueueError> {
        let key = self.slots.resolve(handle)?;
        let slot = &mut self.slots[key];
        let shift = Shift::between(&slot.element.priority, &new_priority);
        slot.element.priority = new_priority;
        let index = slot.index;

        match shift {
            Shift::Promoted => self.sift_up(index),
            Shift::Demoted => self.sift_down(index),
            Shift::Unchanged => {}
        }
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        let BinaryHeap { slots, order } = other;
        self.slots.adopt(slots);
        if order.is_empty() {
            return;
        }

        self.order.reserve(order.len());
        for key in order {
            self.slots[key].index = self.order.len();
            self.order.push(key);
        }

        self.heapify();
    }

    fn clear(&mut self) {
        self.order.clear();
        self.slots.clear();
    }

    fn verify_structure(&self) -> bool {
        if self.order.len() != self.slots.len() {
            return false;
        }
        for (i, &key) in self.order.iter().enumerate() {
            if !self.slots.contains(key) || self.slots[key].index != i {
                return false;
            }
            if i > 0 && self.less(i, (i - 1) / 2) {
                return false;
            }
        }
        true
    }
}

impl<T, P: Ord> BinaryHeap<T, P> {
    /// True if the element at position `a` ranks strictly before the one at `b`
    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        let ea = &self.slots[self.order[a]].element;
        let eb = &self.slots[self.order[b]].element;
        ea.ranks_lt(eb)
    }

    /// Swaps two positions and records the new positions in both slots
    fn swap(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
        let (ka, kb) = (self.order[a], self.order[b]);
        self.slots[ka].index = a;
        self.slots[kb].index = b;
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.order.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }

            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    /// Restores heap order over the whole array in O(n)
    fn heapify(&mut self) {
        for index in (0..self.order.len() / 2).rev() {
            self.sift_down(index);
        }
    }
}

impl<T, P: Ord> Default for BinaryHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> fmt::Debug for BinaryHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("len", &self.len())
            .finish()
    }
}

impl<T, P: Ord> Extend<(Id, P, T)> for BinaryHeap<T, P> {
    fn extend<I: IntoIterator<Item = (Id, P, T)>>(&mut self, iter: I) {
        for (id, priority, payload) in iter {
            self.push(id, priority, payload);
        }
    }
}
