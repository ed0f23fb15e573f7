//! The mergeable priority queue contract
//!
//! Every variant in this crate implements [`MergeableQueue`] with the same
//! observable behavior: elements are ranked by priority, ties are broken by
//! the lower identifier, and any element can have its priority changed in
//! place through the [`Handle`] returned by `push`.
//!
//! The variants differ only in cost profile:
//!
//! | Variant | push | pop | change_priority (promote) | merge |
//! |---------|------|-----|---------------------------|-------|
//! | [`BinaryHeap`](crate::binary::BinaryHeap) | O(log n) | O(log n) | O(log n) | O(n) |
//! | [`LazyBinomialHeap`](crate::binomial::LazyBinomialHeap) | O(1) | O(log n) am. | O(log n) | O(1) splice |
//! | [`FibonacciHeap`](crate::fibonacci::FibonacciHeap) | O(1) | O(log n) am. | O(1) am. | O(1) splice |
//! | [`PairingHeap`](crate::pairing::PairingHeap) | O(1) | O(log n) am. | o(log n) am. | O(1) splice |
//! | [`SiblingPairingHeap`](crate::sibling_pairing::SiblingPairingHeap) | O(1) | O(log n) am. | o(log n) am. | O(1) splice |
//!
//! Merging hands the donor's arena segments to the receiver without moving
//! any node, so handles issued by either queue stay valid afterwards.

use crate::arena::Handle;
use crate::element::Id;
use std::fmt;

/// Error type for queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// `pop` or `find_min` on a queue with zero elements
    EmptyQueue,
    /// The handle is not live in this queue instance
    InvalidHandle,
    /// `merge` was given a queue of a different variant
    IncompatibleMerge,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::EmptyQueue => write!(f, "queue is empty"),
            QueueError::InvalidHandle => {
                write!(f, "handle does not refer to a live element of this queue")
            }
            QueueError::IncompatibleMerge => {
                write!(f, "cannot merge queues of different variants")
            }
        }
    }
}

impl std::error::Error for QueueError {}

/// Mergeable min-priority queue with in-place priority changes.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::FibonacciHeap;
/// use mergeable_heaps::MergeableQueue;
///
/// let mut queue = FibonacciHeap::new();
/// let a = queue.push(0, 5, "a");
/// queue.push(1, 3, "b");
/// queue.change_priority(&a, 1).unwrap();
/// assert_eq!(queue.find_min(), Ok(&"a"));
/// assert_eq!(queue.pop(), Ok((0, "a")));
/// ```
pub trait MergeableQueue<T, P: Ord>: Sized {
    /// Creates a new empty queue
    fn new() -> Self;

    /// Returns the number of live elements
    fn len(&self) -> usize;

    /// Returns true if the queue holds no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alias of [`len`](Self::len)
    fn size(&self) -> usize {
        self.len()
    }

    /// Inserts a new element and returns a handle to it.
    ///
    /// `id` must be unique among the live elements of this queue. This is a
    /// precondition and is not checked; duplicate identifiers make the
    /// tie-break between them arbitrary.
    fn push(&mut self, id: Id, priority: P, payload: T) -> Handle;

    /// Removes the minimum element, returning its identifier and payload.
    ///
    /// # Errors
    /// Returns [`QueueError::EmptyQueue`] if the queue has no elements.
    fn pop(&mut self) -> Result<(Id, T), QueueError>;

    /// Returns the minimum element's payload without removing it.
    ///
    /// # Errors
    /// Returns [`QueueError::EmptyQueue`] if the queue has no elements.
    fn find_min<'a>(&'a self) -> Result<&'a T, QueueError>
    where
        P: 'a,
    {
        self.peek()
            .map(|(_, _, payload)| payload)
            .ok_or(QueueError::EmptyQueue)
    }

    /// Returns the identifier, priority and payload of the minimum element
    fn peek(&self) -> Option<(Id, &P, &T)>;

    /// Returns the current priority of the element behind `handle`
    fn priority(&self, handle: &Handle) -> Result<&P, QueueError>;

    /// Returns true if `handle` refers to a live element of this queue
    fn contains(&self, handle: &Handle) -> bool {
        self.priority(handle).is_ok()
    }

    /// Sets the priority of the element behind `handle`.
    ///
    /// A more urgent priority runs the variant's promotion fix-up, a less
    /// urgent one its demotion fix-up. Setting an equal priority is a no-op.
    ///
    /// # Errors
    /// Returns [`QueueError::InvalidHandle`] if the handle does not refer to a
    /// live element of this queue. The queue is left untouched in that case.
    fn change_priority(&mut self, handle: &Handle, new_priority: P) -> Result<(), QueueError>;

    /// Absorbs every element of `other`, consuming it.
    ///
    /// Handles issued by `other` keep referring to the same elements, which
    /// now live in `self`.
    fn merge(&mut self, other: Self);

    /// Removes every element
    fn clear(&mut self);

    /// Checks heap order, the size counter and the variant's shape invariants.
    ///
    /// Intended for tests; walks the whole structure.
    fn verify_structure(&self) -> bool;
}
