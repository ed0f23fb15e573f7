//! Identifier-keyed access to a queue
//!
//! Handles are the only way to address an element inside a queue. Callers
//! that think in identifiers instead keep an [`IdRegistry`] next to the queue;
//! [`IndexedQueue`] bundles the two and keeps them in step through pops and
//! merges. Handles survive a merge, so merging two registries is a plain
//! union of their maps.

use crate::arena::Handle;
use crate::element::Id;
use crate::traits::{MergeableQueue, QueueError};
use rustc_hash::FxHashMap;
use std::fmt;
use std::marker::PhantomData;

/// Map from element identifier to the handle of the live element
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    handles: FxHashMap<Id, Handle>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `handle` for `id`, returning the handle it replaces
    pub fn insert(&mut self, id: Id, handle: Handle) -> Option<Handle> {
        self.handles.insert(id, handle)
    }

    pub fn get(&self, id: Id) -> Option<Handle> {
        self.handles.get(&id).copied()
    }

    pub fn remove(&mut self, id: Id) -> Option<Handle> {
        self.handles.remove(&id)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.handles.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Takes over every entry of `other`, inserting the smaller map into the larger
    pub fn absorb(&mut self, mut other: IdRegistry) {
        if other.handles.len() > self.handles.len() {
            std::mem::swap(&mut self.handles, &mut other.handles);
        }
        self.handles.extend(other.handles);
    }
}

/// A queue whose elements can be addressed by identifier.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::fibonacci::FibonacciHeap;
/// use mergeable_heaps::registry::IndexedQueue;
///
/// let mut queue: IndexedQueue<FibonacciHeap<&str, i32>, _, _> = IndexedQueue::new();
/// queue.push(7, 10, "seven");
/// queue.push(8, 20, "eight");
///
/// queue.change_priority(8, 1).unwrap();
/// assert_eq!(queue.pop(), Ok((8, "eight")));
/// assert!(!queue.contains_id(8));
/// ```
pub struct IndexedQueue<Q, T, P> {
    queue: Q,
    registry: IdRegistry,
    _marker: PhantomData<fn() -> (T, P)>,
}

impl<Q, T, P> IndexedQueue<Q, T, P>
where
    Q: MergeableQueue<T, P>,
    P: Ord,
{
    pub fn new() -> Self {
        IndexedQueue {
            queue: Q::new(),
            registry: IdRegistry::new(),
            _marker: PhantomData,
        }
    }

    /// Wraps an empty queue, e.g. one built with a non-default policy
    pub fn with_queue(queue: Q) -> Self {
        debug_assert!(queue.is_empty(), "elements pushed before wrapping have no registered id");
        IndexedQueue {
            queue,
            registry: IdRegistry::new(),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Inserts an element and registers its handle under `id`.
    ///
    /// `id` must not belong to a live element.
    pub fn push(&mut self, id: Id, priority: P, payload: T) -> Handle {
        let handle = self.queue.push(id, priority, payload);
        let previous = self.registry.insert(id, handle);
        debug_assert!(previous.is_none(), "identifier {id} is already live");
        handle
    }

    /// Removes the minimum element and forgets its identifier
    pub fn pop(&mut self) -> Result<(Id, T), QueueError> {
        let (id, payload) = self.queue.pop()?;
        self.registry.remove(id);
        Ok((id, payload))
    }

    pub fn peek(&self) -> Option<(Id, &P, &T)> {
        self.queue.peek()
    }

    pub fn find_min(&self) -> Result<&T, QueueError> {
        self.queue.find_min()
    }

    /// Changes the priority of the element registered under `id`.
    ///
    /// # Errors
    /// Returns [`QueueError::InvalidHandle`] if no live element has that id.
    pub fn change_priority(&mut self, id: Id, new_priority: P) -> Result<(), QueueError> {
        let handle = self.registry.get(id).ok_or(QueueError::InvalidHandle)?;
        self.queue.change_priority(&handle, new_priority)
    }

    /// Drops the registration of `id` without touching the queue
    pub(crate) fn forget(&mut self, id: Id) -> Option<Handle> {
        self.registry.remove(id)
    }

    pub fn contains_id(&self, id: Id) -> bool {
        self.registry.contains(id)
    }

    pub fn priority_of(&self, id: Id) -> Option<&P> {
        let handle = self.registry.get(id)?;
        self.queue.priority(&handle).ok()
    }

    pub fn handle_of(&self, id: Id) -> Option<Handle> {
        self.registry.get(id)
    }

    /// Absorbs `other`; identifiers must be disjoint from this queue's
    pub fn merge(&mut self, other: Self) {
        debug_assert!(
            other.registry.handles.keys().all(|id| !self.registry.contains(*id)),
            "merged queues share a live identifier"
        );
        self.queue.merge(other.queue);
        self.registry.absorb(other.registry);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.registry.clear();
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Checks the queue's structure and that every registered handle is live
    pub fn verify_structure(&self) -> bool {
        self.queue.verify_structure()
            && self.registry.len() == self.queue.len()
            && self
                .registry
                .handles
                .values()
                .all(|handle| self.queue.contains(handle))
    }
}

impl<Q, T, P> Default for IndexedQueue<Q, T, P>
where
    Q: MergeableQueue<T, P>,
    P: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: fmt::Debug, T, P> fmt::Debug for IndexedQueue<Q, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedQueue")
            .field("queue", &self.queue)
            .field("registered", &self.registry.len())
            .finish()
    }
}
