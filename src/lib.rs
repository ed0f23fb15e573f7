//! Mergeable Priority Queues for Rust
//!
//! This crate provides min-priority queues that support merging two queues
//! and changing the priority of any stored element through a handle.
//!
//! # Features
//!
//! - **Binary Heap**: array-backed baseline; O(log n) push, pop and change_priority; O(n) merge
//! - **Lazy Binomial Heap**: O(1) push and merge; O(log n) amortized pop; single-pass or multi-pass consolidation
//! - **Fibonacci Heap**: O(1) push and merge; O(1) amortized promotion; O(log n) amortized pop
//! - **Pairing Heap**: O(1) push and merge; O(log n) amortized pop; two-pass or multi-pass re-pairing
//! - **Heap-of-heaps Pairing Heap**: the same pairing algorithm with per-node subheap lists and parent links
//!
//! Merging hands the donor's storage to the receiver without moving nodes, so
//! handles from both queues stay valid.
//!
//! All variants rank elements by priority and break ties by the lower
//! identifier, so every variant extracts the same sequence for the same
//! operations. [`any::AnyQueue`] picks a variant at runtime, and
//! [`registry::IndexedQueue`] addresses elements by identifier instead of
//! handle.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::fibonacci::FibonacciHeap;
//! use mergeable_heaps::MergeableQueue;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.push(0, 5, "item1");
//! heap.push(1, 3, "item2");
//! heap.change_priority(&handle1, 1).unwrap();
//! assert_eq!(heap.peek(), Some((0, &1, &"item1")));
//! ```

pub mod any;
pub mod arena;
pub mod binary;
pub mod binomial;
pub mod element;
pub mod fibonacci;
pub mod pairing;
pub mod pathfinding;
pub mod random_ids;
pub mod rank;
pub mod registry;
pub mod sibling_pairing;
pub mod traits;

pub use arena::Handle;
pub use element::{Element, Id};
pub use traits::{MergeableQueue, QueueError};
