//! Degree type for forest nodes.
//!
//! # Why u8?
//!
//! The degree of a root in a binomial or Fibonacci forest is bounded by
//! `O(log n)`: at most `log₂(n)` for binomial trees and `log_φ(n) ≈ 1.44 log₂(n)`
//! for Fibonacci trees. A `u8` covers any heap that fits in memory, and keeps
//! the per-node bookkeeping small next to the mark flag.

/// Number of direct children of a forest node.
pub type Degree = u8;

/// Largest representable degree.
pub const MAX_DEGREE: Degree = u8::MAX;

/// Increments a degree, panicking on overflow.
///
/// # Panics
///
/// Panics if `degree == MAX_DEGREE`, which would require a heap with more
/// than 2²⁵⁵ elements and therefore indicates corrupted bookkeeping.
///
/// ```rust
/// use mergeable_heaps::rank::checked_increment;
///
/// assert_eq!(checked_increment(5), 6);
/// ```
#[inline]
pub fn checked_increment(degree: Degree) -> Degree {
    degree
        .checked_add(1)
        .expect("degree overflow: forest degrees are bounded by O(log n)")
}

/// Decrements a degree, stopping at zero.
#[inline]
pub fn saturating_decrement(degree: Degree) -> Degree {
    degree.saturating_sub(1)
}

/// Size of a degree-indexed slot table for a heap of `len` elements.
///
/// Uses `log₂(len) * 2.1`, which clears the Fibonacci bound of
/// `log_φ(len) ≈ 1.44 log₂(len)` with room to spare.
pub fn degree_table_size(len: usize) -> usize {
    let log2 = (usize::BITS - len.max(1).leading_zeros()) as f64;
    (log2 * 2.1) as usize + 2
}
