//! The unit of data stored in every queue.
//!
//! An [`Element`] couples a caller-assigned identifier, a mutable priority and
//! an opaque payload. All variants order elements the same way: by priority
//! first, and by identifier when priorities are equal, so the element with the
//! lower identifier wins a tie. This makes pop order fully deterministic for
//! any input trace.

use std::cmp::Ordering;

/// Caller-assigned element identifier.
///
/// Must be unique among the live elements of one queue instance.
pub type Id = u64;

/// An element stored in a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<P, T> {
    /// Stable identifier, also the tie-breaker between equal priorities
    pub id: Id,
    /// Current priority, only changed through `change_priority`
    pub priority: P,
    /// Opaque payload, never inspected by the heap logic
    pub payload: T,
}

impl<P: Ord, T> Element<P, T> {
    pub fn new(id: Id, priority: P, payload: T) -> Self {
        Element {
            id,
            priority,
            payload,
        }
    }

    /// Full rank comparison: priority, then identifier.
    #[inline]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        rank_cmp(&self.priority, self.id, &other.priority, other.id)
    }

    /// True if `self` ranks at or before `other`.
    #[inline]
    pub fn ranks_le(&self, other: &Self) -> bool {
        self.rank_cmp(other) != Ordering::Greater
    }

    /// True if `self` ranks strictly before `other`.
    #[inline]
    pub fn ranks_lt(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Less
    }

    pub fn into_parts(self) -> (Id, P, T) {
        (self.id, self.priority, self.payload)
    }
}

/// Compares two (priority, identifier) pairs.
#[inline]
pub fn rank_cmp<P: Ord>(a_priority: &P, a_id: Id, b_priority: &P, b_id: Id) -> Ordering {
    a_priority.cmp(b_priority).then(a_id.cmp(&b_id))
}

/// How a priority update moves an element relative to its old rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shift {
    /// New rank is more urgent: fix up toward the root.
    Promoted,
    /// New rank is less urgent: fix up toward the leaves.
    Demoted,
    Unchanged,
}

impl Shift {
    pub(crate) fn between<P: Ord>(old: &P, new: &P) -> Shift {
        // identifiers never change, so the priority alone decides
        match new.cmp(old) {
            Ordering::Less => Shift::Promoted,
            Ordering::Greater => Shift::Demoted,
            Ordering::Equal => Shift::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_dominates_identifier() {
        let a = Element::new(9, 1, ());
        let b = Element::new(0, 2, ());
        assert!(a.ranks_lt(&b));
        assert!(!b.ranks_le(&a));
    }

    #[test]
    fn test_identifier_breaks_ties() {
        let a = Element::new(2, 10, "a");
        let b = Element::new(5, 10, "b");
        assert_eq!(a.rank_cmp(&b), Ordering::Less);
        assert!(a.ranks_le(&b));
        assert!(a.ranks_le(&a));
        assert!(!a.ranks_lt(&a));
    }

    #[test]
    fn test_shift_direction() {
        assert_eq!(Shift::between(&5, &3), Shift::Promoted);
        assert_eq!(Shift::between(&5, &8), Shift::Demoted);
        assert_eq!(Shift::between(&5, &5), Shift::Unchanged);
    }
}
