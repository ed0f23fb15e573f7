//! Runtime choice of queue variant
//!
//! [`AnyQueue`] wraps one of the concrete variants behind a single type, for
//! drivers that pick the variant from a name at startup. Its operations
//! dispatch to the wrapped queue. Merging two `AnyQueue`s of different
//! variants is rejected with a [`MergeRejected`] that hands the donor back
//! untouched; different policies of the same variant merge fine, and the
//! receiver's policy wins.

use crate::arena::Handle;
use crate::binary::BinaryHeap;
use crate::binomial::{ConsolidationPolicy, LazyBinomialHeap};
use crate::element::Id;
use crate::fibonacci::FibonacciHeap;
use crate::pairing::{PairingHeap, PairingPolicy};
use crate::sibling_pairing::SiblingPairingHeap;
use crate::traits::{MergeableQueue, QueueError};
use std::fmt;
use std::str::FromStr;

/// Variant and policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    Binary,
    Binomial(ConsolidationPolicy),
    Fibonacci,
    Pairing(PairingPolicy),
    SiblingPairing(PairingPolicy),
}

impl QueueKind {
    /// Every selectable kind, in a stable order
    pub const ALL: [QueueKind; 8] = [
        QueueKind::Binary,
        QueueKind::Binomial(ConsolidationPolicy::SinglePass),
        QueueKind::Binomial(ConsolidationPolicy::MultiPass),
        QueueKind::Fibonacci,
        QueueKind::Pairing(PairingPolicy::TwoPass),
        QueueKind::Pairing(PairingPolicy::MultiPass),
        QueueKind::SiblingPairing(PairingPolicy::TwoPass),
        QueueKind::SiblingPairing(PairingPolicy::MultiPass),
    ];

    pub fn name(self) -> &'static str {
        match self {
            QueueKind::Binary => "binary",
            QueueKind::Binomial(ConsolidationPolicy::SinglePass) => "binomial-single",
            QueueKind::Binomial(ConsolidationPolicy::MultiPass) => "binomial-multi",
            QueueKind::Fibonacci => "fibonacci",
            QueueKind::Pairing(PairingPolicy::TwoPass) => "pairing-two",
            QueueKind::Pairing(PairingPolicy::MultiPass) => "pairing-multi",
            QueueKind::SiblingPairing(PairingPolicy::TwoPass) => "sibling-pairing-two",
            QueueKind::SiblingPairing(PairingPolicy::MultiPass) => "sibling-pairing-multi",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a variant name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQueueKindError(String);

impl fmt::Display for ParseQueueKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown queue kind `{}`", self.0)
    }
}

impl std::error::Error for ParseQueueKindError {}

impl FromStr for QueueKind {
    type Err = ParseQueueKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueueKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseQueueKindError(s.to_string()))
    }
}

/// A queue of any variant, chosen at runtime
pub enum AnyQueue<T, P: Ord> {
    Binary(BinaryHeap<T, P>),
    Binomial(LazyBinomialHeap<T, P>),
    Fibonacci(FibonacciHeap<T, P>),
    Pairing(PairingHeap<T, P>),
    SiblingPairing(SiblingPairingHeap<T, P>),
}

/// A merge refused because the two queues are different variants.
///
/// Carries the donor back to the caller unchanged.
pub struct MergeRejected<T, P: Ord> {
    donor: AnyQueue<T, P>,
}

impl<T, P: Ord> MergeRejected<T, P> {
    /// Always [`QueueError::IncompatibleMerge`]
    pub fn error(&self) -> QueueError {
        QueueError::IncompatibleMerge
    }

    pub fn donor(&self) -> &AnyQueue<T, P> {
        &self.donor
    }

    /// Returns the queue that was offered for merging
    pub fn into_donor(self) -> AnyQueue<T, P> {
        self.donor
    }
}

impl<T, P: Ord> fmt::Debug for MergeRejected<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeRejected")
            .field("donor", &self.donor)
            .finish()
    }
}

impl<T, P: Ord> fmt::Display for MergeRejected<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (donor is {})", self.error(), self.donor.kind())
    }
}

impl<T, P: Ord> std::error::Error for MergeRejected<T, P> {}

impl<T, P: Ord> From<MergeRejected<T, P>> for QueueError {
    fn from(rejected: MergeRejected<T, P>) -> Self {
        rejected.error()
    }
}

macro_rules! dispatch {
    ($self:expr, $queue:ident => $body:expr) => {
        match $self {
            AnyQueue::Binary($queue) => $body,
            AnyQueue::Binomial($queue) => $body,
            AnyQueue::Fibonacci($queue) => $body,
            AnyQueue::Pairing($queue) => $body,
            AnyQueue::SiblingPairing($queue) => $body,
        }
    };
}

impl<T, P: Ord> AnyQueue<T, P> {
    pub fn new(kind: QueueKind) -> Self {
        match kind {
            QueueKind::Binary => AnyQueue::Binary(BinaryHeap::new()),
            QueueKind::Binomial(policy) => AnyQueue::Binomial(LazyBinomialHeap::with_policy(policy)),
            QueueKind::Fibonacci => AnyQueue::Fibonacci(FibonacciHeap::new()),
            QueueKind::Pairing(policy) => AnyQueue::Pairing(PairingHeap::with_policy(policy)),
            QueueKind::SiblingPairing(policy) => {
                AnyQueue::SiblingPairing(SiblingPairingHeap::with_policy(policy))
            }
        }
    }

    pub fn kind(&self) -> QueueKind {
        match self {
            AnyQueue::Binary(_) => QueueKind::Binary,
            AnyQueue::Binomial(q) => QueueKind::Binomial(q.policy()),
            AnyQueue::Fibonacci(_) => QueueKind::Fibonacci,
            AnyQueue::Pairing(q) => QueueKind::Pairing(q.policy()),
            AnyQueue::SiblingPairing(q) => QueueKind::SiblingPairing(q.policy()),
        }
    }

    pub fn len(&self) -> usize {
        dispatch!(self, q => q.len())
    }

    pub fn is_empty(&self) -> bool {
        dispatch!(self, q => q.is_empty())
    }

    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn push(&mut self, id: Id, priority: P, payload: T) -> Handle {
        dispatch!(self, q => q.push(id, priority, payload))
    }

    pub fn pop(&mut self) -> Result<(Id, T), QueueError> {
        dispatch!(self, q => q.pop())
    }

    pub fn find_min(&self) -> Result<&T, QueueError> {
        dispatch!(self, q => q.find_min())
    }

    pub fn peek(&self) -> Option<(Id, &P, &T)> {
        dispatch!(self, q => q.peek())
    }

    pub fn priority(&self, handle: &Handle) -> Result<&P, QueueError> {
        dispatch!(self, q => q.priority(handle))
    }

    pub fn contains(&self, handle: &Handle) -> bool {
        dispatch!(self, q => q.contains(handle))
    }

    pub fn change_priority(&mut self, handle: &Handle, new_priority: P) -> Result<(), QueueError> {
        dispatch!(self, q => q.change_priority(handle, new_priority))
    }

    /// Absorbs `other` if it is the same variant.
    ///
    /// # Errors
    /// When the variants differ, neither queue is touched and `other` comes
    /// back inside the [`MergeRejected`].
    pub fn merge(&mut self, other: Self) -> Result<(), MergeRejected<T, P>> {
        match (self, other) {
            (AnyQueue::Binary(a), AnyQueue::Binary(b)) => a.merge(b),
            (AnyQueue::Binomial(a), AnyQueue::Binomial(b)) => a.merge(b),
            (AnyQueue::Fibonacci(a), AnyQueue::Fibonacci(b)) => a.merge(b),
            (AnyQueue::Pairing(a), AnyQueue::Pairing(b)) => a.merge(b),
            (AnyQueue::SiblingPairing(a), AnyQueue::SiblingPairing(b)) => a.merge(b),
            (_, donor) => return Err(MergeRejected { donor }),
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        dispatch!(self, q => q.clear())
    }

    pub fn verify_structure(&self) -> bool {
        dispatch!(self, q => q.verify_structure())
    }
}

impl<T, P: Ord> Extend<(Id, P, T)> for AnyQueue<T, P> {
    fn extend<I: IntoIterator<Item = (Id, P, T)>>(&mut self, iter: I) {
        for (id, priority, payload) in iter {
            self.push(id, priority, payload);
        }
    }
}

impl<T, P: Ord> fmt::Debug for AnyQueue<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyQueue")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}
