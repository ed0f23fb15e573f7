//! Property-based tests using proptest
//!
//! Random operation traces run against every variant and against a
//! `BTreeMap` model keyed by `(priority, id)`. After every step the queue must
//! agree with the model on size and minimum, and pass `verify_structure`.

use mergeable_heaps::any::{AnyQueue, QueueKind};
use mergeable_heaps::{Handle, Id, QueueError};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Pop,
    /// Index into the ids pushed so far, new priority
    Change(usize, i32),
    /// Build a second queue from these priorities and merge it in
    Merge(Vec<i32>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-50i32..50).prop_map(Op::Push),
        2 => Just(Op::Pop),
        3 => (0usize..200, -60i32..60).prop_map(|(i, p)| Op::Change(i, p)),
        1 => prop::collection::vec(-50i32..50, 0..12).prop_map(Op::Merge),
    ]
}

fn kind_strategy() -> impl Strategy<Value = QueueKind> {
    prop::sample::select(QueueKind::ALL.to_vec())
}

struct Model {
    order: BTreeMap<(i32, Id), ()>,
    live: HashMap<Id, i32>,
    /// Latest handle of every id ever pushed, popped ones included
    handles: HashMap<Id, Handle>,
    pushed: Vec<Id>,
    next_id: Id,
}

impl Model {
    fn new() -> Self {
        Model {
            order: BTreeMap::new(),
            live: HashMap::new(),
            handles: HashMap::new(),
            pushed: Vec::new(),
            next_id: 0,
        }
    }

    fn fresh_id(&mut self) -> Id {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&mut self, id: Id, handle: Handle, priority: i32) {
        self.order.insert((priority, id), ());
        self.live.insert(id, priority);
        self.handles.insert(id, handle);
        self.pushed.push(id);
    }

    fn min(&self) -> Option<(i32, Id)> {
        self.order.keys().next().copied()
    }
}

fn run_trace(kind: QueueKind, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut queue: AnyQueue<Id, i32> = AnyQueue::new(kind);
    let mut model = Model::new();

    for op in ops {
        match op {
            Op::Push(p) => {
                let id = model.fresh_id();
                let handle = queue.push(id, p, id);
                model.record(id, handle, p);
            }
            Op::Pop => {
                let expected = model.min();
                match queue.pop() {
                    Ok((id, payload)) => {
                        let (p, expected_id) = expected.ok_or_else(|| {
                            TestCaseError::fail("queue popped while model is empty")
                        })?;
                        prop_assert_eq!(id, expected_id);
                        prop_assert_eq!(payload, id);
                        model.order.remove(&(p, id));
                        model.live.remove(&id);
                        prop_assert!(!queue.contains(&model.handles[&id]));
                    }
                    Err(e) => {
                        prop_assert_eq!(e, QueueError::EmptyQueue);
                        prop_assert!(expected.is_none());
                    }
                }
            }
            Op::Change(index, p) => {
                if model.pushed.is_empty() {
                    continue;
                }
                let id = model.pushed[index % model.pushed.len()];
                let handle = model.handles[&id];
                match model.live.get(&id).copied() {
                    Some(old) => {
                        prop_assert_eq!(queue.change_priority(&handle, p), Ok(()));
                        prop_assert_eq!(queue.priority(&handle), Ok(&p));
                        model.order.remove(&(old, id));
                        model.order.insert((p, id), ());
                        model.live.insert(id, p);
                    }
                    None => {
                        prop_assert_eq!(
                            queue.change_priority(&handle, p),
                            Err(QueueError::InvalidHandle)
                        );
                    }
                }
            }
            Op::Merge(priorities) => {
                let mut other: AnyQueue<Id, i32> = AnyQueue::new(kind);
                let mut added = Vec::new();
                for p in priorities {
                    let id = model.fresh_id();
                    let handle = other.push(id, p, id);
                    added.push((id, handle, p));
                }
                prop_assert!(queue.merge(other).is_ok());
                // donor handles now address the merged queue
                for (id, handle, p) in added {
                    prop_assert_eq!(queue.priority(&handle), Ok(&p));
                    model.record(id, handle, p);
                }
            }
        }

        prop_assert_eq!(queue.len(), model.order.len());
        prop_assert_eq!(queue.peek().map(|(id, &p, _)| (p, id)), model.min());
        prop_assert!(queue.verify_structure());
    }

    // final drain reproduces the model's order
    let expected: Vec<Id> = model.order.keys().map(|&(_, id)| id).collect();
    let mut drained = Vec::new();
    while let Ok((id, _)) = queue.pop() {
        drained.push(id);
    }
    prop_assert_eq!(drained, expected);
    Ok(())
}

/// Two policies of the same variant must produce the same pop sequence
fn run_policy_pair(a: QueueKind, b: QueueKind, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut left: AnyQueue<(), i32> = AnyQueue::new(a);
    let mut right: AnyQueue<(), i32> = AnyQueue::new(b);
    let mut left_handles = Vec::new();
    let mut right_handles = Vec::new();
    let mut next_id: Id = 0;

    for op in ops {
        match op {
            Op::Push(p) => {
                left_handles.push(left.push(next_id, p, ()));
                right_handles.push(right.push(next_id, p, ()));
                next_id += 1;
            }
            Op::Pop => {
                prop_assert_eq!(left.pop(), right.pop());
            }
            Op::Change(index, p) => {
                if left_handles.is_empty() {
                    continue;
                }
                let i = index % left_handles.len();
                prop_assert_eq!(
                    left.change_priority(&left_handles[i], p),
                    right.change_priority(&right_handles[i], p)
                );
            }
            Op::Merge(priorities) => {
                let mut extra_left = AnyQueue::new(a);
                let mut extra_right = AnyQueue::new(b);
                for p in priorities {
                    left_handles.push(extra_left.push(next_id, p, ()));
                    right_handles.push(extra_right.push(next_id, p, ()));
                    next_id += 1;
                }
                prop_assert!(left.merge(extra_left).is_ok());
                prop_assert!(right.merge(extra_right).is_ok());
            }
        }
    }

    loop {
        let (l, r) = (left.pop(), right.pop());
        prop_assert_eq!(l, r);
        if l.is_err() {
            break;
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_trace_matches_model(
        kind in kind_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..120)
    ) {
        run_trace(kind, ops)?;
    }

    #[test]
    fn test_binomial_policies_agree(ops in prop::collection::vec(op_strategy(), 0..150)) {
        use mergeable_heaps::binomial::ConsolidationPolicy;
        run_policy_pair(
            QueueKind::Binomial(ConsolidationPolicy::SinglePass),
            QueueKind::Binomial(ConsolidationPolicy::MultiPass),
            ops,
        )?;
    }

    #[test]
    fn test_pairing_policies_agree(ops in prop::collection::vec(op_strategy(), 0..150)) {
        use mergeable_heaps::pairing::PairingPolicy;
        run_policy_pair(
            QueueKind::Pairing(PairingPolicy::TwoPass),
            QueueKind::Pairing(PairingPolicy::MultiPass),
            ops,
        )?;
    }

    #[test]
    fn test_sibling_pairing_policies_agree(ops in prop::collection::vec(op_strategy(), 0..150)) {
        use mergeable_heaps::pairing::PairingPolicy;
        run_policy_pair(
            QueueKind::SiblingPairing(PairingPolicy::TwoPass),
            QueueKind::SiblingPairing(PairingPolicy::MultiPass),
            ops,
        )?;
    }

    #[test]
    fn test_both_pairing_shapes_agree(ops in prop::collection::vec(op_strategy(), 0..150)) {
        use mergeable_heaps::pairing::PairingPolicy;
        run_policy_pair(
            QueueKind::Pairing(PairingPolicy::TwoPass),
            QueueKind::SiblingPairing(PairingPolicy::TwoPass),
            ops,
        )?;
    }

    #[test]
    fn test_all_variants_agree(ops in prop::collection::vec(op_strategy(), 0..150)) {
        run_policy_pair(QueueKind::Binary, QueueKind::Fibonacci, ops.clone())?;
        run_policy_pair(
            QueueKind::Binary,
            QueueKind::Pairing(Default::default()),
            ops,
        )?;
    }
}
