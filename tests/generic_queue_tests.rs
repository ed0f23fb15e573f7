//! Generic tests for every MergeableQueue implementation
//!
//! Each helper takes freshly constructed queues so that policy variants of
//! the same type run through the same checks. The `queue_tests!` macro at the
//! bottom instantiates the whole suite per variant and policy.

use mergeable_heaps::binary::BinaryHeap;
use mergeable_heaps::binomial::{ConsolidationPolicy, LazyBinomialHeap};
use mergeable_heaps::fibonacci::FibonacciHeap;
use mergeable_heaps::pairing::{PairingHeap, PairingPolicy};
use mergeable_heaps::sibling_pairing::SiblingPairingHeap;
use mergeable_heaps::{Id, MergeableQueue, QueueError};

fn drain_ids<T, P: Ord, Q: MergeableQueue<T, P>>(queue: &mut Q) -> Vec<Id> {
    let mut ids = Vec::with_capacity(queue.len());
    while let Ok((id, _)) = queue.pop() {
        ids.push(id);
    }
    ids
}

/// Empty queue reports errors instead of panicking
fn test_empty_queue<Q: MergeableQueue<String, i32>>(mut queue: Q) {
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.peek(), None);
    assert_eq!(queue.find_min(), Err(QueueError::EmptyQueue));
    assert_eq!(queue.pop(), Err(QueueError::EmptyQueue));
    assert!(queue.verify_structure());
}

fn test_sorted_extraction<Q: MergeableQueue<&'static str, i32>>(mut queue: Q) {
    let priorities = [5, 3, 8, 1, 4];
    let names = ["zero", "one", "two", "three", "four"];
    for (id, (&p, &name)) in priorities.iter().zip(names.iter()).enumerate() {
        queue.push(id as Id, p, name);
    }
    assert!(queue.verify_structure());

    assert_eq!(queue.find_min(), Ok(&"three"));
    let mut popped = Vec::new();
    while let Some((id, &priority, _)) = queue.peek() {
        popped.push((id, priority));
        queue.pop().unwrap();
        assert!(queue.verify_structure());
    }
    assert_eq!(popped, vec![(3, 1), (1, 3), (4, 4), (0, 5), (2, 8)]);
}

fn test_tie_break<Q: MergeableQueue<(), i32>>(mut queue: Q) {
    queue.push(5, 10, ());
    queue.push(2, 10, ());
    assert_eq!(queue.pop(), Ok((2, ())));
    assert_eq!(queue.pop(), Ok((5, ())));
}

fn test_all_same_priority<Q: MergeableQueue<u64, i32>>(mut queue: Q) {
    for id in (0..50u64).rev() {
        queue.push(id, 7, id);
    }
    assert_eq!(drain_ids(&mut queue), (0..50).collect::<Vec<_>>());
}

fn test_decrease_key<Q: MergeableQueue<i32, i32>>(mut queue: Q) {
    let handles: Vec<_> = (0..40).map(|i| queue.push(i, 100 + i as i32, i as i32)).collect();
    queue.pop().unwrap();
    queue.pop().unwrap();

    // deeply buried after the consolidation above
    queue.change_priority(&handles[33], 1).unwrap();
    assert!(queue.verify_structure());
    assert_eq!(queue.priority(&handles[33]), Ok(&1));
    assert_eq!(queue.pop(), Ok((33, 33)));

    queue.change_priority(&handles[20], -5).unwrap();
    queue.change_priority(&handles[10], -4).unwrap();
    assert_eq!(queue.pop(), Ok((20, 20)));
    assert_eq!(queue.pop(), Ok((10, 10)));
    assert!(queue.verify_structure());
}

fn test_increase_key<Q: MergeableQueue<i32, i32>>(mut queue: Q) {
    let handles: Vec<_> = (0..30).map(|i| queue.push(i, i as i32, i as i32)).collect();
    queue.pop().unwrap();

    // raise the current minimum above everything else
    queue.change_priority(&handles[1], 1000).unwrap();
    assert!(queue.verify_structure());
    assert_eq!(queue.pop(), Ok((2, 2)));

    // raise an interior element and check it comes out last
    queue.change_priority(&handles[15], 500).unwrap();
    assert!(queue.verify_structure());
    let order = drain_ids(&mut queue);
    let mut expected: Vec<Id> = (3..30).filter(|&i| i != 15).collect();
    expected.push(15);
    expected.push(1);
    assert_eq!(order, expected);
}

fn test_unchanged_priority<Q: MergeableQueue<(), i32>>(mut queue: Q) {
    let handles: Vec<_> = (0..10).map(|i| queue.push(i, i as i32 % 3, ())).collect();
    for (i, h) in handles.iter().enumerate() {
        queue.change_priority(h, i as i32 % 3).unwrap();
    }
    assert!(queue.verify_structure());
    assert_eq!(drain_ids(&mut queue), vec![0, 3, 6, 9, 1, 4, 7, 2, 5, 8]);
}

fn test_invalid_handles<Q: MergeableQueue<(), i32>>(mut queue: Q, mut other: Q) {
    let popped = queue.push(0, 1, ());
    queue.push(1, 2, ());
    let foreign = other.push(0, 1, ());
    queue.pop().unwrap();

    assert_eq!(queue.change_priority(&popped, 0), Err(QueueError::InvalidHandle));
    assert_eq!(queue.priority(&popped), Err(QueueError::InvalidHandle));
    assert_eq!(queue.change_priority(&foreign, 0), Err(QueueError::InvalidHandle));
    assert!(!queue.contains(&foreign));

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.peek(), Some((1, &2, &())));
    assert!(queue.verify_structure());
}

fn test_merge_additivity<Q: MergeableQueue<i32, i32>>(mut left: Q, mut right: Q) {
    let left_priorities = [9, 4, 17, 4, 0, 12, 30];
    let right_priorities = [3, 4, 25, 8, 1];
    for (i, &p) in left_priorities.iter().enumerate() {
        left.push(i as Id, p, p);
    }
    for (i, &p) in right_priorities.iter().enumerate() {
        right.push(100 + i as Id, p, p);
    }
    left.pop().unwrap();
    right.pop().unwrap();

    left.merge(right);
    assert_eq!(left.len(), left_priorities.len() + right_priorities.len() - 2);
    assert!(left.verify_structure());

    let mut expected: Vec<i32> = left_priorities
        .iter()
        .chain(right_priorities.iter())
        .copied()
        .collect();
    expected.sort_unstable();
    expected.drain(..2);

    let mut got = Vec::new();
    while let Ok((_, p)) = left.pop() {
        got.push(p);
    }
    assert_eq!(got, expected);
}

fn test_merge_keeps_handles<Q: MergeableQueue<(), i32>>(mut left: Q, mut right: Q) {
    let kept: Vec<_> = (0..10).map(|i| left.push(i, 50 + i as i32, ())).collect();
    let moved: Vec<_> = (0..10).map(|i| right.push(100 + i, 70 + i as i32, ())).collect();

    left.merge(right);
    assert_eq!(left.len(), 20);
    for h in kept.iter().chain(&moved) {
        assert!(left.contains(h));
    }
    assert_eq!(left.priority(&moved[7]), Ok(&77));
    assert_eq!(left.priority(&kept[3]), Ok(&53));

    left.change_priority(&moved[7], 0).unwrap();
    left.change_priority(&kept[0], 90).unwrap();
    assert!(left.verify_structure());
    assert_eq!(left.pop(), Ok((107, ())));
    assert_eq!(left.pop(), Ok((1, ())));
    assert!(!left.contains(&moved[7]));
    assert!(left.verify_structure());
}

fn test_merge_empty<Q: MergeableQueue<i32, i32>>(mut a: Q, b: Q, c: Q) {
    a.merge(b);
    assert!(a.is_empty());

    a.push(1, 1, 1);
    a.merge(c);
    assert_eq!(a.len(), 1);

    let mut empty = Q::new();
    empty.merge(a);
    assert_eq!(empty.pop(), Ok((1, 1)));
    assert!(empty.verify_structure());
}

fn test_size_round_trip<Q: MergeableQueue<(), i64>>(mut queue: Q) {
    let handles: Vec<_> = (0..64).map(|i| queue.push(i, (i * 37 % 64) as i64, ())).collect();
    let mut live = 64;
    for (step, h) in handles.iter().enumerate() {
        if queue.contains(h) {
            let _ = queue.change_priority(h, (step as i64 * 13) % 31 - 15);
        }
        if step % 3 == 0 {
            queue.pop().unwrap();
            live -= 1;
        }
        assert_eq!(queue.size(), live);
        assert_eq!(queue.len(), live);
    }
    assert!(queue.verify_structure());
}

fn test_clear_and_reuse<Q: MergeableQueue<String, i32>>(mut queue: Q) {
    let h = queue.push(0, 3, "a".to_string());
    for i in 1..20 {
        queue.push(i, i as i32, format!("item {i}"));
    }
    queue.pop().unwrap();
    queue.clear();

    assert!(queue.is_empty());
    assert!(!queue.contains(&h));
    assert!(queue.verify_structure());

    queue.push(3, 9, "again".to_string());
    assert_eq!(queue.find_min(), Ok(&"again".to_string()));
}

fn test_extend<Q: MergeableQueue<char, u32> + Extend<(Id, u32, char)>>(mut queue: Q) {
    queue.extend([(0, 3, 'c'), (1, 1, 'a'), (2, 2, 'b')]);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.find_min(), Ok(&'a'));
}

fn test_mixed_workload<Q: MergeableQueue<u64, i64>>(mut queue: Q) {
    let mut handles = Vec::new();
    let mut next_id = 0u64;
    for round in 0..400i64 {
        let h = queue.push(next_id, (round * 7919) % 1000, next_id);
        handles.push(h);
        next_id += 1;

        if round % 5 == 0 {
            let target = handles[(round as usize * 31) % handles.len()];
            if queue.contains(&target) {
                let current = *queue.priority(&target).unwrap();
                let delta = if round % 2 == 0 { -250 } else { 250 };
                queue.change_priority(&target, current + delta).unwrap();
            }
        }
        if round % 3 == 0 {
            queue.pop().unwrap();
        }
        if round % 50 == 0 {
            assert!(queue.verify_structure());
        }
    }

    let mut last = None;
    while let Some((id, &priority, _)) = queue.peek() {
        if let Some(prev) = last {
            assert!(prev < (priority, id));
        }
        last = Some((priority, id));
        queue.pop().unwrap();
    }
}

macro_rules! queue_tests {
    ($module:ident, $queue:ident, $make:expr) => {
        mod $module {
            use super::*;

            fn make<T, P: Ord>() -> $queue<T, P> {
                $make
            }

            #[test]
            fn empty_queue() {
                test_empty_queue(make());
            }

            #[test]
            fn sorted_extraction() {
                test_sorted_extraction(make());
            }

            #[test]
            fn tie_break() {
                test_tie_break(make());
            }

            #[test]
            fn all_same_priority() {
                test_all_same_priority(make());
            }

            #[test]
            fn decrease_key() {
                test_decrease_key(make());
            }

            #[test]
            fn increase_key() {
                test_increase_key(make());
            }

            #[test]
            fn unchanged_priority() {
                test_unchanged_priority(make());
            }

            #[test]
            fn invalid_handles() {
                test_invalid_handles(make(), make());
            }

            #[test]
            fn merge_additivity() {
                test_merge_additivity(make(), make());
            }

            #[test]
            fn merge_keeps_handles() {
                test_merge_keeps_handles(make(), make());
            }

            #[test]
            fn merge_empty() {
                test_merge_empty(make(), make(), make());
            }

            #[test]
            fn size_round_trip() {
                test_size_round_trip(make());
            }

            #[test]
            fn clear_and_reuse() {
                test_clear_and_reuse(make());
            }

            #[test]
            fn extend() {
                test_extend(make());
            }

            #[test]
            fn mixed_workload() {
                test_mixed_workload(make());
            }
        }
    };
}

queue_tests!(binary, BinaryHeap, BinaryHeap::new());
queue_tests!(
    binomial_single,
    LazyBinomialHeap,
    LazyBinomialHeap::with_policy(ConsolidationPolicy::SinglePass)
);
queue_tests!(
    binomial_multi,
    LazyBinomialHeap,
    LazyBinomialHeap::with_policy(ConsolidationPolicy::MultiPass)
);
queue_tests!(fibonacci, FibonacciHeap, FibonacciHeap::new());
queue_tests!(
    pairing_two,
    PairingHeap,
    PairingHeap::with_policy(PairingPolicy::TwoPass)
);
queue_tests!(
    pairing_multi,
    PairingHeap,
    PairingHeap::with_policy(PairingPolicy::MultiPass)
);
queue_tests!(
    sibling_pairing_two,
    SiblingPairingHeap,
    SiblingPairingHeap::with_policy(PairingPolicy::TwoPass)
);
queue_tests!(
    sibling_pairing_multi,
    SiblingPairingHeap,
    SiblingPairingHeap::with_policy(PairingPolicy::MultiPass)
);
