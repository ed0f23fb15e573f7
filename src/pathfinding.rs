//! Dijkstra's and A* search over any mergeable queue
//!
//! The open set is an [`IndexedQueue`] keyed by a dense index assigned to each
//! discovered search node. When a shorter route to an open node turns up, its
//! priority is changed in place instead of pushing a duplicate entry, so every
//! node is in the queue at most once.
//!
//! Dijkstra is A* with a zero heuristic; both share one search loop.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::pathfinding::{dijkstra, SearchNode};
//! use mergeable_heaps::pairing::PairingHeap;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Cell { x: i32, y: i32, goal: (i32, i32) }
//!
//! impl SearchNode for Cell {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, u32)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .into_iter()
//!             .map(|(dx, dy)| (Cell { x: self.x + dx, y: self.y + dy, goal: self.goal }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         (self.x, self.y) == self.goal
//!     }
//! }
//!
//! let start = Cell { x: 0, y: 0, goal: (2, 2) };
//! let (path, cost) = dijkstra::<_, PairingHeap<_, _>>(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use crate::element::Id;
use crate::registry::IndexedQueue;
use crate::traits::{MergeableQueue, QueueError};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::ops::Add;

/// Edge weights and path costs: ordered, copyable, additive, zero by default
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// A node of an implicitly defined search graph.
///
/// The node carries whatever context it needs to enumerate its neighbors and
/// to recognize a goal.
pub trait SearchNode: Clone + Eq + Hash {
    type Cost: Cost;

    /// Neighbors of this node with the cost of the connecting edge
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    fn is_goal(&self) -> bool;
}

/// A search node with an admissible estimate of the remaining cost.
///
/// The estimate must never exceed the true cost to the nearest goal, or A*
/// may return a suboptimal path.
pub trait AStarNode: SearchNode {
    fn heuristic(&self) -> Self::Cost;
}

type NodeIndex = usize;

struct NodeEntry<N: SearchNode> {
    node: N,
    g_score: N::Cost,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Discovered nodes, addressed by dense index
struct PathFinder<N: SearchNode> {
    entries: Vec<NodeEntry<N>>,
    index_of: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode> PathFinder<N> {
    fn new() -> Self {
        PathFinder {
            entries: Vec::new(),
            index_of: FxHashMap::default(),
        }
    }

    /// Returns the node's index and whether it was seen for the first time
    fn get_or_create_index(&mut self, node: N, g_score: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.index_of.get(&node) {
            return (index, false);
        }
        let index = self.entries.len();
        self.index_of.insert(node.clone(), index);
        self.entries.push(NodeEntry {
            node,
            g_score,
            came_from: None,
            closed: false,
        });
        (index, true)
    }

    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[current].node.clone()];
        while let Some(prev) = self.entries[current].came_from {
            path.push(self.entries[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from `start` until a node satisfies `is_goal()`.
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if no
/// goal is reachable. The graph reachable from `start` must be finite when
/// no goal exists.
///
/// ```rust
/// use mergeable_heaps::pathfinding::{dijkstra, SearchNode};
/// use mergeable_heaps::fibonacci::FibonacciHeap;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Step(u32);
///
/// impl SearchNode for Step {
///     type Cost = u32;
///     fn successors(&self) -> Vec<(Self, u32)> {
///         if self.0 < 10 { vec![(Step(self.0 + 1), 2)] } else { vec![] }
///     }
///     fn is_goal(&self) -> bool {
///         self.0 == 5
///     }
/// }
///
/// let (path, cost) = dijkstra::<_, FibonacciHeap<_, _>>(&Step(0)).unwrap();
/// assert_eq!(cost, 10);
/// assert_eq!(path.last(), Some(&Step(5)));
/// ```
pub fn dijkstra<N, Q>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    Q: MergeableQueue<(), N::Cost>,
{
    search_impl::<N, Q>(start, |_| N::Cost::default())
}

/// Runs A* search from `start`, guided by the node's heuristic
pub fn astar<N, Q>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: AStarNode,
    Q: MergeableQueue<(), N::Cost>,
{
    search_impl::<N, Q>(start, |n| n.heuristic())
}

fn search_impl<N, Q>(start: &N, heuristic: impl Fn(&N) -> N::Cost) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    Q: MergeableQueue<(), N::Cost>,
{
    let mut open: IndexedQueue<Q, (), N::Cost> = IndexedQueue::new();
    let mut finder = PathFinder::new();

    let (start_index, _) = finder.get_or_create_index(start.clone(), N::Cost::default());
    open.push(start_index as Id, heuristic(start), ());

    while let Ok((id, ())) = open.pop() {
        let current_index = id as NodeIndex;
        let current = &mut finder.entries[current_index];
        current.closed = true;

        let current_g = current.g_score;
        let current_node = current.node.clone();

        if current_node.is_goal() {
            return Some((finder.reconstruct_path(current_index), current_g));
        }

        for (neighbor, edge_cost) in current_node.successors() {
            let tentative_g = current_g + edge_cost;
            let f = tentative_g + heuristic(&neighbor);

            let (neighbor_index, is_new) = finder.get_or_create_index(neighbor, tentative_g);
            let entry = &mut finder.entries[neighbor_index];
            if entry.closed {
                continue;
            }

            if is_new {
                entry.came_from = Some(current_index);
                open.push(neighbor_index as Id, f, ());
            } else if tentative_g < entry.g_score {
                entry.g_score = tentative_g;
                entry.came_from = Some(current_index);
                reopen(&mut open, neighbor_index, f);
            }
        }
    }

    None
}

/// Lowers an open node's priority to `f`, pushing it again if the open set
/// has lost track of it.
fn reopen<Q, C>(open: &mut IndexedQueue<Q, (), C>, index: NodeIndex, f: C)
where
    Q: MergeableQueue<(), C>,
    C: Ord + Copy,
{
    let id = index as Id;
    if let Err(QueueError::InvalidHandle) = open.change_priority(id, f) {
        open.forget(id);
        open.push(id, f, ());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BinaryHeap;
    use crate::fibonacci::FibonacciHeap;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    struct Detour {
        id: u32,
        goal: u32,
    }

    impl SearchNode for Detour {
        type Cost = u32;

        fn successors(&self) -> Vec<(Self, u32)> {
            //   0 --10-> 1 --1-> 3
            //   |        ^
            //   1        5
            //   v        |
            //   2 -------+
            let edges: &[(u32, u32)] = match self.id {
                0 => &[(1, 10), (2, 1)],
                1 => &[(3, 1)],
                2 => &[(1, 5)],
                _ => &[],
            };
            edges
                .iter()
                .map(|&(id, cost)| (Detour { id, goal: self.goal }, cost))
                .collect()
        }

        fn is_goal(&self) -> bool {
            self.id == self.goal
        }
    }

    #[test]
    fn test_relaxation_changes_priority() {
        let start = Detour { id: 0, goal: 3 };
        let (path, cost) = dijkstra::<_, FibonacciHeap<_, _>>(&start).unwrap();
        assert_eq!(cost, 7);
        let ids: Vec<u32> = path.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_reopen_updates_or_requeues() {
        let mut open: IndexedQueue<FibonacciHeap<(), u32>, _, _> = IndexedQueue::new();
        open.push(0, 10, ());
        open.push(1, 20, ());

        reopen(&mut open, 1, 5);
        assert_eq!(open.len(), 2);
        assert_eq!(open.priority_of(1), Some(&5));

        // a node the open set no longer holds is pushed again
        reopen(&mut open, 7, 1);
        assert_eq!(open.len(), 3);
        assert_eq!(open.pop(), Ok((7, ())));
        assert_eq!(open.pop(), Ok((1, ())));
        assert!(open.verify_structure());
    }

    #[test]
    fn test_start_is_goal() {
        let start = Detour { id: 3, goal: 3 };
        let (path, cost) = dijkstra::<_, BinaryHeap<_, _>>(&start).unwrap();
        assert_eq!(cost, 0);
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn test_unreachable_goal() {
        let start = Detour { id: 0, goal: 9 };
        assert!(dijkstra::<_, BinaryHeap<_, _>>(&start).is_none());
    }
}
