//! A reusable A* search in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html),
//! working on floating point costs. Improved nodes are pushed again and stale heap
//! entries are skipped when popped, so no decrease-key is needed.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use log::{trace, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    index: usize,
}

impl<K: PartialOrd> Eq for SmallestCostHolder<K> {}

impl<K: PartialOrd> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first. Ties favour the larger cost so far (deeper
        // nodes), then the node that was discovered first. Costs are never NaN.
        match other
            .estimated_cost
            .partial_cmp(&self.estimated_cost)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => match self
                .cost
                .partial_cmp(&other.cost)
                .unwrap_or(Ordering::Equal)
            {
                Ordering::Equal => other.index.cmp(&self.index),
                s => s,
            },
            s => s,
        }
    }
}

/// Why [SearchContext::astar] returned without a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchFailure {
    /// Every node reachable from the start was expanded.
    Exhausted,
    /// The expansion budget ran out first.
    LimitReached(usize),
}

/// Heap and parent map of a search, kept between calls so their allocations are reused.
pub struct SearchContext<N, C> {
    to_see: BinaryHeap<SmallestCostHolder<C>>,
    parents: FxIndexMap<N, (usize, C)>,
}

impl<N, C> Default for SearchContext<N, C> {
    fn default() -> Self {
        SearchContext {
            to_see: BinaryHeap::new(),
            parents: FxIndexMap::default(),
        }
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + PartialOrd + Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn reverse_path(&self, start: usize) -> Vec<N> {
        let mut i = start;
        let mut path: Vec<N> = std::iter::from_fn(|| {
            self.parents.get_index(i).map(|(node, &(parent, _))| {
                i = parent;
                node.clone()
            })
        })
        .collect();
        path.reverse();
        path
    }

    /// Searches from `start` until `success` holds for a popped node. Returns the
    /// node sequence including `start` and the cost of reaching the last node.
    pub fn astar<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
        max_expansions: Option<usize>,
    ) -> Result<(Vec<N>, C), SearchFailure>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.to_see.clear();
        self.parents.clear();
        self.to_see.push(SmallestCostHolder {
            estimated_cost: heuristic(start),
            cost: Zero::zero(),
            index: 0,
        });
        self.parents.insert(start.clone(), (usize::MAX, Zero::zero()));
        let mut expansions = 0usize;
        while let Some(SmallestCostHolder { cost, index, .. }) = self.to_see.pop() {
            let successors = {
                let Some((node, &(_, c))) = self.parents.get_index(index) else {
                    continue;
                };
                // A node is pushed again whenever a cheaper way to it is found. Only
                // the entry matching the recorded cost is current.
                if cost > c {
                    continue;
                }
                if success(node) {
                    trace!("Goal popped after {} expansions", expansions);
                    return Ok((self.reverse_path(index), c));
                }
                if let Some(limit) = max_expansions {
                    if expansions >= limit {
                        warn!("Search abandoned after {} expansions", limit);
                        return Err(SearchFailure::LimitReached(limit));
                    }
                }
                expansions += 1;
                successors(node)
            };
            for (successor, move_cost) in successors {
                let new_cost = cost + move_cost;
                let h;
                let n;
                match self.parents.entry(successor) {
                    Vacant(e) => {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    }
                    Occupied(mut e) => {
                        if e.get().1 > new_cost {
                            h = heuristic(e.key());
                            n = e.index();
                            e.insert((index, new_cost));
                        } else {
                            continue;
                        }
                    }
                }

                self.to_see.push(SmallestCostHolder {
                    estimated_cost: new_cost + h,
                    cost: new_cost,
                    index: n,
                });
            }
        }
        Err(SearchFailure::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_successors(n: &i32) -> Vec<(i32, f32)> {
        vec![(n - 1, 1.0), (n + 1, 1.0)]
            .into_iter()
            .filter(|(m, _)| (0..10).contains(m))
            .collect()
    }

    #[test]
    fn heap_pops_smallest_estimate() {
        let mut heap = BinaryHeap::new();
        for (estimated_cost, cost, index) in [(3.0, 1.0, 0), (1.0, 0.0, 1), (1.0, 0.5, 2)] {
            heap.push(SmallestCostHolder {
                estimated_cost,
                cost,
                index,
            });
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|h| h.index)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn equal_keys_pop_in_discovery_order() {
        let mut heap = BinaryHeap::new();
        for index in [4, 1, 3] {
            heap.push(SmallestCostHolder {
                estimated_cost: 2.0,
                cost: 1.0,
                index,
            });
        }
        assert_eq!(heap.pop().map(|h| h.index), Some(1));
        assert_eq!(heap.pop().map(|h| h.index), Some(3));
    }

    #[test]
    fn search_on_a_line() {
        let mut context: SearchContext<i32, f32> = SearchContext::new();
        let (path, cost) = context
            .astar(
                &2,
                line_successors,
                |n| (7 - n).abs() as f32,
                |n| *n == 7,
                None,
            )
            .unwrap();
        assert_eq!(path, vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(cost, 5.0);
    }

    #[test]
    fn exhausted_and_limited() {
        let mut context: SearchContext<i32, f32> = SearchContext::new();
        let result = context.astar(&2, line_successors, |_| 0.0, |n| *n == 42, None);
        assert_eq!(result, Err(SearchFailure::Exhausted));
        let result = context.astar(&0, line_successors, |_| 0.0, |n| *n == 9, Some(3));
        assert_eq!(result, Err(SearchFailure::LimitReached(3)));
    }

    #[test]
    fn context_is_reusable() {
        let mut context: SearchContext<i32, f32> = SearchContext::new();
        let first = context.astar(&0, line_successors, |n| (9 - n) as f32, |n| *n == 9, None);
        let _ = context.astar(&5, line_successors, |_| 0.0, |n| *n == 42, None);
        let again = context.astar(&0, line_successors, |n| (9 - n) as f32, |n| *n == 9, None);
        assert_eq!(first, again);
    }
}
