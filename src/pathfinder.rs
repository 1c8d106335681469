use log::{debug, warn};

use crate::astar::{SearchContext, SearchFailure};
use crate::config::SearchConfig;
use crate::error::{NavError, Result};
use crate::graph::WaypointGraph;
use crate::path::Path;
use crate::waypoint::WaypointId;

/// A* over a [WaypointGraph] using Euclidean distance both as edge cost and as
/// heuristic, which makes the heuristic consistent and the returned paths optimal.
/// Owns its search context so repeated queries reuse the same allocations.
pub struct PathFinder {
    pub config: SearchConfig,
    context: SearchContext<WaypointId, f32>,
}

impl Default for PathFinder {
    fn default() -> Self {
        PathFinder::new(SearchConfig::default())
    }
}

impl PathFinder {
    pub fn new(config: SearchConfig) -> PathFinder {
        PathFinder {
            config,
            context: SearchContext::new(),
        }
    }

    /// Computes the cheapest path from `start` to `goal`. The returned [Path]
    /// excludes `start` and ends with `goal`; it is empty when both are the same.
    pub fn find_path(
        &mut self,
        graph: &WaypointGraph,
        start: WaypointId,
        goal: WaypointId,
    ) -> Result<Path> {
        for id in [start, goal] {
            if !graph.contains(id) {
                return Err(NavError::UnknownWaypoint(id));
            }
        }
        if start == goal {
            return Ok(Path::empty());
        }
        // Check if start and goal are on the same weakly connected component.
        if !graph.weakly_connected(start, goal) {
            debug!("{} and {} are in different components", start, goal);
            return Err(NavError::Unreachable { start, goal });
        }
        let Some(goal_position) = graph.position(goal) else {
            return Err(NavError::UnknownWaypoint(goal));
        };
        let result = self.context.astar(
            &start,
            |&node| {
                let from = graph.position(node).unwrap_or(goal_position);
                graph
                    .neighbours(node)
                    .iter()
                    .filter_map(|&next| graph.position(next).map(|to| (next, from.distance(to))))
                    .collect::<Vec<_>>()
            },
            |&node| {
                graph
                    .position(node)
                    .map_or(0.0, |p| p.distance(goal_position))
            },
            |&node| node == goal,
            self.config.max_expansions,
        );
        match result {
            Ok((nodes, cost)) => {
                debug!(
                    "Path {} -> {} found with {} hops, cost {:.3}",
                    start,
                    goal,
                    nodes.len().saturating_sub(1),
                    cost
                );
                Ok(Path::new(nodes.into_iter().skip(1), cost))
            }
            Err(SearchFailure::Exhausted) => {
                warn!("{} is not reachable from {} along directed edges", goal, start);
                Err(NavError::Unreachable { start, goal })
            }
            Err(SearchFailure::LimitReached(limit)) => Err(NavError::SearchLimit { limit }),
        }
    }
}
