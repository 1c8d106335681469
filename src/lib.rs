//! # waypoint_nav
//!
//! Navigation over a hand-placed set of waypoints. A [WaypointGraph] is built once
//! from waypoint records, either with explicit (directed) adjacency lists or by
//! connecting every pair of waypoints that can see each other according to a
//! caller supplied [LineOfSight] test. Paths are computed with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) using the Euclidean
//! distance as both edge cost and heuristic, so they are optimal. Weakly
//! connected components are pre-computed to avoid flood-filling when no path
//! exists.
//!
//! A [Navigator] drives a single agent: every tick it checks whether the current
//! waypoint has been reached, moves on along the planned path, and picks a new
//! random target once the old one has been reached.
pub mod astar;
pub mod config;
pub mod error;
pub mod graph;
pub mod navigator;
pub mod path;
pub mod pathfinder;
pub mod waypoint;

pub use config::{NavigatorConfig, SearchConfig, DEFAULT_REACH_THRESHOLD};
pub use error::{ConfigError, NavError, Result};
pub use graph::{LineOfSight, Unobstructed, WaypointGraph};
pub use navigator::{Marker, MarkerSink, NavigationState, Navigator};
pub use path::Path;
pub use pathfinder::PathFinder;
pub use waypoint::{Links, Waypoint, WaypointId};

use glam::Vec3;

/// Turns a path into the polyline an agent follows, starting at `start`. Returns
/// `None` if `start` or any hop is not part of the graph.
pub fn path_to_positions(
    graph: &WaypointGraph,
    start: WaypointId,
    path: &Path,
) -> Option<Vec<Vec3>> {
    std::iter::once(start)
        .chain(path.hops())
        .map(|id| graph.position(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_starts_at_start() {
        let graph = WaypointGraph::from_edges(vec![Vec3::ZERO, Vec3::X, Vec3::Y], [(0, 1), (1, 2)])
            .unwrap();
        let mut finder = PathFinder::default();
        let path = finder
            .find_path(&graph, WaypointId(0), WaypointId(2))
            .unwrap();
        assert_eq!(
            path_to_positions(&graph, WaypointId(0), &path),
            Some(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
        );
        assert_eq!(
            path_to_positions(&graph, WaypointId(2), &Path::empty()),
            Some(vec![Vec3::Y])
        );
    }

    #[test]
    fn polyline_rejects_foreign_hops() {
        let graph = WaypointGraph::from_edges(vec![Vec3::ZERO, Vec3::X], [(0, 1)]).unwrap();
        let path = Path::new(vec![WaypointId(1), WaypointId(5)], 2.0);
        assert_eq!(path_to_positions(&graph, WaypointId(0), &path), None);
        assert_eq!(
            path_to_positions(&graph, WaypointId(9), &Path::empty()),
            None
        );
    }
}
