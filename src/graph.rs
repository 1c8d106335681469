use core::fmt;

use glam::Vec3;
use itertools::Itertools;
use log::{debug, info};
use petgraph::unionfind::UnionFind;

use crate::error::{ConfigError, Result};
use crate::waypoint::{Links, Waypoint, WaypointId};

/// Line-of-sight query used to connect waypoints flagged with [Links::Autogenerate].
/// Returns `true` when the straight segment from `from` to `to` is unobstructed.
pub trait LineOfSight {
    fn is_clear(&self, from: Vec3, to: Vec3) -> bool;
}

impl<F> LineOfSight for F
where
    F: Fn(Vec3, Vec3) -> bool,
{
    fn is_clear(&self, from: Vec3, to: Vec3) -> bool {
        self(from, to)
    }
}

/// Line of sight for worlds without obstacles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unobstructed;

impl LineOfSight for Unobstructed {
    fn is_clear(&self, _: Vec3, _: Vec3) -> bool {
        true
    }
}

/// [WaypointGraph] stores waypoint positions together with their directed, ordered
/// adjacency. It is immutable once built and can be shared between navigators.
/// Weakly connected components are kept in a [UnionFind] structure so that searches
/// between disconnected parts of the graph fail without flood-filling.
#[derive(Clone, Debug)]
pub struct WaypointGraph {
    positions: Vec<Vec3>,
    adjacency: Vec<Vec<WaypointId>>,
    components: UnionFind<usize>,
}

impl WaypointGraph {
    /// Builds the graph from waypoint records. Explicit links are validated and
    /// copied in order, autogenerated ones query `line_of_sight` once for every
    /// other waypoint.
    pub fn build<L: LineOfSight>(
        waypoints: &[Waypoint],
        line_of_sight: &L,
    ) -> Result<WaypointGraph> {
        for (ix, w) in waypoints.iter().enumerate() {
            if !w.position.is_finite() {
                return Err(ConfigError::NonFinitePosition(WaypointId::from(ix)).into());
            }
        }
        let positions: Vec<Vec3> = waypoints.iter().map(|w| w.position).collect();
        let mut adjacency = Vec::with_capacity(waypoints.len());
        let mut queries = 0usize;
        for (ix, w) in waypoints.iter().enumerate() {
            let id = WaypointId::from(ix);
            let edges = match &w.links {
                Links::Autogenerate => {
                    queries += positions.len().saturating_sub(1);
                    Self::visible_from(id, &positions, line_of_sight)
                }
                Links::Explicit(adjacents) => Self::checked_edges(id, adjacents, positions.len())?,
            };
            adjacency.push(edges);
        }
        let graph = Self::with_adjacency(positions, adjacency);
        info!(
            "Built waypoint graph with {} waypoints and {} edges ({} line-of-sight queries)",
            graph.len(),
            graph.edge_count(),
            queries
        );
        Ok(graph)
    }

    /// Builds a graph from positions and a list of directed edges, validated the
    /// same way as explicit [Waypoint] links.
    pub fn from_edges<I>(positions: Vec<Vec3>, edges: I) -> Result<WaypointGraph>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut links: Vec<Vec<WaypointId>> = vec![Vec::new(); positions.len()];
        for (from, to) in edges {
            links
                .get_mut(from)
                .ok_or(ConfigError::UnknownSource(WaypointId::from(from)))?
                .push(WaypointId::from(to));
        }
        let waypoints = positions
            .into_iter()
            .zip(links)
            .map(|(position, adjacents)| Waypoint::new(position, adjacents))
            .collect::<Vec<_>>();
        Self::build(&waypoints, &Unobstructed)
    }

    fn visible_from<L: LineOfSight>(
        id: WaypointId,
        positions: &[Vec3],
        line_of_sight: &L,
    ) -> Vec<WaypointId> {
        let from = positions[id.index()];
        positions
            .iter()
            .enumerate()
            .filter(|&(other, &to)| other != id.index() && line_of_sight.is_clear(from, to))
            .map(|(other, _)| WaypointId::from(other))
            .collect()
    }

    fn checked_edges(
        id: WaypointId,
        adjacents: &[WaypointId],
        n: usize,
    ) -> Result<Vec<WaypointId>> {
        for &adjacent in adjacents {
            if adjacent.index() >= n {
                return Err(ConfigError::UnknownAdjacent {
                    waypoint: id,
                    adjacent,
                }
                .into());
            }
            if adjacent == id {
                return Err(ConfigError::SelfLoop(id).into());
            }
        }
        let edges = adjacents.iter().copied().unique().collect::<Vec<_>>();
        if edges.len() < adjacents.len() {
            debug!("Dropped {} duplicate links of waypoint {}", adjacents.len() - edges.len(), id);
        }
        Ok(edges)
    }

    fn with_adjacency(positions: Vec<Vec3>, adjacency: Vec<Vec<WaypointId>>) -> WaypointGraph {
        let mut components = UnionFind::new(positions.len());
        for (from, edges) in adjacency.iter().enumerate() {
            for to in edges {
                components.union(from, to.index());
            }
        }
        WaypointGraph {
            positions,
            adjacency,
            components,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn contains(&self, id: WaypointId) -> bool {
        id.index() < self.positions.len()
    }

    pub fn waypoint_ids(&self) -> impl Iterator<Item = WaypointId> + '_ {
        (0..self.positions.len()).map(WaypointId::from)
    }

    pub fn position(&self, id: WaypointId) -> Option<Vec3> {
        self.positions.get(id.index()).copied()
    }

    /// Outgoing neighbours of `id` in declaration (or discovery) order.
    pub fn neighbours(&self, id: WaypointId) -> &[WaypointId] {
        self.adjacency.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_edge(&self, from: WaypointId, to: WaypointId) -> bool {
        self.neighbours(from).contains(&to)
    }

    /// Euclidean distance between two waypoints, which is both the edge cost and
    /// the search heuristic.
    pub fn cost(&self, a: WaypointId, b: WaypointId) -> Option<f32> {
        Some(self.position(a)?.distance(self.position(b)?))
    }

    /// Sums the edge costs along `start` followed by `hops`. Returns [None] if two
    /// consecutive waypoints are not connected.
    pub fn path_cost(&self, start: WaypointId, hops: &[WaypointId]) -> Option<f32> {
        std::iter::once(&start)
            .chain(hops)
            .tuple_windows()
            .map(|(&a, &b)| {
                if self.has_edge(a, b) {
                    self.cost(a, b)
                } else {
                    None
                }
            })
            .sum()
    }

    /// The waypoint closest to `point`. The first one wins if several are equally close.
    pub fn nearest(&self, point: Vec3) -> Option<WaypointId> {
        let mut best: Option<(WaypointId, f32)> = None;
        for (ix, p) in self.positions.iter().enumerate() {
            let distance = p.distance(point);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((WaypointId::from(ix), distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Checks if `a` and `b` belong to the same weakly connected component. Edges
    /// are directed, so this is necessary but not sufficient for a path to exist.
    pub fn weakly_connected(&self, a: WaypointId, b: WaypointId) -> bool {
        self.contains(a) && self.contains(b) && self.components.equiv(a.index(), b.index())
    }
}

impl fmt::Display for WaypointGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Waypoints:")?;
        for (ix, (p, edges)) in self.positions.iter().zip(&self.adjacency).enumerate() {
            writeln!(
                f,
                "{} ({:.2}, {:.2}, {:.2}) -> [{}]",
                WaypointId::from(ix),
                p.x,
                p.y,
                p.z,
                edges.iter().join(", ")
            )?;
        }
        Ok(())
    }
}
