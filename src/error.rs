//! Error types for waypoint graphs, searches and navigation.

use thiserror::Error;

use crate::waypoint::WaypointId;

/// Problems in the waypoint records handed to [WaypointGraph::build](crate::graph::WaypointGraph::build).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("waypoint {waypoint} lists unknown adjacent waypoint {adjacent}")]
    UnknownAdjacent {
        waypoint: WaypointId,
        adjacent: WaypointId,
    },

    #[error("waypoint {0} lists itself as adjacent")]
    SelfLoop(WaypointId),

    #[error("waypoint {0} has a non-finite position")]
    NonFinitePosition(WaypointId),

    /// An edge list names a source waypoint that does not exist.
    #[error("edge starts at unknown waypoint {0}")]
    UnknownSource(WaypointId),

    #[error("reach threshold must be finite and positive, got {0}")]
    InvalidReachThreshold(f32),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    /// Invalid graph description, fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// No path exists from `start` to `goal`. Recoverable by picking another goal.
    #[error("waypoint {goal} is unreachable from {start}")]
    Unreachable {
        start: WaypointId,
        goal: WaypointId,
    },

    /// Navigation needs at least two waypoints to pick a distinct target.
    #[error("cannot navigate a graph with {waypoints} waypoint(s)")]
    DegenerateGraph { waypoints: usize },

    #[error("waypoint {0} is not part of the graph")]
    UnknownWaypoint(WaypointId),

    /// The search expanded more nodes than allowed by [SearchConfig](crate::config::SearchConfig).
    #[error("search gave up after {limit} expansions")]
    SearchLimit { limit: usize },
}

impl NavError {
    /// Whether a navigator can carry on after this error by choosing a different goal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NavError::Unreachable { .. } | NavError::SearchLimit { .. })
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
