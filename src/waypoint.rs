use core::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable handle of a waypoint: its index in the slice the graph was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(pub usize);

impl WaypointId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for WaypointId {
    fn from(ix: usize) -> Self {
        WaypointId(ix)
    }
}

/// How the outgoing edges of a [Waypoint] are obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Links {
    /// Ordered list of waypoints this one connects to. Edges are directed, so the
    /// other side has to list this waypoint too for the edge to go both ways.
    Explicit(Vec<WaypointId>),
    /// Connect to every other waypoint with a clear line of sight. Any explicit
    /// list is ignored.
    Autogenerate,
}

impl Default for Links {
    fn default() -> Self {
        Links::Explicit(Vec::new())
    }
}

/// A navigable point as read from scene data, before it is turned into a graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec3,
    #[serde(default)]
    pub links: Links,
}

impl Waypoint {
    pub fn new(position: Vec3, adjacents: Vec<WaypointId>) -> Waypoint {
        Waypoint {
            position,
            links: Links::Explicit(adjacents),
        }
    }

    pub fn autogenerated(position: Vec3) -> Waypoint {
        Waypoint {
            position,
            links: Links::Autogenerate,
        }
    }

    pub fn is_autogenerated(&self) -> bool {
        matches!(self.links, Links::Autogenerate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_records() {
        let json = r#"[
            {"position": [0.0, 0.0, 0.0], "links": {"explicit": [1]}},
            {"position": [1.0, 0.0, 0.0], "links": "autogenerate"},
            {"position": [2.0, 0.0, 0.0]}
        ]"#;
        let waypoints: Vec<Waypoint> = serde_json::from_str(json).unwrap();
        assert_eq!(waypoints[0].links, Links::Explicit(vec![WaypointId(1)]));
        assert!(waypoints[1].is_autogenerated());
        assert_eq!(waypoints[2].links, Links::Explicit(vec![]));
        assert_eq!(waypoints[2].position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn handles_wrap_indices() {
        let id = WaypointId::from(4);
        assert_eq!(id, WaypointId(4));
        assert_eq!(id.index(), 4);
        assert_eq!(id.to_string(), "#4");
    }
}
