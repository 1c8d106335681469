use std::collections::VecDeque;

use crate::waypoint::WaypointId;

/// Ordered hops from a start waypoint to a goal. The start itself is not part of
/// the path since the agent is already there; the goal is the last hop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    hops: VecDeque<WaypointId>,
    cost: f32,
}

impl Path {
    pub fn new(hops: impl IntoIterator<Item = WaypointId>, cost: f32) -> Path {
        Path {
            hops: hops.into_iter().collect(),
            cost,
        }
    }

    /// The path of a search whose start is also its goal.
    pub fn empty() -> Path {
        Path::default()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Total Euclidean length of the path as computed by the search.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn next_hop(&self) -> Option<WaypointId> {
        self.hops.front().copied()
    }

    pub fn goal(&self) -> Option<WaypointId> {
        self.hops.back().copied()
    }

    pub fn hops(&self) -> impl Iterator<Item = WaypointId> + '_ {
        self.hops.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<WaypointId> {
        self.hops().collect()
    }

    /// Removes and returns the next hop. The cost is left as computed.
    pub fn advance(&mut self) -> Option<WaypointId> {
        self.hops.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_consumes_front() {
        let mut path = Path::new([WaypointId(2), WaypointId(5)], 3.0);
        assert_eq!(path.next_hop(), Some(WaypointId(2)));
        assert_eq!(path.goal(), Some(WaypointId(5)));
        assert_eq!(path.advance(), Some(WaypointId(2)));
        assert_eq!(path.to_vec(), vec![WaypointId(5)]);
        assert_eq!(path.advance(), Some(WaypointId(5)));
        assert!(path.is_empty());
        assert_eq!(path.advance(), None);
        assert_eq!(path.cost(), 3.0);
    }
}
