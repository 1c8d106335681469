//! Tick-driven traversal of a [WaypointGraph].
//!
//! A [Navigator] keeps the waypoint the agent is heading to, the hops that remain
//! towards the current target, and picks a fresh random target whenever the old
//! one has been reached. It never moves anything itself: every tick returns the
//! direction the agent should walk in, and state changes are reported to a
//! [MarkerSink] so that a renderer can reflect them.

use std::sync::Arc;

use glam::Vec3;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::NavigatorConfig;
use crate::error::{NavError, Result};
use crate::graph::WaypointGraph;
use crate::path::Path;
use crate::pathfinder::PathFinder;
use crate::waypoint::WaypointId;

/// Logical role of a waypoint, emitted on every state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The waypoint the agent started from.
    Current,
    /// An intermediate waypoint the agent is now heading to.
    InTransit,
    /// The goal of the current path.
    Target,
    /// The agent reached the waypoint and moved on.
    Arrived,
}

/// Receives [Marker] updates from a [Navigator].
pub trait MarkerSink {
    fn mark(&mut self, waypoint: WaypointId, marker: Marker);
}

/// Discards all markers.
impl MarkerSink for () {
    fn mark(&mut self, _: WaypointId, _: Marker) {}
}

/// Records markers in emission order.
impl MarkerSink for Vec<(WaypointId, Marker)> {
    fn mark(&mut self, waypoint: WaypointId, marker: Marker) {
        self.push((waypoint, marker));
    }
}

/// Everything that changes between two ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationState {
    pub current: WaypointId,
    pub target: WaypointId,
    /// Hops left after `current`; empty once `current` is the target.
    pub path: Path,
}

pub struct Navigator<R> {
    graph: Arc<WaypointGraph>,
    finder: PathFinder,
    rng: R,
    config: NavigatorConfig,
    state: NavigationState,
    stranded: Option<NavError>,
}

impl<R: Rng> Navigator<R> {
    /// Starts at the waypoint nearest to `agent_position` and plans a path to a
    /// random other waypoint.
    pub fn new<S: MarkerSink>(
        graph: Arc<WaypointGraph>,
        agent_position: Vec3,
        rng: R,
        config: NavigatorConfig,
        sink: &mut S,
    ) -> Result<Navigator<R>> {
        config.validate()?;
        if graph.len() < 2 {
            return Err(NavError::DegenerateGraph {
                waypoints: graph.len(),
            });
        }
        let current = graph
            .nearest(agent_position)
            .ok_or(NavError::DegenerateGraph { waypoints: 0 })?;
        sink.mark(current, Marker::Current);
        let mut navigator = Navigator {
            finder: PathFinder::new(config.search.clone()),
            graph,
            rng,
            config,
            state: NavigationState {
                current,
                target: current,
                path: Path::empty(),
            },
            stranded: None,
        };
        navigator.retarget(sink)?;
        info!(
            "Navigator starting at {}, heading for {}",
            navigator.state.current, navigator.state.target
        );
        Ok(navigator)
    }

    /// Picks a new random target other than the current waypoint and plans a path
    /// to it. Candidates are tried in random order until one is reachable; if none
    /// is, the state is left untouched and [NavError::Unreachable] is returned.
    pub fn retarget<S: MarkerSink>(&mut self, sink: &mut S) -> Result<()> {
        let (target, path) = self.plan()?;
        self.set_target(target, path, sink);
        Ok(())
    }

    fn set_target<S: MarkerSink>(&mut self, target: WaypointId, path: Path, sink: &mut S) {
        sink.mark(target, Marker::Target);
        self.stranded = None;
        self.state.target = target;
        self.state.path = path;
    }

    fn plan(&mut self) -> Result<(WaypointId, Path)> {
        let current = self.state.current;
        let mut candidates: Vec<WaypointId> =
            self.graph.waypoint_ids().filter(|&id| id != current).collect();
        if candidates.is_empty() {
            return Err(NavError::DegenerateGraph {
                waypoints: self.graph.len(),
            });
        }
        candidates.shuffle(&mut self.rng);
        let mut last_error = None;
        for target in candidates {
            match self.finder.find_path(&self.graph, current, target) {
                Ok(path) => {
                    debug!("New target {} is {} hops away", target, path.len());
                    return Ok((target, path));
                }
                Err(e) if e.is_recoverable() => {
                    debug!("Skipping target {}: {}", target, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        debug!("No waypoint is reachable from {}", current);
        Err(last_error.unwrap_or(NavError::Unreachable {
            start: current,
            goal: current,
        }))
    }

    /// Advances the state once the agent is within the reach threshold of the
    /// current waypoint, then returns the unit direction from the agent towards the
    /// (possibly new) current waypoint, or zero if the agent stands on it.
    ///
    /// Must be called once per time step. If no new target is reachable after
    /// arriving, the agent stays put: the state and markers are left alone, the
    /// reason is kept in [Navigator::stranded] and the next tick tries again.
    pub fn tick<S: MarkerSink>(&mut self, agent_position: Vec3, sink: &mut S) -> Result<Vec3> {
        let current_position = self.current_position()?;
        if agent_position.distance(current_position) < self.config.reach_threshold {
            if self.state.path.is_empty() {
                match self.plan() {
                    Ok((target, path)) => {
                        debug!("Reached target {}", self.state.current);
                        self.set_target(target, path, sink);
                    }
                    Err(e) if e.is_recoverable() => {
                        if self.stranded.is_none() {
                            warn!("Stranded at {}: {}", self.state.current, e);
                        }
                        self.stranded = Some(e);
                    }
                    Err(e) => return Err(e),
                }
            }
            if let Some(next) = self.state.path.advance() {
                sink.mark(self.state.current, Marker::Arrived);
                self.state.current = next;
                if !self.state.path.is_empty() {
                    sink.mark(next, Marker::InTransit);
                }
            }
        }
        self.direction(agent_position)
    }

    /// Unit vector from `agent_position` towards the current waypoint.
    pub fn direction(&self, agent_position: Vec3) -> Result<Vec3> {
        Ok((self.current_position()? - agent_position).normalize_or_zero())
    }

    fn current_position(&self) -> Result<Vec3> {
        self.graph
            .position(self.state.current)
            .ok_or(NavError::UnknownWaypoint(self.state.current))
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current(&self) -> WaypointId {
        self.state.current
    }

    pub fn target(&self) -> WaypointId {
        self.state.target
    }

    pub fn remaining(&self) -> &Path {
        &self.state.path
    }

    pub fn graph(&self) -> &Arc<WaypointGraph> {
        &self.graph
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Why the last arrival could not pick a new target, until one is found.
    pub fn stranded(&self) -> Option<&NavError> {
        self.stranded.as_ref()
    }
}
