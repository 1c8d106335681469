//! Tunables for searches and navigators.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Distance below which an agent counts as having reached a waypoint.
pub const DEFAULT_REACH_THRESHOLD: f32 = 0.5;

/// Limits applied to a single A* search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of nodes expanded before the search is abandoned.
    /// Unbounded when `None`.
    #[serde(default)]
    pub max_expansions: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// See [DEFAULT_REACH_THRESHOLD].
    #[serde(default = "default_reach_threshold")]
    pub reach_threshold: f32,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_reach_threshold() -> f32 {
    DEFAULT_REACH_THRESHOLD
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            reach_threshold: DEFAULT_REACH_THRESHOLD,
            search: SearchConfig::default(),
        }
    }
}

impl NavigatorConfig {
    pub fn with_reach_threshold(mut self, reach_threshold: f32) -> Self {
        self.reach_threshold = reach_threshold;
        self
    }

    /// Rejects thresholds an agent could never get within: zero, negative or non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reach_threshold.is_finite() && self.reach_threshold > 0.0) {
            return Err(ConfigError::InvalidReachThreshold(self.reach_threshold));
        }
        Ok(())
    }
}
