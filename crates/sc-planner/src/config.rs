//! Planner configuration.

use std::collections::HashMap;

use sc_core::{Position, RobotId};

/// Where a robot parks after reaching a station.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RestPolicy {
    /// Park on the station itself.
    #[default]
    None,
    /// Each robot has its own rest cell.  Robots missing from the map park
    /// on the station.
    Personal(HashMap<RobotId, Position>),
    /// Park on whichever listed cell can be reached first after the
    /// station.
    Closest(Vec<Position>),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Replan opportunistically while idling when the next cell's timeline
    /// has no earlier claim than ours.
    pub rebuild_path: bool,
    pub rests: RestPolicy,
    /// Heuristic surcharge per output station still ahead on a route.
    /// Zero keeps the A* heuristic admissible.
    pub station_penalty: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { rebuild_path: false, rests: RestPolicy::None, station_penalty: 0.0 }
    }
}

impl PlannerConfig {
    pub fn with_rebuild(mut self, rebuild: bool) -> Self {
        self.rebuild_path = rebuild;
        self
    }

    pub fn with_rests(mut self, rests: RestPolicy) -> Self {
        self.rests = rests;
        self
    }
}
