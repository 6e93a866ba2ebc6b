//! The time-expanded graph over grid states and reservation gaps.
//!
//! A [`TimedVertex`] is a robot state `(position, direction)` paired with the
//! reservation slot whose *preceding gap* the robot occupies.  Edges are the
//! physical actions (move forward, turn to any other direction) timed so that
//! they fit the gaps of the cells involved:
//!
//! ```text
//! start  = max(now, reserve_until of the slot before the target gap)
//! end    = start + weight
//! accept = end <= reserve_from of the target slot
//!       && end <= reserve_from of the current slot
//! ```
//!
//! Sentinel slots impose no upper bound.  A target gap that follows an
//! open-ended reservation is unreachable.

use sc_core::{Direction, Position, RobotType, SimTime, SlotId};
use tracing::trace;

use crate::search::a_star;
use crate::{Grid, PathSpan, ReservationStore, SpatialError, SpatialResult};

/// Sentinel-gap expansions of one waypoint after which that waypoint's
/// leg is no longer expanded.
pub const MAX_WAYPOINT_EXHAUSTION: u32 = 4;

// ── Vertices ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TimedVertex {
    pub position: Position,
    pub direction: Direction,
    /// The robot is in the gap just before this slot.
    pub slot: SlotId,
}

/// A [`TimedVertex`] tagged with the index of the waypoint it is heading for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct WaypointVertex {
    pub vertex: TimedVertex,
    pub leg: usize,
}

// ── TimedGraph ────────────────────────────────────────────────────────────────

/// Read-only view of the grid and timelines for one robot type.
pub struct TimedGraph<'a> {
    grid: &'a Grid,
    store: &'a ReservationStore,
    kind: RobotType,
}

impl<'a> TimedGraph<'a> {
    pub fn new(grid: &'a Grid, store: &'a ReservationStore, kind: RobotType) -> Self {
        Self { grid, store, kind }
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn store(&self) -> &ReservationStore {
        self.store
    }

    /// Physical successor states of `(position, direction)` with the action
    /// duration: the forward move first, then turns in `Direction::ALL`
    /// order.
    pub fn successors(&self, position: Position, direction: Direction) -> Vec<(Position, Direction, f64)> {
        let mut out = Vec::with_capacity(4);
        if self.grid.can_traverse(position, direction) {
            out.push((position.next_on(direction), direction, self.kind.time_to_move));
        }
        for to in Direction::ALL {
            if to != direction {
                out.push((position, to, self.kind.turn_time(direction, to)));
            }
        }
        out
    }

    /// Timed spans leaving `v` when it is reached at `time`.
    pub fn edges(&self, v: &TimedVertex, time: SimTime) -> SpatialResult<Vec<PathSpan<TimedVertex>>> {
        let own_gap_end = self.store.gap_end(v.slot);
        let mut out = Vec::new();
        for (position, direction, weight) in self.successors(v.position, v.direction) {
            for slot in self.store.slots(position)? {
                let mut start = time;
                if let Some(prev) = self.store.reservation(self.store.prev(slot)?) {
                    start = start.max(prev.reserve_until);
                }
                if start.is_infinite() {
                    continue;
                }
                let end = start + weight;
                if self.store.gap_end(slot).min(own_gap_end) < end {
                    continue;
                }
                out.push(PathSpan::new(*v, TimedVertex { position, direction, slot }, start, end));
            }
        }
        Ok(out)
    }
}

// ── WaypointRoute ─────────────────────────────────────────────────────────────

/// A* routing through an ordered list of positions, stopping for `dwell` at
/// every waypoint except the last and parking at the last one.
///
/// The final vertex must sit in the sentinel gap of the last waypoint, so the
/// robot can stay there indefinitely.
pub struct WaypointRoute<'g, 'a> {
    graph: &'g TimedGraph<'a>,
    waypoints: Vec<Position>,
    dwell: f64,
    station_penalty: f64,
}

impl<'g, 'a> WaypointRoute<'g, 'a> {
    pub fn new(graph: &'g TimedGraph<'a>, waypoints: Vec<Position>, dwell: f64) -> Self {
        Self { graph, waypoints, dwell, station_penalty: 0.0 }
    }

    /// Extra heuristic cost per remaining waypoint that is an output station.
    pub fn with_station_penalty(mut self, penalty: f64) -> Self {
        self.station_penalty = penalty;
        self
    }

    /// Earliest path from `start` at `start_time` through all waypoints.
    pub fn search(self, start: TimedVertex, start_time: SimTime) -> SpatialResult<Vec<PathSpan<TimedVertex>>> {
        if self.waypoints.is_empty() {
            return Ok(Vec::new());
        }
        let mut exhausted = vec![0u32; self.waypoints.len()];
        let tree = a_star(
            WaypointVertex { vertex: start, leg: 0 },
            start_time,
            |v, time| self.edges(&mut exhausted, v, time),
            |v| self.heuristic(v),
            |v| self.is_goal(v),
        )?;
        let goal = tree.goal().copied().ok_or(SpatialError::UnreachablePath)?;
        let path = tree.restore_path(&goal)?;
        trace!(
            "waypoint route {:?}: {} spans, {} vertices labelled",
            self.waypoints,
            path.len(),
            tree.len()
        );
        Ok(path.into_iter().map(|span| span.map(|w| w.vertex)).collect())
    }

    fn last(&self) -> usize {
        self.waypoints.len() - 1
    }

    fn edges(
        &self,
        exhausted: &mut [u32],
        v: &WaypointVertex,
        time: SimTime,
    ) -> SpatialResult<Vec<PathSpan<WaypointVertex>>> {
        let leg = v.leg;
        let mut out = Vec::new();
        if exhausted[leg] >= MAX_WAYPOINT_EXHAUSTION {
            return Ok(out);
        }
        if v.vertex.position == self.waypoints[leg] {
            if leg == self.last() {
                return Ok(out);
            }
            if self.graph.store.is_sentinel(v.vertex.slot) {
                exhausted[leg] += 1;
            }
            for span in self.graph.edges(&v.vertex, time + self.dwell)? {
                out.push(PathSpan::new(*v, WaypointVertex { vertex: span.to, leg: leg + 1 }, span.start, span.end));
            }
        }
        for span in self.graph.edges(&v.vertex, time)? {
            out.push(PathSpan::new(*v, WaypointVertex { vertex: span.to, leg }, span.start, span.end));
        }
        Ok(out)
    }

    fn heuristic(&self, v: &WaypointVertex) -> f64 {
        let remaining = &self.waypoints[v.leg..];
        let mut cells = v.vertex.position.manhattan(remaining[0]);
        let mut stations = 0u32;
        for pair in remaining.windows(2) {
            cells += pair[0].manhattan(pair[1]);
        }
        for p in remaining {
            if self.graph.grid.output_at(*p).is_some() {
                stations += 1;
            }
        }
        let transitions = (remaining.len() - 1) as f64;
        cells as f64 * self.graph.kind.time_to_move
            + transitions * self.dwell
            + stations as f64 * self.station_penalty
    }

    fn is_goal(&self, v: &WaypointVertex) -> bool {
        v.leg == self.last()
            && v.vertex.position == self.waypoints[v.leg]
            && self.graph.store.is_sentinel(v.vertex.slot)
    }
}
