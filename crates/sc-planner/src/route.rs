//! Route search: from a robot's current vertex to a station, then to a
//! parking cell.
//!
//! The returned spans always end in a sentinel gap, so the last cell can be
//! claimed open-ended when the route is committed.

use sc_core::{Position, SimTime};
use sc_spatial::{
    PathSpan, SpatialError, SpatialResult, TimedGraph, TimedVertex, WaypointRoute, dijkstra,
};
use tracing::trace;

/// Where the route ends after the station.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RestChoice<'r> {
    /// Park on the station.
    Park,
    /// Continue to this cell after the station dwell.
    Cell(Position),
    /// Continue to whichever of these cells is reached first.
    Nearest(&'r [Position]),
}

/// Earliest route from `start` at `now` through `target` (stopping `dwell`
/// there) to its parking cell.
pub fn find_route(
    graph: &TimedGraph<'_>,
    start: TimedVertex,
    now: SimTime,
    target: Position,
    dwell: f64,
    rest: RestChoice<'_>,
    station_penalty: f64,
) -> SpatialResult<Vec<PathSpan<TimedVertex>>> {
    let waypoints = match rest {
        RestChoice::Park => vec![target],
        RestChoice::Cell(cell) if cell == target => vec![target],
        RestChoice::Cell(cell) => vec![target, cell],
        RestChoice::Nearest(rests) => return via_nearest_rest(graph, start, now, target, dwell, rests),
    };
    WaypointRoute::new(graph, waypoints, dwell)
        .with_station_penalty(station_penalty)
        .search(start, now)
}

/// Dijkstra to every arrival at `target`, then from each arrival (after the
/// dwell) a second Dijkstra to the rest cells.  The earliest parking time
/// wins; ties go to the earlier station arrival.
fn via_nearest_rest(
    graph: &TimedGraph<'_>,
    start: TimedVertex,
    now: SimTime,
    target: Position,
    dwell: f64,
    rests: &[Position],
) -> SpatialResult<Vec<PathSpan<TimedVertex>>> {
    let edges = |v: &TimedVertex, t: SimTime| graph.edges(v, t);
    let to_station = dijkstra(start, now, edges)?;

    let mut arrivals: Vec<(SimTime, TimedVertex)> = to_station
        .reached()
        .filter(|(v, _)| v.position == target)
        .map(|(v, t)| (t, *v))
        .collect();
    arrivals.sort();

    let mut best = None;
    let mut best_finish = SimTime::INFINITY;
    for (arrival, at_station) in arrivals {
        let leave = arrival + dwell;
        if leave >= best_finish {
            break;
        }
        let to_rest = dijkstra(at_station, leave, edges)?;
        let mut parked: Vec<(SimTime, TimedVertex)> = to_rest
            .reached()
            .filter(|(v, _)| rests.contains(&v.position) && graph.store().is_sentinel(v.slot))
            .map(|(v, t)| (t, *v))
            .collect();
        parked.sort();
        if let Some(&(finish, end)) = parked.first() {
            if finish < best_finish {
                best_finish = finish;
                best = Some((at_station, to_rest, end));
            }
        }
    }

    let (at_station, to_rest, end) = best.ok_or(SpatialError::UnreachablePath)?;
    trace!("nearest rest {} reached at {best_finish}", end.position);
    let mut path = to_station.restore_path(&at_station)?;
    path.extend(to_rest.restore_path(&end)?);
    Ok(path)
}
