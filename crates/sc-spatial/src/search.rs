//! Shortest-time search over implicit graphs.
//!
//! Both searches take the graph as an edge callback `edges(vertex, time)`
//! returning the timed spans leaving `vertex` when it is reached at `time`.
//! Edge costs are therefore time-dependent; a span's `end` is the arrival
//! time at its target.  Each vertex is expanded at most once (label-setting),
//! and a queued vertex is relabelled only when a strictly earlier arrival is
//! found, so the first-found label wins ties.

use std::hash::Hash;

use sc_core::SimTime;
use tracing::trace;

use crate::{IndexedMinHeap, Map, Set, SpatialError, SpatialResult};

// ── PathSpan ──────────────────────────────────────────────────────────────────

/// A directed edge with timing: leave `from` at `start`, be at `to` at `end`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PathSpan<V> {
    pub from: V,
    pub to: V,
    pub start: SimTime,
    pub end: SimTime,
}

impl<V> PathSpan<V> {
    pub fn new(from: V, to: V, start: SimTime, end: SimTime) -> Self {
        Self { from, to, start, end }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Re-label both endpoints, keeping the timing.
    pub fn map<W>(self, mut f: impl FnMut(V) -> W) -> PathSpan<W> {
        PathSpan { from: f(self.from), to: f(self.to), start: self.start, end: self.end }
    }
}

// ── SearchTree ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Label<V> {
    arrival: SimTime,
    incoming: Option<PathSpan<V>>,
}

/// Best known arrival and incoming span per reached vertex.
///
/// After [`dijkstra`] every label is final.  After [`a_star`] only labels on
/// the path to [`SearchTree::goal`] are guaranteed optimal.
pub struct SearchTree<V> {
    start: V,
    start_time: SimTime,
    labels: Map<V, Label<V>>,
    goal: Option<V>,
}

impl<V: Hash + Eq + Clone> SearchTree<V> {
    fn new(start: V, start_time: SimTime) -> Self {
        let mut labels = Map::default();
        labels.insert(start.clone(), Label { arrival: start_time, incoming: None });
        Self { start, start_time, labels, goal: None }
    }

    pub fn start(&self) -> &V {
        &self.start
    }

    pub fn start_time(&self) -> SimTime {
        self.start_time
    }

    /// The goal vertex popped by [`a_star`], if one was found.
    pub fn goal(&self) -> Option<&V> {
        self.goal.as_ref()
    }

    pub fn contains(&self, v: &V) -> bool {
        self.labels.contains_key(v)
    }

    pub fn arrival(&self, v: &V) -> Option<SimTime> {
        self.labels.get(v).map(|l| l.arrival)
    }

    pub fn incoming(&self, v: &V) -> Option<&PathSpan<V>> {
        self.labels.get(v).and_then(|l| l.incoming.as_ref())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Every reached vertex with its arrival time, in unspecified order.
    pub fn reached(&self) -> impl Iterator<Item = (&V, SimTime)> {
        self.labels.iter().map(|(v, l)| (v, l.arrival))
    }

    /// Spans from the start to `end`, in travel order.  Empty when `end` is
    /// the start itself.
    pub fn restore_path(&self, end: &V) -> SpatialResult<Vec<PathSpan<V>>> {
        if !self.labels.contains_key(end) {
            return Err(SpatialError::UnreachablePath);
        }
        let mut path = Vec::new();
        let mut cur = end.clone();
        while let Some(span) = self.incoming(&cur) {
            let span = span.clone();
            cur = span.from.clone();
            path.push(span);
            if path.len() > self.labels.len() {
                // predecessor cycle: labels were corrupted by a bad edge callback
                return Err(SpatialError::UnreachablePath);
            }
        }
        path.reverse();
        Ok(path)
    }

    /// Record `span` if it improves the label of its target.  Returns
    /// whether it did.
    fn relax(&mut self, span: PathSpan<V>) -> bool {
        let better = match self.labels.get(&span.to) {
            Some(label) => span.end < label.arrival,
            None => true,
        };
        if better {
            self.labels.insert(span.to.clone(), Label { arrival: span.end, incoming: Some(span) });
        }
        better
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Earliest arrival at every vertex reachable from `start`.
pub fn dijkstra<V, E>(start: V, start_time: SimTime, mut edges: E) -> SpatialResult<SearchTree<V>>
where
    V: Hash + Eq + Clone,
    E: FnMut(&V, SimTime) -> SpatialResult<Vec<PathSpan<V>>>,
{
    let mut tree = SearchTree::new(start.clone(), start_time);
    let mut queue = IndexedMinHeap::new();
    let mut used: Set<V> = Set::default();
    queue.enqueue(start, start_time);

    while !queue.is_empty() {
        let (v, time) = queue.dequeue()?;
        used.insert(v.clone());
        for span in edges(&v, time)? {
            if used.contains(&span.to) {
                continue;
            }
            let (to, end) = (span.to.clone(), span.end);
            if tree.relax(span) {
                queue.enqueue(to, end);
            }
        }
    }

    trace!("dijkstra settled {} vertices", used.len());
    Ok(tree)
}

// ── A* ────────────────────────────────────────────────────────────────────────

/// Earliest arrival at the first vertex satisfying `is_goal`, guided by an
/// admissible `heuristic` (a lower bound on remaining time).
///
/// The returned tree's [`SearchTree::goal`] is `None` when the reachable
/// graph is exhausted without meeting a goal.
pub fn a_star<V, E, H, G>(
    start: V,
    start_time: SimTime,
    mut edges: E,
    mut heuristic: H,
    mut is_goal: G,
) -> SpatialResult<SearchTree<V>>
where
    V: Hash + Eq + Clone,
    E: FnMut(&V, SimTime) -> SpatialResult<Vec<PathSpan<V>>>,
    H: FnMut(&V) -> f64,
    G: FnMut(&V) -> bool,
{
    let mut tree = SearchTree::new(start.clone(), start_time);
    let mut queue = IndexedMinHeap::new();
    let mut used: Set<V> = Set::default();
    let h = heuristic(&start);
    queue.enqueue(start, start_time + h);

    while !queue.is_empty() {
        let (v, _) = queue.dequeue()?;
        if is_goal(&v) {
            tree.goal = Some(v);
            break;
        }
        let time = tree.arrival(&v).ok_or(SpatialError::UnreachablePath)?;
        used.insert(v.clone());
        for span in edges(&v, time)? {
            if used.contains(&span.to) {
                continue;
            }
            let (to, end) = (span.to.clone(), span.end);
            if tree.relax(span) {
                let h = heuristic(&to);
                queue.enqueue(to, end + h);
            }
        }
    }

    trace!("a* expanded {} vertices, goal found: {}", used.len(), tree.goal.is_some());
    Ok(tree)
}
