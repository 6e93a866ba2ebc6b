//! Per-cell reservation timelines.
//!
//! # Data layout
//!
//! Every cell owns a circular doubly linked list threaded through one shared
//! arena of nodes.  Each list has exactly one *sentinel* node (no
//! reservation) that is created with the store and never removed:
//!
//! ```text
//!   sentinel ⇄ r0 ⇄ r1 ⇄ … ⇄ rk ⇄ (back to sentinel)
//! ```
//!
//! A slot handle names the *gap before* that node: for a real node, the
//! free time between its predecessor's `reserve_until` and its own
//! `reserve_from`; for the sentinel, the open-ended time after the last
//! reservation.  Handles stay valid while their node is live; released nodes
//! go to a free list and their ids may be reused.
//!
//! Insert-before, release, detach and reattach are O(1) link rewrites.

use sc_core::{Position, SimTime, SlotId};

use crate::{Grid, SpatialError, SpatialResult};

// ── Reservation ───────────────────────────────────────────────────────────────

/// One claim on a cell.
///
/// `reserve_from..be_from`: claimed, robot still approaching.
/// `be_from..be_until`: robot physically in the cell.
/// `be_until..reserve_until`: robot leaving, cell still claimed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reservation {
    pub reserve_from: SimTime,
    pub be_from: SimTime,
    pub be_until: SimTime,
    pub reserve_until: SimTime,
}

impl Reservation {
    pub fn new(reserve_from: SimTime, be_from: SimTime, be_until: SimTime, reserve_until: SimTime) -> Self {
        Self { reserve_from, be_from, be_until, reserve_until }
    }

    /// A claim from `from` that never ends: a robot parked in the cell.
    pub fn open_ended(reserve_from: SimTime, be_from: SimTime) -> Self {
        Self::new(reserve_from, be_from, SimTime::INFINITY, SimTime::INFINITY)
    }
}

// ── Arena node ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Node {
    position: Position,
    /// `None` for sentinels.
    reservation: Option<Reservation>,
    prev: SlotId,
    next: SlotId,
    live: bool,
    /// Unlinked by `detach` but not freed.
    detached: bool,
}

// ── ReservationStore ──────────────────────────────────────────────────────────

/// Arena of all reservation nodes of a grid.
pub struct ReservationStore {
    nodes: Vec<Node>,
    free: Vec<SlotId>,
    /// Sentinel per cell, indexed like grid cells.
    sentinels: Vec<SlotId>,
    rows: u32,
    cols: u32,
}

impl ReservationStore {
    /// One empty timeline per grid cell.  Walls get timelines too so that
    /// indices line up; the search never visits them.
    pub fn new(grid: &Grid) -> Self {
        let n = grid.cell_count();
        let mut nodes = Vec::with_capacity(n * 2);
        let mut sentinels = Vec::with_capacity(n);
        for i in 0..n {
            let id = SlotId(i as u32);
            nodes.push(Node {
                position: grid.position_of(i),
                reservation: None,
                prev: id,
                next: id,
                live: true,
                detached: false,
            });
            sentinels.push(id);
        }
        Self { nodes, free: Vec::new(), sentinels, rows: grid.rows(), cols: grid.cols() }
    }

    fn cell_index(&self, p: Position) -> SpatialResult<usize> {
        if p.row < 0 || p.col < 0 || p.row as u32 >= self.rows || p.col as u32 >= self.cols {
            return Err(SpatialError::PositionOutOfMap(p));
        }
        Ok(p.row as usize * self.cols as usize + p.col as usize)
    }

    fn node(&self, slot: SlotId) -> SpatialResult<&Node> {
        match self.nodes.get(slot.index()) {
            Some(n) if n.live => Ok(n),
            _ => Err(SpatialError::DeadSlot(slot)),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The sentinel of the cell at `p`.
    pub fn sentinel(&self, p: Position) -> SpatialResult<SlotId> {
        Ok(self.sentinels[self.cell_index(p)?])
    }

    /// First node of the timeline at `p` (the sentinel when empty).
    pub fn first(&self, p: Position) -> SpatialResult<SlotId> {
        let s = self.sentinel(p)?;
        Ok(self.nodes[s.index()].next)
    }

    /// All slots of the cell at `p`: reservations in time order, then the
    /// sentinel.
    pub fn slots(&self, p: Position) -> SpatialResult<SlotIter<'_>> {
        let sentinel = self.sentinel(p)?;
        Ok(SlotIter { store: self, cursor: Some(self.nodes[sentinel.index()].next), sentinel })
    }

    /// Reservations at `p` in time order.
    pub fn reservations(&self, p: Position) -> SpatialResult<Vec<Reservation>> {
        Ok(self.slots(p)?.filter_map(|s| self.reservation(s)).collect())
    }

    /// The reservation held in `slot`; `None` for sentinels and dead slots.
    #[inline]
    pub fn reservation(&self, slot: SlotId) -> Option<Reservation> {
        self.node(slot).ok().and_then(|n| n.reservation)
    }

    /// `reserve_from` of `slot`, or infinity for a sentinel: the latest time
    /// the gap before `slot` may be occupied.
    #[inline]
    pub fn gap_end(&self, slot: SlotId) -> SimTime {
        self.reservation(slot).map_or(SimTime::INFINITY, |r| r.reserve_from)
    }

    #[inline]
    pub fn is_sentinel(&self, slot: SlotId) -> bool {
        self.node(slot).is_ok_and(|n| n.reservation.is_none())
    }

    /// `true` while `slot` is linked into its timeline.
    pub fn is_linked(&self, slot: SlotId) -> bool {
        self.node(slot).is_ok_and(|n| !n.detached)
    }

    pub fn position(&self, slot: SlotId) -> SpatialResult<Position> {
        Ok(self.node(slot)?.position)
    }

    pub fn prev(&self, slot: SlotId) -> SpatialResult<SlotId> {
        Ok(self.node(slot)?.prev)
    }

    pub fn next(&self, slot: SlotId) -> SpatialResult<SlotId> {
        Ok(self.node(slot)?.next)
    }

    /// `true` when no reservation precedes `slot` in its timeline.
    pub fn is_first(&self, slot: SlotId) -> SpatialResult<bool> {
        let prev = self.prev(slot)?;
        Ok(self.is_sentinel(prev))
    }

    /// Number of live reservation nodes (sentinels excluded).
    pub fn reservation_count(&self) -> usize {
        self.nodes.len() - self.sentinels.len() - self.free.len()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Link a new reservation immediately before `before` and return its
    /// handle.
    pub fn insert_before(&mut self, before: SlotId, reservation: Reservation) -> SpatialResult<SlotId> {
        let (position, prev) = {
            let n = self.node(before)?;
            if n.detached {
                return Err(SpatialError::DeadSlot(before));
            }
            (n.position, n.prev)
        };
        let node = Node { position, reservation: Some(reservation), prev, next: before, live: true, detached: false };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = SlotId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        };
        self.nodes[prev.index()].next = id;
        self.nodes[before.index()].prev = id;
        Ok(id)
    }

    /// Unlink and free `slot`.  Releasing a sentinel is a no-op.
    pub fn release(&mut self, slot: SlotId) -> SpatialResult<()> {
        let n = self.node(slot)?;
        if n.reservation.is_none() {
            return Ok(());
        }
        if !n.detached {
            self.unlink(slot);
        }
        let node = &mut self.nodes[slot.index()];
        node.live = false;
        node.detached = false;
        self.free.push(slot);
        Ok(())
    }

    /// Unlink `slot` but keep it allocated so it can be [`reattach`]ed.
    ///
    /// Detach/reattach pairs must be undone in LIFO order with no other
    /// mutation of the affected timelines in between.
    ///
    /// [`reattach`]: ReservationStore::reattach
    pub fn detach(&mut self, slot: SlotId) -> SpatialResult<()> {
        let n = self.node(slot)?;
        if n.reservation.is_none() {
            return Err(SpatialError::SentinelSlot(slot));
        }
        if n.detached {
            return Ok(());
        }
        self.unlink(slot);
        self.nodes[slot.index()].detached = true;
        Ok(())
    }

    /// Relink a detached slot between its former neighbours.
    pub fn reattach(&mut self, slot: SlotId) -> SpatialResult<()> {
        let n = self.node(slot)?;
        if !n.detached {
            return Ok(());
        }
        let (prev, next) = (n.prev, n.next);
        self.nodes[prev.index()].next = slot;
        self.nodes[next.index()].prev = slot;
        self.nodes[slot.index()].detached = false;
        Ok(())
    }

    fn unlink(&mut self, slot: SlotId) {
        let (prev, next) = {
            let n = &self.nodes[slot.index()];
            (n.prev, n.next)
        };
        self.nodes[prev.index()].next = next;
        self.nodes[next.index()].prev = prev;
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check every timeline: fields of each reservation are ordered,
    /// consecutive reservations do not overlap, and `reserve_from` never
    /// decreases.  Returns the first offending cell.
    pub fn audit(&self) -> Result<(), Position> {
        for &sentinel in &self.sentinels {
            let position = self.nodes[sentinel.index()].position;
            let mut prev: Option<Reservation> = None;
            let mut cur = self.nodes[sentinel.index()].next;
            while cur != sentinel {
                let Some(r) = self.nodes[cur.index()].reservation else {
                    return Err(position);
                };
                let ordered = r.reserve_from <= r.be_from
                    && r.be_from <= r.be_until
                    && r.be_until <= r.reserve_until;
                if !ordered {
                    return Err(position);
                }
                if let Some(p) = prev {
                    if p.reserve_until > r.reserve_from || p.be_until > r.be_from {
                        return Err(position);
                    }
                }
                prev = Some(r);
                cur = self.nodes[cur.index()].next;
            }
        }
        Ok(())
    }
}

// ── SlotIter ──────────────────────────────────────────────────────────────────

/// Iterator over one cell's slots, sentinel last.
pub struct SlotIter<'a> {
    store: &'a ReservationStore,
    cursor: Option<SlotId>,
    sentinel: SlotId,
}

impl Iterator for SlotIter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let cur = self.cursor?;
        self.cursor = (cur != self.sentinel).then(|| self.store.nodes[cur.index()].next);
        Some(cur)
    }
}
