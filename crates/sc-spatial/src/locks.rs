//! `CellLocks` — instantaneous per-cell mutual exclusion.
//!
//! Each free cell is a capacity-one resource.  A robot holds the cell it
//! stands on and acquires the next cell before stepping into it.  A failed
//! [`CellLocks::try_lock`] is a normal negative result: the caller either
//! gives up or joins the cell's FIFO wait queue, and the lock is handed to
//! the first waiter when the holder releases it.

use std::collections::VecDeque;

use sc_core::{Position, RobotId};

use crate::{Grid, SpatialError, SpatialResult};

/// Result of a lock attempt.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LockOutcome {
    Acquired,
    /// Another robot holds the cell.
    Held(RobotId),
}

/// Holder and waiters per cell, indexed like [`Grid`] cells.
pub struct CellLocks {
    holders: Vec<Option<RobotId>>,
    waiters: Vec<VecDeque<RobotId>>,
}

impl CellLocks {
    pub fn new(grid: &Grid) -> Self {
        let n = grid.cell_count();
        Self { holders: vec![None; n], waiters: vec![VecDeque::new(); n] }
    }

    fn index(grid: &Grid, p: Position) -> SpatialResult<usize> {
        let i = grid.index_of(p).ok_or(SpatialError::PositionOutOfMap(p))?;
        if !grid.is_free(p) {
            return Err(SpatialError::NotFreeCell(p));
        }
        Ok(i)
    }

    /// Lock `p` for `robot` if nobody else holds it.  Re-locking a cell the
    /// robot already holds succeeds.
    pub fn try_lock(&mut self, grid: &Grid, p: Position, robot: RobotId) -> SpatialResult<LockOutcome> {
        let i = Self::index(grid, p)?;
        match self.holders[i] {
            Some(other) if other != robot => Ok(LockOutcome::Held(other)),
            _ => {
                self.holders[i] = Some(robot);
                Ok(LockOutcome::Acquired)
            }
        }
    }

    /// Queue `robot` for `p`.  It will be returned by a later
    /// [`CellLocks::release`] once it reaches the front.
    pub fn enqueue(&mut self, grid: &Grid, p: Position, robot: RobotId) -> SpatialResult<()> {
        let i = Self::index(grid, p)?;
        self.waiters[i].push_back(robot);
        Ok(())
    }

    /// Remove `robot` from the wait queue of `p`.  `false` if it was not
    /// queued.
    pub fn withdraw(&mut self, grid: &Grid, p: Position, robot: RobotId) -> bool {
        let Some(i) = grid.index_of(p) else {
            return false;
        };
        match self.waiters[i].iter().position(|r| *r == robot) {
            Some(k) => {
                self.waiters[i].remove(k);
                true
            }
            None => false,
        }
    }

    /// Release `p` held by `robot`.  If robots are waiting, the first one
    /// becomes the new holder and is returned.
    pub fn release(&mut self, grid: &Grid, p: Position, robot: RobotId) -> SpatialResult<Option<RobotId>> {
        let i = grid.index_of(p).ok_or(SpatialError::PositionOutOfMap(p))?;
        if self.holders[i] != Some(robot) {
            return Err(SpatialError::NotHolder { position: p, robot });
        }
        let next = self.waiters[i].pop_front();
        self.holders[i] = next;
        Ok(next)
    }

    pub fn holder(&self, grid: &Grid, p: Position) -> Option<RobotId> {
        grid.index_of(p).and_then(|i| self.holders[i])
    }

    pub fn waiting(&self, grid: &Grid, p: Position) -> usize {
        grid.index_of(p).map_or(0, |i| self.waiters[i].len())
    }
}
