//! Sorting-floor grid and builder.
//!
//! # Data layout
//!
//! Cells are stored row-major; `Position { row, col }` maps to index
//! `row * cols + col`.  Stations are indexed twice: inputs as a list in
//! row-major scan order (the round-robin order used when assigning robots to
//! inputs), outputs as a lookup from station id to position.
//!
//! # One-way edges
//!
//! A grid may restrict some edges to a single direction.  `exits[i]` holds,
//! for cell `i`, whether a robot may leave it towards each `Direction`.  When
//! no edge is restricted the table is not allocated.

use std::collections::HashMap;

use sc_core::{Direction, Position, StationId};

use crate::{SpatialError, SpatialResult};

// ── Cell ──────────────────────────────────────────────────────────────────────

/// Static attributes of one grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// `false` for walls.  Walls are never entered.
    pub free: bool,
    pub input: Option<StationId>,
    pub output: Option<StationId>,
}

impl Default for Cell {
    fn default() -> Self {
        Self { free: true, input: None, output: None }
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Immutable rectangular map.  Construct with [`GridBuilder`].
#[derive(Clone, Debug)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<Cell>,
    exits: Option<Vec<[bool; 4]>>,
    inputs: Vec<(StationId, Position)>,
    outputs: HashMap<StationId, Position>,
}

impl Grid {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn contains(&self, p: Position) -> bool {
        p.row >= 0 && p.col >= 0 && (p.row as u32) < self.rows && (p.col as u32) < self.cols
    }

    /// Row-major index of `p`, or `None` when off the grid.
    #[inline]
    pub fn index_of(&self, p: Position) -> Option<usize> {
        self.contains(p).then(|| p.row as usize * self.cols as usize + p.col as usize)
    }

    /// Inverse of [`Grid::index_of`].
    #[inline]
    pub fn position_of(&self, index: usize) -> Position {
        let cols = self.cols as usize;
        Position::new((index / cols) as i32, (index % cols) as i32)
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(|i| self.position_of(i))
    }

    // ── Cell attributes ───────────────────────────────────────────────────

    pub fn cell(&self, p: Position) -> Option<&Cell> {
        self.index_of(p).map(|i| &self.cells[i])
    }

    /// On the grid and not a wall.
    #[inline]
    pub fn is_free(&self, p: Position) -> bool {
        self.cell(p).is_some_and(|c| c.free)
    }

    pub fn input_at(&self, p: Position) -> Option<StationId> {
        self.cell(p).and_then(|c| c.input)
    }

    pub fn output_at(&self, p: Position) -> Option<StationId> {
        self.cell(p).and_then(|c| c.output)
    }

    /// Input stations in row-major scan order.
    pub fn inputs(&self) -> &[(StationId, Position)] {
        &self.inputs
    }

    pub fn input_position(&self, id: StationId) -> Option<Position> {
        self.inputs.iter().find(|(sid, _)| *sid == id).map(|(_, p)| *p)
    }

    pub fn output_position(&self, id: StationId) -> Option<Position> {
        self.outputs.get(&id).copied()
    }

    /// Output station ids in ascending order.
    pub fn output_ids(&self) -> Vec<StationId> {
        let mut ids: Vec<StationId> = self.outputs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Can a robot standing on `from` step one cell towards `dir`?
    ///
    /// Requires both cells to be on the grid, the target to be free, and no
    /// one-way restriction against this direction.
    pub fn can_traverse(&self, from: Position, dir: Direction) -> bool {
        let Some(i) = self.index_of(from) else {
            return false;
        };
        if !self.is_free(from.next_on(dir)) {
            return false;
        }
        match &self.exits {
            Some(exits) => exits[i][dir.index()],
            None => true,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.exits.is_some()
    }
}

// ── GridBuilder ───────────────────────────────────────────────────────────────

/// Construct a [`Grid`] incrementally, then call [`build`](Self::build).
///
/// Errors (off-grid positions, stations on walls, duplicate station ids) are
/// reported by `build`, so call sites can chain freely.
///
/// # Example
///
/// ```
/// use sc_core::{Position, StationId};
/// use sc_spatial::GridBuilder;
///
/// let grid = GridBuilder::new(1, 3)
///     .input(Position::new(0, 0), StationId(1))
///     .output(Position::new(0, 2), StationId(1))
///     .build()
///     .unwrap();
/// assert_eq!(grid.inputs().len(), 1);
/// ```
pub struct GridBuilder {
    rows:     u32,
    cols:     u32,
    walls:    Vec<Position>,
    inputs:   Vec<(Position, StationId)>,
    outputs:  Vec<(Position, StationId)>,
    one_ways: Vec<(Position, Direction)>,
}

impl GridBuilder {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            walls:    Vec::new(),
            inputs:   Vec::new(),
            outputs:  Vec::new(),
            one_ways: Vec::new(),
        }
    }

    pub fn wall(mut self, p: Position) -> Self {
        self.walls.push(p);
        self
    }

    pub fn input(mut self, p: Position, id: StationId) -> Self {
        self.inputs.push((p, id));
        self
    }

    pub fn output(mut self, p: Position, id: StationId) -> Self {
        self.outputs.push((p, id));
        self
    }

    /// Restrict the edge between `p` and `p.next_on(dir)` to the direction
    /// `dir`: robots may step from `p` towards `dir` but not back.
    pub fn one_way(mut self, p: Position, dir: Direction) -> Self {
        self.one_ways.push((p, dir));
        self
    }

    pub fn build(self) -> SpatialResult<Grid> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SpatialError::ZeroSize { rows: self.rows, cols: self.cols });
        }
        let count = self.rows as usize * self.cols as usize;
        let mut grid = Grid {
            rows: self.rows,
            cols: self.cols,
            cells: vec![Cell::default(); count],
            exits: None,
            inputs: Vec::new(),
            outputs: HashMap::new(),
        };

        for p in self.walls {
            let i = grid.index_of(p).ok_or(SpatialError::PositionOutOfMap(p))?;
            grid.cells[i].free = false;
        }

        let mut seen_inputs = HashMap::new();
        for (p, id) in self.inputs {
            let i = grid.index_of(p).ok_or(SpatialError::PositionOutOfMap(p))?;
            if !grid.cells[i].free {
                return Err(SpatialError::StationOnWall { id, position: p });
            }
            if seen_inputs.insert(id, p).is_some() {
                return Err(SpatialError::DuplicateStation { id, kind: "input" });
            }
            grid.cells[i].input = Some(id);
        }

        for (p, id) in self.outputs {
            let i = grid.index_of(p).ok_or(SpatialError::PositionOutOfMap(p))?;
            if !grid.cells[i].free {
                return Err(SpatialError::StationOnWall { id, position: p });
            }
            if grid.outputs.insert(id, p).is_some() {
                return Err(SpatialError::DuplicateStation { id, kind: "output" });
            }
            grid.cells[i].output = Some(id);
        }

        // scan order, not insertion order
        grid.inputs = (0..count)
            .filter_map(|i| grid.cells[i].input.map(|id| (id, grid.position_of(i))))
            .collect();

        if !self.one_ways.is_empty() {
            let mut exits = vec![[true; 4]; count];
            for (p, dir) in self.one_ways {
                grid.index_of(p).ok_or(SpatialError::PositionOutOfMap(p))?;
                let back = p.next_on(dir);
                let j = grid.index_of(back).ok_or(SpatialError::PositionOutOfMap(back))?;
                exits[j][dir.inverse().index()] = false;
            }
            grid.exits = Some(exits);
        }

        Ok(grid)
    }
}
