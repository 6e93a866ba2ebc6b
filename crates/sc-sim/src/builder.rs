//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use sc_behavior::{Brain, BrainContext};
use sc_core::{Direction, Position, RobotType, SimConfig, SimTime};
use sc_schedule::Scheduler;
use sc_spatial::{CellLocks, Grid, LockOutcome};
use tracing::info;

use crate::sim::{Floor, Owner, Signal};
use crate::{MailDesk, MailSource, RobotStore, Sim, SimError, SimResult};

struct Placement {
    position: Position,
    direction: Direction,
    kind: RobotType,
    patience: Option<f64>,
}

/// Fluent builder for [`Sim<B, M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed and end time
/// - [`Grid`]: the floor, built with [`sc_spatial::GridBuilder`]
/// - `B: Brain`: the routing policy
/// - `M: MailSource`: where mail comes from
///
/// Robots are added with [`robot`](Self::robot) or
/// [`robot_with_patience`](Self::robot_with_patience) and receive ids
/// `0, 1, …` in that order.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, grid, brain, mail)
///     .robot(Position::new(0, 0), Direction::Right, RobotType::default())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<B, M> {
    config: SimConfig,
    grid: Grid,
    brain: B,
    mail: M,
    robots: Vec<Placement>,
}

impl<B: Brain, M: MailSource> SimBuilder<B, M> {
    pub fn new(config: SimConfig, grid: Grid, brain: B, mail: M) -> Self {
        Self { config, grid, brain, mail, robots: Vec::new() }
    }

    /// Add a robot that waits for contested cells as long as it takes.
    pub fn robot(mut self, position: Position, direction: Direction, kind: RobotType) -> Self {
        self.robots.push(Placement { position, direction, kind, patience: None });
        self
    }

    /// Add a robot that gives up on a contested cell after `patience`.
    pub fn robot_with_patience(
        mut self,
        position: Position,
        direction: Direction,
        kind: RobotType,
        patience: f64,
    ) -> Self {
        self.robots.push(Placement { position, direction, kind, patience: Some(patience) });
        self
    }

    fn validate(&self) -> SimResult<()> {
        let mut seen = HashSet::new();
        for (i, placement) in self.robots.iter().enumerate() {
            let p = placement.position;
            if !self.grid.contains(p) {
                return Err(SimError::Config(format!("robot {i} starts at {p}, outside the map")));
            }
            if !self.grid.is_free(p) {
                return Err(SimError::Config(format!("robot {i} starts on the wall at {p}")));
            }
            if !seen.insert(p) {
                return Err(SimError::Config(format!("robot {i} starts on {p}, which another robot occupies")));
            }
            if let Some(limit) = placement.patience {
                if !(limit.is_finite() && limit > 0.0) {
                    return Err(SimError::Config(format!("robot {i}: patience must be positive, got {limit}")));
                }
            }
        }
        if !self.robots.is_empty() && self.grid.inputs().is_empty() {
            return Err(SimError::Config("robots need at least one input station".into()));
        }
        self.config.validate()?;
        Ok(())
    }

    /// Validate inputs, place and register the robots, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<B, M>> {
        self.validate()?;
        let Self { config, grid, mut brain, mail, robots: placements } = self;

        let mut sched = Scheduler::new();
        let mut owners = Vec::with_capacity(placements.len() + 1);
        let desk = MailDesk::new(mail);
        // the feed runs first so mail released at t=0 is stocked before
        // any robot asks
        if desk.next_release().is_some() {
            sched.spawn(Signal::Start);
            owners.push(Owner::MailFeed);
        }

        let mut robots = RobotStore::new();
        let mut locks = CellLocks::new(&grid);
        for placement in placements {
            let process = sched.spawn(Signal::Start);
            let id = robots.add(placement.position, placement.direction, placement.kind, placement.patience, process);
            owners.push(Owner::Robot(id));
            if let LockOutcome::Held(other) = locks.try_lock(&grid, placement.position, id)? {
                return Err(SimError::Config(format!("robot {id} starts on a cell held by robot {other}")));
            }
            brain.new_robot(&robots.get(id)?.view(), &BrainContext::new(SimTime::ZERO, &grid))?;
        }

        info!("built simulation: {} robots on a {}x{} grid", robots.len(), grid.rows(), grid.cols());
        Ok(Sim { config, sched, floor: Floor { grid, robots, brain, desk, locks, owners, delivered: 0 } })
    }
}
