//! `PathBrain` — time-windowed, collision-free routing.
//!
//! # Per-robot bookkeeping
//!
//! ```text
//!   trailing   current        future[0]   future[1]  …  future[n]
//!   (past)     (cell now)     (after path[0])            (parked, open-ended)
//! ```
//!
//! `path[i]` moves the robot from the cell of `current`/`future[i-1]` into
//! the cell of `future[i]`.  Popping a span shifts `current` into
//! `trailing`; trailing slots are released once their `reserve_until` has
//! passed.
//!
//! # Replanning
//!
//! The robot's current and future slots are detached, the search runs on the
//! remaining timelines, and the result is spliced back in.  A failed search
//! reattaches everything in reverse order, leaving the store exactly as it
//! was.

use std::collections::{HashMap, VecDeque};

use sc_behavior::{Brain, BrainContext, BrainError, BrainResult, Decision, RobotView};
use sc_core::{Action, Position, RobotId, SimTime, SlotId};
use sc_spatial::{Grid, PathSpan, Reservation, ReservationStore, SpatialError, TimedGraph, TimedVertex};
use tracing::debug;

use crate::route::{RestChoice, find_route};
use crate::{PlannerConfig, RestPolicy};

// ── RobotPlan ─────────────────────────────────────────────────────────────────

struct RobotPlan {
    current: SlotId,
    path: VecDeque<PathSpan<TimedVertex>>,
    future: VecDeque<SlotId>,
    trailing: Vec<SlotId>,
    /// Station of the current leg; `None` until assigned.
    target: Option<Position>,
    needs_route: bool,
}

// ── PathBrain ─────────────────────────────────────────────────────────────────

pub struct PathBrain {
    config: PlannerConfig,
    store: ReservationStore,
    robots: HashMap<RobotId, RobotPlan>,
    /// Round-robin cursor into `Grid::inputs`.
    next_input: usize,
}

impl PathBrain {
    /// A brain with empty timelines for every cell of `grid`.
    pub fn new(grid: &Grid, config: PlannerConfig) -> BrainResult<Self> {
        let rest_cells: Vec<Position> = match &config.rests {
            RestPolicy::None => Vec::new(),
            RestPolicy::Personal(map) => map.values().copied().collect(),
            RestPolicy::Closest(cells) => cells.clone(),
        };
        for cell in rest_cells {
            if !grid.is_free(cell) {
                return Err(BrainError::Config(format!("rest cell {cell} is not a free cell of the map")));
            }
        }
        if config.station_penalty < 0.0 {
            return Err(BrainError::Config("station penalty must not be negative".into()));
        }
        Ok(Self { config, store: ReservationStore::new(grid), robots: HashMap::new(), next_input: 0 })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The reservation timelines of every cell.
    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    /// Spans the robot has not started yet.
    pub fn planned_path(&self, robot: RobotId) -> Option<Vec<PathSpan<TimedVertex>>> {
        self.robots.get(&robot).map(|p| p.path.iter().copied().collect())
    }

    /// The slot the robot is in now.
    pub fn current_slot(&self, robot: RobotId) -> Option<SlotId> {
        self.robots.get(&robot).map(|p| p.current)
    }

    pub fn target(&self, robot: RobotId) -> Option<Position> {
        self.robots.get(&robot).and_then(|p| p.target)
    }

    fn plan(&self, robot: RobotId) -> BrainResult<&RobotPlan> {
        self.robots.get(&robot).ok_or(BrainError::UnknownRobot(robot))
    }

    fn plan_mut(&mut self, robot: RobotId) -> BrainResult<&mut RobotPlan> {
        self.robots.get_mut(&robot).ok_or(BrainError::UnknownRobot(robot))
    }

    // ── Step helpers ──────────────────────────────────────────────────────

    fn release_trailing(&mut self, robot: RobotId, now: SimTime) -> BrainResult<()> {
        let Self { store, robots, .. } = self;
        let plan = robots.get_mut(&robot).ok_or(BrainError::UnknownRobot(robot))?;
        let mut kept = Vec::with_capacity(plan.trailing.len());
        for slot in plan.trailing.drain(..) {
            match store.reservation(slot) {
                Some(r) if r.reserve_until > now => kept.push(slot),
                Some(_) => store.release(slot)?,
                None => {}
            }
        }
        plan.trailing = kept;
        Ok(())
    }

    /// After a timed-out move the robot is still in the cell it tried to
    /// leave: step the bookkeeping back and ask for a fresh route.
    fn resync(&mut self, robot: &RobotView) -> BrainResult<()> {
        let Self { store, robots, .. } = self;
        let plan = robots.get_mut(&robot.id).ok_or(BrainError::UnknownRobot(robot.id))?;
        if store.position(plan.current)? != robot.position {
            if let Some(&last) = plan.trailing.last() {
                if store.is_linked(last) && store.position(last)? == robot.position {
                    plan.trailing.pop();
                    plan.future.push_front(plan.current);
                    plan.current = last;
                }
            }
        }
        plan.needs_route = true;
        Ok(())
    }

    /// `Take` or `Put` if the robot stands on its station with the right
    /// cargo and the plan leaves room for the whole operation.
    fn station_action(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<Option<Action>> {
        let plan = self.plan_mut(robot.id)?;
        let Some(target) = plan.target else {
            return Ok(None);
        };
        if robot.position != target {
            return Ok(None);
        }
        let action = match robot.mail {
            None if ctx.grid.input_at(target).is_some() => Action::Take,
            Some(mail) if ctx.grid.output_at(target) == Some(mail.destination) => Action::Put,
            _ => return Ok(None),
        };
        let dwell = action.duration(&robot.kind, robot.direction);
        let head = plan.path.front().map_or(SimTime::INFINITY, |s| s.start);
        if ctx.now + dwell > head {
            return Ok(None);
        }
        plan.target = None;
        plan.needs_route = true;
        Ok(Some(action))
    }

    /// Pop the head span and turn it into a physical action.
    fn advance(&mut self, robot: &RobotView, now: SimTime) -> BrainResult<Decision> {
        let invalid = BrainError::InvalidPathStart { robot: robot.id, position: robot.position, at: now };
        let plan = self.plan_mut(robot.id)?;
        let (Some(span), Some(next)) = (plan.path.pop_front(), plan.future.pop_front()) else {
            return Err(invalid);
        };
        if span.from.position != robot.position || span.from.direction != robot.direction {
            return Err(invalid);
        }
        plan.trailing.push(plan.current);
        plan.current = next;
        let action = if span.to.position != span.from.position {
            Action::Move
        } else {
            Action::Turn(span.to.direction)
        };
        Ok(Decision::act(action))
    }

    /// The next slot is the first claim of its cell: whatever delayed us
    /// there may be gone.
    fn next_cell_unclaimed(&self, robot: RobotId) -> BrainResult<bool> {
        let plan = self.plan(robot)?;
        match plan.future.front() {
            Some(&slot) => Ok(self.store.is_first(slot)?),
            None => Ok(false),
        }
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Assign a station if the robot has none, then plan to it.
    fn route(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<()> {
        if self.plan(robot.id)?.target.is_none() {
            let target = match robot.mail {
                None => {
                    let inputs = ctx.grid.inputs();
                    if inputs.is_empty() {
                        return Err(BrainError::NoInputStations);
                    }
                    let (_, position) = inputs[self.next_input % inputs.len()];
                    self.next_input += 1;
                    position
                }
                Some(mail) => ctx.grid.output_position(mail.destination).ok_or(BrainError::UnknownOutput {
                    robot: robot.id,
                    mail: mail.id,
                    station: mail.destination,
                })?,
            };
            self.plan_mut(robot.id)?.target = Some(target);
        }
        self.replan(robot, ctx)?;
        self.plan_mut(robot.id)?.needs_route = false;
        Ok(())
    }

    /// Replace the robot's reserved path with the earliest one from where it
    /// stands now.  Leaves the store untouched on failure.
    fn replan(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<()> {
        let now = ctx.now;
        let Self { config, store, robots, .. } = self;
        let plan = robots.get_mut(&robot.id).ok_or(BrainError::UnknownRobot(robot.id))?;
        let target = plan
            .target
            .ok_or_else(|| BrainError::Config(format!("robot {} has no station to route to", robot.id)))?;
        let invalid = || BrainError::InvalidPathStart { robot: robot.id, position: robot.position, at: now };

        let current = store
            .reservation(plan.current)
            .filter(|_| store.is_linked(plan.current))
            .ok_or_else(invalid)?;
        if store.position(plan.current)? != robot.position || current.be_from > now {
            return Err(invalid());
        }

        let mut detached = Vec::with_capacity(plan.future.len() + 1);
        for &slot in &plan.future {
            store.detach(slot)?;
            detached.push(slot);
        }
        store.detach(plan.current)?;
        detached.push(plan.current);
        let start_slot = store.next(plan.current)?;
        let start = TimedVertex { position: robot.position, direction: robot.direction, slot: start_slot };

        let dwell = match robot.mail {
            None => robot.kind.time_to_take,
            Some(_) => robot.kind.time_to_put,
        };
        let rest = match &config.rests {
            RestPolicy::None => RestChoice::Park,
            RestPolicy::Personal(cells) => cells.get(&robot.id).map_or(RestChoice::Park, |c| RestChoice::Cell(*c)),
            RestPolicy::Closest(cells) if cells.is_empty() => RestChoice::Park,
            RestPolicy::Closest(cells) => RestChoice::Nearest(cells),
        };

        let found = {
            let graph = TimedGraph::new(ctx.grid, store, robot.kind);
            find_route(&graph, start, now, target, dwell, rest, config.station_penalty)
        };
        let path = match found {
            Ok(path) if path.first().is_none_or(|s| s.from == start) => path,
            Ok(_) => {
                for &slot in detached.iter().rev() {
                    store.reattach(slot)?;
                }
                return Err(invalid());
            }
            Err(err) => {
                for &slot in detached.iter().rev() {
                    store.reattach(slot)?;
                }
                return Err(match err {
                    SpatialError::UnreachablePath => {
                        BrainError::UnreachablePath { robot: robot.id, from: robot.position, to: target }
                    }
                    other => other.into(),
                });
            }
        };

        // splice the new claims in, replacing the detached ones
        let mut slots = VecDeque::with_capacity(path.len() + 1);
        let (mut reserve_from, mut be_from, mut gap) = (current.reserve_from, current.be_from, start_slot);
        for span in &path {
            // a turn hands the cell over to the next claim as soon as it starts
            let turning = span.to.position == span.from.position;
            let reserve_until = if turning { span.start } else { span.end };
            let r = Reservation::new(reserve_from, be_from, span.start, reserve_until);
            slots.push_back(store.insert_before(gap, r)?);
            reserve_from = span.start;
            be_from = if turning { span.start } else { span.end };
            gap = span.to.slot;
        }
        let parked = store.insert_before(gap, Reservation::open_ended(reserve_from, be_from))?;
        slots.push_back(parked);
        for slot in detached {
            store.release(slot)?;
        }

        let parked_at = store.position(parked)?;
        debug!("robot {} routed to {target}: {} spans, parked at {parked_at} from {be_from}", robot.id, path.len());
        plan.current = slots.pop_front().ok_or_else(invalid)?;
        plan.future = slots;
        plan.path = path.into();
        Ok(())
    }
}

impl Brain for PathBrain {
    fn new_robot(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<()> {
        if self.robots.contains_key(&robot.id) {
            return Err(BrainError::Config(format!("robot {} registered twice", robot.id)));
        }
        let sentinel = self.store.sentinel(robot.position)?;
        if self.store.first(robot.position)? != sentinel {
            return Err(BrainError::Config(format!("cell {} is already claimed", robot.position)));
        }
        let current = self.store.insert_before(sentinel, Reservation::open_ended(ctx.now, ctx.now))?;
        self.robots.insert(
            robot.id,
            RobotPlan {
                current,
                path: VecDeque::new(),
                future: VecDeque::new(),
                trailing: Vec::new(),
                target: None,
                needs_route: true,
            },
        );
        debug!("robot {} parked at {}", robot.id, robot.position);
        Ok(())
    }

    fn next_action(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<Decision> {
        let now = ctx.now;
        if robot.timed_out {
            self.resync(robot)?;
        }
        self.release_trailing(robot.id, now)?;
        if self.plan(robot.id)?.needs_route {
            self.route(robot, ctx)?;
        }

        let mut replanned = false;
        loop {
            if let Some(action) = self.station_action(robot, ctx)? {
                return Ok(Decision::act(action));
            }
            let Some(head) = self.plan(robot.id)?.path.front().copied() else {
                return Ok(Decision::idle());
            };
            if head.start == now {
                return self.advance(robot, now);
            }
            if head.start > now {
                if self.config.rebuild_path && !replanned && self.next_cell_unclaimed(robot.id)? {
                    debug!("robot {} idle until {}, trying an earlier path", robot.id, head.start);
                    self.replan(robot, ctx)?;
                    replanned = true;
                    continue;
                }
                return Ok(Decision::idle_until(head.start));
            }
            if replanned {
                return Err(BrainError::InvalidPathStart { robot: robot.id, position: robot.position, at: now });
            }
            debug!("robot {} behind schedule: span due {} at {now}", robot.id, head.start);
            self.replan(robot, ctx)?;
            replanned = true;
        }
    }
}
