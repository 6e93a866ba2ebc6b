//! Trivial brains for tests and passive robots.

use std::collections::{HashMap, VecDeque};

use sc_core::RobotId;

use crate::{Brain, BrainContext, BrainResult, Decision, RobotView};

/// A [`Brain`] whose robots idle forever.
pub struct IdleBrain;

impl Brain for IdleBrain {
    fn new_robot(&mut self, _robot: &RobotView, _ctx: &BrainContext<'_>) -> BrainResult<()> {
        Ok(())
    }

    fn next_action(&mut self, _robot: &RobotView, _ctx: &BrainContext<'_>) -> BrainResult<Decision> {
        Ok(Decision::idle())
    }
}

/// A [`Brain`] that replays a fixed decision list per robot, then idles.
///
/// Every call also records the robot view it was given, so tests can check
/// what the robot looked like at each decision point.
#[derive(Default)]
pub struct ScriptedBrain {
    scripts: HashMap<RobotId, VecDeque<Decision>>,
    pub seen: Vec<RobotView>,
}

impl ScriptedBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, robot: RobotId, decisions: impl IntoIterator<Item = Decision>) -> Self {
        self.scripts.entry(robot).or_default().extend(decisions);
        self
    }
}

impl Brain for ScriptedBrain {
    fn new_robot(&mut self, robot: &RobotView, _ctx: &BrainContext<'_>) -> BrainResult<()> {
        self.scripts.entry(robot.id).or_default();
        Ok(())
    }

    fn next_action(&mut self, robot: &RobotView, _ctx: &BrainContext<'_>) -> BrainResult<Decision> {
        self.seen.push(robot.clone());
        let next = self.scripts.get_mut(&robot.id).and_then(|q| q.pop_front());
        Ok(next.unwrap_or_else(Decision::idle))
    }
}
