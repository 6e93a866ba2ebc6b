//! The `Brain` trait — the routing-policy extension point.

use crate::{BrainContext, BrainResult, Decision, RobotView};

/// Pluggable routing policy.
///
/// One brain drives every robot of a simulation.  It is called from a single
/// thread in deterministic order, so implementations may keep per-robot
/// state in `&mut self`.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysForward;
///
/// impl Brain for AlwaysForward {
///     fn new_robot(&mut self, _: &RobotView, _: &BrainContext<'_>) -> BrainResult<()> {
///         Ok(())
///     }
///
///     fn next_action(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<Decision> {
///         if ctx.grid.can_traverse(robot.position, robot.direction) {
///             Ok(Decision::act(Action::Move))
///         } else {
///             Ok(Decision::act(Action::Turn(robot.direction.inverse())))
///         }
///     }
/// }
/// ```
pub trait Brain {
    /// Set up per-robot bookkeeping.  Called once per robot, in robot id
    /// order, before the first `next_action`.
    fn new_robot(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<()>;

    /// Decide the robot's next action.  Errors are fatal to the run.
    fn next_action(&mut self, robot: &RobotView, ctx: &BrainContext<'_>) -> BrainResult<Decision>;
}
