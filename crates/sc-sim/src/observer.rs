//! Simulation observer trait for recording and progress reporting.

use sc_core::{Action, Direction, Mail, Position, RobotId, SimTime};

/// One action as it starts.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ActionRecord {
    pub time: SimTime,
    pub robot: RobotId,
    pub action: Action,
    /// Where the robot stands when the action starts.
    pub position: Position,
    pub direction: Direction,
    /// Mail carried, or for `Take` the mail being picked up.
    pub mail: Option<Mail>,
    /// Infinite for an idle with no wake-up time.
    pub duration: f64,
}

/// Callbacks invoked by [`Sim`](crate::Sim) as robots act.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Deliveries(u64);
///
/// impl SimObserver for Deliveries {
///     fn on_delivered(&mut self, _time: SimTime, _robot: RobotId, _mail: Mail) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called when an action begins, after any wait for a cell or for mail.
    fn on_action(&mut self, _record: &ActionRecord) {}

    /// Called when a put completes.
    fn on_delivered(&mut self, _time: SimTime, _robot: RobotId, _mail: Mail) {}

    /// Called once by [`Sim::run`](crate::Sim::run) after the end time.
    fn on_sim_end(&mut self, _time: SimTime, _delivered: u64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Collects every action record in memory.
#[derive(Default)]
pub struct ActionLog {
    pub actions: Vec<ActionRecord>,
    pub delivered: Vec<(SimTime, RobotId, Mail)>,
}

impl SimObserver for ActionLog {
    fn on_action(&mut self, record: &ActionRecord) {
        self.actions.push(*record);
    }

    fn on_delivered(&mut self, time: SimTime, robot: RobotId, mail: Mail) {
        self.delivered.push((time, robot, mail));
    }
}
