use sc_core::{Action, SimTime};

/// What a robot should do next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub action: Action,
    /// For `Action::Idle`: when to ask again.  `None` idles until the robot
    /// is aborted from outside.  Ignored for other actions.
    pub wake_at: Option<SimTime>,
}

impl Decision {
    pub fn act(action: Action) -> Self {
        Self { action, wake_at: None }
    }

    pub fn idle_until(time: SimTime) -> Self {
        Self { action: Action::Idle, wake_at: Some(time) }
    }

    /// Idle with no scheduled wake-up.
    pub fn idle() -> Self {
        Self { action: Action::Idle, wake_at: None }
    }
}

impl From<Action> for Decision {
    fn from(action: Action) -> Self {
        Self::act(action)
    }
}
