//! `sc-behavior` — the routing-policy ("brain") interface.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`decision`] | `Decision` — an action plus an optional wake-up time       |
//! | [`context`]  | `BrainContext<'a>`, `RobotView` — what a brain may read     |
//! | [`model`]    | `Brain` trait                                              |
//! | [`noop`]     | `IdleBrain`, `ScriptedBrain`                               |
//! | [`error`]    | `BrainError`, `BrainResult<T>`                             |
//!
//! # Design notes
//!
//! The execution loop in sc-sim asks the brain for one decision each time a
//! robot finishes an action or is woken.  The brain sees a snapshot of the
//! robot ([`RobotView`]) and of the world ([`BrainContext`]); it never
//! mutates robot state directly.  The loop turns the decision into timed
//! events, so a brain that wants to wait returns `Action::Idle` with a
//! `wake_at` instead of polling.

pub mod context;
pub mod decision;
pub mod error;
pub mod model;
pub mod noop;


pub use context::{BrainContext, RobotView};
pub use decision::Decision;
pub use error::{BrainError, BrainResult};
pub use model::Brain;
pub use noop::{IdleBrain, ScriptedBrain};
