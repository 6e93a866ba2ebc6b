//! `sc-core` — foundational types for the sorting-center simulation.
//!
//! This crate is a dependency of every other `sc-*` crate.  It has no `sc-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `RobotId`, `MailId`, `StationId`, `SlotId`, `EventId`, `ProcessId` |
//! | [`geo`]    | `Direction`, `Position`                                    |
//! | [`time`]   | `SimTime`, `SimConfig`                                     |
//! | [`robot`]  | `Mail`, `RobotType`, `Action`                              |
//! | [`rng`]    | `SimRng`                                                   |
//! | [`error`]  | `ScError`, `ScResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod robot;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ScError, ScResult};
pub use geo::{Direction, Position};
pub use ids::{EventId, MailId, ProcessId, RobotId, SlotId, StationId};
pub use rng::SimRng;
pub use robot::{Action, Mail, RobotType};
pub use time::{SimConfig, SimTime};
