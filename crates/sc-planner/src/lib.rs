//! `sc-planner` — the reservation-based path-planning brain.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`config`] | `PlannerConfig`, `RestPolicy`                                |
//! | [`route`]  | `find_route` — station (+ rest) search over the timed graph  |
//! | [`brain`]  | `PathBrain` — per-robot plans, reservation commit, stepping  |
//!
//! # Cycle per robot
//!
//! ```text
//! assign input ─► route ─► walk ─► take ─► route to output ─► walk ─► put ─┐
//!      ▲                                                                   │
//!      └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every route is committed into the cells' reservation timelines before the
//! robot takes its first step, so two robots never hold overlapping claims on
//! a cell.  A robot that falls behind its plan replans from where it stands.

pub mod brain;
pub mod config;
pub mod route;

#[cfg(test)]
mod tests;

pub use brain::PathBrain;
pub use config::{PlannerConfig, RestPolicy};
pub use route::{RestChoice, find_route};
