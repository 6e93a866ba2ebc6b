//! `sc-sim` — robot execution loop and run orchestration.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`robot`]    | `Robot`, `RobotStore` (issues ids in insertion order)      |
//! | [`mail`]     | `MailSource`, `AlwaysReadyMail`, `SequenceMail`, `LoggedMail`, `MailDesk` |
//! | [`sim`]      | `Sim` — the per-robot process state machine                |
//! | [`builder`]  | `SimBuilder` — validation and placement                    |
//! | [`observer`] | `SimObserver`, `ActionRecord`, `NoopObserver`, `ActionLog` |
//! | [`stats`]    | `Throughput`                                               |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Event order
//!
//! All state changes happen inside scheduler callbacks.  Events due at the
//! same time run in the order they were scheduled, so two runs of the same
//! configuration produce the same action sequence.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sc_core::{Direction, Position, RobotType, SimConfig};
//! use sc_planner::{PathBrain, PlannerConfig};
//! use sc_sim::{NoopObserver, SequenceMail, SimBuilder};
//!
//! let brain = PathBrain::new(&grid, PlannerConfig::default())?;
//! let mut sim = SimBuilder::new(SimConfig::new(42, 100.0), grid, brain, mail)
//!     .robot(Position::new(0, 0), Direction::Right, RobotType::default())
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("delivered {}", sim.delivered());
//! ```

pub mod builder;
pub mod error;
pub mod mail;
pub mod observer;
pub mod robot;
pub mod sim;
pub mod stats;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use mail::{AlwaysReadyMail, LoggedMail, MailDesk, MailSource, RandomMail, SequenceMail};
pub use observer::{ActionLog, ActionRecord, NoopObserver, SimObserver};
pub use robot::{Robot, RobotStore};
pub use sim::Sim;
pub use stats::Throughput;
