//! Simulation time model.
//!
//! # Design
//!
//! Time is continuous: a `SimTime` wraps an `f64` so that move, turn, take and
//! put durations can be arbitrary positive reals.  Ordering uses
//! [`f64::total_cmp`], which makes `SimTime` a total order usable as a
//! `BTreeMap` key.  `SimTime::INFINITY` marks open-ended intervals such as
//! the unreserved tail of a cell's timeline.
//!
//! The clock itself lives in the scheduler; this module only supplies the
//! value type and the run configuration.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{ScError, ScResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute point (or a duration) in simulated time.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);
    pub const INFINITY: SimTime = SimTime(f64::INFINITY);

    #[inline]
    pub fn new(value: f64) -> Self {
        SimTime(value)
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    #[inline]
    pub fn max(self, other: SimTime) -> SimTime {
        if self >= other { self } else { other }
    }

    #[inline]
    pub fn min(self, other: SimTime) -> SimTime {
        if self <= other { self } else { other }
    }
}

impl PartialEq for SimTime {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for SimTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::AddAssign<f64> for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: f64) {
        self.0 += rhs;
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl std::ops::Sub<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: f64) -> SimTime {
        SimTime(self.0 - rhs)
    }
}

impl From<f64> for SimTime {
    #[inline]
    fn from(value: f64) -> Self {
        SimTime(value)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_infinite() {
            write!(f, "t=inf")
        } else {
            write!(f, "t={}", self.0)
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built by the application crate and passed to the simulation
/// builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Simulated time at which `Sim::run` stops (inclusive).
    pub end_time: SimTime,
}

impl SimConfig {
    pub fn new(seed: u64, end_time: f64) -> Self {
        Self { seed, end_time: SimTime(end_time) }
    }

    /// The end time must be finite and non-negative.
    pub fn validate(&self) -> ScResult<()> {
        if !self.end_time.is_finite() || self.end_time < SimTime::ZERO {
            return Err(ScError::Config(format!("end time must be finite and non-negative, got {}", self.end_time)));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 0, end_time: SimTime(1_000.0) }
    }
}
