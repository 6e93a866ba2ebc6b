//! `sc-spatial` — grid, cell reservations, and time-expanded path search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`grid`]     | `Grid`, `Cell`, `GridBuilder` (walls, stations, one-way edges) |
//! | [`locks`]    | `CellLocks` — instantaneous per-cell mutual exclusion       |
//! | [`timeline`] | `ReservationStore`, `Reservation` — per-cell occupancy timelines |
//! | [`heap`]     | `IndexedMinHeap` — binary heap with mutable priorities     |
//! | [`search`]   | `PathSpan`, `SearchTree`, `dijkstra`, `a_star`             |
//! | [`timed`]    | `TimedVertex`, `TimedGraph`, `WaypointVertex`, `WaypointRoute` |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for search bookkeeping.          |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public value types.   |

pub mod error;
pub mod grid;
pub mod heap;
pub mod locks;
pub mod search;
pub mod timed;
pub mod timeline;


pub use error::{SpatialError, SpatialResult};
pub use grid::{Cell, Grid, GridBuilder};
pub use heap::IndexedMinHeap;
pub use locks::{CellLocks, LockOutcome};
pub use search::{PathSpan, SearchTree, a_star, dijkstra};
pub use timed::{MAX_WAYPOINT_EXHAUSTION, TimedGraph, TimedVertex, WaypointRoute, WaypointVertex};
pub use timeline::{Reservation, ReservationStore};

/// Hash map used for search bookkeeping.
#[cfg(feature = "fx-hash")]
pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// Hash set used for search bookkeeping.
#[cfg(feature = "fx-hash")]
pub(crate) type Set<K> = rustc_hash::FxHashSet<K>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Set<K> = std::collections::HashSet<K>;
