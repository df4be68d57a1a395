//! Location graph the vehicle drives on.
//!
//! The planner only needs three things from a topology: the location set,
//! each location's neighbors, and a pairwise distance. [`LocationGraph`] is
//! the seam for a caller-supplied topology; [`RoadMap`] is an in-memory
//! implementation built from weighted routes.

use std::fmt::Debug;
use std::hash::Hash;

pub mod road_map;

pub use road_map::RoadMap;

/// Identifier for a location.
///
/// `Ord` gives states and actions a canonical order, which the solver relies
/// on for deterministic tie-breaking. `Send + Sync` lets sweeps share the
/// state space across worker threads.
pub trait Location: Copy + Eq + Hash + Ord + Debug + Send + Sync {}

impl<T> Location for T where T: Copy + Eq + Hash + Ord + Debug + Send + Sync {}

/// A network of locations with adjacency and pairwise distances.
///
/// Implementations must be pure: repeated queries return the same answers.
pub trait LocationGraph {
    type Location: Location;

    /// Every location in the network.
    fn locations(&self) -> Vec<Self::Location>;

    /// Locations reachable from `location` with a single `Move`.
    fn neighbors(&self, location: Self::Location) -> Vec<Self::Location>;

    /// Symmetric positive distance between two distinct locations.
    ///
    /// The value for `from == to` is unspecified; the planner never asks.
    fn distance(&self, from: Self::Location, to: Self::Location) -> f64;
}
