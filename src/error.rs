//! Error types shared by the planner.

use thiserror::Error;

/// Result type for planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up the planner or serving a decision.
///
/// Locations and states are carried in their `Debug` rendering so the error
/// type does not depend on the caller's location identifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Rejected solver configuration (discount, epsilon or sweep budget).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An observation maps to a state that was never enumerated.
    #[error("no policy entry for state {state}")]
    StateLookup { state: String },

    /// Task probabilities out of an origin add up to more than one.
    #[error("task probabilities from {origin} sum to {total}, leaving negative no-task mass")]
    NumericDegeneracy { origin: String, total: f64 },

    /// A single task probability is outside `[0, 1]` or not finite.
    #[error("task probability {origin} -> {destination} is {value}")]
    InvalidProbability {
        origin: String,
        destination: String,
        value: f64,
    },

    /// A task's expected reward is negative or not finite.
    #[error("expected reward {origin} -> {destination} is {value}")]
    InvalidReward {
        origin: String,
        destination: String,
        value: f64,
    },

    /// A location lists itself as a neighbor, or an action targets its own location.
    #[error("self-loop at location {location}")]
    SelfLoop { location: String },

    /// A neighbor is not part of the location set.
    #[error("location {location} is not in the location set")]
    UnknownLocation { location: String },

    /// Distance between two locations is not a finite positive number.
    #[error("distance {from} -> {to} is {value}")]
    InvalidDistance { from: String, to: String, value: f64 },

    /// The action is not legal in the state it was evaluated against.
    #[error("action {action} is not legal in state {state}")]
    IllegalAction { state: String, action: String },

    /// The sweep budget ran out before the residual dropped below epsilon, or
    /// the values stopped being finite.
    #[error("value iteration did not converge after {sweeps} sweeps (residual {residual})")]
    NotConverged { sweeps: usize, residual: f64 },
}

impl Error {
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn state_lookup<S: std::fmt::Debug>(state: &S) -> Self {
        Error::StateLookup {
            state: format!("{:?}", state),
        }
    }
}
