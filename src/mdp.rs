//! Reactive pickup-and-delivery planning as a Markov decision process.
//!
//! A vehicle sits at a location and may see a task waiting there. It can
//! move empty to a neighbor or, when a task is waiting, pick it up and
//! deliver it. [`StateSpace`] enumerates every `(location, task)` state with
//! its legal actions, [`value_iteration`] solves the Bellman equations over
//! it, and the resulting [`Policy`] answers each runtime observation.

pub mod action;
pub mod agent;
pub mod config;
pub mod policy;
pub mod reward;
pub mod state;
pub mod state_space;
pub mod transition;
pub mod value_iteration;


pub use action::{legal_actions, Action};
pub use agent::{Observation, ReactiveAgent};
pub use config::{SolverConfig, UpdateRule, DEFAULT_DISCOUNT, DEFAULT_EPSILON};
pub use policy::{Policy, PolicyEntry};
pub use reward::RewardModel;
pub use state::State;
pub use state_space::{ActionEdge, StateSpace, Transition};
pub use transition::TransitionModel;
pub use value_iteration::{value_iteration, SolveReport};
