pub mod error;
pub mod mdp;
pub mod tasks;
pub mod topology;

pub use error::{Error, Result};
pub use mdp::{
    value_iteration, Action, Observation, Policy, ReactiveAgent, SolverConfig, State, StateSpace,
    UpdateRule,
};
pub use tasks::{TaskModel, TaskTable};
pub use topology::{Location, LocationGraph, RoadMap};
