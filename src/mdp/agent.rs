use log::{debug, info};

use crate::error::Result;
use crate::mdp::{value_iteration, Action, Policy, SolveReport, SolverConfig, StateSpace};
use crate::tasks::TaskModel;
use crate::topology::{Location, LocationGraph};

/// What the harness sees at the start of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation<L> {
    pub location: L,
    /// Destination of the task waiting at `location`, if any
    pub task_destination: Option<L>,
}

impl<L> Observation<L> {
    pub fn new(location: L, task_destination: Option<L>) -> Self {
        Self {
            location,
            task_destination,
        }
    }
}

/// A vehicle that plans once at setup and then reacts to each observation by
/// looking up its frozen policy.
#[derive(Debug, Clone)]
pub struct ReactiveAgent<L: Location> {
    policy: Policy<L>,
    report: SolveReport,
    actions_taken: usize,
}

impl<L: Location> ReactiveAgent<L> {
    /// Plans a policy for `graph` and `tasks`.
    ///
    /// # Errors
    /// Any configuration, topology or task-model error from building the state
    /// space or running value iteration. Nothing is served after a failed setup.
    pub fn setup<G, T>(graph: &G, tasks: &T, config: &SolverConfig) -> Result<Self>
    where
        G: LocationGraph<Location = L>,
        T: TaskModel<L>,
    {
        // Fail on a bad config before paying for enumeration
        config.validate()?;
        let space = StateSpace::build(graph, tasks, config)?;
        let (policy, report) = value_iteration(&space, config)?;
        info!(
            "planned {} states with discount {} in {} sweeps",
            policy.len(),
            config.discount,
            report.sweeps
        );
        Ok(Self {
            policy,
            report,
            actions_taken: 0,
        })
    }

    /// Returns the planned action for `observation`.
    ///
    /// # Errors
    /// * `StateLookup` if the observation has no planned state; only this
    ///   decision fails and the agent stays usable
    pub fn act(&mut self, observation: Observation<L>) -> Result<Action<L>> {
        let action = self
            .policy
            .decide(observation.location, observation.task_destination)?;
        self.actions_taken += 1;
        debug!(
            "action {}: at {:?} with task {:?} -> {:?}",
            self.actions_taken, observation.location, observation.task_destination, action
        );
        Ok(action)
    }

    pub fn policy(&self) -> &Policy<L> {
        &self.policy
    }

    pub fn report(&self) -> &SolveReport {
        &self.report
    }

    /// Number of decisions served successfully.
    pub fn actions_taken(&self) -> usize {
        self.actions_taken
    }
}
