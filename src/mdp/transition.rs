use std::collections::BTreeSet;

use log::warn;

use crate::error::{Error, Result};
use crate::mdp::{Action, State};
use crate::tasks::TaskModel;
use crate::topology::{Location, LocationGraph};

/// Slack allowed when task probabilities out of one origin sum past 1.
pub const DEGENERACY_TOLERANCE: f64 = 1e-9;

/// Task probabilities out of one origin after the degeneracy check.
#[derive(Debug, Clone, Copy)]
struct OriginMass {
    /// Factor applied to each task probability
    scale: f64,
    no_task: f64,
}

/// Probability of landing in each candidate next state after an action.
///
/// After arriving at the action's target, the vehicle finds either no task
/// or a task to one of the other locations. Task states take the oracle's
/// probability and the idle state takes the remaining mass. A degenerate
/// origin is rejected, or rescaled to total mass 1 when clamping is on.
pub struct TransitionModel<'a, L, T> {
    tasks: &'a T,
    locations: Vec<L>,
    clamp_degenerate: bool,
}

impl<'a, L, T> TransitionModel<'a, L, T>
where
    L: Location,
    T: TaskModel<L>,
{
    pub fn new<G>(graph: &G, tasks: &'a T) -> Self
    where
        G: LocationGraph<Location = L>,
    {
        let locations: BTreeSet<L> = graph.locations().into_iter().collect();
        Self {
            tasks,
            locations: locations.into_iter().collect(),
            clamp_degenerate: false,
        }
    }

    /// Rescale an origin whose task probabilities sum past 1 so they sum to
    /// exactly 1 (with a warning), instead of failing with `NumericDegeneracy`.
    pub fn clamp_degenerate(mut self, clamp: bool) -> Self {
        self.clamp_degenerate = clamp;
        self
    }

    /// Candidate next states for `action`: the idle state at its target, then
    /// one task state per other location.
    pub fn next_states(&self, _state: &State<L>, action: &Action<L>) -> Vec<State<L>> {
        self.arrival_states(action.target())
    }

    /// Probability of `next` after taking `action` from `state`.
    ///
    /// States that are not at the action's target are unreachable and get 0.
    pub fn probability(&self, _state: &State<L>, action: &Action<L>, next: &State<L>) -> Result<f64> {
        let destination = action.target();
        if next.location() != destination || !next.is_valid() {
            return Ok(0.0);
        }
        let mass = self.mass(destination)?;
        match next.task_destination() {
            Some(task) => Ok(self.task_probability(destination, task)? * mass.scale),
            None => Ok(mass.no_task),
        }
    }

    /// Chance that no task is waiting at `origin`.
    ///
    /// # Errors
    /// * `InvalidProbability` if any task probability out of `origin` is outside `[0, 1]`
    /// * `NumericDegeneracy` if they sum past 1 and clamping is off
    pub fn no_task_probability(&self, origin: L) -> Result<f64> {
        Ok(self.mass(origin)?.no_task)
    }

    /// Candidate states at `origin` paired with their arrival probabilities.
    pub fn arrival(&self, origin: L) -> Result<Vec<(State<L>, f64)>> {
        let mass = self.mass(origin)?;
        self.arrival_states(origin)
            .into_iter()
            .map(|next| {
                let p = match next.task_destination() {
                    Some(task) => self.task_probability(origin, task)? * mass.scale,
                    None => mass.no_task,
                };
                Ok((next, p))
            })
            .collect()
    }

    fn mass(&self, origin: L) -> Result<OriginMass> {
        let mut total = 0.0;
        for &destination in self.locations.iter().filter(|&&d| d != origin) {
            total += self.task_probability(origin, destination)?;
        }

        if total - 1.0 > DEGENERACY_TOLERANCE {
            if !self.clamp_degenerate {
                return Err(Error::NumericDegeneracy {
                    origin: format!("{:?}", origin),
                    total,
                });
            }
            warn!(
                "task probabilities from {:?} sum to {}; rescaling them to 1",
                origin, total
            );
            return Ok(OriginMass {
                scale: 1.0 / total,
                no_task: 0.0,
            });
        }
        Ok(OriginMass {
            scale: 1.0,
            no_task: (1.0 - total).max(0.0),
        })
    }

    fn arrival_states(&self, origin: L) -> Vec<State<L>> {
        std::iter::once(State::idle(origin))
            .chain(
                self.locations
                    .iter()
                    .filter(|&&d| d != origin)
                    .map(|&d| State::with_task(origin, d)),
            )
            .collect()
    }

    fn task_probability(&self, origin: L, destination: L) -> Result<f64> {
        let p = self.tasks.probability(origin, destination);
        if (0.0..=1.0).contains(&p) {
            Ok(p)
        } else {
            Err(Error::InvalidProbability {
                origin: format!("{:?}", origin),
                destination: format!("{:?}", destination),
                value: p,
            })
        }
    }
}
