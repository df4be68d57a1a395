//! Value iteration over a reactive state space.
//!
//! Repeatedly applies the Bellman optimality backup
//!
//! ```text
//! Q(s, a) = R(s, a) + gamma * sum_{s'} P(s' | s, a) * V(s')
//! V(s)    = max_a Q(s, a)
//! ```
//!
//! until the largest change in a full sweep drops below epsilon, then freezes
//! the greedy actions and their values into a [`Policy`].

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::mdp::state_space::{ActionEdge, Transition};
use crate::mdp::{Policy, PolicyEntry, SolverConfig, StateSpace, UpdateRule};
use crate::topology::Location;

/// Convergence trace of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// Number of full sweeps performed
    pub sweeps: usize,
    /// Largest per-state change in each sweep, in order
    pub residuals: Vec<f64>,
}

impl SolveReport {
    pub fn final_residual(&self) -> f64 {
        self.residuals.last().copied().unwrap_or(0.0)
    }
}

/// Runs value iteration on `space` and returns the frozen policy.
///
/// Actions are tried in canonical order and a later action only replaces the
/// incumbent when its Q-value is strictly greater, so ties go to the lowest
/// action. States without legal actions keep value 0 and get no entry.
///
/// # Errors
/// * `Configuration` if `config` does not validate
/// * `NotConverged` if `config.max_sweeps` runs out first, or if a sweep
///   produces a non-finite value or residual
///
/// # Examples
/// ```
/// use reactive_mdp::mdp::{value_iteration, SolverConfig, State, StateSpace};
/// use reactive_mdp::tasks::TaskTable;
/// use reactive_mdp::topology::RoadMap;
///
/// let map = RoadMap::new(vec![(0, 1, 3.0), (1, 2, 4.0)]).unwrap();
/// let tasks = TaskTable::new()
///     .with_task(0, 2, 0.5, 30.0)
///     .with_task(2, 0, 0.5, 30.0);
/// let config = SolverConfig::default();
/// let space = StateSpace::build(&map, &tasks, &config).unwrap();
///
/// let (policy, report) = value_iteration(&space, &config).unwrap();
/// assert_eq!(policy.len(), space.len());
/// assert!(report.final_residual() < config.epsilon);
/// assert!(policy.value(&State::with_task(0, 2)).is_some());
/// ```
pub fn value_iteration<L: Location>(
    space: &StateSpace<L>,
    config: &SolverConfig,
) -> Result<(Policy<L>, SolveReport)> {
    config.validate()?;
    let gamma = config.discount;
    let n = space.len();
    let mut values = vec![0.0; n]; // start with zero values
    let mut best: Vec<Option<usize>> = vec![None; n];
    let mut residuals = Vec::new();

    loop {
        let delta = match config.update_rule {
            UpdateRule::Synchronous => synchronous_sweep(space, gamma, &mut values, &mut best),
            UpdateRule::Asynchronous => asynchronous_sweep(space, gamma, &mut values, &mut best),
        };
        residuals.push(delta);
        debug!("sweep {}: max residual {:.6}", residuals.len(), delta);

        if !delta.is_finite() {
            return Err(Error::NotConverged {
                sweeps: residuals.len(),
                residual: delta,
            });
        }
        if delta < config.epsilon {
            break;
        }
        if let Some(limit) = config.max_sweeps {
            if residuals.len() >= limit {
                return Err(Error::NotConverged {
                    sweeps: residuals.len(),
                    residual: delta,
                });
            }
        }
    }

    info!(
        "value iteration converged after {} sweeps over {} states (residual {:.6})",
        residuals.len(),
        n,
        residuals.last().copied().unwrap_or(0.0)
    );

    let policy = Policy::from_entries(best.iter().enumerate().filter_map(|(s, choice)| {
        choice.map(|a| {
            (
                space.state(s),
                PolicyEntry {
                    action: space.edges(s)[a].action,
                    value: values[s],
                },
            )
        })
    }));

    Ok((
        policy,
        SolveReport {
            sweeps: residuals.len(),
            residuals,
        },
    ))
}

/// Jacobi sweep: every backup reads the previous sweep's values.
fn synchronous_sweep<L: Location>(
    space: &StateSpace<L>,
    gamma: f64,
    values: &mut [f64],
    best: &mut [Option<usize>],
) -> f64 {
    let backups = {
        let previous: &[f64] = values;
        // Arrival values are fixed for the whole sweep, so each location's is
        // computed once and shared by every action that ends there
        let arrivals = arrival_values(space, previous);
        state_backups(space, gamma, &arrivals)
    };

    let mut delta = 0.0_f64;
    for (s, backed_up) in backups.into_iter().enumerate() {
        if let Some((a, v)) = backed_up {
            delta = widest(delta, (values[s] - v).abs());
            values[s] = v;
            best[s] = Some(a);
        }
    }
    delta
}

/// Gauss-Seidel sweep: each value is committed immediately, in state order.
fn asynchronous_sweep<L: Location>(
    space: &StateSpace<L>,
    gamma: f64,
    values: &mut [f64],
    best: &mut [Option<usize>],
) -> f64 {
    let mut delta = 0.0_f64;
    for s in 0..space.len() {
        let backed_up = {
            let current: &[f64] = values;
            backup(space.edges(s), gamma, |l| {
                expected_value(space.arrival(l), current)
            })
        };
        if let Some((a, v)) = backed_up {
            delta = widest(delta, (values[s] - v).abs());
            values[s] = v;
            best[s] = Some(a);
        }
    }
    delta
}

#[cfg(not(feature = "parallel"))]
fn arrival_values<L: Location>(space: &StateSpace<L>, values: &[f64]) -> Vec<f64> {
    (0..space.locations().len())
        .map(|l| expected_value(space.arrival(l), values))
        .collect()
}

#[cfg(feature = "parallel")]
fn arrival_values<L: Location>(space: &StateSpace<L>, values: &[f64]) -> Vec<f64> {
    (0..space.locations().len())
        .into_par_iter()
        .map(|l| expected_value(space.arrival(l), values))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn state_backups<L: Location>(
    space: &StateSpace<L>,
    gamma: f64,
    arrival_values: &[f64],
) -> Vec<Option<(usize, f64)>> {
    (0..space.len())
        .map(|s| backup(space.edges(s), gamma, |l| arrival_values[l]))
        .collect()
}

#[cfg(feature = "parallel")]
fn state_backups<L: Location>(
    space: &StateSpace<L>,
    gamma: f64,
    arrival_values: &[f64],
) -> Vec<Option<(usize, f64)>> {
    (0..space.len())
        .into_par_iter()
        .map(|s| backup(space.edges(s), gamma, |l| arrival_values[l]))
        .collect()
}

/// Larger of two residuals. Unlike `f64::max`, a NaN wins.
fn widest(delta: f64, diff: f64) -> f64 {
    if diff.is_nan() || diff > delta {
        diff
    } else {
        delta
    }
}

/// Best `(edge index, Q-value)` out of a state, or `None` if it has no actions.
///
/// `arrival_value(l)` is the expected value of arriving at location `l`.
fn backup<L, F>(edges: &[ActionEdge<L>], gamma: f64, arrival_value: F) -> Option<(usize, f64)>
where
    F: Fn(usize) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for (a, edge) in edges.iter().enumerate() {
        let q = edge.reward + gamma * arrival_value(edge.target);
        if best.map_or(true, |(_, incumbent)| q > incumbent) {
            best = Some((a, q));
        }
    }
    best
}

/// Compute sum_{s'} P(s') * V(s') over an arrival distribution.
fn expected_value(arrival: &[Transition], values: &[f64]) -> f64 {
    arrival.iter().map(|t| t.probability * values[t.next]).sum()
}
