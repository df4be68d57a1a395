use crate::error::{Error, Result};
use crate::mdp::{Action, State};
use crate::tasks::TaskModel;
use crate::topology::{Location, LocationGraph};

/// Immediate reward of taking an action from a state.
///
/// Moving costs the distance driven. Picking up pays the task's expected
/// reward per unit of distance to its destination.
pub struct RewardModel<'a, G, T> {
    graph: &'a G,
    tasks: &'a T,
}

impl<'a, G, T> RewardModel<'a, G, T>
where
    G: LocationGraph,
    T: TaskModel<G::Location>,
{
    pub fn new(graph: &'a G, tasks: &'a T) -> Self {
        Self { graph, tasks }
    }

    /// # Errors
    /// * `SelfLoop` if the action targets the state's own location
    /// * `IllegalAction` for a `Pickup` that is not the pending task
    /// * `InvalidDistance` if the driven distance is not finite and positive
    /// * `InvalidReward` if a pickup's expected reward is negative, or its
    ///   reward per distance is not finite
    pub fn reward(&self, state: &State<G::Location>, action: &Action<G::Location>) -> Result<f64> {
        let from = state.location();
        let to = action.target();
        if from == to {
            return Err(Error::SelfLoop {
                location: format!("{:?}", from),
            });
        }
        if action.is_pickup() && state.task_destination() != Some(to) {
            return Err(Error::IllegalAction {
                state: format!("{:?}", state),
                action: format!("{:?}", action),
            });
        }

        let distance = checked_distance(self.graph, from, to)?;
        match action {
            Action::Move(_) => Ok(-distance),
            Action::Pickup(_) => {
                let expected = self.tasks.expected_reward(from, to);
                let per_distance = expected / distance;
                if expected >= 0.0 && per_distance.is_finite() {
                    Ok(per_distance)
                } else {
                    Err(Error::InvalidReward {
                        origin: format!("{:?}", from),
                        destination: format!("{:?}", to),
                        value: expected,
                    })
                }
            }
        }
    }
}

pub(crate) fn checked_distance<G, L>(graph: &G, from: L, to: L) -> Result<f64>
where
    G: LocationGraph<Location = L>,
    L: Location,
{
    let distance = graph.distance(from, to);
    if distance.is_finite() && distance > 0.0 {
        Ok(distance)
    } else {
        Err(Error::InvalidDistance {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
            value: distance,
        })
    }
}
