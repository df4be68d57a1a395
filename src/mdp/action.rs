use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::mdp::State;
use crate::topology::Location;

/// A decision the vehicle can take.
///
/// The derived order places every `Move` before `Pickup`, and compares
/// destinations within a variant. The solver breaks ties by this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action<L> {
    /// Drive empty to a neighboring location.
    Move(L),
    /// Take the waiting task and deliver it.
    Pickup(L),
}

impl<L: Location> Action<L> {
    /// Location the vehicle ends up at after the action.
    pub fn target(&self) -> L {
        match *self {
            Action::Move(to) | Action::Pickup(to) => to,
        }
    }

    pub fn is_pickup(&self) -> bool {
        matches!(self, Action::Pickup(_))
    }
}

/// Generates the legal actions of `state`, in canonical order.
///
/// One `Move` per distinct neighbor, then a single `Pickup` if a task is
/// pending. This is the only place actions are created; the state space
/// memoizes its output for the solver and the policy.
///
/// # Errors
/// * `SelfLoop` if `neighbors` contains the state's own location, or the
///   pending task would deliver to it
pub fn legal_actions<L: Location>(state: &State<L>, neighbors: &[L]) -> Result<Vec<Action<L>>> {
    let here = state.location();
    if !state.is_valid() || neighbors.contains(&here) {
        return Err(Error::SelfLoop {
            location: format!("{:?}", here),
        });
    }

    let distinct: BTreeSet<L> = neighbors.iter().copied().collect();
    let mut actions: Vec<Action<L>> = distinct.into_iter().map(Action::Move).collect();
    if let Some(destination) = state.task_destination() {
        actions.push(Action::Pickup(destination));
    }
    Ok(actions)
}
