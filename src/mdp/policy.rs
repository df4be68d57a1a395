use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::mdp::{Action, State};
use crate::topology::Location;

/// Best action out of a state and its expected discounted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyEntry<L> {
    pub action: Action<L>,
    pub value: f64,
}

/// Frozen state to action table produced by planning.
///
/// A policy has no mutators; once built it is only read.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy<L: Location> {
    entries: BTreeMap<State<L>, PolicyEntry<L>>,
}

impl<L: Location> Policy<L> {
    pub(crate) fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (State<L>, PolicyEntry<L>)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Maps a runtime observation to its state and returns the planned action.
    ///
    /// # Errors
    /// * `StateLookup` if the observation is not a planned state, such as a
    ///   task that would deliver to the current location. No fallback action
    ///   is ever substituted.
    ///
    /// # Examples
    /// ```
    /// use reactive_mdp::mdp::{value_iteration, Action, SolverConfig, StateSpace};
    /// use reactive_mdp::tasks::TaskTable;
    /// use reactive_mdp::topology::RoadMap;
    ///
    /// let map = RoadMap::new(vec![("A", "B", 1.0)]).unwrap();
    /// let tasks = TaskTable::new().with_task("A", "B", 1.0, 10.0);
    /// let config = SolverConfig::default().with_discount(0.9);
    /// let space = StateSpace::build(&map, &tasks, &config).unwrap();
    /// let (policy, _) = value_iteration(&space, &config).unwrap();
    ///
    /// assert_eq!(policy.decide("A", Some("B")).unwrap(), Action::Pickup("B"));
    /// assert!(policy.decide("A", Some("A")).is_err());
    /// ```
    pub fn decide(&self, location: L, task_destination: Option<L>) -> Result<Action<L>> {
        let state = State::new(location, task_destination);
        self.get(&state)
            .map(|entry| entry.action)
            .ok_or_else(|| Error::state_lookup(&state))
    }

    pub fn get(&self, state: &State<L>) -> Option<&PolicyEntry<L>> {
        self.entries.get(state)
    }

    /// Expected discounted value of following the policy from `state`.
    pub fn value(&self, state: &State<L>) -> Option<f64> {
        self.get(state).map(|entry| entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical state order.
    pub fn iter(&self) -> impl Iterator<Item = (&State<L>, &PolicyEntry<L>)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy<u8> {
        Policy::from_entries(vec![
            (
                State::idle(0),
                PolicyEntry {
                    action: Action::Move(1),
                    value: -1.0,
                },
            ),
            (
                State::with_task(0, 1),
                PolicyEntry {
                    action: Action::Pickup(1),
                    value: 4.0,
                },
            ),
        ])
    }

    #[test]
    fn test_decide_reads_entry() {
        let policy = policy();
        assert_eq!(policy.decide(0, None).unwrap(), Action::Move(1));
        assert_eq!(policy.decide(0, Some(1)).unwrap(), Action::Pickup(1));
        assert_eq!(policy.value(&State::with_task(0, 1)), Some(4.0));
    }

    #[test]
    fn test_missing_state_is_an_error() {
        let policy = policy();
        assert!(matches!(
            policy.decide(0, Some(0)),
            Err(Error::StateLookup { .. })
        ));
        assert!(matches!(
            policy.decide(3, None),
            Err(Error::StateLookup { .. })
        ));
    }

    #[test]
    fn test_iteration_is_ordered() {
        let policy = policy();
        let states: Vec<_> = policy.iter().map(|(s, _)| *s).collect();
        assert_eq!(states, vec![State::idle(0), State::with_task(0, 1)]);
        assert_eq!(policy.len(), 2);
        assert!(!policy.is_empty());
    }
}
