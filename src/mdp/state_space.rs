use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::error::{Error, Result};
use crate::mdp::action::legal_actions;
use crate::mdp::reward::RewardModel;
use crate::mdp::transition::TransitionModel;
use crate::mdp::{Action, SolverConfig, State};
use crate::tasks::TaskModel;
use crate::topology::{Location, LocationGraph};

/// A legal action out of a state with its precomputed immediate reward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEdge<L> {
    pub action: Action<L>,
    /// Index of the action's target in [`StateSpace::locations`]
    pub target: usize,
    pub reward: f64,
}

/// One candidate next state and the probability of landing in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Index into [`StateSpace::states`]
    pub next: usize,
    pub probability: f64,
}

/// Every `(location, task)` state of a topology, with legal actions, rewards
/// and arrival distributions computed once up front.
///
/// States are stored in canonical sorted order and addressed by dense index.
/// Transitions depend only on where an action ends up, so arrival
/// distributions are stored per location rather than per state-action pair.
#[derive(Debug, Clone)]
pub struct StateSpace<L: Location> {
    locations: Vec<L>,
    states: Vec<State<L>>,
    index: HashMap<State<L>, usize>,
    edges: Vec<Vec<ActionEdge<L>>>,
    arrivals: Vec<Vec<Transition>>,
}

impl<L: Location> StateSpace<L> {
    /// Enumerates the state space of `graph` under `tasks`.
    ///
    /// # Errors
    /// * `SelfLoop` if a location is its own neighbor
    /// * `UnknownLocation` if a neighbor is not in the location set
    /// * `InvalidDistance` if a move or delivery distance is not finite and positive
    /// * `NumericDegeneracy` / `InvalidProbability` for an inconsistent task model
    /// * `InvalidReward` for a negative or non-finite expected task reward
    pub fn build<G, T>(graph: &G, tasks: &T, config: &SolverConfig) -> Result<Self>
    where
        G: LocationGraph<Location = L>,
        T: TaskModel<L>,
    {
        let locations: Vec<L> = graph
            .locations()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let location_index: HashMap<L, usize> = locations
            .iter()
            .enumerate()
            .map(|(i, &l)| (l, i))
            .collect();

        let mut neighbors = Vec::with_capacity(locations.len());
        for &location in &locations {
            let adjacent: Vec<L> = graph
                .neighbors(location)
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if let Some(unknown) = adjacent.iter().find(|l| !location_index.contains_key(*l)) {
                return Err(Error::UnknownLocation {
                    location: format!("{:?}", unknown),
                });
            }
            neighbors.push(adjacent);
        }

        let mut states = Vec::with_capacity(locations.len() * locations.len());
        for &location in &locations {
            states.push(State::idle(location));
            for &destination in locations.iter().filter(|&&d| d != location) {
                states.push(State::with_task(location, destination));
            }
        }
        let index: HashMap<State<L>, usize> = states
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, i))
            .collect();

        let rewards = RewardModel::new(graph, tasks);
        let mut edges = Vec::with_capacity(states.len());
        for state in &states {
            let adjacent = &neighbors[location_index[&state.location()]];
            let mut out = Vec::new();
            for action in legal_actions(state, adjacent)? {
                out.push(ActionEdge {
                    action,
                    target: location_index[&action.target()],
                    reward: rewards.reward(state, &action)?,
                });
            }
            edges.push(out);
        }

        let transitions =
            TransitionModel::new(graph, tasks).clamp_degenerate(config.clamp_degenerate);
        let mut arrivals = Vec::with_capacity(locations.len());
        for &location in &locations {
            let arrival = transitions
                .arrival(location)?
                .into_iter()
                .map(|(next, probability)| Transition {
                    next: index[&next],
                    probability,
                })
                .collect();
            arrivals.push(arrival);
        }

        debug!(
            "enumerated {} states over {} locations",
            states.len(),
            locations.len()
        );

        Ok(Self {
            locations,
            states,
            index,
            edges,
            arrivals,
        })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Locations in canonical order.
    pub fn locations(&self) -> &[L] {
        &self.locations
    }

    /// States in canonical order.
    pub fn states(&self) -> &[State<L>] {
        &self.states
    }

    pub fn state(&self, index: usize) -> State<L> {
        self.states[index]
    }

    pub fn index_of(&self, state: &State<L>) -> Option<usize> {
        self.index.get(state).copied()
    }

    /// Legal actions (with rewards) out of the state at `index`.
    pub fn edges(&self, index: usize) -> &[ActionEdge<L>] {
        &self.edges[index]
    }

    /// Legal actions of `state`, or `None` if it was never enumerated.
    pub fn actions(&self, state: &State<L>) -> Option<Vec<Action<L>>> {
        self.index_of(state)
            .map(|i| self.edges[i].iter().map(|e| e.action).collect())
    }

    /// Arrival distribution at the location with index `location`.
    pub fn arrival(&self, location: usize) -> &[Transition] {
        &self.arrivals[location]
    }

    /// Candidate next states of `(state, action)` with their probabilities,
    /// or `None` if the pair is not legal.
    pub fn next_states(&self, state: &State<L>, action: &Action<L>) -> Option<&[Transition]> {
        let i = self.index_of(state)?;
        let edge = self.edges[i].iter().find(|e| e.action == *action)?;
        Some(self.arrival(edge.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskTable;
    use crate::topology::RoadMap;
    use approx::assert_abs_diff_eq;

    /// Graph whose neighbor lists can be anything, to exercise validation.
    struct RawGraph {
        locations: Vec<u8>,
        neighbors: HashMap<u8, Vec<u8>>,
    }

    impl LocationGraph for RawGraph {
        type Location = u8;

        fn locations(&self) -> Vec<u8> {
            self.locations.clone()
        }

        fn neighbors(&self, location: u8) -> Vec<u8> {
            self.neighbors.get(&location).cloned().unwrap_or_default()
        }

        fn distance(&self, _from: u8, _to: u8) -> f64 {
            1.0
        }
    }

    fn line() -> RoadMap<u8> {
        RoadMap::new(vec![(0, 1, 1.0), (1, 2, 2.0), (2, 3, 1.5)]).unwrap()
    }

    #[test]
    fn test_state_count() {
        let map = line();
        let space = StateSpace::build(&map, &TaskTable::new(), &SolverConfig::default()).unwrap();
        // 4 locations, each with 1 idle state and 3 task states
        assert_eq!(space.len(), 16);
        assert_eq!(space.locations(), &[0, 1, 2, 3]);
        let mut sorted = space.states().to_vec();
        sorted.sort();
        assert_eq!(sorted, space.states());
    }

    #[test]
    fn test_indices_round_trip() {
        let map = line();
        let space = StateSpace::build(&map, &TaskTable::new(), &SolverConfig::default()).unwrap();
        for (i, state) in space.states().iter().enumerate() {
            assert_eq!(space.index_of(state), Some(i));
            assert_eq!(space.state(i), *state);
        }
        assert_eq!(space.index_of(&State::with_task(2, 2)), None);
        assert_eq!(space.index_of(&State::idle(9)), None);
    }

    #[test]
    fn test_edges_carry_rewards() {
        let map = line();
        let tasks = TaskTable::new().with_task(1, 3, 0.5, 9.0);
        let space = StateSpace::build(&map, &tasks, &SolverConfig::default()).unwrap();
        let i = space.index_of(&State::with_task(1, 3)).unwrap();
        let edges = space.edges(i);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].action, Action::Move(0));
        assert_abs_diff_eq!(edges[0].reward, -1.0);
        assert_eq!(edges[1].action, Action::Move(2));
        assert_abs_diff_eq!(edges[1].reward, -2.0);
        assert_eq!(edges[2].action, Action::Pickup(3));
        // 1 -> 3 is 3.5 long
        assert_abs_diff_eq!(edges[2].reward, 9.0 / 3.5, epsilon = 1e-12);
        assert_eq!(space.locations()[edges[2].target], 3);
    }

    #[test]
    fn test_next_states_only_for_legal_actions() {
        let map = line();
        let space = StateSpace::build(&map, &TaskTable::new(), &SolverConfig::default()).unwrap();
        assert!(space
            .next_states(&State::idle(0), &Action::Move(1))
            .is_some());
        assert!(space
            .next_states(&State::idle(0), &Action::Move(2))
            .is_none());
        assert!(space
            .next_states(&State::idle(0), &Action::Pickup(1))
            .is_none());
    }

    #[test]
    fn test_self_neighbor_rejected() {
        let graph = RawGraph {
            locations: vec![0, 1],
            neighbors: HashMap::from([(0, vec![0, 1]), (1, vec![0])]),
        };
        assert!(matches!(
            StateSpace::build(&graph, &TaskTable::new(), &SolverConfig::default()),
            Err(Error::SelfLoop { .. })
        ));
    }

    #[test]
    fn test_unknown_neighbor_rejected() {
        let graph = RawGraph {
            locations: vec![0, 1],
            neighbors: HashMap::from([(0, vec![1, 5]), (1, vec![0])]),
        };
        assert!(matches!(
            StateSpace::build(&graph, &TaskTable::new(), &SolverConfig::default()),
            Err(Error::UnknownLocation { .. })
        ));
    }

    #[test]
    fn test_unreachable_task_destination_rejected() {
        let map = RoadMap::with_locations(vec![7], vec![(0, 1, 1.0)]).unwrap();
        assert!(matches!(
            StateSpace::build(&map, &TaskTable::new(), &SolverConfig::default()),
            Err(Error::InvalidDistance { .. })
        ));
    }

    #[test]
    fn test_degenerate_model_needs_clamping() {
        let map = line();
        let tasks = TaskTable::new()
            .with_task(0, 1, 0.8, 1.0)
            .with_task(0, 2, 0.8, 1.0);
        assert!(matches!(
            StateSpace::build(&map, &tasks, &SolverConfig::default()),
            Err(Error::NumericDegeneracy { .. })
        ));

        let config = SolverConfig::default().with_clamp_degenerate(true);
        let space = StateSpace::build(&map, &tasks, &config).unwrap();
        let idle = space.arrival(0)[0];
        assert_eq!(space.state(idle.next), State::idle(0));
        assert_eq!(idle.probability, 0.0);
    }
}
