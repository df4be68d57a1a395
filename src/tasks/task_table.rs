use std::collections::HashMap;

use crate::tasks::TaskModel;
use crate::topology::Location;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TaskEntry {
    probability: f64,
    reward: f64,
}

/// Task distribution backed by an explicit `(origin, destination)` table.
///
/// Pairs that were never inserted have zero probability and zero reward.
#[derive(Debug, Clone)]
pub struct TaskTable<L: Location> {
    entries: HashMap<(L, L), TaskEntry>,
}

impl<L: Location> TaskTable<L> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Sets the arrival probability and expected reward for a route, replacing
    /// any previous entry.
    pub fn insert(&mut self, origin: L, destination: L, probability: f64, reward: f64) {
        self.entries.insert(
            (origin, destination),
            TaskEntry {
                probability,
                reward,
            },
        );
    }

    /// Builder form of [`TaskTable::insert`].
    ///
    /// # Examples
    /// ```
    /// use reactive_mdp::tasks::{TaskModel, TaskTable};
    ///
    /// let tasks = TaskTable::new().with_task("A", "B", 0.4, 12.0);
    /// assert_eq!(tasks.probability("A", "B"), 0.4);
    /// assert_eq!(tasks.probability("B", "A"), 0.0);
    /// ```
    pub fn with_task(mut self, origin: L, destination: L, probability: f64, reward: f64) -> Self {
        self.insert(origin, destination, probability, reward);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Location> Default for TaskTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Location> TaskModel<L> for TaskTable<L> {
    fn probability(&self, origin: L, destination: L) -> f64 {
        self.entries
            .get(&(origin, destination))
            .map_or(0.0, |e| e.probability)
    }

    fn expected_reward(&self, origin: L, destination: L) -> f64 {
        self.entries
            .get(&(origin, destination))
            .map_or(0.0, |e| e.reward)
    }
}
