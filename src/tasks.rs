//! Task arrival model.

pub mod task_table;

pub use task_table::TaskTable;

/// Closed-form oracle for task arrivals and payoffs.
///
/// For a fixed origin the probabilities over all destinations should sum to
/// at most one; the remainder is the chance that no task is waiting.
pub trait TaskModel<L> {
    /// Probability that a task from `origin` to `destination` is waiting at `origin`.
    fn probability(&self, origin: L, destination: L) -> f64;

    /// Expected payoff of delivering a task from `origin` to `destination`.
    fn expected_reward(&self, origin: L, destination: L) -> f64;
}
