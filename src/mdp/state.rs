use crate::topology::Location;

/// What the vehicle observes before deciding: where it is and, if a task is
/// waiting there, where that task goes.
///
/// Identity is exactly the `(location, task_destination)` pair. The derived
/// order sorts by location, then puts the idle state before task states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State<L> {
    location: L,
    task_destination: Option<L>,
}

impl<L: Location> State<L> {
    /// Builds a state key without checking it.
    ///
    /// A key whose task destination equals its location is representable but
    /// never enumerated, so looking it up in a policy fails.
    pub fn new(location: L, task_destination: Option<L>) -> Self {
        Self {
            location,
            task_destination,
        }
    }

    /// State with no pending task.
    pub fn idle(location: L) -> Self {
        Self::new(location, None)
    }

    /// State with a task waiting to go to `destination`.
    pub fn with_task(location: L, destination: L) -> Self {
        Self::new(location, Some(destination))
    }

    pub fn location(&self) -> L {
        self.location
    }

    pub fn task_destination(&self) -> Option<L> {
        self.task_destination
    }

    pub fn has_task(&self) -> bool {
        self.task_destination.is_some()
    }

    /// False when the pending task would deliver to the current location.
    pub fn is_valid(&self) -> bool {
        self.task_destination != Some(self.location)
    }
}
