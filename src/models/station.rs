//! Station model.
//!
//! A station is an ordered group of tasks performed together within one
//! cycle time. Each assignment records the task's *expected* off-line
//! cost at the moment it was assigned.

/// A station and the tasks assigned to it, in assignment order.
///
/// Stations are append-only: tasks are never removed or moved.
/// Mutation goes through the balancer.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Sequential, 1-based station identifier.
    pub id: String,
    assignments: Vec<StationAssignment>,
}

/// A task placed on a station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationAssignment {
    /// Assigned task ID.
    pub task_id: String,
    /// Expected off-line cost computed at assignment time.
    pub expected_cost: f64,
}

impl Station {
    /// Creates an empty station.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            assignments: Vec::new(),
        }
    }

    /// Assignments in insertion order.
    pub fn assignments(&self) -> &[StationAssignment] {
        &self.assignments
    }

    /// Assigned task IDs in insertion order.
    pub fn assigned_task_ids(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.task_id.as_str()).collect()
    }

    /// Sum of the recorded expected off-line costs.
    pub fn total_expected_cost(&self) -> f64 {
        self.assignments.iter().map(|a| a.expected_cost).sum()
    }

    /// Recorded expected cost for a task, if assigned here.
    pub fn expected_cost_of(&self, task_id: &str) -> Option<f64> {
        self.assignments
            .iter()
            .find(|a| a.task_id == task_id)
            .map(|a| a.expected_cost)
    }

    /// Whether the task is assigned to this station.
    pub fn contains(&self, task_id: &str) -> bool {
        self.assignments.iter().any(|a| a.task_id == task_id)
    }

    /// Number of assigned tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no task is assigned yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub(crate) fn assign(&mut self, task_id: impl Into<String>, expected_cost: f64) {
        self.assignments.push(StationAssignment {
            task_id: task_id.into(),
            expected_cost,
        });
    }
}
