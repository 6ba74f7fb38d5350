//! Task model.
//!
//! A task is one unit of assembly work with a stochastic execution time,
//! a cost for finishing it outside the line, and precedence constraints
//! on other tasks.
//!
//! # Time Representation
//! Execution times are unitless; they only need to share a unit with the
//! cycle time `T = 1/q` of the instance (e.g. minutes).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A task to be assigned to a station.
///
/// Field names on the wire follow the persisted instance format
/// (`task_id`, `m`, `s`, `out_line_cost`, `predecessor_set`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    #[serde(rename = "task_id")]
    pub id: String,
    /// Mean execution time (`m`, > 0).
    #[serde(rename = "m")]
    pub mean: f64,
    /// Variance of the execution time (`s`, >= 0).
    #[serde(rename = "s")]
    pub variance: f64,
    /// Cost of completing this task outside the line.
    pub out_line_cost: f64,
    /// IDs of the tasks that directly precede this one.
    #[serde(rename = "predecessor_set", default)]
    pub predecessors: BTreeSet<String>,
    /// Derived metrics, filled in by the task graph. Never persisted.
    #[serde(skip)]
    pub metrics: Option<TaskMetrics>,
}

/// Per-task metrics derived from the precedence graph and the station cost.
///
/// Computed once when the graph is built and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskMetrics {
    /// Sum of `out_line_cost` over this task and all transitive successors.
    pub out_completion_cost: f64,
    /// Cost of performing the task in-line: `m × c`.
    pub in_line_cost: f64,
    /// Normalized margin at which in-line cost equals expected off-line cost.
    pub z_limit: f64,
    /// Number of direct successors.
    pub successor_count: usize,
}

impl Task {
    /// Creates a task with no predecessors.
    pub fn new(id: impl Into<String>, mean: f64, variance: f64, out_line_cost: f64) -> Self {
        Self {
            id: id.into(),
            mean,
            variance,
            out_line_cost,
            predecessors: BTreeSet::new(),
            metrics: None,
        }
    }

    /// Adds a direct predecessor.
    pub fn with_predecessor(mut self, id: impl Into<String>) -> Self {
        self.predecessors.insert(id.into());
        self
    }

    /// Adds several direct predecessors.
    pub fn with_predecessors<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predecessors.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Whether the task has no predecessors.
    pub fn is_source(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Standard deviation of the execution time.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}
