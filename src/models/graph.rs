//! Task precedence graph.
//!
//! Owns the task set and answers the precedence and availability queries
//! the balancer needs. A reverse (successor) index is built once at
//! construction; tasks are immutable afterwards, so it never goes stale.
//!
//! # Derived Metrics
//!
//! For each task `i` with mean time `m_i` and station cost `c`:
//!
//! - `out_completion_cost_i = Σ out_line_cost_j` over `j ∈ reachable(i)`
//! - `in_line_cost_i = m_i × c`
//! - `z_limit_i = Φ⁻¹(1 − in_line_cost_i / out_completion_cost_i)`
//!
//! `z_limit` is the normalized margin at which the in-line cost of the
//! task equals its expected off-line cost. When the ratio leaves `(0, 1)`
//! the quantile saturates to `±∞`; a task with zero off-line completion
//! cost gets `−∞`; the classifier treats such a task as safe.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::{Station, Task, TaskMetrics};
use crate::error::{BalanceError, Result};
use crate::special::inverse_normal_cdf;

/// Precedence graph over a task set.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
}

impl TaskGraph {
    /// Builds the graph and populates derived metrics for `station_cost`.
    ///
    /// The task set is expected to be validated: predecessor IDs that name
    /// no task are kept on the task but contribute no edge.
    pub fn new(tasks: Vec<Task>, station_cost: f64) -> Self {
        let index: HashMap<String, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();

        let mut successors = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            for pred in &task.predecessors {
                if let Some(&p) = index.get(pred) {
                    successors[p].push(i);
                }
            }
        }

        let mut graph = Self {
            tasks,
            index,
            successors,
        };
        graph.populate_derived_fields(station_cost);
        graph
    }

    /// Tasks in input order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by ID.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Input position of a task.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the graph has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Derived metrics of a task.
    pub fn metrics_of(&self, id: &str) -> Result<&TaskMetrics> {
        self.task(id)
            .ok_or_else(|| BalanceError::UnknownTask(id.to_string()))?
            .metrics
            .as_ref()
            .ok_or_else(|| BalanceError::MetricsNotPopulated(id.to_string()))
    }

    /// Tasks whose predecessor set contains `id`, in input order.
    pub fn successors_of(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(&i) => self.successors[i]
                .iter()
                .map(|&j| self.tasks[j].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// All tasks reachable from `id` over successor edges, `id` included.
    ///
    /// Iterative depth-first traversal with a visited set, so it neither
    /// recurses nor loops on a cyclic graph. Unknown IDs yield an empty set.
    pub fn reachable_from(&self, id: &str) -> HashSet<&str> {
        match self.index.get(id) {
            Some(&start) => self
                .reachable_indices(start)
                .into_iter()
                .map(|i| self.tasks[i].id.as_str())
                .collect(),
            None => HashSet::new(),
        }
    }

    /// Sum of `out_line_cost` over `reachable_from(id)`.
    pub fn out_completion_cost_of(&self, id: &str) -> Result<f64> {
        let start = self.require(id)?;
        Ok(self.out_completion_cost_at(start))
    }

    /// In-line cost `m × station_cost`.
    pub fn in_line_cost_of(&self, id: &str, station_cost: f64) -> Result<f64> {
        let i = self.require(id)?;
        Ok(self.tasks[i].mean * station_cost)
    }

    /// Quantile `z` with `Φ(z) = 1 − in_line_cost / out_completion_cost`.
    pub fn z_limit_of(&self, id: &str, station_cost: f64) -> Result<f64> {
        let i = self.require(id)?;
        Ok(z_limit(
            self.tasks[i].mean * station_cost,
            self.out_completion_cost_at(i),
        ))
    }

    /// Computes and stores the derived metrics of every task.
    ///
    /// Deterministic in the task set and `station_cost`, so repeated calls
    /// leave the metrics unchanged.
    pub fn populate_derived_fields(&mut self, station_cost: f64) {
        let metrics: Vec<TaskMetrics> = (0..self.tasks.len())
            .map(|i| {
                let out_completion_cost = self.out_completion_cost_at(i);
                let in_line_cost = self.tasks[i].mean * station_cost;
                if out_completion_cost <= 0.0 {
                    warn!(
                        task_id = %self.tasks[i].id,
                        "zero off-line completion cost, z_limit set to -inf"
                    );
                }
                TaskMetrics {
                    out_completion_cost,
                    in_line_cost,
                    z_limit: z_limit(in_line_cost, out_completion_cost),
                    successor_count: self.successors[i].len(),
                }
            })
            .collect();

        for (task, m) in self.tasks.iter_mut().zip(metrics) {
            task.metrics = Some(m);
        }
    }

    /// Union of the task IDs assigned across `stations`.
    pub fn assigned_tasks<'s>(&self, stations: &'s [Station]) -> HashSet<&'s str> {
        stations
            .iter()
            .flat_map(|s| s.assignments().iter().map(|a| a.task_id.as_str()))
            .collect()
    }

    /// Unassigned tasks whose predecessors are all assigned, in input order.
    pub fn available_tasks(&self, stations: &[Station]) -> Vec<&Task> {
        let assigned = self.assigned_tasks(stations);
        self.tasks
            .iter()
            .filter(|t| !assigned.contains(t.id.as_str()))
            .filter(|t| t.predecessors.iter().all(|p| assigned.contains(p.as_str())))
            .collect()
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| BalanceError::UnknownTask(id.to_string()))
    }

    fn reachable_indices(&self, start: usize) -> Vec<usize> {
        let mut visited = vec![false; self.tasks.len()];
        let mut order = Vec::new();
        let mut stack = vec![start];

        while let Some(i) = stack.pop() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            order.push(i);
            stack.extend(self.successors[i].iter().filter(|&&j| !visited[j]));
        }

        order
    }

    fn out_completion_cost_at(&self, start: usize) -> f64 {
        self.reachable_indices(start)
            .into_iter()
            .map(|i| self.tasks[i].out_line_cost)
            .sum()
    }
}

/// `Φ⁻¹(1 − in_line / out_completion)`, saturating to `±∞` outside `(0, 1)`.
fn z_limit(in_line_cost: f64, out_completion_cost: f64) -> f64 {
    if out_completion_cost <= 0.0 {
        return f64::NEG_INFINITY;
    }
    inverse_normal_cdf(1.0 - in_line_cost / out_completion_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A → B → D, A → C → D, E isolated.
    fn diamond() -> TaskGraph {
        TaskGraph::new(
            vec![
                Task::new("A", 1.0, 0.1, 1.0),
                Task::new("B", 2.0, 0.1, 2.0).with_predecessor("A"),
                Task::new("C", 1.0, 0.1, 4.0).with_predecessor("A"),
                Task::new("D", 1.0, 0.1, 8.0).with_predecessors(["B", "C"]),
                Task::new("E", 1.0, 0.1, 16.0),
            ],
            1.0,
        )
    }

    fn sorted<'a>(set: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let mut v: Vec<&str> = set.into_iter().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_successors_of() {
        let g = diamond();
        assert_eq!(g.successors_of("A"), vec!["B", "C"]);
        assert_eq!(g.successors_of("D"), Vec::<&str>::new());
        assert!(g.successors_of("missing").is_empty());
    }

    #[test]
    fn test_reachable_from_includes_start() {
        let g = diamond();
        assert_eq!(sorted(g.reachable_from("A")), vec!["A", "B", "C", "D"]);
        assert_eq!(sorted(g.reachable_from("C")), vec!["C", "D"]);
        assert_eq!(sorted(g.reachable_from("E")), vec!["E"]);
        assert!(g.reachable_from("missing").is_empty());
    }

    #[test]
    fn test_reachable_from_terminates_on_cycle() {
        let g = TaskGraph::new(
            vec![
                Task::new("X", 1.0, 0.1, 1.0).with_predecessor("Y"),
                Task::new("Y", 1.0, 0.1, 1.0).with_predecessor("X"),
            ],
            1.0,
        );
        assert_eq!(sorted(g.reachable_from("X")), vec!["X", "Y"]);
    }

    #[test]
    fn test_out_completion_cost_counts_shared_successor_once() {
        let g = diamond();
        // A + B + C + D = 1 + 2 + 4 + 8
        assert_eq!(g.out_completion_cost_of("A").unwrap(), 15.0);
        assert_eq!(g.out_completion_cost_of("B").unwrap(), 10.0);
        assert_eq!(g.out_completion_cost_of("E").unwrap(), 16.0);
        assert!(matches!(
            g.out_completion_cost_of("missing"),
            Err(BalanceError::UnknownTask(_))
        ));
    }

    #[test]
    fn test_in_line_cost_and_z_limit() {
        let g = diamond();
        assert_eq!(g.in_line_cost_of("B", 3.0).unwrap(), 6.0);

        // Φ(z) = 1 − 1/15
        let z = g.z_limit_of("A", 1.0).unwrap();
        assert!((z - inverse_normal_cdf(14.0 / 15.0)).abs() < 1e-12);
        assert!((z - 1.501_085_946).abs() < 1e-6);
    }

    #[test]
    fn test_z_limit_saturation() {
        // in-line cost above off-line completion cost
        assert_eq!(z_limit(10.0, 5.0), f64::NEG_INFINITY);
        // zero off-line completion cost
        assert_eq!(z_limit(1.0, 0.0), f64::NEG_INFINITY);
        assert_eq!(z_limit(0.0, 0.0), f64::NEG_INFINITY);
        // free in-line work
        assert_eq!(z_limit(0.0, 5.0), f64::INFINITY);
    }

    #[test]
    fn test_populated_metrics() {
        let g = diamond();
        let m = g.metrics_of("A").unwrap();
        assert_eq!(m.out_completion_cost, 15.0);
        assert_eq!(m.in_line_cost, 1.0);
        assert_eq!(m.successor_count, 2);
        assert_eq!(g.metrics_of("D").unwrap().successor_count, 0);
    }

    #[test]
    fn test_populate_derived_fields_is_idempotent() {
        let mut g = diamond();
        let before: Vec<_> = g.tasks().iter().map(|t| t.metrics).collect();
        g.populate_derived_fields(1.0);
        let after: Vec<_> = g.tasks().iter().map(|t| t.metrics).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_available_tasks_follow_assignments() {
        let g = diamond();
        assert_eq!(
            g.available_tasks(&[]).iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["A", "E"]
        );

        let mut s1 = Station::new("1");
        s1.assign("A", 0.0);
        s1.assign("B", 0.0);
        let stations = vec![s1];

        assert_eq!(sorted(g.assigned_tasks(&stations)), vec!["A", "B"]);
        let available: Vec<&str> = g
            .available_tasks(&stations)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        // D still waits on C
        assert_eq!(available, vec!["C", "E"]);
    }
}
