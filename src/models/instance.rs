//! Problem instance model.
//!
//! An instance bundles the task graph with the line parameters and, once
//! balanced, the resulting stations and total unit cost.

use std::collections::HashSet;

use super::{Station, Task, TaskGraph};
use crate::error::Result;
use crate::validation::validate_instance;

/// A line balancing instance.
///
/// Lifecycle: built from raw tasks, balanced once in place, then read
/// or serialized.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Unique instance identifier.
    pub id: String,
    graph: TaskGraph,
    cycle_time: f64,
    station_cost: f64,
    stations: Vec<Station>,
    total_unit_cost: f64,
}

impl Instance {
    /// Validates the input and builds the instance with derived task metrics.
    ///
    /// # Arguments
    /// * `tasks` - Raw tasks (derived metrics ignored and recomputed).
    /// * `q` - Target production rate; the cycle time is `1/q`.
    /// * `c` - Station cost per unit time.
    ///
    /// # Errors
    /// [`BalanceError::Validation`](crate::BalanceError::Validation) listing
    /// every offending task.
    pub fn new(id: impl Into<String>, tasks: Vec<Task>, q: f64, c: f64) -> Result<Self> {
        validate_instance(&tasks, q, c)?;

        Ok(Self {
            id: id.into(),
            graph: TaskGraph::new(tasks, c),
            cycle_time: 1.0 / q,
            station_cost: c,
            stations: Vec::new(),
            total_unit_cost: 0.0,
        })
    }

    /// The task graph.
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Cycle time `T = 1/q`.
    pub fn cycle_time(&self) -> f64 {
        self.cycle_time
    }

    /// Production rate `q`, reconstructed as `1/T`.
    pub fn production_rate(&self) -> f64 {
        1.0 / self.cycle_time
    }

    /// Station cost per unit time `c`.
    pub fn station_cost(&self) -> f64 {
        self.station_cost
    }

    /// Stations in opening order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Finds a station by ID.
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Station holding a task.
    pub fn station_of(&self, task_id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.contains(task_id))
    }

    /// Total unit cost stored by the last balancing run.
    pub fn total_unit_cost(&self) -> f64 {
        self.total_unit_cost
    }

    /// Task IDs assigned to any station.
    pub fn assigned_tasks(&self) -> HashSet<&str> {
        self.graph.assigned_tasks(&self.stations)
    }

    /// Tasks ready for assignment, in input order.
    pub fn available_tasks(&self) -> Vec<&Task> {
        self.graph.available_tasks(&self.stations)
    }

    /// Station time cost per unit: `T × c × stations`.
    pub fn station_time_cost(&self) -> f64 {
        self.cycle_time * self.station_cost * self.stations.len() as f64
    }

    /// Sum of recorded expected off-line costs over all stations.
    pub fn expected_offline_cost(&self) -> f64 {
        self.stations.iter().map(Station::total_expected_cost).sum()
    }

    /// `expected_offline_cost + station_time_cost` for the current stations.
    pub fn compute_total_unit_cost(&self) -> f64 {
        self.expected_offline_cost() + self.station_time_cost()
    }

    /// Opens the next sequential station and returns its index.
    pub(crate) fn open_station(&mut self) -> usize {
        let id = (self.stations.len() + 1).to_string();
        self.stations.push(Station::new(id));
        self.stations.len() - 1
    }

    pub(crate) fn assign(&mut self, station: usize, task_id: &str, expected_cost: f64) {
        self.stations[station].assign(task_id, expected_cost);
    }

    pub(crate) fn set_total_unit_cost(&mut self, cost: f64) {
        self.total_unit_cost = cost;
    }
}
