//! Greedy probabilistic station assignment.
//!
//! # Algorithm
//!
//! 1. While any task is available, open the next station (`"1"`, `"2"`, ...).
//! 2. Classify every available task against the open station.
//! 3. Select, in order of precedence:
//!    - the critical task with the most successors, only if the station is empty;
//!    - the safe task with the highest expected off-line cost;
//!    - the desirable task with the lowest expected off-line cost.
//! 4. Assign it and repeat step 2. If nothing qualifies, close the station.
//! 5. Total unit cost = Σ recorded expected costs + `T × c × stations`.
//!
//! Ties on the selection metric are broken by [`TieBreaker`], so a run is
//! fully deterministic.
//!
//! # Complexity
//! O(n² · k) where n = tasks and k = largest station size.
//!
//! # Reference
//! Scholl (1999), "Balancing and Sequencing of Assembly Lines", Ch. 5
//! (priority-rule station-oriented heuristics)

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{BalanceError, Result};
use crate::models::{Instance, TaskGraph};
use crate::risk::{RiskAssessment, RiskClassifier, RiskStatus};

/// How ties on the selection metric are broken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Lexicographic by task ID.
    #[default]
    ById,
    /// Position in the input task list.
    InputOrder,
}

/// Balancer configuration.
#[derive(Debug, Clone, Default)]
pub struct BalancerConfig {
    /// Final tie-breaking strategy.
    pub tie_breaker: TieBreaker,
}

impl BalancerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tie-breaking strategy.
    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }
}

/// One assignment decision of a balancing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Station the task went to.
    pub station_id: String,
    /// Selected task.
    pub task_id: String,
    /// Risk tier at selection time.
    pub status: RiskStatus,
    /// Station margin with the task included.
    pub z: f64,
    /// Expected off-line cost recorded on the station.
    pub expected_out_of_line_cost: f64,
}

/// Result of a balancing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceOutcome {
    /// Assignment decisions in execution order.
    pub selections: Vec<Selection>,
    /// Number of stations opened.
    pub station_count: usize,
    /// Total unit cost written to the instance.
    pub total_unit_cost: f64,
}

#[derive(Debug, Clone, Copy)]
enum Preference {
    Highest,
    Lowest,
}

/// Greedy station-oriented balancer driven by risk classification.
///
/// # Example
///
/// ```
/// use u_linebalance::balancer::GreedyBalancer;
/// use u_linebalance::models::{Instance, Task};
///
/// let tasks = vec![
///     Task::new("A", 1.0, 0.0, 5.0),
///     Task::new("B", 1.0, 0.0, 5.0).with_predecessor("A"),
/// ];
/// let mut instance = Instance::new("demo", tasks, 1.0, 1.0).unwrap();
///
/// let outcome = GreedyBalancer::new().balance(&mut instance).unwrap();
/// assert_eq!(outcome.station_count, 2);
/// assert_eq!(instance.total_unit_cost(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyBalancer {
    config: BalancerConfig,
    epsilon: f64,
}

impl GreedyBalancer {
    /// Creates a balancer with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BalancerConfig::default())
    }

    /// Creates a balancer with an explicit configuration.
    pub fn with_config(config: BalancerConfig) -> Self {
        Self {
            config,
            epsilon: 1e-9,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Assigns every task of `instance` to stations and stores the total unit cost.
    ///
    /// # Errors
    /// - `AlreadyBalanced` if the instance already has stations.
    /// - `Stalled` if tasks remain unassigned when no task is available.
    pub fn balance(&self, instance: &mut Instance) -> Result<BalanceOutcome> {
        if !instance.stations().is_empty() {
            return Err(BalanceError::AlreadyBalanced(instance.id.clone()));
        }

        let classifier = RiskClassifier::new(instance.cycle_time());
        let mut selections = Vec::new();

        'stations: while !instance.available_tasks().is_empty() {
            let station = instance.open_station();
            let station_id = instance.stations()[station].id.clone();
            debug!(%station_id, "station opened");

            loop {
                let candidates = self.assess_available(instance, &classifier, station)?;
                if candidates.is_empty() {
                    break 'stations;
                }

                let station_empty = instance.stations()[station].is_empty();
                let Some(chosen) = self.choose(instance.graph(), &candidates, station_empty)
                else {
                    debug!(
                        %station_id,
                        tasks = instance.stations()[station].len(),
                        "station closed"
                    );
                    break;
                };

                debug!(
                    %station_id,
                    task_id = %chosen.task_id,
                    status = %chosen.status,
                    z = chosen.z,
                    expected_cost = chosen.expected_out_of_line_cost,
                    "task assigned"
                );
                instance.assign(station, &chosen.task_id, chosen.expected_out_of_line_cost);
                selections.push(Selection {
                    station_id: station_id.clone(),
                    task_id: chosen.task_id.clone(),
                    status: chosen.status,
                    z: chosen.z,
                    expected_out_of_line_cost: chosen.expected_out_of_line_cost,
                });
            }
        }

        let unassigned = {
            let assigned = instance.assigned_tasks();
            instance
                .graph()
                .tasks()
                .iter()
                .filter(|t| !assigned.contains(t.id.as_str()))
                .map(|t| t.id.clone())
                .collect::<Vec<_>>()
        };
        if !unassigned.is_empty() {
            return Err(BalanceError::Stalled { unassigned });
        }

        let total_unit_cost = instance.compute_total_unit_cost();
        instance.set_total_unit_cost(total_unit_cost);

        let station_count = instance.stations().len();
        info!(
            instance_id = %instance.id,
            tasks = instance.graph().len(),
            stations = station_count,
            total_unit_cost,
            "line balanced"
        );

        Ok(BalanceOutcome {
            selections,
            station_count,
            total_unit_cost,
        })
    }

    fn assess_available(
        &self,
        instance: &Instance,
        classifier: &RiskClassifier,
        station: usize,
    ) -> Result<Vec<RiskAssessment>> {
        let current = &instance.stations()[station];
        instance
            .available_tasks()
            .into_iter()
            .map(|task| classifier.classify(instance.graph(), &task.id, current))
            .collect()
    }

    /// Picks the next task for the station, or `None` to close it.
    fn choose<'a>(
        &self,
        graph: &TaskGraph,
        candidates: &'a [RiskAssessment],
        station_empty: bool,
    ) -> Option<&'a RiskAssessment> {
        let bucket = |status: RiskStatus| candidates.iter().filter(move |c| c.status == status);

        // A critical task may only open a station
        if station_empty {
            if let Some(c) = self.best_by(
                graph,
                bucket(RiskStatus::Critical),
                |c| c.successor_count as f64,
                Preference::Highest,
            ) {
                return Some(c);
            }
        }

        self.best_by(
            graph,
            bucket(RiskStatus::Safe),
            |c| c.expected_out_of_line_cost,
            Preference::Highest,
        )
        .or_else(|| {
            self.best_by(
                graph,
                bucket(RiskStatus::Desirable),
                |c| c.expected_out_of_line_cost,
                Preference::Lowest,
            )
        })
    }

    fn best_by<'a>(
        &self,
        graph: &TaskGraph,
        bucket: impl Iterator<Item = &'a RiskAssessment>,
        key: impl Fn(&RiskAssessment) -> f64,
        preference: Preference,
    ) -> Option<&'a RiskAssessment> {
        bucket.min_by(|&a, &b| {
            let (ka, kb) = (key(a), key(b));
            // Relative tolerance, keys may be tail probabilities far below 1e-9
            if (ka - kb).abs() > self.epsilon * ka.abs().max(kb.abs()) {
                let ord = ka.partial_cmp(&kb).unwrap_or(Ordering::Equal);
                match preference {
                    Preference::Highest => ord.reverse(),
                    Preference::Lowest => ord,
                }
            } else {
                self.tie_break(graph, a, b)
            }
        })
    }

    fn tie_break(&self, graph: &TaskGraph, a: &RiskAssessment, b: &RiskAssessment) -> Ordering {
        match self.config.tie_breaker {
            TieBreaker::ById => a.task_id.cmp(&b.task_id),
            TieBreaker::InputOrder => graph
                .position(&a.task_id)
                .cmp(&graph.position(&b.task_id)),
        }
    }
}

impl Default for GreedyBalancer {
    fn default() -> Self {
        Self::new()
    }
}
