//! Statistical risk classification of candidate tasks.
//!
//! Station workload is the sum of independent task durations, approximated
//! as normal with mean `M = Σ m` and variance `S = Σ s`. For a candidate
//! task added to a station with cycle time `T`:
//!
//! ```text
//! z = (T − M) / √S
//! expected_out_of_line_cost = (1 − Φ(z)) × out_completion_cost
//! ```
//!
//! | Status | Condition |
//! |--------|-----------|
//! | Safe | `z > 2.575` (overrun probability below 0.5%) |
//! | Desirable | `z > z_limit` of the task |
//! | Critical | otherwise |
//!
//! With `S = 0` the load is deterministic: `z = +∞` if it fits in `T`
//! (up to a relative rounding tolerance), `−∞` if it does not. A task with
//! zero off-line completion cost is always safe.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{BalanceError, Result};
use crate::models::{Station, Task, TaskGraph};
use crate::special::standard_normal_cdf;

/// Normalized margin above which a station overrun is negligible (`Φ(z) ≈ 0.995`).
pub const SAFE_Z_THRESHOLD: f64 = 2.575;

/// Risk tier of a candidate task for the current station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    /// Overrun probability negligible.
    Safe,
    /// Expected off-line cost below the in-line cost of a new station.
    Desirable,
    /// Assigning risks an overrun that costs more than it saves.
    Critical,
}

impl RiskStatus {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Desirable => "desirable",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative slack within which a deterministic load still fits the cycle.
const SLACK_TOLERANCE: f64 = 1e-12;

/// Cumulative workload of a station under the normal approximation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StationLoad {
    /// Sum of mean execution times.
    pub mean: f64,
    /// Sum of execution time variances.
    pub variance: f64,
}

impl StationLoad {
    /// Load of the tasks currently assigned to `station`.
    pub fn of(graph: &TaskGraph, station: &Station) -> Result<Self> {
        let mut load = Self::default();
        for id in station.assigned_task_ids() {
            let task = graph
                .task(id)
                .ok_or_else(|| BalanceError::UnknownTask(id.to_string()))?;
            load = load.with_task(task);
        }
        Ok(load)
    }

    /// Load after adding `task`.
    pub fn with_task(self, task: &Task) -> Self {
        Self {
            mean: self.mean + task.mean,
            variance: self.variance + task.variance,
        }
    }

    /// Standardized margin `(T − M) / √S` against `cycle_time`.
    pub fn z_margin(&self, cycle_time: f64) -> f64 {
        let slack = cycle_time - self.mean;
        if self.variance <= 0.0 {
            debug!(slack, "zero variance sum, deterministic load");
            let tolerance = SLACK_TOLERANCE * cycle_time.abs().max(self.mean.abs());
            return if slack >= -tolerance {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }
        slack / self.variance.sqrt()
    }

    /// Probability that the load exceeds `cycle_time`: `1 − Φ(z)`.
    pub fn overrun_probability(&self, cycle_time: f64) -> f64 {
        1.0 - standard_normal_cdf(self.z_margin(cycle_time))
    }
}

/// Outcome of classifying one candidate task against one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Candidate task ID.
    pub task_id: String,
    /// Risk tier.
    pub status: RiskStatus,
    /// Station margin with the candidate included.
    pub z: f64,
    /// Off-line completion cost of the candidate.
    pub out_completion_cost: f64,
    /// Overrun probability × off-line completion cost.
    pub expected_out_of_line_cost: f64,
    /// Direct successors of the candidate.
    pub successor_count: usize,
}

/// Classifies candidate tasks against a partially filled station.
#[derive(Debug, Clone, Copy)]
pub struct RiskClassifier {
    cycle_time: f64,
}

impl RiskClassifier {
    /// Creates a classifier for the given cycle time.
    pub fn new(cycle_time: f64) -> Self {
        Self { cycle_time }
    }

    /// Cycle time used for the margin.
    pub fn cycle_time(&self) -> f64 {
        self.cycle_time
    }

    /// Evaluates `task_id` as the next task of `station`.
    ///
    /// # Errors
    /// `UnknownTask` if the candidate or a station occupant is not in `graph`.
    pub fn classify(
        &self,
        graph: &TaskGraph,
        task_id: &str,
        station: &Station,
    ) -> Result<RiskAssessment> {
        let task = graph
            .task(task_id)
            .ok_or_else(|| BalanceError::UnknownTask(task_id.to_string()))?;
        let metrics = graph.metrics_of(task_id)?;

        let load = StationLoad::of(graph, station)?.with_task(task);
        let z = load.z_margin(self.cycle_time);
        let expected_out_of_line_cost =
            (1.0 - standard_normal_cdf(z)) * metrics.out_completion_cost;

        // Zero off-line completion cost is always safe
        let status = if metrics.out_completion_cost <= 0.0 {
            RiskStatus::Safe
        } else {
            classify_margin(z, metrics.z_limit)
        };

        Ok(RiskAssessment {
            task_id: task_id.to_string(),
            status,
            z,
            out_completion_cost: metrics.out_completion_cost,
            expected_out_of_line_cost,
            successor_count: metrics.successor_count,
        })
    }
}

/// Maps a station margin to a risk tier given the task's `z_limit`.
pub fn classify_margin(z: f64, z_limit: f64) -> RiskStatus {
    if z > SAFE_Z_THRESHOLD {
        RiskStatus::Safe
    } else if z > z_limit {
        RiskStatus::Desirable
    } else {
        RiskStatus::Critical
    }
}
