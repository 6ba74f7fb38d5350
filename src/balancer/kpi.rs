//! Line quality metrics (KPIs).
//!
//! Computes standard line balancing indicators from a balanced instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Station count | Number of opened stations |
//! | Station time cost | `T × c × stations` |
//! | Expected off-line cost | Σ recorded expected costs |
//! | Line efficiency | `Σ m / (stations × T)` |
//! | Overrun probability | `1 − Φ(z)` of each station's full load |
//!
//! # Reference
//! Scholl (1999), "Balancing and Sequencing of Assembly Lines", Ch. 2.2

use serde::Serialize;

use crate::error::Result;
use crate::models::Instance;
use crate::risk::StationLoad;

/// Per-station indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationKpi {
    /// Station ID.
    pub station_id: String,
    /// Number of assigned tasks.
    pub task_count: usize,
    /// Sum of mean task times.
    pub mean_load: f64,
    /// Sum of task time variances.
    pub variance_load: f64,
    /// Probability the station load exceeds the cycle time.
    pub overrun_probability: f64,
    /// Sum of recorded expected off-line costs.
    pub expected_cost: f64,
}

/// Line performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineKpi {
    /// Number of stations.
    pub station_count: usize,
    /// Cycle time `T`.
    pub cycle_time: f64,
    /// `T × c × stations`.
    pub station_time_cost: f64,
    /// Σ recorded expected off-line costs.
    pub expected_offline_cost: f64,
    /// Total unit cost of the balancing run.
    pub total_unit_cost: f64,
    /// Fraction of available station time filled by mean work (0.0..).
    pub line_efficiency: f64,
    /// Largest station mean load.
    pub max_mean_load: f64,
    /// Per-station breakdown, in station order.
    pub stations: Vec<StationKpi>,
}

impl LineKpi {
    /// Computes KPIs from a balanced instance.
    ///
    /// An instance without stations yields zero efficiency.
    pub fn calculate(instance: &Instance) -> Result<Self> {
        let cycle_time = instance.cycle_time();
        let graph = instance.graph();

        let stations = instance
            .stations()
            .iter()
            .map(|station| -> Result<StationKpi> {
                let load = StationLoad::of(graph, station)?;
                Ok(StationKpi {
                    station_id: station.id.clone(),
                    task_count: station.len(),
                    mean_load: load.mean,
                    variance_load: load.variance,
                    overrun_probability: load.overrun_probability(cycle_time),
                    expected_cost: station.total_expected_cost(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let station_count = stations.len();
        let total_work: f64 = stations.iter().map(|s| s.mean_load).sum();
        let line_efficiency = if station_count > 0 && cycle_time > 0.0 {
            total_work / (station_count as f64 * cycle_time)
        } else {
            0.0
        };
        let max_mean_load = stations.iter().map(|s| s.mean_load).fold(0.0, f64::max);

        Ok(Self {
            station_count,
            cycle_time,
            station_time_cost: instance.station_time_cost(),
            expected_offline_cost: instance.expected_offline_cost(),
            total_unit_cost: instance.total_unit_cost(),
            line_efficiency,
            max_mean_load,
            stations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancer::GreedyBalancer;
    use crate::models::Task;

    #[test]
    fn test_kpi_linear_chain() {
        let mut instance = Instance::new(
            "kpi",
            vec![
                Task::new("A", 1.0, 0.0, 5.0),
                Task::new("B", 1.0, 0.0, 5.0).with_predecessor("A"),
            ],
            1.0,
            2.0,
        )
        .unwrap();
        GreedyBalancer::new().balance(&mut instance).unwrap();

        let kpi = LineKpi::calculate(&instance).unwrap();
        assert_eq!(kpi.station_count, 2);
        assert!((kpi.station_time_cost - 4.0).abs() < 1e-12);
        assert_eq!(kpi.expected_offline_cost, 0.0);
        assert!((kpi.total_unit_cost - 4.0).abs() < 1e-12);
        assert!((kpi.line_efficiency - 1.0).abs() < 1e-12);
        assert_eq!(kpi.max_mean_load, 1.0);
        assert_eq!(kpi.stations[0].overrun_probability, 0.0);
    }

    #[test]
    fn test_kpi_station_breakdown() {
        let mut instance = Instance::new(
            "kpi",
            vec![
                Task::new("A", 2.0, 0.5, 5.0),
                Task::new("B", 3.0, 0.5, 5.0).with_predecessor("A"),
            ],
            0.1,
            1.0,
        )
        .unwrap();
        GreedyBalancer::new().balance(&mut instance).unwrap();

        let kpi = LineKpi::calculate(&instance).unwrap();
        assert_eq!(kpi.station_count, 1);
        let s = &kpi.stations[0];
        assert_eq!(s.task_count, 2);
        assert_eq!(s.mean_load, 5.0);
        assert_eq!(s.variance_load, 1.0);
        // z = (10 − 5) / 1
        assert!(s.overrun_probability < 1e-6);
        assert!((kpi.line_efficiency - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kpi_unbalanced_instance() {
        let instance = Instance::new("kpi", vec![Task::new("A", 1.0, 0.1, 1.0)], 1.0, 1.0).unwrap();
        let kpi = LineKpi::calculate(&instance).unwrap();
        assert_eq!(kpi.station_count, 0);
        assert_eq!(kpi.line_efficiency, 0.0);
        assert!(kpi.stations.is_empty());
    }
}
