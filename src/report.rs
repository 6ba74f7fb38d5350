//! Console report of a balanced instance.

use std::fmt;

use crate::models::Instance;

/// Per-station breakdown of expected off-line costs and the total.
///
/// ```text
/// +++++++++++++++ station 1 +++++++++++++++
/// task    unit_cost_out_line
/// A       0
/// ...
/// TOTAL COST [€/pc]: 3
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Report<'a>(pub &'a Instance);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for station in self.0.stations() {
            writeln!(f, "+++++++++++++++ station {} +++++++++++++++", station.id)?;
            writeln!(f, "task\tunit_cost_out_line")?;
            for a in station.assignments() {
                writeln!(f, "{}\t{}", a.task_id, a.expected_cost)?;
            }
        }

        writeln!(f, "\n###################\n")?;
        writeln!(f, "TOTAL COST [€/pc]: {}", self.0.total_unit_cost())?;
        writeln!(f, "\n###################")
    }
}

/// Renders [`Report`] into a string.
pub fn format_report(instance: &Instance) -> String {
    Report(instance).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balancer::GreedyBalancer;
    use crate::models::Task;

    #[test]
    fn test_report_lists_stations_and_total() {
        let mut instance = Instance::new(
            "r",
            vec![
                Task::new("A", 1.0, 0.0, 5.0),
                Task::new("B", 1.0, 0.0, 5.0).with_predecessor("A"),
            ],
            1.0,
            1.0,
        )
        .unwrap();
        GreedyBalancer::new().balance(&mut instance).unwrap();

        let report = format_report(&instance);
        assert!(report.contains("station 1"));
        assert!(report.contains("station 2"));
        assert!(report.contains("A\t0\n"));
        assert!(report.contains("TOTAL COST [€/pc]: 2\n"));
    }

    #[test]
    fn test_report_display_matches_string() {
        let mut instance =
            Instance::new("r", vec![Task::new("A", 1.0, 0.0, 5.0)], 1.0, 1.0).unwrap();
        GreedyBalancer::new().balance(&mut instance).unwrap();

        let rendered = format!("{}", Report(&instance));
        assert_eq!(rendered, format_report(&instance));
        assert!(rendered.starts_with("+++++++++++++++ station 1 +++++++++++++++\ntask\tunit_cost_out_line\nA\t0\n"));
        assert!(rendered.ends_with("TOTAL COST [€/pc]: 1\n\n###################\n"));
    }

    #[test]
    fn test_report_unbalanced() {
        let instance = Instance::new("r", Vec::new(), 1.0, 1.0).unwrap();
        let report = format_report(&instance);
        assert!(!report.contains("station"));
        assert!(report.contains("TOTAL COST [€/pc]: 0\n"));
    }
}
