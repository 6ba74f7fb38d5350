//! Line balancing domain models.
//!
//! | Type | Role |
//! |------|------|
//! | `Task` | Work element with stochastic time and off-line cost |
//! | `TaskMetrics` | Derived per-task costs and risk limit |
//! | `TaskGraph` | Precedence DAG and availability queries |
//! | `Station` | Ordered tasks sharing one cycle time |
//! | `Instance` | Graph + line parameters + resulting stations |

mod graph;
mod instance;
mod station;
mod task;

pub use graph::TaskGraph;
pub use instance::Instance;
pub use station::{Station, StationAssignment};
pub use task::{Task, TaskMetrics};
