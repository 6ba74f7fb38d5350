//! Stochastic assembly-line balancing for the U-Engine ecosystem.
//!
//! Assigns tasks with uncertain execution times to a sequence of stations
//! so that each station's workload probabilistically fits the cycle time,
//! trading station cost against the expected cost of finishing work
//! outside the line.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `TaskGraph`, `Station`, `Instance`
//! - **`risk`**: Normal-approximation risk tiers (safe / desirable / critical)
//! - **`balancer`**: Greedy station-oriented balancer and line KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, DAG cycles, ranges)
//! - **`special`**: Standard normal CDF and quantile
//! - **`io`**, **`report`**: JSON load/dump and console output
//!
//! # Example
//!
//! ```
//! use u_linebalance::{GreedyBalancer, Instance, Task};
//!
//! let tasks = vec![
//!     Task::new("A", 2.0, 0.1, 5.0),
//!     Task::new("B", 2.0, 0.1, 5.0).with_predecessor("A"),
//! ];
//! // q = 0.1 → cycle time 10
//! let mut instance = Instance::new("demo", tasks, 0.1, 1.0)?;
//! GreedyBalancer::new().balance(&mut instance)?;
//!
//! assert_eq!(instance.stations().len(), 1);
//! # Ok::<(), u_linebalance::BalanceError>(())
//! ```
//!
//! # References
//!
//! - Scholl (1999), "Balancing and Sequencing of Assembly Lines"
//! - Boysen, Fliedner & Scholl (2007), "A classification of assembly line
//!   balancing problems"

pub mod balancer;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod risk;
pub mod special;
pub mod validation;

pub use balancer::{BalanceOutcome, BalancerConfig, GreedyBalancer, LineKpi, TieBreaker};
pub use error::{BalanceError, Result};
pub use models::{Instance, Station, Task, TaskGraph};
pub use risk::{RiskAssessment, RiskClassifier, RiskStatus};
