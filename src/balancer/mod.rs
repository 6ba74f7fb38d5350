//! Greedy line balancer and KPI evaluation.
//!
//! # Algorithm
//!
//! `GreedyBalancer` fills stations one at a time, choosing among the
//! precedence-feasible tasks by their risk tier (see [`crate::risk`]).
//! It is not optimal, but runs in polynomial time and needs no tuning.
//!
//! # KPI
//!
//! `LineKpi` reports station count, cost split, line efficiency and
//! per-station overrun probability.
//!
//! # References
//!
//! - Scholl (1999), "Balancing and Sequencing of Assembly Lines"
//! - Boysen, Fliedner & Scholl (2007), "A classification of assembly line
//!   balancing problems"

mod greedy;
mod kpi;

pub use greedy::{BalanceOutcome, BalancerConfig, GreedyBalancer, Selection, TieBreaker};
pub use kpi::{LineKpi, StationKpi};
