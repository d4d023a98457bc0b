//! Allocation policies, utilization and KPI evaluation.
//!
//! # Algorithm
//!
//! FCFS, LJF and Priority share one greedy, all-or-nothing placement
//! procedure and differ only in the order requests are tried
//! ([`GreedyAllocator`]). SA-LJF refines an LJF allocation by simulated
//! annealing ([`crate::sa`]).
//!
//! # KPI
//!
//! [`UtilizationEvaluator`] scores an allocation by occupied
//! instance-hours; [`AllocationKpi`] adds acceptance counts and
//! per-type utilization.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Kolen et al. (2007), "Interval scheduling: A survey"

mod compare;
mod greedy;
mod kpi;
mod policy;
mod utilization;

pub use compare::{best_policy, compare_policies, PolicyComparison};
pub use greedy::GreedyAllocator;
pub use kpi::AllocationKpi;
pub use policy::{AllocationPolicy, PolicyRun, RunStatus};
pub use utilization::{utilization, ObservationWindow, UtilizationEvaluator};
