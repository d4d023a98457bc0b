//! Simulated Annealing (SA) over booking allocations.
//!
//! Starts from a noisy largest-job-first allocation and perturbs it by
//! random eviction and greedy re-placement, accepting worsening moves with
//! a probability that shrinks as the temperature cools.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaOptimizer, SaResult};
