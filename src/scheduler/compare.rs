//! Side-by-side policy comparison on one request set.

use rand::Rng;

use super::{AllocationKpi, AllocationPolicy, PolicyRun};
use crate::models::{PoolSizing, Request};

/// One policy's run and its KPIs.
#[derive(Debug, Clone)]
pub struct PolicyComparison {
    /// The run.
    pub run: PolicyRun,
    /// KPIs of the run's allocation.
    pub kpi: AllocationKpi,
}

/// Runs each policy on its own fresh pool.
///
/// Runs share the RNG in the order given, so the whole comparison is
/// reproducible from one seed.
pub fn compare_policies<R: Rng>(
    requests: &[Request],
    sizing: PoolSizing,
    policies: &[AllocationPolicy],
    rng: &mut R,
) -> Vec<PolicyComparison> {
    policies
        .iter()
        .map(|policy| {
            let run = policy.run(requests, sizing, rng);
            let kpi = AllocationKpi::calculate(&run.allocation, requests);
            PolicyComparison { run, kpi }
        })
        .collect()
}

/// The completed run with the highest utilization (earliest on ties).
pub fn best_policy(comparisons: &[PolicyComparison]) -> Option<&PolicyComparison> {
    comparisons
        .iter()
        .filter(|c| c.run.is_completed())
        .fold(None, |best: Option<&PolicyComparison>, c| match best {
            Some(b) if b.run.utilization >= c.run.utilization => Some(b),
            _ => Some(c),
        })
}
