//! Allocation policies.
//!
//! | Policy | Order | Placement |
//! |--------|-------|-----------|
//! | FCFS | Arrival | Greedy |
//! | LJF | Largest workload, then most types | Greedy |
//! | Priority | Category rank, then earliest start | Greedy |
//! | SA-LJF | LJF seed | Annealing refinement |

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GreedyAllocator, UtilizationEvaluator};
use crate::models::{PoolSizing, Request};
use crate::pool::Allocation;
use crate::sa::{SaConfig, SaOptimizer};

/// An allocation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AllocationPolicy {
    /// First-come-first-served.
    Fcfs,
    /// Largest job first.
    Ljf,
    /// Category priority.
    Priority,
    /// Simulated annealing seeded by LJF.
    SaLjf(SaConfig),
}

/// How a policy run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// The policy produced its allocation.
    Completed,
    /// The policy failed; the run reports an empty allocation.
    Failed(String),
}

/// Result of running one policy on one request set.
#[derive(Debug, Clone)]
pub struct PolicyRun {
    /// Policy name.
    pub policy: &'static str,
    /// Final allocation (empty if the run failed).
    pub allocation: Allocation,
    /// Utilization of `allocation`.
    pub utilization: f64,
    /// Completion status.
    pub status: RunStatus,
}

impl PolicyRun {
    /// Whether the policy completed.
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

impl AllocationPolicy {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            AllocationPolicy::Fcfs => "FCFS",
            AllocationPolicy::Ljf => "LJF",
            AllocationPolicy::Priority => "Priority",
            AllocationPolicy::SaLjf(_) => "SA-LJF",
        }
    }

    /// The four policies, SA-LJF with default parameters.
    pub fn standard() -> Vec<Self> {
        vec![
            AllocationPolicy::Fcfs,
            AllocationPolicy::Ljf,
            AllocationPolicy::Priority,
            AllocationPolicy::SaLjf(SaConfig::default()),
        ]
    }

    /// Allocates `requests` on a fresh pool.
    ///
    /// The RNG is only drawn from by SA-LJF.
    pub fn allocate<R: Rng>(
        &self,
        requests: &[Request],
        sizing: PoolSizing,
        rng: &mut R,
    ) -> crate::Result<Allocation> {
        let allocation = match self {
            AllocationPolicy::Fcfs => GreedyAllocator::fcfs().allocate(requests, sizing)?,
            AllocationPolicy::Ljf => GreedyAllocator::ljf().allocate(requests, sizing)?,
            AllocationPolicy::Priority => GreedyAllocator::priority().allocate(requests, sizing)?,
            AllocationPolicy::SaLjf(config) => {
                SaOptimizer::new(*config).run(requests, sizing, rng)?.best
            }
        };
        Ok(allocation)
    }

    /// Allocates and scores, downgrading failures to zero utilization.
    ///
    /// A failed run reports an empty allocation, utilization `0` and
    /// [`RunStatus::Failed`] so callers can tell it apart from a genuine
    /// zero.
    pub fn run<R: Rng>(&self, requests: &[Request], sizing: PoolSizing, rng: &mut R) -> PolicyRun {
        match self.allocate(requests, sizing, rng) {
            Ok(allocation) => {
                let utilization = UtilizationEvaluator::new(requests).evaluate(&allocation);
                log::debug!(
                    "{}: accepted {}/{} requests, utilization {:.4}",
                    self.name(),
                    allocation.accepted_count(),
                    requests.len(),
                    utilization
                );
                PolicyRun {
                    policy: self.name(),
                    allocation,
                    utilization,
                    status: RunStatus::Completed,
                }
            }
            Err(err) => {
                log::warn!("{} failed, reporting zero utilization: {err}", self.name());
                PolicyRun {
                    policy: self.name(),
                    allocation: Allocation::empty(sizing),
                    utilization: 0.0,
                    status: RunStatus::Failed(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RequestId, ResourceType::*};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_names() {
        let names: Vec<&str> = AllocationPolicy::standard()
            .iter()
            .map(AllocationPolicy::name)
            .collect();
        assert_eq!(names, vec!["FCFS", "LJF", "Priority", "SA-LJF"]);
    }

    #[test]
    fn test_run_completed() {
        let requests = vec![
            Request::new(Category::Parking, 0, 5, [ParkingSlot]).unwrap(),
            Request::new(Category::Parking, 3, 8, [ParkingSlot]).unwrap(),
        ];
        let run = AllocationPolicy::Fcfs.run(&requests, PoolSizing::new(1, 1), &mut rng());
        assert!(run.is_completed());
        assert_eq!(run.policy, "FCFS");
        assert!(run.allocation.is_accepted(RequestId(0)));
        assert!(!run.allocation.is_accepted(RequestId(1)));
        // 6 hours over 4 instances × 9 hours
        assert!((run.utilization - 6.0 / 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_sa_failure_is_downgraded() {
        let requests = vec![Request::new(Category::Parking, 0, 5, [ParkingSlot]).unwrap()];
        let policy = AllocationPolicy::SaLjf(SaConfig::default().with_decay(0.0));

        assert!(policy
            .allocate(&requests, PoolSizing::default(), &mut rng())
            .is_err());

        let run = policy.run(&requests, PoolSizing::default(), &mut rng());
        assert!(matches!(run.status, RunStatus::Failed(_)));
        assert_eq!(run.utilization, 0.0);
        assert_eq!(run.allocation.accepted_count(), 0);
    }

    #[test]
    fn test_sa_run_reports_best() {
        let requests = vec![
            Request::new(Category::Event, 0, 9, [ParkingSlot, BatteryCable]).unwrap(),
            Request::new(Category::Parking, 2, 3, [ParkingSlot]).unwrap(),
        ];
        let policy = AllocationPolicy::SaLjf(SaConfig::default().with_max_iterations(100));
        let run = policy.run(&requests, PoolSizing::new(1, 1), &mut rng());
        assert!(run.is_completed());
        assert!(run.utilization > 0.0);
    }

    #[test]
    fn test_zero_requests() {
        for policy in AllocationPolicy::standard() {
            let run = policy.run(&[], PoolSizing::default(), &mut rng());
            assert!(run.is_completed());
            assert_eq!(run.utilization, 0.0);
        }
    }

    #[test]
    fn test_policy_serde() {
        let policy = AllocationPolicy::SaLjf(SaConfig::default().with_max_iterations(10));
        let json = serde_json::to_string(&policy).unwrap();
        let back: AllocationPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);

        let fcfs: AllocationPolicy = serde_json::from_str(r#""Fcfs""#).unwrap();
        assert_eq!(fcfs, AllocationPolicy::Fcfs);
    }
}
