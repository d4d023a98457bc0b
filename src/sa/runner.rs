//! Annealing loop over allocations.

use rand::Rng;

use super::SaConfig;
use crate::dispatching::RuleEngine;
use crate::error::{AllocationError, OptimizerError};
use crate::models::{PoolSizing, Request, RequestId};
use crate::pool::{Allocation, ResourcePool};
use crate::scheduler::UtilizationEvaluator;

/// Outcome of an annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// Best allocation found.
    pub best: Allocation,
    /// Utilization of `best`.
    pub best_utilization: f64,
    /// Utilization of the seed allocation.
    pub initial_utilization: f64,
    /// Utilization of the current state when the loop ended.
    pub current_utilization: f64,
    /// Iterations run.
    pub iterations: usize,
    /// Moves accepted by the Metropolis criterion (including non-worsening).
    pub accepted_moves: usize,
    /// Best utilization after each iteration. Non-decreasing.
    pub best_trace: Vec<f64>,
}

impl SaResult {
    /// Gain of the best state over the seed.
    pub fn improvement(&self) -> f64 {
        self.best_utilization - self.initial_utilization
    }

    /// Fraction of iterations whose move was accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted_moves as f64 / self.iterations as f64
        }
    }
}

/// Simulated-annealing refinement of a largest-job-first allocation.
///
/// # Algorithm
/// 1. Seed: place requests in LJF order; a feasible placement is kept with
///    probability `p`, otherwise the request joins the rejected pool.
/// 2. Each iteration perturbs a copy of the current state: every placed
///    request (ascending id) is evicted with probability `q`, then the
///    rejected pool is re-placed in LJF order, again keeping each feasible
///    placement with probability `p`.
/// 3. The copy replaces the current state if utilization did not drop, or
///    with probability `exp(delta / T_i)` otherwise. The rejected pool of
///    an accepted copy carries forward; a refused copy is discarded along
///    with its pool.
/// 4. The best state ever seen is returned.
///
/// All randomness is drawn from the caller's RNG, so a fixed seed
/// reproduces the run exactly.
#[derive(Debug, Clone)]
pub struct SaOptimizer {
    config: SaConfig,
    engine: RuleEngine,
}

impl SaOptimizer {
    /// Creates an optimizer.
    pub fn new(config: SaConfig) -> Self {
        Self {
            config,
            engine: RuleEngine::ljf(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Runs the annealing loop.
    ///
    /// # Errors
    /// - [`OptimizerError::InvalidConfig`] if the configuration is invalid
    /// - [`OptimizerError::Allocation`] if a pool mutation fails
    pub fn run<R: Rng>(
        &self,
        requests: &[Request],
        sizing: PoolSizing,
        rng: &mut R,
    ) -> Result<SaResult, OptimizerError> {
        self.config.validate()?;
        let evaluator = UtilizationEvaluator::new(requests);

        let mut current = ResourcePool::new(sizing);
        let seed_order = self.engine.sort_indices(requests);
        let mut rejected = self.reinsert(&mut current, requests, &seed_order, rng)?;
        let mut current_util = evaluator.evaluate_pool(&current);

        let initial_utilization = current_util;
        let mut best = current.clone();
        let mut best_util = current_util;
        let mut best_trace = Vec::with_capacity(self.config.max_iterations);
        let mut accepted_moves = 0;

        for i in 0..self.config.max_iterations {
            let mut candidate = current.clone();
            let mut candidate_rejected = rejected.clone();

            for id in candidate.placed_requests() {
                if rng.random_bool(self.config.eviction_probability) {
                    candidate.evict(id, &requests[id.index()])?;
                    candidate_rejected.push(id);
                }
            }

            let order = self.engine.sort_subset(requests, &candidate_rejected);
            let still_rejected = self.reinsert(&mut candidate, requests, &order, rng)?;

            let new_util = evaluator.evaluate_pool(&candidate);
            let delta = new_util - current_util;
            let temperature = self.config.temperature(i);
            let accept = delta >= 0.0 || rng.random::<f64>() < (delta / temperature).exp();

            if accept {
                current = candidate;
                current_util = new_util;
                rejected = still_rejected;
                accepted_moves += 1;

                if current_util > best_util {
                    best = current.clone();
                    best_util = current_util;
                }
            }

            log::trace!(
                "sa iter {i}: T={temperature:.6} delta={delta:+.6} accepted={accept} best={best_util:.6}"
            );
            best_trace.push(best_util);
        }

        log::info!(
            "sa finished: {} iterations, {} accepted, utilization {:.4} -> {:.4}",
            self.config.max_iterations,
            accepted_moves,
            initial_utilization,
            best_util
        );

        Ok(SaResult {
            best: Allocation::from(best),
            best_utilization: best_util,
            initial_utilization,
            current_utilization: current_util,
            iterations: self.config.max_iterations,
            accepted_moves,
            best_trace,
        })
    }

    /// Tries each request of `order` in turn; returns those left unplaced.
    ///
    /// The keep draw happens only when a placement exists.
    fn reinsert<R: Rng>(
        &self,
        pool: &mut ResourcePool,
        requests: &[Request],
        order: &[RequestId],
        rng: &mut R,
    ) -> Result<Vec<RequestId>, AllocationError> {
        let mut rejected = Vec::new();
        for &id in order {
            let request = &requests[id.index()];
            match pool.find_placement(request) {
                Some(placement) if rng.random_bool(self.config.keep_probability) => {
                    pool.commit(id, request, &placement)?;
                }
                _ => rejected.push(id),
            }
        }
        Ok(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ResourceType::*};
    use crate::scheduler::GreedyAllocator;
    use crate::validation::validate_allocation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_requests(n: usize, seed: u64) -> Vec<Request> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let start = rng.random_range(0..48);
                let end = start + rng.random_range(0..8);
                match rng.random_range(0..4) {
                    0 => Request::new(
                        Category::Event,
                        start,
                        end,
                        [ParkingSlot, BatteryCable, LockerUmbrella],
                    ),
                    1 => Request::new(Category::Reservation, start, end, [ParkingSlot, ValetInflation]),
                    2 => Request::new(Category::Parking, start, end, [ParkingSlot]),
                    _ => Request::new(Category::Essentials, start, end, [LockerUmbrella]),
                }
                .unwrap()
            })
            .collect()
    }

    fn small_config() -> SaConfig {
        SaConfig::default().with_max_iterations(200)
    }

    #[test]
    fn test_deterministic_under_seed() {
        let requests = sample_requests(60, 7);
        let sizing = PoolSizing::new(3, 1);
        let optimizer = SaOptimizer::new(small_config());

        let a = optimizer
            .run(&requests, sizing, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = optimizer
            .run(&requests, sizing, &mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.best_trace, b.best_trace);
        assert_eq!(a.accepted_moves, b.accepted_moves);
    }

    #[test]
    fn test_best_trace_non_decreasing() {
        let requests = sample_requests(60, 11);
        let result = SaOptimizer::new(small_config())
            .run(&requests, PoolSizing::new(3, 1), &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(result.best_trace.len(), 200);
        assert_eq!(result.iterations, 200);
        for pair in result.best_trace.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(result.best_utilization >= result.initial_utilization);
        assert!(result.best_utilization >= result.current_utilization);
        assert!(result.improvement() >= 0.0);
    }

    #[test]
    fn test_cold_run_refuses_worse_moves() {
        // At a near-zero temperature every worsening move is refused, so the
        // current state never drops and ends at the best utilization.
        let requests = sample_requests(60, 23);
        let config = small_config()
            .with_initial_temperature(1e-9)
            .with_min_temperature(1e-12);
        let result = SaOptimizer::new(config)
            .run(&requests, PoolSizing::new(2, 1), &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert!(result.accepted_moves < result.iterations);
        assert!(result.acceptance_rate() < 1.0);
        assert_eq!(result.current_utilization, result.best_utilization);
        assert!(result.best_utilization >= result.initial_utilization);
        assert!(validate_allocation(&result.best, &requests).is_ok());
    }

    #[test]
    fn test_best_is_feasible_and_scored() {
        let requests = sample_requests(80, 3);
        let result = SaOptimizer::new(small_config())
            .run(&requests, PoolSizing::new(2, 1), &mut StdRng::seed_from_u64(9))
            .unwrap();

        assert!(validate_allocation(&result.best, &requests).is_ok());
        let rescored = UtilizationEvaluator::new(&requests).evaluate(&result.best);
        assert!((rescored - result.best_utilization).abs() < 1e-12);
    }

    #[test]
    fn test_no_noise_no_eviction_matches_ljf() {
        let requests = sample_requests(40, 5);
        let sizing = PoolSizing::new(2, 1);
        let config = small_config()
            .with_keep_probability(1.0)
            .with_eviction_probability(0.0);

        let result = SaOptimizer::new(config)
            .run(&requests, sizing, &mut StdRng::seed_from_u64(0))
            .unwrap();
        let ljf = GreedyAllocator::ljf().allocate(&requests, sizing).unwrap();

        assert_eq!(result.best, ljf);
        // Nothing moves, so every iteration is a zero-delta acceptance.
        assert_eq!(result.accepted_moves, 200);
    }

    #[test]
    fn test_keep_probability_zero_places_nothing() {
        let requests = sample_requests(20, 2);
        let config = small_config().with_keep_probability(0.0);
        let result = SaOptimizer::new(config)
            .run(&requests, PoolSizing::default(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(result.best.accepted_count(), 0);
        assert_eq!(result.best_utilization, 0.0);
    }

    #[test]
    fn test_empty_requests() {
        let result = SaOptimizer::new(small_config())
            .run(&[], PoolSizing::default(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(result.best_utilization, 0.0);
        assert_eq!(result.best.accepted_count(), 0);
    }

    #[test]
    fn test_zero_iterations_returns_seed() {
        let requests = sample_requests(10, 4);
        let config = SaConfig::default().with_max_iterations(0);
        let result = SaOptimizer::new(config)
            .run(&requests, PoolSizing::default(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(result.best_trace.is_empty());
        assert_eq!(result.best_utilization, result.initial_utilization);
        assert_eq!(result.acceptance_rate(), 0.0);
    }

    #[test]
    fn test_invalid_config() {
        let config = SaConfig::default().with_eviction_probability(2.0);
        let err = SaOptimizer::new(config)
            .run(&[], PoolSizing::default(), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfig(_)));
    }
}
