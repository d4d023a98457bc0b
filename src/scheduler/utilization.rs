//! Utilization: share of instance-hours occupied by accepted requests.
//!
//! # Definition
//!
//! ```text
//! window = [min start, max end] over all requests, T = max - min + 1
//! U = Σ_accepted Σ_held-instances (end - start + 1) / ((N + 3K) × T)
//! ```
//!
//! The window spans every request of the input, accepted or not, so two
//! allocations of the same request set are always scored on the same
//! denominator.

use serde::{Deserialize, Serialize};

use crate::models::{Request, ResourceType};
use crate::pool::{Allocation, ResourcePool};

/// Inclusive range of observed hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationWindow {
    /// First hour.
    pub start: i64,
    /// Last hour (inclusive).
    pub end: i64,
}

impl ObservationWindow {
    /// Creates a window.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Smallest window covering every request; `None` for an empty set.
    pub fn covering(requests: &[Request]) -> Option<Self> {
        let start = requests.iter().map(Request::start).min()?;
        let end = requests.iter().map(Request::end).max()?;
        Some(Self { start, end })
    }

    /// Number of hours `T`; zero or negative for a degenerate window.
    ///
    /// Saturates instead of overflowing for windows built from extreme
    /// hours.
    #[inline]
    pub fn len(&self) -> i64 {
        self.end.saturating_sub(self.start).saturating_add(1)
    }

    /// Whether the window covers no hours.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }

    /// Whether the request lies fully inside the window.
    pub fn contains(&self, request: &Request) -> bool {
        self.start <= request.start() && request.end() <= self.end
    }
}

/// Scores allocations of one request set.
///
/// The window is computed once at construction, so repeated evaluation
/// (as the annealing loop does) costs one pass over the bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtilizationEvaluator {
    window: Option<ObservationWindow>,
}

impl UtilizationEvaluator {
    /// Creates an evaluator for `requests`.
    pub fn new(requests: &[Request]) -> Self {
        Self {
            window: ObservationWindow::covering(requests),
        }
    }

    /// Creates an evaluator with an explicit window.
    pub fn with_window(window: ObservationWindow) -> Self {
        Self {
            window: Some(window),
        }
    }

    /// Observation window; `None` when there are no requests.
    pub fn window(&self) -> Option<ObservationWindow> {
        self.window
    }

    /// Utilization of an allocation, in `[0, 1]`.
    pub fn evaluate(&self, allocation: &Allocation) -> f64 {
        self.evaluate_pool(allocation.pool())
    }

    /// Utilization of a pool, in `[0, 1]`.
    ///
    /// Zero when there are no requests, the window is empty, or the pool
    /// has no instances.
    pub fn evaluate_pool(&self, pool: &ResourcePool) -> f64 {
        self.ratio(pool.occupied_hours(), pool.total_instances())
    }

    /// Utilization of the instances of one type.
    pub fn evaluate_type(&self, pool: &ResourcePool, rt: ResourceType) -> f64 {
        self.ratio(pool.occupied_hours_of(rt), pool.instances(rt).len())
    }

    fn ratio(&self, occupied: i64, instances: usize) -> f64 {
        let Some(window) = self.window else {
            return 0.0;
        };
        if window.is_empty() || instances == 0 {
            return 0.0;
        }
        occupied as f64 / (instances as f64 * window.len() as f64)
    }
}

/// Utilization of `allocation` over the window of `requests`.
pub fn utilization(allocation: &Allocation, requests: &[Request]) -> f64 {
    UtilizationEvaluator::new(requests).evaluate(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PoolSizing, RequestId, ResourceType::*};
    use crate::scheduler::GreedyAllocator;

    #[test]
    fn test_window() {
        let requests = vec![
            Request::new(Category::Parking, 4, 9, [ParkingSlot]).unwrap(),
            Request::new(Category::Essentials, 2, 5, [BatteryCable]).unwrap(),
        ];
        let window = ObservationWindow::covering(&requests).unwrap();
        assert_eq!(window, ObservationWindow::new(2, 9));
        assert_eq!(window.len(), 8);
        assert!(window.contains(&requests[0]));
        assert!(ObservationWindow::covering(&[]).is_none());
    }

    #[test]
    fn test_extreme_window_saturates() {
        assert_eq!(ObservationWindow::new(i64::MIN, i64::MAX).len(), i64::MAX);
        assert!(ObservationWindow::new(i64::MAX, i64::MIN).is_empty());
    }

    #[test]
    fn test_utilization_value() {
        // N=1, K=1: 4 instances. Window [0, 9], T = 10.
        let requests = vec![
            Request::new(Category::Event, 0, 4, [ParkingSlot, BatteryCable]).unwrap(),
            Request::new(Category::Essentials, 5, 9, [LockerUmbrella]).unwrap(),
        ];
        let allocation = GreedyAllocator::fcfs()
            .allocate(&requests, PoolSizing::new(1, 1))
            .unwrap();
        // (5 + 5 + 5) / (4 × 10)
        let u = utilization(&allocation, &requests);
        assert!((u - 15.0 / 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejected_requests_do_not_count() {
        let requests = vec![
            Request::new(Category::Parking, 0, 5, [ParkingSlot]).unwrap(),
            Request::new(Category::Parking, 3, 8, [ParkingSlot]).unwrap(),
        ];
        let allocation = GreedyAllocator::fcfs()
            .allocate(&requests, PoolSizing::new(1, 0))
            .unwrap();
        assert!(!allocation.is_accepted(RequestId(1)));
        // 6 hours on 1 instance over T = 9
        assert!((utilization(&allocation, &requests) - 6.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_idempotent() {
        let requests = vec![Request::new(Category::Parking, 0, 3, [ParkingSlot]).unwrap()];
        let allocation = GreedyAllocator::ljf()
            .allocate(&requests, PoolSizing::default())
            .unwrap();
        let evaluator = UtilizationEvaluator::new(&requests);
        let first = evaluator.evaluate(&allocation);
        let second = evaluator.evaluate(&allocation);
        assert_eq!(first, second);
        assert_eq!(first, utilization(&allocation, &requests));
    }

    #[test]
    fn test_zero_cases() {
        let empty = Allocation::empty(PoolSizing::default());
        assert_eq!(utilization(&empty, &[]), 0.0);

        let requests = vec![Request::new(Category::Parking, 0, 3, [ParkingSlot]).unwrap()];
        let no_instances = Allocation::empty(PoolSizing::new(0, 0));
        assert_eq!(utilization(&no_instances, &requests), 0.0);

        let degenerate = UtilizationEvaluator::with_window(ObservationWindow::new(5, 4));
        assert_eq!(degenerate.evaluate(&empty), 0.0);
    }

    #[test]
    fn test_per_type() {
        let requests = vec![
            Request::new(Category::Reservation, 0, 9, [ParkingSlot, ValetInflation]).unwrap(),
        ];
        let allocation = GreedyAllocator::fcfs()
            .allocate(&requests, PoolSizing::new(2, 1))
            .unwrap();
        let evaluator = UtilizationEvaluator::new(&requests);
        assert!((evaluator.evaluate_type(allocation.pool(), ParkingSlot) - 0.5).abs() < 1e-12);
        assert!((evaluator.evaluate_type(allocation.pool(), ValetInflation) - 1.0).abs() < 1e-12);
        assert_eq!(evaluator.evaluate_type(allocation.pool(), BatteryCable), 0.0);
    }
}
