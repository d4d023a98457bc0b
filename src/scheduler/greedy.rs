//! Rule-ordered greedy allocator.
//!
//! # Algorithm
//!
//! 1. Order requests with the rule engine (input order if it has no rules).
//! 2. For each request, find the first free instance of every required type.
//! 3. Commit if all types found one; otherwise reject without side effects.
//!
//! # Complexity
//! O(n × t × c × log b) where n=requests, t=types per request,
//! c=instances per type, b=bookings per instance.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use crate::dispatching::RuleEngine;
use crate::error::AllocationError;
use crate::models::{PoolSizing, Request, RequestId};
use crate::pool::{Allocation, ResourcePool};

/// Greedy all-or-nothing allocator driven by a rule engine.
///
/// # Example
///
/// ```
/// use u_booking::models::{Category, PoolSizing, Request, ResourceType};
/// use u_booking::scheduler::GreedyAllocator;
///
/// let requests = vec![
///     Request::new(Category::Parking, 0, 5, [ResourceType::ParkingSlot]).unwrap(),
///     Request::new(Category::Parking, 3, 8, [ResourceType::ParkingSlot]).unwrap(),
/// ];
/// let allocation = GreedyAllocator::fcfs()
///     .allocate(&requests, PoolSizing::new(1, 1))
///     .unwrap();
/// assert_eq!(allocation.accepted_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyAllocator {
    engine: RuleEngine,
}

impl GreedyAllocator {
    /// Creates an allocator ordering requests with `engine`.
    pub fn new(engine: RuleEngine) -> Self {
        Self { engine }
    }

    /// First-come-first-served.
    pub fn fcfs() -> Self {
        Self::new(RuleEngine::fcfs())
    }

    /// Largest job first.
    pub fn ljf() -> Self {
        Self::new(RuleEngine::ljf())
    }

    /// Category priority.
    pub fn priority() -> Self {
        Self::new(RuleEngine::priority())
    }

    /// Rule engine in use.
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Allocates every request on a fresh pool.
    pub fn allocate(
        &self,
        requests: &[Request],
        sizing: PoolSizing,
    ) -> Result<Allocation, AllocationError> {
        let mut pool = ResourcePool::new(sizing);
        let order = self.engine.sort_indices(requests);
        self.place_in_order(&mut pool, requests, &order)?;
        Ok(Allocation::from(pool))
    }

    /// Places requests into an existing pool in the given order.
    ///
    /// Returns the requests that did not fit, in the order tried.
    ///
    /// # Errors
    /// [`AllocationError::UnknownRequest`] if an id of `order` is not an
    /// index into `requests`; requests placed before it stay placed.
    pub fn place_in_order(
        &self,
        pool: &mut ResourcePool,
        requests: &[Request],
        order: &[RequestId],
    ) -> Result<Vec<RequestId>, AllocationError> {
        let mut rejected = Vec::new();
        for &id in order {
            let request = requests
                .get(id.index())
                .ok_or(AllocationError::UnknownRequest(id))?;
            if !pool.try_place(id, request)? {
                rejected.push(id);
            }
        }
        Ok(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ResourceType, ResourceType::*};
    use crate::pool::InstanceId;

    fn req(category: Category, start: i64, end: i64, types: &[ResourceType]) -> Request {
        Request::new(category, start, end, types.iter().copied()).unwrap()
    }

    #[test]
    fn test_fcfs_first_wins() {
        let requests = vec![
            req(Category::Parking, 0, 5, &[ParkingSlot]),
            req(Category::Parking, 3, 8, &[ParkingSlot]),
        ];
        let allocation = GreedyAllocator::fcfs()
            .allocate(&requests, PoolSizing::new(1, 1))
            .unwrap();

        assert!(allocation.is_accepted(RequestId(0)));
        assert!(!allocation.is_accepted(RequestId(1)));
        let slot = allocation
            .instance(InstanceId::new(ParkingSlot, 0))
            .unwrap();
        let held: Vec<RequestId> = slot.bookings().iter().map(|b| b.request).collect();
        assert_eq!(held, vec![RequestId(0)]);
    }

    #[test]
    fn test_ljf_places_large_job_first() {
        let requests = vec![
            req(Category::Parking, 2, 3, &[ParkingSlot]),
            req(Category::Event, 0, 9, &[ParkingSlot, BatteryCable]),
        ];
        let sizing = PoolSizing::new(1, 1);

        let fcfs = GreedyAllocator::fcfs().allocate(&requests, sizing).unwrap();
        assert_eq!(fcfs.accepted_requests(), vec![RequestId(0)]);

        let ljf = GreedyAllocator::ljf().allocate(&requests, sizing).unwrap();
        assert_eq!(ljf.accepted_requests(), vec![RequestId(1)]);
    }

    #[test]
    fn test_priority_prefers_events() {
        let requests = vec![
            req(Category::Parking, 0, 4, &[ParkingSlot]),
            req(Category::Reservation, 2, 6, &[ParkingSlot, LockerUmbrella]),
            req(Category::Event, 3, 3, &[ParkingSlot]),
        ];
        let allocation = GreedyAllocator::priority()
            .allocate(&requests, PoolSizing::new(1, 1))
            .unwrap();
        // Event [3,3] goes first and blocks both others
        assert_eq!(allocation.accepted_requests(), vec![RequestId(2)]);
    }

    #[test]
    fn test_disjoint_types_coexist() {
        let requests = vec![
            req(Category::Essentials, 0, 5, &[LockerUmbrella]),
            req(Category::Parking, 0, 5, &[ParkingSlot, BatteryCable]),
        ];
        for allocator in [
            GreedyAllocator::fcfs(),
            GreedyAllocator::ljf(),
            GreedyAllocator::priority(),
        ] {
            let allocation = allocator.allocate(&requests, PoolSizing::new(1, 1)).unwrap();
            assert_eq!(allocation.accepted_count(), 2);
        }
    }

    #[test]
    fn test_place_in_order_reports_rejected() {
        let requests = vec![
            req(Category::Parking, 0, 5, &[ParkingSlot]),
            req(Category::Parking, 1, 2, &[ParkingSlot]),
            req(Category::Parking, 6, 7, &[ParkingSlot]),
        ];
        let mut pool = ResourcePool::new(PoolSizing::new(1, 0));
        let rejected = GreedyAllocator::fcfs()
            .place_in_order(&mut pool, &requests, &[RequestId(2), RequestId(1), RequestId(0)])
            .unwrap();
        assert_eq!(rejected, vec![RequestId(0)]);
    }

    #[test]
    fn test_place_in_order_unknown_request() {
        let requests = vec![req(Category::Parking, 0, 5, &[ParkingSlot])];
        let mut pool = ResourcePool::new(PoolSizing::new(1, 0));
        let result = GreedyAllocator::fcfs().place_in_order(
            &mut pool,
            &requests,
            &[RequestId(0), RequestId(4)],
        );
        assert_eq!(result, Err(AllocationError::UnknownRequest(RequestId(4))));
        assert_eq!(pool.holders(RequestId(0)).len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let allocation = GreedyAllocator::ljf()
            .allocate(&[], PoolSizing::default())
            .unwrap();
        assert_eq!(allocation.accepted_count(), 0);
    }
}
