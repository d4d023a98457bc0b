//! Allocation result.

use serde::{Deserialize, Serialize};

use super::instance::{Instance, InstanceId};
use super::resource_pool::ResourcePool;
use crate::models::{PoolSizing, Request, RequestId, ResourceType};

/// A finished, read-only assignment of requests to instances.
///
/// A request is accepted if it holds a booking on some instance; every
/// other request of the input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pool: ResourcePool,
}

impl Allocation {
    /// An allocation in which nothing is placed.
    pub fn empty(sizing: PoolSizing) -> Self {
        Self {
            pool: ResourcePool::new(sizing),
        }
    }

    /// Underlying pool.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Consumes the allocation, returning the pool for further edits.
    pub fn into_pool(self) -> ResourcePool {
        self.pool
    }

    /// Pool sizing.
    pub fn sizing(&self) -> PoolSizing {
        self.pool.sizing()
    }

    /// Looks up an instance.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.pool.instance(id)
    }

    /// Instances of one type.
    pub fn instances(&self, rt: ResourceType) -> &[Instance] {
        self.pool.instances(rt)
    }

    /// Whether the request holds any booking.
    pub fn is_accepted(&self, id: RequestId) -> bool {
        self.pool.iter_instances().any(|inst| inst.holds(id))
    }

    /// Instances holding the request.
    pub fn holders(&self, id: RequestId) -> Vec<InstanceId> {
        self.pool.holders(id)
    }

    /// Accepted requests, ascending.
    pub fn accepted_requests(&self) -> Vec<RequestId> {
        self.pool.placed_requests().into_iter().collect()
    }

    /// Number of accepted requests.
    pub fn accepted_count(&self) -> usize {
        self.pool.placed_requests().len()
    }

    /// Requests of the input that were not placed, ascending.
    pub fn rejected(&self, requests: &[Request]) -> Vec<RequestId> {
        let placed = self.pool.placed_requests();
        (0..requests.len())
            .map(RequestId)
            .filter(|id| !placed.contains(id))
            .collect()
    }

    /// Booked hours over all instances.
    pub fn occupied_hours(&self) -> i64 {
        self.pool.occupied_hours()
    }
}

impl From<ResourcePool> for Allocation {
    fn from(pool: ResourcePool) -> Self {
        Self { pool }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_accepted_and_rejected() {
        let requests = vec![
            Request::new(Category::Parking, 0, 5, [ResourceType::ParkingSlot]).unwrap(),
            Request::new(Category::Parking, 3, 8, [ResourceType::ParkingSlot]).unwrap(),
        ];
        let mut pool = ResourcePool::new(PoolSizing::new(1, 1));
        for (i, r) in requests.iter().enumerate() {
            pool.try_place(RequestId(i), r).unwrap();
        }
        let allocation = Allocation::from(pool);

        assert!(allocation.is_accepted(RequestId(0)));
        assert!(!allocation.is_accepted(RequestId(1)));
        assert_eq!(allocation.accepted_requests(), vec![RequestId(0)]);
        assert_eq!(allocation.rejected(&requests), vec![RequestId(1)]);
        assert_eq!(allocation.accepted_count(), 1);
        assert_eq!(allocation.occupied_hours(), 6);
    }

    #[test]
    fn test_empty_allocation() {
        let allocation = Allocation::empty(PoolSizing::default());
        assert_eq!(allocation.accepted_count(), 0);
        assert_eq!(allocation.sizing(), PoolSizing::default());
        assert_eq!(allocation.instances(ResourceType::ParkingSlot).len(), 10);
    }

    #[test]
    fn test_serde_roundtrip_preserves_bookings() {
        let mut pool = ResourcePool::new(PoolSizing::new(1, 1));
        let r = Request::new(Category::Essentials, 2, 4, [ResourceType::ValetInflation]).unwrap();
        pool.try_place(RequestId(0), &r).unwrap();
        let allocation = Allocation::from(pool);

        let json = serde_json::to_string(&allocation).unwrap();
        let back: Allocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, allocation);
    }

    #[test]
    fn test_corrupt_allocation_cannot_reenter_a_pool() {
        let requests = vec![
            Request::new(Category::Parking, 10, 14, [ResourceType::ParkingSlot]).unwrap(),
            Request::new(Category::Parking, 0, 3, [ResourceType::ParkingSlot]).unwrap(),
        ];
        let mut pool = ResourcePool::new(PoolSizing::new(1, 1));
        for (i, r) in requests.iter().enumerate() {
            assert!(pool.try_place(RequestId(i), r).unwrap());
        }
        let mut value = serde_json::to_value(Allocation::from(pool)).unwrap();

        // Slot 0 holds [0,3] then [10,14]; store them the other way round.
        value["pool"]["instances"][0][0]["schedule"]["bookings"]
            .as_array_mut()
            .unwrap()
            .reverse();
        assert!(serde_json::from_value::<Allocation>(value).is_err());
    }
}
