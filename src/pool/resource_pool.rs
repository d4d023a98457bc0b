//! Resource pool: per-type instance lists with all-or-nothing placement.
//!
//! # Algorithm
//! A request is placed by scanning its required types in ascending id
//! order and taking, for each type, the lowest-indexed instance whose
//! bookings do not overlap the request's interval. If any type has no free
//! instance the request is not placed at all; otherwise every chosen
//! instance receives the booking.
//!
//! Search and commit are separate steps so callers can decide on a found
//! placement (accept, or drop it) before the pool changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::instance::{Instance, InstanceId};
#[cfg(test)]
use super::overlap::Booking;
use crate::error::AllocationError;
use crate::models::{PoolSizing, Request, RequestId, ResourceType};

/// Instances chosen for one request, one per required type, in type order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Target instances.
    pub targets: Vec<InstanceId>,
}

/// The full set of instances of all four resource types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    sizing: PoolSizing,
    instances: [Vec<Instance>; 4],
}

impl ResourcePool {
    /// Creates an empty pool sized by `sizing`.
    pub fn new(sizing: PoolSizing) -> Self {
        let instances: [Vec<Instance>; 4] = ResourceType::ALL.map(|rt| {
            (0..sizing.instances_of(rt))
                .map(|i| Instance::new(InstanceId::new(rt, i)))
                .collect()
        });
        Self { sizing, instances }
    }

    /// Pool sizing.
    pub fn sizing(&self) -> PoolSizing {
        self.sizing
    }

    /// Instances of one type, in index order.
    pub fn instances(&self, rt: ResourceType) -> &[Instance] {
        &self.instances[rt.index()]
    }

    /// Looks up an instance.
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances[id.resource_type.index()].get(id.index)
    }

    fn instance_mut(&mut self, id: InstanceId) -> Result<&mut Instance, AllocationError> {
        self.instances[id.resource_type.index()]
            .get_mut(id.index)
            .ok_or(AllocationError::UnknownInstance(id))
    }

    /// All instances, grouped by type in id order.
    pub fn iter_instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter().flatten()
    }

    /// Total number of instances.
    pub fn total_instances(&self) -> usize {
        self.instances.iter().map(Vec::len).sum()
    }

    /// Finds the first free instance of every required type.
    ///
    /// Returns `None` if some type has no free instance. Never mutates.
    pub fn find_placement(&self, request: &Request) -> Option<Placement> {
        let targets = request
            .required_types()
            .iter()
            .map(|rt| {
                self.instances(rt)
                    .iter()
                    .find(|inst| inst.is_free_for(request))
                    .map(Instance::id)
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Placement { targets })
    }

    /// Books the request on every target of `placement`.
    ///
    /// Either every target receives the booking or none does: on failure
    /// the bookings already made are rolled back.
    pub fn commit(
        &mut self,
        id: RequestId,
        request: &Request,
        placement: &Placement,
    ) -> Result<(), AllocationError> {
        for (done, &target) in placement.targets.iter().enumerate() {
            let result = self
                .instance_mut(target)
                .and_then(|inst| inst.insert(id, request));
            if let Err(err) = result {
                for &placed in &placement.targets[..done] {
                    let undone = self
                        .instance_mut(placed)
                        .and_then(|inst| inst.remove(id));
                    debug_assert!(undone.is_ok(), "rollback of {id} on {placed} failed");
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Finds and commits a placement in one step.
    ///
    /// Returns `Ok(false)` if the request does not fit.
    pub fn try_place(&mut self, id: RequestId, request: &Request) -> Result<bool, AllocationError> {
        match self.find_placement(request) {
            Some(placement) => {
                self.commit(id, request, &placement)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the request from every instance of its required types.
    ///
    /// Returns the instances that held it. Evicting a request that holds
    /// nothing is a no-op returning an empty list.
    pub fn evict(
        &mut self,
        id: RequestId,
        request: &Request,
    ) -> Result<Vec<InstanceId>, AllocationError> {
        let holders: Vec<InstanceId> = request
            .required_types()
            .iter()
            .flat_map(|rt| self.instances(rt).iter())
            .filter(|inst| inst.holds(id))
            .map(Instance::id)
            .collect();
        for &holder in &holders {
            self.instance_mut(holder)?.remove(id)?;
        }
        Ok(holders)
    }

    /// Instances currently holding the request.
    pub fn holders(&self, id: RequestId) -> Vec<InstanceId> {
        self.iter_instances()
            .filter(|inst| inst.holds(id))
            .map(Instance::id)
            .collect()
    }

    /// Requests holding at least one booking, in ascending id order.
    pub fn placed_requests(&self) -> BTreeSet<RequestId> {
        self.iter_instances()
            .flat_map(|inst| inst.bookings().iter().map(|b| b.request))
            .collect()
    }

    /// Booked hours summed over every instance.
    pub fn occupied_hours(&self) -> i64 {
        self.iter_instances().map(Instance::occupied_hours).sum()
    }

    /// Booked hours summed over the instances of one type.
    pub fn occupied_hours_of(&self, rt: ResourceType) -> i64 {
        self.instances(rt).iter().map(Instance::occupied_hours).sum()
    }

    /// Overwrites one instance's bookings, bypassing the overlap checks.
    #[cfg(test)]
    pub(crate) fn set_bookings_unchecked(&mut self, id: InstanceId, bookings: Vec<Booking>) {
        self.instances[id.resource_type.index()][id.index].set_bookings_unchecked(bookings);
    }
}
