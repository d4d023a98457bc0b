//! A single resource instance and its bookings.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::overlap::{Booking, OverlapIndex};
use crate::error::AllocationError;
use crate::models::{Request, RequestId, ResourceType};

/// Identifies one instance: its type plus its position in that type's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    /// Resource type.
    pub resource_type: ResourceType,
    /// Zero-based index within the type.
    pub index: usize,
}

impl InstanceId {
    /// Creates an instance id.
    pub fn new(resource_type: ResourceType, index: usize) -> Self {
        Self {
            resource_type,
            index,
        }
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.resource_type, self.index)
    }
}

/// One interchangeable unit of a resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    id: InstanceId,
    schedule: OverlapIndex,
}

impl Instance {
    /// Creates an instance with no bookings.
    pub fn new(id: InstanceId) -> Self {
        Self {
            id,
            schedule: OverlapIndex::new(),
        }
    }

    /// Instance id.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Resource type.
    pub fn resource_type(&self) -> ResourceType {
        self.id.resource_type
    }

    /// Whether `[start, end]` collides with a booking here.
    #[inline]
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.schedule.overlaps(start, end)
    }

    /// Whether the request's interval fits on this instance.
    #[inline]
    pub fn is_free_for(&self, request: &Request) -> bool {
        !self.overlaps(request.start(), request.end())
    }

    /// Books the request's interval.
    ///
    /// # Errors
    /// [`AllocationError::Overlap`] if the interval collides with a booking.
    pub fn insert(&mut self, id: RequestId, request: &Request) -> Result<(), AllocationError> {
        let booking = Booking::for_request(id, request);
        if self.schedule.insert(booking) {
            Ok(())
        } else {
            Err(AllocationError::Overlap {
                instance: self.id,
                request: id,
                start: booking.start,
                end: booking.end,
            })
        }
    }

    /// Removes the request's booking.
    ///
    /// # Errors
    /// [`AllocationError::BookingNotFound`] if the request holds nothing here.
    pub fn remove(&mut self, request: RequestId) -> Result<Booking, AllocationError> {
        self.schedule
            .remove(request)
            .ok_or(AllocationError::BookingNotFound {
                instance: self.id,
                request,
            })
    }

    /// Whether the request holds a booking here.
    pub fn holds(&self, request: RequestId) -> bool {
        self.schedule.contains(request)
    }

    /// Bookings in start order.
    pub fn bookings(&self) -> &[Booking] {
        self.schedule.bookings()
    }

    /// Total booked hours.
    pub fn occupied_hours(&self) -> i64 {
        self.schedule.occupied_hours()
    }

    #[cfg(test)]
    pub(crate) fn set_bookings_unchecked(&mut self, bookings: Vec<Booking>) {
        self.schedule.set_bookings_unchecked(bookings);
    }
}
