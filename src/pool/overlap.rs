//! Sorted, non-overlapping booking list with binary-search conflict tests.

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;
use crate::models::{Request, RequestId};

/// One request's occupation of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Booking {
    /// The request holding the instance.
    pub request: RequestId,
    /// First occupied hour.
    pub start: i64,
    /// Last occupied hour (inclusive).
    pub end: i64,
}

impl Booking {
    /// Creates a booking.
    pub fn new(request: RequestId, start: i64, end: i64) -> Self {
        Self {
            request,
            start,
            end,
        }
    }

    /// Creates a booking covering the request's interval.
    pub fn for_request(id: RequestId, request: &Request) -> Self {
        Self::new(id, request.start(), request.end())
    }

    /// Occupied hours: `end - start + 1`.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start + 1
    }
}

/// Bookings of a single instance, sorted by start.
///
/// Maintains the invariant that bookings are sorted by `start` and pairwise
/// disjoint. Under that invariant only the last booking starting at or
/// before a candidate's end can overlap it, which makes the conflict test
/// a single binary search. Deserialization re-checks the invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OverlapRecord", into = "OverlapRecord")]
pub struct OverlapIndex {
    bookings: Vec<Booking>,
}

/// Unchecked wire form of an index.
#[derive(Serialize, Deserialize)]
struct OverlapRecord {
    bookings: Vec<Booking>,
}

impl OverlapIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `[start, end]` shares an hour with any booking.
    ///
    /// O(log n).
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        // Rightmost booking with start <= end
        let idx = self.bookings.partition_point(|b| b.start <= end);
        idx > 0 && self.bookings[idx - 1].end >= start
    }

    /// Inserts a booking at its sorted position.
    ///
    /// Returns `false` and leaves the index untouched if the booking would
    /// overlap an existing one.
    pub fn insert(&mut self, booking: Booking) -> bool {
        if self.overlaps(booking.start, booking.end) {
            return false;
        }
        let idx = self.bookings.partition_point(|b| b.start < booking.start);
        self.bookings.insert(idx, booking);
        true
    }

    /// Removes the booking held by `request`, keeping the order.
    pub fn remove(&mut self, request: RequestId) -> Option<Booking> {
        let idx = self.bookings.iter().position(|b| b.request == request)?;
        Some(self.bookings.remove(idx))
    }

    /// Whether `request` holds a booking here.
    pub fn contains(&self, request: RequestId) -> bool {
        self.bookings.iter().any(|b| b.request == request)
    }

    /// Bookings in start order.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Number of bookings.
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    /// Whether the index holds no bookings.
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    /// Sum of booking durations.
    pub fn occupied_hours(&self) -> i64 {
        self.bookings.iter().map(Booking::duration).sum()
    }

    /// Replaces the bookings without any ordering check.
    #[cfg(test)]
    pub(crate) fn set_bookings_unchecked(&mut self, bookings: Vec<Booking>) {
        self.bookings = bookings;
    }
}

impl TryFrom<OverlapRecord> for OverlapIndex {
    type Error = AllocationError;

    fn try_from(record: OverlapRecord) -> Result<Self, Self::Error> {
        if let Some(b) = record.bookings.iter().find(|b| b.start > b.end) {
            return Err(AllocationError::InvertedBooking {
                request: b.request,
                start: b.start,
                end: b.end,
            });
        }
        for pair in record.bookings.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start <= prev.end {
                return Err(AllocationError::DisorderedBookings {
                    earlier: prev.request,
                    later: next.request,
                    start: next.start,
                    end: next.end,
                });
            }
        }
        Ok(Self {
            bookings: record.bookings,
        })
    }
}

impl From<OverlapIndex> for OverlapRecord {
    fn from(index: OverlapIndex) -> Self {
        Self {
            bookings: index.bookings,
        }
    }
}
