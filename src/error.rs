//! Error types.
//!
//! Request construction, pool mutation and the annealing optimizer each
//! have their own error enum; [`Error`] unifies them for policy runs.

use thiserror::Error;

use crate::models::{Category, RequestId, ResourceSet};
use crate::pool::InstanceId;

/// A request violates the engine's input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// `start > end`.
    #[error("request interval is inverted: start {start} > end {end}")]
    InvertedInterval { start: i64, end: i64 },

    /// Hour indices start at 0.
    #[error("request starts at negative hour {0}")]
    NegativeStart(i64),

    /// The interval ends past the last representable hour.
    #[error("request ends at hour {end}, past the last allowed hour {max}")]
    EndOutOfRange { end: i64, max: i64 },

    /// No resource type was requested.
    #[error("request requires no resource types")]
    EmptyTypeSet,

    /// Resource type id outside `0..=3`.
    #[error("unknown resource type id {0}")]
    UnknownResourceType(u8),

    /// The type set is not allowed for the category.
    #[error("category {category} cannot require resource types {types}")]
    CategoryMismatch {
        category: Category,
        types: ResourceSet,
    },
}

/// A pool mutation could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Inserting the booking would overlap an existing one.
    #[error("booking {request} [{start}, {end}] overlaps an existing booking on {instance}")]
    Overlap {
        instance: InstanceId,
        request: RequestId,
        start: i64,
        end: i64,
    },

    /// The id does not index the request slice.
    #[error("request {0} is not in the request set")]
    UnknownRequest(RequestId),

    /// The instance index is outside the pool sizing.
    #[error("instance {0} does not exist in this pool")]
    UnknownInstance(InstanceId),

    /// A booking ends before it starts.
    #[error("booking {request} is inverted: start {start} > end {end}")]
    InvertedBooking {
        request: RequestId,
        start: i64,
        end: i64,
    },

    /// A booking list is not sorted by start or has overlapping entries.
    #[error("booking {later} [{start}, {end}] does not start after {earlier} ends")]
    DisorderedBookings {
        earlier: RequestId,
        later: RequestId,
        start: i64,
        end: i64,
    },

    /// Removal of a booking that is not present.
    #[error("request {request} is not booked on {instance}")]
    BookingNotFound {
        instance: InstanceId,
        request: RequestId,
    },
}

/// The annealing optimizer failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    #[error("invalid annealing configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Any engine failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

pub type Result<T> = std::result::Result<T, Error>;
