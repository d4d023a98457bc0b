//! Booking request model.
//!
//! A request asks for one instance of each required resource type over an
//! inclusive interval of hour indices. The category determines which type
//! sets are legal; a `Request` value that exists has already passed that
//! check.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ResourceSet, ResourceType};
use crate::error::RequestError;

/// Booking category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Parking slot plus any subset of the essentials.
    Event,
    /// Parking slot plus exactly one essential.
    Reservation,
    /// Parking slot plus at most one essential.
    Parking,
    /// Exactly one essential, no parking slot.
    Essentials,
}

impl Category {
    /// All categories, highest rank first.
    pub const ALL: [Category; 4] = [
        Category::Event,
        Category::Reservation,
        Category::Parking,
        Category::Essentials,
    ];

    /// Priority rank (higher = placed earlier by the priority policy).
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Category::Event => 4,
            Category::Reservation => 3,
            Category::Parking => 2,
            Category::Essentials => 1,
        }
    }

    /// Whether `types` is a legal type set for this category.
    pub fn admits(self, types: ResourceSet) -> bool {
        let parking = types.contains(ResourceType::ParkingSlot);
        let essentials = types.essential_count();
        match self {
            Category::Event => parking,
            Category::Reservation => parking && essentials == 1,
            Category::Parking => parking && essentials <= 1,
            Category::Essentials => !parking && essentials == 1,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Event => "Event",
            Category::Reservation => "Reservation",
            Category::Parking => "Parking",
            Category::Essentials => "Essentials",
        };
        f.write_str(name)
    }
}

/// Identifies a request by its position in the input slice.
///
/// Two requests with equal fields are still distinct requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub usize);

impl RequestId {
    /// Index into the request slice.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// A validated booking request.
///
/// # Time Representation
/// `start` and `end` are inclusive hour indices; a request covering hours
/// 3, 4 and 5 has `start = 3`, `end = 5` and a duration of 3.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RequestRecord", into = "RequestRecord")]
pub struct Request {
    start: i64,
    end: i64,
    required_types: ResourceSet,
    category: Category,
}

/// Unvalidated wire form of a request.
#[derive(Serialize, Deserialize)]
struct RequestRecord {
    start: i64,
    end: i64,
    required_types: ResourceSet,
    category: Category,
}

impl Request {
    /// Latest hour a request may occupy.
    ///
    /// Keeps durations, workloads and pool-wide hour sums well inside `i64`.
    pub const MAX_HOUR: i64 = 1 << 40;

    /// Creates a request, checking the interval and the category rules.
    ///
    /// # Errors
    /// - [`RequestError::NegativeStart`] if `start < 0`
    /// - [`RequestError::InvertedInterval`] if `start > end`
    /// - [`RequestError::EndOutOfRange`] if `end > Request::MAX_HOUR`
    /// - [`RequestError::EmptyTypeSet`] if no type is required
    /// - [`RequestError::CategoryMismatch`] if the category forbids the type set
    pub fn new(
        category: Category,
        start: i64,
        end: i64,
        required_types: impl IntoIterator<Item = ResourceType>,
    ) -> Result<Self, RequestError> {
        let required_types: ResourceSet = required_types.into_iter().collect();

        if start < 0 {
            return Err(RequestError::NegativeStart(start));
        }
        if start > end {
            return Err(RequestError::InvertedInterval { start, end });
        }
        if end > Self::MAX_HOUR {
            return Err(RequestError::EndOutOfRange {
                end,
                max: Self::MAX_HOUR,
            });
        }
        if required_types.is_empty() {
            return Err(RequestError::EmptyTypeSet);
        }
        if !category.admits(required_types) {
            return Err(RequestError::CategoryMismatch {
                category,
                types: required_types,
            });
        }

        Ok(Self {
            start,
            end,
            required_types,
            category,
        })
    }

    /// Creates a request from numeric type ids.
    pub fn from_type_ids(
        category: Category,
        start: i64,
        end: i64,
        type_ids: &[u8],
    ) -> Result<Self, RequestError> {
        let types = type_ids
            .iter()
            .map(|&id| ResourceType::from_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(category, start, end, types)
    }

    /// First occupied hour.
    #[inline]
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last occupied hour (inclusive).
    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of occupied hours: `end - start + 1`.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Required resource types.
    #[inline]
    pub fn required_types(&self) -> ResourceSet {
        self.required_types
    }

    /// Booking category.
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether the request needs an instance of `rt`.
    #[inline]
    pub fn requires(&self, rt: ResourceType) -> bool {
        self.required_types.contains(rt)
    }

    /// Number of required types.
    #[inline]
    pub fn type_count(&self) -> usize {
        self.required_types.len()
    }

    /// Instance-hours the request occupies when accepted:
    /// `duration × |required_types|`.
    #[inline]
    pub fn workload(&self) -> i64 {
        self.duration() * self.type_count() as i64
    }

    /// Whether the two requests share at least one hour.
    #[inline]
    pub fn overlaps(&self, other: &Request) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl TryFrom<RequestRecord> for Request {
    type Error = RequestError;

    fn try_from(record: RequestRecord) -> Result<Self, Self::Error> {
        Request::new(
            record.category,
            record.start,
            record.end,
            record.required_types.iter(),
        )
    }
}

impl From<Request> for RequestRecord {
    fn from(request: Request) -> Self {
        Self {
            start: request.start,
            end: request.end,
            required_types: request.required_types,
            category: request.category,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}] {}",
            self.category, self.start, self.end, self.required_types
        )
    }
}
