//! Batch validation of request sets and allocations.
//!
//! Individual requests are checked when constructed; these functions
//! check properties of a whole set, or of an allocation that arrived from
//! outside (e.g. deserialized against a different request set), and report
//! every violation found.
//! Detects:
//! - Requests outside the observation horizon
//! - Bookings referencing unknown requests or the wrong interval
//! - Overlapping or unsorted bookings on an instance
//! - Partial, duplicated or misplaced multi-type placements
//! - Hours where a type is held more often than it has instances

use std::collections::BTreeMap;

use crate::models::{Request, RequestId, ResourceType};
use crate::pool::Allocation;
use crate::scheduler::ObservationWindow;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A request extends outside the horizon.
    OutsideHorizon,
    /// A booking names a request that is not in the input.
    UnknownRequest,
    /// A booking's interval differs from its request's.
    IntervalMismatch,
    /// Two bookings on one instance share an hour.
    Overlap,
    /// Bookings on an instance are not sorted by start.
    Unsorted,
    /// An accepted request is missing from some required type.
    PartialPlacement,
    /// A request is held by more than one instance of a type.
    DuplicatePlacement,
    /// A request is held by an instance of a type it did not ask for.
    UnrequiredType,
    /// More requests hold a type at some hour than it has instances.
    CapacityExceeded,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks that every request lies inside `horizon`.
///
/// # Returns
/// `Ok(())` if all requests fit, `Err(errors)` with one entry per request
/// that does not.
pub fn validate_requests(requests: &[Request], horizon: &ObservationWindow) -> ValidationResult {
    let errors: Vec<ValidationError> = requests
        .iter()
        .enumerate()
        .filter(|(_, r)| !horizon.contains(r))
        .map(|(i, r)| {
            ValidationError::new(
                ValidationErrorKind::OutsideHorizon,
                format!(
                    "Request {} [{}, {}] lies outside horizon [{}, {}]",
                    RequestId(i),
                    r.start(),
                    r.end(),
                    horizon.start,
                    horizon.end
                ),
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an allocation against its input requests.
///
/// Checks:
/// 1. Every booking refers to an existing request
/// 2. Every booking carries its request's interval
/// 3. Bookings on each instance are sorted by start
/// 4. No two bookings on an instance overlap
/// 5. Each accepted request is held by exactly one instance of every
///    required type and by no instance of any other type
/// 6. At no hour do more accepted requests need a type than it has
///    instances
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_allocation(allocation: &Allocation, requests: &[Request]) -> ValidationResult {
    let mut errors = Vec::new();
    // request -> (type -> holder count)
    let mut held: BTreeMap<RequestId, [usize; 4]> = BTreeMap::new();

    for rt in ResourceType::ALL {
        for inst in allocation.instances(rt) {
            let bookings = inst.bookings();

            for b in bookings {
                held.entry(b.request).or_default()[rt.index()] += 1;

                match requests.get(b.request.index()) {
                    None => errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownRequest,
                        format!("{} holds unknown request {}", inst.id(), b.request),
                    )),
                    Some(r) if r.start() != b.start || r.end() != b.end => {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::IntervalMismatch,
                            format!(
                                "{} books {} as [{}, {}], request is [{}, {}]",
                                inst.id(),
                                b.request,
                                b.start,
                                b.end,
                                r.start(),
                                r.end()
                            ),
                        ));
                    }
                    Some(_) => {}
                }
            }

            for pair in bookings.windows(2) {
                let (prev, next) = (&pair[0], &pair[1]);
                if next.start < prev.start {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::Unsorted,
                        format!(
                            "{}: {} starts before preceding {}",
                            inst.id(),
                            next.request,
                            prev.request
                        ),
                    ));
                }
                if next.start <= prev.end && prev.start <= next.end {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::Overlap,
                        format!(
                            "{}: {} [{}, {}] overlaps {} [{}, {}]",
                            inst.id(),
                            prev.request,
                            prev.start,
                            prev.end,
                            next.request,
                            next.start,
                            next.end
                        ),
                    ));
                }
            }
        }
    }

    for (id, counts) in &held {
        let Some(request) = requests.get(id.index()) else {
            continue;
        };
        for rt in ResourceType::ALL {
            let count = counts[rt.index()];
            if request.requires(rt) {
                if count == 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::PartialPlacement,
                        format!("{id} is accepted but holds no {rt}"),
                    ));
                } else if count > 1 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DuplicatePlacement,
                        format!("{id} is held by {count} instances of {rt}"),
                    ));
                }
            } else if count > 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnrequiredType,
                    format!("{id} is held by a {rt} it did not request"),
                ));
            }
        }
    }

    for rt in ResourceType::ALL {
        let capacity = allocation.instances(rt).len();
        let intervals = held
            .keys()
            .filter_map(|id| requests.get(id.index()))
            .filter(|r| r.requires(rt))
            .map(|r| (r.start(), r.end()));
        if let Some((hour, load)) = peak_load(intervals) {
            if load > capacity {
                errors.push(ValidationError::new(
                    ValidationErrorKind::CapacityExceeded,
                    format!("{load} requests hold {rt} at hour {hour}, capacity {capacity}"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Highest number of simultaneously open intervals and the first hour it
/// is reached.
fn peak_load(intervals: impl Iterator<Item = (i64, i64)>) -> Option<(i64, usize)> {
    // +1 at start, -1 after end; closings sort before openings at equal hours
    let mut events: Vec<(i64, i32)> = intervals
        .flat_map(|(start, end)| [(start, 1), (end + 1, -1)])
        .collect();
    events.sort_unstable();

    let mut open: i32 = 0;
    let mut peak: Option<(i64, usize)> = None;
    for (hour, delta) in events {
        open += delta;
        let load = open.max(0) as usize;
        if peak.map_or(true, |(_, p)| load > p) {
            peak = Some((hour, load));
        }
    }
    peak
}
