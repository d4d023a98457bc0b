//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Size-based**: LWL (largest workload), MRT (most resource types)
//! - **Class-based**: RANK (category rank)
//! - **Time-based**: EST (earliest start)
//!
//! # Score Convention
//! All rules return lower scores for requests that should be placed first.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

use super::{DispatchingRule, RuleScore};
use crate::models::Request;

// ======================== Size-based rules ========================

/// Largest Workload.
///
/// Prioritizes requests with the largest `duration × |required_types|`,
/// i.e. the most instance-hours. Placing big multi-resource jobs first
/// leaves less fragmentation to block them later.
///
/// # Reference
/// Graham (1969), longest-processing-time-first list scheduling.
#[derive(Debug, Clone, Copy)]
pub struct LargestWorkload;

impl DispatchingRule for LargestWorkload {
    fn name(&self) -> &'static str {
        "LWL"
    }

    fn evaluate(&self, request: &Request) -> RuleScore {
        -(request.workload() as f64)
    }

    fn description(&self) -> &'static str {
        "Largest Workload"
    }
}

/// Most Resource Types.
///
/// Prioritizes requests needing more distinct resource types.
#[derive(Debug, Clone, Copy)]
pub struct MostResourceTypes;

impl DispatchingRule for MostResourceTypes {
    fn name(&self) -> &'static str {
        "MRT"
    }

    fn evaluate(&self, request: &Request) -> RuleScore {
        -(request.type_count() as f64)
    }

    fn description(&self) -> &'static str {
        "Most Resource Types"
    }
}

// ======================== Class-based rule ========================

/// Category rank.
///
/// Event > Reservation > Parking > Essentials.
/// (Negated because lower score = higher priority in convention.)
#[derive(Debug, Clone, Copy)]
pub struct CategoryRank;

impl DispatchingRule for CategoryRank {
    fn name(&self) -> &'static str {
        "RANK"
    }

    fn evaluate(&self, request: &Request) -> RuleScore {
        -f64::from(request.category().rank())
    }

    fn description(&self) -> &'static str {
        "Category Rank"
    }
}

// ======================== Time-based rule ========================

/// Earliest Start.
#[derive(Debug, Clone, Copy)]
pub struct EarliestStart;

impl DispatchingRule for EarliestStart {
    fn name(&self) -> &'static str {
        "EST"
    }

    fn evaluate(&self, request: &Request) -> RuleScore {
        request.start() as f64
    }

    fn description(&self) -> &'static str {
        "Earliest Start"
    }
}
