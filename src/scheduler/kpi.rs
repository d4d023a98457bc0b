//! Allocation quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Received | Number of input requests |
//! | Assigned | Requests holding their full type set |
//! | Rejected | Received - Assigned |
//! | Assignment Rate | Assigned / Received |
//! | Utilization | Occupied instance-hours / (instances × T) |
//! | Utilization by Type | Same ratio per resource type |

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::UtilizationEvaluator;
use crate::models::{Request, RequestId, ResourceType};
use crate::pool::Allocation;

/// Allocation performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationKpi {
    /// Requests in the input.
    pub received: usize,
    /// Requests accepted.
    pub assigned: usize,
    /// Requests rejected.
    pub rejected: usize,
    /// Fraction accepted (0 with no requests).
    pub assignment_rate: f64,
    /// Fraction rejected (0 with no requests).
    pub rejection_rate: f64,
    /// Overall utilization (0.0..1.0).
    pub utilization: f64,
    /// Utilization per resource type.
    pub utilization_by_type: BTreeMap<ResourceType, f64>,
}

impl AllocationKpi {
    /// Computes KPIs from an allocation and its input requests.
    pub fn calculate(allocation: &Allocation, requests: &[Request]) -> Self {
        let received = requests.len();
        let assigned = (0..received)
            .filter(|&i| allocation.is_accepted(RequestId(i)))
            .count();
        let rejected = received - assigned;

        let (assignment_rate, rejection_rate) = if received == 0 {
            (0.0, 0.0)
        } else {
            (
                assigned as f64 / received as f64,
                rejected as f64 / received as f64,
            )
        };

        let evaluator = UtilizationEvaluator::new(requests);
        let utilization_by_type = ResourceType::ALL
            .into_iter()
            .map(|rt| (rt, evaluator.evaluate_type(allocation.pool(), rt)))
            .collect();

        Self {
            received,
            assigned,
            rejected,
            assignment_rate,
            rejection_rate,
            utilization: evaluator.evaluate(allocation),
            utilization_by_type,
        }
    }

    /// Whether the allocation meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_rejection_rate: f64, min_utilization: f64) -> bool {
        self.rejection_rate <= max_rejection_rate && self.utilization >= min_utilization
    }
}

impl fmt::Display for AllocationKpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.received == 0 {
            writeln!(f, "No bookings received.")?;
        } else {
            writeln!(f, "Bookings received: {} (100.00%)", self.received)?;
            writeln!(
                f,
                "Bookings assigned: {} ({:.2}%)",
                self.assigned,
                self.assignment_rate * 100.0
            )?;
            writeln!(
                f,
                "Bookings rejected: {} ({:.2}%)",
                self.rejected,
                self.rejection_rate * 100.0
            )?;
        }
        writeln!(f, "Utilization: {:.2}%", self.utilization * 100.0)?;
        for (rt, u) in &self.utilization_by_type {
            writeln!(f, "  {:<16} {:.2}%", rt.name(), u * 100.0)?;
        }
        Ok(())
    }
}
