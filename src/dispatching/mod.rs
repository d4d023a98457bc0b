//! Dispatching rules and rule engine for request ordering.
//!
//! Every allocation policy is "order the requests, then place greedily".
//! The order comes from a [`RuleEngine`]: a chain of rules where each
//! later rule only breaks ties left by the earlier ones, and requests that
//! tie on every rule keep their input order.
//!
//! # Usage
//!
//! ```
//! use u_booking::dispatching::{rules, RuleEngine};
//! use u_booking::models::{Category, Request, RequestId, ResourceType};
//!
//! let requests = vec![
//!     Request::new(Category::Parking, 4, 6, [ResourceType::ParkingSlot]).unwrap(),
//!     Request::new(Category::Event, 8, 9, [ResourceType::ParkingSlot]).unwrap(),
//!     Request::new(Category::Parking, 1, 2, [ResourceType::ParkingSlot]).unwrap(),
//! ];
//! let engine = RuleEngine::new()
//!     .with_rule(rules::CategoryRank)
//!     .with_tie_breaker(rules::EarliestStart);
//! let order = engine.sort_indices(&requests);
//! assert_eq!(order, vec![RequestId(1), RequestId(2), RequestId(0)]);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (LPT)

mod engine;
pub mod rules;

pub use engine::RuleEngine;

use crate::models::Request;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (placed first).
pub type RuleScore = f64;

/// A dispatching rule that scores a request.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules that favour large values
/// (workload, category rank) return the negated value.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "LWL", "RANK").
    fn name(&self) -> &'static str;

    /// Scores a request. Lower = placed earlier.
    fn evaluate(&self, request: &Request) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
