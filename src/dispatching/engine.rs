//! Rule engine for multi-criteria request ordering.
//!
//! Rules are applied in sequence; the next rule is consulted only on a tie.
//! Sorting is stable, so requests that tie on every rule keep their
//! arrival order.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchingRule, RuleScore};
use crate::models::{Request, RequestId};

/// A composable rule engine for request prioritization.
///
/// An engine with no rules keeps the input order, which is exactly
/// first-come-first-served.
///
/// # Example
/// ```
/// use u_booking::dispatching::{rules, RuleEngine};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::LargestWorkload)
///     .with_tie_breaker(rules::MostResourceTypes);
/// assert_eq!(engine.rule_names(), vec!["LWL", "MRT"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Arrival order.
    pub fn fcfs() -> Self {
        Self::new()
    }

    /// Largest `duration × |types|` first, then most types first.
    pub fn ljf() -> Self {
        Self::new()
            .with_rule(rules::LargestWorkload)
            .with_tie_breaker(rules::MostResourceTypes)
    }

    /// Highest category rank first, then earliest start.
    pub fn priority() -> Self {
        Self::new()
            .with_rule(rules::CategoryRank)
            .with_tie_breaker(rules::EarliestStart)
    }

    /// Adds a primary rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a rule consulted only when all earlier rules tie.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Sets the tolerance under which two scores count as tied.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Orders every request of the slice, highest priority first.
    pub fn sort_indices(&self, requests: &[Request]) -> Vec<RequestId> {
        let all: Vec<RequestId> = (0..requests.len()).map(RequestId).collect();
        self.sort_subset(requests, &all)
    }

    /// Orders a subset of the slice, highest priority first.
    ///
    /// Ties keep the order of `subset`.
    ///
    /// # Panics
    /// If an id in `subset` is not an index into `requests` and the engine
    /// has at least one rule.
    pub fn sort_subset(&self, requests: &[Request], subset: &[RequestId]) -> Vec<RequestId> {
        if self.rules.is_empty() {
            return subset.to_vec();
        }

        let mut keyed: Vec<(RequestId, Vec<RuleScore>)> = subset
            .iter()
            .map(|&id| (id, self.evaluate(&requests[id.index()])))
            .collect();
        keyed.sort_by(|(_, a), (_, b)| self.compare_scores(a, b));
        keyed.into_iter().map(|(id, _)| id).collect()
    }

    /// Scores from each rule for one request.
    pub fn evaluate(&self, request: &Request) -> Vec<RuleScore> {
        self.rules.iter().map(|r| r.evaluate(request)).collect()
    }

    fn compare_scores(&self, a: &[RuleScore], b: &[RuleScore]) -> Ordering {
        for (sa, sb) in a.iter().zip(b) {
            if (sa - sb).abs() > self.epsilon {
                return sa.partial_cmp(sb).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("epsilon", &self.epsilon)
            .finish()
    }
}
