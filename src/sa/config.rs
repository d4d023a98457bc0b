//! Annealing configuration.

use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;

/// Simulated-annealing parameters.
///
/// # Cooling
/// Geometric: `T_i = max(T0 × decay^i, min_temperature)`.
///
/// # Example
/// ```
/// use u_booking::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_max_iterations(500)
///     .with_eviction_probability(0.2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaConfig {
    /// Probability `p` that a feasible placement is kept.
    pub keep_probability: f64,
    /// Probability `q` that a placed request is evicted in a move.
    pub eviction_probability: f64,
    /// Number of iterations.
    pub max_iterations: usize,
    /// Starting temperature `T0`.
    pub initial_temperature: f64,
    /// Geometric decay factor per iteration.
    pub decay: f64,
    /// Temperature floor.
    pub min_temperature: f64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            keep_probability: 0.95,
            eviction_probability: 0.3,
            max_iterations: 2000,
            initial_temperature: 10.0,
            decay: 0.995,
            min_temperature: 1e-6,
        }
    }
}

impl SaConfig {
    /// Derives `T0` and `decay` from target acceptance probabilities.
    ///
    /// A move that lowers utilization by `|reference_delta|` is accepted
    /// with probability `initial_acceptance` at iteration 0 and
    /// `final_acceptance` at iteration `max_iterations`:
    ///
    /// ```text
    /// T_start = reference_delta / ln(initial_acceptance)
    /// T_end   = reference_delta / ln(final_acceptance)
    /// decay   = (T_end / T_start)^(1 / max_iterations)
    /// ```
    ///
    /// # Errors
    /// [`OptimizerError::InvalidConfig`] unless `reference_delta < 0`,
    /// `0 < final_acceptance < initial_acceptance < 1` and
    /// `max_iterations > 0`.
    pub fn calibrated(
        reference_delta: f64,
        initial_acceptance: f64,
        final_acceptance: f64,
        max_iterations: usize,
    ) -> Result<Self, OptimizerError> {
        if reference_delta.is_nan() || reference_delta >= 0.0 {
            return Err(OptimizerError::InvalidConfig(format!(
                "reference delta must be negative, got {reference_delta}"
            )));
        }
        if !(0.0 < final_acceptance
            && final_acceptance < initial_acceptance
            && initial_acceptance < 1.0)
        {
            return Err(OptimizerError::InvalidConfig(format!(
                "need 0 < final ({final_acceptance}) < initial ({initial_acceptance}) < 1"
            )));
        }
        if max_iterations == 0 {
            return Err(OptimizerError::InvalidConfig(
                "calibration needs at least one iteration".into(),
            ));
        }

        let start = reference_delta / initial_acceptance.ln();
        let end = reference_delta / final_acceptance.ln();
        let decay = (end / start).powf(1.0 / max_iterations as f64);

        Ok(Self::default()
            .with_initial_temperature(start)
            .with_decay(decay)
            .with_max_iterations(max_iterations))
    }

    /// Sets the keep probability `p`.
    pub fn with_keep_probability(mut self, p: f64) -> Self {
        self.keep_probability = p;
        self
    }

    /// Sets the eviction probability `q`.
    pub fn with_eviction_probability(mut self, q: f64) -> Self {
        self.eviction_probability = q;
        self
    }

    /// Sets the iteration count.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the starting temperature.
    pub fn with_initial_temperature(mut self, t0: f64) -> Self {
        self.initial_temperature = t0;
        self
    }

    /// Sets the geometric decay factor.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Sets the temperature floor.
    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    /// Temperature at iteration `i`.
    #[inline]
    pub fn temperature(&self, i: usize) -> f64 {
        (self.initial_temperature * self.decay.powf(i as f64)).max(self.min_temperature)
    }

    /// Checks every parameter.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.keep_probability) {
            return Err(OptimizerError::InvalidConfig(format!(
                "keep probability {} outside [0, 1]",
                self.keep_probability
            )));
        }
        if !unit.contains(&self.eviction_probability) {
            return Err(OptimizerError::InvalidConfig(format!(
                "eviction probability {} outside [0, 1]",
                self.eviction_probability
            )));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(OptimizerError::InvalidConfig(format!(
                "initial temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(OptimizerError::InvalidConfig(format!(
                "decay {} outside (0, 1]",
                self.decay
            )));
        }
        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return Err(OptimizerError::InvalidConfig(format!(
                "temperature floor must be positive, got {}",
                self.min_temperature
            )));
        }
        Ok(())
    }
}
