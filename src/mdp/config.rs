use crate::error::{Error, Result};

/// Discount factor used when none is configured.
pub const DEFAULT_DISCOUNT: f64 = 0.95;

/// Residual bound that stops value iteration when none is configured.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// How a sweep commits its value updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    /// Jacobi style: every backup reads the previous sweep's values, and the
    /// new values are committed together at the end of the sweep.
    #[default]
    Synchronous,
    /// Gauss-Seidel style: each value is committed as soon as it is computed,
    /// in canonical state order.
    Asynchronous,
}

/// Configuration for planning.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Weight of future reward, strictly between 0 and 1
    pub discount: f64,
    /// Stop once the largest per-state change in a sweep is below this
    pub epsilon: f64,
    /// Update discipline within a sweep
    pub update_rule: UpdateRule,
    /// Optional cap on the number of sweeps; `None` iterates until convergence
    pub max_sweeps: Option<usize>,
    /// Rescale task probabilities that sum past 1 instead of failing
    pub clamp_degenerate: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            epsilon: DEFAULT_EPSILON,
            update_rule: UpdateRule::default(),
            max_sweeps: None,
            clamp_degenerate: false,
        }
    }
}

impl SolverConfig {
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_update_rule(mut self, update_rule: UpdateRule) -> Self {
        self.update_rule = update_rule;
        self
    }

    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    pub fn with_clamp_degenerate(mut self, clamp: bool) -> Self {
        self.clamp_degenerate = clamp;
        self
    }

    /// Checks the configuration without adjusting it.
    ///
    /// # Errors
    /// * `Configuration` if the discount is not strictly inside `(0, 1)`, the
    ///   epsilon is not finite and positive, or the sweep cap is zero
    pub fn validate(&self) -> Result<()> {
        if !(self.discount > 0.0 && self.discount < 1.0) {
            return Err(Error::configuration(format!(
                "discount factor must be in (0, 1), got {}",
                self.discount
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::configuration(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if self.max_sweeps == Some(0) {
            return Err(Error::configuration("max_sweeps must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.discount, 0.95);
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.update_rule, UpdateRule::Synchronous);
        assert_eq!(config.max_sweeps, None);
        assert!(!config.clamp_degenerate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_discount_bounds_are_exclusive() {
        for discount in [0.0, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let config = SolverConfig::default().with_discount(discount);
            assert!(
                matches!(config.validate(), Err(Error::Configuration(_))),
                "discount {} accepted",
                discount
            );
        }
        assert!(SolverConfig::default()
            .with_discount(0.001)
            .validate()
            .is_ok());
        assert!(SolverConfig::default()
            .with_discount(0.999)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_epsilon_and_sweep_cap() {
        assert!(SolverConfig::default().with_epsilon(0.0).validate().is_err());
        assert!(SolverConfig::default()
            .with_epsilon(f64::NAN)
            .validate()
            .is_err());
        assert!(SolverConfig::default().with_max_sweeps(0).validate().is_err());
        assert!(SolverConfig::default().with_max_sweeps(1).validate().is_ok());
    }

    #[test]
    fn test_validate_does_not_clamp() {
        let config = SolverConfig::default().with_discount(1.2);
        let _ = config.validate();
        assert_eq!(config.discount, 1.2);
    }
}
