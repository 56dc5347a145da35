use std::sync::Arc;

use crate::error::griderror::GridError;
use crate::math::function::evaluatablefunction::EvaluatableFunction;

/// Closed-form function backed by a closure, optionally restricted to a support interval.
#[derive(Clone)]
pub struct AnalyticFunction {
    evaluator: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    threshold: f64,
    upper_bound: f64,
}

impl AnalyticFunction {
    pub fn new<F>(evaluator: F) -> AnalyticFunction
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        AnalyticFunction {
            evaluator: Arc::new(evaluator),
            threshold: f64::NEG_INFINITY,
            upper_bound: f64::INFINITY,
        }
    }

    pub fn constant(value: f64) -> AnalyticFunction {
        AnalyticFunction::new(move |_| value)
    }

    /// Restricts the function to `[threshold, upper_bound]`.
    pub fn with_support(
        mut self,
        threshold: f64,
        upper_bound: f64,
    ) -> Result<AnalyticFunction, GridError> {
        if threshold.is_nan() || upper_bound.is_nan() || threshold > upper_bound {
            return Err(GridError::configuration(format!(
                "invalid support [{threshold}, {upper_bound}]"
            )));
        }
        self.threshold = threshold;
        self.upper_bound = upper_bound;
        Ok(self)
    }
}

impl EvaluatableFunction for AnalyticFunction {
    fn evaluate(&self, x: f64) -> f64 {
        if self.is_supported(x) {
            (self.evaluator)(x)
        } else {
            0.0
        }
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}
