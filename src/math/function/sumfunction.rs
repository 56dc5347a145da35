use std::sync::Arc;

use crate::error::griderror::GridError;
use crate::math::function::evaluatablefunction::EvaluatableFunction;

/// Pointwise sum of several functions, added in insertion order.
#[derive(Clone)]
pub struct SumFunction {
    components: Vec<Arc<dyn EvaluatableFunction>>,
}

impl SumFunction {
    pub fn new(components: Vec<Arc<dyn EvaluatableFunction>>) -> Result<SumFunction, GridError> {
        if components.is_empty() {
            return Err(GridError::configuration("a sum needs at least one component"));
        }
        Ok(SumFunction { components })
    }

    pub fn components(&self) -> &[Arc<dyn EvaluatableFunction>] {
        &self.components
    }
}

impl EvaluatableFunction for SumFunction {
    fn evaluate(&self, x: f64) -> f64 {
        self.components
            .iter()
            .fold(0.0, |acc, component| acc + component.evaluate(x))
    }

    fn threshold(&self) -> f64 {
        self.components
            .iter()
            .map(|c| c.threshold())
            .fold(f64::INFINITY, f64::min)
    }

    fn upper_bound(&self) -> f64 {
        self.components
            .iter()
            .map(|c| c.upper_bound())
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
