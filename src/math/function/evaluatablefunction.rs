/// A function of one real variable that grids are refined against.
///
/// Implementations return zero outside their support, so callers never have
/// to special-case thresholds when sampling.
pub trait EvaluatableFunction: Send + Sync {
    fn evaluate(&self, x: f64) -> f64;

    /// Lower edge of the support. Below it the function is zero.
    fn threshold(&self) -> f64 {
        f64::NEG_INFINITY
    }

    /// Upper edge of the support. Above it the function is zero.
    fn upper_bound(&self) -> f64 {
        f64::INFINITY
    }

    fn is_supported(&self, x: f64) -> bool {
        x >= self.threshold() && x <= self.upper_bound()
    }
}
