use serde::{
    Deserialize,
    Serialize
};

use crate::math::clamp::clamp_to_positive_minimum;

// ─────────────────────────────────────────────
// InterpolationPolicy
// ─────────────────────────────────────────────
//
// Naming is <dependent><independent>: LinLog interpolates y linearly in ln(x),
// LogLin interpolates ln(y) linearly in x.
//
//   LinLin : y = y0 + (y1-y0) * (x-x0)/(x1-x0)
//   LinLog : y = y0 + (y1-y0) * ln(x/x0)/ln(x1/x0)
//   LogLin : y = y0 * (y1/y0)^((x-x0)/(x1-x0))
//   LogLog : y = y0 * (y1/y0)^(ln(x/x0)/ln(x1/x0))

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum InterpolationPolicy {
    #[default]
    LinLin,
    LinLog,
    LogLin,
    LogLog,
}

impl InterpolationPolicy {
    pub fn is_log_x(&self) -> bool {
        matches!(self, InterpolationPolicy::LinLog | InterpolationPolicy::LogLog)
    }

    pub fn is_log_y(&self) -> bool {
        matches!(self, InterpolationPolicy::LogLin | InterpolationPolicy::LogLog)
    }

    /// Arithmetic midpoint for linear-x policies, geometric midpoint for log-x.
    #[inline]
    pub fn midpoint(&self, x0: f64, x1: f64) -> f64 {
        if self.is_log_x() {
            x0.sqrt() * x1.sqrt()
        } else {
            0.5 * (x0 + x1)
        }
    }

    /// Position of `x` in `[x0, x1]` measured on the independent axis.
    #[inline]
    fn fraction(&self, x0: f64, x1: f64, x: f64) -> f64 {
        if self.is_log_x() {
            (x / x0).ln() / (x1 / x0).ln()
        } else {
            (x - x0) / (x1 - x0)
        }
    }

    #[inline]
    pub fn interpolate(&self, x0: f64, x1: f64, y0: f64, y1: f64, x: f64) -> f64 {
        let t = self.fraction(x0, x1, x);
        if self.is_log_y() {
            (y0.ln() + t * (y1 / y0).ln()).exp()
        } else {
            f64::mul_add(y1 - y0, t, y0)
        }
    }

    /// Interpolates between tabulated nodes. Nodes return their own value. Under
    /// log-y policies exact zeros are replaced by `value_floor`, and a segment
    /// that is zero at both ends stays zero.
    pub fn interpolate_with_floor(
        &self,
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
        x: f64,
        value_floor: f64,
    ) -> f64 {
        if x == x0 {
            return y0;
        }
        if x == x1 {
            return y1;
        }
        if !self.is_log_y() {
            return self.interpolate(x0, x1, y0, y1, x);
        }
        if y0 == 0.0 && y1 == 0.0 {
            return 0.0;
        }
        self.interpolate(
            x0,
            x1,
            clamp_to_positive_minimum(y0, value_floor),
            clamp_to_positive_minimum(y1, value_floor),
            x,
        )
    }

    /// Whether `x` can be used as an independent value under this policy.
    pub fn accepts_x(&self, x: f64) -> bool {
        x.is_finite() && (!self.is_log_x() || x > 0.0)
    }

    /// Whether `y` can be used as a dependent value under this policy. Exact
    /// zeros are allowed under log-y; they are floored when interpolated.
    pub fn accepts_y(&self, y: f64) -> bool {
        y.is_finite() && (!self.is_log_y() || y >= 0.0)
    }
}
