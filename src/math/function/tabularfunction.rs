use crate::error::griderror::{
    GridError,
    validate_strictly_increasing
};
use crate::math::function::evaluatablefunction::EvaluatableFunction;
use crate::math::interpolation::InterpolationPolicy;

/// Piecewise function through tabulated `(x, y)` pairs.
///
/// The support is the tabulated range: the function is zero below the first
/// point (the reaction threshold) and above the last one. Under log-y policies
/// tabulated zeros are interpolated through `value_floor`.
#[derive(Debug, Clone)]
pub struct TabularFunction {
    policy: InterpolationPolicy,
    x_data: Vec<f64>,
    y_data: Vec<f64>,
    value_floor: f64,
}

impl TabularFunction {
    pub fn new(
        policy: InterpolationPolicy,
        x_data: Vec<f64>,
        y_data: Vec<f64>,
    ) -> Result<TabularFunction, GridError> {
        if x_data.len() != y_data.len() {
            return Err(GridError::configuration(format!(
                "{} x values but {} y values",
                x_data.len(),
                y_data.len()
            )));
        }
        if x_data.len() < 2 {
            return Err(GridError::configuration("a table needs at least 2 points"));
        }
        validate_strictly_increasing(&x_data)?;
        if let Some(&x) = x_data.iter().find(|&&x| !policy.accepts_x(x)) {
            return Err(GridError::configuration(format!(
                "x = {x} is not usable with {policy:?} interpolation"
            )));
        }
        if let Some(i) = y_data.iter().position(|&y| !policy.accepts_y(y)) {
            return Err(GridError::Evaluation {
                x: x_data[i],
                value: y_data[i],
            });
        }
        Ok(TabularFunction {
            policy,
            x_data,
            y_data,
            value_floor: f64::MIN_POSITIVE,
        })
    }

    pub fn with_value_floor(mut self, value_floor: f64) -> Result<TabularFunction, GridError> {
        if !(value_floor.is_finite() && value_floor > 0.0) {
            return Err(GridError::configuration(format!(
                "value_floor must be positive and finite, got {value_floor}"
            )));
        }
        self.value_floor = value_floor;
        Ok(self)
    }

    pub fn from_points(
        policy: InterpolationPolicy,
        points: &[(f64, f64)],
    ) -> Result<TabularFunction, GridError> {
        let (x_data, y_data) = points.iter().copied().unzip();
        TabularFunction::new(policy, x_data, y_data)
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    pub fn x_data(&self) -> &[f64] {
        &self.x_data
    }

    pub fn y_data(&self) -> &[f64] {
        &self.y_data
    }

    pub fn value_floor(&self) -> f64 {
        self.value_floor
    }

    fn find_segment(&self, x: f64) -> usize {
        let last_segment = self.x_data.len() - 2;
        self.x_data
            .partition_point(|&xi| xi <= x)
            .saturating_sub(1)
            .min(last_segment)
    }
}

impl EvaluatableFunction for TabularFunction {
    fn evaluate(&self, x: f64) -> f64 {
        if !self.is_supported(x) {
            return 0.0;
        }
        let i = self.find_segment(x);
        self.policy.interpolate_with_floor(
            self.x_data[i],
            self.x_data[i + 1],
            self.y_data[i],
            self.y_data[i + 1],
            x,
            self.value_floor,
        )
    }

    fn threshold(&self) -> f64 {
        self.x_data[0]
    }

    fn upper_bound(&self) -> f64 {
        self.x_data[self.x_data.len() - 1]
    }
}
