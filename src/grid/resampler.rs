use serde::{
    Deserialize,
    Serialize
};
use uuid::Uuid;

use crate::error::griderror::GridError;
use crate::grid::grid::Grid;
use crate::math::function::evaluatablefunction::EvaluatableFunction;

/// Number of grid values kept in a fingerprint for value-equality checks.
const FINGERPRINT_SAMPLES: usize = 16;

// ─────────────────────────────────────────────
// GridFingerprint
// ─────────────────────────────────────────────

/// Identity of the grid an array was resampled on: id, length and a handful
/// of evenly spaced grid values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFingerprint {
    grid_id: Uuid,
    len: usize,
    samples: Vec<(usize, f64)>,
}

impl GridFingerprint {
    pub fn of(grid: &Grid) -> GridFingerprint {
        let len = grid.len();
        let stride = len.div_ceil(FINGERPRINT_SAMPLES).max(1);
        let mut samples: Vec<(usize, f64)> = (0..len)
            .step_by(stride)
            .map(|i| (i, grid.points()[i]))
            .collect();
        if samples.last().map(|&(i, _)| i) != Some(len - 1) {
            samples.push((len - 1, grid.back()));
        }
        GridFingerprint {
            grid_id: *grid.id(),
            len,
            samples,
        }
    }

    pub fn grid_id(&self) -> &Uuid {
        &self.grid_id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Same length, and either the same grid id or matching sampled values.
    pub fn same_grid(&self, other: &GridFingerprint) -> bool {
        self.len == other.len && (self.grid_id == other.grid_id || self.samples == other.samples)
    }

    /// Same length, and either the same grid or (in debug builds) a grid whose
    /// sampled values match.
    pub fn matches(&self, grid: &Grid) -> bool {
        if self.len != grid.len() {
            return false;
        }
        if &self.grid_id == grid.id() || !cfg!(debug_assertions) {
            return true;
        }
        self.samples
            .iter()
            .all(|&(i, x)| grid.points()[i] == x)
    }
}

// ─────────────────────────────────────────────
// ResampledArray
// ─────────────────────────────────────────────

/// Values of one function at every point of a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledArray {
    fingerprint: GridFingerprint,
    values: Vec<f64>,
    threshold_index: Option<usize>,
}

impl ResampledArray {
    /// Wraps values produced elsewhere; they must line up with `grid`.
    pub fn from_values(grid: &Grid, values: Vec<f64>) -> Result<ResampledArray, GridError> {
        if values.len() != grid.len() {
            return Err(GridError::SharedGridViolation {
                name: String::new(),
                expected: grid.len(),
                found: values.len(),
            });
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(GridError::Evaluation {
                x: grid.points()[i],
                value: values[i],
            });
        }
        let threshold_index = values.iter().position(|&v| v != 0.0);
        Ok(ResampledArray {
            fingerprint: GridFingerprint::of(grid),
            values,
            threshold_index,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn fingerprint(&self) -> &GridFingerprint {
        &self.fingerprint
    }

    /// First grid index with a non-zero value.
    pub fn threshold_index(&self) -> Option<usize> {
        self.threshold_index
    }

    /// Values from the threshold index on; empty when the array is all zeros.
    pub fn above_threshold(&self) -> &[f64] {
        match self.threshold_index {
            Some(i) => &self.values[i..],
            None => &[],
        }
    }

    pub fn has_shared_energy_grid(&self, grid: &Grid) -> bool {
        self.fingerprint.matches(grid)
    }
}

// ─────────────────────────────────────────────
// Resampling
// ─────────────────────────────────────────────

fn sample(function: &dyn EvaluatableFunction, x: f64) -> f64 {
    if function.is_supported(x) {
        function.evaluate(x)
    } else {
        0.0
    }
}

/// Evaluates `function` at every grid point. Points outside the function's
/// support get zero.
pub fn resample(grid: &Grid, function: &dyn EvaluatableFunction) -> Result<ResampledArray, GridError> {
    let mut values = Vec::with_capacity(grid.len());
    for &x in grid.points() {
        let value = sample(function, x);
        if !value.is_finite() {
            return Err(GridError::Evaluation { x, value });
        }
        values.push(value);
    }
    ResampledArray::from_values(grid, values)
}

/// First grid index at which `function` is non-zero.
pub fn threshold_index(grid: &Grid, function: &dyn EvaluatableFunction) -> Option<usize> {
    grid.points()
        .iter()
        .position(|&x| sample(function, x) != 0.0)
}
