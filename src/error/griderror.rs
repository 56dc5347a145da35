use thiserror::Error;

// ─────────────────────────────────────────────
// GridError
// ─────────────────────────────────────────────

/// Failures raised while generating, resampling or searching a grid.
///
/// Generation failures abort only the unit of work that raised them; searcher
/// failures (`OutOfBounds`) are caller bugs and are never clamped away.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("function evaluated to {value} at x = {x}")]
    Evaluation { x: f64, value: f64 },

    #[error("points are not strictly increasing at index {index}: {previous} followed by {current}")]
    UnsortedInput {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("x = {x} lies outside the grid bounds [{lower}, {upper}]")]
    OutOfBounds { x: f64, lower: f64, upper: f64 },

    #[error("array '{name}' has {found} points but the grid has {expected}")]
    SharedGridViolation {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("array '{0}' was never resampled")]
    UnknownArray(String),

    #[error("interval [{lower}, {upper}] reached the distance tolerance with relative error {error}")]
    DirtyConvergence { lower: f64, upper: f64, error: f64 },

    #[error("refinement of [{lower}, {upper}] failed: {source}")]
    RefinementFailed {
        lower: f64,
        upper: f64,
        #[source]
        source: Box<GridError>,
    },

    #[error("union grid refinement failed for function {function_index}: {source}")]
    UnionRefinement {
        function_index: usize,
        #[source]
        source: Box<GridError>,
    },
}

impl GridError {
    pub fn configuration(message: impl Into<String>) -> GridError {
        GridError::Configuration(message.into())
    }

    /// Strips the context wrappers and returns the error that started the chain.
    pub fn root_cause(&self) -> &GridError {
        match self {
            GridError::RefinementFailed { source, .. } => source.root_cause(),
            GridError::UnionRefinement { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Checks that `points` are finite and strictly increasing.
pub fn validate_strictly_increasing(points: &[f64]) -> Result<(), GridError> {
    if let Some(index) = points.iter().position(|x| !x.is_finite()) {
        return Err(GridError::configuration(format!(
            "point {} at index {index} is not finite",
            points[index]
        )));
    }
    match points.windows(2).position(|pair| pair[1] <= pair[0]) {
        Some(i) => Err(GridError::UnsortedInput {
            index: i + 1,
            previous: points[i],
            current: points[i + 1],
        }),
        None => Ok(()),
    }
}
