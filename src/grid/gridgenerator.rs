use log::{
    debug,
    warn
};

use crate::configuration::{
    Configuration,
    DirtyConvergencePolicy,
    ToleranceConfiguration
};
use crate::error::griderror::{
    GridError,
    validate_strictly_increasing
};
use crate::grid::grid::Grid;
use crate::math::clamp::clamp_to_positive_minimum;
use crate::math::function::evaluatablefunction::EvaluatableFunction;
use crate::math::interpolation::InterpolationPolicy;

// ─────────────────────────────────────────────
// Adaptive bisection
// ─────────────────────────────────────────────
//
// Every adjacent pair (x0, y0), (x1, y1) of the seed is tested at its midpoint
// xm (arithmetic or geometric, depending on the policy):
//
//   error = |f(xm) - interp(xm)| / max(|f(xm)|, value_floor)
//
// The pair is accepted when error <= relative tolerance or the absolute
// difference is below the absolute tolerance. Otherwise xm is inserted and both
// halves are tested in turn, as long as each half stays wider than the distance
// tolerance. Intervals are processed left first from an explicit stack, so
// accepted points come out already sorted.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefinementSummary {
    pub points_added: usize,
    /// Intervals accepted only because they could no longer be split.
    pub dirty_intervals: usize,
}

#[derive(Clone, Copy)]
struct Interval {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

enum Verdict {
    Converged,
    Split { xm: f64, ym: f64 },
    Dirty { error: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGenerator {
    tolerance: ToleranceConfiguration,
    policy: InterpolationPolicy,
    dirty_convergence: DirtyConvergencePolicy,
}

impl GridGenerator {
    pub fn new(
        tolerance: ToleranceConfiguration,
        policy: InterpolationPolicy,
    ) -> Result<GridGenerator, GridError> {
        tolerance.validate()?;
        Ok(GridGenerator {
            tolerance,
            policy,
            dirty_convergence: DirtyConvergencePolicy::default(),
        })
    }

    pub fn from_configuration(configuration: &Configuration) -> Result<GridGenerator, GridError> {
        Ok(GridGenerator::new(configuration.tolerance, configuration.interpolation)?
            .with_dirty_convergence(configuration.dirty_convergence))
    }

    pub fn with_dirty_convergence(mut self, dirty_convergence: DirtyConvergencePolicy) -> GridGenerator {
        self.dirty_convergence = dirty_convergence;
        self
    }

    pub fn tolerance(&self) -> &ToleranceConfiguration {
        &self.tolerance
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    /// Refines `seed` against `function`. The result always contains the seed.
    pub fn refine(
        &self,
        seed: &[f64],
        function: &dyn EvaluatableFunction,
    ) -> Result<Grid, GridError> {
        let (points, _, _) = self.refine_points(seed, function)?;
        Ok(Grid::from_sorted(points))
    }

    /// Refines `grid` in place. On error the grid is left untouched.
    pub fn refine_in_place(
        &self,
        grid: &mut Vec<f64>,
        function: &dyn EvaluatableFunction,
    ) -> Result<RefinementSummary, GridError> {
        let (points, _, summary) = self.refine_points(grid, function)?;
        *grid = points;
        Ok(summary)
    }

    /// Refines `seed` and returns the function values at the refined points.
    pub fn refine_and_evaluate(
        &self,
        seed: &[f64],
        function: &dyn EvaluatableFunction,
    ) -> Result<(Vec<f64>, Vec<f64>), GridError> {
        let (points, values, _) = self.refine_points(seed, function)?;
        Ok((points, values))
    }

    fn validate_seed(&self, seed: &[f64]) -> Result<(), GridError> {
        if seed.len() < 2 {
            return Err(GridError::configuration(format!(
                "refinement needs at least 2 seed points, got {}",
                seed.len()
            )));
        }
        validate_strictly_increasing(seed)?;
        let distance_tolerance = self.tolerance.distance_tolerance;
        if let Some(pair) = seed
            .windows(2)
            .find(|pair| pair[1] - pair[0] <= distance_tolerance)
        {
            return Err(GridError::configuration(format!(
                "seed points {} and {} are not more than {distance_tolerance} apart",
                pair[0], pair[1]
            )));
        }
        if !self.policy.accepts_x(seed[0]) {
            return Err(GridError::configuration(format!(
                "seed point {} is not usable with {:?} interpolation",
                seed[0], self.policy
            )));
        }
        Ok(())
    }

    fn evaluate(&self, function: &dyn EvaluatableFunction, x: f64) -> Result<f64, GridError> {
        let value = function.evaluate(x);
        if !value.is_finite() || (self.policy.is_log_y() && value < 0.0) {
            return Err(GridError::Evaluation { x, value });
        }
        Ok(value)
    }

    fn examine(
        &self,
        interval: &Interval,
        function: &dyn EvaluatableFunction,
    ) -> Result<Verdict, GridError> {
        let Interval { x0, y0, x1, y1 } = *interval;
        let xm = self.policy.midpoint(x0, x1);
        let ym = self.evaluate(function, xm)?;

        let floor = self.tolerance.value_floor;
        let clamped_mid = clamp_to_positive_minimum(ym, floor);
        let estimate = self.policy.interpolate(
            x0,
            x1,
            clamp_to_positive_minimum(y0, floor),
            clamp_to_positive_minimum(y1, floor),
            xm,
        );
        let difference = (clamped_mid - estimate).abs();
        let error = difference / clamped_mid.abs().max(floor);

        if error <= self.tolerance.relative_error_tolerance
            || difference <= self.tolerance.absolute_difference_tolerance
        {
            Ok(Verdict::Converged)
        } else if xm - x0 > self.tolerance.distance_tolerance
            && x1 - xm > self.tolerance.distance_tolerance
        {
            Ok(Verdict::Split { xm, ym })
        } else {
            Ok(Verdict::Dirty { error })
        }
    }

    fn refine_points(
        &self,
        seed: &[f64],
        function: &dyn EvaluatableFunction,
    ) -> Result<(Vec<f64>, Vec<f64>, RefinementSummary), GridError> {
        self.validate_seed(seed)?;

        let context = |lower: f64, upper: f64| {
            move |source: GridError| GridError::RefinementFailed {
                lower,
                upper,
                source: Box::new(source),
            }
        };

        let mut points = Vec::with_capacity(seed.len());
        let mut values = Vec::with_capacity(seed.len());
        let mut dirty_intervals = 0;
        let mut stack: Vec<Interval> = Vec::new();

        let first = self
            .evaluate(function, seed[0])
            .map_err(context(seed[0], seed[1]))?;
        points.push(seed[0]);
        values.push(first);

        for pair in seed.windows(2) {
            let (x0, x1) = (pair[0], pair[1]);
            let y0 = values[values.len() - 1];
            let y1 = self.evaluate(function, x1).map_err(context(x0, x1))?;
            stack.push(Interval { x0, y0, x1, y1 });

            while let Some(interval) = stack.pop() {
                let verdict = self
                    .examine(&interval, function)
                    .map_err(context(interval.x0, interval.x1))?;
                match verdict {
                    Verdict::Split { xm, ym } => {
                        stack.push(Interval { x0: xm, y0: ym, ..interval });
                        stack.push(Interval { x1: xm, y1: ym, ..interval });
                    }
                    Verdict::Dirty { error } => {
                        if self.dirty_convergence == DirtyConvergencePolicy::Error {
                            return Err(GridError::DirtyConvergence {
                                lower: interval.x0,
                                upper: interval.x1,
                                error,
                            });
                        }
                        dirty_intervals += 1;
                        points.push(interval.x1);
                        values.push(interval.y1);
                    }
                    Verdict::Converged => {
                        points.push(interval.x1);
                        values.push(interval.y1);
                    }
                }
            }
        }

        let summary = RefinementSummary {
            points_added: points.len() - seed.len(),
            dirty_intervals,
        };
        if dirty_intervals > 0 && self.dirty_convergence == DirtyConvergencePolicy::Warn {
            warn!(
                "{} interval(s) in [{}, {}] reached the distance tolerance before converging",
                dirty_intervals,
                seed[0],
                seed[seed.len() - 1]
            );
        }
        debug!(
            "refined {} seed points to {} points ({} dirty)",
            seed.len(),
            points.len(),
            dirty_intervals
        );
        Ok((points, values, summary))
    }
}
