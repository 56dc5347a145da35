use std::sync::Arc;

use log::debug;

use crate::error::griderror::GridError;
use crate::grid::grid::Grid;
use crate::grid::gridgenerator::GridGenerator;
use crate::grid::resampler::threshold_index;
use crate::math::function::evaluatablefunction::EvaluatableFunction;

/// Grid adequate for every contributing function, plus the index at which
/// each function first becomes non-zero on it.
#[derive(Debug, Clone)]
pub struct UnionGrid {
    grid: Grid,
    threshold_indices: Vec<Option<usize>>,
}

impl UnionGrid {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// `None` when the function is zero on the whole grid.
    pub fn threshold_indices(&self) -> &[Option<usize>] {
        &self.threshold_indices
    }

    pub fn into_parts(self) -> (Grid, Vec<Option<usize>>) {
        (self.grid, self.threshold_indices)
    }
}

/// Merges the refined grids of several functions into one.
///
/// Passes over the functions repeat until a whole pass adds nothing, so each
/// function ends up converged against the final grid. Every inserted point is
/// the midpoint of an interval that fails at least one function, which makes
/// the resulting point set independent of the order of `functions`.
#[derive(Debug, Clone, Copy)]
pub struct UnionGridBuilder {
    generator: GridGenerator,
}

impl UnionGridBuilder {
    pub fn new(generator: GridGenerator) -> UnionGridBuilder {
        UnionGridBuilder { generator }
    }

    pub fn generator(&self) -> &GridGenerator {
        &self.generator
    }

    pub fn build(
        &self,
        mandatory_points: &[f64],
        functions: &[Arc<dyn EvaluatableFunction>],
    ) -> Result<UnionGrid, GridError> {
        if functions.is_empty() {
            return Err(GridError::configuration("a union grid needs at least one function"));
        }
        let mut points = self.seed(mandatory_points)?;

        let mut passes = 0;
        loop {
            passes += 1;
            let mut added = 0;
            for (function_index, function) in functions.iter().enumerate() {
                let summary = self
                    .generator
                    .refine_in_place(&mut points, function.as_ref())
                    .map_err(|source| GridError::UnionRefinement {
                        function_index,
                        source: Box::new(source),
                    })?;
                added += summary.points_added;
            }
            debug!("union pass {passes}: {added} point(s) added, {} total", points.len());
            if added == 0 || functions.len() == 1 {
                break;
            }
        }

        let grid = Grid::from_sorted(points);
        let threshold_indices = functions
            .iter()
            .map(|function| threshold_index(&grid, function.as_ref()))
            .collect();
        Ok(UnionGrid {
            grid,
            threshold_indices,
        })
    }

    /// Sorts the mandatory points and drops those within the distance tolerance
    /// of their predecessor.
    fn seed(&self, mandatory_points: &[f64]) -> Result<Vec<f64>, GridError> {
        if let Some(x) = mandatory_points.iter().find(|x| !x.is_finite()) {
            return Err(GridError::configuration(format!("mandatory point {x} is not finite")));
        }
        let distance_tolerance = self.generator.tolerance().distance_tolerance;
        let mut sorted = mandatory_points.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut seed: Vec<f64> = Vec::with_capacity(sorted.len());
        for x in sorted {
            match seed.last() {
                Some(&last) if x - last <= distance_tolerance => {}
                _ => seed.push(x),
            }
        }
        if seed.len() < 2 {
            return Err(GridError::configuration(format!(
                "a union grid needs at least 2 distinct mandatory points, got {}",
                seed.len()
            )));
        }
        Ok(seed)
    }
}
