use std::sync::Arc;

use crate::error::griderror::GridError;
use crate::grid::grid::Grid;

/// Bracket lookup over an immutable grid.
///
/// Searchers are built once and then shared read-only between threads.
pub trait GridSearcher: Send + Sync {
    fn grid(&self) -> &Grid;

    fn is_value_within_grid_bounds(&self, x: f64) -> bool {
        let grid = self.grid();
        x >= grid.front() && x <= grid.back()
    }

    /// Index `i` such that `grid[i] <= x <= grid[i + 1]`. The upper bound of
    /// the grid resolves to the last interval.
    fn find_lower_bound_index(&self, x: f64) -> Result<usize, GridError>;

    fn out_of_bounds(&self, x: f64) -> GridError {
        GridError::OutOfBounds {
            x,
            lower: self.grid().front(),
            upper: self.grid().back(),
        }
    }
}

/// Plain binary search over the whole grid.
#[derive(Debug, Clone)]
pub struct BinarySearchGridSearcher {
    grid: Arc<Grid>,
}

impl BinarySearchGridSearcher {
    pub fn new(grid: Arc<Grid>) -> BinarySearchGridSearcher {
        BinarySearchGridSearcher { grid }
    }
}

impl GridSearcher for BinarySearchGridSearcher {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn find_lower_bound_index(&self, x: f64) -> Result<usize, GridError> {
        if !self.is_value_within_grid_bounds(x) {
            return Err(self.out_of_bounds(x));
        }
        let points = self.grid.points();
        let upper = points.partition_point(|&p| p <= x);
        Ok((upper - 1).min(points.len() - 2))
    }
}
