use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize
};

use crate::error::griderror::{
    GridError,
    validate_strictly_increasing
};
use crate::grid::grid::Grid;
use crate::search::gridsearcher::GridSearcher;

/// Axis on which the hash bins have equal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HashScale {
    #[default]
    Linear,
    /// Bins of equal width in `ln x`; suits grids spanning many decades.
    Logarithmic,
}

impl HashScale {
    #[inline]
    fn process(&self, x: f64) -> f64 {
        match self {
            HashScale::Linear => x,
            HashScale::Logarithmic => x.ln(),
        }
    }
}

// ─────────────────────────────────────────────
// HashBasedGridSearcher
// ─────────────────────────────────────────────
//
// The hashed range [front, back] is cut into K equal-width bins. For bin b,
// let first[b] be the first grid index whose hash is >= b. Because the hash is
// monotone, the lower bound index of any x hashing to b lies in
//
//   [first[b] - 1, first[b + 1] - 1]
//
// which is the range stored per bin; a query only binary-searches that range.

#[derive(Debug, Clone)]
pub struct HashBasedGridSearcher {
    grid: Arc<Grid>,
    scale: HashScale,
    bins: usize,
    processed_min: f64,
    bin_width: f64,
    bin_ranges: Vec<(usize, usize)>,
}

impl HashBasedGridSearcher {
    pub fn new(grid: Arc<Grid>, bins: usize) -> Result<HashBasedGridSearcher, GridError> {
        HashBasedGridSearcher::with_scale(grid, bins, HashScale::Linear)
    }

    pub fn with_scale(
        grid: Arc<Grid>,
        bins: usize,
        scale: HashScale,
    ) -> Result<HashBasedGridSearcher, GridError> {
        if bins == 0 {
            return Err(GridError::configuration("a hash searcher needs at least 1 bin"));
        }
        if grid.len() < 2 {
            return Err(GridError::configuration("a hash searcher needs at least 2 grid points"));
        }
        validate_strictly_increasing(grid.points())?;
        if scale == HashScale::Logarithmic && grid.front() <= 0.0 {
            return Err(GridError::configuration(format!(
                "logarithmic hashing needs a positive grid, front is {}",
                grid.front()
            )));
        }

        let processed_min = scale.process(grid.front());
        let bin_width = (scale.process(grid.back()) - processed_min) / bins as f64;
        if !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(GridError::configuration(format!(
                "grid range [{}, {}] is too narrow for {bins} bins",
                grid.front(),
                grid.back()
            )));
        }

        let mut searcher = HashBasedGridSearcher {
            grid,
            scale,
            bins,
            processed_min,
            bin_width,
            bin_ranges: Vec::new(),
        };
        searcher.bin_ranges = searcher.compute_bin_ranges();
        Ok(searcher)
    }

    fn compute_bin_ranges(&self) -> Vec<(usize, usize)> {
        let bins = self.bins;
        let points = self.grid.points();
        let mut first = vec![points.len(); bins + 1];
        let mut next_bin = 0;
        for (i, &x) in points.iter().enumerate() {
            let bin = self.bin_of(x);
            while next_bin <= bin {
                first[next_bin] = i;
                next_bin += 1;
            }
        }
        (0..bins)
            .map(|b| (first[b].saturating_sub(1), first[b + 1] - 1))
            .collect()
    }

    #[inline]
    fn bin_of(&self, x: f64) -> usize {
        let raw = ((self.scale.process(x) - self.processed_min) / self.bin_width).floor();
        let last = self.bins - 1;
        if raw <= 0.0 {
            0
        } else if raw >= last as f64 {
            last
        } else {
            raw as usize
        }
    }

    pub fn number_of_bins(&self) -> usize {
        self.bins
    }

    pub fn scale(&self) -> HashScale {
        self.scale
    }

    /// Grid index range searched for values hashing to `bin`.
    pub fn bin_range(&self, bin: usize) -> Option<(usize, usize)> {
        self.bin_ranges.get(bin).copied()
    }
}

impl GridSearcher for HashBasedGridSearcher {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn find_lower_bound_index(&self, x: f64) -> Result<usize, GridError> {
        if !self.is_value_within_grid_bounds(x) {
            return Err(self.out_of_bounds(x));
        }
        let points = self.grid.points();
        let n = points.len();
        let (mut lo, mut hi) = self.bin_ranges[self.bin_of(x)];
        // ln is not guaranteed monotone under rounding; fall back to the whole
        // grid if the bin misses.
        if points[lo] > x || (hi + 1 < n && points[hi + 1] <= x) {
            lo = 0;
            hi = n - 1;
        }
        let offset = points[lo..=hi].partition_point(|&p| p <= x);
        debug_assert!(offset > 0);
        Ok((lo + offset - 1).min(n - 2))
    }
}
