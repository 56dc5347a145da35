use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::griderror::GridError;
use crate::grid::aggregator::CompositeArray;
use crate::grid::grid::Grid;
use crate::grid::resampler::ResampledArray;
use crate::math::interpolation::InterpolationPolicy;
use crate::search::gridsearcher::GridSearcher;
use crate::search::hashbasedgridsearcher::HashBasedGridSearcher;

/// Finished, immutable output of one generation unit.
///
/// Safe to share between transport threads: no method mutates it.
#[derive(Debug, Clone)]
pub struct GeneratedTable {
    name: String,
    grid: Arc<Grid>,
    policy: InterpolationPolicy,
    value_floor: f64,
    arrays: BTreeMap<String, ResampledArray>,
    composites: BTreeMap<String, CompositeArray>,
    searcher: HashBasedGridSearcher,
}

impl GeneratedTable {
    pub(crate) fn new(
        name: String,
        grid: Arc<Grid>,
        policy: InterpolationPolicy,
        value_floor: f64,
        arrays: BTreeMap<String, ResampledArray>,
        composites: BTreeMap<String, CompositeArray>,
        searcher: HashBasedGridSearcher,
    ) -> GeneratedTable {
        GeneratedTable {
            name,
            grid,
            policy,
            value_floor,
            arrays,
            composites,
            searcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    pub fn arrays(&self) -> &BTreeMap<String, ResampledArray> {
        &self.arrays
    }

    pub fn array(&self, name: &str) -> Option<&ResampledArray> {
        self.arrays.get(name)
    }

    pub fn composites(&self) -> &BTreeMap<String, CompositeArray> {
        &self.composites
    }

    pub fn composite(&self, name: &str) -> Option<&CompositeArray> {
        self.composites.get(name)
    }

    pub fn searcher(&self) -> &HashBasedGridSearcher {
        &self.searcher
    }

    fn values(&self, name: &str) -> Option<&[f64]> {
        self.arrays
            .get(name)
            .map(|a| a.values())
            .or_else(|| self.composites.get(name).map(|c| c.values()))
    }

    /// Interpolates the named array or composite at `x`.
    pub fn evaluate(&self, name: &str, x: f64) -> Result<f64, GridError> {
        let values = self
            .values(name)
            .ok_or_else(|| GridError::UnknownArray(name.to_owned()))?;
        let i = self.searcher.find_lower_bound_index(x)?;
        let points = self.grid.points();
        let (x0, x1) = (points[i], points[i + 1]);
        let (y0, y1) = (values[i], values[i + 1]);
        Ok(self.policy.interpolate_with_floor(x0, x1, y0, y1, x, self.value_floor))
    }
}
