use std::collections::{
    BTreeMap,
    HashSet
};

use serde::{
    Deserialize,
    Serialize
};

use crate::error::griderror::GridError;
use crate::grid::grid::Grid;
use crate::grid::resampler::{
    GridFingerprint,
    ResampledArray
};

/// Pointwise sum of a named subset of resampled arrays.
///
/// Components are added in membership order, so `values[i]` is reproduced bit
/// for bit by summing the component values in that order starting from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeArray {
    name: String,
    components: Vec<String>,
    fingerprint: GridFingerprint,
    values: Vec<f64>,
    threshold_index: Option<usize>,
    component_fingerprints: Vec<GridFingerprint>,
}

impl CompositeArray {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[String] {
        &self.components
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

    pub fn threshold_index(&self) -> Option<usize> {
        self.threshold_index
    }

    pub fn fingerprint(&self) -> &GridFingerprint {
        &self.fingerprint
    }

    /// True when every component was resampled on the grid the composite was
    /// built for, judged by grid id or by sampled grid values.
    pub fn has_shared_energy_grid(&self) -> bool {
        self.component_fingerprints
            .iter()
            .all(|component| component.same_grid(&self.fingerprint))
    }
}

pub fn aggregate(
    name: &str,
    grid: &Grid,
    arrays: &BTreeMap<String, ResampledArray>,
    membership: &[&str],
) -> Result<CompositeArray, GridError> {
    if membership.is_empty() {
        return Err(GridError::configuration(format!("composite '{name}' has no members")));
    }
    let mut seen = HashSet::with_capacity(membership.len());
    if let Some(duplicate) = membership.iter().find(|member| !seen.insert(**member)) {
        return Err(GridError::configuration(format!(
            "composite '{name}' lists '{duplicate}' more than once"
        )));
    }

    let mut components = Vec::with_capacity(membership.len());
    for &member in membership {
        let array = arrays
            .get(member)
            .ok_or_else(|| GridError::UnknownArray(member.to_owned()))?;
        if !array.has_shared_energy_grid(grid) {
            return Err(GridError::SharedGridViolation {
                name: member.to_owned(),
                expected: grid.len(),
                found: array.len(),
            });
        }
        components.push(array);
    }

    let mut values = vec![0.0; grid.len()];
    for array in &components {
        for (total, value) in values.iter_mut().zip(array.values()) {
            *total += value;
        }
    }
    let threshold_index = values.iter().position(|&v| v != 0.0);

    Ok(CompositeArray {
        name: name.to_owned(),
        components: membership.iter().map(|m| (*m).to_owned()).collect(),
        fingerprint: GridFingerprint::of(grid),
        values,
        threshold_index,
        component_fingerprints: components
            .iter()
            .map(|array| array.fingerprint().clone())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::resampler::resample;
    use crate::math::function::analyticfunction::AnalyticFunction;

    fn arrays(grid: &Grid) -> BTreeMap<String, ResampledArray> {
        let mut arrays = BTreeMap::new();
        arrays.insert(
            "elastic".to_owned(),
            resample(grid, &AnalyticFunction::new(|x: f64| 1.0 / (1.0 + x))).unwrap(),
        );
        arrays.insert(
            "capture".to_owned(),
            resample(grid, &AnalyticFunction::new(|x: f64| 0.1 * x.sqrt())).unwrap(),
        );
        arrays.insert(
            "excitation".to_owned(),
            resample(
                grid,
                &AnalyticFunction::constant(0.3).with_support(2.0, f64::INFINITY).unwrap(),
            )
            .unwrap(),
        );
        arrays
    }

    #[test]
    fn test_composite_equals_sum_of_components() {
        let grid = Grid::new((0..50).map(|i| i as f64 * 0.1).collect()).unwrap();
        let arrays = arrays(&grid);
        let membership = ["elastic", "capture", "excitation"];
        let total = aggregate("total", &grid, &arrays, &membership).unwrap();

        assert_eq!(total.len(), grid.len());
        assert!(total.has_shared_energy_grid());
        for i in 0..grid.len() {
            let mut expected = 0.0;
            for member in membership {
                expected += arrays[member].values()[i];
            }
            assert_eq!(total.values()[i], expected);
        }
        assert_eq!(total.components(), &["elastic", "capture", "excitation"]);
    }

    #[test]
    fn test_threshold_of_partial_composite() {
        let grid = Grid::new((0..50).map(|i| i as f64 * 0.1).collect()).unwrap();
        let arrays = arrays(&grid);
        let composite = aggregate("inelastic", &grid, &arrays, &["excitation"]).unwrap();
        let index = composite.threshold_index().unwrap();
        assert!(grid.points()[index] >= 2.0);
        assert!(grid.points()[index - 1] < 2.0);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let grid = Grid::new((0..50).map(|i| i as f64 * 0.1).collect()).unwrap();
        let other = Grid::new(vec![0.0, 1.0]).unwrap();
        let mut arrays = arrays(&grid);
        arrays.insert("stray".to_owned(), resample(&other, &AnalyticFunction::constant(1.0)).unwrap());

        let err = aggregate("total", &grid, &arrays, &["elastic", "stray"]).unwrap_err();
        match err {
            GridError::SharedGridViolation { name, expected, found } => {
                assert_eq!(name, "stray");
                assert_eq!(expected, 50);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_equal_valued_grid_counts_as_shared() {
        let grid = Grid::new((0..50).map(|i| i as f64).collect()).unwrap();
        let twin = Grid::new(grid.points().to_vec()).unwrap();
        let mut arrays = BTreeMap::new();
        arrays.insert("a".to_owned(), resample(&twin, &AnalyticFunction::constant(1.0)).unwrap());
        let composite = aggregate("total", &grid, &arrays, &["a"]).unwrap();
        assert!(composite.has_shared_energy_grid());
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_different_valued_grid_is_not_shared_in_release() {
        let grid = Grid::new((0..50).map(|i| i as f64).collect()).unwrap();
        let shifted = Grid::new((0..50).map(|i| i as f64 + 0.5).collect()).unwrap();
        let mut arrays = BTreeMap::new();
        arrays.insert("a".to_owned(), resample(&shifted, &AnalyticFunction::constant(1.0)).unwrap());
        let composite = aggregate("total", &grid, &arrays, &["a"]).unwrap();
        assert!(!composite.has_shared_energy_grid());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_same_length_different_values_is_rejected_in_debug() {
        let grid = Grid::new((0..50).map(|i| i as f64).collect()).unwrap();
        let shifted = Grid::new((0..50).map(|i| i as f64 + 0.5).collect()).unwrap();
        let mut arrays = BTreeMap::new();
        arrays.insert("a".to_owned(), resample(&shifted, &AnalyticFunction::constant(1.0)).unwrap());
        assert!(matches!(
            aggregate("total", &grid, &arrays, &["a"]),
            Err(GridError::SharedGridViolation { .. })
        ));
    }

    #[test]
    fn test_bad_membership() {
        let grid = Grid::new(vec![0.0, 1.0]).unwrap();
        let arrays = arrays(&grid);
        assert!(matches!(aggregate("t", &grid, &arrays, &[]), Err(GridError::Configuration(_))));
        assert!(matches!(
            aggregate("t", &grid, &arrays, &["elastic", "elastic"]),
            Err(GridError::Configuration(_))
        ));
        assert!(matches!(
            aggregate("t", &grid, &arrays, &["fission"]),
            Err(GridError::UnknownArray(name)) if name == "fission"
        ));
    }
}
