use std::collections::BTreeMap;
use std::sync::Arc;

use log::{
    info,
    warn
};
use rayon::prelude::*;

use crate::configuration::Configuration;
use crate::error::griderror::GridError;
use crate::grid::aggregator::aggregate;
use crate::grid::gridgenerator::GridGenerator;
use crate::grid::resampler::resample;
use crate::grid::uniongridbuilder::UnionGridBuilder;
use crate::math::function::evaluatablefunction::EvaluatableFunction;
use crate::search::hashbasedgridsearcher::HashBasedGridSearcher;
use crate::table::generatedtable::GeneratedTable;
use crate::table::generationunit::GenerationUnit;

/// Runs union grid construction, resampling, aggregation and searcher
/// construction for generation units.
#[derive(Debug, Clone)]
pub struct TableGenerator {
    configuration: Configuration,
    builder: UnionGridBuilder,
}

impl TableGenerator {
    pub fn new(configuration: Configuration) -> Result<TableGenerator, GridError> {
        configuration.validate()?;
        let builder = UnionGridBuilder::new(GridGenerator::from_configuration(&configuration)?);
        Ok(TableGenerator {
            configuration,
            builder,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn generate(&self, unit: &GenerationUnit) -> Result<GeneratedTable, GridError> {
        unit.validate()?;
        let functions: Vec<Arc<dyn EvaluatableFunction>> =
            unit.functions().iter().map(|(_, f)| Arc::clone(f)).collect();
        let (grid, _) = self
            .builder
            .build(unit.mandatory_points(), &functions)?
            .into_parts();
        let grid = Arc::new(grid);

        let mut arrays = BTreeMap::new();
        for (name, function) in unit.functions() {
            arrays.insert(name.clone(), resample(&grid, function.as_ref())?);
        }

        let mut composites = BTreeMap::new();
        for (name, members) in unit.composites() {
            let membership: Vec<&str> = members.iter().map(String::as_str).collect();
            composites.insert(name.clone(), aggregate(name, &grid, &arrays, &membership)?);
        }

        let searcher = HashBasedGridSearcher::with_scale(
            Arc::clone(&grid),
            self.configuration.hash_bins,
            self.configuration.hash_scale,
        )?;

        info!(
            "generated '{}': {} grid points, {} arrays, {} composites",
            unit.name(),
            grid.len(),
            arrays.len(),
            composites.len()
        );
        Ok(GeneratedTable::new(
            unit.name().to_owned(),
            grid,
            self.configuration.interpolation,
            self.configuration.tolerance.value_floor,
            arrays,
            composites,
            searcher,
        ))
    }

    /// Generates every unit in parallel. A failing unit is reported in its own
    /// slot and does not affect the others.
    pub fn generate_batch(&self, units: &[GenerationUnit]) -> Vec<Result<GeneratedTable, GridError>> {
        units
            .par_iter()
            .map(|unit| {
                let result = self.generate(unit);
                if let Err(error) = &result {
                    warn!("discarding unit '{}': {error}", unit.name());
                }
                result
            })
            .collect()
    }
}
