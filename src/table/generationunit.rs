use std::collections::HashSet;
use std::sync::Arc;

use crate::error::griderror::GridError;
use crate::math::function::evaluatablefunction::EvaluatableFunction;

/// One independently generated table, e.g. the reactions of a single element.
///
/// Functions and composites keep their insertion order; composite members are
/// summed in the order listed.
#[derive(Clone)]
pub struct GenerationUnit {
    name: String,
    mandatory_points: Vec<f64>,
    functions: Vec<(String, Arc<dyn EvaluatableFunction>)>,
    composites: Vec<(String, Vec<String>)>,
}

impl GenerationUnit {
    pub fn new(name: impl Into<String>) -> GenerationUnit {
        GenerationUnit {
            name: name.into(),
            mandatory_points: Vec::new(),
            functions: Vec::new(),
            composites: Vec::new(),
        }
    }

    /// Domain bounds, thresholds, binding energies and other points the grid must keep.
    pub fn with_mandatory_points(mut self, points: &[f64]) -> GenerationUnit {
        self.mandatory_points.extend_from_slice(points);
        self
    }

    pub fn with_function(
        mut self,
        name: impl Into<String>,
        function: Arc<dyn EvaluatableFunction>,
    ) -> GenerationUnit {
        self.functions.push((name.into(), function));
        self
    }

    pub fn with_composite(mut self, name: impl Into<String>, members: &[&str]) -> GenerationUnit {
        self.composites
            .push((name.into(), members.iter().map(|m| (*m).to_owned()).collect()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mandatory_points(&self) -> &[f64] {
        &self.mandatory_points
    }

    pub fn functions(&self) -> &[(String, Arc<dyn EvaluatableFunction>)] {
        &self.functions
    }

    pub fn composites(&self) -> &[(String, Vec<String>)] {
        &self.composites
    }

    /// Rejects duplicated names across functions and composites.
    pub fn validate(&self) -> Result<(), GridError> {
        let mut names = HashSet::new();
        let all_names = self
            .functions
            .iter()
            .map(|(name, _)| name)
            .chain(self.composites.iter().map(|(name, _)| name));
        for name in all_names {
            if !names.insert(name.as_str()) {
                return Err(GridError::configuration(format!(
                    "unit '{}' defines '{name}' more than once",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::function::analyticfunction::AnalyticFunction;

    #[test]
    fn test_builder_keeps_order() {
        let unit = GenerationUnit::new("H")
            .with_mandatory_points(&[1e-5, 20.0])
            .with_function("elastic", Arc::new(AnalyticFunction::constant(1.0)))
            .with_function("capture", Arc::new(AnalyticFunction::constant(2.0)))
            .with_composite("total", &["elastic", "capture"]);

        assert_eq!(unit.name(), "H");
        assert_eq!(unit.mandatory_points(), &[1e-5, 20.0]);
        let names: Vec<&str> = unit.functions().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["elastic", "capture"]);
        assert_eq!(unit.composites()[0].1, vec!["elastic", "capture"]);
        assert!(unit.validate().is_ok());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let unit = GenerationUnit::new("He")
            .with_function("elastic", Arc::new(AnalyticFunction::constant(1.0)))
            .with_composite("elastic", &["elastic"]);
        assert!(matches!(unit.validate(), Err(GridError::Configuration(_))));
    }
}
