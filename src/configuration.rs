use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize
};

use crate::error::configurationerror::ConfigurationError;
use crate::error::griderror::GridError;
use crate::math::interpolation::InterpolationPolicy;
use crate::search::hashbasedgridsearcher::HashScale;

// ─────────────────────────────────────────────
// ToleranceConfiguration
// ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfiguration {
    pub relative_error_tolerance: f64,
    /// Minimum spacing between adjacent grid points.
    pub distance_tolerance: f64,
    /// Substituted for exact zeros before relative errors are computed.
    pub value_floor: f64,
    /// An interval also converges when the absolute interpolation error is below
    /// this. Zero disables the shortcut.
    pub absolute_difference_tolerance: f64,
}

impl Default for ToleranceConfiguration {
    fn default() -> Self {
        ToleranceConfiguration {
            relative_error_tolerance: 1e-3,
            distance_tolerance: 1e-13,
            value_floor: f64::MIN_POSITIVE,
            absolute_difference_tolerance: 0.0,
        }
    }
}

impl ToleranceConfiguration {
    pub fn new(
        relative_error_tolerance: f64,
        distance_tolerance: f64,
        value_floor: f64,
    ) -> Result<ToleranceConfiguration, GridError> {
        let tolerance = ToleranceConfiguration {
            relative_error_tolerance,
            distance_tolerance,
            value_floor,
            absolute_difference_tolerance: 0.0,
        };
        tolerance.validate()?;
        Ok(tolerance)
    }

    pub fn with_absolute_difference_tolerance(
        mut self,
        absolute_difference_tolerance: f64,
    ) -> Result<ToleranceConfiguration, GridError> {
        self.absolute_difference_tolerance = absolute_difference_tolerance;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GridError::configuration(format!("{name} must be positive and finite, got {value}")))
            }
        };
        positive("relative_error_tolerance", self.relative_error_tolerance)?;
        positive("distance_tolerance", self.distance_tolerance)?;
        positive("value_floor", self.value_floor)?;
        if !(self.absolute_difference_tolerance.is_finite() && self.absolute_difference_tolerance >= 0.0) {
            return Err(GridError::configuration(format!(
                "absolute_difference_tolerance must be non-negative and finite, got {}",
                self.absolute_difference_tolerance
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// DirtyConvergencePolicy
// ─────────────────────────────────────────────

/// What to do with an interval that still misses the error tolerance but has
/// become too narrow to split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DirtyConvergencePolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

// ─────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub tolerance: ToleranceConfiguration,
    pub interpolation: InterpolationPolicy,
    pub hash_bins: usize,
    pub hash_scale: HashScale,
    pub dirty_convergence: DirtyConvergencePolicy,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            tolerance: ToleranceConfiguration::default(),
            interpolation: InterpolationPolicy::LinLin,
            hash_bins: 1000,
            hash_scale: HashScale::Linear,
            dirty_convergence: DirtyConvergencePolicy::Warn,
        }
    }
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration::default()
    }

    pub fn validate(&self) -> Result<(), GridError> {
        self.tolerance.validate()?;
        if self.hash_bins == 0 {
            return Err(GridError::configuration("hash_bins must be at least 1"));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Configuration, ConfigurationError> {
        let configuration: Configuration = serde_json::from_str(json)?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_reader<P: AsRef<Path>>(file_path: P) -> Result<Configuration, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let configuration: Configuration = serde_json::from_reader(reader)?;
        configuration.validate()?;
        Ok(configuration)
    }
}
