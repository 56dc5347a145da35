use serde::{
    Deserialize,
    Serialize
};
use uuid::Uuid;

use crate::error::griderror::{
    GridError,
    validate_strictly_increasing
};

/// Immutable, strictly increasing sequence of sample points.
///
/// Each grid carries a random identity so arrays resampled on it can later be
/// checked against the grid they are combined with. Deserialization goes
/// through the same validation as [`Grid::new`] and keeps the stored identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord")]
pub struct Grid {
    id: Uuid,
    points: Vec<f64>,
}

#[derive(Deserialize)]
struct GridRecord {
    id: Uuid,
    points: Vec<f64>,
}

impl TryFrom<GridRecord> for Grid {
    type Error = GridError;

    fn try_from(record: GridRecord) -> Result<Grid, GridError> {
        validate_points(&record.points)?;
        Ok(Grid {
            id: record.id,
            points: record.points,
        })
    }
}

fn validate_points(points: &[f64]) -> Result<(), GridError> {
    if points.len() < 2 {
        return Err(GridError::configuration(format!(
            "a grid needs at least 2 points, got {}",
            points.len()
        )));
    }
    validate_strictly_increasing(points)
}

impl Grid {
    pub fn new(points: Vec<f64>) -> Result<Grid, GridError> {
        validate_points(&points)?;
        Ok(Grid::from_sorted(points))
    }

    /// Wraps points the caller already knows to be valid.
    pub(crate) fn from_sorted(points: Vec<f64>) -> Grid {
        debug_assert!(points.len() >= 2);
        debug_assert!(points.windows(2).all(|pair| pair[0] < pair[1]));
        Grid {
            id: Uuid::new_v4(),
            points,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn front(&self) -> f64 {
        self.points[0]
    }

    pub fn back(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Whether every value in `subset` is one of the grid points.
    pub fn contains_all(&self, subset: &[f64]) -> bool {
        subset
            .iter()
            .all(|x| self.points.binary_search_by(|p| p.total_cmp(x)).is_ok())
    }

    pub fn into_points(self) -> Vec<f64> {
        self.points
    }
}
