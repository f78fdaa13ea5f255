use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Construction parameters for a [`Grid`](crate::grid::Grid).
///
/// Both values are fixed for the grid's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Side length of each square cell.
    pub cell_size: f64,
    /// Total world span covered on each axis, centered on the origin.
    pub extent: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            extent: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridConfigError {
    NonPositiveCellSize(f64),
    NonPositiveExtent(f64),
    TooManyCells { max: usize, actual: f64 },
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridConfigError::NonPositiveCellSize(v) => {
                write!(f, "cell_size must be finite and positive (got {v})")
            }
            GridConfigError::NonPositiveExtent(v) => {
                write!(f, "extent must be finite and positive (got {v})")
            }
            GridConfigError::TooManyCells { max, actual } => write!(
                f,
                "extent / cell_size yields {actual} cells per axis, exceeding supported maximum ({max})"
            ),
        }
    }
}

impl Error for GridConfigError {}

impl GridConfig {
    /// Hard ceiling on cells per axis. Every cell is allocated up front, so
    /// the maximum grid holds about a million empty cells.
    pub const MAX_DIMENSION: usize = 1024;

    pub fn new(cell_size: f64, extent: f64) -> Self {
        Self { cell_size, extent }
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(GridConfigError::NonPositiveCellSize(self.cell_size));
        }
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(GridConfigError::NonPositiveExtent(self.extent));
        }
        let cells_per_axis = round_half_up(self.extent / self.cell_size) + 1.0;
        if cells_per_axis > Self::MAX_DIMENSION as f64 {
            return Err(GridConfigError::TooManyCells {
                max: Self::MAX_DIMENSION,
                actual: cells_per_axis,
            });
        }
        Ok(())
    }

    /// Cells per axis: `round(extent / cell_size) + 1`.
    ///
    /// Only meaningful for a config that passes [`validate`](Self::validate).
    pub fn dimension(&self) -> usize {
        (round_half_up(self.extent / self.cell_size) + 1.0) as usize
    }
}

/// `floor(v + 0.5)`: ties always go to the higher integer.
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}
