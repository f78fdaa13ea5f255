use super::Grid;
use crate::cell::Cell;
use crate::config::GridConfig;
use crate::types::{CellCoord, ObjectHandle, Position};
use serde::{Deserialize, Serialize};

/// Occupancy of one non-empty cell, for external renderers and tooling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub coord: CellCoord,
    pub anchor: Position,
    pub members: Vec<ObjectHandle>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub config: GridConfig,
    pub dimension: usize,
    pub object_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occupied_cells: Vec<CellSnapshot>,
}

impl Grid {
    /// Read-only walk over every cell, z-major then x.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        let dimension = self.dimension;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (CellCoord::new(i % dimension, i / dimension), cell))
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        self.cells().filter(|(_, cell)| !cell.is_empty())
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            config: self.config.clone(),
            dimension: self.dimension,
            object_count: self.len(),
            occupied_cells: self
                .occupied_cells()
                .map(|(coord, cell)| CellSnapshot {
                    coord,
                    anchor: cell.anchor(),
                    members: cell.members().to_vec(),
                })
                .collect(),
        }
    }
}
