pub mod query;
pub mod snapshot;

pub use query::CellRange;
pub use snapshot::*;

use crate::cell::Cell;
use crate::config::{round_half_up, GridConfig, GridConfigError};
use crate::object_set::ObjectSet;
use crate::types::{CellCoord, ObjectHandle, Position};
use std::collections::HashMap;
use std::{error::Error, fmt};
use tracing::{debug, trace};

/// Initial capacity of the shared query buffer.
const QUERY_RESULT_PREALLOCATE: usize = 100;

/// Uniform square grid over the x/z ground plane.
///
/// World coordinates span roughly `[-extent/2, +extent/2]` on both axes.
/// Positions outside that range are folded onto the border ring of cells
/// rather than rejected.
///
/// All mutation goes through `&mut self` and there is no internal locking:
/// the grid is meant to be owned by a single update loop. Share it across
/// threads only behind an external lock.
#[derive(Clone, Debug)]
pub struct Grid {
    config: GridConfig,
    dimension: usize,
    half_extent: f64,
    /// Row-major by z: cell `(x, z)` lives at `z * dimension + x`.
    cells: Vec<Cell>,
    object_index: HashMap<ObjectHandle, CellCoord>,
    query_result: ObjectSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    InvalidConfiguration(GridConfigError),
    ObjectNotFound(ObjectHandle),
    DuplicateInsert { object: ObjectHandle, cell: CellCoord },
    InvalidRadius(f64),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidConfiguration(e) => write!(f, "invalid grid configuration: {e}"),
            GridError::ObjectNotFound(object) => {
                write!(f, "object {object} is not tracked by this grid")
            }
            GridError::DuplicateInsert { object, cell } => {
                write!(f, "object {object} is already tracked in cell {cell}")
            }
            GridError::InvalidRadius(r) => {
                write!(f, "query radius must be non-negative (got {r})")
            }
        }
    }
}

impl From<GridConfigError> for GridError {
    fn from(err: GridConfigError) -> Self {
        GridError::InvalidConfiguration(err)
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GridError::InvalidConfiguration(e) => Some(e),
            _ => None,
        }
    }
}

impl Grid {
    pub fn new(config: GridConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        let dimension = config.dimension();
        let half_extent = config.extent * 0.5;

        let mut cells = Vec::with_capacity(dimension * dimension);
        for z in 0..dimension {
            for x in 0..dimension {
                let anchor = [
                    x as f64 * config.cell_size - half_extent,
                    0.0,
                    z as f64 * config.cell_size - half_extent,
                ];
                cells.push(Cell::new(anchor, config.cell_size));
            }
        }

        debug!(
            cell_size = config.cell_size,
            extent = config.extent,
            dimension,
            "spatial grid created"
        );

        Ok(Self {
            config,
            dimension,
            half_extent,
            cells,
            object_index: HashMap::new(),
            query_result: ObjectSet::with_capacity(QUERY_RESULT_PREALLOCATE),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cell_size(&self) -> f64 {
        self.config.cell_size
    }

    pub fn extent(&self) -> f64 {
        self.config.extent
    }

    /// Number of cells per axis.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Map a world position to its cell, clamping onto the border ring.
    ///
    /// Rounds half-up, so a position exactly between two cells lands in the
    /// higher one. A NaN component maps to index 0.
    pub fn cell_index_of(&self, position: Position) -> CellCoord {
        CellCoord::new(self.axis_index(position[0]), self.axis_index(position[2]))
    }

    /// Cell index along one axis before clamping; may be negative, past the
    /// last cell, or NaN.
    fn raw_axis_index(&self, v: f64) -> f64 {
        round_half_up((v + self.half_extent) / self.config.cell_size)
    }

    fn axis_index(&self, v: f64) -> usize {
        let idx = self.raw_axis_index(v);
        if idx.is_nan() {
            return 0;
        }
        idx.clamp(0.0, (self.dimension - 1) as f64) as usize
    }

    /// Whether `position` maps to a cell without clamping on either axis.
    pub fn in_bounds(&self, position: Position) -> bool {
        let last = (self.dimension - 1) as f64;
        [position[0], position[2]]
            .into_iter()
            .map(|v| self.raw_axis_index(v))
            .all(|idx| (0.0..=last).contains(&idx))
    }

    fn flat_index(&self, coord: CellCoord) -> usize {
        coord.z * self.dimension + coord.x
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        if coord.x >= self.dimension || coord.z >= self.dimension {
            return None;
        }
        self.cells.get(self.flat_index(coord))
    }

    /// Start tracking `object` at `position`.
    ///
    /// Fails with [`GridError::DuplicateInsert`] if the object is already
    /// tracked; the grid is left unchanged in that case. Use
    /// [`relocate`](Self::relocate) to move a tracked object.
    pub fn insert(&mut self, object: ObjectHandle, position: Position) -> Result<CellCoord, GridError> {
        if let Some(&cell) = self.object_index.get(&object) {
            return Err(GridError::DuplicateInsert { object, cell });
        }
        let coord = self.cell_index_of(position);
        if !self.in_bounds(position) {
            trace!(%object, ?position, cell = %coord, "position outside extent folded onto border");
        }
        self.object_index.insert(object, coord);
        let idx = self.flat_index(coord);
        let added = self.cells[idx].insert(object);
        debug_assert!(added, "{object} already present in cell {coord}");
        trace!(%object, cell = %coord, "inserted");
        Ok(coord)
    }

    /// Stop tracking `object`, returning the cell it occupied.
    pub fn remove(&mut self, object: ObjectHandle) -> Result<CellCoord, GridError> {
        let coord = self
            .object_index
            .remove(&object)
            .ok_or(GridError::ObjectNotFound(object))?;
        let idx = self.flat_index(coord);
        let removed = self.cells[idx].remove(object);
        debug_assert!(removed, "{object} missing from indexed cell {coord}");
        trace!(%object, cell = %coord, "removed");
        Ok(coord)
    }

    /// Move a tracked object to the cell for `position`.
    pub fn relocate(&mut self, object: ObjectHandle, position: Position) -> Result<CellCoord, GridError> {
        let new_coord = self.cell_index_of(position);
        let slot = self
            .object_index
            .get_mut(&object)
            .ok_or(GridError::ObjectNotFound(object))?;
        let old_coord = *slot;
        if old_coord == new_coord {
            return Ok(new_coord);
        }
        *slot = new_coord;
        let old_idx = self.flat_index(old_coord);
        let new_idx = self.flat_index(new_coord);
        let removed = self.cells[old_idx].remove(object);
        let added = self.cells[new_idx].insert(object);
        debug_assert!(removed && added, "{object} out of sync moving {old_coord} -> {new_coord}");
        trace!(%object, from = %old_coord, to = %new_coord, "relocated");
        Ok(new_coord)
    }

    pub fn contains(&self, object: ObjectHandle) -> bool {
        self.object_index.contains_key(&object)
    }

    /// Cell currently holding `object`, from the reverse index.
    pub fn cell_of(&self, object: ObjectHandle) -> Option<CellCoord> {
        self.object_index.get(&object).copied()
    }

    /// Number of tracked objects.
    pub fn len(&self) -> usize {
        self.object_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_index.is_empty()
    }

    /// Drop every tracked object. Cells and configuration are kept.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.object_index.clear();
        self.query_result.clear();
        debug!("spatial grid cleared");
    }
}
