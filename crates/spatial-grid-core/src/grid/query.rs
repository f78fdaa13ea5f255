use super::{Grid, GridError};
use crate::cell::Cell;
use crate::object_set::ObjectSet;
use crate::types::{CellCoord, Position};
use tracing::trace;

/// Inclusive rectangle of cell coordinates touched by a range query.
///
/// Only built by [`Grid::candidate_cells`], so `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    min: CellCoord,
    max: CellCoord,
}

impl CellRange {
    pub fn min(&self) -> CellCoord {
        self.min
    }

    pub fn max(&self) -> CellCoord {
        self.max
    }

    /// Cells in query order: x outer, z inner.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| (min.z..=max.z).map(move |z| CellCoord::new(x, z)))
    }

    /// Never zero: a range always covers at least one cell.
    pub fn cell_count(&self) -> usize {
        (self.max.x - self.min.x + 1) * (self.max.z - self.min.z + 1)
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        (self.min.x..=self.max.x).contains(&coord.x) && (self.min.z..=self.max.z).contains(&coord.z)
    }
}

fn validate_radius(radius: f64) -> Result<(), GridError> {
    // NaN fails the comparison too.
    if radius >= 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidRadius(radius))
    }
}

/// Union the members of every cell in `range` into `out`, after clearing it.
fn collect_range(cells: &[Cell], dimension: usize, range: CellRange, out: &mut ObjectSet) {
    out.clear();
    for coord in range.iter() {
        out.union_with(cells[coord.z * dimension + coord.x].members());
    }
}

impl Grid {
    /// Cells intersecting the bounding square of the circle at `position`
    /// with `radius`. Each axis is bounded independently. Negative or NaN
    /// radii are treated as zero.
    pub fn candidate_cells(&self, position: Position, radius: f64) -> CellRange {
        let radius = radius.max(0.0);
        let [px, py, pz] = position;
        let min_x = self.cell_index_of([px - radius, py, pz]).x;
        let max_x = self.cell_index_of([px + radius, py, pz]).x;
        let min_z = self.cell_index_of([px, py, pz - radius]).z;
        let max_z = self.cell_index_of([px, py, pz + radius]).z;
        CellRange {
            min: CellCoord::new(min_x, min_z),
            max: CellCoord::new(max_x, max_z),
        }
    }

    /// Every object in a cell that intersects the query's bounding square.
    ///
    /// The result is a superset of the objects truly within `radius`; filter
    /// by exact distance if that matters. `radius = 0` still returns the
    /// contents of the cell containing `position`.
    ///
    /// The returned set is a buffer owned by the grid and refilled on every
    /// call. It borrows the grid mutably, so it cannot outlive the next query
    /// or any insert/remove. Copy it out with [`ObjectSet::to_vec`] or use
    /// [`query_into`](Self::query_into) to keep results.
    pub fn objects_in_radius(&mut self, position: Position, radius: f64) -> Result<&ObjectSet, GridError> {
        validate_radius(radius)?;
        let range = self.candidate_cells(position, radius);
        collect_range(&self.cells, self.dimension, range, &mut self.query_result);
        trace!(
            ?position,
            radius,
            cells = range.cell_count(),
            found = self.query_result.len(),
            "radius query"
        );
        Ok(&self.query_result)
    }

    /// Same as [`objects_in_radius`](Self::objects_in_radius), writing into a
    /// caller-owned buffer. `out` is cleared first.
    pub fn query_into(&self, position: Position, radius: f64, out: &mut ObjectSet) -> Result<(), GridError> {
        validate_radius(radius)?;
        let range = self.candidate_cells(position, radius);
        collect_range(&self.cells, self.dimension, range, out);
        Ok(())
    }
}
