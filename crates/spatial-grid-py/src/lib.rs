use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use spatial_grid_core::{Grid, GridConfig, GridError, ObjectHandle};

fn to_py_err(err: GridError) -> PyErr {
    match err {
        GridError::ObjectNotFound(_) => PyKeyError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Python view of the spatial grid. Handles are plain integers; cell
/// coordinates come back as `(x, z)` tuples.
#[pyclass(name = "SpatialGrid")]
struct PySpatialGrid {
    inner: Grid,
}

#[pymethods]
impl PySpatialGrid {
    #[new]
    fn new(cell_size: f64, extent: f64) -> PyResult<Self> {
        let inner = Grid::try_new(GridConfig::new(cell_size, extent)).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn insert(&mut self, handle: u64, position: [f64; 3]) -> PyResult<(usize, usize)> {
        let cell = self
            .inner
            .insert(ObjectHandle(handle), position)
            .map_err(to_py_err)?;
        Ok((cell.x, cell.z))
    }

    fn remove(&mut self, handle: u64) -> PyResult<(usize, usize)> {
        let cell = self.inner.remove(ObjectHandle(handle)).map_err(to_py_err)?;
        Ok((cell.x, cell.z))
    }

    fn relocate(&mut self, handle: u64, position: [f64; 3]) -> PyResult<(usize, usize)> {
        let cell = self
            .inner
            .relocate(ObjectHandle(handle), position)
            .map_err(to_py_err)?;
        Ok((cell.x, cell.z))
    }

    /// Candidate handles near `position`; a fresh list per call.
    fn objects_in_radius(&mut self, position: [f64; 3], radius: f64) -> PyResult<Vec<u64>> {
        let result = self
            .inner
            .objects_in_radius(position, radius)
            .map_err(to_py_err)?;
        Ok(result.iter().map(|h| h.0).collect())
    }

    fn cell_index_of(&self, position: [f64; 3]) -> (usize, usize) {
        let cell = self.inner.cell_index_of(position);
        (cell.x, cell.z)
    }

    fn contains(&self, handle: u64) -> bool {
        self.inner.contains(ObjectHandle(handle))
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    #[getter]
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<PySpatialGrid>()?;
    Ok(())
}
