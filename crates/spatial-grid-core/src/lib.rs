//! Uniform spatial grid for approximate radius queries over point objects on
//! the x/z ground plane.

pub mod cell;
pub mod config;
pub mod grid;
pub mod object_set;
pub mod types;

pub use cell::Cell;
pub use config::{GridConfig, GridConfigError};
pub use grid::{CellRange, CellSnapshot, Grid, GridError, GridSnapshot};
pub use object_set::ObjectSet;
pub use types::{CellCoord, ObjectHandle, Position};
