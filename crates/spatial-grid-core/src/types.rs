use serde::{Deserialize, Serialize};
use std::fmt;

/// World-space position `[x, y, z]`. The grid partitions the x/z ground plane;
/// `y` is carried along but never read.
pub type Position = [f64; 3];

/// Opaque identity of a tracked object. The grid only hashes and compares it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectHandle(pub u64);

impl From<u64> for ObjectHandle {
    fn from(id: u64) -> Self {
        ObjectHandle(id)
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer `(x, z)` coordinate of a cell in the grid array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: usize,
    pub z: usize,
}

impl CellCoord {
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
