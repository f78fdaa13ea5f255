use crate::object_set::ObjectSet;
use crate::types::{ObjectHandle, Position};

/// One square subdivision of the grid.
/// Anchor and size are fixed at construction; only the members change.
#[derive(Clone, Debug)]
pub struct Cell {
    anchor: Position,
    size: f64,
    members: ObjectSet,
}

impl Cell {
    pub fn new(anchor: Position, size: f64) -> Self {
        Self {
            anchor,
            size,
            members: ObjectSet::new(),
        }
    }

    pub fn insert(&mut self, object: ObjectHandle) -> bool {
        self.members.add(object)
    }

    pub fn remove(&mut self, object: ObjectHandle) -> bool {
        self.members.remove(object)
    }

    pub(crate) fn clear(&mut self) {
        self.members.clear();
    }

    /// World-space center of the cell, `y = 0`.
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn members(&self) -> &ObjectSet {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Axis-aligned ground-plane bounds as `([min_x, min_z], [max_x, max_z])`.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let half = self.size * 0.5;
        (
            [self.anchor[0] - half, self.anchor[2] - half],
            [self.anchor[0] + half, self.anchor[2] + half],
        )
    }
}
