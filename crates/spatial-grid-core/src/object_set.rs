use crate::types::ObjectHandle;
use std::collections::HashSet;

/// Order-preserving, duplicate-free collection of object handles.
///
/// A `HashSet` answers membership in O(1) while a `Vec` keeps insertion order
/// for iteration. Both always hold exactly the same handles.
///
/// `remove` scans the order vector linearly, so it costs O(len). Cells are
/// expected to hold few objects; very crowded cells make removal slower.
#[derive(Clone, Debug, Default)]
pub struct ObjectSet {
    order: Vec<ObjectHandle>,
    members: HashSet<ObjectHandle>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Add `object`, returning `false` if it was already present.
    pub fn add(&mut self, object: ObjectHandle) -> bool {
        if !self.members.insert(object) {
            return false;
        }
        self.order.push(object);
        true
    }

    /// Remove `object`, returning `false` if it was absent.
    pub fn remove(&mut self, object: ObjectHandle) -> bool {
        if !self.members.remove(&object) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|&h| h == object) {
            self.order.remove(pos);
        }
        true
    }

    /// Add every element of `other` in its insertion order, skipping handles
    /// already present.
    pub fn union_with(&mut self, other: &ObjectSet) {
        self.members.reserve(other.len());
        for &object in &other.order {
            self.add(object);
        }
    }

    /// Empty the set while keeping its allocations.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn contains(&self, object: ObjectHandle) -> bool {
        self.members.contains(&object)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, ObjectHandle>> {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[ObjectHandle] {
        &self.order
    }

    pub fn to_vec(&self) -> Vec<ObjectHandle> {
        self.order.clone()
    }
}

/// Two sets are equal when they hold the same handles, regardless of order.
impl PartialEq for ObjectSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for ObjectSet {}

impl<'a> IntoIterator for &'a ObjectSet {
    type Item = ObjectHandle;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ObjectHandle>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<ObjectHandle> for ObjectSet {
    fn extend<I: IntoIterator<Item = ObjectHandle>>(&mut self, iter: I) {
        for object in iter {
            self.add(object);
        }
    }
}

impl FromIterator<ObjectHandle> for ObjectSet {
    fn from_iter<I: IntoIterator<Item = ObjectHandle>>(iter: I) -> Self {
        let mut set = ObjectSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(ids: &[u64]) -> Vec<ObjectHandle> {
        ids.iter().copied().map(ObjectHandle).collect()
    }

    #[test]
    fn add_is_idempotent_and_keeps_first_position() {
        let mut set = ObjectSet::new();
        assert!(set.add(ObjectHandle(3)));
        assert!(set.add(ObjectHandle(1)));
        assert!(!set.add(ObjectHandle(3)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_vec(), handles(&[3, 1]));
    }

    #[test]
    fn remove_preserves_order_of_survivors() {
        let mut set: ObjectSet = handles(&[5, 6, 7, 8]).into_iter().collect();
        assert!(set.remove(ObjectHandle(6)));
        assert!(!set.remove(ObjectHandle(6)));
        assert!(!set.contains(ObjectHandle(6)));
        assert_eq!(set.to_vec(), handles(&[5, 7, 8]));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set: ObjectSet = handles(&[1]).into_iter().collect();
        assert!(!set.remove(ObjectHandle(42)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn union_appends_in_other_order_without_duplicates() {
        let mut a: ObjectSet = handles(&[1, 2]).into_iter().collect();
        let b: ObjectSet = handles(&[4, 2, 3]).into_iter().collect();
        a.union_with(&b);
        assert_eq!(a.to_vec(), handles(&[1, 2, 4, 3]));
        // `other` is untouched.
        assert_eq!(b.to_vec(), handles(&[4, 2, 3]));
    }

    #[test]
    fn union_with_empty_changes_nothing() {
        let mut a: ObjectSet = handles(&[9]).into_iter().collect();
        a.union_with(&ObjectSet::new());
        assert_eq!(a.to_vec(), handles(&[9]));
    }

    #[test]
    fn clear_empties_sequence_and_membership() {
        let mut set: ObjectSet = handles(&[1, 2, 3]).into_iter().collect();
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(ObjectHandle(2)));
        assert!(set.add(ObjectHandle(2)));
        assert_eq!(set.to_vec(), handles(&[2]));
    }

    #[test]
    fn equality_ignores_order() {
        let a: ObjectSet = handles(&[1, 2, 3]).into_iter().collect();
        let b: ObjectSet = handles(&[3, 1, 2]).into_iter().collect();
        assert_eq!(a, b);
    }
}
