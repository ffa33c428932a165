// Ordered, duplicate-free container backing `PointSet` and `VectorSet`.
//
// The element type's `Ord` impl is the single source of ordering truth:
// the container itself adds nothing but the sorted-unique invariant, so
// iteration order is always the canonical order of the elements. Storage
// is a sorted `Vec` — the sets here are built up once and then scanned
// and intersected many times, which favors contiguous storage and merge
// walks over tree nodes.

use serde::{Deserialize, Deserializer, Serialize};

/// A sorted, duplicate-free sequence of `T`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SortedSet<T> {
    items: Vec<T>,
}

impl<T: Ord> SortedSet<T> {
    pub fn new() -> Self {
        SortedSet { items: Vec::new() }
    }

    /// Build from arbitrary input: sorts and drops duplicates.
    pub fn from_vec(mut items: Vec<T>) -> Self {
        items.sort_unstable();
        items.dedup();
        SortedSet { items }
    }

    /// Insert, keeping order. Returns false if the value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        match self.items.binary_search(&value) {
            Ok(_) => false,
            Err(idx) => {
                self.items.insert(idx, value);
                true
            }
        }
    }

    /// Remove a value. Returns true if it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.items.binary_search(value) {
            Ok(idx) => {
                self.items.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.binary_search(value).is_ok()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Element at position `i` in canonical order.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.items.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Elements of `self` not in `other`, by a single merge walk.
    pub fn difference(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        let mut out = Vec::new();
        let mut rhs = other.items.iter().peekable();
        for item in &self.items {
            while rhs.peek().is_some_and(|r| *r < item) {
                rhs.next();
            }
            if rhs.peek().is_none_or(|r| *r != item) {
                out.push(item.clone());
            }
        }
        SortedSet { items: out }
    }

    /// Elements present in both sets.
    pub fn intersection(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        let mut out = Vec::new();
        let mut rhs = other.items.iter().peekable();
        for item in &self.items {
            while rhs.peek().is_some_and(|r| *r < item) {
                rhs.next();
            }
            if rhs.peek().is_some_and(|r| *r == item) {
                out.push(item.clone());
            }
        }
        SortedSet { items: out }
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        let mut rhs = other.items.iter().peekable();
        for item in &self.items {
            while rhs.peek().is_some_and(|r| *r < item) {
                rhs.next();
            }
            if rhs.peek().is_none_or(|r| *r != item) {
                return false;
            }
        }
        true
    }

    /// Add every element of `other`.
    pub fn union_with(&mut self, other: &Self)
    where
        T: Clone,
    {
        if other.is_empty() {
            return;
        }
        let lhs = std::mem::take(&mut self.items);
        let rhs = &other.items;
        let mut merged = Vec::with_capacity(lhs.len() + rhs.len());
        let mut j = 0;
        for item in lhs {
            while j < rhs.len() && rhs[j] < item {
                merged.push(rhs[j].clone());
                j += 1;
            }
            if j < rhs.len() && rhs[j] == item {
                j += 1;
            }
            merged.push(item);
        }
        merged.extend(rhs[j..].iter().cloned());
        self.items = merged;
    }
}

impl<T: Ord> Default for SortedSet<T> {
    fn default() -> Self {
        SortedSet::new()
    }
}

impl<T: Ord> FromIterator<T> for SortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SortedSet::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a SortedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for SortedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

// Deserialization re-establishes the sorted-unique invariant rather than
// trusting the serialized order.
impl<'de, T: Ord + Deserialize<'de>> Deserialize<'de> for SortedSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(SortedSet::from_vec(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_sorts_and_dedups() {
        let s = SortedSet::from_vec(vec![3, 1, 2, 3, 1]);
        assert_eq!(s.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn insert_keeps_order_and_rejects_duplicates() {
        let mut s = SortedSet::new();
        assert!(s.insert(5));
        assert!(s.insert(1));
        assert!(!s.insert(5));
        assert_eq!(s.as_slice(), &[1, 5]);
    }

    #[test]
    fn set_algebra() {
        let a = SortedSet::from_vec(vec![1, 2, 3, 4]);
        let b = SortedSet::from_vec(vec![2, 4, 6]);
        assert_eq!(a.difference(&b).as_slice(), &[1, 3]);
        assert_eq!(a.intersection(&b).as_slice(), &[2, 4]);
        assert!(SortedSet::from_vec(vec![2, 4]).is_subset(&a));
        assert!(!b.is_subset(&a));

        let mut u = a.clone();
        u.union_with(&b);
        assert_eq!(u.as_slice(), &[1, 2, 3, 4, 6]);
    }

    #[test]
    fn deserialize_restores_invariant() {
        let s: SortedSet<i32> = serde_json::from_str("[3,1,2,2]").unwrap();
        assert_eq!(s.as_slice(), &[1, 2, 3]);
    }
}
