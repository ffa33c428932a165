// Translator sets: the vector-side counterpart of `PointSet`.
//
// A `VectorSet` holds the translators of a pattern — every vector mapping
// the pattern onto an occurrence. Same container discipline as points:
// canonical order, no duplicates. The inter-set order (size first, then
// element-wise) is what the structural tie-breaks in ranking use.

use crate::point::Vector;
use crate::sorted_set::SortedSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordered, duplicate-free set of translation vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorSet {
    vectors: SortedSet<Vector>,
}

impl VectorSet {
    pub fn new() -> Self {
        VectorSet::default()
    }

    pub fn from_vectors(vectors: Vec<Vector>) -> Self {
        VectorSet {
            vectors: SortedSet::from_vec(vectors),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn first(&self) -> Option<Vector> {
        self.vectors.first().copied()
    }

    pub fn get(&self, i: usize) -> Option<Vector> {
        self.vectors.get(i).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector> + '_ {
        self.vectors.iter().copied()
    }

    pub fn as_slice(&self) -> &[Vector] {
        self.vectors.as_slice()
    }

    pub fn contains(&self, v: Vector) -> bool {
        self.vectors.contains(&v)
    }

    pub fn insert(&mut self, v: Vector) -> bool {
        self.vectors.insert(v)
    }

    pub fn remove(&mut self, v: Vector) -> bool {
        self.vectors.remove(&v)
    }

    pub fn union_with(&mut self, other: &VectorSet) {
        self.vectors.union_with(&other.vectors);
    }

    /// Vectors of `self` not in `other`.
    pub fn difference(&self, other: &VectorSet) -> VectorSet {
        VectorSet {
            vectors: self.vectors.difference(&other.vectors),
        }
    }

    /// Every vector shifted by `v` — re-basing a translator set around a
    /// different origin occurrence.
    pub fn translate(&self, v: Vector) -> VectorSet {
        // A uniform shift preserves canonical order.
        VectorSet {
            vectors: SortedSet::from_vec(self.iter().map(|w| w + v).collect()),
        }
    }
}

impl Ord for VectorSet {
    /// Size first, then element-wise canonical order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.vectors.cmp(&other.vectors))
    }
}

impl PartialOrd for VectorSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromIterator<Vector> for VectorSet {
    fn from_iter<I: IntoIterator<Item = Vector>>(iter: I) -> Self {
        VectorSet::from_vectors(iter.into_iter().collect())
    }
}

impl fmt::Display for VectorSet {
    /// The container form of the canonical grammar: `V(v(x,y),...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V(")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for VectorSet {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::grammar::parse_vector_set(s)
    }
}

impl Serialize for VectorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.vectors.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VectorSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(VectorSet {
            vectors: SortedSet::deserialize(deserializer)?,
        })
    }
}
