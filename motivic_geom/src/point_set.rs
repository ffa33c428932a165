// The dataset/pattern container: canonically ordered, duplicate-free points
// with cached geometric attributes.
//
// A `PointSet` is built up once (by a parser or an algorithm stage) and then
// queried many times — bounding box, temporal density, box subsets — so the
// derived attributes are computed lazily and cached. Any mutation drops the
// caches; the set is never observable in a stale state.
//
// Sets iterate in canonical order (onset, then pitch) always. Every
// algorithm downstream depends on that: vector tables are built per sorted
// index, column index sets are positions in this order, and pattern
// equivalence is checked point-for-point along it.

use crate::error::MetricError;
use crate::point::{Point, Vector};
use crate::rational::Rational;
use crate::sorted_set::SortedSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Bounding box of a non-empty point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_onset: i64,
    pub max_onset: i64,
    pub min_pitch: i32,
    pub max_pitch: i32,
}

impl Bounds {
    pub fn width(&self) -> i64 {
        self.max_onset - self.min_onset
    }

    pub fn height(&self) -> i32 {
        self.max_pitch - self.min_pitch
    }

    pub fn area(&self) -> i64 {
        self.width() * i64::from(self.height())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.onset >= self.min_onset
            && p.onset <= self.max_onset
            && p.pitch >= self.min_pitch
            && p.pitch <= self.max_pitch
    }
}

/// Ordered, duplicate-free set of points with cached geometry.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: SortedSet<Point>,
    bounds: OnceLock<Option<Bounds>>,
    temporal_density: OnceLock<Option<f64>>,
}

impl PointSet {
    pub fn new() -> Self {
        PointSet::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        PointSet {
            points: SortedSet::from_vec(points),
            bounds: OnceLock::new(),
            temporal_density: OnceLock::new(),
        }
    }

    fn from_sorted(points: SortedSet<Point>) -> Self {
        PointSet {
            points,
            bounds: OnceLock::new(),
            temporal_density: OnceLock::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Point at position `i` in canonical order.
    pub fn get(&self, i: usize) -> Option<Point> {
        self.points.get(i).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn as_slice(&self) -> &[Point] {
        self.points.as_slice()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.points.contains(&p)
    }

    pub fn contains_set(&self, other: &PointSet) -> bool {
        other.points.is_subset(&self.points)
    }

    /// Insert a point. Returns false for a duplicate. Drops caches.
    pub fn insert(&mut self, p: Point) -> bool {
        let changed = self.points.insert(p);
        if changed {
            self.invalidate_caches();
        }
        changed
    }

    /// Remove a point. Returns true if it was present. Drops caches.
    pub fn remove(&mut self, p: Point) -> bool {
        let changed = self.points.remove(&p);
        if changed {
            self.invalidate_caches();
        }
        changed
    }

    /// Remove every point of `other`. Drops caches if anything changed.
    pub fn remove_set(&mut self, other: &PointSet) -> bool {
        let mut changed = false;
        for p in other.iter() {
            changed |= self.points.remove(&p);
        }
        if changed {
            self.invalidate_caches();
        }
        changed
    }

    /// Add every point of `other`. Drops caches if anything changed.
    pub fn union_with(&mut self, other: &PointSet) {
        let before = self.points.len();
        self.points.union_with(&other.points);
        if self.points.len() != before {
            self.invalidate_caches();
        }
    }

    fn invalidate_caches(&mut self) {
        self.bounds = OnceLock::new();
        self.temporal_density = OnceLock::new();
    }

    // -----------------------------------------------------------------
    // Cached geometry
    // -----------------------------------------------------------------

    /// Bounding box, or `None` for the empty set. Computed once.
    pub fn bounds(&self) -> Option<Bounds> {
        *self.bounds.get_or_init(|| {
            let first = self.points.first()?;
            let mut b = Bounds {
                min_onset: first.onset,
                max_onset: first.onset,
                min_pitch: first.pitch,
                max_pitch: first.pitch,
            };
            for p in self.points.iter() {
                b.min_onset = b.min_onset.min(p.onset);
                b.max_onset = b.max_onset.max(p.onset);
                b.min_pitch = b.min_pitch.min(p.pitch);
                b.max_pitch = b.max_pitch.max(p.pitch);
            }
            Some(b)
        })
    }

    /// Onset span of the bounding box; 0 for the empty set.
    pub fn width(&self) -> i64 {
        self.bounds().map_or(0, |b| b.width())
    }

    /// Pitch span of the bounding box; 0 for the empty set.
    pub fn height(&self) -> i32 {
        self.bounds().map_or(0, |b| b.height())
    }

    /// Bounding-box area; 0 for the empty set.
    pub fn bb_area(&self) -> i64 {
        self.bounds().map_or(0, |b| b.area())
    }

    /// Distinct onsets divided by onset span. Undefined for an empty set
    /// and for a set whose points share one onset.
    pub fn temporal_density(&self) -> Result<f64, MetricError> {
        if self.is_empty() {
            return Err(MetricError::EmptySet {
                metric: "temporal density",
            });
        }
        let cached = *self.temporal_density.get_or_init(|| {
            let span = self.width();
            if span == 0 {
                return None;
            }
            let mut distinct = 0usize;
            let mut last = None;
            for p in self.points.iter() {
                if last != Some(p.onset) {
                    distinct += 1;
                    last = Some(p.onset);
                }
            }
            Some(distinct as f64 / span as f64)
        });
        cached.ok_or(MetricError::ZeroOnsetSpan)
    }

    /// This set's size divided by the number of `dataset` points inside its
    /// bounding box — how exclusively the set occupies its own region.
    pub fn compactness_within(&self, dataset: &PointSet) -> Result<f64, MetricError> {
        let Some(bounds) = self.bounds() else {
            return Err(MetricError::EmptySet {
                metric: "compactness",
            });
        };
        let in_box = dataset.points_within(bounds).len();
        if in_box == 0 {
            return Err(MetricError::EmptyBoundingBox);
        }
        Ok(self.len() as f64 / in_box as f64)
    }

    /// Width/height ratio of the bounding box.
    pub fn aspect_ratio(&self) -> Result<f64, MetricError> {
        let Some(bounds) = self.bounds() else {
            return Err(MetricError::EmptySet {
                metric: "aspect ratio",
            });
        };
        if bounds.height() == 0 {
            return Err(MetricError::ZeroPitchSpan {
                metric: "aspect ratio",
            });
        }
        Ok(bounds.width() as f64 / f64::from(bounds.height()))
    }

    /// How far the bounding box is from square: `|1 - aspect_ratio|`.
    pub fn unsquareness(&self) -> Result<f64, MetricError> {
        Ok((1.0 - self.aspect_ratio()?).abs())
    }

    /// How far the centroid sits from the bounding-box center, normalized
    /// per axis and summed.
    pub fn eccentricity(&self) -> Result<f64, MetricError> {
        let Some(bounds) = self.bounds() else {
            return Err(MetricError::EmptySet {
                metric: "eccentricity",
            });
        };
        if bounds.width() == 0 {
            return Err(MetricError::ZeroWidth {
                metric: "eccentricity",
            });
        }
        if bounds.height() == 0 {
            return Err(MetricError::ZeroPitchSpan {
                metric: "eccentricity",
            });
        }
        let n = self.len() as f64;
        let mean_onset = self.iter().map(|p| p.onset as f64).sum::<f64>() / n;
        let mean_pitch = self.iter().map(|p| f64::from(p.pitch)).sum::<f64>() / n;
        let center_onset = bounds.min_onset as f64 + bounds.width() as f64 / 2.0;
        let center_pitch = f64::from(bounds.min_pitch) + f64::from(bounds.height()) / 2.0;
        Ok((mean_onset - center_onset).abs() / bounds.width() as f64
            + (mean_pitch - center_pitch).abs() / f64::from(bounds.height()))
    }

    // -----------------------------------------------------------------
    // Geometric queries and images
    // -----------------------------------------------------------------

    /// Points of this set inside `bounds` (inclusive on all edges).
    pub fn points_within(&self, bounds: Bounds) -> PointSet {
        let slice = self.points.as_slice();
        // Points are sorted by onset first, so the onset range is a
        // contiguous slice; only pitch needs filtering.
        let start = slice.partition_point(|p| p.onset < bounds.min_onset);
        let end = slice.partition_point(|p| p.onset <= bounds.max_onset);
        PointSet::from_points(
            slice[start..end]
                .iter()
                .copied()
                .filter(|p| p.pitch >= bounds.min_pitch && p.pitch <= bounds.max_pitch)
                .collect(),
        )
    }

    /// Box subset from two corners. Inverted corners are a degenerate input:
    /// warn and swap rather than fail, since upstream geometry is sometimes
    /// sloppy about corner order.
    pub fn bounding_box_subset(&self, top_left: Point, bottom_right: Point) -> PointSet {
        let mut bounds = Bounds {
            min_onset: top_left.onset,
            max_onset: bottom_right.onset,
            min_pitch: bottom_right.pitch,
            max_pitch: top_left.pitch,
        };
        if bounds.min_onset > bounds.max_onset {
            tracing::warn!(
                "inverted bounding-box corners on the onset axis: {} > {}",
                bounds.min_onset,
                bounds.max_onset
            );
            std::mem::swap(&mut bounds.min_onset, &mut bounds.max_onset);
        }
        if bounds.min_pitch > bounds.max_pitch {
            tracing::warn!(
                "inverted bounding-box corners on the pitch axis: {} > {}",
                bounds.min_pitch,
                bounds.max_pitch
            );
            std::mem::swap(&mut bounds.min_pitch, &mut bounds.max_pitch);
        }
        self.points_within(bounds)
    }

    /// The translation image of the whole set.
    pub fn translate(&self, v: Vector) -> PointSet {
        // Translation preserves canonical order.
        PointSet::from_sorted(SortedSet::from_vec(
            self.iter().map(|p| p.translate(v)).collect(),
        ))
    }

    /// Points of `self` not in `other`.
    pub fn difference(&self, other: &PointSet) -> PointSet {
        PointSet::from_sorted(self.points.difference(&other.points))
    }

    /// Points present in both sets.
    pub fn intersection(&self, other: &PointSet) -> PointSet {
        PointSet::from_sorted(self.points.intersection(&other.points))
    }

    /// Points with onset in `[start, end)`, or `[start, end]` when
    /// `inclusive` is set.
    pub fn segment(&self, start: i64, end: i64, inclusive: bool) -> PointSet {
        PointSet::from_points(
            self.iter()
                .filter(|p| p.onset >= start && if inclusive { p.onset <= end } else { p.onset < end })
                .collect(),
        )
    }

    /// Positions of `pattern`'s points within this set's canonical order.
    /// `None` if some pattern point is not in this set.
    pub fn index_set(&self, pattern: &PointSet) -> Option<Vec<usize>> {
        let slice = self.points.as_slice();
        pattern
            .iter()
            .map(|p| slice.binary_search(&p).ok())
            .collect()
    }

    /// True when one uniform vector maps this set point-for-point onto
    /// `other` along the canonical order.
    pub fn translationally_equivalent_to(&self, other: &PointSet) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut expected: Option<Vector> = None;
        for (p, q) in self.iter().zip(other.iter()) {
            let v = p.vector_to(q);
            match expected {
                None => expected = Some(v),
                Some(e) if e != v => return false,
                Some(_) => {}
            }
        }
        true
    }

    /// Time-axis scaling about the first point. Scaled offsets that fall
    /// between lattice positions are floored onto the lattice.
    pub fn scale(&self, factor: Rational) -> PointSet {
        let Some(origin) = self.first() else {
            return PointSet::new();
        };
        PointSet::from_points(
            self.iter()
                .map(|p| {
                    let offset = Rational::from_integer(p.onset - origin.onset);
                    let scaled = factor.mul(offset).floor();
                    Point::with_voice(origin.onset + scaled, p.pitch, p.voice, p.duration)
                })
                .collect(),
        )
    }

    /// Image with every pitch negated.
    pub fn inversion(&self) -> PointSet {
        PointSet::from_points(self.iter().map(Point::inversion).collect())
    }

    /// Time-axis mirror image.
    pub fn retrograde(&self) -> PointSet {
        PointSet::from_points(self.iter().map(Point::retrograde).collect())
    }
}

impl PartialEq for PointSet {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl Eq for PointSet {}

impl Ord for PointSet {
    fn cmp(&self, other: &Self) -> Ordering {
        self.points.cmp(&other.points)
    }
}

impl PartialOrd for PointSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        PointSet::from_points(iter.into_iter().collect())
    }
}

impl fmt::Display for PointSet {
    /// The container form of the canonical grammar: `P(p(x,y),...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P(")?;
        for (i, p) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for PointSet {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::grammar::parse_point_set(s)
    }
}

impl Serialize for PointSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PointSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PointSet::from_sorted(SortedSet::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ps(points: &[(i64, i32)]) -> PointSet {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn iterates_in_canonical_order() {
        let set = ps(&[(3, 1), (0, 5), (0, 2), (3, 0)]);
        let onsets: Vec<(i64, i32)> = set.iter().map(|p| (p.onset, p.pitch)).collect();
        assert_eq!(onsets, vec![(0, 2), (0, 5), (3, 0), (3, 1)]);
    }

    #[test]
    fn duplicates_collapse() {
        let set = ps(&[(1, 1), (1, 1), (2, 2)]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn bounds_cached_and_invalidated() {
        let mut set = ps(&[(0, 10), (4, 2)]);
        let b = set.bounds().unwrap();
        assert_eq!((b.min_onset, b.max_onset, b.min_pitch, b.max_pitch), (0, 4, 2, 10));
        assert_eq!(set.bb_area(), 4 * 8);

        set.insert(Point::new(9, 20));
        let b = set.bounds().unwrap();
        assert_eq!((b.max_onset, b.max_pitch), (9, 20));

        set.remove(Point::new(9, 20));
        assert_eq!(set.bounds().unwrap().max_onset, 4);
    }

    #[test]
    fn temporal_density_counts_distinct_onsets() {
        // Onsets 0, 0, 2, 4 -> 3 distinct over span 4.
        let set = ps(&[(0, 1), (0, 5), (2, 3), (4, 0)]);
        let d = set.temporal_density().unwrap();
        assert!((d - 0.75).abs() < 1e-12);
    }

    #[test]
    fn temporal_density_undefined_cases() {
        assert_eq!(
            PointSet::new().temporal_density(),
            Err(MetricError::EmptySet {
                metric: "temporal density"
            })
        );
        assert_eq!(
            ps(&[(5, 1), (5, 9)]).temporal_density(),
            Err(MetricError::ZeroOnsetSpan)
        );
    }

    #[test]
    fn compactness_within_dataset() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let pattern = ps(&[(0, 0), (2, 0)]);
        // Pattern box spans onsets 0..=2 and contains 3 dataset points.
        let c = pattern.compactness_within(&dataset).unwrap();
        assert!((c - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_subset_swaps_inverted_corners() {
        let dataset = ps(&[(0, 0), (1, 1), (2, 2)]);
        // Corners deliberately reversed on both axes.
        let subset = dataset.bounding_box_subset(Point::new(2, 0), Point::new(0, 2));
        assert_eq!(subset.len(), 3);
    }

    #[test]
    fn difference_and_intersection() {
        let a = ps(&[(0, 0), (1, 1), (2, 2)]);
        let b = ps(&[(1, 1), (3, 3)]);
        assert_eq!(a.difference(&b), ps(&[(0, 0), (2, 2)]));
        assert_eq!(a.intersection(&b), ps(&[(1, 1)]));
    }

    #[test]
    fn index_set_finds_positions() {
        let dataset = ps(&[(0, 0), (1, 1), (2, 2), (3, 3)]);
        let pattern = ps(&[(1, 1), (3, 3)]);
        assert_eq!(dataset.index_set(&pattern), Some(vec![1, 3]));
        assert_eq!(dataset.index_set(&ps(&[(9, 9)])), None);
    }

    #[test]
    fn translational_equivalence() {
        let a = ps(&[(0, 0), (1, 2)]);
        let b = ps(&[(10, 5), (11, 7)]);
        let c = ps(&[(10, 5), (11, 8)]);
        assert!(a.translationally_equivalent_to(&b));
        assert!(!a.translationally_equivalent_to(&c));
        assert!(!a.translationally_equivalent_to(&ps(&[(0, 0)])));
    }

    #[test]
    fn scale_doubles_offsets() {
        let set = ps(&[(4, 0), (6, 1), (8, 2)]);
        let scaled = set.scale(Rational::from_integer(2));
        assert_eq!(scaled, ps(&[(4, 0), (8, 1), (12, 2)]));
    }

    #[test]
    fn scale_floors_off_lattice_offsets() {
        let set = ps(&[(0, 0), (1, 1), (2, 2)]);
        let scaled = set.scale(Rational::new(1, 2).unwrap());
        assert_eq!(scaled, ps(&[(0, 0), (0, 1), (1, 2)]));
    }

    #[test]
    fn segment_extracts_time_window() {
        let set = ps(&[(0, 0), (2, 0), (4, 0), (6, 0)]);
        assert_eq!(set.segment(2, 6, false), ps(&[(2, 0), (4, 0)]));
        assert_eq!(set.segment(2, 6, true), ps(&[(2, 0), (4, 0), (6, 0)]));
    }

    #[test]
    fn shape_diagnostics() {
        // 4 wide, 2 tall: aspect ratio 2, unsquareness 1.
        let set = ps(&[(0, 0), (4, 2)]);
        assert!((set.aspect_ratio().unwrap() - 2.0).abs() < 1e-12);
        assert!((set.unsquareness().unwrap() - 1.0).abs() < 1e-12);
        // Mass piled at one corner pulls the centroid off-center.
        let lopsided = ps(&[(0, 0), (0, 1), (1, 0), (1, 1), (4, 4)]);
        assert!(lopsided.eccentricity().unwrap() > 0.0);
        // A symmetric set is centered.
        let symmetric = ps(&[(0, 0), (2, 2), (0, 2), (2, 0)]);
        assert!(symmetric.eccentricity().unwrap() < 1e-12);
        assert!(ps(&[(3, 1), (5, 1)]).eccentricity().is_err());
    }

    #[test]
    fn display_is_grammar_form() {
        assert_eq!(ps(&[(1, 2), (0, 3)]).to_string(), "P(p(0,3),p(1,2))");
        assert_eq!(PointSet::new().to_string(), "P()");
    }
}
