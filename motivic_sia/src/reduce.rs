// Redundant-translator removal: shrink a TEC's translator set without
// changing the set of points it covers.
//
// A translator is redundant when every point it contributes is also
// contributed by some other translator. Finding a minimal such set exactly
// is a hitting-set problem, so the removal is staged:
//
// 1. Count how often each covered point is hit ("multipoints" are hit more
//    than once). No multipoints — nothing can go.
// 2. Candidates are the translators that map the *entire* pattern onto
//    multipoints, found by the same sort-and-partition matching used for
//    extraction, restricted to pattern points × multipoints.
// 3. Remove all candidates tentatively. If no point loses its last cover,
//    commit.
// 4. Otherwise the points that would be orphaned ("max points") each need
//    one of their covering candidates kept. Approximate the minimum
//    hitting set greedily: keep the candidate covering the most unhit max
//    points, repeat.
//
// Postconditions, both asserted by the tests: the covered set is
// unchanged, and the translator count never grows.

use crate::tec::Tec;
use motivic_geom::{Point, PointSet, Vector, VectorSet};
use std::collections::BTreeMap;

/// How often each covered point is hit, and by which translators.
/// BTreeMap keeps every walk over it deterministic.
#[derive(Debug, Default)]
struct PointFreqs {
    freqs: BTreeMap<Point, u32>,
}

impl PointFreqs {
    fn count(&mut self, p: Point) {
        *self.freqs.entry(p).or_insert(0) += 1;
    }

    fn freq(&self, p: Point) -> u32 {
        self.freqs.get(&p).copied().unwrap_or(0)
    }

    /// Points hit more than once.
    fn multipoints(&self) -> Vec<Point> {
        self.freqs
            .iter()
            .filter(|&(_, &f)| f > 1)
            .map(|(&p, _)| p)
            .collect()
    }
}

impl Tec<'_> {
    /// Remove as many translators as possible while covering exactly the
    /// same points. In-place; only ever shrinks the translator set.
    pub fn remove_redundant_translators(&mut self) {
        let pattern = self.pattern().clone();
        if pattern.is_empty() {
            return;
        }

        let mut freqs = PointFreqs::default();
        for v in self.translators().iter() {
            for p in pattern.iter() {
                freqs.count(p.translate(v));
            }
        }
        let multipoints = freqs.multipoints();
        if multipoints.is_empty() {
            return;
        }

        // Candidate translators: those mapping the whole pattern onto
        // multipoints. Count matches per vector over pattern × multipoints;
        // a full-pattern match means every image is a multipoint.
        let mut match_counts: BTreeMap<Vector, usize> = BTreeMap::new();
        for p in pattern.iter() {
            for &mp in &multipoints {
                *match_counts.entry(p.vector_to(mp)).or_insert(0) += 1;
            }
        }
        let removable: Vec<Vector> = match_counts
            .into_iter()
            .filter(|&(v, count)| count == pattern.len() && self.translators().contains(v))
            .map(|(v, _)| v)
            .collect();
        if removable.is_empty() {
            return;
        }

        // Tentatively remove all candidates: which points would lose every
        // cover they have?
        let mut removed_hits: BTreeMap<Point, (u32, Vec<Vector>)> = BTreeMap::new();
        for &v in &removable {
            for p in pattern.iter() {
                let image = p.translate(v);
                let entry = removed_hits.entry(image).or_insert_with(|| (0, Vec::new()));
                entry.0 += 1;
                entry.1.push(v);
            }
        }
        let max_points: Vec<(Point, Vec<Vector>)> = removed_hits
            .into_iter()
            .filter(|&(p, (removed, _))| removed == freqs.freq(p))
            .map(|(p, (_, vectors))| (p, vectors))
            .collect();

        let removable_set = VectorSet::from_vectors(removable.clone());
        if max_points.is_empty() {
            // Every candidate's contribution survives elsewhere.
            let kept = self.translators().difference(&removable_set);
            self.set_translators(kept);
            return;
        }

        // Greedy minimum hitting set over the max points: keep the
        // candidate covering the most still-unhit max points; ties go to
        // the smaller vector so the result is deterministic.
        let mut per_vector: BTreeMap<Vector, PointSet> = BTreeMap::new();
        for (p, vectors) in &max_points {
            for &v in vectors {
                per_vector.entry(v).or_default().insert(*p);
            }
        }
        let mut unhit: PointSet = max_points.iter().map(|&(p, _)| p).collect();
        let mut retained: Vec<Vector> = Vec::new();
        while !unhit.is_empty() {
            let Some((&best, _)) = per_vector
                .iter()
                .map(|(v, points)| (v, points.intersection(&unhit).len()))
                .filter(|&(_, hits)| hits > 0)
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            else {
                break;
            };
            if let Some(points) = per_vector.remove(&best) {
                unhit.remove_set(&points);
            }
            retained.push(best);
        }

        let mut kept = self.translators().difference(&removable_set);
        for v in retained {
            kept.insert(v);
        }
        self.set_translators(kept);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ps(points: &[(i64, i32)]) -> PointSet {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn vs(vectors: &[(i64, i32)]) -> VectorSet {
        vectors.iter().map(|&(x, y)| Vector::new(x, y)).collect()
    }

    #[test]
    fn no_multipoints_means_no_change() {
        let dataset = ps(&[(0, 0), (1, 0), (5, 0), (6, 0)]);
        let mut tec = Tec::new(ps(&[(0, 0), (1, 0)]), vs(&[(0, 0), (5, 0)]), &dataset);
        let before = tec.translators().clone();
        tec.remove_redundant_translators();
        assert_eq!(*tec.translators(), before);
    }

    #[test]
    fn fully_shadowed_translator_is_removed() {
        // Pattern {0,1,2} stepped by 1 over a run: the middle translators
        // only re-cover points their neighbors already cover.
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
        let mut tec = Tec::new(
            ps(&[(0, 0), (1, 0), (2, 0)]),
            vs(&[(0, 0), (1, 0), (2, 0), (3, 0)]),
            &dataset,
        );
        let covered_before = tec.covered_points().clone();
        let count_before = tec.translator_count();
        tec.remove_redundant_translators();
        assert_eq!(*tec.covered_points(), covered_before);
        assert!(tec.translator_count() <= count_before);
        assert!(tec.translator_count() < count_before, "expected a removal");
    }

    #[test]
    fn removal_preserves_coverage_exactly() {
        // Overlapping occurrences along a chromatic run.
        let dataset: PointSet = (0..10).map(|i| Point::new(i, 0)).collect();
        let mut tec = Tec::new(
            ps(&[(0, 0), (1, 0), (2, 0), (3, 0)]),
            vs(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0)]),
            &dataset,
        );
        let covered_before = tec.covered_points().clone();
        let count_before = tec.translator_count();
        tec.remove_redundant_translators();
        assert_eq!(*tec.covered_points(), covered_before);
        assert!(tec.translator_count() <= count_before);
    }

    #[test]
    fn disjoint_occurrences_keep_all_translators() {
        let dataset = ps(&[(0, 0), (1, 1), (10, 0), (11, 1), (20, 0), (21, 1)]);
        let mut tec = Tec::new(
            ps(&[(0, 0), (1, 1)]),
            vs(&[(0, 0), (10, 0), (20, 0)]),
            &dataset,
        );
        tec.remove_redundant_translators();
        assert_eq!(tec.translator_count(), 3);
        assert_eq!(tec.coverage(), 6);
    }

    #[test]
    fn empty_pattern_is_untouched() {
        let dataset = ps(&[(0, 0)]);
        let mut tec = Tec::new(PointSet::new(), vs(&[(0, 0)]), &dataset);
        tec.remove_redundant_translators();
        assert_eq!(tec.translator_count(), 1);
    }
}
