// Translational-equivalence deduplication.
//
// Two patterns are equivalent when one uniform vector maps one onto the
// other point-for-point — they generate the same TEC, so computing both is
// wasted completion work. Each pattern is canonicalized into its
// "vectorized representation": the vectors from its first point to every
// other point. Equivalent patterns share the representation exactly, so a
// sort brings every class together and one representative per class
// survives.
//
// Applied after extraction (when configured) and again after trawling,
// whose fragments frequently coincide. Running it twice is the same as
// running it once.

use crate::sia::Mtp;
use motivic_geom::{PointSet, Vector};

/// Vectors from the first point to every other point: identical for all
/// members of a translational equivalence class, and for nothing else.
fn vectorized(pattern: &PointSet) -> Vec<Vector> {
    match pattern.first() {
        Some(first) => pattern.iter().skip(1).map(|p| first.vector_to(p)).collect(),
        None => Vec::new(),
    }
}

/// Keep one representative per class of translationally equivalent
/// patterns.
pub fn remove_translationally_equivalent(mtps: Vec<Mtp>) -> Vec<Mtp> {
    let mut keyed: Vec<((usize, Vec<Vector>), Mtp)> = mtps
        .into_iter()
        .map(|mtp| ((mtp.pattern.len(), vectorized(&mtp.pattern)), mtp))
        .collect();
    // Sort by representation, then pattern, so the surviving
    // representative of each class is deterministic.
    keyed.sort_by(|x, y| x.0.cmp(&y.0).then_with(|| x.1.pattern.cmp(&y.1.pattern)));
    keyed.dedup_by(|candidate, kept| candidate.0 == kept.0);
    let survivors: Vec<Mtp> = keyed.into_iter().map(|(_, mtp)| mtp).collect();
    tracing::debug!(
        survivors = survivors.len(),
        "removed translationally equivalent patterns"
    );
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use motivic_geom::{Point, VectorSet};

    fn mtp(points: &[(i64, i32)], discovering: (i64, i32)) -> Mtp {
        let pattern: PointSet = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Mtp {
            cis: (0..pattern.len()).collect(),
            pattern,
            vectors: VectorSet::from_vectors(vec![Vector::new(discovering.0, discovering.1)]),
        }
    }

    #[test]
    fn equivalent_patterns_collapse_to_one() {
        let mtps = vec![
            mtp(&[(0, 0), (1, 2)], (5, 5)),
            mtp(&[(10, 3), (11, 5)], (7, 7)), // same shape, shifted
            mtp(&[(0, 0), (1, 3)], (9, 9)),   // different shape
        ];
        let out = remove_translationally_equivalent(mtps);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn representative_choice_is_deterministic() {
        let run_once = || {
            remove_translationally_equivalent(vec![
                mtp(&[(10, 3), (11, 5)], (1, 1)),
                mtp(&[(0, 0), (1, 2)], (2, 2)),
            ])
        };
        let a = run_once();
        let b = run_once();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].pattern, b[0].pattern);
        // The canonically smallest member of the class survives.
        assert_eq!(a[0].pattern.first(), Some(Point::new(0, 0)));
    }

    #[test]
    fn dedup_is_idempotent() {
        let mtps = vec![
            mtp(&[(0, 0), (2, 1)], (1, 1)),
            mtp(&[(5, 5), (7, 6)], (2, 2)),
            mtp(&[(0, 0), (3, 1)], (3, 3)),
            mtp(&[(4, 4)], (4, 4)),
        ];
        let once = remove_translationally_equivalent(mtps);
        let twice = remove_translationally_equivalent(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn size_disambiguates_empty_representations() {
        // Single-point patterns all vectorize to the empty list but are
        // mutually equivalent anyway; exactly one survives.
        let mtps = vec![mtp(&[(0, 0)], (1, 1)), mtp(&[(9, 9)], (2, 2))];
        let out = remove_translationally_equivalent(mtps);
        assert_eq!(out.len(), 1);
    }
}
