// MTP extraction: partition the sorted pair list into maximal runs.
//
// Every maximal run of equal-vector entries in the sorted pair list is one
// Maximal Translatable Pattern: its points are the run's origins, its
// column index set (CIS) is their dataset indices, and the run's vector is
// the discovering translation. No point sharing that exact vector can sit
// outside the run — maximality is a property of the sort, not of a search.
//
// Two post-processing options operate on the extracted list: merging MTPs
// whose pattern content is identical (accumulating their discovering
// vectors), and the restricted-window path that rebuilds candidate
// patterns from r-superdiagonal evidence. The two dedup-style options are
// mutually exclusive at the configuration layer; this module only ever
// sees one of them.

use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::table::SiaPair;
use motivic_geom::{PointSet, Vector, VectorSet};

/// A Maximal Translatable Pattern with its Column Index Set and the
/// vector(s) that produced it. Transient: consumed by translator
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mtp {
    pub pattern: PointSet,
    /// Dataset indices of the pattern's points, in canonical order.
    pub cis: Vec<usize>,
    /// Discovering vector(s); completion replaces these with the full
    /// translator set.
    pub vectors: VectorSet,
}

/// Partition sorted pairs into MTPs. Runs shorter than `min_pattern_size`
/// are dropped before any further processing.
pub fn extract_mtps(dataset: &PointSet, pairs: &[SiaPair], min_pattern_size: usize) -> Vec<Mtp> {
    let mut mtps = Vec::new();
    let mut run_start = 0;
    while run_start < pairs.len() {
        let vector = pairs[run_start].vector;
        let mut run_end = run_start + 1;
        while run_end < pairs.len() && pairs[run_end].vector == vector {
            run_end += 1;
        }
        let run = &pairs[run_start..run_end];
        if run.len() >= min_pattern_size {
            let cis: Vec<usize> = run.iter().map(|p| p.origin).collect();
            let pattern: PointSet = cis
                .iter()
                .filter_map(|&i| dataset.get(i))
                .collect();
            mtps.push(Mtp {
                pattern,
                cis,
                vectors: VectorSet::from_vectors(vec![vector]),
            });
        }
        run_start = run_end;
    }
    tracing::debug!(mtps = mtps.len(), "extracted maximal translatable patterns");
    mtps
}

/// Merge MTPs sharing identical pattern content into one entry whose
/// translator set accumulates all their discovering vectors.
pub fn merge_vectors(mut mtps: Vec<Mtp>) -> Vec<Mtp> {
    mtps.sort_by(|a, b| a.pattern.cmp(&b.pattern));
    let mut merged: Vec<Mtp> = Vec::new();
    for mtp in mtps {
        match merged.last_mut() {
            Some(last) if last.pattern == mtp.pattern => {
                last.vectors.union_with(&mtp.vectors);
            }
            _ => merged.push(mtp),
        }
    }
    merged
}

/// Restricted extraction from the r-superdiagonal window.
///
/// The window's equal-vector runs give non-maximal translatable patterns.
/// Their positive inter-point vectors, ordered by how often they recur,
/// nominate candidate translations; each candidate's pattern is the
/// intersection of the dataset with its own image under the inverse
/// translation — maximal for that vector by construction. Translator
/// completion later recovers the full translator sets.
pub fn extract_mtps_superdiagonal(
    dataset: &PointSet,
    window_pairs: &[SiaPair],
    cancel: &CancelToken,
) -> Result<Vec<Mtp>, EngineError> {
    // Non-maximal patterns from the window runs.
    let mut window_patterns: Vec<Vec<usize>> = Vec::new();
    let mut run_start = 0;
    while run_start < window_pairs.len() {
        let vector = window_pairs[run_start].vector;
        let mut run_end = run_start + 1;
        while run_end < window_pairs.len() && window_pairs[run_end].vector == vector {
            run_end += 1;
        }
        window_patterns.push(
            window_pairs[run_start..run_end]
                .iter()
                .map(|p| p.origin)
                .collect(),
        );
        run_start = run_end;
    }

    // Positive inter-point vectors within each window pattern.
    let mut inter_point: Vec<Vector> = Vec::new();
    for indices in &window_patterns {
        cancel.check()?;
        for (a, &i) in indices.iter().enumerate() {
            for &j in &indices[a + 1..] {
                if let (Some(p), Some(q)) = (dataset.get(i), dataset.get(j)) {
                    inter_point.push(p.vector_to(q));
                }
            }
        }
    }
    inter_point.sort_unstable();

    // Deduplicate and order by decreasing recurrence, then vector order.
    let mut by_frequency: Vec<(usize, Vector)> = Vec::new();
    let mut idx = 0;
    while idx < inter_point.len() {
        let vector = inter_point[idx];
        let mut end = idx + 1;
        while end < inter_point.len() && inter_point[end] == vector {
            end += 1;
        }
        by_frequency.push((end - idx, vector));
        idx = end;
    }
    by_frequency.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    // Materialize one candidate MTP per nominated vector.
    let mut mtps = Vec::new();
    for (_, vector) in by_frequency {
        cancel.check()?;
        let pattern = dataset.intersection(&dataset.translate(vector.inverse()));
        let Some(cis) = dataset.index_set(&pattern) else {
            continue;
        };
        mtps.push(Mtp {
            pattern,
            cis,
            vectors: VectorSet::from_vectors(vec![vector]),
        });
    }
    tracing::debug!(
        mtps = mtps.len(),
        "extracted candidate patterns from superdiagonal window"
    );
    Ok(mtps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{sia_pairs, superdiagonal_pairs};
    use motivic_geom::Point;

    fn ps(points: &[(i64, i32)]) -> PointSet {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn every_run_becomes_one_mtp() {
        // Two squares related by v(3,3): the diagonal vector recurs.
        let dataset = ps(&[(0, 0), (1, 1), (3, 3), (4, 4)]);
        let pairs = sia_pairs(&dataset, &CancelToken::new()).unwrap();
        let mtps = extract_mtps(&dataset, &pairs, 0);
        // Distinct vectors: (1,1) x3, (3,3) x2, (4,4), (2,2), (1,1)... count runs.
        let for_diagonal: Vec<&Mtp> = mtps
            .iter()
            .filter(|m| m.vectors.contains(Vector::new(3, 3)))
            .collect();
        assert_eq!(for_diagonal.len(), 1);
        assert_eq!(for_diagonal[0].pattern, ps(&[(0, 0), (1, 1)]));
        assert_eq!(for_diagonal[0].cis, vec![0, 1]);
    }

    #[test]
    fn min_pattern_size_filters_runs() {
        // All pairwise vectors distinct: every MTP has exactly one point.
        let dataset = ps(&[(0, 0), (1, 2), (3, 7), (9, 20)]);
        let pairs = sia_pairs(&dataset, &CancelToken::new()).unwrap();
        assert!(
            extract_mtps(&dataset, &pairs, 0)
                .iter()
                .all(|m| m.pattern.len() == 1)
        );
        assert!(extract_mtps(&dataset, &pairs, 2).is_empty());
    }

    #[test]
    fn merge_vectors_accumulates_discovering_vectors() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let pairs = sia_pairs(&dataset, &CancelToken::new()).unwrap();
        let mtps = extract_mtps(&dataset, &pairs, 0);
        let merged = merge_vectors(mtps);
        // {(0,0),(1,0),(2,0)} is the MTP of v(1,0); {(0,0),(1,0)} of v(2,0);
        // {(0,0)} of v(3,0). All patterns distinct here, but a pattern that
        // recurs under several vectors must end up with all of them.
        for mtp in &merged {
            assert!(!mtp.vectors.is_empty());
        }
        let patterns: Vec<&PointSet> = merged.iter().map(|m| &m.pattern).collect();
        let mut deduped = patterns.clone();
        deduped.dedup();
        assert_eq!(patterns.len(), deduped.len());
    }

    #[test]
    fn merge_vectors_joins_identical_patterns() {
        let pattern = ps(&[(0, 0), (1, 0)]);
        let a = Mtp {
            pattern: pattern.clone(),
            cis: vec![0, 1],
            vectors: VectorSet::from_vectors(vec![Vector::new(2, 0)]),
        };
        let b = Mtp {
            pattern: pattern.clone(),
            cis: vec![0, 1],
            vectors: VectorSet::from_vectors(vec![Vector::new(4, 0)]),
        };
        let merged = merge_vectors(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].vectors.len(), 2);
    }

    #[test]
    fn superdiagonal_candidates_are_maximal_for_their_vector() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0), (10, 5)]);
        let window = superdiagonal_pairs(&dataset, 2, &CancelToken::new()).unwrap();
        let mtps =
            extract_mtps_superdiagonal(&dataset, &window, &CancelToken::new()).unwrap();
        let for_step: Vec<&Mtp> = mtps
            .iter()
            .filter(|m| m.vectors.contains(Vector::new(1, 0)))
            .collect();
        assert_eq!(for_step.len(), 1);
        // Maximal: all three origins of the unit step, even though the
        // window only provided adjacent evidence.
        assert_eq!(for_step[0].pattern, ps(&[(0, 0), (1, 0), (2, 0)]));
    }
}
