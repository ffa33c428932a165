// The analysis driver: table → extraction → filters → completion →
// reduction → ranking → greedy covering.
//
// Each stage consumes the previous stage's explicit output; nothing is
// communicated through shared state, so per-MTP and per-TEC work can run
// in parallel and a cancellation at any checkpoint simply discards local
// results. The per-phase counts travel in `AnalysisStats` — callers that
// want to report progress read the struct instead of global counters.
//
// Selection walks the quality-ranked candidates (each TEC and its dual are
// considered independently) and accepts a TEC when the fraction of its
// coverage that is still uncovered exceeds the configured overlap
// threshold, stopping as soon as the dataset is fully covered.

use crate::cancel::CancelToken;
use crate::config::{EngineConfig, MtpDedup, SelectionThresholds};
use crate::dedup::remove_translationally_equivalent;
use crate::error::EngineError;
use crate::rank::strategy_for;
use crate::sia::{Mtp, extract_mtps, extract_mtps_superdiagonal, merge_vectors};
use crate::siatec::compute_tecs;
use crate::table::{VectorTable, sia_pairs, superdiagonal_pairs};
use crate::tec::Tec;
use crate::trawler::trawl;
use motivic_geom::{Point, PointSet, Vector, VectorSet};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

/// Per-phase counts for one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub dataset_size: usize,
    /// MTPs out of extraction, after the minimum-size filter.
    pub mtps_extracted: usize,
    /// MTPs after merge/dedup/trawl post-processing.
    pub mtps_after_filters: usize,
    /// TECs surviving completion and its size gates.
    pub tecs_completed: usize,
    /// Candidates (TECs and duals) surviving the selection thresholds.
    pub candidates_ranked: usize,
    /// TECs accepted into the covering.
    pub tecs_selected: usize,
    /// Distinct dataset points covered by the selection.
    pub points_covered: usize,
}

/// The result of one analysis run: the selected covering TECs in rank
/// order, the points they cover, and the per-phase counts.
#[derive(Debug)]
pub struct Analysis<'d> {
    pub tecs: Vec<Tec<'d>>,
    pub covered: PointSet,
    pub stats: AnalysisStats,
}

/// Run the full discovery pipeline over `dataset`.
pub fn analyze<'d>(
    dataset: &'d PointSet,
    config: &EngineConfig,
    cancel: &CancelToken,
) -> Result<Analysis<'d>, EngineError> {
    let mut stats = AnalysisStats {
        dataset_size: dataset.len(),
        ..AnalysisStats::default()
    };
    if dataset.is_empty() {
        return Ok(Analysis {
            tecs: Vec::new(),
            covered: PointSet::new(),
            stats,
        });
    }

    // Extraction. The restricted path still needs the full table later for
    // completion, so that is built unconditionally.
    let table = VectorTable::build(dataset, cancel)?;
    tracing::debug!(points = dataset.len(), "vector table built");

    let mut mtps: Vec<Mtp> = match config.superdiagonals {
        Some(r) => {
            let window = superdiagonal_pairs(dataset, r, cancel)?;
            let candidates = extract_mtps_superdiagonal(dataset, &window, cancel)?;
            candidates
                .into_iter()
                .filter(|m| m.pattern.len() >= config.min_pattern_size)
                .collect()
        }
        None => {
            let pairs = sia_pairs(dataset, cancel)?;
            extract_mtps(dataset, &pairs, config.min_pattern_size)
        }
    };
    // A single point has no pairwise vectors, but it is still its own
    // (trivial) pattern; completion turns it into the one-point TEC.
    if mtps.is_empty() && dataset.len() == 1 {
        mtps.push(Mtp {
            pattern: dataset.clone(),
            cis: vec![0],
            vectors: VectorSet::from_vectors(vec![Vector::ZERO]),
        });
    }
    stats.mtps_extracted = mtps.len();
    cancel.check()?;

    match config.mtp_dedup {
        MtpDedup::MergeVectors => mtps = merge_vectors(mtps),
        MtpDedup::RemoveTranslationalEquivalents => {
            mtps = remove_translationally_equivalent(mtps);
        }
        MtpDedup::None => {}
    }
    if let Some(params) = config.trawler {
        mtps = trawl(&mtps, params.a, params.b);
        // Fragments of different patterns frequently coincide.
        if !mtps.is_empty() {
            mtps = remove_translationally_equivalent(mtps);
        }
    }
    stats.mtps_after_filters = mtps.len();
    cancel.check()?;

    // Completion and lossless translator reduction.
    let mut tecs = compute_tecs(
        dataset,
        &table,
        &mtps,
        config.min_pattern_size,
        config.min_translator_set_size,
        cancel,
    )?;
    stats.tecs_completed = tecs.len();
    tecs.par_iter_mut().try_for_each(|tec| {
        cancel.check()?;
        tec.remove_redundant_translators();
        Ok::<(), EngineError>(())
    })?;

    // Each TEC and its dual stand on their own against the thresholds.
    let mut candidates: Vec<Tec<'d>> = Vec::with_capacity(tecs.len() * 2);
    for tec in tecs {
        cancel.check()?;
        let dual = tec.dual();
        if passes_thresholds(&dual, &config.selection) {
            candidates.push(dual);
        }
        if passes_thresholds(&tec, &config.selection) {
            candidates.push(tec);
        }
    }
    let strategy = strategy_for(&config.ranking);
    candidates.sort_by(|a, b| strategy.cmp(a, b));
    candidates.dedup_by(|a, b| a == b);
    stats.candidates_ranked = candidates.len();
    tracing::info!(
        candidates = candidates.len(),
        "candidates ranked for covering selection"
    );
    cancel.check()?;

    // Greedy covering.
    let mut covered = PointSet::new();
    let mut covered_lookup: FxHashSet<Point> = FxHashSet::default();
    let mut selected = Vec::new();
    for tec in candidates {
        let tec_covered = tec.covered_points();
        let newly_covered = tec_covered
            .iter()
            .filter(|p| !covered_lookup.contains(p))
            .count();
        if newly_covered as f64
            > config.selection.minimum_tec_overlap * tec_covered.len() as f64
        {
            covered_lookup.extend(tec_covered.iter());
            covered.union_with(tec_covered);
            selected.push(tec);
            if covered.len() == dataset.len() {
                break;
            }
        }
    }
    stats.tecs_selected = selected.len();
    stats.points_covered = covered.len();
    tracing::info!(
        selected = selected.len(),
        covered = covered.len(),
        of = dataset.len(),
        "covering selection complete"
    );

    Ok(Analysis {
        tecs: selected,
        covered,
        stats,
    })
}

/// Threshold gate for a candidate. A threshold of zero is vacuous; a
/// non-zero threshold fails candidates whose metric is undefined.
fn passes_thresholds(tec: &Tec<'_>, thresholds: &SelectionThresholds) -> bool {
    if tec.pattern_len() < thresholds.minimum_pattern_size {
        return false;
    }
    if thresholds.minimum_compactness > 0.0 {
        match tec.compactness() {
            Ok(c) if c >= thresholds.minimum_compactness => {}
            _ => return false,
        }
    }
    if thresholds.minimum_temporal_density > 0.0 {
        match tec.pattern().temporal_density() {
            Ok(d) if d >= thresholds.minimum_temporal_density => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn ps(points: &[(i64, i32)]) -> PointSet {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn permissive_config() -> EngineConfig {
        let config = AnalysisConfig {
            min_pattern_size: 2,
            minimum_compactness: 0.0,
            minimum_pattern_size: 2,
            minimum_temporal_density: 0.0,
            minimum_tec_overlap: 0.0,
            ..AnalysisConfig::default()
        };
        config.validate().expect("test config must validate")
    }

    #[test]
    fn empty_dataset_yields_empty_analysis() {
        let dataset = PointSet::new();
        let analysis =
            analyze(&dataset, &EngineConfig::default(), &CancelToken::new()).unwrap();
        assert!(analysis.tecs.is_empty());
        assert!(analysis.covered.is_empty());
        assert_eq!(analysis.stats.dataset_size, 0);
    }

    #[test]
    fn repeated_figure_is_selected_and_covers_its_points() {
        // The same three-note figure at three transpositions.
        let mut points = Vec::new();
        for &(ox, oy) in &[(0i64, 0i32), (8, 4), (16, 0)] {
            points.extend([
                Point::new(ox, oy),
                Point::new(ox + 1, oy + 2),
                Point::new(ox + 2, oy + 1),
            ]);
        }
        let dataset = PointSet::from_points(points);
        let analysis = analyze(&dataset, &permissive_config(), &CancelToken::new()).unwrap();
        assert!(!analysis.tecs.is_empty());
        assert_eq!(analysis.covered, dataset);
        assert_eq!(analysis.stats.points_covered, 9);
        // The full figure should be among the selected patterns.
        assert!(
            analysis
                .tecs
                .iter()
                .any(|t| t.pattern_len() == 3 && t.translator_count() == 3)
        );
    }

    #[test]
    fn overlap_threshold_rejects_redundant_candidates() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let strict = {
            let config = AnalysisConfig {
                minimum_compactness: 0.0,
                minimum_temporal_density: 0.0,
                minimum_tec_overlap: 0.9,
                min_pattern_size: 2,
                minimum_pattern_size: 2,
                ..AnalysisConfig::default()
            };
            config.validate().expect("test config must validate")
        };
        let analysis = analyze(&dataset, &strict, &CancelToken::new()).unwrap();
        // Whatever is selected first covers most of the run; later
        // candidates cannot newly cover 90% of themselves.
        for window in analysis.tecs.windows(2) {
            let first = window[0].covered_points();
            let second = window[1].covered_points();
            assert!(!second.difference(first).is_empty());
        }
    }

    #[test]
    fn cancellation_propagates_from_any_phase() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0)]);
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            analyze(&dataset, &EngineConfig::default(), &token).unwrap_err(),
            EngineError::Cancelled
        );
    }

    #[test]
    fn stats_phases_are_consistent() {
        let dataset = ps(&[(0, 0), (1, 1), (4, 0), (5, 1), (8, 0), (9, 1)]);
        let analysis = analyze(&dataset, &permissive_config(), &CancelToken::new()).unwrap();
        let stats = analysis.stats;
        assert_eq!(stats.dataset_size, 6);
        assert!(stats.mtps_after_filters <= stats.mtps_extracted);
        assert!(stats.tecs_selected <= stats.candidates_ranked);
        assert_eq!(stats.points_covered, analysis.covered.len());
    }
}
