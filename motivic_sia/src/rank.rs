// Quality ordering for TECs.
//
// No single ordering of the quality criteria is the "right" one — the
// three in use disagree on real scores and each has defensible results —
// so ranking is a strategy object the driver is handed, not a property of
// the TEC type:
//
// - `Lexicographic`: strict criterion-by-criterion comparison. The
//   default, and the only one that needs no tuning.
// - `ToleranceBanded`: criteria compared with a relative tolerance band;
//   near-ties fall through to the next criterion. Note its criterion order
//   differs from the lexicographic one (coverage and width before
//   compactness) — preserved as found.
// - `WeightedProduct`: one scalar score, the product of weight ×
//   criterion^exponent per criterion.
//
// Every strategy ends with the structural tie-break (pattern order, then
// translator-set order) so the result is a total order — required for
// deterministic sorts and ordered storage.
//
// `Ordering::Less` means "ranks earlier", i.e. better.

use crate::tec::Tec;
use motivic_geom::MetricError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A pluggable TEC quality ordering. Implementations must be total orders.
pub trait RankStrategy: Send + Sync {
    fn cmp(&self, a: &Tec<'_>, b: &Tec<'_>) -> Ordering;
}

/// Descending comparison of possibly-undefined metrics: defined values
/// rank before undefined ones, larger before smaller.
fn metric_desc(a: Result<f64, MetricError>, b: Result<f64, MetricError>) -> Ordering {
    match (a, b) {
        (Ok(x), Ok(y)) => y.total_cmp(&x),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

/// Strict lexicographic ordering: compression ratio, compactness,
/// coverage (all descending), pattern width (ascending), pattern size
/// (descending), bounding-box area (ascending), structural tie-break.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexicographic;

impl RankStrategy for Lexicographic {
    fn cmp(&self, a: &Tec<'_>, b: &Tec<'_>) -> Ordering {
        metric_desc(a.compression_ratio(), b.compression_ratio())
            .then_with(|| metric_desc(a.compactness(), b.compactness()))
            .then_with(|| b.coverage().cmp(&a.coverage()))
            .then_with(|| a.pattern_width().cmp(&b.pattern_width()))
            .then_with(|| b.pattern_len().cmp(&a.pattern_len()))
            .then_with(|| a.pattern_bb_area().cmp(&b.pattern_bb_area()))
            .then_with(|| a.structural_cmp(b))
    }
}

/// Relative-tolerance comparison: differences within the band do not
/// decide, they fall through to the next criterion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToleranceBanded {
    pub tolerance: f64,
}

impl ToleranceBanded {
    pub fn new(tolerance: f64) -> Self {
        ToleranceBanded { tolerance }
    }

    /// `Some(ordering)` when the relative difference exceeds the band.
    /// `descending` selects which direction is better.
    fn banded(&self, a: f64, b: f64, descending: bool) -> Option<Ordering> {
        let scale = a.abs().max(b.abs());
        if scale == 0.0 {
            return None;
        }
        if (a - b).abs() / scale > self.tolerance {
            Some(if descending {
                b.total_cmp(&a)
            } else {
                a.total_cmp(&b)
            })
        } else {
            None
        }
    }
}

impl RankStrategy for ToleranceBanded {
    fn cmp(&self, a: &Tec<'_>, b: &Tec<'_>) -> Ordering {
        // Undefined metrics cannot be banded; fall back to defined-first.
        let (cr_a, cr_b) = (a.compression_ratio(), b.compression_ratio());
        let (co_a, co_b) = (a.compactness(), b.compactness());
        if cr_a.is_err() || cr_b.is_err() {
            return metric_desc(cr_a, cr_b).then_with(|| a.structural_cmp(b));
        }
        if co_a.is_err() || co_b.is_err() {
            return metric_desc(co_a, co_b).then_with(|| a.structural_cmp(b));
        }
        self.banded(cr_a.unwrap_or(0.0), cr_b.unwrap_or(0.0), true)
            .or_else(|| self.banded(a.coverage() as f64, b.coverage() as f64, true))
            .or_else(|| {
                self.banded(a.pattern_width() as f64, b.pattern_width() as f64, false)
            })
            .or_else(|| self.banded(co_a.unwrap_or(0.0), co_b.unwrap_or(0.0), true))
            .or_else(|| self.banded(a.pattern_len() as f64, b.pattern_len() as f64, true))
            .or_else(|| {
                self.banded(a.pattern_bb_area() as f64, b.pattern_bb_area() as f64, false)
            })
            .unwrap_or_else(|| a.structural_cmp(b))
    }
}

/// Weight and exponent per criterion for `WeightedProduct`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionWeights {
    pub k_compression_ratio: f64,
    pub k_compactness: f64,
    pub k_coverage: f64,
    pub k_pattern_width: f64,
    pub k_pattern_size: f64,
    pub k_bb_area: f64,
    pub pow_compression_ratio: f64,
    pub pow_compactness: f64,
    pub pow_coverage: f64,
    pub pow_pattern_width: f64,
    pub pow_pattern_size: f64,
    pub pow_bb_area: f64,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        CriterionWeights {
            k_compression_ratio: 1.0,
            k_compactness: 1.0,
            k_coverage: 1.0,
            k_pattern_width: 1.0,
            k_pattern_size: 1.0,
            k_bb_area: 1.0,
            pow_compression_ratio: 1.0,
            pow_compactness: 1.0,
            pow_coverage: 1.0,
            pow_pattern_width: 1.0,
            pow_pattern_size: 1.0,
            pow_bb_area: 1.0,
        }
    }
}

/// Single-score ranking: the product of all weighted criteria, descending.
/// A TEC with any undefined metric scores zero and ranks last.
#[derive(Debug, Clone, Default)]
pub struct WeightedProduct {
    pub weights: CriterionWeights,
}

impl WeightedProduct {
    pub fn new(weights: CriterionWeights) -> Self {
        WeightedProduct { weights }
    }

    pub fn score(&self, tec: &Tec<'_>) -> f64 {
        let w = &self.weights;
        let (Ok(cr), Ok(compactness)) = (tec.compression_ratio(), tec.compactness()) else {
            return 0.0;
        };
        w.k_compression_ratio
            * cr.powf(w.pow_compression_ratio)
            * w.k_compactness
            * compactness.powf(w.pow_compactness)
            * w.k_coverage
            * (tec.coverage() as f64).powf(w.pow_coverage)
            * w.k_pattern_width
            * (tec.pattern_width() as f64).powf(w.pow_pattern_width)
            * w.k_pattern_size
            * (tec.pattern_len() as f64).powf(w.pow_pattern_size)
            * w.k_bb_area
            * (tec.pattern_bb_area() as f64).powf(w.pow_bb_area)
    }
}

impl RankStrategy for WeightedProduct {
    fn cmp(&self, a: &Tec<'_>, b: &Tec<'_>) -> Ordering {
        self.score(b)
            .total_cmp(&self.score(a))
            .then_with(|| a.structural_cmp(b))
    }
}

/// Resolve the configured strategy.
pub fn strategy_for(config: &crate::config::RankingConfig) -> Box<dyn RankStrategy> {
    match config {
        crate::config::RankingConfig::Lexicographic => Box::new(Lexicographic),
        crate::config::RankingConfig::ToleranceBanded { tolerance } => {
            Box::new(ToleranceBanded::new(*tolerance))
        }
        crate::config::RankingConfig::WeightedProduct(weights) => {
            Box::new(WeightedProduct::new(weights.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motivic_geom::{Point, PointSet, Vector, VectorSet};

    fn ps(points: &[(i64, i32)]) -> PointSet {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn vs(vectors: &[(i64, i32)]) -> VectorSet {
        vectors.iter().map(|&(x, y)| Vector::new(x, y)).collect()
    }

    #[test]
    fn higher_compression_ratio_ranks_first() {
        let dataset = ps(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (3, 0),
            (4, 0),
            (5, 0),
            (10, 10),
            (11, 10),
        ]);
        // Six points from a 2-point pattern and 3 translators (length 4)
        // vs. two points from a 2-point pattern and 1 translator (length 2).
        let good = Tec::new(
            ps(&[(0, 0), (1, 0)]),
            vs(&[(0, 0), (2, 0), (4, 0)]),
            &dataset,
        );
        let poor = Tec::new(ps(&[(10, 10), (11, 10)]), vs(&[(0, 0)]), &dataset);
        assert_eq!(Lexicographic.cmp(&good, &poor), Ordering::Less);
        assert_eq!(Lexicographic.cmp(&poor, &good), Ordering::Greater);
    }

    #[test]
    fn lexicographic_is_total_via_structural_tie_break() {
        let dataset = ps(&[(0, 0), (1, 0), (5, 5), (6, 5)]);
        let a = Tec::new(ps(&[(0, 0), (1, 0)]), vs(&[(0, 0)]), &dataset);
        let b = Tec::new(ps(&[(5, 5), (6, 5)]), vs(&[(0, 0)]), &dataset);
        // Same metrics everywhere; structural order decides, consistently.
        let ab = Lexicographic.cmp(&a, &b);
        let ba = Lexicographic.cmp(&b, &a);
        assert_ne!(ab, Ordering::Equal);
        assert_eq!(ab, ba.reverse());
        assert_eq!(Lexicographic.cmp(&a, &a), Ordering::Equal);
    }

    #[test]
    fn tolerance_band_falls_through_to_next_criterion() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0), (20, 3), (21, 3), (22, 3)]);
        let wide = Tec::new(ps(&[(0, 0), (3, 0)]), vs(&[(0, 0)]), &dataset);
        let narrow = Tec::new(ps(&[(20, 3), (21, 3)]), vs(&[(0, 0)]), &dataset);
        // With a generous band the compression ratios and coverages tie;
        // width (ascending) decides in favor of the narrow pattern.
        let strategy = ToleranceBanded::new(0.5);
        assert_eq!(strategy.cmp(&narrow, &wide), Ordering::Less);
        // With a zero band the width difference decides on its own;
        // ordering stays total either way.
        let strict = ToleranceBanded::new(0.0);
        assert_eq!(
            strict.cmp(&narrow, &wide),
            strict.cmp(&wide, &narrow).reverse()
        );
    }

    #[test]
    fn weighted_product_prefers_higher_score() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
        let big = Tec::new(
            ps(&[(0, 0), (1, 0), (2, 0)]),
            vs(&[(0, 0), (3, 0)]),
            &dataset,
        );
        let small = Tec::new(ps(&[(0, 0), (5, 0)]), vs(&[(0, 0)]), &dataset);
        let strategy = WeightedProduct::default();
        assert!(strategy.score(&big) > strategy.score(&small));
        assert_eq!(strategy.cmp(&big, &small), Ordering::Less);
    }

    #[test]
    fn strategies_are_swappable_through_the_trait() {
        let strategies: Vec<Box<dyn RankStrategy>> = vec![
            Box::new(Lexicographic),
            Box::new(ToleranceBanded::new(0.1)),
            Box::new(WeightedProduct::default()),
        ];
        let dataset = ps(&[(0, 0), (1, 1)]);
        let tec = Tec::new(ps(&[(0, 0)]), vs(&[(0, 0), (1, 1)]), &dataset);
        for strategy in &strategies {
            assert_eq!(strategy.cmp(&tec, &tec), Ordering::Equal);
        }
    }
}
