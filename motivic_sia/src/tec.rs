// The TEC: a pattern, its complete translator set, and the dataset they
// live in.
//
// A TEC borrows its dataset — metrics are relative to it, but the TEC does
// not own it, and many TECs share one dataset across threads. Derived
// values (covered set, coverage, compression ratio, compactness, points in
// the pattern's own box) are computed once and cached; the only mutation a
// TEC ever sees is a translator-set shrink (redundant-translator removal),
// which drops all caches.
//
// A freshly completed TEC's translator set always contains the zero vector:
// the pattern is one of its own occurrences.

use motivic_geom::{MetricError, ParseError, PointSet, Vector, VectorSet, grammar};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// A Translational Equivalence Class over a borrowed dataset.
#[derive(Debug, Clone)]
pub struct Tec<'d> {
    pattern: PointSet,
    translators: VectorSet,
    dataset: &'d PointSet,
    is_dual: bool,
    covered: OnceLock<PointSet>,
    compactness: OnceLock<Result<f64, MetricError>>,
    bb_point_count: OnceLock<usize>,
}

impl<'d> Tec<'d> {
    pub fn new(pattern: PointSet, translators: VectorSet, dataset: &'d PointSet) -> Self {
        Tec {
            pattern,
            translators,
            dataset,
            is_dual: false,
            covered: OnceLock::new(),
            compactness: OnceLock::new(),
            bb_point_count: OnceLock::new(),
        }
    }

    /// A TEC whose only occurrence is the pattern itself.
    pub fn trivial(pattern: PointSet, dataset: &'d PointSet) -> Self {
        Tec::new(
            pattern,
            VectorSet::from_vectors(vec![Vector::ZERO]),
            dataset,
        )
    }

    /// Reconstruct a TEC from its canonical text form, attached to a
    /// dataset for metric computation.
    pub fn from_grammar(input: &str, dataset: &'d PointSet) -> Result<Self, ParseError> {
        let (pattern, translators) = grammar::parse_tec(input)?;
        Ok(Tec::new(pattern, translators, dataset))
    }

    pub fn pattern(&self) -> &PointSet {
        &self.pattern
    }

    pub fn translators(&self) -> &VectorSet {
        &self.translators
    }

    pub fn dataset(&self) -> &'d PointSet {
        self.dataset
    }

    pub fn is_dual(&self) -> bool {
        self.is_dual
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    pub fn translator_count(&self) -> usize {
        self.translators.len()
    }

    /// Replace the translator set, dropping every cached metric.
    pub(crate) fn set_translators(&mut self, translators: VectorSet) {
        self.translators = translators;
        self.covered = OnceLock::new();
        self.compactness = OnceLock::new();
        self.bb_point_count = OnceLock::new();
    }

    /// `|pattern| + |translators| − 1`: the cost of writing the pattern
    /// once plus every non-trivial translator.
    pub fn encoding_length(&self) -> usize {
        (self.pattern.len() + self.translators.len()).saturating_sub(1)
    }

    /// All distinct points reachable by translating the pattern by every
    /// translator.
    pub fn covered_points(&self) -> &PointSet {
        self.covered.get_or_init(|| {
            let mut all = Vec::with_capacity(self.pattern.len() * self.translators.len());
            for v in self.translators.iter() {
                all.extend(self.pattern.iter().map(|p| p.translate(v)));
            }
            PointSet::from_points(all)
        })
    }

    pub fn coverage(&self) -> usize {
        self.covered_points().len()
    }

    /// Coverage per unit of encoding: how much the TEC compresses what it
    /// covers.
    pub fn compression_ratio(&self) -> Result<f64, MetricError> {
        let encoding_length = self.encoding_length();
        if encoding_length == 0 {
            return Err(MetricError::ZeroEncodingLength);
        }
        Ok(self.coverage() as f64 / encoding_length as f64)
    }

    /// Best-occurrence compactness: the maximum over translators of the
    /// pattern's share of dataset points inside that occurrence's bounding
    /// box. One dense occurrence is not penalized by noisy ones.
    pub fn compactness(&self) -> Result<f64, MetricError> {
        self.compactness
            .get_or_init(|| {
                if self.pattern.is_empty() {
                    return Err(MetricError::EmptySet {
                        metric: "compactness",
                    });
                }
                let mut best: Option<f64> = None;
                for v in self.translators.iter() {
                    // Occurrences that fall outside the dataset's populated
                    // region have no defined compactness; skip them.
                    if let Ok(c) = self
                        .pattern
                        .translate(v)
                        .compactness_within(self.dataset)
                    {
                        best = Some(best.map_or(c, |b: f64| b.max(c)));
                    }
                }
                best.ok_or(MetricError::EmptyBoundingBox)
            })
            .clone()
    }

    /// Dataset points inside the pattern's own bounding box.
    pub fn points_in_pattern_bb(&self) -> usize {
        *self.bb_point_count.get_or_init(|| {
            self.pattern
                .bounds()
                .map_or(0, |b| self.dataset.points_within(b).len())
        })
    }

    /// Pattern bounding-box onset span.
    pub fn pattern_width(&self) -> i64 {
        self.pattern.width()
    }

    /// Pattern bounding-box area.
    pub fn pattern_bb_area(&self) -> i64 {
        self.pattern.bb_area()
    }

    /// The role-swapped encoding of the same covered set: the dual pattern
    /// is the first pattern point's orbit under the translators, and the
    /// dual translators are the vectors from the first point to every
    /// pattern point. Whichever of the two encodings is cheaper can be
    /// kept.
    pub fn dual(&self) -> Tec<'d> {
        let Some(first) = self.pattern.first() else {
            let mut copy = self.clone();
            copy.is_dual = !self.is_dual;
            return copy;
        };
        let mut dual_pattern: Vec<_> = self
            .translators
            .iter()
            .map(|v| first.translate(v))
            .collect();
        dual_pattern.push(first);
        let dual_translators: VectorSet =
            self.pattern.iter().map(|q| first.vector_to(q)).collect();
        let dual = Tec {
            pattern: PointSet::from_points(dual_pattern),
            translators: dual_translators,
            dataset: self.dataset,
            is_dual: !self.is_dual,
            covered: OnceLock::new(),
            compactness: OnceLock::new(),
            bb_point_count: OnceLock::new(),
        };
        // The covered set is identical by construction; share the cache if
        // it has already been computed.
        if let Some(covered) = self.covered.get() {
            let _ = dual.covered.set(covered.clone());
        }
        dual
    }

    /// The occurrence list: the pattern translated by every translator.
    pub fn point_sets(&self) -> Vec<PointSet> {
        self.translators
            .iter()
            .map(|v| self.pattern.translate(v))
            .collect()
    }

    /// Structural order: pattern first, then translator set. This is the
    /// deterministic tie-break at the end of every ranking strategy.
    pub fn structural_cmp(&self, other: &Tec<'_>) -> Ordering {
        self.pattern
            .cmp(&other.pattern)
            .then_with(|| self.translators.cmp(&other.translators))
    }
}

impl PartialEq for Tec<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.structural_cmp(other) == Ordering::Equal
    }
}

impl Eq for Tec<'_> {}

impl fmt::Display for Tec<'_> {
    /// The normalized canonical text form `T(P(...),V(...))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&grammar::write_tec(&self.pattern, &self.translators))
    }
}
