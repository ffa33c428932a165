// Data-driven analysis configuration.
//
// All tunable parameters live in `AnalysisConfig`, a plain serde struct that
// can be loaded from JSON. The engine never reads it directly: `validate`
// turns it into an `EngineConfig`, rejecting contradictory settings up
// front, and folds the two historical mutually-exclusive booleans
// (`merge_vectors` / `remove_translationally_equivalent_mtps`) into the
// single `MtpDedup` enum so the contradiction cannot exist past the
// boundary.
//
// Defaults are the canonical encoder settings: compactness 0.7, pattern
// size 2, temporal density 0.25, TEC overlap 0.3.

use crate::error::ConfigError;
use crate::rank::CriterionWeights;
use serde::{Deserialize, Serialize};

/// External, file-loadable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Discard MTPs with fewer points before completion.
    pub min_pattern_size: usize,
    /// Discard completed TECs with fewer translators.
    pub min_translator_set_size: usize,
    /// Restrict the extraction stage to the first `r` superdiagonals of the
    /// vector table.
    pub for_r_superdiagonals: bool,
    pub r: usize,
    /// Split sparse patterns into dense fragments before completion.
    pub with_compactness_trawler: bool,
    /// Trawler density floor, in (0, 1].
    pub a: f64,
    /// Trawler minimum fragment size.
    pub b: usize,
    /// Keep one representative per class of translationally equivalent
    /// patterns. Mutually exclusive with `merge_vectors`.
    pub remove_translationally_equivalent_mtps: bool,
    /// Merge MTPs with identical patterns, accumulating their discovering
    /// vectors. Mutually exclusive with the option above.
    pub merge_vectors: bool,
    /// Final-selection thresholds.
    pub minimum_compactness: f64,
    pub minimum_pattern_size: usize,
    pub minimum_temporal_density: f64,
    /// A candidate must newly cover more than this fraction of its own
    /// coverage to be selected.
    pub minimum_tec_overlap: f64,
    /// Which quality ordering ranks candidates before selection.
    pub ranking: RankingConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            min_pattern_size: 2,
            min_translator_set_size: 1,
            for_r_superdiagonals: false,
            r: 0,
            with_compactness_trawler: false,
            a: 1.0,
            b: 2,
            remove_translationally_equivalent_mtps: true,
            merge_vectors: false,
            minimum_compactness: 0.7,
            minimum_pattern_size: 2,
            minimum_temporal_density: 0.25,
            minimum_tec_overlap: 0.3,
            ranking: RankingConfig::Lexicographic,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the configuration and produce the internal form the engine
    /// runs on. Fails fast — before any computation.
    pub fn validate(&self) -> Result<EngineConfig, ConfigError> {
        if self.merge_vectors && self.remove_translationally_equivalent_mtps {
            return Err(ConfigError::ConflictingMtpDedup);
        }
        if self.for_r_superdiagonals && self.r == 0 {
            return Err(ConfigError::ZeroSuperdiagonalRadius);
        }
        if self.with_compactness_trawler && !(self.a > 0.0 && self.a <= 1.0) {
            return Err(ConfigError::TrawlerDensityOutOfRange { a: self.a });
        }
        if !(0.0..=1.0).contains(&self.minimum_tec_overlap) {
            return Err(ConfigError::TecOverlapOutOfRange {
                overlap: self.minimum_tec_overlap,
            });
        }
        let mtp_dedup = if self.merge_vectors {
            MtpDedup::MergeVectors
        } else if self.remove_translationally_equivalent_mtps {
            MtpDedup::RemoveTranslationalEquivalents
        } else {
            MtpDedup::None
        };
        Ok(EngineConfig {
            min_pattern_size: self.min_pattern_size,
            min_translator_set_size: self.min_translator_set_size,
            superdiagonals: self.for_r_superdiagonals.then_some(self.r),
            trawler: self.with_compactness_trawler.then_some(TrawlerParams {
                a: self.a,
                b: self.b,
            }),
            mtp_dedup,
            selection: SelectionThresholds {
                minimum_compactness: self.minimum_compactness,
                minimum_pattern_size: self.minimum_pattern_size,
                minimum_temporal_density: self.minimum_temporal_density,
                minimum_tec_overlap: self.minimum_tec_overlap,
            },
            ranking: self.ranking.clone(),
        })
    }
}

/// Quality-ordering strategy selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RankingConfig {
    #[default]
    Lexicographic,
    ToleranceBanded {
        tolerance: f64,
    },
    WeightedProduct(CriterionWeights),
}

/// Validated internal configuration. The dedup choice is an enum: the
/// conflicting-boolean state of the external form is unrepresentable here.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub min_pattern_size: usize,
    pub min_translator_set_size: usize,
    pub superdiagonals: Option<usize>,
    pub trawler: Option<TrawlerParams>,
    pub mtp_dedup: MtpDedup,
    pub selection: SelectionThresholds,
    pub ranking: RankingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_pattern_size: 2,
            min_translator_set_size: 1,
            superdiagonals: None,
            trawler: None,
            mtp_dedup: MtpDedup::RemoveTranslationalEquivalents,
            selection: SelectionThresholds::default(),
            ranking: RankingConfig::Lexicographic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtpDedup {
    None,
    MergeVectors,
    RemoveTranslationalEquivalents,
}

#[derive(Debug, Clone, Copy)]
pub struct TrawlerParams {
    pub a: f64,
    pub b: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SelectionThresholds {
    pub minimum_compactness: f64,
    pub minimum_pattern_size: usize,
    pub minimum_temporal_density: f64,
    pub minimum_tec_overlap: f64,
}

impl Default for SelectionThresholds {
    fn default() -> Self {
        SelectionThresholds {
            minimum_compactness: 0.7,
            minimum_pattern_size: 2,
            minimum_temporal_density: 0.25,
            minimum_tec_overlap: 0.3,
        }
    }
}
