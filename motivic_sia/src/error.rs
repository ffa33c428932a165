// Engine-level errors.
//
// Configuration problems surface before any computation starts; metric
// errors bubble up from the geometry crate; cancellation is reported as an
// error so a caller can distinguish "finished" from "stopped early" without
// inspecting partial state (there is none — cancelled phases discard their
// local work).

use motivic_geom::MetricError;
use thiserror::Error;

/// Invalid analysis configuration, detected by `AnalysisConfig::validate`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("merge_vectors and remove_translationally_equivalent_mtps are mutually exclusive")]
    ConflictingMtpDedup,
    #[error("trawler density threshold a = {a} must be in (0, 1]")]
    TrawlerDensityOutOfRange { a: f64 },
    #[error("superdiagonal radius r must be at least 1 when restricted extraction is enabled")]
    ZeroSuperdiagonalRadius,
    #[error("minimum TEC overlap {overlap} must be in [0, 1]")]
    TecOverlapOutOfRange { overlap: f64 },
}

/// Any failure of the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Metric(#[from] MetricError),
    #[error("analysis cancelled")]
    Cancelled,
}
