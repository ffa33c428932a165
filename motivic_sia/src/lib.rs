// motivic_sia — SIA/SIATEC pattern discovery over point-set music.
//
// Given a score as a set of (onset, pitch) lattice points, the engine
// finds every maximal translatable pattern, completes each one's full
// translator set, scores the resulting translational equivalence classes,
// and greedily selects a small, dense, near-complete covering of the
// score. Batch computation over an in-memory dataset; deterministic —
// identical input and configuration give byte-identical output.
//
// Pipeline (each stage's output feeds the next, see `cover.rs`):
// - `table.rs`:   the n×n pairwise vector table and its sorted pair views.
// - `sia.rs`:     MTP extraction by sort-and-partition, plus the
//                 r-superdiagonal restricted path and vector merging.
// - `dedup.rs`:   translational-equivalence deduplication of patterns.
// - `trawler.rs`: density-based splitting of sparse patterns.
// - `siatec.rs`:  translator-set completion (monotone-cursor sweep).
// - `tec.rs`:     the TEC entity — pattern, translators, cached metrics,
//                 the dual transform, and the text form.
// - `reduce.rs`:  lossless redundant-translator removal.
// - `rank.rs`:    pluggable quality orderings (lexicographic, tolerance-
//                 banded, weighted-product).
// - `cover.rs`:   the driver and the greedy covering selection.
// - `config.rs`:  serde configuration with fail-fast validation.
// - `cancel.rs`:  cooperative cancellation for the O(n^2) phases.
//
// The geometry (points, vectors, sets, the text grammar) lives in the
// companion crate `motivic_geom`.

pub mod cancel;
pub mod config;
pub mod cover;
pub mod dedup;
pub mod error;
pub mod rank;
pub mod reduce;
pub mod sia;
pub mod siatec;
pub mod table;
pub mod tec;
pub mod trawler;

pub use cancel::CancelToken;
pub use config::{AnalysisConfig, EngineConfig, MtpDedup, RankingConfig};
pub use cover::{Analysis, AnalysisStats, analyze};
pub use error::{ConfigError, EngineError};
pub use rank::{CriterionWeights, Lexicographic, RankStrategy, ToleranceBanded, WeightedProduct};
pub use sia::Mtp;
pub use table::VectorTable;
pub use tec::Tec;
