// Translator completion: from an MTP's discovering vector(s) to the full
// set of vectors that map the whole pattern into the dataset.
//
// The sweep walks the first pattern column of the vector table; each entry
// there is a candidate translator v0. Every other pattern column keeps a
// row cursor that only ever moves forward: because columns are sorted and
// the candidates are taken in ascending order, a cursor never needs to
// revisit earlier rows, which makes the whole sweep amortized linear in
// the table rather than quadratic.
//
// A candidate is accepted only when every column's cursor lands on exactly
// v0 — the translated pattern then lies inside the dataset point for
// point. The zero vector is always accepted (the pattern is its own
// occurrence), so fresh TECs satisfy the zero-translator invariant.

use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::sia::Mtp;
use crate::table::VectorTable;
use crate::tec::Tec;
use motivic_geom::{PointSet, VectorSet};
use rayon::prelude::*;

/// Find every translator of the pattern whose column index set is `cis`.
pub fn complete_translators(table: &VectorTable, cis: &[usize]) -> VectorSet {
    let n = table.size();
    let k = cis.len();
    if k == 0 || k > n {
        return VectorSet::new();
    }
    let first_column = table.column(cis[0]);
    let mut translators = Vec::new();
    // One monotone cursor per non-first pattern column; never reset.
    let mut cursors = vec![0usize; k];
    for anchor in 0..=(n - k) {
        let v0 = first_column[anchor];
        let mut all_match = true;
        for (idx, &col) in cis.iter().enumerate().skip(1) {
            let column = table.column(col);
            let cursor = &mut cursors[idx];
            while *cursor < n && column[*cursor] < v0 {
                *cursor += 1;
            }
            if *cursor >= n || column[*cursor] != v0 {
                all_match = false;
                break;
            }
        }
        if all_match {
            translators.push(v0);
        }
    }
    VectorSet::from_vectors(translators)
}

/// Complete every MTP into a TEC, dropping those that fail the minimum
/// pattern / translator-set sizes. MTPs are independent; completion runs
/// in parallel with per-MTP cancellation checks.
pub fn compute_tecs<'d>(
    dataset: &'d PointSet,
    table: &VectorTable,
    mtps: &[Mtp],
    min_pattern_size: usize,
    min_translator_set_size: usize,
    cancel: &CancelToken,
) -> Result<Vec<Tec<'d>>, EngineError> {
    let completed: Vec<Option<Tec<'d>>> = mtps
        .par_iter()
        .map(|mtp| {
            cancel.check()?;
            let translators = complete_translators(table, &mtp.cis);
            let tec = Tec::new(mtp.pattern.clone(), translators, dataset);
            Ok(
                (tec.pattern_len() >= min_pattern_size
                    && tec.translator_count() >= min_translator_set_size)
                    .then_some(tec),
            )
        })
        .collect::<Result<_, EngineError>>()?;
    let tecs: Vec<Tec<'d>> = completed.into_iter().flatten().collect();
    tracing::debug!(tecs = tecs.len(), "completed translator sets");
    Ok(tecs)
}
