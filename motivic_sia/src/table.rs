// The vector table: every pairwise translation in the dataset.
//
// For a dataset of n points in canonical order, `entry(col, row)` is the
// vector from point `col` to point `row`. Columns are sorted by
// construction — the dataset is sorted and translation by a fixed origin
// preserves order — which is the property the completion sweep's monotone
// cursors rely on.
//
// Two derived views feed the extraction stage:
// - `sia_pairs`: the upper triangle (row > col) as a flat list sorted by
//   (vector, origin), ready for run partitioning. Maximality of the
//   extracted patterns follows directly from this sort.
// - `superdiagonal_pairs`: the restricted `row - col <= r` window, trading
//   completeness of far-apart repeats for an O(n·r·log(n·r)) build.
//
// Construction is parallel per column, then a single deterministic
// comparison sort. Never a hash-ordered structure: output order must be
// reproducible run to run.

use crate::cancel::CancelToken;
use crate::error::EngineError;
use motivic_geom::{Point, PointSet, Vector};
use rayon::prelude::*;

/// Full n×n table of pairwise translation vectors, flat storage.
#[derive(Debug, Clone)]
pub struct VectorTable {
    n: usize,
    vecs: Vec<Vector>,
}

impl VectorTable {
    /// Build the full table. Checks for cancellation between columns.
    pub fn build(dataset: &PointSet, cancel: &CancelToken) -> Result<VectorTable, EngineError> {
        let points = dataset.as_slice();
        let n = points.len();
        let columns: Vec<Vec<Vector>> = (0..n)
            .into_par_iter()
            .map(|col| {
                cancel.check()?;
                let origin = points[col];
                Ok(points.iter().map(|&p| origin.vector_to(p)).collect())
            })
            .collect::<Result<_, EngineError>>()?;
        let mut vecs = Vec::with_capacity(n * n);
        for column in columns {
            vecs.extend(column);
        }
        Ok(VectorTable { n, vecs })
    }

    /// Number of dataset points (the table is `size` × `size`).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Vector from point `col` to point `row`.
    pub fn entry(&self, col: usize, row: usize) -> Vector {
        self.vecs[col * self.n + row]
    }

    /// One origin's column: vectors to every dataset point, in row order.
    /// Sorted, because the dataset is.
    pub fn column(&self, col: usize) -> &[Vector] {
        &self.vecs[col * self.n..(col + 1) * self.n]
    }
}

/// One upper-triangle table entry: the translation and the dataset index of
/// its origin point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiaPair {
    pub vector: Vector,
    pub origin: usize,
}

/// All ordered pairs (origin i, point[j] − point[i]) for j > i, sorted by
/// (vector, origin point) canonical order.
pub fn sia_pairs(dataset: &PointSet, cancel: &CancelToken) -> Result<Vec<SiaPair>, EngineError> {
    pairs_in_window(dataset, usize::MAX, cancel)
}

/// The restricted window `j − i <= r`, sorted the same way. The patterns
/// extracted from it are necessarily partial; translator completion against
/// the full table recovers the genuine translator sets.
pub fn superdiagonal_pairs(
    dataset: &PointSet,
    r: usize,
    cancel: &CancelToken,
) -> Result<Vec<SiaPair>, EngineError> {
    pairs_in_window(dataset, r, cancel)
}

fn pairs_in_window(
    dataset: &PointSet,
    r: usize,
    cancel: &CancelToken,
) -> Result<Vec<SiaPair>, EngineError> {
    let points: &[Point] = dataset.as_slice();
    let n = points.len();
    let rows: Vec<Vec<SiaPair>> = (0..n)
        .into_par_iter()
        .map(|i| {
            cancel.check()?;
            let origin = points[i];
            let end = if r == usize::MAX { n } else { n.min(i.saturating_add(r + 1)) };
            Ok(points[i + 1..end]
                .iter()
                .map(|&p| SiaPair {
                    vector: origin.vector_to(p),
                    origin: i,
                })
                .collect())
        })
        .collect::<Result<_, EngineError>>()?;
    let mut pairs: Vec<SiaPair> = rows.into_iter().flatten().collect();
    // Origin index order coincides with origin point order, so (vector,
    // origin) is exactly the (vector, origin point) canonical sort.
    pairs.par_sort_unstable_by(|a, b| a.vector.cmp(&b.vector).then(a.origin.cmp(&b.origin)));
    cancel.check()?;
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ps(points: &[(i64, i32)]) -> PointSet {
        points
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect()
    }

    #[test]
    fn table_entries_are_pairwise_vectors() {
        let dataset = ps(&[(0, 0), (1, 2), (5, 1)]);
        let table = VectorTable::build(&dataset, &CancelToken::new()).unwrap();
        assert_eq!(table.size(), 3);
        assert_eq!(table.entry(0, 1), Vector::new(1, 2));
        assert_eq!(table.entry(1, 0), Vector::new(-1, -2));
        assert_eq!(table.entry(2, 2), Vector::ZERO);
    }

    #[test]
    fn columns_are_sorted() {
        let dataset = ps(&[(0, 0), (1, 5), (2, 1), (7, -3)]);
        let table = VectorTable::build(&dataset, &CancelToken::new()).unwrap();
        for col in 0..table.size() {
            let column = table.column(col);
            assert!(column.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn sia_pairs_cover_upper_triangle_sorted() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0)]);
        let pairs = sia_pairs(&dataset, &CancelToken::new()).unwrap();
        // 3 points -> 3 ordered pairs.
        assert_eq!(pairs.len(), 3);
        assert!(
            pairs
                .windows(2)
                .all(|w| (w[0].vector, w[0].origin) <= (w[1].vector, w[1].origin))
        );
        // v(1,0) appears from origins 0 and 1, v(2,0) from origin 0.
        assert_eq!(pairs[0].vector, Vector::new(1, 0));
        assert_eq!(pairs[1].vector, Vector::new(1, 0));
        assert_eq!(pairs[2].vector, Vector::new(2, 0));
    }

    #[test]
    fn superdiagonal_window_restricts_pairs() {
        let dataset = ps(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let all = sia_pairs(&dataset, &CancelToken::new()).unwrap();
        let restricted = superdiagonal_pairs(&dataset, 1, &CancelToken::new()).unwrap();
        assert_eq!(all.len(), 6);
        // r = 1 keeps only adjacent pairs.
        assert_eq!(restricted.len(), 3);
        assert!(restricted.iter().all(|p| p.vector == Vector::new(1, 0)));
    }

    #[test]
    fn cancelled_build_returns_error() {
        let dataset = ps(&[(0, 0), (1, 1)]);
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            VectorTable::build(&dataset, &token).unwrap_err(),
            EngineError::Cancelled
        );
    }
}
