// The compactness trawler: split sparse patterns into dense fragments.
//
// A maximal pattern often strings together several genuinely repeated
// figures with long gaps of unrelated material between them. Walking the
// pattern's column index set in order, a running fragment Q is extended as
// long as its local density — fragment size over the dataset-index span it
// occupies — stays at or above the floor `a`. When a point would drop the
// density below the floor, Q is emitted if it has at least `b` points and
// discarded otherwise, and the walk starts a fresh fragment from the next
// point. Fragments inherit the source pattern's discovering vectors.
//
// With a = 0 and b = 0 every point extends Q and the final emit returns
// the pattern unchanged: trawling is a no-op.

use crate::sia::Mtp;
use motivic_geom::PointSet;

/// Split each pattern into fragments meeting the density floor `a` with at
/// least `b` points.
pub fn trawl(mtps: &[Mtp], a: f64, b: usize) -> Vec<Mtp> {
    let mut fragments = Vec::new();
    for mtp in mtps {
        let points: Vec<_> = mtp.pattern.iter().collect();
        let mut q_points: Vec<motivic_geom::Point> = Vec::new();
        let mut q_cis: Vec<usize> = Vec::new();
        let mut first_ci = 0usize;
        for (point, &ci) in points.iter().zip(mtp.cis.iter()) {
            if q_cis.is_empty() {
                q_points.push(*point);
                q_cis.push(ci);
                first_ci = ci;
            } else {
                let span = ci - first_ci + 1;
                if (q_cis.len() + 1) as f64 / span as f64 >= a {
                    q_points.push(*point);
                    q_cis.push(ci);
                } else {
                    if q_cis.len() >= b {
                        fragments.push(Mtp {
                            pattern: PointSet::from_points(std::mem::take(&mut q_points)),
                            cis: std::mem::take(&mut q_cis),
                            vectors: mtp.vectors.clone(),
                        });
                    } else {
                        q_points.clear();
                        q_cis.clear();
                    }
                    // The breaking point itself is dropped; the next point
                    // starts the fresh fragment.
                }
            }
        }
        if q_cis.len() >= b && !q_cis.is_empty() {
            fragments.push(Mtp {
                pattern: PointSet::from_points(q_points),
                cis: q_cis,
                vectors: mtp.vectors.clone(),
            });
        }
    }
    fragments
}
