// Benchmark the hot path: vector table, extraction, completion.
//
// The synthetic score repeats a small figure across transpositions with
// interleaved noise, so the extraction stage sees both long equal-vector
// runs and plenty of singleton runs, like a real piece does.

use criterion::{Criterion, criterion_group, criterion_main};
use motivic_geom::{Point, PointSet};
use motivic_sia::sia::extract_mtps;
use motivic_sia::siatec::compute_tecs;
use motivic_sia::table::sia_pairs;
use motivic_sia::{CancelToken, VectorTable};
use std::hint::black_box;

/// A figure of `figure_len` notes repeated at `occurrences` transpositions,
/// with one off-lattice noise point per occurrence.
fn synthetic_score(figure_len: i64, occurrences: i64) -> PointSet {
    let mut points = Vec::new();
    for occ in 0..occurrences {
        let (ox, oy) = (occ * (figure_len + 5), (occ % 7) as i32 * 3);
        for i in 0..figure_len {
            points.push(Point::new(ox + i, oy + ((i * 5) % 12) as i32));
        }
        points.push(Point::new(ox + figure_len, oy + 40 + occ as i32));
    }
    PointSet::from_points(points)
}

fn bench_pipeline(c: &mut Criterion) {
    let dataset = synthetic_score(8, 12);
    let cancel = CancelToken::new();

    c.bench_function("vector_table_build", |b| {
        b.iter(|| VectorTable::build(black_box(&dataset), &cancel).unwrap())
    });

    c.bench_function("sia_extract", |b| {
        b.iter(|| {
            let pairs = sia_pairs(black_box(&dataset), &cancel).unwrap();
            extract_mtps(&dataset, &pairs, 2)
        })
    });

    let table = VectorTable::build(&dataset, &cancel).unwrap();
    let pairs = sia_pairs(&dataset, &cancel).unwrap();
    let mtps = extract_mtps(&dataset, &pairs, 2);
    c.bench_function("siatec_complete", |b| {
        b.iter(|| {
            compute_tecs(
                black_box(&dataset),
                black_box(&table),
                black_box(&mtps),
                2,
                1,
                &cancel,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
