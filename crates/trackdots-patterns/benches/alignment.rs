use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use trackdots_patterns::{Aligner, BitGrid, Field, PatternId, Tdm, Transformation};

fn family4_page() -> BitGrid {
    let mut tdm = Tdm::blank(PatternId::Four);
    let raw = "0".repeat(28);
    let fields = [
        (Field::Raw, raw.as_str()),
        (Field::Minutes, "55"),
        (Field::Hour, "15"),
        (Field::Day, "12"),
        (Field::Month, "06"),
        (Field::Year, "18"),
    ];
    for (field, value) in fields {
        tdm.set(field, value).unwrap();
    }
    let t = Transformation {
        rotation: 2,
        flip: true,
        ..Transformation::IDENTITY
    };
    Tdm::new(PatternId::Four, tdm.bits(), t)
        .unwrap()
        .materialize()
}

fn noise(rows: usize, cols: usize, density: f64, seed: u64) -> BitGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = BitGrid::zeros(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            grid.set(r, c, rng.gen_bool(density));
        }
    }
    grid
}

fn bench_alignment(c: &mut Criterion) {
    let page = family4_page();
    let four = Aligner::new(PatternId::Four);
    c.bench_function("align_family4_materialized", |b| {
        b.iter(|| black_box(four.align(black_box(&page), None).unwrap()))
    });

    let three = Aligner::new(PatternId::Three);
    let noisy = noise(24, 48, 0.1, 7);
    c.bench_function("align_family3_noise", |b| {
        b.iter(|| black_box(three.transformations(black_box(&noisy)).unwrap()))
    });

    let two = Aligner::new(PatternId::Two);
    let noisy = noise(18, 23, 0.3, 11);
    c.bench_function("align_and_check_family2_noise", |b| {
        b.iter(|| {
            let found = two.align(black_box(&noisy), None).unwrap();
            black_box(found.iter().filter(|t| t.check()).count())
        })
    });
}

criterion_group!(benches, bench_alignment);
criterion_main!(benches);
