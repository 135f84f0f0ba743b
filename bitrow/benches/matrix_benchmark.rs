use bitrow::{BitMatrix, BitVec};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn random_matrix(rows: usize, columns: usize, seed: u64) -> BitMatrix {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut matrix = BitMatrix::zeros(rows, columns);
    matrix.randomize(&mut rng);
    matrix
}

pub fn product_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitMatrix::product");
    for rows in [64usize, 512usize, 4096usize] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |bencher, &rows| {
            bencher.iter_batched(
                || {
                    let matrix = random_matrix(rows, 64, rows as u64);
                    let mut x = BitVec::zeros(rows);
                    x.randomize(&mut SmallRng::seed_from_u64(rows as u64 + 1));
                    (matrix, x)
                },
                |(matrix, x)| matrix.product(&x),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

pub fn column_swap_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitMatrix::swap_columns");
    for rows in [64usize, 512usize, 4096usize] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |bencher, &rows| {
            bencher.iter_batched(
                || random_matrix(rows, 64, rows as u64),
                |mut matrix| {
                    matrix.swap_columns(0, 63);
                    matrix
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, product_benchmark, column_swap_benchmark);
criterion_main!(benches);
