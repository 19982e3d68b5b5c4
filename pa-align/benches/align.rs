use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pa_affine_types::{GapScheme, MatchMismatch, Sequence};
use pa_align::{align_pairwise, AlignmentConfig, OutputFields};

fn config() -> AlignmentConfig {
    AlignmentConfig::new()
        .method_global()
        .gap(GapScheme::affine(-10, -1))
        .scoring(MatchMismatch::new(4, -5))
        .output(OutputFields::SCORE | OutputFields::END_POSITION)
}

fn run(pairs: &[(Sequence, Sequence)], config: AlignmentConfig) -> usize {
    align_pairwise(pairs, config)
        .unwrap()
        .filter(|r| r.is_ok())
        .count()
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");
    for n in [100, 1_000] {
        let pairs: Vec<_> = (0..64).map(|seed| pa_test::gen_seqs(n, 0.1, seed)).collect();
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |bench, _| {
            bench.iter(|| run(black_box(&pairs), config()))
        });
        group.bench_with_input(BenchmarkId::new("vectorised", n), &n, |bench, _| {
            bench.iter(|| run(black_box(&pairs), config().vectorised()))
        });
        group.bench_with_input(BenchmarkId::new("trace", n), &n, |bench, _| {
            bench.iter(|| run(black_box(&pairs), config().output(OutputFields::ALIGNMENT)))
        });
        let unit = AlignmentConfig::new()
            .method_global()
            .scoring(MatchMismatch::unit())
            .output(OutputFields::SCORE);
        group.bench_with_input(BenchmarkId::new("edit_distance", n), &n, |bench, _| {
            bench.iter(|| run(black_box(&pairs), unit.clone()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_align);
criterion_main!(benches);
