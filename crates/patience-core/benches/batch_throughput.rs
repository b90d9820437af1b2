use criterion::{Criterion, black_box, criterion_group, criterion_main};
use patience_core::{BatchPlan, Deck, many_plays, play, run_batch};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn single_game_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_game");
    for seed in [42u64, 2024, 20251016] {
        let deck = Deck::shuffled_with_seed(seed);
        group.bench_function(format!("play_{seed}"), |b| b.iter(|| play(black_box(&deck))));
    }
    group.finish();
}

fn batch_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    group.bench_function("many_plays_1000", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            black_box(many_plays(&mut rng, 1_000))
        })
    });
    group.bench_function("run_batch_10000_x4", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            black_box(run_batch(&mut rng, BatchPlan::with_workers(10_000, 4)))
        })
    });
    group.finish();
}

criterion_group!(benches, single_game_bench, batch_bench);
criterion_main!(benches);
