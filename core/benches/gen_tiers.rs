use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sweeper_core::*;

fn tiers() -> [(&'static str, GameConfig); 4] {
    [
        ("beginner", GameConfig::beginner()),
        ("intermediate", GameConfig::intermediate()),
        ("expert", GameConfig::expert()),
        ("huge", GameConfig::new_unchecked(255, 255, 13000)),
    ]
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in tiers() {
        for safe_start in [SafeStart::Random, SafeStart::AlwaysZero] {
            let id = BenchmarkId::new(name, format!("{safe_start:?}"));
            group.bench_with_input(id, &config, |b, &config| {
                let mut seed = 0;
                b.iter(|| {
                    seed += 1;
                    let start = (config.height / 2, config.width / 2);
                    RandomMineLayoutGenerator::new(seed, Some(start), safe_start)
                        .generate(black_box(config))
                        .unwrap()
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
