//! Criterion micro-benchmarks for the three engine sweeps.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use grain_bench::{bench_rng, reference_grid, seeded_grid};
use grain_engines::{
    CellularAutomata, EnergyDistribution, MonteCarlo, NucleationSchedule, Recrystallization,
};
use grain_space::Neighborhood;

/// Benchmark: grow a 100x100 periodic grid from 100 seeds to completion.
fn bench_ca_grow_10k(c: &mut Criterion) {
    let seeded = seeded_grid(100, 100, 100, 42);

    c.bench_function("ca_grow_until_stalled_10k", |b| {
        b.iter_batched(
            || seeded.clone(),
            |mut grid| {
                let mut ca = CellularAutomata::new(Neighborhood::Moore);
                black_box(ca.grow_until_stalled(&mut grid));
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: one zero-temperature Monte Carlo sweep (10K trials).
fn bench_mc_step_10k(c: &mut Criterion) {
    let mut grid = reference_grid(42);
    let mut mc = MonteCarlo::new(Neighborhood::Moore);
    let mut rng = bench_rng(7);

    c.bench_function("mc_step_10k", |b| {
        b.iter(|| {
            mc.step(&mut grid, &mut rng);
            black_box(&grid);
        });
    });
}

/// Benchmark: a full 60-step recrystallization run on a grown 100x100 grid.
fn bench_srx_simulate_10k(c: &mut Criterion) {
    let grown = reference_grid(42);
    let schedule = NucleationSchedule::at_start(20);

    c.bench_function("srx_simulate_10k", |b| {
        b.iter_batched(
            || (grown.clone(), bench_rng(3)),
            |(mut grid, mut rng)| {
                let mut srx = Recrystallization::new(Neighborhood::Moore)
                    .with_distribution(EnergyDistribution::Heterogeneous {
                        boundary_factor: 2.0,
                    })
                    .unwrap();
                black_box(srx.simulate(&mut grid, &mut rng, 5.0, 60, &schedule).unwrap());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_ca_grow_10k,
    bench_mc_step_10k,
    bench_srx_simulate_10k
);
criterion_main!(benches);
