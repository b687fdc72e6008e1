//! Benchmark profiles for the grain simulation workspace.
//!
//! - [`reference_grid`]: 100x100 periodic grid, fully grown from 100 seeds
//! - [`stress_grid`]: 316x316 periodic grid (~100K cells), 1000 seeds
//! - [`seeded_grid`]: seeds only, for timing growth from scratch

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use grain_engines::CellularAutomata;
use grain_space::{Grid, Neighborhood};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator used by every profile.
pub fn bench_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// An empty periodic grid with `grains` random seeds.
pub fn seeded_grid(width: u32, height: u32, grains: usize, seed: u64) -> Grid {
    let mut grid = Grid::new(width, height, true).unwrap();
    let mut ca = CellularAutomata::new(Neighborhood::Moore);
    ca.add_random_grains(&mut grid, &mut bench_rng(seed), grains)
        .unwrap();
    grid
}

/// A periodic grid grown to completion from `grains` random seeds.
pub fn grown_grid(width: u32, height: u32, grains: usize, seed: u64) -> Grid {
    let mut grid = seeded_grid(width, height, grains, seed);
    CellularAutomata::new(Neighborhood::Moore).grow_until_stalled(&mut grid);
    grid
}

/// 100x100 (10K cells) grown from 100 seeds.
pub fn reference_grid(seed: u64) -> Grid {
    grown_grid(100, 100, 100, seed)
}

/// 316x316 (~100K cells) grown from 1000 seeds.
pub fn stress_grid(seed: u64) -> Grid {
    grown_grid(316, 316, 1000, seed)
}
