//! Grain: polycrystalline microstructure simulation on a 2D lattice.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all grain sub-crates. For most users, adding `grain` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use grain::prelude::*;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut grid = Grid::new(64, 64, true).unwrap();
//!
//! // Seed and grow a microstructure.
//! let mut ca = CellularAutomata::new(Neighborhood::Moore);
//! ca.add_random_grains(&mut grid, &mut rng, 20).unwrap();
//! ca.grow_until_stalled(&mut grid);
//! assert!(grid.is_full());
//!
//! // Recrystallize it.
//! let mut srx = Recrystallization::new(Neighborhood::Moore);
//! srx.simulate(&mut grid, &mut rng, 5.0, 40, &NucleationSchedule::at_start(8))
//!     .unwrap();
//! assert!(grid.cells().iter().all(|c| c.recrystallized));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `grain-core` | Cells, grain ids, id allocation, errors |
//! | [`space`] | `grain-space` | The grid, kernels, boundary policy, inclusion shapes |
//! | [`engines`] | `grain-engines` | CA, Monte Carlo and recrystallization engines |
//! | [`view`] | `grain-view` | Palettes and RGBA rendering |
//! | [`sim`] | `grain-sim` | Configuration, tools, and the interactive session |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Cells, grain ids and errors (`grain-core`).
pub use grain_core as types;

/// The grid and its neighbourhood kernels (`grain-space`).
pub use grain_space as space;

/// Growth engines (`grain-engines`).
///
/// [`engines::CellularAutomata`] for deterministic growth,
/// [`engines::MonteCarlo`] for boundary migration, and
/// [`engines::Recrystallization`] for static recrystallization.
pub use grain_engines as engines;

/// Palettes and frame rendering (`grain-view`).
pub use grain_view as view;

/// Interactive sessions (`grain-sim`).
pub use grain_sim as sim;

/// Common imports for typical grain usage.
///
/// ```rust
/// use grain::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use grain_core::{Cell, CellState, GrainError, GrainId};

    // Space
    pub use grain_space::{EdgeBehavior, Grid, InclusionShape, Neighborhood};

    // Engines
    pub use grain_engines::{
        CellularAutomata, EnergyDistribution, MonteCarlo, NucleationMode, NucleationSchedule,
        NucleationSites, Recrystallization,
    };

    // View
    pub use grain_view::{Palette, Renderer, Rgba};

    // Session
    pub use grain_sim::{ConfigError, Simulation, SimulationConfig, Tool};
}
