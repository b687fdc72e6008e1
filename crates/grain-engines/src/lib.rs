//! Growth engines for polycrystalline microstructure simulation.
//!
//! Three independent engines share nothing but the [`Grid`] they are
//! handed on each call:
//!
//! - [`CellularAutomata`]: inclusions, random seeding, deterministic
//!   synchronous growth, and grain selection for merge/delete edits.
//! - [`MonteCarlo`]: Potts-model boundary migration with zero-temperature
//!   (optionally Metropolis) acceptance.
//! - [`Recrystallization`]: stored energy, nucleation, and an
//!   energy-consuming recrystallization front.
//!
//! Engines borrow the grid per call and never own it. Each remembers the
//! [`GridInstanceId`](grain_core::GridInstanceId) it last saw; handing it a
//! different grid discards its bookkeeping. Randomness always comes from a
//! caller-supplied generator, so runs replay exactly from a seed.
//!
//! [`Grid`]: grain_space::Grid

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod binding;
pub mod ca;
pub mod energy;
pub mod mc;
pub mod nucleation;
mod sampling;
pub mod srx;

pub use ca::CellularAutomata;
pub use energy::EnergyDistribution;
pub use mc::MonteCarlo;
pub use nucleation::{NucleationMode, NucleationSchedule, NucleationSites};
pub use srx::Recrystallization;
