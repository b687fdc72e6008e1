//! The 2D lattice for grain growth simulations.
//!
//! This crate defines the [`Grid`] that every engine mutates, along with
//! the neighbourhood kernels that drive growth and the boundary policy
//! that decides what lies beyond the edge.
//!
//! # Kernels
//!
//! - [`Neighborhood::VonNeumann`]: 4-connected (index 0, the default)
//! - [`Neighborhood::Moore`]: 8-connected, diagonals included (index 1)
//! - [`Neighborhood::HexagonalLeft`] / [`Neighborhood::HexagonalRight`]:
//!   6-connected skewed hexagonal kernels (indices 2 and 3)
//!
//! Neighbour order is fixed per kernel, so "first neighbour in kernel
//! order" tie-breaks are reproducible.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod grid;
pub mod neighborhood;
pub mod shape;

pub use edge::EdgeBehavior;
pub use grid::{Grid, NeighbourIndices, Neighbours};
pub use neighborhood::Neighborhood;
pub use shape::InclusionShape;
