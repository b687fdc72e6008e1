//! Core types for the grain growth simulation workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! per-site [`Cell`] state, grain identifiers and their allocator, and the
//! [`GrainError`] type shared by the grid and every engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod alloc;
pub mod cell;
pub mod error;
pub mod id;

pub use alloc::GrainIdAllocator;
pub use cell::{Cell, CellState};
pub use error::GrainError;
pub use id::{GrainId, GridInstanceId};
