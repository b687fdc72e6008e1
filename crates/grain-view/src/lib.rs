//! Colour assignment and frame rendering for grain growth grids.
//!
//! A [`Palette`] maps grain ids to distinct colours; a [`Renderer`] turns a
//! whole [`Grid`](grain_space::Grid) into a row-major RGBA8 frame that any
//! windowing or image layer can blit.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod palette;
pub mod render;

pub use palette::{Palette, Rgba};
pub use render::Renderer;
