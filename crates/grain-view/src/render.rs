//! Frame rendering.

use grain_core::{Cell, CellState, GrainError};
use grain_space::Grid;

use crate::palette::{Palette, Rgba, BACKGROUND, HIGHLIGHT, INCLUSION};

/// Largest zoom factor accepted by [`Renderer::with_zoom`].
pub const MAX_ZOOM: u32 = 64;

/// Maps cells to colours and grids to RGBA8 frames.
#[derive(Clone, Debug)]
pub struct Renderer {
    palette: Palette,
    highlight_recrystallized: bool,
    zoom: u32,
}

impl Renderer {
    /// A renderer drawing one pixel per cell, without highlighting.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            highlight_recrystallized: false,
            zoom: 1,
        }
    }

    /// Draw each cell as a `zoom` x `zoom` block.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `1 <= zoom <= MAX_ZOOM`.
    pub fn with_zoom(mut self, zoom: u32) -> Result<Self, GrainError> {
        if zoom == 0 || zoom > MAX_ZOOM {
            return Err(GrainError::invalid(format!(
                "zoom must be in 1..={MAX_ZOOM}, got {zoom}"
            )));
        }
        self.zoom = zoom;
        Ok(self)
    }

    /// Paint recrystallized cells in [`HIGHLIGHT`] instead of their grain
    /// colour.
    pub fn set_highlight_recrystallized(&mut self, on: bool) {
        self.highlight_recrystallized = on;
    }

    /// Whether recrystallized cells are highlighted.
    pub fn highlights_recrystallized(&self) -> bool {
        self.highlight_recrystallized
    }

    /// Pixels per cell edge.
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// The grain palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Colour of a single cell.
    pub fn color_of(&self, cell: &Cell) -> Rgba {
        match cell.state {
            CellState::Empty => BACKGROUND,
            CellState::Inclusion => INCLUSION,
            CellState::Grain(_) if cell.recrystallized && self.highlight_recrystallized => {
                HIGHLIGHT
            }
            CellState::Grain(id) => self.palette.color(id),
        }
    }

    /// Frame dimensions in pixels for `grid`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either zoomed dimension overflows
    /// `u32`, or the RGBA8 buffer would not fit in `usize`.
    pub fn frame_size(&self, grid: &Grid) -> Result<(u32, u32), GrainError> {
        frame_size(grid.width(), grid.height(), self.zoom)
    }

    /// Map a frame pixel back to the cell drawn there.
    pub fn pixel_to_cell(&self, px: u32, py: u32) -> (u32, u32) {
        (px / self.zoom, py / self.zoom)
    }

    /// Render `grid` as a row-major RGBA8 frame of
    /// [`frame_size`](Self::frame_size) pixels.
    ///
    /// # Errors
    ///
    /// Same as [`frame_size`](Self::frame_size).
    pub fn render_rgba(&self, grid: &Grid) -> Result<Vec<u8>, GrainError> {
        let (fw, fh) = self.frame_size(grid)?;
        let (fw, fh) = (fw as usize, fh as usize);
        let zoom = self.zoom as usize;
        let width = grid.width() as usize;
        let mut rgba = vec![0u8; fw * fh * 4];

        for (y, row) in rgba.chunks_exact_mut(fw * 4).enumerate() {
            let cells = &grid.cells()[(y / zoom) * width..][..width];
            for (cell, block) in cells.iter().zip(row.chunks_exact_mut(zoom * 4)) {
                let color = self.color_of(cell);
                for px in block.chunks_exact_mut(4) {
                    px.copy_from_slice(&color);
                }
            }
        }
        Ok(rgba)
    }
}

/// Pixel dimensions of a `width` x `height` grid drawn at `zoom`.
///
/// # Errors
///
/// Returns `InvalidArgument` if either dimension overflows `u32`, or the
/// RGBA8 buffer (4 bytes per pixel) would not fit in `usize`.
pub fn frame_size(width: u32, height: u32, zoom: u32) -> Result<(u32, u32), GrainError> {
    let too_large = || {
        GrainError::invalid(format!(
            "frame for a {width}x{height} grid at zoom {zoom} is too large"
        ))
    };
    let fw = width.checked_mul(zoom).ok_or_else(too_large)?;
    let fh = height.checked_mul(zoom).ok_or_else(too_large)?;
    (fw as usize)
        .checked_mul(fh as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(too_large)?;
    Ok((fw, fh))
}
