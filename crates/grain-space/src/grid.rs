//! The lattice: a row-major array of cells with a fixed boundary policy.

use std::collections::HashSet;

use crate::edge::EdgeBehavior;
use crate::neighborhood::Neighborhood;
use crate::shape::InclusionShape;
use grain_core::{Cell, CellState, GrainError, GrainId, GrainIdAllocator, GridInstanceId};
use smallvec::SmallVec;

/// Neighbour coordinates as `(x, y)` pairs, in kernel order.
pub type Neighbours = SmallVec<[(u32, u32); 8]>;

/// Neighbour flat indices, in kernel order.
pub type NeighbourIndices = SmallVec<[usize; 8]>;

/// A two-dimensional lattice of [`Cell`]s.
///
/// Cell `(x, y)` lives at flat index `y * width + x`. Dimensions and the
/// boundary policy are fixed at construction: changing either means
/// building a new grid, which also starts a new grain id sequence and a new
/// [`GridInstanceId`].
///
/// The grid owns the [`GrainIdAllocator`] so that ids stay unique for
/// exactly as long as the cells that carry them.
///
/// Cloning copies cells and allocator state but issues a new
/// [`GridInstanceId`]: the clone evolves independently, so engines must
/// not mistake it for the original.
#[derive(Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    edge: EdgeBehavior,
    cells: Vec<Cell>,
    allocator: GrainIdAllocator,
    instance_id: GridInstanceId,
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            edge: self.edge,
            cells: self.cells.clone(),
            allocator: self.allocator.clone(),
            instance_id: GridInstanceId::next(),
        }
    }
}

impl Grid {
    /// Maximum dimension size: signed offset arithmetic must fit in `i32`.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create an empty grid, periodic or not.
    ///
    /// # Examples
    ///
    /// ```
    /// use grain_space::Grid;
    ///
    /// let grid = Grid::new(16, 8, true).unwrap();
    /// assert_eq!(grid.cell_count(), 128);
    /// assert!(grid.is_periodic());
    /// assert!(Grid::new(0, 8, false).is_err());
    /// ```
    pub fn new(width: u32, height: u32, periodic: bool) -> Result<Self, GrainError> {
        Self::with_edge(width, height, EdgeBehavior::from_periodic(periodic))
    }

    /// Create an empty grid with an explicit [`EdgeBehavior`].
    ///
    /// Returns `InvalidArgument` if either dimension is 0, exceeds
    /// [`MAX_DIM`](Self::MAX_DIM), or the cell count overflows `usize`.
    pub fn with_edge(width: u32, height: u32, edge: EdgeBehavior) -> Result<Self, GrainError> {
        if width == 0 || height == 0 {
            return Err(GrainError::invalid(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(GrainError::invalid(format!(
                "grid dimensions {width}x{height} exceed maximum {}",
                Self::MAX_DIM
            )));
        }
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| GrainError::invalid("grid cell count overflows usize"))?;
        Ok(Self {
            width,
            height,
            edge,
            cells: vec![Cell::EMPTY; count],
            allocator: GrainIdAllocator::new(),
            instance_id: GridInstanceId::next(),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Boundary policy.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    /// True if edges wrap.
    pub fn is_periodic(&self) -> bool {
        self.edge.is_periodic()
    }

    /// Total number of cells, `width * height`.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Identity of this grid instance.
    pub fn instance_id(&self) -> GridInstanceId {
        self.instance_id
    }

    // ── Cell access ─────────────────────────────────────────────

    /// Flat index of `(x, y)`, or `OutOfRange`.
    pub fn index_of(&self, x: u32, y: u32) -> Result<usize, GrainError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_range(i64::from(x), i64::from(y)));
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Coordinates of a flat index. The index must be below
    /// [`cell_count`](Self::cell_count).
    pub fn coords_of(&self, index: usize) -> (u32, u32) {
        debug_assert!(index < self.cells.len());
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// The cell at `(x, y)`.
    pub fn cell_at(&self, x: u32, y: u32) -> Result<&Cell, GrainError> {
        let i = self.index_of(x, y)?;
        Ok(&self.cells[i])
    }

    /// Overwrite the cell at `(x, y)`.
    ///
    /// A grain id written here is reported to the allocator, so it is never
    /// handed out again.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for coordinates off the grid and
    /// `InvalidArgument` for grain ids above [`GrainId::MAX`]. The cell is
    /// left unchanged on error.
    pub fn set_cell(&mut self, x: u32, y: u32, cell: Cell) -> Result<(), GrainError> {
        let i = self.index_of(x, y)?;
        if let Some(id) = cell.grain_id() {
            self.allocator.observe(id)?;
        }
        self.cells[i] = cell;
        Ok(())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to all cells in row-major order.
    ///
    /// Grain ids written through this slice must come from
    /// [`allocate_grain_id`](Self::allocate_grain_id).
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Occupancy of every cell, in row-major order.
    pub fn states(&self) -> Vec<CellState> {
        self.cells.iter().map(|c| c.state).collect()
    }

    // ── Grain ids ───────────────────────────────────────────────

    /// Issue a fresh grain id from this grid's allocator.
    pub fn allocate_grain_id(&mut self) -> GrainId {
        self.allocator.allocate()
    }

    /// This grid's id allocator.
    pub fn allocator(&self) -> &GrainIdAllocator {
        &self.allocator
    }

    /// Number of distinct grain ids currently present.
    pub fn grain_count(&self) -> usize {
        self.cells
            .iter()
            .filter_map(Cell::grain_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|c| c.state.is_empty())
    }

    /// Number of cells in the given state.
    pub fn count_state(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    /// Reset every cell to empty. The id sequence continues; cleared ids
    /// are never reissued.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    // ── Neighbourhoods ──────────────────────────────────────────

    /// Neighbours of `(x, y)` under `kernel`, in kernel order.
    ///
    /// Periodic grids wrap; non-periodic grids drop out-of-range
    /// neighbours. On very small periodic grids the same cell (or the cell
    /// itself) can appear more than once.
    pub fn neighbours_of(
        &self,
        x: u32,
        y: u32,
        kernel: Neighborhood,
    ) -> Result<Neighbours, GrainError> {
        self.index_of(x, y)?;
        Ok(kernel
            .offsets()
            .iter()
            .filter_map(|&(dx, dy)| self.resolve(x, y, dx, dy))
            .collect())
    }

    /// Flat indices of the neighbours of cell `index`, in kernel order.
    /// The index must be below [`cell_count`](Self::cell_count).
    pub fn neighbour_indices(&self, index: usize, kernel: Neighborhood) -> NeighbourIndices {
        let (x, y) = self.coords_of(index);
        let w = self.width as usize;
        kernel
            .offsets()
            .iter()
            .filter_map(|&(dx, dy)| self.resolve(x, y, dx, dy))
            .map(|(nx, ny)| ny as usize * w + nx as usize)
            .collect()
    }

    fn resolve(&self, x: u32, y: u32, dx: i32, dy: i32) -> Option<(u32, u32)> {
        let nx = self
            .edge
            .resolve_axis(i64::from(x) + i64::from(dx), self.width)?;
        let ny = self
            .edge
            .resolve_axis(i64::from(y) + i64::from(dy), self.height)?;
        Some((nx, ny))
    }

    // ── Regions ─────────────────────────────────────────────────

    /// Flat indices of the in-bounds cells covered by `shape` of `radius`
    /// centred on `(cx, cy)`, in row-major order.
    ///
    /// Distances are measured on the plane; the footprint is clipped at the
    /// edges and never wraps, even on a periodic grid.
    pub fn cells_within(
        &self,
        cx: u32,
        cy: u32,
        radius: u32,
        shape: InclusionShape,
    ) -> Result<Vec<usize>, GrainError> {
        self.index_of(cx, cy)?;
        let r = i64::from(radius);
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let x_lo = (cx - r).max(0);
        let x_hi = (cx + r).min(i64::from(self.width) - 1);
        let y_lo = (cy - r).max(0);
        let y_hi = (cy + r).min(i64::from(self.height) - 1);

        let mut out = Vec::new();
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                if shape.covers(x - cx, y - cy, radius) {
                    out.push(y as usize * self.width as usize + x as usize);
                }
            }
        }
        Ok(out)
    }

    fn out_of_range(&self, x: i64, y: i64) -> GrainError {
        GrainError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}
