//! Cellular automata grain growth.
//!
//! Growth is synchronous: every sweep reads the grid as it stood when the
//! sweep began, so a grain advances exactly one kernel shell per
//! [`step`](CellularAutomata::step). An empty cell bordering several grains
//! joins the first one found in kernel order.
//!
//! Besides growth the engine owns the editing operations driven by the
//! input dispatcher: stamping inclusions and a two-phase grain selection
//! (`Idle` ⇄ `Selecting`) that either merges the selected grains into one
//! new grain or deletes them.

use grain_core::{Cell, CellState, GrainError, GrainId, GridInstanceId};
use grain_space::{Grid, InclusionShape, Neighborhood};
use indexmap::IndexSet;
use rand::Rng;
use tracing::{debug, trace};

use crate::binding::Binding;
use crate::sampling;

/// Selection sub-state of the CA engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
    /// No selection in progress.
    #[default]
    Idle,
    /// Collecting grains to edit.
    Selecting {
        /// `true`: merge selected grains into one fresh id.
        /// `false`: delete them, releasing their cells back to empty.
        change_id: bool,
        /// Selected grain ids in selection order.
        selected: IndexSet<GrainId>,
    },
}

/// Deterministic cellular automata growth engine.
#[derive(Clone, Debug, Default)]
pub struct CellularAutomata {
    neighborhood: Neighborhood,
    selection: SelectionState,
    binding: Binding,
}

impl CellularAutomata {
    /// Create an engine using the given kernel.
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self {
            neighborhood,
            ..Self::default()
        }
    }

    /// Kernel used by [`step`](Self::step).
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    /// Change the growth kernel.
    pub fn set_neighborhood(&mut self, neighborhood: Neighborhood) {
        self.neighborhood = neighborhood;
    }

    /// Bind to `grid`, discarding any selection in progress.
    pub fn bind(&mut self, grid: &Grid) {
        self.binding.sync(grid);
        self.selection = SelectionState::Idle;
    }

    /// Grid this engine last operated on.
    pub fn bound_grid(&self) -> Option<GridInstanceId> {
        self.binding.bound()
    }

    /// Current selection sub-state.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// True while a selection is in progress.
    pub fn is_selecting(&self) -> bool {
        matches!(self.selection, SelectionState::Selecting { .. })
    }

    fn sync(&mut self, grid: &Grid) {
        if self.binding.sync(grid) && self.is_selecting() {
            debug!(grid = %grid.instance_id(), "grid changed, selection discarded");
            self.selection = SelectionState::Idle;
        }
    }

    // ── Inclusions ──────────────────────────────────────────────

    /// Mark every in-bounds cell within Euclidean distance `radius` of
    /// `(cx, cy)` as an inclusion. Returns the number of cells marked.
    pub fn add_circle_inclusion(
        &mut self,
        grid: &mut Grid,
        cx: u32,
        cy: u32,
        radius: u32,
    ) -> Result<usize, GrainError> {
        self.add_inclusion(grid, cx, cy, radius, InclusionShape::Circle)
    }

    /// Mark every in-bounds cell within Chebyshev distance `radius` of
    /// `(cx, cy)` as an inclusion. Returns the number of cells marked.
    pub fn add_square_inclusion(
        &mut self,
        grid: &mut Grid,
        cx: u32,
        cy: u32,
        radius: u32,
    ) -> Result<usize, GrainError> {
        self.add_inclusion(grid, cx, cy, radius, InclusionShape::Square)
    }

    /// Stamp an inclusion of the given shape, overwriting grains and empty
    /// cells alike. Distances never wrap, even on a periodic grid.
    pub fn add_inclusion(
        &mut self,
        grid: &mut Grid,
        cx: u32,
        cy: u32,
        radius: u32,
        shape: InclusionShape,
    ) -> Result<usize, GrainError> {
        if radius == 0 {
            return Err(GrainError::invalid("inclusion radius must be >= 1"));
        }
        self.sync(grid);
        let footprint = grid.cells_within(cx, cy, radius, shape)?;
        let cells = grid.cells_mut();
        for &i in &footprint {
            cells[i] = Cell::INCLUSION;
        }
        debug!(
            grid = %grid.instance_id(),
            cx,
            cy,
            radius,
            ?shape,
            cells = footprint.len(),
            "added inclusion"
        );
        Ok(footprint.len())
    }

    // ── Seeding and growth ──────────────────────────────────────

    /// Seed `count` new single-cell grains on distinct empty cells chosen
    /// uniformly at random. Returns the new ids.
    ///
    /// Fails with `InsufficientSpace`, leaving the grid untouched, when
    /// fewer than `count` empty cells exist.
    pub fn add_random_grains<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<GrainId>, GrainError> {
        self.sync(grid);
        let ids = sampling::seed_grains(grid, rng, count)?;
        debug!(grid = %grid.instance_id(), count, "seeded random grains");
        Ok(ids)
    }

    /// Run one synchronous growth sweep. Returns true iff any cell changed.
    ///
    /// Once this returns false the grid is stalled: either full, or every
    /// remaining empty region is cut off by inclusions. Further calls keep
    /// returning false without touching the grid.
    pub fn step(&mut self, grid: &mut Grid) -> bool {
        self.sync(grid);
        let snapshot = grid.states();
        let changes: Vec<(usize, GrainId)> = snapshot
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_empty())
            .filter_map(|(i, _)| {
                grid.neighbour_indices(i, self.neighborhood)
                    .iter()
                    .find_map(|&n| snapshot[n].grain())
                    .map(|id| (i, id))
            })
            .collect();

        let cells = grid.cells_mut();
        for &(i, id) in &changes {
            cells[i].state = CellState::Grain(id);
        }
        trace!(changed = changes.len(), "ca sweep");
        !changes.is_empty()
    }

    /// Step until growth stalls. Returns the number of sweeps that changed
    /// something.
    pub fn grow_until_stalled(&mut self, grid: &mut Grid) -> usize {
        let mut sweeps = 0;
        while self.step(grid) {
            sweeps += 1;
        }
        debug!(grid = %grid.instance_id(), sweeps, "ca growth stalled");
        sweeps
    }

    // ── Grain selection ─────────────────────────────────────────

    /// Enter `Selecting`. `change_id` decides what
    /// [`end_select_grains`](Self::end_select_grains) does with the
    /// selection. No-op if a selection is already in progress.
    pub fn start_select_grains(&mut self, grid: &Grid, change_id: bool) {
        self.sync(grid);
        if self.is_selecting() {
            return;
        }
        self.selection = SelectionState::Selecting {
            change_id,
            selected: IndexSet::new(),
        };
    }

    /// Toggle the grain at `(x, y)` in the selection. Returns true if the
    /// grain is selected afterwards.
    ///
    /// Empty and inclusion cells are not selectable. No-op while `Idle`.
    pub fn select_grain(&mut self, grid: &Grid, x: u32, y: u32) -> Result<bool, GrainError> {
        let cell = *grid.cell_at(x, y)?;
        self.sync(grid);
        let SelectionState::Selecting { selected, .. } = &mut self.selection else {
            return Ok(false);
        };
        let Some(id) = cell.grain_id() else {
            return Ok(false);
        };
        if selected.shift_remove(&id) {
            Ok(false)
        } else {
            selected.insert(id);
            Ok(true)
        }
    }

    /// Apply the selection and return to `Idle`.
    ///
    /// With `change_id` every selected grain is relabelled with one freshly
    /// allocated id, which is returned. Otherwise every selected cell is
    /// reset to empty. No-op while `Idle`.
    pub fn end_select_grains(&mut self, grid: &mut Grid) -> Option<GrainId> {
        self.sync(grid);
        let SelectionState::Selecting {
            change_id,
            selected,
        } = std::mem::take(&mut self.selection)
        else {
            return None;
        };
        if selected.is_empty() {
            return None;
        }

        let merged = change_id.then(|| grid.allocate_grain_id());
        let mut touched = 0usize;
        for cell in grid.cells_mut() {
            if cell.grain_id().is_some_and(|id| selected.contains(&id)) {
                match merged {
                    Some(id) => cell.state = CellState::Grain(id),
                    None => *cell = Cell::EMPTY,
                }
                touched += 1;
            }
        }
        debug!(
            grid = %grid.instance_id(),
            grains = selected.len(),
            cells = touched,
            merged = ?merged,
            "applied grain selection"
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain_test_utils::{grain_ids, grid_from_ascii, seeded_rng, to_ascii};

    // ── Inclusion tests ─────────────────────────────────────────

    #[test]
    fn circle_inclusion_overwrites_grains() {
        let mut grid = grid_from_ascii(
            "11111
             11111
             11111
             11111
             11111",
            false,
        );
        let mut ca = CellularAutomata::default();
        let marked = ca.add_circle_inclusion(&mut grid, 2, 2, 1).unwrap();
        assert_eq!(marked, 5);
        assert_eq!(to_ascii(&grid), "11111\n11#11\n1###1\n11#11\n11111");
    }

    #[test]
    fn square_inclusion_clipped_at_corner() {
        let mut grid = Grid::new(4, 4, true).unwrap();
        let mut ca = CellularAutomata::default();
        let marked = ca.add_square_inclusion(&mut grid, 3, 3, 1).unwrap();
        assert_eq!(marked, 4);
        assert_eq!(to_ascii(&grid), "....\n....\n..##\n..##");
    }

    #[test]
    fn zero_radius_rejected_without_mutation() {
        let mut grid = Grid::new(4, 4, false).unwrap();
        let mut ca = CellularAutomata::default();
        assert!(matches!(
            ca.add_circle_inclusion(&mut grid, 1, 1, 0),
            Err(GrainError::InvalidArgument { .. })
        ));
        assert!(grid.cells().iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn inclusion_centre_out_of_range() {
        let mut grid = Grid::new(4, 4, false).unwrap();
        let mut ca = CellularAutomata::default();
        assert!(matches!(
            ca.add_square_inclusion(&mut grid, 4, 1, 1),
            Err(GrainError::OutOfRange { .. })
        ));
    }

    // ── Seeding tests ───────────────────────────────────────────

    #[test]
    fn random_grains_get_fresh_distinct_ids() {
        let mut grid = Grid::new(10, 10, false).unwrap();
        let mut ca = CellularAutomata::default();
        let mut rng = seeded_rng(7);
        let ids = ca.add_random_grains(&mut grid, &mut rng, 12).unwrap();
        assert_eq!(ids.len(), 12);
        assert_eq!(grain_ids(&grid).len(), 12);
        assert_eq!(grid.count_state(CellState::Empty), 88);
        assert_eq!(ids[0], GrainId(1));
    }

    #[test]
    fn random_grains_only_land_on_empty_cells() {
        let mut grid = grid_from_ascii(
            "#.#
             ###
             #.#",
            false,
        );
        let mut ca = CellularAutomata::default();
        let mut rng = seeded_rng(3);
        ca.add_random_grains(&mut grid, &mut rng, 2).unwrap();
        assert_eq!(grid.count_state(CellState::Inclusion), 7);
        assert!(grid.is_full());
    }

    #[test]
    fn too_many_grains_is_insufficient_space() {
        let mut grid = grid_from_ascii("#..#", false);
        let before = grid.cells().to_vec();
        let mut ca = CellularAutomata::default();
        let mut rng = seeded_rng(3);
        assert_eq!(
            ca.add_random_grains(&mut grid, &mut rng, 3),
            Err(GrainError::InsufficientSpace {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(grid.cells(), before.as_slice());
    }

    #[test]
    fn zero_grains_is_invalid() {
        let mut grid = Grid::new(3, 3, false).unwrap();
        let mut ca = CellularAutomata::default();
        let mut rng = seeded_rng(3);
        assert!(matches!(
            ca.add_random_grains(&mut grid, &mut rng, 0),
            Err(GrainError::InvalidArgument { .. })
        ));
    }

    // ── Growth tests ────────────────────────────────────────────

    #[test]
    fn step_is_synchronous() {
        let mut grid = grid_from_ascii(".....", false);
        grid.set_cell(0, 0, Cell::grain(GrainId(1))).unwrap();
        let mut ca = CellularAutomata::default();
        assert!(ca.step(&mut grid));
        assert_eq!(to_ascii(&grid), "11...");
    }

    #[test]
    fn tie_break_takes_first_neighbour_in_kernel_order() {
        // Centre cell sees 1 to the north and 2 to the south. North comes
        // first in the von Neumann kernel.
        let mut grid = grid_from_ascii(
            "#1#
             #.#
             #2#",
            false,
        );
        let mut ca = CellularAutomata::default();
        assert!(ca.step(&mut grid));
        assert_eq!(grid.cell_at(1, 1).unwrap().grain_id(), Some(GrainId(1)));
    }

    #[test]
    fn moore_kernel_grows_diagonally() {
        let mut grid = grid_from_ascii(
            "1..
             ...
             ...",
            false,
        );
        let mut ca = CellularAutomata::new(Neighborhood::Moore);
        assert!(ca.step(&mut grid));
        assert_eq!(to_ascii(&grid), "11.\n11.\n...");
    }

    #[test]
    fn inclusions_block_growth() {
        let mut grid = grid_from_ascii(
            "1#.
             ##.
             ...",
            false,
        );
        let mut ca = CellularAutomata::default();
        assert!(!ca.step(&mut grid));
        assert_eq!(grid.count_state(CellState::Empty), 5);
    }

    #[test]
    fn step_without_grains_is_no_change() {
        let mut grid = Grid::new(4, 4, true).unwrap();
        let mut ca = CellularAutomata::default();
        assert!(!ca.step(&mut grid));
    }

    #[test]
    fn five_by_five_fills_in_four_sweeps() {
        let mut grid = Grid::new(5, 5, false).unwrap();
        grid.set_cell(2, 2, Cell::grain(GrainId(1))).unwrap();
        let mut ca = CellularAutomata::new(Neighborhood::VonNeumann);
        for _ in 0..4 {
            assert!(ca.step(&mut grid));
        }
        assert!(grid
            .cells()
            .iter()
            .all(|c| c.grain_id() == Some(GrainId(1))));
        assert!(!ca.step(&mut grid));
    }

    #[test]
    fn grow_until_stalled_counts_productive_sweeps() {
        let mut grid = Grid::new(5, 5, false).unwrap();
        grid.set_cell(2, 2, Cell::grain(GrainId(1))).unwrap();
        let mut ca = CellularAutomata::default();
        assert_eq!(ca.grow_until_stalled(&mut grid), 4);
        assert!(grid.is_full());
    }

    // ── Selection tests ─────────────────────────────────────────

    fn two_grain_grid() -> Grid {
        grid_from_ascii(
            "112
             1#2
             332",
            false,
        )
    }

    #[test]
    fn merge_selected_grains_into_fresh_id() {
        let mut grid = two_grain_grid();
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, true);
        assert!(ca.select_grain(&grid, 0, 0).unwrap());
        assert!(ca.select_grain(&grid, 2, 0).unwrap());
        let merged = ca.end_select_grains(&mut grid).unwrap();
        assert_eq!(merged, GrainId(4));
        assert_eq!(to_ascii(&grid), "444\n4#4\n334");
        assert!(!ca.is_selecting());
    }

    #[test]
    fn delete_selected_grains() {
        let mut grid = two_grain_grid();
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, false);
        ca.select_grain(&grid, 1, 2).unwrap();
        assert_eq!(ca.end_select_grains(&mut grid), None);
        assert_eq!(to_ascii(&grid), "112\n1#2\n..2");
        // Deleted ids are not reissued.
        assert_eq!(grid.allocate_grain_id(), GrainId(4));
    }

    #[test]
    fn selecting_twice_toggles_off() {
        let mut grid = two_grain_grid();
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, false);
        assert!(ca.select_grain(&grid, 0, 0).unwrap());
        assert!(!ca.select_grain(&grid, 0, 1).unwrap());
        ca.end_select_grains(&mut grid);
        assert_eq!(to_ascii(&grid), "112\n1#2\n332");
    }

    #[test]
    fn inclusion_and_empty_not_selectable() {
        let mut grid = grid_from_ascii("#.1", false);
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, false);
        assert!(!ca.select_grain(&grid, 0, 0).unwrap());
        assert!(!ca.select_grain(&grid, 1, 0).unwrap());
        let SelectionState::Selecting { selected, .. } = ca.selection() else {
            panic!("expected Selecting");
        };
        assert!(selected.is_empty());
        ca.end_select_grains(&mut grid);
        assert_eq!(to_ascii(&grid), "#.1");
    }

    #[test]
    fn idle_select_and_end_are_no_ops() {
        let mut grid = two_grain_grid();
        let mut ca = CellularAutomata::default();
        assert!(!ca.select_grain(&grid, 0, 0).unwrap());
        assert_eq!(ca.end_select_grains(&mut grid), None);
        assert_eq!(to_ascii(&grid), "112\n1#2\n332");
    }

    #[test]
    fn start_while_selecting_keeps_current_mode() {
        let mut grid = two_grain_grid();
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, false);
        ca.select_grain(&grid, 0, 0).unwrap();
        ca.start_select_grains(&grid, true);
        assert_eq!(ca.end_select_grains(&mut grid), None);
        assert_eq!(to_ascii(&grid), "..2\n.#2\n332");
    }

    #[test]
    fn select_out_of_range_errors() {
        let grid = two_grain_grid();
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, true);
        assert!(matches!(
            ca.select_grain(&grid, 3, 0),
            Err(GrainError::OutOfRange { .. })
        ));
    }

    #[test]
    fn new_grid_discards_selection() {
        let grid = two_grain_grid();
        let mut other = two_grain_grid();
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, false);
        ca.select_grain(&grid, 0, 0).unwrap();
        assert_eq!(ca.end_select_grains(&mut other), None);
        assert_eq!(to_ascii(&other), "112\n1#2\n332");
        assert_eq!(ca.bound_grid(), Some(other.instance_id()));
    }

    #[test]
    fn bind_resets_selection() {
        let grid = two_grain_grid();
        let mut ca = CellularAutomata::default();
        ca.start_select_grains(&grid, true);
        ca.bind(&grid);
        assert!(!ca.is_selecting());
    }
}
