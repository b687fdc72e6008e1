//! Interactive tools applied by clicking on the grid.
//!
//! At most one tool is active. Activating a tool first runs the "off"
//! action of the current one; activating the tool that is already active
//! simply turns it off. Only grain selection has on/off actions: turning
//! it on starts a selection, turning it off commits the merge or delete.

use grain_core::{GrainError, GrainId};
use grain_engines::CellularAutomata;
use grain_space::{Grid, InclusionShape};
use tracing::debug;

/// A click tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Clicks do nothing.
    #[default]
    None,
    /// Stamp a circular inclusion centred on the clicked cell.
    AddCircleInclusion,
    /// Stamp a square inclusion centred on the clicked cell.
    AddSquareInclusion,
    /// Toggle the clicked cell's grain in the current selection.
    SelectGrain,
}

/// What a click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No tool is active, or the clicked cell holds no grain to select.
    Ignored,
    /// An inclusion was stamped over this many cells.
    Inclusion(usize),
    /// The clicked grain was added to the selection.
    Selected(GrainId),
    /// The clicked grain was removed from the selection.
    Deselected(GrainId),
}

/// Routes tool activation and clicks to the cellular automata engine.
#[derive(Clone, Debug)]
pub struct ToolDispatcher {
    active: Tool,
    inclusion_radius: u32,
    change_id: bool,
}

impl ToolDispatcher {
    /// A dispatcher with no active tool.
    pub fn new(inclusion_radius: u32, change_id: bool) -> Self {
        Self {
            active: Tool::None,
            inclusion_radius,
            change_id,
        }
    }

    /// The active tool.
    pub fn active(&self) -> Tool {
        self.active
    }

    /// Radius used by the inclusion tools.
    pub fn set_inclusion_radius(&mut self, radius: u32) {
        self.inclusion_radius = radius;
    }

    /// Merge (true) or delete (false) the grains of the next selection.
    pub fn set_change_id(&mut self, change_id: bool) {
        self.change_id = change_id;
    }

    /// Switch to `tool`, or turn it off if it is already active.
    ///
    /// Returns the merged grain's id when leaving [`Tool::SelectGrain`]
    /// commits a merge.
    pub fn activate(
        &mut self,
        tool: Tool,
        ca: &mut CellularAutomata,
        grid: &mut Grid,
    ) -> Option<GrainId> {
        let merged = self.turn_off(ca, grid);
        if tool == self.active {
            self.active = Tool::None;
        } else {
            self.active = tool;
            if tool == Tool::SelectGrain {
                ca.start_select_grains(grid, self.change_id);
            }
        }
        debug!(tool = ?self.active, "tool changed");
        merged
    }

    /// Deactivate the current tool, running its "off" action.
    pub fn deactivate(&mut self, ca: &mut CellularAutomata, grid: &mut Grid) -> Option<GrainId> {
        let merged = self.turn_off(ca, grid);
        self.active = Tool::None;
        merged
    }

    /// Forget the active tool without running its "off" action. Used when
    /// the grid it was working on has been replaced.
    pub fn reset(&mut self) {
        self.active = Tool::None;
    }

    fn turn_off(&mut self, ca: &mut CellularAutomata, grid: &mut Grid) -> Option<GrainId> {
        match self.active {
            Tool::SelectGrain => ca.end_select_grains(grid),
            _ => None,
        }
    }

    /// Apply the active tool at cell `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `(x, y)` is off the grid.
    pub fn click(
        &mut self,
        ca: &mut CellularAutomata,
        grid: &mut Grid,
        x: u32,
        y: u32,
    ) -> Result<ClickOutcome, GrainError> {
        let shape = match self.active {
            Tool::None => {
                grid.index_of(x, y)?;
                return Ok(ClickOutcome::Ignored);
            }
            Tool::SelectGrain => {
                let selected = ca.select_grain(grid, x, y)?;
                let id = grid.cell_at(x, y)?.grain_id();
                return Ok(match id {
                    Some(id) if selected => ClickOutcome::Selected(id),
                    Some(id) if ca.is_selecting() => ClickOutcome::Deselected(id),
                    _ => ClickOutcome::Ignored,
                });
            }
            Tool::AddCircleInclusion => InclusionShape::Circle,
            Tool::AddSquareInclusion => InclusionShape::Square,
        };
        let cells = ca.add_inclusion(grid, x, y, self.inclusion_radius, shape)?;
        Ok(ClickOutcome::Inclusion(cells))
    }
}
