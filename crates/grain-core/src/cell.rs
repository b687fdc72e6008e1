//! Per-lattice-site state.

use crate::id::GrainId;

/// What occupies a lattice site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Unassigned. Empty cells are eligible for growth.
    #[default]
    Empty,
    /// Permanent obstacle. No engine ever mutates an inclusion.
    Inclusion,
    /// Part of the grain with the given id.
    Grain(GrainId),
}

impl CellState {
    /// The grain id, if this site belongs to a grain.
    pub fn grain(self) -> Option<GrainId> {
        match self {
            Self::Grain(id) => Some(id),
            Self::Empty | Self::Inclusion => None,
        }
    }

    /// True for [`CellState::Empty`].
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// True for [`CellState::Inclusion`].
    pub fn is_inclusion(self) -> bool {
        matches!(self, Self::Inclusion)
    }
}

/// A single lattice site.
///
/// `recrystallized` and `stored_energy` only carry meaning for static
/// recrystallization; every other operation leaves them at their neutral
/// defaults (`false`, `0.0`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    /// Occupancy of the site.
    pub state: CellState,
    /// Whether a recrystallization front has passed through this site.
    pub recrystallized: bool,
    /// Stored deformation energy. Never negative.
    pub stored_energy: f64,
}

impl Cell {
    /// An empty cell with neutral recrystallization state.
    pub const EMPTY: Cell = Cell {
        state: CellState::Empty,
        recrystallized: false,
        stored_energy: 0.0,
    };

    /// An inclusion cell.
    pub const INCLUSION: Cell = Cell {
        state: CellState::Inclusion,
        recrystallized: false,
        stored_energy: 0.0,
    };

    /// A plain grain cell with neutral recrystallization state.
    pub fn grain(id: GrainId) -> Self {
        Self {
            state: CellState::Grain(id),
            ..Self::EMPTY
        }
    }

    /// A freshly recrystallized grain cell: flagged, energy consumed.
    pub fn recrystallized(id: GrainId) -> Self {
        Self {
            state: CellState::Grain(id),
            recrystallized: true,
            stored_energy: 0.0,
        }
    }

    /// Grain id of this cell, if any.
    pub fn grain_id(&self) -> Option<GrainId> {
        self.state.grain()
    }

    /// True if this cell is an inclusion.
    pub fn is_inclusion(&self) -> bool {
        self.state.is_inclusion()
    }
}
