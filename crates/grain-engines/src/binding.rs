//! Tracks which grid an engine's bookkeeping belongs to.

use grain_core::GridInstanceId;
use grain_space::Grid;

#[derive(Clone, Debug, Default)]
pub(crate) struct Binding {
    bound: Option<GridInstanceId>,
}

impl Binding {
    /// Record `grid` as the bound grid. Returns true if it differs from
    /// the previously bound one, meaning engine bookkeeping is stale.
    pub(crate) fn sync(&mut self, grid: &Grid) -> bool {
        let id = grid.instance_id();
        if self.bound == Some(id) {
            return false;
        }
        self.bound = Some(id);
        true
    }

    pub(crate) fn bound(&self) -> Option<GridInstanceId> {
        self.bound
    }
}
