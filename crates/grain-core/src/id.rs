//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a grain on a grid.
///
/// Grain ids are always positive. The empty and inclusion markers are
/// separate [`CellState`](crate::CellState) variants rather than reserved
/// integer values, so a `GrainId` can never be confused with either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrainId(pub u64);

impl GrainId {
    /// The first id issued by a fresh allocator.
    pub const FIRST: GrainId = GrainId(1);

    /// Largest id a grid accepts. Ids above it are reserved so the
    /// allocator can always count past any id it has observed.
    pub const MAX: GrainId = GrainId(i64::MAX as u64);

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GrainId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Counter for unique [`GridInstanceId`] allocation.
static GRID_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a grid.
///
/// Engines remember the instance they were last bound to. When they are
/// handed a grid with a different instance id, their per-grid bookkeeping
/// (selection state, nucleation counters) is discarded. A grid rebuilt with
/// identical dimensions still gets a new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridInstanceId(u64);

impl GridInstanceId {
    /// Allocate a fresh, unique instance ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(GRID_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GridInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_unique() {
        let a = GridInstanceId::next();
        let b = GridInstanceId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn grain_id_display() {
        assert_eq!(GrainId(42).to_string(), "42");
        assert_eq!(GrainId::FIRST.get(), 1);
    }
}
